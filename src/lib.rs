#![no_std]
#![forbid(unsafe_code)]
#![cfg_attr(docs_rs, feature(doc_cfg))]
#![warn(missing_docs)]

//! A crate for reading and writing the byte layout of Windows Bitmap (BMP)
//! files.
//!
//! The crate never touches the file system. You hand it the bytes of a file
//! and get back a [BmpFile](bmp::BmpFile), or you build a `BmpFile` up in
//! stages and ask it for the bytes. Every field that was read is written back
//! out exactly as it was found, so `to_bytes` after `try_from_bytes` gives the
//! same bytes you started with.
//!
//! ```
//! use bmp_layout::bmp::{BmpFile, BmpVersion, InfoField};
//!
//! let mut bmp = BmpFile::with_version(BmpVersion::Info);
//! let header = bmp.info_header_mut()?;
//! header.set(InfoField::Width, 2)?;
//! header.set(InfoField::Height, 2)?;
//! header.set(InfoField::BitsPerPixel, 8)?;
//! header.set(InfoField::ColorsUsed, 2)?;
//! bmp.init_color_table()?;
//! bmp.init_pixel_plane()?;
//! let bytes = bmp.to_bytes()?;
//! assert_eq!(bytes.len(), 70);
//! # Ok::<(), bmp_layout::BmpError>(())
//! ```

extern crate alloc;

#[cfg(target_pointer_width = "16")]
compile_error!("this crate assumes 32-bit or bigger pointers!");

pub mod ascii_array;
pub use ascii_array::*;

mod error;
pub use error::BmpError;

mod limits;
pub use limits::Limits;

mod parser_helpers;
pub(crate) use parser_helpers::*;

pub mod bmp;
