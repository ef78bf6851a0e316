#![forbid(unsafe_code)]

//! Module for Windows Bitmap files (BMP).
//!
//! ## The Layout
//!
//! Note: All multi-byte values in BMP are always little-endian encoded.
//!
//! * A bitmap file always starts with a "file header". This is always 14 bytes.
//!   * The `BM` tag.
//!   * The total size of the file, to check if a file was unexpectedly
//!     truncated.
//!   * Two reserved `u16` values, which are kept as-is.
//!   * The position of the pixel data within the file.
//! * Next is an "info header". There's six versions of this header handled
//!   here. The first 4 bytes are always the size of the full info header, and
//!   each version is a different size, so this lets you figure out what
//!   version is being used for this file (see [BmpVersion]). Each version is
//!   the previous version plus some more fields, except that the oldest
//!   version ([BmpVersion::Core]) uses `u16` for the width and height, and all
//!   the others use `u32` in the same spot.
//! * Next there **might** be a color table. It's there when the bit depth is 8
//!   (or less) bits per pixel, and it's absent otherwise. The default number
//!   of entries is `2**bits_per_pixel`, but the header can specify a different
//!   count. Each entry is 4 bytes.
//! * Finally there is the pixel array. Each row of the bitmap is padded to 4
//!   bytes. When the bits per pixel is less than 8 the pixels will be packed
//!   within a byte, and the leftmost pixel is the highest bits of the byte.
//!   * 1, 4, and 8 bits per pixel are indexed color.
//!   * 16 bits per pixel is direct color, 5 bits for each of red, green, and
//!     blue, with the top bit unused.
//!   * 24 bits per pixel is direct color and the channel order is `[b,g,r]`
//!     within `[u8; 3]`.
//!
//! The compression code in the header is checked against the known kinds and
//! kept, but compressed pixel data is not decoded.
//!
//! ## Building A File
//!
//! The shape of the color table and pixel plane depend on header values, so a
//! [BmpFile] is built in stages: pick the version, fill in the header, then
//! make the color table, then make the pixel plane. See [BuildState].

mod version;
pub use version::*;

mod compression;
pub use compression::*;

mod file_header;
pub use file_header::*;

mod info_header;
pub use info_header::*;

mod color_table;
pub use color_table::*;

mod pixel_plane;
pub use pixel_plane::*;

mod bmp_file;
pub use bmp_file::*;
