use crate::{ascii_array::AsciiArray, try_pull_byte_array, BmpError};
use pack1::*;

/// The `BM` tag that starts every file this crate handles.
pub const BMP_SIGNATURE: AsciiArray<2> = AsciiArray(*b"BM");

/// The exact on-disk form of the file header.
#[derive(Debug, Clone, Copy, bytemuck::Zeroable, bytemuck::Pod)]
#[repr(C)]
struct BitmapFileHeader {
  ty: [u8; 2],
  file_size: U32LE,
  reserved1: U16LE,
  reserved2: U16LE,
  bitmap_offset: U32LE,
}

/// The header at the start of all BMP files.
///
/// The file size and pixel data offset describe the rest of the file, so a
/// [BmpFile](super::BmpFile) fills them in itself once the sizes of all the
/// other parts are known.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct BmpFileHeader {
  /// Should always be [BMP_SIGNATURE].
  pub tag: AsciiArray<2>,

  /// The total size of the file.
  ///
  /// If this doesn't match the actual size of the file, there might be some
  /// sort of data loss or corruption.
  pub total_file_size: u32,

  /// Reserved, the value depends on the program that made the file.
  pub reserved1: u16,

  /// Reserved, the value depends on the program that made the file.
  pub reserved2: u16,

  /// The byte index within the file where the pixel data starts.
  pub pixel_data_offset: u32,
}
impl BmpFileHeader {
  /// Size of the file header in bytes.
  pub const SIZE: usize = 14;

  /// A header with the `BM` tag and everything else zeroed.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self { tag: BMP_SIGNATURE, total_file_size: 0, reserved1: 0, reserved2: 0, pixel_data_offset: 0 }
  }

  /// Tries to get the file header and remaining bytes from the bytes of a BMP
  /// file.
  ///
  /// The bytes from here should be used to get the
  /// [InfoHeader](super::InfoHeader).
  ///
  /// ## Failure
  /// * [BmpError::InsufficientBytes] if there's less than 14 bytes.
  /// * [BmpError::SignatureMismatch] if the data doesn't start with `BM`.
  #[inline]
  pub fn try_from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), BmpError> {
    let (a, rest) = try_pull_byte_array::<14>(bytes)?;
    let header = Self::from(a);
    if header.tag != BMP_SIGNATURE {
      return Err(BmpError::SignatureMismatch);
    }
    Ok((header, rest))
  }
}
impl From<[u8; 14]> for BmpFileHeader {
  #[inline]
  #[must_use]
  fn from(value: [u8; 14]) -> Self {
    let raw: BitmapFileHeader = bytemuck::cast(value);
    Self {
      tag: AsciiArray(raw.ty),
      total_file_size: raw.file_size.get(),
      reserved1: raw.reserved1.get(),
      reserved2: raw.reserved2.get(),
      pixel_data_offset: raw.bitmap_offset.get(),
    }
  }
}
impl From<BmpFileHeader> for [u8; 14] {
  #[inline]
  #[must_use]
  fn from(h: BmpFileHeader) -> Self {
    let raw = BitmapFileHeader {
      ty: h.tag.0,
      file_size: U32LE::new(h.total_file_size),
      reserved1: U16LE::new(h.reserved1),
      reserved2: U16LE::new(h.reserved2),
      bitmap_offset: U32LE::new(h.pixel_data_offset),
    };
    bytemuck::cast(raw)
  }
}

#[test]
fn test_file_header_bytes() {
  let bytes: [u8; 14] = [b'B', b'M', 70, 0, 0, 0, 0x34, 0x12, 0x78, 0x56, 62, 0, 0, 0];
  let (h, rest) = BmpFileHeader::try_from_bytes(&bytes).unwrap();
  assert!(rest.is_empty());
  assert_eq!(h.tag, BMP_SIGNATURE);
  assert_eq!(h.total_file_size, 70);
  assert_eq!(h.reserved1, 0x1234);
  assert_eq!(h.reserved2, 0x5678);
  assert_eq!(h.pixel_data_offset, 62);
  assert_eq!(<[u8; 14]>::from(h), bytes);
}

#[test]
fn test_file_header_rejects_bad_input() {
  let mut bytes: [u8; 14] = [b'B', b'M', 14, 0, 0, 0, 0, 0, 0, 0, 14, 0, 0, 0];
  assert_eq!(BmpFileHeader::try_from_bytes(&bytes[..13]), Err(BmpError::InsufficientBytes));
  bytes[1] = b'A';
  assert_eq!(BmpFileHeader::try_from_bytes(&bytes), Err(BmpError::SignatureMismatch));
}
