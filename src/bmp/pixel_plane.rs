use crate::{u16_le, BmpError};
use alloc::vec::Vec;
use bitfrob::{u16_get_value, u8_get_bit, u8_get_value};

/// 1 bit per pixel, 8 pixels per byte, each a palette index of 0 or 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OneBit;
impl OneBit {
  /// Gets bit `bit_index` of the byte, where bit 0 is the lowest bit.
  ///
  /// ## Failure
  /// * [BmpError::BitIndexOutOfRange] unless `bit_index` is in `0..=7`.
  #[inline]
  pub fn get(byte: u8, bit_index: u32) -> Result<u8, BmpError> {
    if bit_index > 7 {
      return Err(BmpError::BitIndexOutOfRange(bit_index));
    }
    Ok(u8::from(u8_get_bit(bit_index, byte)))
  }

  /// The byte with bit `bit_index` replaced by the lowest bit of `value`.
  #[inline]
  pub fn with(byte: u8, bit_index: u32, value: u8) -> Result<u8, BmpError> {
    if bit_index > 7 {
      return Err(BmpError::BitIndexOutOfRange(bit_index));
    }
    let mask = 1_u8 << bit_index;
    Ok((byte & !mask) | ((value & 1) << bit_index))
  }
}

/// 4 bits per pixel, 2 pixels per byte, each a palette index of `0..=15`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourBit;
impl FourBit {
  /// Gets the low nibble (index 0) or the high nibble (index 1).
  ///
  /// ## Failure
  /// * [BmpError::InvalidNibbleIndex] unless `nibble_index` is 0 or 1.
  #[inline]
  pub fn get(byte: u8, nibble_index: u32) -> Result<u8, BmpError> {
    match nibble_index {
      0 => Ok(u8_get_value(0, 3, byte)),
      1 => Ok(u8_get_value(4, 7, byte)),
      _ => Err(BmpError::InvalidNibbleIndex(nibble_index)),
    }
  }

  /// The byte with one nibble replaced by the low 4 bits of `value`.
  #[inline]
  pub fn with(byte: u8, nibble_index: u32, value: u8) -> Result<u8, BmpError> {
    match nibble_index {
      0 => Ok((byte & 0xF0) | (value & 0x0F)),
      1 => Ok((byte & 0x0F) | (value << 4)),
      _ => Err(BmpError::InvalidNibbleIndex(nibble_index)),
    }
  }
}

/// 8 bits per pixel, each byte is a palette index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EightBit;
impl EightBit {
  /// The byte is the palette index.
  #[inline]
  #[must_use]
  pub const fn get(byte: u8) -> u8 {
    byte
  }
}

/// 16 bits per pixel, 5 bits each of red, green, and blue (high to low), with
/// the top bit unused. There's no palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SixteenBit;
impl SixteenBit {
  /// The word is the pixel value.
  #[inline]
  #[must_use]
  pub const fn get(word: u16) -> u16 {
    word
  }

  /// Splits the word into its `(r, g, b)` channels, each `0..=31`.
  #[inline]
  #[must_use]
  pub fn decompose(word: u16) -> (u8, u8, u8) {
    (
      u16_get_value(10, 14, word) as u8,
      u16_get_value(5, 9, word) as u8,
      u16_get_value(0, 4, word) as u8,
    )
  }

  /// Packs `(r, g, b)` channels into a word, only the low 5 bits of each
  /// channel are used.
  #[inline]
  #[must_use]
  pub const fn compose(r: u8, g: u8, b: u8) -> u16 {
    (((r & 0x1F) as u16) << 10) | (((g & 0x1F) as u16) << 5) | ((b & 0x1F) as u16)
  }
}

/// 24 bits per pixel, stored as `[b, g, r]`. There's no palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TwentyFourBit;
impl TwentyFourBit {
  /// Packs the channels as `(b << 16) | (g << 8) | r`.
  ///
  /// Blue is the high byte, which is **not** the usual `0xRRGGBB` packing.
  #[inline]
  #[must_use]
  pub const fn get(r: u8, g: u8, b: u8) -> u32 {
    ((b as u32) << 16) | ((g as u32) << 8) | (r as u32)
  }

  /// Undoes [get](Self::get), giving `(r, g, b)`. The top byte is ignored.
  #[inline]
  #[must_use]
  pub const fn split(value: u32) -> (u8, u8, u8) {
    (value as u8, (value >> 8) as u8, (value >> 16) as u8)
  }
}

/// Which of the five pixel encodings a plane uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum PixelShape {
  OneBit,
  FourBit,
  EightBit,
  SixteenBit,
  TwentyFourBit,
}
impl PixelShape {
  /// The shape for a bit depth.
  ///
  /// ## Failure
  /// * [BmpError::UnsupportedBitDepth] unless the depth is 1, 4, 8, 16, or 24.
  #[inline]
  pub const fn from_bits_per_pixel(bits_per_pixel: u16) -> Result<Self, BmpError> {
    Ok(match bits_per_pixel {
      1 => Self::OneBit,
      4 => Self::FourBit,
      8 => Self::EightBit,
      16 => Self::SixteenBit,
      24 => Self::TwentyFourBit,
      other => return Err(BmpError::UnsupportedBitDepth(other)),
    })
  }

  #[inline]
  #[must_use]
  #[allow(missing_docs)]
  pub const fn bits_per_pixel(self) -> u16 {
    match self {
      Self::OneBit => 1,
      Self::FourBit => 4,
      Self::EightBit => 8,
      Self::SixteenBit => 16,
      Self::TwentyFourBit => 24,
    }
  }

  /// If pixel values are palette indexes.
  #[inline]
  #[must_use]
  pub const fn is_indexed(self) -> bool {
    matches!(self, Self::OneBit | Self::FourBit | Self::EightBit)
  }

  /// Bytes per row including the padding to a multiple of 4.
  #[inline]
  #[must_use]
  pub const fn row_stride(self, width: u32) -> Option<usize> {
    let bits_per_line = match (width as usize).checked_mul(self.bits_per_pixel() as usize) {
      Some(bits) => bits,
      None => return None,
    };
    match bits_per_line.checked_add(31) {
      Some(bits) => Some((bits / 32) * 4),
      None => None,
    }
  }
}

/// The pixel array of a bitmap.
///
/// The plane's shape is fixed when it's made. Rows are stored in file order
/// (row 0 is the bottom row of the image unless the header height is
/// negative), and each row is padded to a multiple of 4 bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PixelPlane {
  shape: PixelShape,
  width: u32,
  height: u32,
  stride: usize,
  data: Vec<u8>,
}
impl PixelPlane {
  /// The byte size of a plane, including row padding.
  ///
  /// ## Failure
  /// * [BmpError::UnsupportedBitDepth] for an unknown bit depth.
  /// * [BmpError::DimensionsTooLarge] if the size doesn't fit in a `usize`.
  pub fn byte_len_for(bits_per_pixel: u16, width: u32, height: u32) -> Result<usize, BmpError> {
    let shape = PixelShape::from_bits_per_pixel(bits_per_pixel)?;
    let stride = shape.row_stride(width).ok_or(BmpError::DimensionsTooLarge)?;
    stride.checked_mul(height as usize).ok_or(BmpError::DimensionsTooLarge)
  }

  /// Makes a zeroed plane of `width * height` pixels.
  ///
  /// ## Failure
  /// * [BmpError::UnsupportedBitDepth] unless the depth is 1, 4, 8, 16, or 24.
  /// * [BmpError::DimensionsTooLarge] or [BmpError::AllocError] if it's too
  ///   big.
  pub fn new(bits_per_pixel: u16, width: u32, height: u32) -> Result<Self, BmpError> {
    let len = Self::byte_len_for(bits_per_pixel, width, height)?;
    let mut data = Vec::new();
    data.try_reserve_exact(len)?;
    data.resize(len, 0);
    Self::from_vec(bits_per_pixel, width, height, data)
  }

  /// Makes a plane from existing pixel bytes.
  ///
  /// ## Failure
  /// * [BmpError::SizeMismatch] if `data` isn't exactly the plane's size.
  /// * Otherwise the same as [new](Self::new).
  pub fn from_vec(
    bits_per_pixel: u16, width: u32, height: u32, data: Vec<u8>,
  ) -> Result<Self, BmpError> {
    let shape = PixelShape::from_bits_per_pixel(bits_per_pixel)?;
    let len = Self::byte_len_for(bits_per_pixel, width, height)?;
    if data.len() != len {
      return Err(BmpError::SizeMismatch { declared: len, actual: data.len() });
    }
    let stride = shape.row_stride(width).ok_or(BmpError::DimensionsTooLarge)?;
    Ok(Self { shape, width, height, stride, data })
  }

  #[inline]
  #[must_use]
  #[allow(missing_docs)]
  pub const fn shape(&self) -> PixelShape {
    self.shape
  }

  #[inline]
  #[must_use]
  #[allow(missing_docs)]
  pub const fn width(&self) -> u32 {
    self.width
  }

  #[inline]
  #[must_use]
  #[allow(missing_docs)]
  pub const fn height(&self) -> u32 {
    self.height
  }

  /// Bytes per row, padding included.
  #[inline]
  #[must_use]
  pub const fn stride(&self) -> usize {
    self.stride
  }

  /// The raw pixel bytes, padding included.
  #[inline]
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    &self.data
  }

  /// The raw pixel bytes, padding included.
  #[inline]
  #[must_use]
  pub fn as_bytes_mut(&mut self) -> &mut [u8] {
    &mut self.data
  }

  /// One row of bytes, padding included.
  #[inline]
  #[must_use]
  pub fn row(&self, y: u32) -> Option<&[u8]> {
    if y >= self.height {
      return None;
    }
    let start = y as usize * self.stride;
    self.data.get(start..start + self.stride)
  }

  /// Byte index of the first byte that holds pixel `(x, y)`.
  fn byte_index(&self, x: u32, y: u32) -> Result<usize, BmpError> {
    let pixel_count = (self.width as usize).saturating_mul(self.height as usize);
    if x >= self.width || y >= self.height {
      let index = (y as usize).saturating_mul(self.width as usize).saturating_add(x as usize);
      return Err(BmpError::IndexOutOfRange { index, len: pixel_count });
    }
    let row_start = y as usize * self.stride;
    let x = x as usize;
    Ok(
      row_start
        + match self.shape {
          PixelShape::OneBit => x / 8,
          PixelShape::FourBit => x / 2,
          PixelShape::EightBit => x,
          PixelShape::SixteenBit => x * 2,
          PixelShape::TwentyFourBit => x * 3,
        },
    )
  }

  /// Gets the value of pixel `(x, y)`.
  ///
  /// The leftmost pixel of a packed byte is in the highest bits. The value is
  /// whatever the shape's `get` gives: a palette index for indexed shapes,
  /// the raw word for 16-bit, and the [TwentyFourBit::get] packing for 24-bit.
  ///
  /// ## Failure
  /// * [BmpError::IndexOutOfRange] if the coordinate is outside the plane.
  pub fn get(&self, x: u32, y: u32) -> Result<u32, BmpError> {
    let i = self.byte_index(x, y)?;
    let d = &self.data;
    Ok(match self.shape {
      PixelShape::OneBit => u32::from(OneBit::get(d[i], 7 - (x % 8))?),
      PixelShape::FourBit => u32::from(FourBit::get(d[i], 1 - (x % 2))?),
      PixelShape::EightBit => u32::from(EightBit::get(d[i])),
      PixelShape::SixteenBit => u32::from(SixteenBit::get(u16_le(&d[i..i + 2]))),
      PixelShape::TwentyFourBit => TwentyFourBit::get(d[i + 2], d[i + 1], d[i]),
    })
  }

  /// Sets the value of pixel `(x, y)`.
  ///
  /// Bits of `value` beyond the pixel's bit depth are dropped.
  ///
  /// ## Failure
  /// * [BmpError::IndexOutOfRange] if the coordinate is outside the plane.
  pub fn set(&mut self, x: u32, y: u32, value: u32) -> Result<(), BmpError> {
    let i = self.byte_index(x, y)?;
    let d = &mut self.data;
    match self.shape {
      PixelShape::OneBit => d[i] = OneBit::with(d[i], 7 - (x % 8), value as u8)?,
      PixelShape::FourBit => d[i] = FourBit::with(d[i], 1 - (x % 2), value as u8)?,
      PixelShape::EightBit => d[i] = value as u8,
      PixelShape::SixteenBit => d[i..i + 2].copy_from_slice(&(value as u16).to_le_bytes()),
      PixelShape::TwentyFourBit => {
        let (r, g, b) = TwentyFourBit::split(value);
        d[i..i + 3].copy_from_slice(&[b, g, r]);
      }
    }
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use alloc::vec;

  #[test]
  fn test_one_bit_get() {
    assert_eq!(OneBit::get(0b1010_0000, 7), Ok(1));
    assert_eq!(OneBit::get(0b1010_0000, 6), Ok(0));
    assert_eq!(OneBit::get(0b1010_0000, 5), Ok(1));
    assert_eq!(OneBit::get(0b1010_0000, 0), Ok(0));
    assert_eq!(OneBit::get(0xFF, 8), Err(BmpError::BitIndexOutOfRange(8)));
    assert_eq!(OneBit::with(0, 3, 1), Ok(0b1000));
    assert_eq!(OneBit::with(0xFF, 0, 2), Ok(0xFE));
    assert_eq!(OneBit::with(0, 9, 1), Err(BmpError::BitIndexOutOfRange(9)));
  }

  #[test]
  fn test_four_bit_get() {
    assert_eq!(FourBit::get(0xAB, 0), Ok(0xB));
    assert_eq!(FourBit::get(0xAB, 1), Ok(0xA));
    assert_eq!(FourBit::get(0xAB, 2), Err(BmpError::InvalidNibbleIndex(2)));
    assert_eq!(FourBit::with(0xAB, 0, 0x1), Ok(0xA1));
    assert_eq!(FourBit::with(0xAB, 1, 0x1), Ok(0x1B));
    assert_eq!(FourBit::with(0xAB, 1, 0xF2), Ok(0x2B));
    assert_eq!(FourBit::with(0xAB, 5, 0), Err(BmpError::InvalidNibbleIndex(5)));
  }

  #[test]
  fn test_eight_and_sixteen_bit() {
    for b in [0, 1, 0x7F, 0xFF] {
      assert_eq!(EightBit::get(b), b);
    }
    assert_eq!(SixteenBit::get(0xBEEF), 0xBEEF);
    assert_eq!(SixteenBit::decompose(0b0_11111_00000_10101), (31, 0, 21));
    // the unused top bit doesn't leak into red
    assert_eq!(SixteenBit::decompose(0b1_00001_00010_00011), (1, 2, 3));
    assert_eq!(SixteenBit::compose(1, 2, 3), 0b0_00001_00010_00011);
    assert_eq!(SixteenBit::compose(0xFF, 0, 0), 0b0_11111_00000_00000);
  }

  #[test]
  fn test_twenty_four_bit_is_blue_high() {
    assert_eq!(TwentyFourBit::get(0x10, 0x20, 0x30), 0x30_20_10);
    assert_eq!(TwentyFourBit::split(0x30_20_10), (0x10, 0x20, 0x30));
    assert_eq!(TwentyFourBit::split(0xFF_30_20_10), (0x10, 0x20, 0x30));
  }

  #[test]
  fn test_only_five_shapes() {
    for bpp in [1, 4, 8, 16, 24] {
      assert_eq!(PixelShape::from_bits_per_pixel(bpp).unwrap().bits_per_pixel(), bpp);
    }
    for bpp in [0, 2, 3, 5, 15, 32, 64] {
      assert_eq!(PixelPlane::new(bpp, 1, 1), Err(BmpError::UnsupportedBitDepth(bpp)));
    }
  }

  #[test]
  fn test_rows_are_padded_to_four_bytes() {
    for (bpp, width, stride) in [
      (1, 1, 4),
      (1, 32, 4),
      (1, 33, 8),
      (4, 8, 4),
      (4, 9, 8),
      (8, 2, 4),
      (8, 5, 8),
      (16, 2, 4),
      (16, 3, 8),
      (24, 1, 4),
      (24, 2, 8),
      (24, 4, 12),
    ] {
      let plane = PixelPlane::new(bpp, width, 3).unwrap();
      assert_eq!(plane.stride(), stride, "bpp: {bpp}, width: {width}");
      assert_eq!(plane.as_bytes().len(), stride * 3);
    }
    assert_eq!(PixelPlane::byte_len_for(8, 2, 2), Ok(8));
    assert_eq!(PixelPlane::byte_len_for(8, 0, 9), Ok(0));
  }

  #[test]
  fn test_from_vec_checks_length() {
    assert!(PixelPlane::from_vec(8, 2, 2, vec![0; 8]).is_ok());
    assert_eq!(
      PixelPlane::from_vec(8, 2, 2, vec![0; 4]),
      Err(BmpError::SizeMismatch { declared: 8, actual: 4 })
    );
  }

  #[test]
  fn test_packed_pixels_are_high_bits_first() {
    let mut p = PixelPlane::new(1, 10, 1).unwrap();
    p.set(0, 0, 1).unwrap();
    p.set(9, 0, 1).unwrap();
    assert_eq!(&p.as_bytes()[..2], &[0x80, 0x40]);
    assert_eq!(p.get(0, 0), Ok(1));
    assert_eq!(p.get(1, 0), Ok(0));
    assert_eq!(p.get(9, 0), Ok(1));

    let mut p = PixelPlane::new(4, 3, 1).unwrap();
    p.set(0, 0, 0xA).unwrap();
    p.set(1, 0, 0xB).unwrap();
    p.set(2, 0, 0xC).unwrap();
    assert_eq!(&p.as_bytes()[..2], &[0xAB, 0xC0]);
    assert_eq!(p.get(2, 0), Ok(0xC));
  }

  #[test]
  fn test_wide_pixels_are_little_endian() {
    let mut p = PixelPlane::new(16, 2, 2).unwrap();
    p.set(1, 1, 0x1234).unwrap();
    assert_eq!(p.row(1).unwrap(), &[0, 0, 0x34, 0x12]);
    assert_eq!(p.get(1, 1), Ok(0x1234));

    let mut p = PixelPlane::new(24, 1, 1).unwrap();
    p.set(0, 0, TwentyFourBit::get(0x10, 0x20, 0x30)).unwrap();
    assert_eq!(p.as_bytes(), &[0x30, 0x20, 0x10, 0]);
    assert_eq!(p.get(0, 0), Ok(0x30_20_10));
  }

  #[test]
  fn test_coordinates_are_bounds_checked() {
    let mut p = PixelPlane::new(8, 2, 2).unwrap();
    assert_eq!(p.get(2, 0), Err(BmpError::IndexOutOfRange { index: 2, len: 4 }));
    assert_eq!(p.set(0, 2, 1), Err(BmpError::IndexOutOfRange { index: 4, len: 4 }));
    assert!(p.row(2).is_none());
  }
}
