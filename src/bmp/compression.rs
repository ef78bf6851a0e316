use crate::BmpError;

/// Various possible compression styles for Bmp files.
///
/// This crate only checks that the header holds one of these values. The
/// pixel data of a compressed image is not decoded.
///
/// * Indexed color images *can* use 4 bit RLE or 8 bit RLE.
/// * Any other image can also be stored uncompressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum BmpCompression {
  /// RGB, No compression.
  #[default]
  RgbNoCompression = 0,

  /// RGB, Run-length encoded, 8bpp
  RgbRLE8 = 1,

  /// RGB, Run-length encoded, 4bpp
  RgbRLE4 = 2,

  /// The image is not compressed, and the R, G, and B bit masks in the header
  /// locate the channel bits.
  Bitfields = 3,

  /// A jpeg image is embedded as the pixel data.
  Jpeg = 4,

  /// A png image is embedded as the pixel data.
  Png = 5,

  /// The image is not compressed, and the R, G, B, and A bit masks in the
  /// header locate the channel bits.
  AlphaBitfields = 6,

  /// CMYK, No compression.
  CmykNoCompression = 11,

  /// CMYK, Run-length encoded, 8bpp
  CmykRLE8 = 12,

  /// CMYK, Run-length encoded, 4bpp
  CmykRLE4 = 13,
}
impl TryFrom<u32> for BmpCompression {
  type Error = BmpError;
  #[inline]
  fn try_from(value: u32) -> Result<Self, Self::Error> {
    use BmpCompression::*;
    Ok(match value {
      0 => RgbNoCompression,
      1 => RgbRLE8,
      2 => RgbRLE4,
      3 => Bitfields,
      4 => Jpeg,
      5 => Png,
      6 => AlphaBitfields,
      11 => CmykNoCompression,
      12 => CmykRLE8,
      13 => CmykRLE4,
      _ => return Err(BmpError::UnknownCompression(value)),
    })
  }
}
impl From<BmpCompression> for u32 {
  #[inline]
  #[must_use]
  fn from(c: BmpCompression) -> Self {
    c as u32
  }
}

#[test]
fn test_compression_codes() {
  let known = [0, 1, 2, 3, 4, 5, 6, 11, 12, 13];
  for code in 0..=20_u32 {
    match BmpCompression::try_from(code) {
      Ok(c) => {
        assert!(known.contains(&code), "code: {code}");
        assert_eq!(u32::from(c), code);
      }
      Err(e) => {
        assert!(!known.contains(&code), "code: {code}");
        assert_eq!(e, BmpError::UnknownCompression(code));
      }
    }
  }
}
