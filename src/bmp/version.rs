use crate::BmpError;

/// The versions of the BMP info header.
///
/// Each version is identified by the byte size of the header, which is the
/// first `u32` of the header. The variants are ordered oldest to newest, and
/// each newer version contains all the fields of the older ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum BmpVersion {
  /// Windows 2.0 and OS/2 1.x, the 12 byte `BITMAPCOREHEADER`.
  Core,
  /// Windows 3.1 or later, the 40 byte `BITMAPINFOHEADER`.
  ///
  /// This is the most commonly used header.
  Info,
  /// The 52 byte `BITMAPV2INFOHEADER`, adds RGB bit masks.
  V2,
  /// The 56 byte `BITMAPV3INFOHEADER`, adds an alpha bit mask.
  V3,
  /// The 108 byte `BITMAPV4HEADER`, adds color space info.
  V4,
  /// The 124 byte `BITMAPV5HEADER`, adds color profile info.
  V5,
}
impl BmpVersion {
  /// All versions, oldest first.
  pub const ALL: [Self; 6] = [Self::Core, Self::Info, Self::V2, Self::V3, Self::V4, Self::V5];

  /// The byte size of this version's info header.
  #[inline]
  #[must_use]
  pub const fn header_size(self) -> u32 {
    match self {
      Self::Core => 12,
      Self::Info => 40,
      Self::V2 => 52,
      Self::V3 => 56,
      Self::V4 => 108,
      Self::V5 => 124,
    }
  }

  /// Finds the version whose header is exactly `declared_size` bytes.
  ///
  /// ## Failure
  /// * [BmpError::UnknownVersion] if no version matches. There's no "closest
  ///   match", because guessing wrong would throw off every later field.
  #[inline]
  pub fn resolve(declared_size: u32) -> Result<Self, BmpError> {
    Self::ALL
      .into_iter()
      .find(|v| v.header_size() == declared_size)
      .ok_or(BmpError::UnknownVersion(declared_size))
  }
}
impl TryFrom<u32> for BmpVersion {
  type Error = BmpError;
  #[inline]
  fn try_from(declared_size: u32) -> Result<Self, Self::Error> {
    Self::resolve(declared_size)
  }
}
impl From<BmpVersion> for u32 {
  #[inline]
  #[must_use]
  fn from(v: BmpVersion) -> Self {
    v.header_size()
  }
}

#[test]
fn test_resolve_known_sizes() {
  for v in BmpVersion::ALL {
    assert_eq!(BmpVersion::resolve(v.header_size()), Ok(v));
    assert_eq!(BmpVersion::try_from(u32::from(v)), Ok(v));
  }
}

#[test]
fn test_resolve_unknown_sizes() {
  // OS/2 2.x headers (16 and 64) are deliberately not known sizes.
  for size in [0, 1, 11, 13, 16, 39, 41, 64, 107, 125, u32::MAX] {
    assert_eq!(BmpVersion::resolve(size), Err(BmpError::UnknownVersion(size)), "size: {size}");
  }
}

#[test]
fn test_versions_are_ordered_by_size() {
  for pair in BmpVersion::ALL.windows(2) {
    assert!(pair[0] < pair[1]);
    assert!(pair[0].header_size() < pair[1].header_size());
  }
}
