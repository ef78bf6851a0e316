use crate::BmpError;

/// Resource limits applied while decoding.
///
/// All fields default to `None` (no limit). Decoding never allocates more
/// than the input slice can account for, so limits are only needed when you
/// want to reject large but well-formed images early.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Limits {
  /// Maximum image width in pixels.
  pub max_width: Option<u32>,
  /// Maximum image height in pixels (sign ignored).
  pub max_height: Option<u32>,
  /// Maximum pixel count (width * height).
  pub max_pixels: Option<u64>,
}

impl Limits {
  /// Check dimensions against limits.
  pub(crate) fn check(&self, width: u32, height: u32) -> Result<(), BmpError> {
    if self.max_width.is_some_and(|max_w| width > max_w) {
      log::debug!("width {width} exceeds limit {:?}", self.max_width);
      return Err(BmpError::LimitExceeded);
    }
    if self.max_height.is_some_and(|max_h| height > max_h) {
      log::debug!("height {height} exceeds limit {:?}", self.max_height);
      return Err(BmpError::LimitExceeded);
    }
    let pixels = u64::from(width) * u64::from(height);
    if self.max_pixels.is_some_and(|max_px| pixels > max_px) {
      log::debug!("pixel count {pixels} exceeds limit {:?}", self.max_pixels);
      return Err(BmpError::LimitExceeded);
    }
    Ok(())
  }
}

#[test]
fn test_limits_check() {
  assert_eq!(Limits::default().check(u32::MAX, u32::MAX), Ok(()));
  let limits = Limits { max_width: Some(10), max_height: Some(20), max_pixels: Some(150) };
  assert_eq!(limits.check(10, 15), Ok(()));
  assert_eq!(limits.check(11, 1), Err(BmpError::LimitExceeded));
  assert_eq!(limits.check(1, 21), Err(BmpError::LimitExceeded));
  assert_eq!(limits.check(10, 16), Err(BmpError::LimitExceeded));
}
