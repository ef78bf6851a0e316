use crate::bmp::InfoField;

/// An error from the `bmp_layout` crate.
///
/// Every operation that can fail hands one of these back to the caller. None
/// of the operations in this crate have any hidden state, so trying the same
/// thing again with the same inputs will give the same error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, thiserror::Error)]
#[non_exhaustive]
pub enum BmpError {
  /// The declared info header size isn't one of the six known versions.
  #[error("no info header version is {0} bytes long")]
  UnknownVersion(u32),

  /// A value was too wide for the header field it was written to.
  #[error("value {value} does not fit in the {bits}-bit `{field}` field")]
  FieldOverflow {
    #[allow(missing_docs)]
    field: InfoField,
    #[allow(missing_docs)]
    value: u32,
    #[allow(missing_docs)]
    bits: u32,
  },

  /// The field isn't part of this header version's layout.
  #[error("the `{0}` field is not part of this info header version")]
  MissingField(InfoField),

  /// The field is derived from the header version and can't be written.
  #[error("the `{0}` field is read-only")]
  ReadOnlyField(InfoField),

  /// The compression code isn't one of the ten defined kinds.
  #[error("unknown compression code {0}")]
  UnknownCompression(u32),

  /// The bit depth isn't 1, 4, 8, 16, or 24.
  #[error("unsupported bit depth: {0} bits per pixel")]
  UnsupportedBitDepth(u16),

  /// A 1-bit pixel accessor was given a bit index outside of `0..=7`.
  #[error("bit index {0} is out of range")]
  BitIndexOutOfRange(u32),

  /// A 4-bit pixel accessor was given a nibble index other than 0 or 1.
  #[error("nibble index {0} is invalid")]
  InvalidNibbleIndex(u32),

  /// A palette index or pixel coordinate was outside of the valid range.
  #[error("index {index} is out of range for length {len}")]
  IndexOutOfRange {
    #[allow(missing_docs)]
    index: usize,
    #[allow(missing_docs)]
    len: usize,
  },

  /// A construction step was attempted before the steps it depends on.
  #[error("an earlier construction step has not been done yet")]
  NotInitialized,

  /// A construction step was attempted after it had already been done.
  #[error("this construction step was already done")]
  AlreadyInitialized,

  /// The data doesn't start with `BM`.
  #[error("the data does not start with the `BM` signature")]
  SignatureMismatch,

  /// A declared size or offset doesn't agree with the actual data.
  #[error("declared size {declared} does not match actual size {actual}")]
  SizeMismatch {
    #[allow(missing_docs)]
    declared: usize,
    #[allow(missing_docs)]
    actual: usize,
  },

  /// The data ended before a complete structure could be read.
  #[error("unexpected end of input")]
  InsufficientBytes,

  /// The image dimensions overflow the size computations.
  #[error("image dimensions are too large")]
  DimensionsTooLarge,

  /// The image dimensions exceed the configured [Limits](crate::Limits).
  #[error("image dimensions exceed the configured limits")]
  LimitExceeded,

  /// The allocator couldn't give us enough space.
  #[error("allocation failed")]
  AllocError,
}

impl From<alloc::collections::TryReserveError> for BmpError {
  #[inline]
  fn from(_: alloc::collections::TryReserveError) -> Self {
    Self::AllocError
  }
}

#[test]
fn test_error_messages() {
  extern crate std;
  use std::string::ToString;

  assert_eq!(BmpError::UnknownVersion(41).to_string(), "no info header version is 41 bytes long");
  let e = BmpError::FieldOverflow { field: InfoField::Planes, value: 65536, bits: 16 };
  assert_eq!(e.to_string(), "value 65536 does not fit in the 16-bit `planes` field");
}
