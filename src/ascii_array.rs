use core::fmt::Write;

/// A fixed group of bytes that's meant to be read as ascii, such as the `BM`
/// signature at the start of a file.
///
/// Nothing checks the encoding. `Debug` casts each byte to a `char` and shows
/// the result in quotes, so a bad signature shows up as readable text in error
/// output instead of a list of numbers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct AsciiArray<const N: usize>(pub [u8; N]);

impl<const N: usize> Default for AsciiArray<N> {
  #[inline]
  fn default() -> Self {
    Self([0; N])
  }
}

impl<const N: usize> core::fmt::Debug for AsciiArray<N> {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_char('\"')?;
    self.0.iter().try_for_each(|&u| f.write_char(u as char))?;
    f.write_char('\"')
  }
}

#[test]
fn test_ascii_array_debug() {
  extern crate std;
  use std::format;

  assert_eq!(format!("{:?}", AsciiArray(*b"BM")), "\"BM\"");
  assert_eq!(format!("{:?}", AsciiArray([b'B', 0x7F])), "\"B\u{7F}\"");
  assert_eq!(AsciiArray::<2>::default(), AsciiArray([0, 0]));
}
