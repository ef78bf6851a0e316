#![forbid(unsafe_code)]

//! Just has shorthands for the little-endian int handling the BMP layout
//! needs.

use crate::BmpError;

#[inline]
#[must_use]
pub fn u16_le(bytes: &[u8]) -> u16 {
  u16::from_le_bytes(bytes.try_into().unwrap())
}

#[inline]
#[must_use]
pub fn u32_le(bytes: &[u8]) -> u32 {
  u32::from_le_bytes(bytes.try_into().unwrap())
}

/// Splits `N` bytes off the front of the slice.
#[inline]
pub fn try_pull_byte_array<const N: usize>(bytes: &[u8]) -> Result<([u8; N], &[u8]), BmpError> {
  if bytes.len() >= N {
    let (head, tail) = bytes.split_at(N);
    let a: [u8; N] = head.try_into().unwrap();
    Ok((a, tail))
  } else {
    Err(BmpError::InsufficientBytes)
  }
}

/// Splits `count` bytes off the front of the slice.
#[inline]
pub fn try_pull_slice(bytes: &[u8], count: usize) -> Result<(&[u8], &[u8]), BmpError> {
  if bytes.len() >= count {
    Ok(bytes.split_at(count))
  } else {
    Err(BmpError::InsufficientBytes)
  }
}

#[test]
fn test_pull_helpers() {
  let bytes = [1_u8, 2, 3, 4, 5];
  let (a, rest) = try_pull_byte_array::<2>(&bytes).unwrap();
  assert_eq!(a, [1, 2]);
  assert_eq!(rest, &[3, 4, 5]);
  assert_eq!(try_pull_byte_array::<6>(&bytes), Err(BmpError::InsufficientBytes));
  assert_eq!(try_pull_slice(&bytes, 5).unwrap(), (&bytes[..], &[][..]));
  assert_eq!(try_pull_slice(&bytes, 6), Err(BmpError::InsufficientBytes));
  assert_eq!(u16_le(&[0x34, 0x12]), 0x1234);
  assert_eq!(u32_le(&[0x78, 0x56, 0x34, 0x12]), 0x1234_5678);
}
