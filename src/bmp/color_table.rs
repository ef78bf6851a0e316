use super::BmpCompression;
use crate::{try_pull_slice, BmpError};
use alloc::vec::Vec;
use bytemuck::cast_slice;
use pixel_formats::r8g8b8a8_Srgb;

/// One color table entry.
///
/// In the file an entry is stored as `[blue, green, red, reserved]`, the same
/// channel order as a 24-bit pixel. The reserved byte is usually 0, but it's
/// kept as-is so that files are written back exactly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub struct ColorEntry {
  pub red: u8,
  pub green: u8,
  pub blue: u8,
  pub reserved: u8,
}
impl From<[u8; 4]> for ColorEntry {
  #[inline]
  #[must_use]
  fn from([blue, green, red, reserved]: [u8; 4]) -> Self {
    Self { red, green, blue, reserved }
  }
}
impl From<ColorEntry> for [u8; 4] {
  #[inline]
  #[must_use]
  fn from(c: ColorEntry) -> Self {
    [c.blue, c.green, c.red, c.reserved]
  }
}
impl From<ColorEntry> for r8g8b8a8_Srgb {
  /// Palette colors are always opaque, the reserved byte is not an alpha
  /// channel.
  #[inline]
  #[must_use]
  fn from(c: ColorEntry) -> Self {
    r8g8b8a8_Srgb { r: c.red, g: c.green, b: c.blue, a: 0xFF }
  }
}

/// The color table (aka "palette") of an indexed color image.
///
/// A pixel value of `i` in an indexed image means "the color of entry `i`".
/// Entry 0 has no special meaning (it's not "transparent" or anything).
///
/// A [BmpFile](super::BmpFile) keeps an `Option<ColorTable>`: `None` means the
/// file has no color table at all, which is different from a table with 0
/// entries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ColorTable {
  entries: Vec<ColorEntry>,
}
impl ColorTable {
  /// Bytes per entry in the file.
  pub const ENTRY_SIZE: usize = 4;

  /// Is there a color table for this bit depth?
  ///
  /// This is true for 8 bits per pixel or less. The compression doesn't
  /// change the answer.
  #[inline]
  #[must_use]
  pub const fn present(bits_per_pixel: u16, _compression: BmpCompression) -> bool {
    bits_per_pixel <= 8
  }

  /// Number of entries implied by the header values.
  ///
  /// A `colors_used` of 0 means `2**bits_per_pixel` entries (at most 256).
  /// When there's no color table at all for the bit depth this is 0.
  #[inline]
  #[must_use]
  pub const fn entry_count_for(colors_used: u32, bits_per_pixel: u16) -> usize {
    if bits_per_pixel > 8 {
      0
    } else if colors_used != 0 {
      colors_used as usize
    } else {
      let full = 1_usize << bits_per_pixel;
      if full < 256 {
        full
      } else {
        256
      }
    }
  }

  /// Makes a table of `entry_count` zeroed entries.
  ///
  /// ## Failure
  /// * [BmpError::AllocError] if the memory can't be allocated.
  pub fn new(entry_count: usize) -> Result<Self, BmpError> {
    let mut entries = Vec::new();
    entries.try_reserve_exact(entry_count)?;
    entries.resize(entry_count, ColorEntry::default());
    Ok(Self { entries })
  }

  /// Number of entries.
  #[inline]
  #[must_use]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// If the table has no entries.
  #[inline]
  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  /// Byte size of the table in the file.
  #[inline]
  #[must_use]
  pub fn byte_len(&self) -> usize {
    self.entries.len() * Self::ENTRY_SIZE
  }

  /// All the entries, in palette index order.
  #[inline]
  #[must_use]
  pub fn entries(&self) -> &[ColorEntry] {
    &self.entries
  }

  /// Gets an entry, reserved byte included.
  #[inline]
  pub fn entry(&self, index: usize) -> Result<ColorEntry, BmpError> {
    self.entries.get(index).copied().ok_or(BmpError::IndexOutOfRange { index, len: self.len() })
  }

  /// Replaces an entry, reserved byte included.
  #[inline]
  pub fn set_entry(&mut self, index: usize, entry: ColorEntry) -> Result<(), BmpError> {
    let len = self.len();
    let slot = self.entries.get_mut(index).ok_or(BmpError::IndexOutOfRange { index, len })?;
    *slot = entry;
    Ok(())
  }

  /// Gets the `(r, g, b)` color of an entry.
  ///
  /// ## Failure
  /// * [BmpError::IndexOutOfRange] if `index >= self.len()`.
  #[inline]
  pub fn get(&self, index: usize) -> Result<(u8, u8, u8), BmpError> {
    let c = self.entry(index)?;
    Ok((c.red, c.green, c.blue))
  }

  /// Sets the `(r, g, b)` color of an entry, leaving its reserved byte alone.
  ///
  /// ## Failure
  /// * [BmpError::IndexOutOfRange] if `index >= self.len()`.
  #[inline]
  pub fn set(&mut self, index: usize, r: u8, g: u8, b: u8) -> Result<(), BmpError> {
    let reserved = self.entry(index)?.reserved;
    self.set_entry(index, ColorEntry { red: r, green: g, blue: b, reserved })
  }

  /// Appends the table's bytes to `out`.
  pub fn write_to(&self, out: &mut Vec<u8>) {
    for entry in self.entries.iter().copied() {
      out.extend_from_slice(&<[u8; 4]>::from(entry));
    }
  }

  /// Tries to read `entry_count` entries from the front of `bytes`, giving
  /// the table and the remaining bytes.
  ///
  /// ## Failure
  /// * [BmpError::InsufficientBytes] if the data ends early. This is checked
  ///   before any allocation.
  pub fn try_from_bytes(bytes: &[u8], entry_count: usize) -> Result<(Self, &[u8]), BmpError> {
    let bytes_needed =
      entry_count.checked_mul(Self::ENTRY_SIZE).ok_or(BmpError::InsufficientBytes)?;
    let (table_bytes, rest) = try_pull_slice(bytes, bytes_needed)?;
    let mut table = Self::new(entry_count)?;
    for (slot, quad) in table.entries.iter_mut().zip(cast_slice::<u8, [u8; 4]>(table_bytes)) {
      *slot = ColorEntry::from(*quad);
    }
    Ok((table, rest))
  }
}
