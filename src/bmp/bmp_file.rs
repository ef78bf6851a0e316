use super::{
  BmpFileHeader, BmpVersion, ColorTable, InfoHeader, PixelPlane, PixelShape, SixteenBit,
  TwentyFourBit,
};
use crate::{BmpError, Limits};
use alloc::vec::Vec;
use bitfrob::u8_replicate_bits;
use pixel_formats::r8g8b8a8_Srgb;

/// How far along a [BmpFile] is in being built.
///
/// The steps only go forward, one at a time:
///
/// 1. [Empty](Self::Empty): nothing exists yet. Pick a version with
///    [BmpFile::init_header].
/// 2. [HeaderReady](Self::HeaderReady): the info header exists and can be
///    edited. Call [BmpFile::init_color_table] once the bit depth and color
///    count are set.
/// 3. [ColorTableReady](Self::ColorTableReady): the color table exists (or
///    is known to be absent). Call [BmpFile::init_pixel_plane].
/// 4. [Complete](Self::Complete): everything exists, and the file header has
///    its file size and pixel data offset filled in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum BuildState {
  #[default]
  Empty,
  HeaderReady,
  ColorTableReady,
  Complete,
}

/// A whole BMP file: file header, info header, color table, and pixels.
///
/// The color table and pixel plane are shaped by values in the info header,
/// so they're made in stages (see [BuildState]). Once a part is made the
/// header values it depends on can't be changed anymore.
///
/// Decoding with [try_from_bytes](Self::try_from_bytes) gives a file that's
/// already [BuildState::Complete], and [to_bytes](Self::to_bytes) gives back
/// the same bytes.
///
/// All mutation goes through `&mut self`, so one file can't be built from
/// two threads at once. Separate files share nothing.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BmpFile {
  state: BuildState,
  file_header: BmpFileHeader,
  info_header: Option<InfoHeader>,
  color_table: Option<ColorTable>,
  pixel_plane: Option<PixelPlane>,
}
impl Default for BmpFile {
  #[inline]
  fn default() -> Self {
    Self::new()
  }
}
impl BmpFile {
  /// An empty file, in the [BuildState::Empty] state.
  #[inline]
  #[must_use]
  pub const fn new() -> Self {
    Self {
      state: BuildState::Empty,
      file_header: BmpFileHeader::new(),
      info_header: None,
      color_table: None,
      pixel_plane: None,
    }
  }

  /// A file with a fresh info header, in the [BuildState::HeaderReady] state.
  #[inline]
  #[must_use]
  pub fn with_version(version: BmpVersion) -> Self {
    let mut bmp = Self::new();
    bmp.start_header(version);
    bmp
  }

  #[inline]
  #[must_use]
  #[allow(missing_docs)]
  pub const fn state(&self) -> BuildState {
    self.state
  }

  /// The file header.
  ///
  /// The size and offset are only filled in once the file is complete.
  #[inline]
  #[must_use]
  pub const fn file_header(&self) -> &BmpFileHeader {
    &self.file_header
  }

  #[inline]
  #[must_use]
  #[allow(missing_docs)]
  pub const fn info_header(&self) -> Option<&InfoHeader> {
    self.info_header.as_ref()
  }

  /// Mutable access to the info header.
  ///
  /// ## Failure
  /// * [BmpError::NotInitialized] if there's no header yet.
  /// * [BmpError::AlreadyInitialized] once the color table has been made,
  ///   because the header's bit depth and color count are fixed from then on.
  pub fn info_header_mut(&mut self) -> Result<&mut InfoHeader, BmpError> {
    match self.state {
      BuildState::Empty => Err(BmpError::NotInitialized),
      BuildState::HeaderReady => self.info_header.as_mut().ok_or(BmpError::NotInitialized),
      BuildState::ColorTableReady | BuildState::Complete => Err(BmpError::AlreadyInitialized),
    }
  }

  /// The color table, `None` if it's not made yet or if the file has none.
  #[inline]
  #[must_use]
  pub const fn color_table(&self) -> Option<&ColorTable> {
    self.color_table.as_ref()
  }

  /// Mutable access to the color table entries. The entry count is fixed.
  #[inline]
  #[must_use]
  pub fn color_table_mut(&mut self) -> Option<&mut ColorTable> {
    self.color_table.as_mut()
  }

  #[inline]
  #[must_use]
  #[allow(missing_docs)]
  pub const fn pixel_plane(&self) -> Option<&PixelPlane> {
    self.pixel_plane.as_ref()
  }

  /// Mutable access to the pixels. The plane's shape is fixed.
  #[inline]
  #[must_use]
  pub fn pixel_plane_mut(&mut self) -> Option<&mut PixelPlane> {
    self.pixel_plane.as_mut()
  }

  /// Makes the info header for the given version.
  ///
  /// ## Failure
  /// * [BmpError::AlreadyInitialized] unless the file is
  ///   [BuildState::Empty].
  pub fn init_header(&mut self, version: BmpVersion) -> Result<(), BmpError> {
    if self.state != BuildState::Empty {
      return Err(BmpError::AlreadyInitialized);
    }
    self.start_header(version);
    Ok(())
  }

  fn start_header(&mut self, version: BmpVersion) {
    self.info_header = Some(InfoHeader::new(version));
    self.state = BuildState::HeaderReady;
    log::trace!("bmp header ready: {version:?}");
  }

  /// Makes the color table, if the header's bit depth calls for one.
  ///
  /// The table gets `colors_used` entries, or `2**bits_per_pixel` when that's
  /// 0. For more than 8 bits per pixel the file is marked as having no table.
  ///
  /// ## Failure
  /// * [BmpError::NotInitialized] if there's no header yet.
  /// * [BmpError::AlreadyInitialized] if this was already done.
  pub fn init_color_table(&mut self) -> Result<(), BmpError> {
    let header = match self.state {
      BuildState::Empty => return Err(BmpError::NotInitialized),
      BuildState::HeaderReady => self.info_header.as_ref().ok_or(BmpError::NotInitialized)?,
      BuildState::ColorTableReady | BuildState::Complete => {
        return Err(BmpError::AlreadyInitialized)
      }
    };
    let bits_per_pixel = header.bits_per_pixel();
    self.color_table = if ColorTable::present(bits_per_pixel, header.compression()?) {
      Some(ColorTable::new(ColorTable::entry_count_for(header.colors_used(), bits_per_pixel))?)
    } else {
      None
    };
    self.state = BuildState::ColorTableReady;
    log::trace!("bmp color table ready: {:?} entries", self.color_table.as_ref().map(ColorTable::len));
    Ok(())
  }

  /// Makes the pixel plane and fills in the file header's size and offset.
  ///
  /// ## Failure
  /// * [BmpError::NotInitialized] if the color table step isn't done yet.
  /// * [BmpError::AlreadyInitialized] if this was already done.
  /// * [BmpError::UnsupportedBitDepth] for a bit depth other than 1, 4, 8,
  ///   16, or 24.
  /// * [BmpError::SizeMismatch] if the header declares a nonzero image size
  ///   that isn't the plane's (row padded) size.
  pub fn init_pixel_plane(&mut self) -> Result<(), BmpError> {
    let header = match self.state {
      BuildState::Empty | BuildState::HeaderReady => return Err(BmpError::NotInitialized),
      BuildState::ColorTableReady => self.info_header.as_ref().ok_or(BmpError::NotInitialized)?,
      BuildState::Complete => return Err(BmpError::AlreadyInitialized),
    };
    let plane =
      PixelPlane::new(header.bits_per_pixel(), header.width(), header.height().unsigned_abs())?;
    check_image_size(header, &plane)?;
    let (pixel_data_offset, total_file_size) =
      region_sizes(header, self.color_table.as_ref(), &plane)?;
    self.file_header.pixel_data_offset = pixel_data_offset;
    self.file_header.total_file_size = total_file_size;
    self.pixel_plane = Some(plane);
    self.state = BuildState::Complete;
    log::trace!("bmp complete: {total_file_size} bytes, pixels at {pixel_data_offset}");
    Ok(())
  }

  /// Gets the value of pixel `(x, y)`, see [PixelPlane::get].
  ///
  /// ## Failure
  /// * [BmpError::NotInitialized] if there's no pixel plane yet.
  /// * [BmpError::IndexOutOfRange] if the coordinate is outside the image.
  #[inline]
  pub fn pixel(&self, x: u32, y: u32) -> Result<u32, BmpError> {
    self.pixel_plane.as_ref().ok_or(BmpError::NotInitialized)?.get(x, y)
  }

  /// Sets the value of pixel `(x, y)`, see [PixelPlane::set].
  ///
  /// ## Failure
  /// * [BmpError::NotInitialized] if there's no pixel plane yet.
  /// * [BmpError::IndexOutOfRange] if the coordinate is outside the image.
  #[inline]
  pub fn set_pixel(&mut self, x: u32, y: u32, value: u32) -> Result<(), BmpError> {
    self.pixel_plane.as_mut().ok_or(BmpError::NotInitialized)?.set(x, y, value)
  }

  /// Expands the image to opaque RGBA pixels, top row first.
  ///
  /// Indexed pixels are looked up in the color table, and 16-bit channels
  /// are widened to 8 bits. The declared compression isn't consulted, pixel
  /// bytes are always read as the uncompressed encoding of their bit depth.
  ///
  /// ## Failure
  /// * [BmpError::NotInitialized] unless the file is complete.
  /// * [BmpError::IndexOutOfRange] if a pixel names a color table entry that
  ///   doesn't exist.
  pub fn to_rgba(&self) -> Result<Vec<r8g8b8a8_Srgb>, BmpError> {
    let (header, plane) = match (&self.info_header, &self.pixel_plane) {
      (Some(header), Some(plane)) if self.state == BuildState::Complete => (header, plane),
      _ => return Err(BmpError::NotInitialized),
    };
    let width = plane.width();
    let height = plane.height();
    let mut out = Vec::new();
    out.try_reserve_exact((width as usize).saturating_mul(height as usize))?;
    for row in 0..height {
      // bottom-up images store the bottom row first
      let y = if header.height() < 0 { row } else { height - 1 - row };
      for x in 0..width {
        let value = plane.get(x, y)?;
        out.push(match plane.shape() {
          PixelShape::OneBit | PixelShape::FourBit | PixelShape::EightBit => {
            let palette = self.color_table.as_ref().ok_or(BmpError::NotInitialized)?;
            palette.entry(value as usize)?.into()
          }
          PixelShape::SixteenBit => {
            let (r, g, b) = SixteenBit::decompose(value as u16);
            r8g8b8a8_Srgb {
              r: u8_replicate_bits(5, r),
              g: u8_replicate_bits(5, g),
              b: u8_replicate_bits(5, b),
              a: 0xFF,
            }
          }
          PixelShape::TwentyFourBit => {
            let (r, g, b) = TwentyFourBit::split(value);
            r8g8b8a8_Srgb { r, g, b, a: 0xFF }
          }
        });
      }
    }
    Ok(out)
  }

  /// Writes the whole file out as bytes.
  ///
  /// ## Failure
  /// * [BmpError::NotInitialized] unless the file is complete.
  /// * [BmpError::AllocError] if the output can't be allocated.
  pub fn to_bytes(&self) -> Result<Vec<u8>, BmpError> {
    let (header, plane) = match (&self.info_header, &self.pixel_plane) {
      (Some(header), Some(plane)) if self.state == BuildState::Complete => (header, plane),
      _ => return Err(BmpError::NotInitialized),
    };
    let mut out = Vec::new();
    out.try_reserve_exact(self.file_header.total_file_size as usize)?;
    out.extend_from_slice(&<[u8; 14]>::from(self.file_header));
    header.write_to(&mut out);
    if let Some(table) = &self.color_table {
      table.write_to(&mut out);
    }
    debug_assert_eq!(out.len(), self.file_header.pixel_data_offset as usize);
    out.extend_from_slice(plane.as_bytes());
    log::debug!("encoded {:?} bmp, {} bytes", header.version(), out.len());
    Ok(out)
  }

  /// Parses the bytes of a BMP file, with no [Limits].
  ///
  /// See [try_from_bytes_with_limits](Self::try_from_bytes_with_limits).
  #[inline]
  pub fn try_from_bytes(bytes: &[u8]) -> Result<Self, BmpError> {
    Self::try_from_bytes_with_limits(bytes, &Limits::default())
  }

  /// Parses the bytes of a BMP file.
  ///
  /// The file has to be laid out exactly: file header, info header, color
  /// table (if the bit depth has one), then the pixels, with no gaps and
  /// nothing after the pixels.
  ///
  /// ## Failure
  /// * [BmpError::SignatureMismatch] if the data doesn't start with `BM`.
  /// * [BmpError::UnknownVersion] or [BmpError::UnknownCompression] for bad
  ///   header values.
  /// * [BmpError::UnsupportedBitDepth] for bit depths this crate doesn't
  ///   model.
  /// * [BmpError::SizeMismatch] if the declared file size, pixel offset, or
  ///   image size disagrees with the data.
  /// * [BmpError::LimitExceeded] if the dimensions exceed `limits`.
  /// * [BmpError::InsufficientBytes] if the data ends inside a header or the
  ///   color table.
  pub fn try_from_bytes_with_limits(bytes: &[u8], limits: &Limits) -> Result<Self, BmpError> {
    let (file_header, rest) = BmpFileHeader::try_from_bytes(bytes)?;
    if file_header.total_file_size as usize != bytes.len() {
      return Err(BmpError::SizeMismatch {
        declared: file_header.total_file_size as usize,
        actual: bytes.len(),
      });
    }
    let (info_header, rest) = InfoHeader::try_from_bytes(rest)?;
    let bits_per_pixel = info_header.bits_per_pixel();
    let width = info_header.width();
    let height = info_header.height().unsigned_abs();
    limits.check(width, height)?;

    let (color_table, rest) = if ColorTable::present(bits_per_pixel, info_header.compression()?) {
      let count = ColorTable::entry_count_for(info_header.colors_used(), bits_per_pixel);
      let (table, rest) = ColorTable::try_from_bytes(rest, count)?;
      (Some(table), rest)
    } else {
      (None, rest)
    };
    let offset = bytes.len() - rest.len();
    if file_header.pixel_data_offset as usize != offset {
      return Err(BmpError::SizeMismatch {
        declared: file_header.pixel_data_offset as usize,
        actual: offset,
      });
    }

    let plane_len = PixelPlane::byte_len_for(bits_per_pixel, width, height)?;
    if rest.len() != plane_len {
      return Err(BmpError::SizeMismatch { declared: plane_len, actual: rest.len() });
    }
    let mut data = Vec::new();
    data.try_reserve_exact(rest.len())?;
    data.extend_from_slice(rest);
    let plane = PixelPlane::from_vec(bits_per_pixel, width, height, data)?;
    check_image_size(&info_header, &plane)?;
    log::debug!(
      "decoded {:?} bmp: {width}x{height} at {bits_per_pixel} bpp, {} color table entries",
      info_header.version(),
      color_table.as_ref().map_or(0, ColorTable::len)
    );

    Ok(Self {
      state: BuildState::Complete,
      file_header,
      info_header: Some(info_header),
      color_table,
      pixel_plane: Some(plane),
    })
  }
}

/// A nonzero declared image size must be the plane's actual size.
fn check_image_size(header: &InfoHeader, plane: &PixelPlane) -> Result<(), BmpError> {
  let declared = header.image_size() as usize;
  let actual = plane.as_bytes().len();
  if declared != 0 && declared != actual {
    return Err(BmpError::SizeMismatch { declared, actual });
  }
  Ok(())
}

/// The pixel data offset and the total file size.
fn region_sizes(
  header: &InfoHeader, color_table: Option<&ColorTable>, plane: &PixelPlane,
) -> Result<(u32, u32), BmpError> {
  let offset = BmpFileHeader::SIZE + header.byte_len() + color_table.map_or(0, ColorTable::byte_len);
  let total = offset.checked_add(plane.as_bytes().len()).ok_or(BmpError::DimensionsTooLarge)?;
  let offset = u32::try_from(offset).map_err(|_| BmpError::DimensionsTooLarge)?;
  let total = u32::try_from(total).map_err(|_| BmpError::DimensionsTooLarge)?;
  Ok((offset, total))
}
