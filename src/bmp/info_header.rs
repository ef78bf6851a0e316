use super::{BmpCompression, BmpVersion};
use crate::{try_pull_byte_array, try_pull_slice, u16_le, u32_le, BmpError};
use alloc::vec::Vec;

/// Names every field that appears in any info header version.
///
/// [InfoField::CoreWidth] and [InfoField::CoreHeight] are the 16-bit fields of
/// [BmpVersion::Core]. Every later version uses the 32-bit
/// [InfoField::Width] and [InfoField::Height] instead, in the same position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[allow(missing_docs)]
pub enum InfoField {
  /// Byte size of the header. This selects the version and is read-only.
  Size,
  CoreWidth,
  CoreHeight,
  Width,
  Height,
  /// Should always be 1.
  Planes,
  BitsPerPixel,
  /// A [BmpCompression] code.
  Compression,
  /// Byte size of the pixel data, 0 is allowed for uncompressed images.
  ImageSize,
  XPixelsPerMeter,
  YPixelsPerMeter,
  /// Number of color table entries, 0 means `2**bits_per_pixel`.
  ColorsUsed,
  ImportantColors,
  RedMask,
  GreenMask,
  BlueMask,
  AlphaMask,
  CsType,
  EndpointRedX,
  EndpointRedY,
  EndpointRedZ,
  EndpointGreenX,
  EndpointGreenY,
  EndpointGreenZ,
  EndpointBlueX,
  EndpointBlueY,
  EndpointBlueZ,
  RedGamma,
  GreenGamma,
  BlueGamma,
  Intent,
  ProfileOffset,
  ProfileSize,
  Reserved,
}
impl InfoField {
  /// The snake case name of the field.
  #[must_use]
  pub const fn name(self) -> &'static str {
    use InfoField::*;
    match self {
      Size => "size",
      CoreWidth => "core_width",
      CoreHeight => "core_height",
      Width => "width",
      Height => "height",
      Planes => "planes",
      BitsPerPixel => "bits_per_pixel",
      Compression => "compression",
      ImageSize => "image_size",
      XPixelsPerMeter => "x_pixels_per_meter",
      YPixelsPerMeter => "y_pixels_per_meter",
      ColorsUsed => "colors_used",
      ImportantColors => "important_colors",
      RedMask => "red_mask",
      GreenMask => "green_mask",
      BlueMask => "blue_mask",
      AlphaMask => "alpha_mask",
      CsType => "cs_type",
      EndpointRedX => "endpoint_red_x",
      EndpointRedY => "endpoint_red_y",
      EndpointRedZ => "endpoint_red_z",
      EndpointGreenX => "endpoint_green_x",
      EndpointGreenY => "endpoint_green_y",
      EndpointGreenZ => "endpoint_green_z",
      EndpointBlueX => "endpoint_blue_x",
      EndpointBlueY => "endpoint_blue_y",
      EndpointBlueZ => "endpoint_blue_z",
      RedGamma => "red_gamma",
      GreenGamma => "green_gamma",
      BlueGamma => "blue_gamma",
      Intent => "intent",
      ProfileOffset => "profile_offset",
      ProfileSize => "profile_size",
      Reserved => "reserved",
    }
  }
}
impl core::fmt::Display for InfoField {
  fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    f.write_str(self.name())
  }
}

/// One entry of a [FieldLayout]: which field, and how many bits wide it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldDef {
  #[allow(missing_docs)]
  pub field: InfoField,
  /// Either 16 or 32.
  pub bits: u32,
}
impl FieldDef {
  const fn u16(field: InfoField) -> Self {
    Self { field, bits: 16 }
  }
  const fn u32(field: InfoField) -> Self {
    Self { field, bits: 32 }
  }

  /// How many bytes the field takes in the file.
  #[inline]
  #[must_use]
  pub const fn byte_len(self) -> usize {
    (self.bits / 8) as usize
  }

  /// The largest value the field can hold.
  #[inline]
  #[must_use]
  pub const fn max_value(self) -> u32 {
    u32::MAX >> (32 - self.bits)
  }
}

const CORE_GROUP: &[FieldDef] = &[
  FieldDef::u32(InfoField::Size),
  FieldDef::u16(InfoField::CoreWidth),
  FieldDef::u16(InfoField::CoreHeight),
  FieldDef::u16(InfoField::Planes),
  FieldDef::u16(InfoField::BitsPerPixel),
];

const INFO_GROUP: &[FieldDef] = &[
  FieldDef::u32(InfoField::Compression),
  FieldDef::u32(InfoField::ImageSize),
  FieldDef::u32(InfoField::XPixelsPerMeter),
  FieldDef::u32(InfoField::YPixelsPerMeter),
  FieldDef::u32(InfoField::ColorsUsed),
  FieldDef::u32(InfoField::ImportantColors),
];

const V2_GROUP: &[FieldDef] = &[
  FieldDef::u32(InfoField::RedMask),
  FieldDef::u32(InfoField::GreenMask),
  FieldDef::u32(InfoField::BlueMask),
];

const V3_GROUP: &[FieldDef] = &[FieldDef::u32(InfoField::AlphaMask)];

const V4_GROUP: &[FieldDef] = &[
  FieldDef::u32(InfoField::CsType),
  FieldDef::u32(InfoField::EndpointRedX),
  FieldDef::u32(InfoField::EndpointRedY),
  FieldDef::u32(InfoField::EndpointRedZ),
  FieldDef::u32(InfoField::EndpointGreenX),
  FieldDef::u32(InfoField::EndpointGreenY),
  FieldDef::u32(InfoField::EndpointGreenZ),
  FieldDef::u32(InfoField::EndpointBlueX),
  FieldDef::u32(InfoField::EndpointBlueY),
  FieldDef::u32(InfoField::EndpointBlueZ),
  FieldDef::u32(InfoField::RedGamma),
  FieldDef::u32(InfoField::GreenGamma),
  FieldDef::u32(InfoField::BlueGamma),
];

const V5_GROUP: &[FieldDef] = &[
  FieldDef::u32(InfoField::Intent),
  FieldDef::u32(InfoField::ProfileOffset),
  FieldDef::u32(InfoField::ProfileSize),
  FieldDef::u32(InfoField::Reserved),
];

/// The fields a version adds on top of the version before it.
const fn added_group(version: BmpVersion) -> &'static [FieldDef] {
  match version {
    BmpVersion::Core => CORE_GROUP,
    BmpVersion::Info => INFO_GROUP,
    BmpVersion::V2 => V2_GROUP,
    BmpVersion::V3 => V3_GROUP,
    BmpVersion::V4 => V4_GROUP,
    BmpVersion::V5 => V5_GROUP,
  }
}

/// The 32-bit replacement for a 16-bit Core field, if it has one.
const fn widened(field: InfoField) -> Option<FieldDef> {
  match field {
    InfoField::CoreWidth => Some(FieldDef::u32(InfoField::Width)),
    InfoField::CoreHeight => Some(FieldDef::u32(InfoField::Height)),
    _ => None,
  }
}

/// The ordered list of fields in one version of the info header.
///
/// The order is the order of the bytes in the file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FieldLayout {
  version: BmpVersion,
  fields: Vec<FieldDef>,
}
impl FieldLayout {
  /// Builds the layout for a version.
  ///
  /// This starts with the Core fields and then, for each version up to the
  /// requested one, appends the fields that version adds. When going from
  /// Core to Info the 16-bit width and height are replaced in place by the
  /// 32-bit versions.
  #[must_use]
  pub fn build(version: BmpVersion) -> Self {
    let mut fields: Vec<FieldDef> = Vec::new();
    for step in BmpVersion::ALL.into_iter().take_while(|step| *step <= version) {
      if step == BmpVersion::Info {
        for def in fields.iter_mut() {
          if let Some(wide) = widened(def.field) {
            *def = wide;
          }
        }
      }
      fields.extend_from_slice(added_group(step));
    }
    debug_assert_eq!(
      fields.iter().map(|def| def.byte_len()).sum::<usize>(),
      version.header_size() as usize
    );
    Self { version, fields }
  }

  /// The version this layout is for.
  #[inline]
  #[must_use]
  pub const fn version(&self) -> BmpVersion {
    self.version
  }

  /// The fields, in file order.
  #[inline]
  #[must_use]
  pub fn fields(&self) -> &[FieldDef] {
    &self.fields
  }

  /// Position of a field within [fields](Self::fields), if it's present.
  #[inline]
  #[must_use]
  pub fn position(&self, field: InfoField) -> Option<usize> {
    self.fields.iter().position(|def| def.field == field)
  }

  /// The byte offset of a field from the start of the header.
  #[must_use]
  pub fn byte_offset(&self, field: InfoField) -> Option<usize> {
    let i = self.position(field)?;
    Some(self.fields[..i].iter().map(|def| def.byte_len()).sum())
  }

  /// Total byte length, the same as the version's header size.
  #[inline]
  #[must_use]
  pub fn byte_len(&self) -> usize {
    self.fields.iter().map(|def| def.byte_len()).sum()
  }
}

/// A BMP info header of any version.
///
/// The header holds one `u32` value per field of its [FieldLayout], the
/// layout never changes after the header is made. Fields narrower than 32 bits
/// still hold a `u32`, but writing a value that doesn't fit is an error.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct InfoHeader {
  layout: FieldLayout,
  values: Vec<u32>,
}
impl InfoHeader {
  /// Makes a new header of the given version.
  ///
  /// The size field is set, planes is set to 1, everything else is 0.
  #[must_use]
  pub fn new(version: BmpVersion) -> Self {
    let layout = FieldLayout::build(version);
    let values = layout
      .fields()
      .iter()
      .map(|def| match def.field {
        InfoField::Size => version.header_size(),
        InfoField::Planes => 1,
        _ => 0,
      })
      .collect();
    Self { layout, values }
  }

  /// The header's version.
  #[inline]
  #[must_use]
  pub const fn version(&self) -> BmpVersion {
    self.layout.version()
  }

  /// The header's layout.
  #[inline]
  #[must_use]
  pub const fn layout(&self) -> &FieldLayout {
    &self.layout
  }

  /// Each field along with its current value, in file order.
  pub fn iter(&self) -> impl Iterator<Item = (FieldDef, u32)> + '_ {
    self.layout.fields().iter().copied().zip(self.values.iter().copied())
  }

  /// Reads a field.
  ///
  /// ## Failure
  /// * [BmpError::MissingField] if this version doesn't have that field.
  #[inline]
  pub fn get(&self, field: InfoField) -> Result<u32, BmpError> {
    let i = self.layout.position(field).ok_or(BmpError::MissingField(field))?;
    Ok(self.values[i])
  }

  /// Writes a field.
  ///
  /// ## Failure
  /// * [BmpError::MissingField] if this version doesn't have that field.
  /// * [BmpError::ReadOnlyField] when writing [InfoField::Size].
  /// * [BmpError::FieldOverflow] if the value is too wide for the field. The
  ///   value is never truncated to fit.
  /// * [BmpError::UnknownCompression] when writing a [InfoField::Compression]
  ///   value that isn't a [BmpCompression] code.
  pub fn set(&mut self, field: InfoField, value: u32) -> Result<(), BmpError> {
    let i = self.layout.position(field).ok_or(BmpError::MissingField(field))?;
    let def = self.layout.fields()[i];
    if field == InfoField::Size {
      return Err(BmpError::ReadOnlyField(field));
    }
    if value > def.max_value() {
      return Err(BmpError::FieldOverflow { field, value, bits: def.bits });
    }
    if field == InfoField::Compression {
      BmpCompression::try_from(value)?;
    }
    self.values[i] = value;
    Ok(())
  }

  /// Reads a field that might not exist in this version, using 0 if it's
  /// absent.
  #[inline]
  fn get_or_zero(&self, field: InfoField) -> u32 {
    self.get(field).unwrap_or(0)
  }

  /// Image pixel width.
  #[inline]
  #[must_use]
  pub fn width(&self) -> u32 {
    match self.version() {
      BmpVersion::Core => self.get_or_zero(InfoField::CoreWidth),
      _ => self.get_or_zero(InfoField::Width),
    }
  }

  /// Image pixel height.
  ///
  /// * A positive height indicates that the origin is the **bottom** left.
  /// * A negative height indicates that the image origin is the **top** left.
  ///   This is only possible from [BmpVersion::Info] onward.
  #[inline]
  #[must_use]
  pub fn height(&self) -> i32 {
    match self.version() {
      BmpVersion::Core => self.get_or_zero(InfoField::CoreHeight) as i32,
      _ => self.get_or_zero(InfoField::Height) as i32,
    }
  }

  /// Bits per pixel.
  #[inline]
  #[must_use]
  pub fn bits_per_pixel(&self) -> u16 {
    self.get_or_zero(InfoField::BitsPerPixel) as u16
  }

  /// Compression method. A Core header is always uncompressed.
  #[inline]
  pub fn compression(&self) -> Result<BmpCompression, BmpError> {
    BmpCompression::try_from(self.get_or_zero(InfoField::Compression))
  }

  /// The declared byte size of the pixel data, or 0 when it's not declared.
  #[inline]
  #[must_use]
  pub fn image_size(&self) -> u32 {
    self.get_or_zero(InfoField::ImageSize)
  }

  /// The declared number of color table entries, or 0 for the default count.
  #[inline]
  #[must_use]
  pub fn colors_used(&self) -> u32 {
    self.get_or_zero(InfoField::ColorsUsed)
  }

  /// Byte size of the header.
  #[inline]
  #[must_use]
  pub fn byte_len(&self) -> usize {
    self.version().header_size() as usize
  }

  /// Appends the header's bytes to `out`.
  pub fn write_to(&self, out: &mut Vec<u8>) {
    for (def, value) in self.iter() {
      match def.bits {
        16 => out.extend_from_slice(&(value as u16).to_le_bytes()),
        _ => out.extend_from_slice(&value.to_le_bytes()),
      }
    }
  }

  /// Tries to get the info header and remaining bytes.
  ///
  /// ## Failure
  /// * [BmpError::InsufficientBytes] if the data ends early.
  /// * [BmpError::UnknownVersion] if the size field isn't a known version.
  /// * [BmpError::UnknownCompression] if the compression code isn't known.
  pub fn try_from_bytes(bytes: &[u8]) -> Result<(Self, &[u8]), BmpError> {
    let (size_bytes, _) = try_pull_byte_array::<4>(bytes)?;
    let version = BmpVersion::resolve(u32::from_le_bytes(size_bytes))?;
    log::debug!("info header is {version:?}");
    let (mut cursor, rest) = try_pull_slice(bytes, version.header_size() as usize)?;
    let layout = FieldLayout::build(version);
    let mut values = Vec::with_capacity(layout.fields().len());
    for def in layout.fields() {
      let (field_bytes, tail) = cursor.split_at(def.byte_len());
      cursor = tail;
      let value = match def.bits {
        16 => u32::from(u16_le(field_bytes)),
        _ => u32_le(field_bytes),
      };
      if def.field == InfoField::Compression {
        BmpCompression::try_from(value)?;
      }
      values.push(value);
    }
    Ok((Self { layout, values }, rest))
  }
}
