use bmp_layout::{
  bmp::{BmpFile, BmpVersion, BuildState, InfoField, SixteenBit, TwentyFourBit},
  BmpError, Limits,
};
use walkdir::WalkDir;

use crate::rand_bytes;

fn read_fixture(name: &str) -> Vec<u8> {
  std::fs::read(format!("tests/bmp/fixtures/{name}")).unwrap()
}

/// Builds a complete file, with the width/height set in whichever fields the
/// version has.
fn build(version: BmpVersion, bpp: u16, width: u32, height: u32) -> BmpFile {
  let mut bmp = BmpFile::with_version(version);
  let h = bmp.info_header_mut().unwrap();
  if version == BmpVersion::Core {
    h.set(InfoField::CoreWidth, width).unwrap();
    h.set(InfoField::CoreHeight, height).unwrap();
  } else {
    h.set(InfoField::Width, width).unwrap();
    h.set(InfoField::Height, height).unwrap();
  }
  h.set(InfoField::BitsPerPixel, u32::from(bpp)).unwrap();
  bmp.init_color_table().unwrap();
  bmp.init_pixel_plane().unwrap();
  bmp
}

#[test]
fn test_bmps_do_not_panic_decoder() {
  // iter ALL files in the test folder, even non-bmp files shouldn't panic it.
  for entry in WalkDir::new("tests/").into_iter().filter_map(|e| e.ok()) {
    if entry.file_type().is_dir() {
      continue;
    }
    println!("{}", entry.path().display());
    let v = match std::fs::read(entry.path()) {
      Ok(v) => v,
      Err(e) => {
        println!("Error reading file: {e:?}");
        continue;
      }
    };
    // anything that decodes must encode back to the same bytes
    if let Ok(bmp) = BmpFile::try_from_bytes(&v) {
      assert_eq!(bmp.to_bytes().unwrap(), v, "{}", entry.path().display());
      let _ = bmp.to_rgba();
    }
  }
}

#[test]
fn test_random_bytes_do_not_panic_decoder() {
  for len in [0, 1, 13, 14, 26, 54, 70, 200, 1024] {
    let mut v = rand_bytes(len);
    let _ = BmpFile::try_from_bytes(&v);
    // also with a valid tag, so that the header parsing is reached
    if len >= 2 {
      v[0] = b'B';
      v[1] = b'M';
      let _ = BmpFile::try_from_bytes(&v);
    }
  }
}

#[test]
fn test_fixtures_decode() {
  let bmp = BmpFile::try_from_bytes(&read_fixture("info_8bpp_2x2.bmp")).unwrap();
  assert_eq!(bmp.state(), BuildState::Complete);
  assert_eq!(bmp.info_header().unwrap().version(), BmpVersion::Info);
  assert_eq!(bmp.file_header().pixel_data_offset, 62);
  assert_eq!(bmp.color_table().unwrap().get(1), Ok((255, 0, 0)));
  assert_eq!(bmp.pixel(0, 0), Ok(1));
  assert_eq!(bmp.pixel(1, 1), Ok(1));

  let bmp = BmpFile::try_from_bytes(&read_fixture("core_24bpp_2x2.bmp")).unwrap();
  assert_eq!(bmp.info_header().unwrap().version(), BmpVersion::Core);
  assert_eq!(bmp.file_header().reserved1, 0x1234);
  assert!(bmp.color_table().is_none());
  assert_eq!(bmp.pixel(0, 0), Ok(TwentyFourBit::get(255, 0, 0)));
  assert_eq!(bmp.pixel(1, 1), Ok(0xFFFFFF));

  let bmp = BmpFile::try_from_bytes(&read_fixture("v5_1bpp_top_down.bmp")).unwrap();
  assert_eq!(bmp.info_header().unwrap().height(), -2);
  assert_eq!(bmp.color_table().unwrap().len(), 2);
  let row0: Vec<u32> = (0..9).map(|x| bmp.pixel(x, 0).unwrap()).collect();
  assert_eq!(row0, [1, 0, 1, 0, 1, 0, 1, 0, 1]);
  // top-down, so the first stored row is also the first rgba row
  let rgba = bmp.to_rgba().unwrap();
  assert_eq!((rgba[0].r, rgba[1].r, rgba[9].r, rgba[10].r), (255, 0, 0, 255));

  let bmp = BmpFile::try_from_bytes(&read_fixture("v4_16bpp_3x1.bmp")).unwrap();
  assert_eq!(bmp.pixel(0, 0).map(|p| SixteenBit::decompose(p as u16)), Ok((31, 0, 0)));
  assert_eq!(bmp.pixel(2, 0).map(|p| SixteenBit::decompose(p as u16)), Ok((0, 0, 31)));

  let bmp = BmpFile::try_from_bytes(&read_fixture("v3_4bpp_3x1.bmp")).unwrap();
  assert_eq!(bmp.color_table().unwrap().len(), 16);
  let row: Vec<u32> = (0..3).map(|x| bmp.pixel(x, 0).unwrap()).collect();
  assert_eq!(row, [0x0, 0xF, 0x5]);
}

#[test]
fn test_hostile_fixtures_are_rejected() {
  assert_eq!(
    BmpFile::try_from_bytes(&read_fixture("hostile_truncated.bmp")),
    Err(BmpError::SizeMismatch { declared: 70, actual: 40 })
  );
  assert_eq!(
    BmpFile::try_from_bytes(&read_fixture("hostile_os2_header.bmp")),
    Err(BmpError::UnknownVersion(64))
  );
}

#[test]
fn test_two_by_two_indexed_example() {
  let mut bmp = BmpFile::with_version(BmpVersion::Info);
  let h = bmp.info_header_mut().unwrap();
  h.set(InfoField::Width, 2).unwrap();
  h.set(InfoField::Height, 2).unwrap();
  h.set(InfoField::BitsPerPixel, 8).unwrap();
  h.set(InfoField::ColorsUsed, 2).unwrap();
  bmp.init_color_table().unwrap();
  bmp.color_table_mut().unwrap().set(1, 255, 0, 0).unwrap();
  bmp.init_pixel_plane().unwrap();
  bmp.set_pixel(0, 0, 1).unwrap();
  bmp.set_pixel(1, 1, 1).unwrap();

  let bytes = bmp.to_bytes().unwrap();
  assert_eq!(bytes.len(), 70);
  assert_eq!(&bytes[0..2], b"BM");
  assert_eq!(&bytes[2..6], &70_u32.to_le_bytes());
  assert_eq!(&bytes[10..14], &62_u32.to_le_bytes());
  assert_eq!(&bytes[14..18], &40_u32.to_le_bytes());
  assert_eq!(&bytes[58..62], &[0, 0, 255, 0]);
  assert_eq!(&bytes[62..], &[1, 0, 0, 0, 0, 1, 0, 0]);
  let back = BmpFile::try_from_bytes(&bytes).unwrap();
  assert_eq!(back, bmp);

  // the fixture is the same picture with its optional fields filled in
  let h = bmp.info_header().unwrap();
  let mut filled = BmpFile::with_version(h.version());
  let f = filled.info_header_mut().unwrap();
  for (def, value) in h.iter().skip(1) {
    f.set(def.field, value).unwrap();
  }
  f.set(InfoField::ImageSize, 8).unwrap();
  f.set(InfoField::XPixelsPerMeter, 2835).unwrap();
  f.set(InfoField::YPixelsPerMeter, 2835).unwrap();
  filled.init_color_table().unwrap();
  filled.color_table_mut().unwrap().set(1, 255, 0, 0).unwrap();
  filled.init_pixel_plane().unwrap();
  let pixels = bmp.pixel_plane().unwrap().as_bytes();
  filled.pixel_plane_mut().unwrap().as_bytes_mut().copy_from_slice(pixels);
  assert_eq!(filled.to_bytes().unwrap(), read_fixture("info_8bpp_2x2.bmp"));
}

#[test]
fn test_every_version_and_depth_round_trips() {
  for version in BmpVersion::ALL {
    for bpp in [1_u16, 4, 8, 16, 24] {
      let (width, height) = (5, 3);
      let mut bmp = build(version, bpp, width, height);
      let max = if bpp == 24 { 0xFF_FFFF } else { (1_u32 << bpp) - 1 };
      for y in 0..height {
        for x in 0..width {
          bmp.set_pixel(x, y, (x * 7 + y * 13) & max).unwrap();
        }
      }
      let bytes = bmp.to_bytes().unwrap();
      assert_eq!(bytes.len(), bmp.file_header().total_file_size as usize);
      let back = BmpFile::try_from_bytes(&bytes).unwrap();
      assert_eq!(back, bmp, "{version:?} at {bpp} bpp");
      assert_eq!(back.to_bytes().unwrap(), bytes);
      for y in 0..height {
        for x in 0..width {
          assert_eq!(back.pixel(x, y), Ok((x * 7 + y * 13) & max));
        }
      }
    }
  }
}

#[test]
fn test_pixel_offset_matches_layout() {
  for version in BmpVersion::ALL {
    let header = 14 + version.header_size();
    assert_eq!(build(version, 1, 1, 1).file_header().pixel_data_offset, header + 2 * 4);
    assert_eq!(build(version, 4, 1, 1).file_header().pixel_data_offset, header + 16 * 4);
    assert_eq!(build(version, 8, 1, 1).file_header().pixel_data_offset, header + 256 * 4);
    assert_eq!(build(version, 16, 1, 1).file_header().pixel_data_offset, header);
    assert_eq!(build(version, 24, 1, 1).file_header().pixel_data_offset, header);
  }
}

#[test]
fn test_decode_checks_declared_sizes() {
  let good = build(BmpVersion::V3, 24, 2, 2).to_bytes().unwrap();

  let mut v = good.clone();
  v.push(0);
  assert_eq!(
    BmpFile::try_from_bytes(&v),
    Err(BmpError::SizeMismatch { declared: good.len(), actual: good.len() + 1 })
  );

  let mut v = good.clone();
  v[10] += 4;
  assert_eq!(BmpFile::try_from_bytes(&v), Err(BmpError::SizeMismatch { declared: 74, actual: 70 }));

  let mut v = good.clone();
  v[0] = b'X';
  assert_eq!(BmpFile::try_from_bytes(&v), Err(BmpError::SignatureMismatch));

  // compression code 7 isn't a thing
  let mut v = good.clone();
  v[30] = 7;
  assert_eq!(BmpFile::try_from_bytes(&v), Err(BmpError::UnknownCompression(7)));

  // 32 bpp has no pixel shape
  let mut v = good.clone();
  v[28] = 32;
  assert_eq!(BmpFile::try_from_bytes(&v), Err(BmpError::UnsupportedBitDepth(32)));
}

#[test]
fn test_decode_checks_declared_image_size() {
  // 2x2 at 8 bpp is 8 bytes of pixels, the image size field is at byte 34
  let good = build(BmpVersion::Info, 8, 2, 2).to_bytes().unwrap();

  let mut v = good.clone();
  v[34] = 4;
  assert_eq!(BmpFile::try_from_bytes(&v), Err(BmpError::SizeMismatch { declared: 4, actual: 8 }));

  let mut v = good;
  v[34] = 8;
  let bmp = BmpFile::try_from_bytes(&v).unwrap();
  assert_eq!(bmp.state(), BuildState::Complete);
  assert_eq!(bmp.info_header().unwrap().image_size(), 8);
  assert_eq!(bmp.to_bytes().unwrap(), v);
}

#[test]
fn test_decode_respects_limits() {
  let bytes = build(BmpVersion::Info, 8, 10, 4).to_bytes().unwrap();
  let limits = Limits { max_width: Some(8), ..Limits::default() };
  assert_eq!(BmpFile::try_from_bytes_with_limits(&bytes, &limits), Err(BmpError::LimitExceeded));
  let limits = Limits { max_pixels: Some(40), ..Limits::default() };
  assert!(BmpFile::try_from_bytes_with_limits(&bytes, &limits).is_ok());
}

#[test]
fn test_header_fields_survive_round_trip() {
  let mut bmp = BmpFile::with_version(BmpVersion::V5);
  let h = bmp.info_header_mut().unwrap();
  h.set(InfoField::Width, 1).unwrap();
  h.set(InfoField::Height, (-1_i32) as u32).unwrap();
  h.set(InfoField::BitsPerPixel, 24).unwrap();
  h.set(InfoField::XPixelsPerMeter, 2835).unwrap();
  h.set(InfoField::AlphaMask, 0xFF00_0000).unwrap();
  h.set(InfoField::Intent, 4).unwrap();
  h.set(InfoField::Reserved, 0xDEAD_BEEF).unwrap();
  assert_eq!(h.set(InfoField::CoreWidth, 1), Err(BmpError::MissingField(InfoField::CoreWidth)));
  bmp.init_color_table().unwrap();
  bmp.init_pixel_plane().unwrap();

  let bytes = bmp.to_bytes().unwrap();
  assert_eq!(bytes.len(), 14 + 124 + 4);
  let back = BmpFile::try_from_bytes(&bytes).unwrap();
  let h = back.info_header().unwrap();
  assert_eq!(h.height(), -1);
  assert_eq!(h.get(InfoField::AlphaMask), Ok(0xFF00_0000));
  assert_eq!(h.get(InfoField::Reserved), Ok(0xDEAD_BEEF));
  assert_eq!(h.get(InfoField::Intent), Ok(4));
}
