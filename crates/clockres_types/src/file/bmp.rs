//! BMP intermediate parsing and pixel transcoding.
//!
//! The packer normalizes every PNG/BMP source into an in-memory BMP byte
//! string (24-bit RGB, or 32-bit BGRA when the source carries alpha) and this
//! module turns that BMP into a device image chunk: a 16-byte header followed
//! by pixel rows in one of the four device layouts.
//!
//! The target layout is chosen from the source file's basename stem and the
//! BMP bit depth; see [`PixelFormat::select`]. Rows are always emitted
//! top-down regardless of the BMP's own row direction.

use super::chunk::{self, ImgType};
use super::error::BmpError;

/// Smallest parseable BMP: file header (14) + BITMAPINFOHEADER (40)
const MIN_BMP_SIZE: usize = 54;

/// Parsed BMP geometry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Info {
	/// Byte offset of the pixel array
	pub data_offset: usize,
	/// Width in pixels
	pub width: u32,
	/// Height in pixels (absolute value)
	pub height: u32,
	/// Bit depth (16, 24 or 32)
	pub bpp_bits: u16,
	/// True when rows are stored top-down (negative BMP height)
	pub top_down: bool,
}

impl Info {
	/// Bytes per pixel
	pub fn bytes_per_pixel(&self) -> usize {
		usize::from(self.bpp_bits) >> 3
	}

	/// Row stride in bytes (rows are padded to 4-byte boundaries)
	pub fn row_stride(&self) -> usize {
		(self.width as usize * self.bytes_per_pixel() + 3) / 4 * 4
	}

	/// Parses the BMP file and info headers from the given byte slice
	pub fn from_bytes(data: &[u8]) -> Result<Self, BmpError> {
		if data.len() < MIN_BMP_SIZE {
			return Err(BmpError::InsufficientData {
				expected: MIN_BMP_SIZE,
				actual: data.len(),
			});
		}
		if &data[0..2] != b"BM" {
			return Err(BmpError::InvalidMagic([data[0], data[1]]));
		}

		let data_offset = u32::from_le_bytes([data[10], data[11], data[12], data[13]]) as usize;
		let width = u32::from_le_bytes([data[18], data[19], data[20], data[21]]);
		let raw_height = i32::from_le_bytes([data[22], data[23], data[24], data[25]]);
		let bpp_bits = u16::from_le_bytes([data[28], data[29]]);

		if !matches!(bpp_bits, 16 | 24 | 32) {
			return Err(BmpError::UnsupportedBpp(bpp_bits));
		}

		let (height, top_down) = if raw_height < 0 {
			(raw_height.unsigned_abs(), true)
		} else {
			(raw_height as u32, false)
		};

		Ok(Self {
			data_offset,
			width,
			height,
			bpp_bits,
			top_down,
		})
	}
}

/// Device pixel layouts a BMP can be transcoded into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PixelFormat {
	/// 16-bit 5/6/5 color, no alpha
	Rgb565,
	/// 15-bit 5/5/5 color with a 1-bit fully-opaque flag
	Argb1555,
	/// RGB565 word plus an 8-bit alpha byte
	Argb8565,
	/// BGRA bytes carried through verbatim
	Argb8888,
}

impl PixelFormat {
	/// Chunk image type for this layout
	pub fn img_type(self) -> ImgType {
		match self {
			PixelFormat::Rgb565 => ImgType::Rgb565,
			PixelFormat::Argb1555 => ImgType::Argb1555,
			PixelFormat::Argb8565 => ImgType::Argb8565,
			PixelFormat::Argb8888 => ImgType::Argb8888,
		}
	}

	/// Output bytes per pixel
	pub fn bytes_per_pixel(self) -> usize {
		match self {
			PixelFormat::Rgb565 | PixelFormat::Argb1555 => 2,
			PixelFormat::Argb8565 => 3,
			PixelFormat::Argb8888 => 4,
		}
	}

	/// Picks the target layout from the basename stem and the BMP bit depth.
	///
	/// Checked in order: a `8888` stem suffix demands 32 bpp; a `1555` suffix
	/// applies only at 32 bpp; a `565` suffix or a 16/24 bpp source selects
	/// RGB565; everything else is ARGB8565 and demands 32 bpp.
	pub fn select(stem: &str, bpp_bits: u16) -> Result<Self, BmpError> {
		if stem.ends_with("8888") {
			if bpp_bits != 32 {
				return Err(BmpError::FormatBppMismatch {
					format: "ARGB8888",
					bpp_bits,
				});
			}
			Ok(PixelFormat::Argb8888)
		} else if stem.ends_with("1555") && bpp_bits == 32 {
			Ok(PixelFormat::Argb1555)
		} else if stem.ends_with("565") || matches!(bpp_bits, 16 | 24) {
			Ok(PixelFormat::Rgb565)
		} else if bpp_bits != 32 {
			Err(BmpError::FormatBppMismatch {
				format: "ARGB8565",
				bpp_bits,
			})
		} else {
			Ok(PixelFormat::Argb8565)
		}
	}
}

#[inline]
fn pack_565(r: u8, g: u8, b: u8) -> u16 {
	((u16::from(r) & 0xF8) << 8) | ((u16::from(g) & 0xFC) << 3) | ((u16::from(b) & 0xF8) >> 3)
}

fn convert_row(out: &mut Vec<u8>, row: &[u8], width: usize, bpp: usize, format: PixelFormat) {
	match format {
		PixelFormat::Rgb565 if bpp == 2 => {
			// 16-bit sources pass through unchanged
			out.extend_from_slice(&row[..width * 2]);
		}
		PixelFormat::Rgb565 => {
			for x in 0..width {
				let px = &row[x * bpp..];
				out.extend_from_slice(&pack_565(px[2], px[1], px[0]).to_le_bytes());
			}
		}
		PixelFormat::Argb1555 => {
			for x in 0..width {
				let px = &row[x * 4..];
				let (b, g, r, a) = (px[0], px[1], px[2], px[3]);
				let mut v = ((u16::from(r) & 0xF8) << 7)
					| ((u16::from(g) & 0xF8) << 2)
					| ((u16::from(b) & 0xF8) >> 3);
				if a == 255 {
					v |= 0x8000;
				}
				out.extend_from_slice(&v.to_le_bytes());
			}
		}
		PixelFormat::Argb8565 => {
			for x in 0..width {
				let px = &row[x * 4..];
				out.extend_from_slice(&pack_565(px[2], px[1], px[0]).to_le_bytes());
				out.push(px[3]);
			}
		}
		PixelFormat::Argb8888 => {
			out.extend_from_slice(&row[..width * 4]);
		}
	}
}

/// Transcodes a BMP byte string into a complete device image chunk.
///
/// `stem` is the source basename up to the first dot; it drives the target
/// layout selection. The returned bytes are a 16-byte header followed by the
/// pixel payload, rows top-down, uncompressed.
pub fn transcode(stem: &str, data: &[u8]) -> Result<Vec<u8>, BmpError> {
	let info = Info::from_bytes(data)?;
	let format = PixelFormat::select(stem, info.bpp_bits)?;

	if info.width > chunk::MAX_DIMENSION || info.height > chunk::MAX_DIMENSION {
		return Err(BmpError::DimensionsTooLarge {
			width: info.width,
			height: info.height,
		});
	}

	let width = info.width as usize;
	let height = info.height as usize;
	let stride = info.row_stride();
	let needed = info.data_offset + stride * height;
	if data.len() < needed {
		return Err(BmpError::InsufficientData {
			expected: needed,
			actual: data.len(),
		});
	}

	let mut payload = Vec::with_capacity(width * height * format.bytes_per_pixel());
	let rows: Box<dyn Iterator<Item = usize>> = if info.top_down {
		Box::new(0..height)
	} else {
		Box::new((0..height).rev())
	};
	for y in rows {
		let start = info.data_offset + y * stride;
		convert_row(&mut payload, &data[start..start + stride], width, info.bytes_per_pixel(), format);
	}

	let header = chunk::Header::new(format.img_type(), payload.len(), info.width, info.height)
		.map_err(BmpError::Chunk)?;

	let mut out = Vec::with_capacity(chunk::Header::SIZE + payload.len());
	out.extend_from_slice(&header.to_bytes());
	out.extend_from_slice(&payload);
	Ok(out)
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::file::chunk::Header;

	/// Builds a minimal BMP with a plain BITMAPINFOHEADER.
	///
	/// `pixels` are rows in *storage* order, already stride-padded.
	fn make_bmp(width: u32, height: i32, bpp_bits: u16, pixels: &[u8]) -> Vec<u8> {
		let mut out = Vec::new();
		out.extend_from_slice(b"BM");
		let file_size = 54 + pixels.len() as u32;
		out.extend_from_slice(&file_size.to_le_bytes());
		out.extend_from_slice(&[0u8; 4]);
		out.extend_from_slice(&54u32.to_le_bytes());
		out.extend_from_slice(&40u32.to_le_bytes());
		out.extend_from_slice(&width.to_le_bytes());
		out.extend_from_slice(&height.to_le_bytes());
		out.extend_from_slice(&1u16.to_le_bytes());
		out.extend_from_slice(&bpp_bits.to_le_bytes());
		out.extend_from_slice(&[0u8; 24]);
		out.extend_from_slice(pixels);
		out
	}

	#[test]
	fn test_info_parsing() {
		let bmp = make_bmp(3, 2, 24, &[0u8; 24]);
		let info = Info::from_bytes(&bmp).unwrap();
		assert_eq!(info.width, 3);
		assert_eq!(info.height, 2);
		assert_eq!(info.bpp_bits, 24);
		assert!(!info.top_down);
		// 3 pixels * 3 bytes = 9, padded to 12
		assert_eq!(info.row_stride(), 12);
	}

	#[test]
	fn test_info_negative_height() {
		let bmp = make_bmp(2, -2, 32, &[0u8; 16]);
		let info = Info::from_bytes(&bmp).unwrap();
		assert_eq!(info.height, 2);
		assert!(info.top_down);
	}

	#[test]
	fn test_info_rejects_non_bmp() {
		let mut bmp = make_bmp(1, 1, 24, &[0u8; 4]);
		bmp[0] = b'X';
		assert!(matches!(Info::from_bytes(&bmp), Err(BmpError::InvalidMagic(_))));
	}

	#[test]
	fn test_info_rejects_odd_bpp() {
		let bmp = make_bmp(1, 1, 8, &[0u8; 4]);
		assert!(matches!(Info::from_bytes(&bmp), Err(BmpError::UnsupportedBpp(8))));
	}

	#[test]
	fn test_format_selection() {
		assert_eq!(PixelFormat::select("bg_8888", 32).unwrap(), PixelFormat::Argb8888);
		assert_eq!(PixelFormat::select("bg_1555", 32).unwrap(), PixelFormat::Argb1555);
		assert_eq!(PixelFormat::select("bg_565", 32).unwrap(), PixelFormat::Rgb565);
		assert_eq!(PixelFormat::select("bg", 24).unwrap(), PixelFormat::Rgb565);
		assert_eq!(PixelFormat::select("bg", 16).unwrap(), PixelFormat::Rgb565);
		assert_eq!(PixelFormat::select("bg", 32).unwrap(), PixelFormat::Argb8565);
		// A 1555 stem on a 24-bit source degrades to RGB565 via the bpp rule
		assert_eq!(PixelFormat::select("bg_1555", 24).unwrap(), PixelFormat::Rgb565);

		assert!(matches!(
			PixelFormat::select("bg_8888", 24),
			Err(BmpError::FormatBppMismatch {
				format: "ARGB8888",
				..
			})
		));
	}

	#[test]
	fn test_rgb565_color_math() {
		// One row, two 24-bit pixels stored as BGR: (R=255,G=128,B=8), (R=0,G=255,B=255)
		let row = [8u8, 128, 255, 255, 255, 0, 0, 0];
		let bmp = make_bmp(2, 1, 24, &row);
		let out = transcode("bg", &bmp).unwrap();

		let header = Header::from_bytes(&out).unwrap();
		assert_eq!(header.img_type(), ImgType::Rgb565);
		assert_eq!(header.payload_len(), 4);

		let expect0 = ((255u16 & 0xF8) << 8) | ((128u16 & 0xFC) << 3) | ((8u16 & 0xF8) >> 3);
		let expect1 = ((0u16 & 0xF8) << 8) | ((255u16 & 0xFC) << 3) | ((255u16 & 0xF8) >> 3);
		assert_eq!(&out[16..18], &expect0.to_le_bytes());
		assert_eq!(&out[18..20], &expect1.to_le_bytes());
	}

	#[test]
	fn test_bottom_up_rows_flip() {
		// 1x2 image, 24-bit; storage is bottom-up so the first stored row is
		// the visually bottom one. Output must be top-down.
		let bottom = [0u8, 0, 10, 0]; // padded to stride 4
		let top = [0u8, 0, 20, 0];
		let mut pixels = Vec::new();
		pixels.extend_from_slice(&bottom);
		pixels.extend_from_slice(&top);
		let bmp = make_bmp(1, 2, 24, &pixels);
		let out = transcode("bg", &bmp).unwrap();

		let first = u16::from_le_bytes([out[16], out[17]]);
		let second = u16::from_le_bytes([out[18], out[19]]);
		assert_eq!(first, (20u16 & 0xF8) << 8);
		assert_eq!(second, (10u16 & 0xF8) << 8);
	}

	#[test]
	fn test_top_down_rows_kept() {
		let top = [0u8, 0, 20, 0];
		let bottom = [0u8, 0, 10, 0];
		let mut pixels = Vec::new();
		pixels.extend_from_slice(&top);
		pixels.extend_from_slice(&bottom);
		let bmp = make_bmp(1, -2, 24, &pixels);
		let out = transcode("bg", &bmp).unwrap();

		let first = u16::from_le_bytes([out[16], out[17]]);
		assert_eq!(first, (20u16 & 0xF8) << 8);
	}

	#[test]
	fn test_argb1555_alpha_bit() {
		// 2x1, 32-bit BGRA: opaque white then half-transparent white
		let row = [255u8, 255, 255, 255, 255, 255, 255, 128];
		let bmp = make_bmp(2, 1, 32, &row);
		let out = transcode("bg_1555", &bmp).unwrap();

		let v0 = u16::from_le_bytes([out[16], out[17]]);
		let v1 = u16::from_le_bytes([out[18], out[19]]);
		assert_eq!(v0 & 0x8000, 0x8000);
		assert_eq!(v1 & 0x8000, 0);
		assert_eq!(v0 & 0x7FFF, v1 & 0x7FFF);
	}

	#[test]
	fn test_argb8565_layout() {
		let row = [8u8, 128, 255, 77]; // B G R A
		let bmp = make_bmp(1, 1, 32, &row);
		let out = transcode("bg", &bmp).unwrap();

		let header = Header::from_bytes(&out).unwrap();
		assert_eq!(header.img_type(), ImgType::Argb8565);
		let expect = ((255u16 & 0xF8) << 8) | ((128u16 & 0xFC) << 3) | ((8u16 & 0xF8) >> 3);
		assert_eq!(&out[16..18], &expect.to_le_bytes());
		assert_eq!(out[18], 77);
	}

	#[test]
	fn test_argb8888_passthrough() {
		let row = [1u8, 2, 3, 4];
		let bmp = make_bmp(1, 1, 32, &row);
		let out = transcode("bg_8888", &bmp).unwrap();

		let header = Header::from_bytes(&out).unwrap();
		assert_eq!(header.img_type(), ImgType::Argb8888);
		// BGRA byte order is preserved verbatim
		assert_eq!(&out[16..20], &row);
	}

	#[test]
	fn test_16bpp_passthrough() {
		let row = [0xAAu8, 0xBB, 0xCC, 0xDD]; // two 16-bit pixels, stride 4
		let bmp = make_bmp(2, 1, 16, &row);
		let out = transcode("bg", &bmp).unwrap();
		assert_eq!(&out[16..20], &row);
	}

	#[test]
	fn test_truncated_pixels() {
		let bmp = make_bmp(4, 4, 24, &[0u8; 8]);
		assert!(matches!(transcode("bg", &bmp), Err(BmpError::InsufficientData { .. })));
	}
}
