//! Asset preparation: source images to ready-to-embed chunks.
//!
//! PNG and BMP sources are decoded, normalized to an in-memory BMP
//! intermediate (24-bit RGB, or 32-bit BGRA when the image carries alpha)
//! and transcoded to a device-RGB chunk, optionally LZ4-compressed. JPG and
//! GIF sources are embedded opaque: only their dimensions are decoded and a
//! chunk header is synthesized in front of the raw file bytes.
//!
//! Transcoding is the data-parallel stage of the pipeline; results come back
//! in the caller's file order so the payload layout stays deterministic.

use std::io::Cursor;
use std::path::Path;

use image::{DynamicImage, ImageFormat};
use rayon::prelude::*;

use clockres_types::file::chunk::{self, ImgType};
use clockres_types::file::{ChunkHeader, bmp};

use crate::error::PackError;
use crate::source::{SourceDir, file_key};

/// One source image, transcoded and ready to embed
#[derive(Debug, Clone)]
pub struct PreparedImage {
	/// Lowercased `name.ext` key the descriptor references it by
	pub name: String,
	/// Complete chunk bytes (16-byte header + payload)
	pub chunk: Vec<u8>,
}

fn stem_of(name: &str) -> &str {
	name.split('.').next().unwrap_or(name)
}

fn image_decode_err(name: &str) -> impl FnOnce(image::ImageError) -> PackError + '_ {
	move |source| PackError::ImageDecode {
		name: name.to_string(),
		source,
	}
}

/// Synthesizes an opaque JPG/GIF chunk: header with the raw file size as
/// payload length, followed by the file bytes verbatim
fn prepare_opaque(path: &Path, name: &str, img_type: ImgType) -> Result<Vec<u8>, PackError> {
	let (width, height) = image::image_dimensions(path).map_err(image_decode_err(name))?;
	let data = std::fs::read(path)?;

	let header = ChunkHeader::new(img_type, data.len(), width, height)?;
	let mut out = Vec::with_capacity(ChunkHeader::SIZE + data.len());
	out.extend_from_slice(&header.to_bytes());
	out.extend_from_slice(&data);
	Ok(out)
}

/// Re-encodes a decoded image as an in-memory BMP, 24-bit without alpha or
/// 32-bit with
fn to_bmp_bytes(img: DynamicImage, name: &str) -> Result<Vec<u8>, PackError> {
	let normalized = if img.color().has_alpha() {
		DynamicImage::ImageRgba8(img.to_rgba8())
	} else {
		DynamicImage::ImageRgb8(img.to_rgb8())
	};

	let mut bytes = Cursor::new(Vec::new());
	normalized.write_to(&mut bytes, ImageFormat::Bmp).map_err(image_decode_err(name))?;
	Ok(bytes.into_inner())
}

/// Prepares a single source image into its embeddable chunk
pub fn prepare_one(path: &Path, compress: bool) -> Result<PreparedImage, PackError> {
	let name = file_key(path);
	let ext = path.extension().and_then(|e| e.to_str()).map(str::to_lowercase).unwrap_or_default();

	let chunk = match ext.as_str() {
		"jpg" => prepare_opaque(path, &name, ImgType::Jpg)?,
		"gif" => prepare_opaque(path, &name, ImgType::Gif)?,
		_ => {
			let img = image::open(path).map_err(image_decode_err(&name))?;
			let bmp_bytes = to_bmp_bytes(img, &name)?;
			let raw = bmp::transcode(stem_of(&name), &bmp_bytes).map_err(|source| {
				PackError::Transcode {
					name: name.clone(),
					source,
				}
			})?;
			if compress { chunk::compress(&raw)? } else { raw }
		}
	};

	log::debug!("[{}] prepared, {} bytes", name, chunk.len());
	Ok(PreparedImage {
		name,
		chunk,
	})
}

/// Prepares every image in the source directory.
///
/// Transcoding fans out across a worker pool; the returned list preserves
/// the source walk order, which is what fixes chunk placement in the
/// container payload.
pub fn prepare_assets(source: &SourceDir, compress: bool) -> Result<Vec<PreparedImage>, PackError> {
	source
		.image_files()
		.par_iter()
		.map(|path| prepare_one(path, compress))
		.collect()
}

#[cfg(test)]
mod tests {
	use super::*;
	use clockres_types::file::chunk::Header;
	use image::{Rgb, RgbImage, Rgba, RgbaImage};

	fn write_png_rgb(dir: &Path, name: &str, w: u32, h: u32) -> std::path::PathBuf {
		let img = RgbImage::from_pixel(w, h, Rgb([10, 20, 30]));
		let path = dir.join(name);
		img.save(&path).unwrap();
		path
	}

	fn write_png_rgba(dir: &Path, name: &str, w: u32, h: u32, alpha: u8) -> std::path::PathBuf {
		let img = RgbaImage::from_pixel(w, h, Rgba([10, 20, 30, alpha]));
		let path = dir.join(name);
		img.save(&path).unwrap();
		path
	}

	#[test]
	fn test_opaque_rgb_png_becomes_rgb565() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_png_rgb(dir.path(), "bg.png", 8, 4);

		let prepared = prepare_one(&path, false).unwrap();
		assert_eq!(prepared.name, "bg.png");
		let header = Header::from_bytes(&prepared.chunk).unwrap();
		assert_eq!(header.img_type(), ImgType::Rgb565);
		assert_eq!(header.width(), 8);
		assert_eq!(header.height(), 4);
		assert_eq!(header.payload_len(), 8 * 4 * 2);
		assert!(!header.is_compressed());
	}

	#[test]
	fn test_alpha_png_becomes_argb8565() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_png_rgba(dir.path(), "dial.png", 4, 4, 200);

		let prepared = prepare_one(&path, false).unwrap();
		let header = Header::from_bytes(&prepared.chunk).unwrap();
		assert_eq!(header.img_type(), ImgType::Argb8565);
		assert_eq!(header.payload_len(), 4 * 4 * 3);
	}

	#[test]
	fn test_stem_suffix_selects_format() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_png_rgba(dir.path(), "dial_8888.png", 4, 4, 200);

		let prepared = prepare_one(&path, false).unwrap();
		let header = Header::from_bytes(&prepared.chunk).unwrap();
		assert_eq!(header.img_type(), ImgType::Argb8888);
	}

	#[test]
	fn test_compression_flag() {
		let dir = tempfile::tempdir().unwrap();
		let path = write_png_rgb(dir.path(), "bg.png", 32, 32);

		let prepared = prepare_one(&path, true).unwrap();
		let header = Header::from_bytes(&prepared.chunk).unwrap();
		assert!(header.is_compressed());
		// Declared length stays the uncompressed payload size
		assert_eq!(header.payload_len(), 32 * 32 * 2);

		let payload = chunk::decompress_payload(&prepared.chunk).unwrap();
		assert_eq!(payload.len(), 32 * 32 * 2);
	}

	#[test]
	fn test_jpg_embedded_opaque() {
		let dir = tempfile::tempdir().unwrap();
		let img = RgbImage::from_pixel(16, 8, Rgb([200, 100, 50]));
		let path = dir.path().join("photo.jpg");
		img.save(&path).unwrap();
		let raw = std::fs::read(&path).unwrap();

		// Compression must not touch opaque streams
		let prepared = prepare_one(&path, true).unwrap();
		let header = Header::from_bytes(&prepared.chunk).unwrap();
		assert_eq!(header.img_type(), ImgType::Jpg);
		assert!(!header.is_compressed());
		assert_eq!(header.width(), 16);
		assert_eq!(header.height(), 8);
		assert_eq!(header.payload_len(), raw.len());
		assert_eq!(&prepared.chunk[16..], &raw[..]);
	}

	#[test]
	fn test_format_mismatch_reported() {
		let dir = tempfile::tempdir().unwrap();
		// 8888 suffix demands alpha (32 bpp), but this PNG has none
		let path = write_png_rgb(dir.path(), "bg_8888.png", 4, 4);

		let err = prepare_one(&path, false).unwrap_err();
		assert!(matches!(err, PackError::Transcode { .. }));
	}
}
