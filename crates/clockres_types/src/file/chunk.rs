//! Device image chunk support.
//!
//! Every image embedded in a `Clock*_res` container becomes exactly one
//! *chunk*: a 16-byte header followed by a payload. Device-RGB chunks carry
//! raw pixel rows in one of four layouts and may be LZ4-compressed; JPG and
//! GIF chunks carry the source file verbatim and are never compressed.
//!
//! # Header layout
//!
//! | offset | field | meaning |
//! |--------|-------|---------|
//! | 0      | img type | see [`ImgType`] |
//! | 1      | compressed | 0 = raw, 1 = LZ4 block |
//! | 2..5   | payload length | little-endian 24-bit, always the *uncompressed* size |
//! | 5      | height low | low 8 bits of height |
//! | 6      | mix | low nibble = height bits 11..8, high nibble = width bits 3..0 |
//! | 7      | width high | width bits 11..4 |
//! | 8..16  | zero padding | |
//!
//! Width and height are 12-bit fields packed across bytes 5..8.

use std::{fmt::Display, io::Read};

use super::error::ChunkError;

mod constants {
	/// Size of the chunk header in bytes
	pub const HEADER_SIZE: usize = 16;

	/// Largest payload the 24-bit length field can record
	pub const MAX_PAYLOAD: usize = 0x00FF_FFFF;

	/// Largest width/height the packed 12-bit fields can record
	pub const MAX_DIMENSION: u32 = 0x0FFF;
}

pub use constants::{MAX_DIMENSION, MAX_PAYLOAD};

/// Image payload types understood by the watch firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ImgType {
	/// Opaque GIF stream
	Gif = 3,
	/// Opaque JPEG stream
	Jpg = 9,
	/// 4 bytes per pixel, BGRA order preserved
	Argb8888 = 71,
	/// 3 bytes per pixel: RGB565 little-endian word plus an alpha byte
	Argb8565 = 72,
	/// 2 bytes per pixel, RGB565 little-endian
	Rgb565 = 73,
	/// 2 bytes per pixel, 1-bit alpha + 5/5/5 color
	Argb1555 = 74,
}

impl ImgType {
	/// Maps the header byte to an image type
	pub fn from_u8(value: u8) -> Result<Self, ChunkError> {
		match value {
			3 => Ok(ImgType::Gif),
			9 => Ok(ImgType::Jpg),
			71 => Ok(ImgType::Argb8888),
			72 => Ok(ImgType::Argb8565),
			73 => Ok(ImgType::Rgb565),
			74 => Ok(ImgType::Argb1555),
			_ => Err(ChunkError::UnknownImgType(value)),
		}
	}

	/// True for the four device-RGB pixel layouts (the compressible kinds)
	pub fn is_device_rgb(self) -> bool {
		matches!(self, ImgType::Argb8888 | ImgType::Argb8565 | ImgType::Rgb565 | ImgType::Argb1555)
	}

	/// Bytes per pixel for device-RGB layouts, `None` for opaque streams
	pub fn bytes_per_pixel(self) -> Option<usize> {
		match self {
			ImgType::Argb8888 => Some(4),
			ImgType::Argb8565 => Some(3),
			ImgType::Rgb565 | ImgType::Argb1555 => Some(2),
			ImgType::Jpg | ImgType::Gif => None,
		}
	}
}

impl Display for ImgType {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		match self {
			ImgType::Gif => write!(f, "GIF"),
			ImgType::Jpg => write!(f, "JPG"),
			ImgType::Argb8888 => write!(f, "ARGB8888"),
			ImgType::Argb8565 => write!(f, "ARGB8565"),
			ImgType::Rgb565 => write!(f, "RGB565"),
			ImgType::Argb1555 => write!(f, "ARGB1555"),
		}
	}
}

/// Header structure for device image chunks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Header {
	img_type: ImgType,
	compressed: bool,
	payload_len: u32,
	width: u32,
	height: u32,
}

impl Header {
	/// Size of the header in bytes
	pub const SIZE: usize = constants::HEADER_SIZE;

	/// Creates a header for an uncompressed payload
	pub fn new(img_type: ImgType, payload_len: usize, width: u32, height: u32) -> Result<Self, ChunkError> {
		if payload_len > constants::MAX_PAYLOAD {
			return Err(ChunkError::PayloadTooLarge(payload_len));
		}
		if width > constants::MAX_DIMENSION || height > constants::MAX_DIMENSION {
			return Err(ChunkError::DimensionsTooLarge {
				width,
				height,
			});
		}

		Ok(Self {
			img_type,
			compressed: false,
			payload_len: payload_len as u32,
			width,
			height,
		})
	}

	/// Returns the image type
	pub fn img_type(&self) -> ImgType {
		self.img_type
	}

	/// True when the payload is an LZ4 block
	pub fn is_compressed(&self) -> bool {
		self.compressed
	}

	/// Uncompressed payload length in bytes
	pub fn payload_len(&self) -> usize {
		self.payload_len as usize
	}

	/// Image width in pixels
	pub fn width(&self) -> u32 {
		self.width
	}

	/// Image height in pixels
	pub fn height(&self) -> u32 {
		self.height
	}

	/// Parses a chunk header from the given byte slice
	pub fn from_bytes(data: &[u8]) -> Result<Self, ChunkError> {
		if data.len() < constants::HEADER_SIZE {
			return Err(ChunkError::InsufficientData {
				expected: constants::HEADER_SIZE,
				actual: data.len(),
			});
		}

		let img_type = ImgType::from_u8(data[0])?;
		let compressed = data[1] == 1;
		let payload_len = u32::from(data[2]) | (u32::from(data[3]) << 8) | (u32::from(data[4]) << 16);
		let height = u32::from(data[5]) | (u32::from(data[6] & 0x0F) << 8);
		let width = (u32::from(data[6] >> 4)) | (u32::from(data[7]) << 4);

		Ok(Self {
			img_type,
			compressed,
			payload_len,
			width,
			height,
		})
	}

	/// Reads a chunk header from any reader
	pub fn from_reader<R: Read>(reader: &mut R) -> Result<Self, ChunkError> {
		let mut buffer = [0u8; constants::HEADER_SIZE];
		reader.read_exact(&mut buffer)?;
		Self::from_bytes(&buffer)
	}

	/// Converts the header to its 16-byte wire form
	pub fn to_bytes(&self) -> [u8; constants::HEADER_SIZE] {
		let mut bytes = [0u8; constants::HEADER_SIZE];

		bytes[0] = self.img_type as u8;
		bytes[1] = u8::from(self.compressed);
		bytes[2] = (self.payload_len & 0xFF) as u8;
		bytes[3] = ((self.payload_len >> 8) & 0xFF) as u8;
		bytes[4] = ((self.payload_len >> 16) & 0xFF) as u8;
		bytes[5] = (self.height & 0xFF) as u8;
		bytes[6] = (((self.height >> 8) & 0x0F) as u8) | (((self.width & 0x0F) as u8) << 4);
		bytes[7] = ((self.width >> 4) & 0xFF) as u8;

		bytes
	}
}

impl Display for Header {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{} {}x{}, {} payload bytes{}",
			self.img_type,
			self.width,
			self.height,
			self.payload_len,
			if self.compressed { " (LZ4)" } else { "" },
		)
	}
}

/// Compresses a chunk's payload with LZ4 block compression.
///
/// Already-compressed chunks pass through unchanged. A zero or over-long
/// declared payload length is repaired to the actual payload size before
/// compressing. The header keeps the *uncompressed* length so the unpacker
/// can size its buffer, and byte 1 is set to 1.
pub fn compress(chunk: &[u8]) -> Result<Vec<u8>, ChunkError> {
	if chunk.len() < Header::SIZE {
		return Err(ChunkError::InsufficientData {
			expected: Header::SIZE,
			actual: chunk.len(),
		});
	}

	let mut header = Header::from_bytes(chunk)?;
	if header.compressed {
		return Ok(chunk.to_vec());
	}

	let payload = &chunk[Header::SIZE..];
	let mut payload_len = header.payload_len();
	if payload_len == 0 || payload_len > payload.len() {
		payload_len = payload.len();
		if payload_len > constants::MAX_PAYLOAD {
			return Err(ChunkError::PayloadTooLarge(payload_len));
		}
		header.payload_len = payload_len as u32;
	}

	let compressed = lz4_flex::block::compress(&payload[..payload_len]);
	header.compressed = true;

	let mut out = Vec::with_capacity(Header::SIZE + compressed.len());
	out.extend_from_slice(&header.to_bytes());
	out.extend_from_slice(&compressed);
	Ok(out)
}

/// Returns a chunk's payload in uncompressed form.
///
/// For raw chunks this is a copy of the trailing bytes; for compressed chunks
/// the LZ4 block is expanded to exactly the header's declared length.
pub fn decompress_payload(chunk: &[u8]) -> Result<Vec<u8>, ChunkError> {
	let header = Header::from_bytes(chunk)?;
	let payload = &chunk[Header::SIZE..];

	if !header.compressed {
		return Ok(payload.to_vec());
	}

	lz4_flex::block::decompress(payload, header.payload_len())
		.map_err(|e| ChunkError::Decompression(e.to_string()))
}
