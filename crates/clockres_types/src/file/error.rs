//! Error types for resource file parsing and assembly.

use thiserror::Error;

/// Errors that can occur when parsing a BMP intermediate or transcoding pixels
#[derive(Debug, Error)]
pub enum BmpError {
	/// Not enough data to parse
	#[error("Insufficient data: expected at least {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Missing `BM` magic bytes
	#[error("Invalid BMP magic: {0:02X?}")]
	InvalidMagic([u8; 2]),

	/// Bits-per-pixel outside {16, 24, 32}
	#[error("Unsupported BMP bit depth: {0} bpp")]
	UnsupportedBpp(u16),

	/// Filename suffix demands a pixel layout the source depth cannot supply
	#[error("Cannot convert to {format}: source is {bpp_bits} bpp")]
	FormatBppMismatch {
		/// Requested device pixel layout
		format: &'static str,
		/// Source bit depth
		bpp_bits: u16,
	},

	/// Width or height does not fit the 12-bit chunk header fields
	#[error("Image dimensions {width}x{height} exceed the 12-bit header limit (4095)")]
	DimensionsTooLarge {
		/// Image width in pixels
		width: u32,
		/// Image height in pixels
		height: u32,
	},

	/// Invalid chunk produced from the pixel payload
	#[error(transparent)]
	Chunk(#[from] ChunkError),
}

/// Errors that can occur when parsing or building device image chunks
#[derive(Debug, Error)]
pub enum ChunkError {
	/// Not enough data to parse
	#[error("Insufficient data: expected {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Unknown image type byte
	#[error("Unknown image type: {0}")]
	UnknownImgType(u8),

	/// Payload longer than the 24-bit length field can record
	#[error("Payload of {0} bytes exceeds the 24-bit length field (max 16777215)")]
	PayloadTooLarge(usize),

	/// Width or height does not fit the 12-bit header fields
	#[error("Image dimensions {width}x{height} exceed the 12-bit header limit (4095)")]
	DimensionsTooLarge {
		/// Image width in pixels
		width: u32,
		/// Image height in pixels
		height: u32,
	},

	/// LZ4 block decompression failure
	#[error("Decompression failed: {0}")]
	Decompression(String),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

/// Errors that can occur when reading or writing the layer descriptor
#[derive(Debug, Error)]
pub enum ConfigError {
	/// JSON syntax or shape error
	#[error(transparent)]
	Json(#[from] serde_json::Error),

	/// Descriptor is not a non-empty array of layers
	#[error("config must be a non-empty JSON array of layers")]
	EmptyConfig,

	/// `interval` missing for a data type that requires it
	#[error("Layer {layer}: dataType {data_type} requires an `interval` field")]
	MissingInterval {
		/// Zero-based layer index
		layer: usize,
		/// Data type that demanded the field
		data_type: i32,
	},

	/// `area_num` missing for a data type that requires it
	#[error("Layer {layer}: dataType {data_type} requires an `area_num` field")]
	MissingAreaNum {
		/// Zero-based layer index
		layer: usize,
		/// Data type that demanded the field
		data_type: i32,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

/// Errors that can occur when assembling or parsing a `Clock*_res` container
#[derive(Debug, Error)]
pub enum ResError {
	/// Not enough data to parse
	#[error("Insufficient data: expected at least {expected} bytes, got {actual} bytes")]
	InsufficientData {
		/// Expected number of bytes
		expected: usize,
		/// Actual number of bytes
		actual: usize,
	},

	/// Magic string is neither the default nor the idle variant
	#[error("Invalid magic string: {0:02X?}")]
	InvalidMagic([u8; 8]),

	/// Clock id base outside [50000, 65535]
	#[error("Clock id base {0} outside [50000, 65535]")]
	BadClockId(u32),

	/// Resolution prefix not in the fixed table
	#[error("Unsupported watch face resolution {width}x{height}")]
	UnsupportedResolution {
		/// Face width in pixels
		width: u32,
		/// Face height in pixels
		height: u32,
	},

	/// A layer references an image the payload does not contain
	#[error("Layer {layer}: image [{name}] is not in the payload")]
	ImageNotFound {
		/// Zero-based layer index
		layer: usize,
		/// Referenced image filename
		name: String,
	},

	/// A layer element has a shape the serializer cannot encode
	#[error("Layer {layer} slot {index}: {message}")]
	BadElement {
		/// Zero-based layer index
		layer: usize,
		/// Zero-based element index within `imgArr`
		index: usize,
		/// What went wrong
		message: String,
	},

	/// An image reference points outside its region
	#[error("Image reference 0x{offset:08X}+{length} lies outside the payload")]
	BadImageRef {
		/// Offset as written in the layer record
		offset: u32,
		/// Length as written in the layer record
		length: u32,
	},

	/// Invalid chunk inside the payload
	#[error(transparent)]
	Chunk(#[from] ChunkError),

	/// Invalid layer descriptor
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}
