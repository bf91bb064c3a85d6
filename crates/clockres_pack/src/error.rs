//! Error types for the pack/unpack pipeline.

use std::path::PathBuf;

use clockres_types::file::{BmpError, ChunkError, ConfigError, ResError};
use thiserror::Error;

use crate::validate::ValidationReport;

/// Errors that can occur while packing a watch face directory
#[derive(Debug, Error)]
pub enum PackError {
	/// Source directory does not exist or is not a directory
	#[error("Source is not a directory: {0}")]
	SourceNotFound(PathBuf),

	/// `config.json` is missing from the source directory
	#[error("Config file missing: {0}")]
	ConfigMissing(PathBuf),

	/// `config.json` could not be parsed
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// The descriptor does not match the files on disk
	#[error("{0}")]
	Validation(ValidationReport),

	/// No clock id was given and the directory name does not contain one
	#[error("No clock id in [50000, 65535] found in directory name [{0}]")]
	NoClockId(String),

	/// The first layer has no image to detect the face size from
	#[error("First layer has no image reference; cannot detect face size")]
	NoFirstLayerImage,

	/// Explicit face size does not match the first layer image
	#[error("Face size {expected} does not match first layer image {width}x{height}")]
	FaceSizeMismatch {
		/// Requested face size
		expected: clockres_types::Resolution,
		/// First layer image width
		width: u32,
		/// First layer image height
		height: u32,
	},

	/// Thumbnail override path does not exist
	#[error("Thumbnail not found: {0}")]
	ThumbnailMissing(PathBuf),

	/// An asset failed to decode
	#[error("[{name}] {source}")]
	ImageDecode {
		/// Source filename
		name: String,
		/// Decoder error
		#[source]
		source: image::ImageError,
	},

	/// An asset failed to transcode to a device layout
	#[error("[{name}] {source}")]
	Transcode {
		/// Source filename
		name: String,
		/// Transcoder error
		#[source]
		source: BmpError,
	},

	/// Chunk compression failure
	#[error(transparent)]
	Chunk(#[from] ChunkError),

	/// Container assembly failure
	#[error(transparent)]
	Res(#[from] ResError),

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}

/// Errors that can occur while unpacking a container
#[derive(Debug, Error)]
pub enum UnpackError {
	/// Container parse failure
	#[error(transparent)]
	Res(#[from] ResError),

	/// Chunk parse or decompression failure
	#[error(transparent)]
	Chunk(#[from] ChunkError),

	/// Descriptor serialization failure
	#[error(transparent)]
	Config(#[from] ConfigError),

	/// A referenced chunk's payload does not match its header
	#[error("[{name}] {message}")]
	MalformedChunk {
		/// Synthetic chunk name
		name: String,
		/// What went wrong
		message: String,
	},

	/// An unpacked image failed to encode
	#[error("[{name}] {source}")]
	ImageEncode {
		/// Output filename
		name: String,
		/// Encoder error
		#[source]
		source: image::ImageError,
	},

	/// Batch pattern is not a valid glob
	#[error(transparent)]
	Pattern(#[from] glob::PatternError),

	/// Batch pattern matched nothing
	#[error("No files matched {pattern} in {folder}")]
	NoMatches {
		/// Glob pattern
		pattern: String,
		/// Searched folder
		folder: PathBuf,
	},

	/// IO error
	#[error(transparent)]
	IOError(#[from] std::io::Error),
}
