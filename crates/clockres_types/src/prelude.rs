//! Prelude module for `clockres_types`.
//!
//! This module provides a convenient way to import commonly used types,
//! traits, and constants.
//!
//! # Examples
//!
//! ```no_run
//! use clockres_types::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let res = ResFile::open("Clock50001_res")?;
//! let chunk = res.thumb();
//! # Ok(())
//! # }
//! ```

// File module types
#[doc(inline)]
pub use crate::file::{
	BmpError,
	// Chunk types
	ChunkError,
	ChunkHeader,

	// Descriptor types
	ConfigError,
	ImgRef,
	ImgType,
	Layer,

	// Container types
	Region,
	ResBuilder,
	ResError,
	ResFile,
	ResHeader,

	// Resolution table
	Resolution,
	compose_clock_id,
};

#[doc(inline)]
pub use crate::file::res::layer::{DecodeParams, RawLayer, Slot};

#[doc(inline)]
pub use crate::file::bmp::PixelFormat;

// Re-export the file module for advanced usage
#[doc(inline)]
pub use crate::file;
