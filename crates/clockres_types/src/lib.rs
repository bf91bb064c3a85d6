//! This crate provides the core data types and binary codecs for the
//! `clockres-rs` project.
//!
//! # Formats
//!
//! - **Chunk**: a 16-byte header plus payload; every image embedded in a
//!   container becomes exactly one chunk ([`file::chunk`])
//! - **BMP transcoding**: the in-memory BMP intermediate and its conversion
//!   into the four device pixel layouts ([`file::bmp`])
//! - **Descriptor**: the `config.json` layer model ([`file::config`])
//! - **Container**: the `Clock*_res` file itself, with its two image regions
//!   and big-endian layer block ([`file::res`])
//!
//! # Examples
//!
//! ```no_run
//! use clockres_types::file::ResFile;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let res = ResFile::open("Clock50001_res")?;
//! println!("{}", res.header());
//! # Ok(())
//! # }
//! ```

pub mod file;
pub mod prelude;

// Re-export commonly used file types at crate root for convenience
pub use file::{
	BmpError, ChunkError, ChunkHeader, ConfigError, ImgRef, ImgType, Layer, ResBuilder, ResError,
	ResFile, ResHeader, Resolution,
};
