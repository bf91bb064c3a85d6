//! File format support for the `clockres-rs` project.

mod error;

pub mod bmp;
pub mod chunk;
pub mod config;
pub mod res;

// Re-export unified error types
pub use error::{BmpError, ChunkError, ConfigError, ResError};

// Re-export main file types
pub use chunk::{Header as ChunkHeader, ImgType};
pub use config::{ImgRef, Layer};
pub use res::{Builder as ResBuilder, File as ResFile, Header as ResHeader, Region};
pub use res::layer::{DecodeParams, RawLayer, Slot};
pub use res::resolution::{CLOCK_ID_MAX, CLOCK_ID_MIN, Resolution, compose_clock_id};
