//! Pack/unpack pipeline for the `clockres-rs` project.
//!
//! This crate drives the codecs in `clockres_types` against the filesystem:
//! scanning a watch face source directory, validating its descriptor,
//! preparing every image into an embeddable chunk (the transcode stage runs
//! on a worker pool), assembling the `Clock*_res` container, and the whole
//! inverse direction.
//!
//! # Examples
//!
//! ```no_run
//! use clockres_pack::{PackOptions, pack};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let outcome = pack(
//! 	"faces/MyFace_50001".as_ref(),
//! 	"out".as_ref(),
//! 	&PackOptions::default(),
//! )?;
//! println!("wrote {} ({} bytes)", outcome.path.display(), outcome.file_size);
//! # Ok(())
//! # }
//! ```

mod error;
pub mod pack;
pub mod prepare;
pub mod source;
pub mod unpack;
pub mod validate;

pub use error::{PackError, UnpackError};
pub use pack::{PackOptions, PackOutcome, pack};
pub use prepare::{PreparedImage, prepare_assets, prepare_one};
pub use source::{SourceDir, extract_clock_id};
pub use unpack::{UnpackOptions, UnpackOutcome, default_out_dir, unpack, unpack_batch};
pub use validate::{ValidationIssue, ValidationReport, validate};
