//! Prelude module for `clockres_internal`.

#[doc(inline)]
pub use clockres_types::prelude::*;

#[doc(inline)]
pub use clockres_pack::{
	PackError,
	// Pack pipeline
	PackOptions,
	PackOutcome,
	SourceDir,

	// Unpack pipeline
	UnpackError,
	UnpackOptions,
	UnpackOutcome,

	// Validation
	ValidationIssue,
	ValidationReport,
	default_out_dir,
	extract_clock_id,
	pack,
	unpack,
	unpack_batch,
	validate,
};
