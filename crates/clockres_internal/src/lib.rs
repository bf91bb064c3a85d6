//! Internal crate for `clockres-rs`.
//!
//! This module is separated into its own crate to keep the public facade
//! thin, and should not be used directly.
//!
//! # Examples
//!
//! ```no_run
//! use clockres_internal::prelude::*;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let res = ResFile::open("Clock50001_res")?;
//! # Ok(())
//! # }
//! ```

/// `use clockres_internal::prelude::*;` to import commonly used items.
pub mod prelude;

// Re-export the member crates for convenience
pub use clockres_pack;
pub use clockres_types;
