//! Watch face source directory scanning.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use regex::Regex;
use walkdir::WalkDir;

use crate::error::PackError;
use clockres_types::file::res::resolution::{CLOCK_ID_MAX, CLOCK_ID_MIN};

/// Image extensions the preparer understands
pub const IMAGE_EXTENSIONS: [&str; 4] = ["png", "bmp", "jpg", "gif"];

/// A scanned watch face directory.
///
/// Files are collected recursively in sorted walk order, which fixes the
/// payload layout of the container; name lookups are case-insensitive on the
/// basename (the first file wins when basenames collide across
/// subdirectories).
#[derive(Debug)]
pub struct SourceDir {
	root: PathBuf,
	files: Vec<PathBuf>,
	by_name: HashMap<String, PathBuf>,
}

impl SourceDir {
	/// Recursively scans a watch face directory
	pub fn scan(root: &Path) -> Result<Self, PackError> {
		if !root.is_dir() {
			return Err(PackError::SourceNotFound(root.to_path_buf()));
		}

		let mut files = Vec::new();
		let mut by_name = HashMap::new();
		for entry in WalkDir::new(root).sort_by_file_name() {
			let entry = entry.map_err(|e| PackError::IOError(e.into()))?;
			if !entry.file_type().is_file() {
				continue;
			}
			let name = entry.file_name().to_string_lossy().to_lowercase();
			by_name.entry(name).or_insert_with(|| entry.path().to_path_buf());
			files.push(entry.into_path());
		}

		Ok(Self {
			root: root.to_path_buf(),
			files,
			by_name,
		})
	}

	/// Source directory root
	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Path of the descriptor file
	pub fn config_path(&self) -> PathBuf {
		self.root.join("config.json")
	}

	/// Number of files in the directory
	pub fn file_count(&self) -> usize {
		self.files.len()
	}

	/// True when a file with this basename exists (case-insensitive)
	pub fn contains(&self, name: &str) -> bool {
		self.by_name.contains_key(&name.to_lowercase())
	}

	/// Resolves a basename to its on-disk path (case-insensitive)
	pub fn resolve(&self, name: &str) -> Option<&Path> {
		self.by_name.get(&name.to_lowercase()).map(PathBuf::as_path)
	}

	/// All image files, in the walk order that defines the payload layout
	pub fn image_files(&self) -> Vec<&Path> {
		self.files
			.iter()
			.filter(|p| {
				p.extension()
					.and_then(|e| e.to_str())
					.is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
			})
			.map(PathBuf::as_path)
			.collect()
	}
}

/// The map key and embedded name of a source file: the basename's first two
/// dot-separated components, lowercased (`Digit0_8888.PNG` -> `digit0_8888.png`)
pub fn file_key(path: &Path) -> String {
	let base = path.file_name().map(|n| n.to_string_lossy().to_lowercase()).unwrap_or_default();
	let mut parts = base.split('.');
	match (parts.next(), parts.next()) {
		(Some(stem), Some(ext)) => format!("{stem}.{ext}"),
		_ => base,
	}
}

/// Extracts the clock id from a source directory name: the first integer in
/// [[`CLOCK_ID_MIN`], [`CLOCK_ID_MAX`]] found in the basename
pub fn extract_clock_id(src_dir: &Path) -> Result<u32, PackError> {
	let base = src_dir
		.file_name()
		.map(|n| n.to_string_lossy().into_owned())
		.unwrap_or_default();

	// Unwrap is fine, the pattern is a literal
	let digits = Regex::new(r"\d+").expect("valid regex");
	for m in digits.find_iter(&base) {
		if let Ok(value) = m.as_str().parse::<u32>() {
			if (CLOCK_ID_MIN..=CLOCK_ID_MAX).contains(&value) {
				return Ok(value);
			}
		}
	}
	Err(PackError::NoClockId(base))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_file_key() {
		assert_eq!(file_key(Path::new("/tmp/Digit0_8888.PNG")), "digit0_8888.png");
		assert_eq!(file_key(Path::new("a.b.c.jpg")), "a.b");
		assert_eq!(file_key(Path::new("noext")), "noext");
	}

	#[test]
	fn test_extract_clock_id() {
		assert_eq!(extract_clock_id(Path::new("/faces/MyFace_50123")).unwrap(), 50123);
		// First in-range integer wins
		assert_eq!(extract_clock_id(Path::new("face123_60000_65000")).unwrap(), 60000);
		assert!(matches!(
			extract_clock_id(Path::new("/faces/plain")),
			Err(PackError::NoClockId(_))
		));
		assert!(matches!(
			extract_clock_id(Path::new("/faces/face_1234")),
			Err(PackError::NoClockId(_))
		));
	}
}
