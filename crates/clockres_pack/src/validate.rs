//! Descriptor validation against the files on disk.
//!
//! Every mismatch is collected before the pack aborts; callers get the full
//! list, not just the first problem.

use std::collections::HashSet;
use std::fmt::Display;

use clockres_types::file::{ImgRef, Layer};

use crate::source::SourceDir;

/// One descriptor/directory mismatch
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
	/// A layer references an image file that is not in the directory
	ImageMissing {
		/// Zero-based layer index
		layer: usize,
		/// Layer display name, when the descriptor carries one
		layer_name: Option<String>,
		/// Referenced filename (lowercased)
		name: String,
	},

	/// A layer's declared `num` does not match its `imgArr` length
	CountMismatch {
		/// Zero-based layer index
		layer: usize,
		/// Layer display name, when the descriptor carries one
		layer_name: Option<String>,
		/// Declared count
		declared: i32,
		/// Actual element count
		actual: usize,
	},
}

impl Display for ValidationIssue {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let label = |layer: &usize, layer_name: &Option<String>| match layer_name {
			Some(name) => format!("layer {layer} [{name}]"),
			None => format!("layer {layer}"),
		};
		match self {
			ValidationIssue::ImageMissing {
				layer,
				layer_name,
				name,
			} => {
				write!(f, "{}: image missing [{}]", label(layer, layer_name), name)
			}
			ValidationIssue::CountMismatch {
				layer,
				layer_name,
				declared,
				actual,
			} => {
				write!(
					f,
					"{}: image count mismatch (num = {}, imgArr has {})",
					label(layer, layer_name),
					declared,
					actual,
				)
			}
		}
	}
}

/// The full set of mismatches found in one validation pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
	issues: Vec<ValidationIssue>,
}

impl ValidationReport {
	/// True when validation found nothing wrong
	pub fn is_ok(&self) -> bool {
		self.issues.is_empty()
	}

	/// All collected issues
	pub fn issues(&self) -> &[ValidationIssue] {
		&self.issues
	}
}

impl Display for ValidationReport {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{} validation issue(s)", self.issues.len())?;
		for issue in &self.issues {
			write!(f, "\n  {issue}")?;
		}
		Ok(())
	}
}

/// Cross-checks the descriptor against the directory contents.
///
/// Integers are skipped, filename references (including the third element of
/// sprite triples) must exist on disk case-insensitively, and the text slot
/// of `drawType == 55` layers is exempt. Layer counts are verified too.
pub fn validate(layers: &[Layer], source: &SourceDir) -> ValidationReport {
	let mut report = ValidationReport::default();
	let mut referenced: HashSet<String> = HashSet::new();

	for (layer_idx, layer) in layers.iter().enumerate() {
		if layer.img_arr.len() as i64 != i64::from(layer.num) {
			report.issues.push(ValidationIssue::CountMismatch {
				layer: layer_idx,
				layer_name: layer.name.clone(),
				declared: layer.num,
				actual: layer.img_arr.len(),
			});
		}

		for (index, element) in layer.img_arr.iter().enumerate() {
			if matches!(element, ImgRef::Name(_)) && layer.is_text_slot(index) {
				continue;
			}
			let Some(name) = element.filename() else {
				continue;
			};
			let name = name.to_lowercase();
			if source.contains(&name) {
				referenced.insert(name);
			} else {
				report.issues.push(ValidationIssue::ImageMissing {
					layer: layer_idx,
					layer_name: layer.name.clone(),
					name,
				});
			}
		}
	}

	// Informational only: files on disk minus config.json and thumbnail
	// should roughly match the distinct references
	let on_disk = source.file_count().saturating_sub(2);
	if on_disk != referenced.len() {
		log::warn!(
			"total image files: {}, images in config: {}",
			on_disk,
			referenced.len(),
		);
	}

	report
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::fs;

	fn layer(draw_type: i32, img_arr: Vec<ImgRef>) -> Layer {
		Layer {
			name: Some("test".to_string()),
			draw_type,
			data_type: 0,
			interval: None,
			area_num: None,
			align_type: 0,
			x: 0,
			y: 0,
			num: img_arr.len() as i32,
			img_arr,
		}
	}

	fn source_with(files: &[&str]) -> (tempfile::TempDir, SourceDir) {
		let dir = tempfile::tempdir().unwrap();
		for name in files {
			fs::write(dir.path().join(name), b"x").unwrap();
		}
		let source = SourceDir::scan(dir.path()).unwrap();
		(dir, source)
	}

	#[test]
	fn test_all_issues_collected() {
		let (_tmp, source) = source_with(&["bg.png"]);
		let mut bad_count = layer(0, vec![ImgRef::Name("bg.png".into())]);
		bad_count.num = 5;
		let layers = vec![
			bad_count,
			layer(0, vec![ImgRef::Name("ghost.png".into())]),
			layer(10, vec![ImgRef::Sprite(0, 0, "also_ghost.png".into())]),
		];

		let report = validate(&layers, &source);
		assert_eq!(report.issues().len(), 3);
		assert!(matches!(report.issues()[0], ValidationIssue::CountMismatch { .. }));
		assert!(matches!(report.issues()[1], ValidationIssue::ImageMissing { .. }));
		assert!(matches!(report.issues()[2], ValidationIssue::ImageMissing { .. }));
	}

	#[test]
	fn test_case_insensitive_lookup() {
		let (_tmp, source) = source_with(&["Digit0.PNG"]);
		let layers = vec![layer(0, vec![ImgRef::Name("digit0.png".into())])];
		assert!(validate(&layers, &source).is_ok());
	}

	#[test]
	fn test_text_slot_exempt() {
		let (_tmp, source) = source_with(&["pic.bmp"]);
		let layers = vec![layer(
			55,
			vec![
				ImgRef::Name("pic.bmp".into()),
				ImgRef::Int(10),
				ImgRef::Name("HELLO".into()),
			],
		)];
		assert!(validate(&layers, &source).is_ok());
	}

	#[test]
	fn test_integers_ignored() {
		let (_tmp, source) = source_with(&[]);
		let layers = vec![layer(0, vec![ImgRef::Int(1), ImgRef::Int(2)])];
		assert!(validate(&layers, &source).is_ok());
	}
}
