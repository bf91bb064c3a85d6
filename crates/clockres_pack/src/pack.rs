//! The pack driver: watch face directory in, `Clock*_res` container out.

use std::path::{Path, PathBuf};

use clockres_types::file::res::resolution::compose_clock_id;
use clockres_types::file::{ImgRef, Layer, ResBuilder, Resolution, config};

use crate::error::PackError;
use crate::prepare::{prepare_assets, prepare_one};
use crate::source::{SourceDir, extract_clock_id};
use crate::validate::validate;

/// Options for one pack invocation
#[derive(Debug, Clone)]
pub struct PackOptions {
	/// Clock id base; derived from the source directory name when absent
	pub clock_id_base: Option<u32>,
	/// Face size; auto-detected from the first layer image when absent
	pub resolution: Option<Resolution>,
	/// Thumbnail image path, overriding filename-based detection
	pub thumbnail: Option<PathBuf>,
	/// LZ4-compress device-RGB chunks
	pub compress: bool,
	/// Emit the idle-screen magic string
	pub idle: bool,
}

impl Default for PackOptions {
	fn default() -> Self {
		Self {
			clock_id_base: None,
			resolution: None,
			thumbnail: None,
			compress: true,
			idle: false,
		}
	}
}

/// Result of a successful pack
#[derive(Debug, Clone)]
pub struct PackOutcome {
	/// Full clock id written into the container
	pub clock_id: u32,
	/// Path of the written container
	pub path: PathBuf,
	/// Container size in bytes
	pub file_size: u64,
}

/// First image filename referenced by the first layer
fn first_layer_image(layers: &[Layer]) -> Result<&str, PackError> {
	layers
		.first()
		.and_then(|layer| layer.img_arr.first())
		.and_then(ImgRef::filename)
		.ok_or(PackError::NoFirstLayerImage)
}

/// Determines the face size: verifies an explicit choice against the first
/// layer image, or auto-detects from it
fn determine_resolution(
	layers: &[Layer],
	source: &SourceDir,
	requested: Option<Resolution>,
) -> Result<Resolution, PackError> {
	let name = first_layer_image(layers)?;
	let path = source.resolve(name).ok_or(PackError::NoFirstLayerImage)?;
	let (width, height) = image::image_dimensions(path).map_err(|source| PackError::ImageDecode {
		name: name.to_string(),
		source,
	})?;

	match requested {
		Some(resolution) => {
			if resolution.dimensions() != (width, height) {
				return Err(PackError::FaceSizeMismatch {
					expected: resolution,
					width,
					height,
				});
			}
			Ok(resolution)
		}
		None => Ok(Resolution::detect(width, height)?),
	}
}

/// Packs a watch face directory into `out_dir/Clock<id>_res`.
///
/// The source must contain a `config.json` descriptor and every image it
/// references. Validation reports all mismatches at once; any later failure
/// aborts the whole pack and removes the partial output file.
pub fn pack(src_dir: &Path, out_dir: &Path, options: &PackOptions) -> Result<PackOutcome, PackError> {
	let source = SourceDir::scan(src_dir)?;

	let config_path = source.config_path();
	if !config_path.is_file() {
		return Err(PackError::ConfigMissing(config_path));
	}
	let layers = config::parse(&std::fs::read(&config_path)?)?;

	let report = validate(&layers, &source);
	if !report.is_ok() {
		return Err(PackError::Validation(report));
	}

	let clock_id_base = match options.clock_id_base {
		Some(base) => base,
		None => extract_clock_id(src_dir)?,
	};
	let resolution = determine_resolution(&layers, &source, options.resolution)?;
	let clock_id = compose_clock_id(clock_id_base, resolution)?;

	log::info!("generating watch face {} (0x{:08X})", clock_id & 0xFFFF, clock_id);

	let prepared = prepare_assets(&source, options.compress)?;

	let mut builder = ResBuilder::new(clock_id, options.idle);
	if let Some(thumb_path) = &options.thumbnail {
		if !thumb_path.is_file() {
			return Err(PackError::ThumbnailMissing(thumb_path.clone()));
		}
		builder.set_thumbnail(prepare_one(thumb_path, options.compress)?.chunk);
	}

	for image in prepared {
		if options.thumbnail.is_none() && image.name.contains("thumbnail") {
			builder.set_thumbnail(image.chunk);
		} else {
			builder.add_image(&image.name, &image.chunk);
		}
	}

	let bytes = builder.finish(&layers)?;

	std::fs::create_dir_all(out_dir)?;
	let out_path = out_dir.join(format!("Clock{clock_id_base}_res"));
	if let Err(e) = std::fs::write(&out_path, &bytes) {
		// Do not leave a partial container behind
		let _ = std::fs::remove_file(&out_path);
		return Err(e.into());
	}

	log::info!("watch face done [{}], {} bytes", out_path.display(), bytes.len());
	Ok(PackOutcome {
		clock_id,
		path: out_path,
		file_size: bytes.len() as u64,
	})
}
