//! The unpack driver: `Clock*_res` container in, images + descriptor out.
//!
//! The layer block is position- and type-dependent, so the walker applies
//! the same encoding rules the packer uses and reconstructs the descriptor
//! as it goes. Image chunks it encounters get synthetic filenames derived
//! from their chunk type (with the `z_` prefix and the pixel-layout stem
//! suffix preserved so a repack reproduces the original layout), device-RGB
//! payloads are expanded back to PNG, and opaque JPG/GIF payloads are
//! written verbatim.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{DynamicImage, RgbImage, RgbaImage};

use clockres_types::file::chunk::{self, ImgType};
use clockres_types::file::res::layer::{DecodeParams, RawLayer, Slot, decode_layers};
use clockres_types::file::{ChunkHeader, ImgRef, Layer, Region, ResFile, config};

use crate::error::UnpackError;

/// Options for one unpack invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnpackOptions {
	/// Smallest declared length treated as a plausible image reference
	pub min_chunk_len: u32,
	/// Assumed `area_num` entry count for `dataType == 112` layers
	pub area_num_count: u32,
}

impl Default for UnpackOptions {
	fn default() -> Self {
		Self {
			min_chunk_len: 16,
			area_num_count: 4,
		}
	}
}

/// Result of a successful unpack
#[derive(Debug, Clone)]
pub struct UnpackOutcome {
	/// Directory the face was written into
	pub out_dir: PathBuf,
	/// Number of layer records recovered
	pub layer_count: usize,
	/// Number of distinct images written
	pub image_count: usize,
}

/// Default output directory: a `<name>_unpacked` sibling of the container
pub fn default_out_dir(res_path: &Path) -> PathBuf {
	let name = res_path.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
	res_path.with_file_name(format!("{name}_unpacked"))
}

/// Stem suffix that makes a repack pick the same pixel layout again
fn layout_suffix(img_type: ImgType) -> &'static str {
	match img_type {
		ImgType::Argb8888 => "_8888",
		ImgType::Argb1555 => "_1555",
		_ => "",
	}
}

fn synthetic_name(region: Region, index: usize, img_type: ImgType) -> String {
	let prefix = match region {
		Region::Z => "z_",
		Region::Main => "",
	};
	let ext = match img_type {
		ImgType::Jpg => "jpg",
		ImgType::Gif => "gif",
		_ => "png",
	};
	format!("{prefix}{index}{}.{ext}", layout_suffix(img_type))
}

/// Expands a device-RGB payload back into an `image` buffer
fn device_payload_to_image(
	header: &ChunkHeader,
	payload: &[u8],
	name: &str,
) -> Result<DynamicImage, UnpackError> {
	let (width, height) = (header.width(), header.height());
	let bpp = header.img_type().bytes_per_pixel().unwrap_or(0);
	let expected = width as usize * height as usize * bpp;
	if payload.len() != expected {
		return Err(UnpackError::MalformedChunk {
			name: name.to_string(),
			message: format!(
				"payload is {} bytes, {}x{} {} needs {}",
				payload.len(),
				width,
				height,
				header.img_type(),
				expected,
			),
		});
	}

	let image = match header.img_type() {
		ImgType::Rgb565 => {
			let mut img = RgbImage::new(width, height);
			for (i, px) in img.pixels_mut().enumerate() {
				let v = u16::from_le_bytes([payload[i * 2], payload[i * 2 + 1]]);
				px.0 = [
					(((v >> 11) & 0x1F) as u8) << 3,
					(((v >> 5) & 0x3F) as u8) << 2,
					((v & 0x1F) as u8) << 3,
				];
			}
			DynamicImage::ImageRgb8(img)
		}
		ImgType::Argb1555 => {
			let mut img = RgbaImage::new(width, height);
			for (i, px) in img.pixels_mut().enumerate() {
				let v = u16::from_le_bytes([payload[i * 2], payload[i * 2 + 1]]);
				px.0 = [
					(((v >> 10) & 0x1F) as u8) << 3,
					(((v >> 5) & 0x1F) as u8) << 3,
					((v & 0x1F) as u8) << 3,
					if v & 0x8000 != 0 { 255 } else { 0 },
				];
			}
			DynamicImage::ImageRgba8(img)
		}
		ImgType::Argb8565 => {
			let mut img = RgbaImage::new(width, height);
			for (i, px) in img.pixels_mut().enumerate() {
				let v = u16::from_le_bytes([payload[i * 3], payload[i * 3 + 1]]);
				px.0 = [
					(((v >> 11) & 0x1F) as u8) << 3,
					(((v >> 5) & 0x3F) as u8) << 2,
					((v & 0x1F) as u8) << 3,
					payload[i * 3 + 2],
				];
			}
			DynamicImage::ImageRgba8(img)
		}
		ImgType::Argb8888 => {
			let mut img = RgbaImage::new(width, height);
			for (i, px) in img.pixels_mut().enumerate() {
				// Stored byte order is BGRA
				px.0 = [
					payload[i * 4 + 2],
					payload[i * 4 + 1],
					payload[i * 4],
					payload[i * 4 + 3],
				];
			}
			DynamicImage::ImageRgba8(img)
		}
		ImgType::Jpg | ImgType::Gif => unreachable!("opaque chunks are written verbatim"),
	};

	Ok(image)
}

/// Writes one chunk to disk under its synthetic name
fn write_chunk(out_dir: &Path, name: &str, chunk_bytes: &[u8]) -> Result<(), UnpackError> {
	let header = ChunkHeader::from_bytes(chunk_bytes)?;
	let path = out_dir.join(name);

	match header.img_type() {
		ImgType::Jpg | ImgType::Gif => {
			std::fs::write(path, &chunk_bytes[ChunkHeader::SIZE..])?;
		}
		_ => {
			let payload = chunk::decompress_payload(chunk_bytes)?;
			let image = device_payload_to_image(&header, &payload, name)?;
			image.save(&path).map_err(|source| UnpackError::ImageEncode {
				name: name.to_string(),
				source,
			})?;
		}
	}

	log::debug!("[{}] written ({})", name, header);
	Ok(())
}

/// Rebuilds descriptor layers from the decoded records, naming image
/// references through `names`
fn rebuild_layers(raw_layers: &[RawLayer], names: &HashMap<u32, String>) -> Vec<Layer> {
	raw_layers
		.iter()
		.map(|raw| {
			let img_arr = raw
				.slots
				.iter()
				.map(|slot| match slot {
					Slot::Int(value) => ImgRef::Int(*value),
					Slot::Text(text) => ImgRef::Name(text.clone()),
					Slot::Image {
						address, ..
					} => ImgRef::Name(names[address].clone()),
					Slot::Sprite {
						a,
						b,
						address,
						..
					} => ImgRef::Sprite(*a, *b, names[address].clone()),
				})
				.collect();

			Layer {
				name: None,
				draw_type: raw.draw_type,
				data_type: raw.data_type,
				interval: raw.interval,
				area_num: raw.area_num.clone(),
				align_type: raw.align_type,
				x: raw.x,
				y: raw.y,
				num: raw.num,
				img_arr,
			}
		})
		.collect()
}

/// Unpacks a container into a watch face directory.
///
/// Writes every referenced image plus the reconstructed `config.json`.
/// Truncated layer blocks stop the walk cleanly; unrecognized type
/// combinations degrade to integer slots instead of aborting.
pub fn unpack(res_path: &Path, out_dir: &Path, options: &UnpackOptions) -> Result<UnpackOutcome, UnpackError> {
	let file = ResFile::open(res_path)?;
	log::info!("[{}] {}", res_path.display(), file.header());

	let params = DecodeParams {
		min_chunk_len: options.min_chunk_len,
		area_num_count: options.area_num_count,
	};
	let raw_layers = decode_layers(file.layer_block(), params, |address, length| {
		file.looks_like_image_ref(address, length, options.min_chunk_len)
	});

	// Name every distinct referenced chunk in discovery order
	let mut names: HashMap<u32, String> = HashMap::new();
	let mut ordered: Vec<(u32, u32, String)> = Vec::new();
	for raw in &raw_layers {
		for slot in &raw.slots {
			let (address, length) = match slot {
				Slot::Image {
					address,
					length,
				}
				| Slot::Sprite {
					address,
					length,
					..
				} => (*address, *length),
				_ => continue,
			};
			if names.contains_key(&address) {
				continue;
			}
			let header = ChunkHeader::from_bytes(file.chunk_at(address, length)?)?;
			let name = synthetic_name(file.region_of(address), ordered.len(), header.img_type());
			names.insert(address, name.clone());
			ordered.push((address, length, name));
		}
	}

	std::fs::create_dir_all(out_dir)?;

	for (address, length, name) in &ordered {
		write_chunk(out_dir, name, file.chunk_at(*address, *length)?)?;
	}

	let thumb = file.thumb();
	if !thumb.is_empty() {
		let header = ChunkHeader::from_bytes(thumb)?;
		let ext = match header.img_type() {
			ImgType::Jpg => "jpg",
			ImgType::Gif => "gif",
			_ => "png",
		};
		let name = format!("thumbnail{}.{ext}", layout_suffix(header.img_type()));
		write_chunk(out_dir, &name, thumb)?;
	}

	let layers = rebuild_layers(&raw_layers, &names);
	std::fs::write(out_dir.join("config.json"), config::to_json(&layers)?)?;

	log::info!(
		"[{}] unpacked: {} layers, {} images",
		res_path.display(),
		layers.len(),
		ordered.len(),
	);
	Ok(UnpackOutcome {
		out_dir: out_dir.to_path_buf(),
		layer_count: layers.len(),
		image_count: ordered.len(),
	})
}

/// Unpacks every container in `folder` whose filename matches `pattern`.
///
/// Each container lands in `<name>_unpacked`, either next to its source or
/// under `out_root`. A failing container is logged and skipped so the rest
/// of the batch still runs.
pub fn unpack_batch(
	folder: &Path,
	pattern: &str,
	out_root: Option<&Path>,
	options: &UnpackOptions,
) -> Result<Vec<UnpackOutcome>, UnpackError> {
	let full_pattern = folder.join(pattern).to_string_lossy().into_owned();
	let sources: Vec<PathBuf> = glob::glob(&full_pattern)?
		.filter_map(Result::ok)
		.filter(|p| p.is_file())
		.collect();

	if sources.is_empty() {
		return Err(UnpackError::NoMatches {
			pattern: pattern.to_string(),
			folder: folder.to_path_buf(),
		});
	}

	let mut outcomes = Vec::new();
	for src in sources {
		let out_dir = match out_root {
			Some(root) => {
				let name = src.file_name().map(|n| n.to_string_lossy().into_owned()).unwrap_or_default();
				root.join(format!("{name}_unpacked"))
			}
			None => default_out_dir(&src),
		};
		match unpack(&src, &out_dir, options) {
			Ok(outcome) => outcomes.push(outcome),
			Err(e) => log::error!("[{}] unpack failed: {}", src.display(), e),
		}
	}
	Ok(outcomes)
}
