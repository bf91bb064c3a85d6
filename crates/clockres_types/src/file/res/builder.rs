//! Container assembly.
//!
//! The builder accumulates image chunks into the two payload regions in
//! first-seen order, dedups repeated filenames per region, and finally emits
//! the complete container byte stream with the layer block appended.

use std::collections::HashMap;

use super::super::config::Layer;
use super::super::error::ResError;
use super::{Header, Region, constants, layer};

#[derive(Debug, Default)]
struct RegionBuf {
	data: Vec<u8>,
	index: HashMap<String, (u32, u32)>,
}

impl RegionBuf {
	/// Appends a chunk unless the key is already present; returns its slot
	fn add(&mut self, key: String, chunk: &[u8]) -> (u32, u32) {
		if let Some(&slot) = self.index.get(&key) {
			return slot;
		}
		let slot = (self.data.len() as u32, chunk.len() as u32);
		self.data.extend_from_slice(chunk);
		self.index.insert(key, slot);
		slot
	}
}

/// Assembles a `Clock*_res` container
#[derive(Debug)]
pub struct Builder {
	magic: [u8; 8],
	clock_id: u32,
	thumb: Vec<u8>,
	main: RegionBuf,
	z: RegionBuf,
}

impl Builder {
	/// Creates a builder for the given full clock id
	pub fn new(clock_id: u32, idle: bool) -> Self {
		Self {
			magic: if idle { constants::MAGIC_IDLE } else { constants::MAGIC },
			clock_id,
			thumb: Vec::new(),
			main: RegionBuf::default(),
			z: RegionBuf::default(),
		}
	}

	/// Sets the thumbnail chunk
	pub fn set_thumbnail(&mut self, chunk: Vec<u8>) {
		self.thumb = chunk;
	}

	/// Adds an image chunk under its (case-insensitive) filename.
	///
	/// Names starting with `z_` land in the z region, everything else in the
	/// main region. Re-adding a known name is a no-op; the existing slot is
	/// returned.
	pub fn add_image(&mut self, name: &str, chunk: &[u8]) -> (Region, u32, u32) {
		let key = name.to_lowercase();
		if key.starts_with("z_") {
			let (offset, len) = self.z.add(key, chunk);
			(Region::Z, offset, len)
		} else {
			let (offset, len) = self.main.add(key, chunk);
			(Region::Main, offset, len)
		}
	}

	/// True when an image with this name has been added
	pub fn contains(&self, name: &str) -> bool {
		let key = name.to_lowercase();
		if key.starts_with("z_") {
			self.z.index.contains_key(&key)
		} else {
			self.main.index.contains_key(&key)
		}
	}

	/// Absolute file offset of the z region
	pub fn z_region_start(&self) -> u32 {
		constants::THUMB_START + self.thumb.len() as u32 + self.main.data.len() as u32
	}

	/// Resolves a filename to the `(address, length)` pair layer records
	/// carry: region-local for main images, z-base-adjusted for z images
	pub fn resolve(&self, name: &str) -> Option<(u32, u32)> {
		let key = name.to_lowercase();
		if key.starts_with("z_") {
			let (offset, len) = *self.z.index.get(&key)?;
			Some((self.z_region_start() + offset, len))
		} else {
			self.main.index.get(&key).copied()
		}
	}

	/// Encodes the layer block and assembles the final container bytes
	pub fn finish(self, layers: &[Layer]) -> Result<Vec<u8>, ResError> {
		let layer_block = layer::encode_layers(layers, |name| self.resolve(name))?;

		let thumb_len = self.thumb.len() as u32;
		let main_len = self.main.data.len() as u32;
		let z_len = self.z.data.len() as u32;
		let header = Header {
			magic: self.magic,
			clock_id: self.clock_id,
			thumb_start: constants::THUMB_START,
			thumb_len,
			main_start: constants::THUMB_START + thumb_len,
			main_len,
			layer_start: constants::THUMB_START + thumb_len + main_len + z_len,
		};

		let mut out = Vec::with_capacity(
			Header::SIZE + self.thumb.len() + self.main.data.len() + self.z.data.len() + layer_block.len(),
		);
		out.extend_from_slice(&header.to_bytes());
		out.extend_from_slice(&self.thumb);
		out.extend_from_slice(&self.main.data);
		out.extend_from_slice(&self.z.data);
		out.extend_from_slice(&layer_block);
		Ok(out)
	}
}

#[cfg(test)]
mod tests {
	use super::super::super::chunk::{Header as ChunkHeader, ImgType};
	use super::super::File;
	use super::*;
	use crate::file::config::ImgRef;

	fn chunk_of(len: usize, fill: u8) -> Vec<u8> {
		let payload = vec![fill; len];
		let header = ChunkHeader::new(ImgType::Rgb565, len, 1, 1).unwrap();
		let mut chunk = header.to_bytes().to_vec();
		chunk.extend_from_slice(&payload);
		chunk
	}

	fn layer_with(img_arr: Vec<ImgRef>) -> Layer {
		Layer {
			name: None,
			draw_type: 0,
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

	#[test]
	fn test_regions_and_dedup() {
		let mut builder = Builder::new(0x0007_0000 | 50001, false);

		let a = chunk_of(100, 1);
		let z = chunk_of(40, 2);
		let (region, off, len) = builder.add_image("Digit0.png", &a);
		assert_eq!((region, off, len), (Region::Main, 0, 116));

		// Same name, different case: dedup
		let again = builder.add_image("digit0.PNG", &a);
		assert_eq!(again, (Region::Main, 0, 116));

		let (region, off, _) = builder.add_image("z_needle.png", &z);
		assert_eq!((region, off), (Region::Z, 0));

		// Main resolves region-local, z resolves with the z base added
		assert_eq!(builder.resolve("digit0.png"), Some((0, 116)));
		assert_eq!(builder.resolve("z_needle.png"), Some((32 + 116, 56)));
	}

	#[test]
	fn test_finish_layout() {
		let mut builder = Builder::new(0x0007_0000 | 50001, false);
		builder.set_thumbnail(chunk_of(10, 9));
		builder.add_image("bg.png", &chunk_of(100, 1));
		builder.add_image("z_hand.png", &chunk_of(20, 2));

		let layers = vec![layer_with(vec![
			ImgRef::Name("bg.png".into()),
			ImgRef::Name("z_hand.png".into()),
		])];
		let bytes = builder.finish(&layers).unwrap();

		let file = File::from_bytes(bytes).unwrap();
		let header = file.header();
		assert_eq!(&file.as_bytes()[0..8], b"Sb@*O2GG");
		assert_eq!(header.thumb_start(), 32);
		assert_eq!(header.thumb_len(), 26);
		assert_eq!(header.main_start(), 58);
		assert_eq!(header.main_len(), 116);
		assert_eq!(header.z_start(), 174);
		assert_eq!(header.z_len(), 36);
		assert_eq!(header.layer_start(), 210);
		assert_eq!(header.clock_id_base(), 50001);

		// Both chunks resolvable through the layer-record address scheme
		assert!(file.chunk_at(0, 116).is_ok());
		assert!(file.chunk_at(174, 36).is_ok());
	}

	#[test]
	fn test_idle_magic() {
		let builder = Builder::new(0x0007_0000 | 50001, true);
		let bytes = builder.finish(&[]).unwrap();
		assert_eq!(&bytes[0..8], b"II@*24dG");
	}

	#[test]
	fn test_missing_image_reference() {
		let builder = Builder::new(0x0007_0000 | 50001, false);
		let layers = vec![layer_with(vec![ImgRef::Name("ghost.png".into())])];
		assert!(matches!(builder.finish(&layers), Err(ResError::ImageNotFound { .. })));
	}
}
