//! Layer block encoding and decoding.
//!
//! Each descriptor layer becomes one variable-length record of big-endian
//! i32 fields: `drawType`, `dataType`, the conditional `interval` /
//! `area_num` fields, `alignType`, `x`, `y`, `num`, then one entry per
//! `imgArr` element. The element encoding depends on the layer's draw/data
//! types and the element index; the rules are checked in order and the first
//! match wins:
//!
//! | condition | bytes |
//! |-----------|-------|
//! | `drawType` in {10, 15, 21} | i32, i32, i32 address, i32 length |
//! | `drawType` == 55 and index == 2 | 30 bytes of text, NUL padded |
//! | `dataType` in {64..=67} and index in {10, 11} | i32 |
//! | `drawType` == 8 and index in {0, 1, 2} | i32 |
//! | element is an integer | i32 |
//! | filename | i32 address, i32 length |
//!
//! Addresses are region-local for main images and absolute (z base added)
//! for `z_` images; the caller's resolver supplies them fixed up.
//!
//! Decoding reverses the same table without the source descriptor. Since
//! a bare `i32` and the first half of an `(address, length)` pair are
//! indistinguishable by type, the decoder asks the caller whether a pair
//! actually points at an image chunk and otherwise falls back to a single
//! integer per slot.

use super::super::config::{ImgRef, Layer};
use super::super::error::{ConfigError, ResError};

/// Byte length of the `drawType == 55` inline text slot
pub const TEXT_SLOT_LEN: usize = 30;

fn push_i32(out: &mut Vec<u8>, value: i32) {
	out.extend_from_slice(&value.to_be_bytes());
}

fn encode_layer(
	layer: &Layer,
	layer_idx: usize,
	resolve: &impl Fn(&str) -> Option<(u32, u32)>,
	out: &mut Vec<u8>,
) -> Result<(), ResError> {
	push_i32(out, layer.draw_type);
	push_i32(out, layer.data_type);

	if layer.requires_interval() {
		let interval = layer.interval.ok_or(ConfigError::MissingInterval {
			layer: layer_idx,
			data_type: layer.data_type,
		})?;
		push_i32(out, interval);
	}
	if layer.requires_area_num() {
		let area_num = layer.area_num.as_ref().ok_or(ConfigError::MissingAreaNum {
			layer: layer_idx,
			data_type: layer.data_type,
		})?;
		for &value in area_num {
			push_i32(out, value);
		}
	}

	push_i32(out, layer.align_type);
	push_i32(out, layer.x);
	push_i32(out, layer.y);
	push_i32(out, layer.num);

	let mut resolve_name = |name: &str| -> Result<(u32, u32), ResError> {
		resolve(name).ok_or_else(|| ResError::ImageNotFound {
			layer: layer_idx,
			name: name.to_string(),
		})
	};

	for (index, element) in layer.img_arr.iter().enumerate() {
		if layer.uses_sprite_slots() {
			let ImgRef::Sprite(a, b, name) = element else {
				return Err(ResError::BadElement {
					layer: layer_idx,
					index,
					message: format!("drawType {} expects [i32, i32, filename] triples", layer.draw_type),
				});
			};
			let (address, length) = resolve_name(name)?;
			push_i32(out, *a);
			push_i32(out, *b);
			push_i32(out, address as i32);
			push_i32(out, length as i32);
		} else if layer.is_text_slot(index) {
			let ImgRef::Name(text) = element else {
				return Err(ResError::BadElement {
					layer: layer_idx,
					index,
					message: "text slot expects a string".to_string(),
				});
			};
			let bytes = text.as_bytes();
			let take = bytes.len().min(TEXT_SLOT_LEN);
			out.extend_from_slice(&bytes[..take]);
			out.extend(std::iter::repeat_n(0u8, TEXT_SLOT_LEN - take));
		} else if layer.is_forced_int_slot(index) {
			let ImgRef::Int(value) = element else {
				return Err(ResError::BadElement {
					layer: layer_idx,
					index,
					message: "slot expects an integer".to_string(),
				});
			};
			push_i32(out, *value);
		} else {
			match element {
				ImgRef::Int(value) => push_i32(out, *value),
				ImgRef::Name(name) => {
					let (address, length) = resolve_name(name)?;
					push_i32(out, address as i32);
					push_i32(out, length as i32);
				}
				ImgRef::Sprite(..) => {
					return Err(ResError::BadElement {
						layer: layer_idx,
						index,
						message: format!(
							"drawType {} does not take [i32, i32, filename] triples",
							layer.draw_type
						),
					});
				}
			}
		}
	}

	Ok(())
}

/// Encodes the full layer block in descriptor order.
///
/// `resolve` maps a referenced filename (case-insensitive) to the
/// `(address, length)` pair to write; z-region fix-ups are the resolver's
/// responsibility.
pub fn encode_layers(
	layers: &[Layer],
	resolve: impl Fn(&str) -> Option<(u32, u32)>,
) -> Result<Vec<u8>, ResError> {
	let mut out = Vec::new();
	for (layer_idx, layer) in layers.iter().enumerate() {
		encode_layer(layer, layer_idx, &resolve, &mut out)?;
	}
	Ok(out)
}

/// Knobs for walking a layer block without its source descriptor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecodeParams {
	/// Smallest declared length treated as a plausible image reference
	pub min_chunk_len: u32,
	/// Assumed `area_num` entry count for `dataType == 112` layers
	pub area_num_count: u32,
}

impl Default for DecodeParams {
	fn default() -> Self {
		Self {
			min_chunk_len: 16,
			area_num_count: 4,
		}
	}
}

/// One decoded `imgArr` slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
	/// Plain integer
	Int(i32),
	/// Inline text from a `drawType == 55` record
	Text(String),
	/// Image reference as written in the record
	Image {
		/// Address field (region-local or z-absolute)
		address: u32,
		/// Chunk length in bytes
		length: u32,
	},
	/// Sprite triple with its two integer parameters
	Sprite {
		/// First integer parameter
		a: i32,
		/// Second integer parameter
		b: i32,
		/// Address field (region-local or z-absolute)
		address: u32,
		/// Chunk length in bytes
		length: u32,
	},
}

/// One decoded layer record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLayer {
	/// Draw type selector
	pub draw_type: i32,
	/// Data type selector
	pub data_type: i32,
	/// Refresh interval, when the data type carries one
	pub interval: Option<i32>,
	/// Area counters, when the data type carries them
	pub area_num: Option<Vec<i32>>,
	/// Alignment selector
	pub align_type: i32,
	/// Horizontal position
	pub x: i32,
	/// Vertical position
	pub y: i32,
	/// Declared slot count
	pub num: i32,
	/// Decoded slots
	pub slots: Vec<Slot>,
}

struct Cursor<'a> {
	data: &'a [u8],
	pos: usize,
}

impl<'a> Cursor<'a> {
	fn remaining(&self) -> usize {
		self.data.len() - self.pos
	}

	fn take_i32(&mut self) -> Option<i32> {
		if self.remaining() < 4 {
			return None;
		}
		let bytes = [
			self.data[self.pos],
			self.data[self.pos + 1],
			self.data[self.pos + 2],
			self.data[self.pos + 3],
		];
		self.pos += 4;
		Some(i32::from_be_bytes(bytes))
	}

	fn peek_pair(&self) -> Option<(i32, i32)> {
		if self.remaining() < 8 {
			return None;
		}
		let at = |i: usize| {
			i32::from_be_bytes([
				self.data[self.pos + i],
				self.data[self.pos + i + 1],
				self.data[self.pos + i + 2],
				self.data[self.pos + i + 3],
			])
		};
		Some((at(0), at(4)))
	}

	fn take_bytes(&mut self, n: usize) -> Option<&'a [u8]> {
		if self.remaining() < n {
			return None;
		}
		let slice = &self.data[self.pos..self.pos + n];
		self.pos += n;
		Some(slice)
	}
}

/// Walks a layer block and reconstructs the records.
///
/// `is_image_ref` decides whether an `(address, length)` pair points at a
/// real image chunk; it is consulted only for slots the type rules leave
/// ambiguous. The walk stops cleanly at end of input; a record cut off mid
/// way is dropped with a warning.
pub fn decode_layers(
	block: &[u8],
	params: DecodeParams,
	is_image_ref: impl Fn(u32, u32) -> bool,
) -> Vec<RawLayer> {
	let mut cursor = Cursor {
		data: block,
		pos: 0,
	};
	let mut layers = Vec::new();

	'outer: while cursor.remaining() >= 4 {
		let record_start = cursor.pos;
		let truncated = |layers: &[RawLayer], pos: usize| {
			log::warn!(
				"layer block truncated inside record {} (offset {}); dropping the partial record",
				layers.len(),
				pos,
			);
		};

		let Some(draw_type) = cursor.take_i32() else { break };
		let Some(data_type) = cursor.take_i32() else {
			truncated(&layers, record_start);
			break;
		};

		let mut interval = None;
		if super::super::config::INTERVAL_DATA_TYPES.contains(&data_type) {
			match cursor.take_i32() {
				Some(v) => interval = Some(v),
				None => {
					truncated(&layers, record_start);
					break;
				}
			}
		}

		let mut area_num = None;
		if super::super::config::AREA_NUM_DATA_TYPES.contains(&data_type) {
			let mut values = Vec::with_capacity(params.area_num_count as usize);
			for _ in 0..params.area_num_count {
				match cursor.take_i32() {
					Some(v) => values.push(v),
					None => {
						truncated(&layers, record_start);
						break 'outer;
					}
				}
			}
			area_num = Some(values);
		}

		let (Some(align_type), Some(x), Some(y), Some(num)) =
			(cursor.take_i32(), cursor.take_i32(), cursor.take_i32(), cursor.take_i32())
		else {
			truncated(&layers, record_start);
			break;
		};

		let probe = Layer {
			name: None,
			draw_type,
			data_type,
			interval,
			area_num: None,
			align_type,
			x,
			y,
			num,
			img_arr: Vec::new(),
		};

		let slot_count = if num < 0 {
			log::warn!("record {}: negative slot count {}, treating as empty", layers.len(), num);
			0
		} else {
			num as usize
		};

		let mut slots = Vec::with_capacity(slot_count.min(1024));
		for index in 0..slot_count {
			if probe.uses_sprite_slots() {
				let (Some(a), Some(b), Some(address), Some(length)) =
					(cursor.take_i32(), cursor.take_i32(), cursor.take_i32(), cursor.take_i32())
				else {
					truncated(&layers, record_start);
					break 'outer;
				};
				slots.push(Slot::Sprite {
					a,
					b,
					address: address as u32,
					length: length as u32,
				});
			} else if probe.is_text_slot(index) {
				let Some(raw) = cursor.take_bytes(TEXT_SLOT_LEN) else {
					truncated(&layers, record_start);
					break 'outer;
				};
				let end = raw.iter().position(|&b| b == 0).unwrap_or(TEXT_SLOT_LEN);
				slots.push(Slot::Text(String::from_utf8_lossy(&raw[..end]).into_owned()));
			} else if probe.is_forced_int_slot(index) {
				let Some(value) = cursor.take_i32() else {
					truncated(&layers, record_start);
					break 'outer;
				};
				slots.push(Slot::Int(value));
			} else {
				match cursor.peek_pair() {
					Some((address, length))
						if is_image_ref(address as u32, length as u32)
							&& length as u32 >= params.min_chunk_len =>
					{
						cursor.pos += 8;
						slots.push(Slot::Image {
							address: address as u32,
							length: length as u32,
						});
					}
					_ => {
						let Some(value) = cursor.take_i32() else {
							truncated(&layers, record_start);
							break 'outer;
						};
						slots.push(Slot::Int(value));
					}
				}
			}
		}

		layers.push(RawLayer {
			draw_type,
			data_type,
			interval,
			area_num,
			align_type,
			x,
			y,
			num,
			slots,
		});
	}

	if cursor.remaining() > 0 && cursor.remaining() < 4 {
		log::warn!("{} trailing bytes after the last layer record", cursor.remaining());
	}

	layers
}
