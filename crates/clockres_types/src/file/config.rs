//! Watch face layer descriptor (`config.json`) support.
//!
//! A descriptor is an ordered JSON array of layers. Each layer is a drawing
//! directive: geometry, draw/data type selectors and an `imgArr` whose
//! elements are integers, image filenames, or `[i32, i32, filename]` sprite
//! triples depending on the layer's types.

use serde::{Deserialize, Serialize};

use super::error::ConfigError;

/// Data types that carry an `interval` field
pub const INTERVAL_DATA_TYPES: [i32; 3] = [52, 59, 130];

/// Data types that carry an `area_num` list
pub const AREA_NUM_DATA_TYPES: [i32; 1] = [112];

/// Draw types whose `imgArr` elements are `[i32, i32, filename]` triples
pub const SPRITE_DRAW_TYPES: [i32; 3] = [10, 15, 21];

/// Draw type whose third `imgArr` slot is a 30-byte inline text
pub const TEXT_DRAW_TYPE: i32 = 55;

/// One element of a layer's `imgArr`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ImgRef {
	/// Plain integer parameter
	Int(i32),
	/// Image filename (or, for the text slot, the inline text itself)
	Name(String),
	/// Sprite triple: two integer parameters and an image filename
	Sprite(i32, i32, String),
}

impl ImgRef {
	/// Referenced filename, if this element names one
	pub fn filename(&self) -> Option<&str> {
		match self {
			ImgRef::Int(_) => None,
			ImgRef::Name(name) => Some(name),
			ImgRef::Sprite(_, _, name) => Some(name),
		}
	}
}

/// One entry of the descriptor array
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Layer {
	/// Optional display name, only used in diagnostics
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub name: Option<String>,

	/// Draw type selector
	#[serde(rename = "drawType")]
	pub draw_type: i32,

	/// Data type selector
	#[serde(rename = "dataType")]
	pub data_type: i32,

	/// Refresh interval, present iff `data_type` is one of [`INTERVAL_DATA_TYPES`]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub interval: Option<i32>,

	/// Area counters, present iff `data_type` is one of [`AREA_NUM_DATA_TYPES`]
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub area_num: Option<Vec<i32>>,

	/// Alignment selector
	#[serde(rename = "alignType")]
	pub align_type: i32,

	/// Horizontal position
	pub x: i32,

	/// Vertical position
	pub y: i32,

	/// Declared element count; must equal `img_arr.len()`
	pub num: i32,

	/// Ordered element list
	#[serde(rename = "imgArr")]
	pub img_arr: Vec<ImgRef>,
}

impl Layer {
	/// True when this layer's data type demands an `interval`
	pub fn requires_interval(&self) -> bool {
		INTERVAL_DATA_TYPES.contains(&self.data_type)
	}

	/// True when this layer's data type demands an `area_num` list
	pub fn requires_area_num(&self) -> bool {
		AREA_NUM_DATA_TYPES.contains(&self.data_type)
	}

	/// True when `imgArr` elements are sprite triples
	pub fn uses_sprite_slots(&self) -> bool {
		SPRITE_DRAW_TYPES.contains(&self.draw_type)
	}

	/// True when slot `index` holds the 30-byte inline text
	pub fn is_text_slot(&self, index: usize) -> bool {
		self.draw_type == TEXT_DRAW_TYPE && index == 2
	}

	/// True when slot `index` is forced to a single integer by the type rules
	pub fn is_forced_int_slot(&self, index: usize) -> bool {
		(matches!(self.data_type, 64..=67) && matches!(index, 10 | 11))
			|| (self.draw_type == 8 && matches!(index, 0 | 1 | 2))
	}
}

/// Parses a descriptor from raw `config.json` bytes
pub fn parse(data: &[u8]) -> Result<Vec<Layer>, ConfigError> {
	Ok(serde_json::from_slice(data)?)
}

/// Serializes a descriptor back to pretty-printed JSON
pub fn to_json(layers: &[Layer]) -> Result<String, ConfigError> {
	Ok(serde_json::to_string_pretty(layers)?)
}
