//! Watch face resolutions and clock id composition.
//!
//! The high 16 bits of a container's clock id encode the face resolution
//! through a fixed table; the low 16 bits are the clock id base, which must
//! lie in [50000, 65535]. Only a subset of the table may be chosen by
//! auto-detection from the first layer image.

use std::{fmt::Display, str::FromStr};

use super::super::error::ResError;

/// Smallest acceptable clock id base
pub const CLOCK_ID_MIN: u32 = 50000;

/// Largest acceptable clock id base
pub const CLOCK_ID_MAX: u32 = 65535;

/// Face resolutions known to the firmware
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolution {
	/// 454x454 round
	R454x454,
	/// 400x400 round
	R400x400,
	/// 466x466 round
	R466x466,
	/// 390x390 round
	R390x390,
	/// 410x502 rectangular
	R410x502,
	/// 320x384 rectangular
	R320x384,
	/// 320x385 rectangular
	R320x385,
	/// 368x448 rectangular
	R368x448,
	/// 390x450 rectangular
	R390x450,
	/// 360x360 round
	R360x360,
}

/// Every table entry, in firmware table order
pub const ALL: [Resolution; 10] = [
	Resolution::R454x454,
	Resolution::R400x400,
	Resolution::R466x466,
	Resolution::R390x390,
	Resolution::R410x502,
	Resolution::R320x384,
	Resolution::R320x385,
	Resolution::R368x448,
	Resolution::R390x450,
	Resolution::R360x360,
];

/// Resolutions that auto-detection from the first layer image may select
pub const AUTO_DETECTABLE: [Resolution; 5] = [
	Resolution::R466x466,
	Resolution::R360x360,
	Resolution::R320x385,
	Resolution::R368x448,
	Resolution::R390x450,
];

impl Resolution {
	/// Face dimensions in pixels
	pub fn dimensions(self) -> (u32, u32) {
		match self {
			Resolution::R454x454 => (454, 454),
			Resolution::R400x400 => (400, 400),
			Resolution::R466x466 => (466, 466),
			Resolution::R390x390 => (390, 390),
			Resolution::R410x502 => (410, 502),
			Resolution::R320x384 => (320, 384),
			Resolution::R320x385 => (320, 385),
			Resolution::R368x448 => (368, 448),
			Resolution::R390x450 => (390, 450),
			Resolution::R360x360 => (360, 360),
		}
	}

	/// Clock id prefix for this resolution (high 16 bits)
	pub fn prefix(self) -> u32 {
		match self {
			Resolution::R454x454 => 0x000F_0000,
			Resolution::R400x400 => 0x000E_0000,
			Resolution::R466x466 => 0x000D_0000,
			Resolution::R390x390 => 0x000C_0000,
			Resolution::R410x502 => 0x000B_0000,
			// 320x384 and 320x385 share a prefix
			Resolution::R320x384 | Resolution::R320x385 => 0x000A_0000,
			Resolution::R368x448 => 0x0009_0000,
			Resolution::R390x450 => 0x0008_0000,
			Resolution::R360x360 => 0x0007_0000,
		}
	}

	/// Looks up a table entry by exact pixel dimensions
	pub fn from_dimensions(width: u32, height: u32) -> Option<Self> {
		ALL.iter().copied().find(|r| r.dimensions() == (width, height))
	}

	/// Looks up a resolution auto-detection is allowed to pick
	pub fn detect(width: u32, height: u32) -> Result<Self, ResError> {
		AUTO_DETECTABLE
			.iter()
			.copied()
			.find(|r| r.dimensions() == (width, height))
			.ok_or(ResError::UnsupportedResolution {
				width,
				height,
			})
	}
}

impl Display for Resolution {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let (w, h) = self.dimensions();
		write!(f, "{}_{}", w, h)
	}
}

impl FromStr for Resolution {
	type Err = ResError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		let mut parts = s.split(['_', 'x']);
		let (Some(w), Some(h), None) = (parts.next(), parts.next(), parts.next()) else {
			return Err(ResError::UnsupportedResolution {
				width: 0,
				height: 0,
			});
		};
		let (Ok(w), Ok(h)) = (w.parse::<u32>(), h.parse::<u32>()) else {
			return Err(ResError::UnsupportedResolution {
				width: 0,
				height: 0,
			});
		};
		Resolution::from_dimensions(w, h).ok_or(ResError::UnsupportedResolution {
			width: w,
			height: h,
		})
	}
}

/// Composes a full clock id from a base and a resolution prefix.
///
/// The base must be in [[`CLOCK_ID_MIN`], [`CLOCK_ID_MAX`]].
pub fn compose_clock_id(base: u32, resolution: Resolution) -> Result<u32, ResError> {
	if !(CLOCK_ID_MIN..=CLOCK_ID_MAX).contains(&base) {
		return Err(ResError::BadClockId(base));
	}
	Ok(base | resolution.prefix())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_prefix_table() {
		assert_eq!(Resolution::R454x454.prefix(), 983040);
		assert_eq!(Resolution::R400x400.prefix(), 917504);
		assert_eq!(Resolution::R466x466.prefix(), 851968);
		assert_eq!(Resolution::R390x390.prefix(), 786432);
		assert_eq!(Resolution::R410x502.prefix(), 720896);
		assert_eq!(Resolution::R320x384.prefix(), 655360);
		assert_eq!(Resolution::R320x385.prefix(), 655360);
		assert_eq!(Resolution::R368x448.prefix(), 589824);
		assert_eq!(Resolution::R390x450.prefix(), 524288);
		assert_eq!(Resolution::R360x360.prefix(), 458752);
	}

	#[test]
	fn test_parse_arg_form() {
		assert_eq!("454_454".parse::<Resolution>().unwrap(), Resolution::R454x454);
		assert_eq!("320_385".parse::<Resolution>().unwrap(), Resolution::R320x385);
		assert!("500_500".parse::<Resolution>().is_err());
		assert!("454".parse::<Resolution>().is_err());
	}

	#[test]
	fn test_detect_subset() {
		assert_eq!(Resolution::detect(466, 466).unwrap(), Resolution::R466x466);
		// In the table but not auto-detectable
		assert!(matches!(
			Resolution::detect(454, 454),
			Err(ResError::UnsupportedResolution {
				width: 454,
				height: 454,
			})
		));
		assert!(Resolution::detect(500, 500).is_err());
	}

	#[test]
	fn test_compose_clock_id() {
		let id = compose_clock_id(50001, Resolution::R360x360).unwrap();
		assert_eq!(id, 0x0007_0000 | 50001);
		assert!(matches!(compose_clock_id(49999, Resolution::R360x360), Err(ResError::BadClockId(_))));
		assert!(matches!(compose_clock_id(65536, Resolution::R360x360), Err(ResError::BadClockId(_))));
	}
}
