//! Display palettes: named/indexed color tables and derived effects.
//!
//! An e-paper panel advertises a small set of physical colors, each wired to
//! a device-specific index. [`IndexedColorMap`] holds that table in four
//! synchronized representations (name, index, RGB, Lab) and answers the two
//! questions the pipeline asks per pixel: "which palette entry is nearest to
//! this color?" and "what color does this index show?".
//!
//! The [`effect`] module derives alternate palettes (duotones, grayscale
//! remaps, saturated variants) that keep the device's physical indices while
//! changing how image colors map onto them.
//!
//! # Example
//!
//! ```
//! use inkcam::{ColorName, IndexedColorMap, PaletteEntry, RgbColor};
//!
//! let map = IndexedColorMap::new(
//!     vec![
//!         PaletteEntry::new(ColorName::Black, 0, RgbColor::new(0, 0, 0)),
//!         PaletteEntry::new(ColorName::White, 1, RgbColor::new(255, 255, 255)),
//!     ],
//!     false,
//! )
//! .unwrap();
//!
//! assert_eq!(map.nearest_rgb(RgbColor::new(20, 20, 20)), 0);
//! assert_eq!(map.nearest_rgb(RgbColor::new(230, 230, 230)), 1);
//! ```

pub mod effect;
mod error;
mod map;

pub use effect::{apply_to_base_map, color_map_with_effect, EffectOptions, PaletteEffect};
pub use error::PaletteError;
pub use map::{IndexedColorMap, PaletteEntry, PaletteSpec, MAX_PALETTE_ENTRIES, UNMAPPED_INDEX};

use serde::{Deserialize, Serialize};

use crate::color::RgbColor;

/// A color index into a display palette.
///
/// The value range depends on the palette size. By convention a value equal
/// to the palette size is the reserved "no visible effect / skip write"
/// marker, and [`UNMAPPED_INDEX`] (255) means "not found".
pub type IndexedColor = u8;

/// Symbolic names for the colors an e-paper panel can produce.
///
/// `Clean` is a control value rather than a color: it has no set visual
/// appearance and names the panel's particle-clearing drive state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ColorName {
    White,
    Magenta,
    Red,
    Orange,
    Yellow,
    Green,
    Cyan,
    Blue,
    Black,
    Clean,
}

impl ColorName {
    /// The canonical fully saturated RGB value for this name.
    ///
    /// Control values (`Clean`) map to black.
    pub fn saturated_rgb(self) -> RgbColor {
        match self {
            ColorName::White => RgbColor::new(255, 255, 255),
            ColorName::Magenta => RgbColor::new(255, 0, 255),
            ColorName::Red => RgbColor::new(255, 0, 0),
            ColorName::Orange => RgbColor::new(255, 127, 0),
            ColorName::Yellow => RgbColor::new(255, 255, 0),
            ColorName::Green => RgbColor::new(0, 255, 0),
            ColorName::Cyan => RgbColor::new(0, 255, 255),
            ColorName::Blue => RgbColor::new(0, 0, 255),
            ColorName::Black => RgbColor::new(0, 0, 0),
            ColorName::Clean => RgbColor::new(0, 0, 0),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_saturated_rgb_values() {
        assert_eq!(ColorName::White.saturated_rgb(), RgbColor::new(255, 255, 255));
        assert_eq!(ColorName::Orange.saturated_rgb(), RgbColor::new(255, 127, 0));
        assert_eq!(ColorName::Clean.saturated_rgb(), RgbColor::new(0, 0, 0));
    }
}
