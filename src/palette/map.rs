//! Indexed color map: the palette lookup table at the heart of quantization.

use serde::{Deserialize, Serialize};

use super::error::PaletteError;
use super::{ColorName, IndexedColor};
use crate::color::{remap_clamp, LabColor, RgbColor};

/// Largest number of entries a palette may hold.
///
/// One value above the palette size is reserved for the skip-write marker
/// and 255 for "not found", which caps addressable entries at 254.
pub const MAX_PALETTE_ENTRIES: usize = 254;

/// Sentinel index returned for names with no mapping.
pub const UNMAPPED_INDEX: IndexedColor = 255;

/// One palette entry of the display-identification handoff: a symbolic
/// name, the device index it is wired to, and the RGB value it shows.
///
/// This is both the construction argument of [`IndexedColorMap`] and one
/// element of the serialized [`PaletteSpec`] description format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Symbolic color name
    pub name: ColorName,
    /// Device index the color is wired to
    pub index: IndexedColor,
    /// The RGB value the display produces for this index
    pub rgb: RgbColor,
}

impl PaletteEntry {
    /// Create a new palette entry.
    #[inline]
    pub const fn new(name: ColorName, index: IndexedColor, rgb: RgbColor) -> Self {
        Self { name, index, rgb }
    }
}

/// The palette description produced by the display-identification
/// collaborator: an ordered entry list plus a monochrome flag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteSpec {
    /// Palette entries in display order
    pub entries: Vec<PaletteEntry>,
    /// Collapse all colors to their grey equivalents
    #[serde(default)]
    pub monochrome: bool,
}

#[derive(Debug, Clone)]
struct Slot {
    name: ColorName,
    index: IndexedColor,
    rgb: RgbColor,
    lab: LabColor,
}

/// A display palette with synchronized name/index/RGB/Lab tables.
///
/// Built once when the display is identified and immutable afterwards,
/// except through the explicit [`normalize_by_rgb`](Self::normalize_by_rgb) /
/// [`normalize_by_lab`](Self::normalize_by_lab) calls which rewrite the RGB
/// and Lab tables together so they never drift apart.
///
/// Entries are stored in insertion order; that order is the display order
/// for test patterns and the tie-break order for nearest-color matching.
///
/// # Monochrome mode
///
/// In monochrome mode every entry's RGB is replaced at construction by the
/// grey whose lightness equals the input's Lab L, and Lab a/b are zeroed.
/// Nearest-color matching then compares lightness only.
#[derive(Debug, Clone)]
pub struct IndexedColorMap {
    monochrome: bool,
    slots: Vec<Slot>,
}

impl IndexedColorMap {
    /// Build a palette from an ordered entry list.
    ///
    /// # Errors
    ///
    /// - [`PaletteError::Empty`] for an empty entry list
    /// - [`PaletteError::TooManyEntries`] for more than 254 entries
    /// - [`PaletteError::DuplicateIndex`] if two entries share an index
    ///
    /// # Example
    ///
    /// ```
    /// use inkcam::{ColorName, IndexedColorMap, PaletteEntry, RgbColor};
    ///
    /// let map = IndexedColorMap::new(
    ///     vec![
    ///         PaletteEntry::new(ColorName::Black, 0, RgbColor::new(36, 39, 63)),
    ///         PaletteEntry::new(ColorName::White, 1, RgbColor::new(240, 230, 230)),
    ///     ],
    ///     false,
    /// )
    /// .unwrap();
    /// assert_eq!(map.len(), 2);
    /// ```
    pub fn new(entries: Vec<PaletteEntry>, monochrome: bool) -> Result<Self, PaletteError> {
        if entries.is_empty() {
            return Err(PaletteError::Empty);
        }
        if entries.len() > MAX_PALETTE_ENTRIES {
            return Err(PaletteError::TooManyEntries {
                count: entries.len(),
            });
        }
        for (i, entry) in entries.iter().enumerate() {
            if entries[..i].iter().any(|e| e.index == entry.index) {
                return Err(PaletteError::DuplicateIndex { index: entry.index });
            }
        }

        let slots = entries
            .into_iter()
            .map(|entry| {
                let lab = entry.rgb.to_lab();
                let (rgb, lab) = if monochrome {
                    let grey = remap_clamp(lab.l, 0.0, 100.0, 0.0, 255.0).round() as u8;
                    (RgbColor::new(grey, grey, grey), LabColor::new(lab.l, 0.0, 0.0))
                } else {
                    (entry.rgb, lab)
                };
                Slot {
                    name: entry.name,
                    index: entry.index,
                    rgb,
                    lab,
                }
            })
            .collect();

        Ok(Self { monochrome, slots })
    }

    /// Build a palette from a serialized [`PaletteSpec`] description.
    pub fn from_spec(spec: PaletteSpec) -> Result<Self, PaletteError> {
        Self::new(spec.entries, spec.monochrome)
    }

    /// Number of entries in the palette.
    #[inline]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if the palette holds no entries.
    ///
    /// Always `false` for maps built through [`new`](Self::new), which
    /// rejects empty entry lists.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// True if this palette was collapsed to monochrome at construction.
    #[inline]
    pub fn is_monochrome(&self) -> bool {
        self.monochrome
    }

    /// Device indices in insertion order.
    pub fn indices(&self) -> impl Iterator<Item = IndexedColor> + '_ {
        self.slots.iter().map(|s| s.index)
    }

    /// Symbolic names in insertion order.
    pub fn names(&self) -> impl Iterator<Item = ColorName> + '_ {
        self.slots.iter().map(|s| s.name)
    }

    /// True if the palette has an entry for `name`.
    pub fn contains(&self, name: ColorName) -> bool {
        self.slots.iter().any(|s| s.name == name)
    }

    /// Nearest palette entry to a Lab color, with the residual error.
    ///
    /// Exhaustive scan over all entries using squared Euclidean Lab distance
    /// (absolute lightness difference in monochrome mode). Ties break to the
    /// first entry in insertion order. The residual is `color - entry.lab`
    /// (lightness-only in monochrome mode) and feeds error diffusion.
    pub fn nearest_with_residual(&self, color: LabColor) -> (IndexedColor, LabColor) {
        let mut best_distance = f32::INFINITY;
        let mut best_index: IndexedColor = 0;
        let mut best_lab = LabColor::default();

        for slot in &self.slots {
            let distance = if self.monochrome {
                (slot.lab.l - color.l).abs()
            } else {
                slot.lab.distance_squared(color)
            };
            if distance < best_distance {
                best_distance = distance;
                best_index = slot.index;
                best_lab = slot.lab;
            }
        }

        let residual = if self.monochrome {
            LabColor::new(color.l - best_lab.l, 0.0, 0.0)
        } else {
            color - best_lab
        };
        (best_index, residual)
    }

    /// Nearest palette entry to a Lab color, discarding the residual.
    #[inline]
    pub fn nearest_lab(&self, color: LabColor) -> IndexedColor {
        self.nearest_with_residual(color).0
    }

    /// Nearest palette entry to an RGB color.
    #[inline]
    pub fn nearest_rgb(&self, color: RgbColor) -> IndexedColor {
        self.nearest_lab(color.to_lab())
    }

    /// The RGB value shown for `index`, or black for an unknown index.
    pub fn rgb_of(&self, index: IndexedColor) -> RgbColor {
        self.slots
            .iter()
            .find(|s| s.index == index)
            .map(|s| s.rgb)
            .unwrap_or_default()
    }

    /// The Lab value of `index`, or the zero color for an unknown index.
    pub fn lab_of(&self, index: IndexedColor) -> LabColor {
        self.slots
            .iter()
            .find(|s| s.index == index)
            .map(|s| s.lab)
            .unwrap_or_default()
    }

    /// The device index mapped to `name`.
    ///
    /// `Clean` without an explicit entry returns the palette size (the
    /// skip-write marker, not an error). Any other unmapped name returns
    /// [`UNMAPPED_INDEX`].
    pub fn index_of(&self, name: ColorName) -> IndexedColor {
        if let Some(slot) = self.slots.iter().find(|s| s.name == name) {
            return slot.index;
        }
        if name == ColorName::Clean {
            return self.slots.len() as IndexedColor;
        }
        UNMAPPED_INDEX
    }

    /// Rescale every entry's brightness so Black and White span [0, 255].
    ///
    /// The white endpoint is the brightest channel of the White entry and
    /// the black endpoint the darkest channel of the Black entry; unpinned
    /// (or absent) endpoints fall back to the full range. Each channel of
    /// every entry is remapped with clamping, and the Lab table is rebuilt
    /// from the new RGB values.
    pub fn normalize_by_rgb(&mut self, pin_black: bool, pin_white: bool) {
        let max = if pin_white && self.contains(ColorName::White) {
            self.rgb_of(self.index_of(ColorName::White)).brightest_channel()
        } else {
            255
        };
        let min = if pin_black && self.contains(ColorName::Black) {
            self.rgb_of(self.index_of(ColorName::Black)).darkest_channel()
        } else {
            0
        };

        for slot in &mut self.slots {
            let remap =
                |c: u8| remap_clamp(c as f32, min as f32, max as f32, 0.0, 255.0).round() as u8;
            let rgb = RgbColor::new(remap(slot.rgb.r), remap(slot.rgb.g), remap(slot.rgb.b));
            let lab = rgb.to_lab();
            slot.rgb = rgb;
            // A grey RGB converts to a/b values that are tiny but nonzero;
            // monochrome maps must keep them exactly zero.
            slot.lab = if self.monochrome {
                LabColor::new(lab.l, 0.0, 0.0)
            } else {
                lab
            };
        }
    }

    /// Rescale every entry's lightness so Black and White span L = [0, 100].
    ///
    /// The Lab-space counterpart of [`normalize_by_rgb`](Self::normalize_by_rgb):
    /// endpoints come from the White/Black entries' L values, each entry's L
    /// is remapped with clamping, and the RGB table is rebuilt from the new
    /// Lab values.
    pub fn normalize_by_lab(&mut self, pin_black: bool, pin_white: bool) {
        let max = if pin_white && self.contains(ColorName::White) {
            self.lab_of(self.index_of(ColorName::White)).l
        } else {
            100.0
        };
        let min = if pin_black && self.contains(ColorName::Black) {
            self.lab_of(self.index_of(ColorName::Black)).l
        } else {
            0.0
        };

        for slot in &mut self.slots {
            let lab = LabColor::new(
                remap_clamp(slot.lab.l, min, max, 0.0, 100.0),
                slot.lab.a,
                slot.lab.b,
            );
            slot.rgb = lab.to_rgb();
            slot.lab = lab;
        }
    }
}
