//! Derived palettes: visual effects over a device's native color map.
//!
//! An effect palette keeps the device's physical indices (so packed buffers
//! still drive the right particles) but changes which image colors map to
//! them. A white/green duotone, for example, remaps the Green channel to
//! black and renders the image as a two-tone print; the grayscale rainbow
//! spreads a luminance ramp across every channel the panel has.

use super::map::{IndexedColorMap, PaletteEntry};
use super::ColorName;
use crate::color::RgbColor;

/// Named visual effects derivable from a device's native palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaletteEffect {
    /// Pure black and white
    BlackWhite,
    /// Black, white and red
    BlackWhiteRed,
    /// Black, white and yellow
    BlackWhiteYellow,
    /// Every channel remapped to its fully saturated canonical color
    Saturated,
    /// Monochrome input rendered on white and green
    WhiteGreenDuotone,
    /// Monochrome input rendered on yellow and black
    YellowBlackDuotone,
    /// Monochrome input rendered on red and blue
    RedBlueDuotone,
    /// Monochrome input spread over white, yellow, red and black
    WhiteYellowRedBlack,
    /// Monochrome input spread across the full palette as a luminance ramp
    GrayscaleRainbow,
}

/// Options controlling how an effect palette is derived.
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectOptions {
    /// Collapse the derived palette to monochrome, so image colors are
    /// matched by lightness alone.
    pub monochrome_input: bool,
    /// Drop requested channels missing from the base palette instead of
    /// failing the whole derivation.
    pub allow_missing: bool,
}

/// Derive a new palette from `base`, remapping the named channels to the
/// supplied target RGB values.
///
/// Each requested name is looked up in `base` to find its device index; the
/// derived palette pairs that index with the caller's RGB value. If a name
/// is absent and `allow_missing` is not set, the derivation fails and
/// returns `None` (never a partial palette). The base map is not modified.
pub fn apply_to_base_map(
    base: &IndexedColorMap,
    mapping: &[(ColorName, RgbColor)],
    options: EffectOptions,
) -> Option<IndexedColorMap> {
    if !options.allow_missing {
        for (name, _) in mapping {
            if !base.contains(*name) {
                return None;
            }
        }
    }

    let entries: Vec<PaletteEntry> = mapping
        .iter()
        .filter(|(name, _)| base.contains(*name))
        .map(|&(name, rgb)| PaletteEntry::new(name, base.index_of(name), rgb))
        .collect();

    IndexedColorMap::new(entries, options.monochrome_input).ok()
}

/// Derive the palette realizing a named [`PaletteEffect`] over `base`.
///
/// Returns `None` when the base palette lacks a channel the effect needs.
pub fn color_map_with_effect(
    base: &IndexedColorMap,
    effect: PaletteEffect,
) -> Option<IndexedColorMap> {
    let color_options = EffectOptions::default();
    let duotone_options = EffectOptions {
        monochrome_input: true,
        allow_missing: false,
    };

    match effect {
        PaletteEffect::BlackWhite => apply_to_base_map(
            base,
            &[
                (ColorName::White, RgbColor::new(255, 255, 255)),
                (ColorName::Black, RgbColor::new(0, 0, 0)),
            ],
            color_options,
        ),
        PaletteEffect::BlackWhiteRed => apply_to_base_map(
            base,
            &[
                (ColorName::White, RgbColor::new(255, 255, 255)),
                (ColorName::Black, RgbColor::new(0, 0, 0)),
                (ColorName::Red, RgbColor::new(255, 0, 0)),
            ],
            color_options,
        ),
        PaletteEffect::BlackWhiteYellow => apply_to_base_map(
            base,
            &[
                (ColorName::White, RgbColor::new(255, 255, 255)),
                (ColorName::Black, RgbColor::new(0, 0, 0)),
                (ColorName::Yellow, RgbColor::new(255, 255, 0)),
            ],
            color_options,
        ),
        PaletteEffect::Saturated => {
            let mapping: Vec<(ColorName, RgbColor)> = base
                .names()
                .map(|name| (name, name.saturated_rgb()))
                .collect();
            apply_to_base_map(base, &mapping, color_options)
        }
        PaletteEffect::WhiteGreenDuotone => apply_to_base_map(
            base,
            &[
                (ColorName::White, RgbColor::new(255, 255, 255)),
                (ColorName::Green, RgbColor::new(0, 0, 0)),
            ],
            duotone_options,
        ),
        PaletteEffect::YellowBlackDuotone => apply_to_base_map(
            base,
            &[
                (ColorName::Yellow, RgbColor::new(255, 255, 255)),
                (ColorName::Black, RgbColor::new(0, 0, 0)),
            ],
            duotone_options,
        ),
        PaletteEffect::RedBlueDuotone => apply_to_base_map(
            base,
            &[
                (ColorName::Blue, RgbColor::new(0, 0, 0)),
                (ColorName::Red, RgbColor::new(255, 255, 255)),
            ],
            duotone_options,
        ),
        PaletteEffect::WhiteYellowRedBlack => apply_to_base_map(
            base,
            &[
                (ColorName::Black, RgbColor::new(0, 0, 0)),
                (ColorName::White, RgbColor::new(255, 255, 255)),
                (ColorName::Red, RgbColor::new(80, 80, 80)),
                (ColorName::Yellow, RgbColor::new(168, 168, 168)),
            ],
            duotone_options,
        ),
        PaletteEffect::GrayscaleRainbow => apply_to_base_map(
            base,
            &[
                (ColorName::Black, RgbColor::new(0, 0, 0)),
                (ColorName::Blue, RgbColor::new(42, 42, 42)),
                (ColorName::Green, RgbColor::new(84, 84, 84)),
                (ColorName::Red, RgbColor::new(126, 126, 126)),
                (ColorName::Orange, RgbColor::new(168, 168, 168)),
                (ColorName::Yellow, RgbColor::new(210, 210, 210)),
                (ColorName::White, RgbColor::new(255, 255, 255)),
            ],
            duotone_options,
        ),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn seven_color_base() -> IndexedColorMap {
        IndexedColorMap::new(
            vec![
                PaletteEntry::new(ColorName::Black, 0, RgbColor::new(36, 39, 63)),
                PaletteEntry::new(ColorName::White, 1, RgbColor::new(240, 230, 230)),
                PaletteEntry::new(ColorName::Green, 2, RgbColor::new(56, 76, 46)),
                PaletteEntry::new(ColorName::Blue, 3, RgbColor::new(59, 54, 86)),
                PaletteEntry::new(ColorName::Red, 4, RgbColor::new(133, 55, 46)),
                PaletteEntry::new(ColorName::Yellow, 5, RgbColor::new(195, 158, 56)),
                PaletteEntry::new(ColorName::Orange, 6, RgbColor::new(159, 83, 57)),
            ],
            false,
        )
        .unwrap()
    }

    fn black_white_base() -> IndexedColorMap {
        IndexedColorMap::new(
            vec![
                PaletteEntry::new(ColorName::White, 0, RgbColor::new(255, 255, 255)),
                PaletteEntry::new(ColorName::Black, 1, RgbColor::new(0, 0, 0)),
            ],
            false,
        )
        .unwrap()
    }

    #[test]
    fn test_missing_channel_without_allow_fails() {
        let base = black_white_base();
        assert!(color_map_with_effect(&base, PaletteEffect::BlackWhiteRed).is_none());
        assert!(color_map_with_effect(&base, PaletteEffect::WhiteGreenDuotone).is_none());
    }

    #[test]
    fn test_missing_channel_with_allow_drops_it() {
        let base = black_white_base();
        let derived = apply_to_base_map(
            &base,
            &[
                (ColorName::White, RgbColor::new(255, 255, 255)),
                (ColorName::Red, RgbColor::new(255, 0, 0)),
            ],
            EffectOptions {
                monochrome_input: false,
                allow_missing: true,
            },
        )
        .unwrap();
        assert_eq!(derived.len(), 1);
        assert_eq!(derived.index_of(ColorName::White), 0);
    }

    #[test]
    fn test_derived_map_keeps_base_indices() {
        let base = seven_color_base();
        let derived = color_map_with_effect(&base, PaletteEffect::BlackWhiteRed).unwrap();
        assert_eq!(derived.index_of(ColorName::White), 1);
        assert_eq!(derived.index_of(ColorName::Black), 0);
        assert_eq!(derived.index_of(ColorName::Red), 4);
        // The base map is untouched
        assert_eq!(base.rgb_of(4), RgbColor::new(133, 55, 46));
    }

    #[test]
    fn test_duotone_is_monochrome() {
        let base = seven_color_base();
        let duotone = color_map_with_effect(&base, PaletteEffect::WhiteGreenDuotone).unwrap();
        assert!(duotone.is_monochrome());
        // A dark image color quantizes to the Green channel (mapped to black)
        assert_eq!(
            duotone.nearest_rgb(RgbColor::new(10, 10, 10)),
            base.index_of(ColorName::Green)
        );
        // A light image color quantizes to the White channel
        assert_eq!(
            duotone.nearest_rgb(RgbColor::new(250, 250, 250)),
            base.index_of(ColorName::White)
        );
    }

    #[test]
    fn test_saturated_remaps_every_channel() {
        let base = seven_color_base();
        let saturated = color_map_with_effect(&base, PaletteEffect::Saturated).unwrap();
        assert_eq!(saturated.len(), base.len());
        assert_eq!(saturated.rgb_of(4), RgbColor::new(255, 0, 0));
        assert_eq!(saturated.rgb_of(5), RgbColor::new(255, 255, 0));
        assert_eq!(saturated.index_of(ColorName::Orange), 6);
    }

    #[test]
    fn test_grayscale_rainbow_ramp() {
        let base = seven_color_base();
        let rainbow = color_map_with_effect(&base, PaletteEffect::GrayscaleRainbow).unwrap();
        assert!(rainbow.is_monochrome());
        assert_eq!(rainbow.len(), 7);
        // Mid-grey input lands somewhere inside the ramp, not at an endpoint
        let mid = rainbow.nearest_rgb(RgbColor::new(128, 128, 128));
        assert_ne!(mid, rainbow.index_of(ColorName::Black));
        assert_ne!(mid, rainbow.index_of(ColorName::White));
    }
}
