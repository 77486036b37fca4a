//! CIE L\*a\*b\* color type and sRGB conversions.
//!
//! Lab is the space used for nearest-palette-color matching and for the
//! Lab-variant error diffusion state. The conversion chain is the standard
//! sRGB → linear RGB → XYZ (D65) → L\*a\*b\* and its inverse.

use std::ops::{Add, AddAssign, Mul, Sub};

use super::rgb::RgbColor;

// D65 reference white
const XN: f32 = 0.95047;
const YN: f32 = 1.0;
const ZN: f32 = 1.08883;

// f(t) linearity threshold: (6/29)^3 and the linear segment slope/offset
const EPSILON: f32 = 0.008856452;
const KAPPA: f32 = 7.787037;
const OFFSET: f32 = 16.0 / 116.0;

/// A color in CIE L\*a\*b\* space.
///
/// `l` is lightness in [0, 100] for in-gamut colors; `a` and `b` are the
/// green–red and blue–yellow axes (typically within ±128). Values are not
/// clamped: accumulated diffusion error may push components out of the
/// nominal range, which is intentional.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LabColor {
    /// Lightness: 0 (black) to 100 (white) for in-gamut colors
    pub l: f32,
    /// Green–red axis
    pub a: f32,
    /// Blue–yellow axis
    pub b: f32,
}

impl LabColor {
    /// Create a new Lab color.
    #[inline]
    pub const fn new(l: f32, a: f32, b: f32) -> Self {
        Self { l, a, b }
    }

    /// Squared Euclidean distance in L\*a\*b\* space.
    ///
    /// This is the palette-matching metric: a fast approximation of
    /// perceptual deltaE. Palette tuning upstream is calibrated against this
    /// exact metric, so it must not be swapped for a perceptually exact one.
    #[inline]
    pub fn distance_squared(self, other: LabColor) -> f32 {
        let dl = self.l - other.l;
        let da = self.a - other.a;
        let db = self.b - other.b;
        dl * dl + da * da + db * db
    }

    /// Convert from 8-bit sRGB (D65 white point).
    pub fn from_rgb(rgb: RgbColor) -> Self {
        let r = srgb_to_linear(rgb.r as f32 / 255.0);
        let g = srgb_to_linear(rgb.g as f32 / 255.0);
        let b = srgb_to_linear(rgb.b as f32 / 255.0);

        let x = 0.4124564 * r + 0.3575761 * g + 0.1804375 * b;
        let y = 0.2126729 * r + 0.7151522 * g + 0.0721750 * b;
        let z = 0.0193339 * r + 0.1191920 * g + 0.9503041 * b;

        let fx = lab_f(x / XN);
        let fy = lab_f(y / YN);
        let fz = lab_f(z / ZN);

        Self {
            l: 116.0 * fy - 16.0,
            a: 500.0 * (fx - fy),
            b: 200.0 * (fy - fz),
        }
    }

    /// Convert to 8-bit sRGB, clamping each channel to [0, 255].
    ///
    /// Out-of-gamut Lab values (including diffusion-shifted ones) clamp
    /// rather than wrap.
    pub fn to_rgb(self) -> RgbColor {
        let fy = (self.l + 16.0) / 116.0;
        let fx = fy + self.a / 500.0;
        let fz = fy - self.b / 200.0;

        let x = XN * lab_f_inv(fx);
        let y = YN * lab_f_inv(fy);
        let z = ZN * lab_f_inv(fz);

        let r = 3.2404542 * x - 1.5371385 * y - 0.4985314 * z;
        let g = -0.9692660 * x + 1.8760108 * y + 0.0415560 * z;
        let b = 0.0556434 * x - 0.2040259 * y + 1.0572252 * z;

        RgbColor {
            r: encode_channel(r),
            g: encode_channel(g),
            b: encode_channel(b),
        }
    }
}

impl Add for LabColor {
    type Output = LabColor;

    #[inline]
    fn add(self, rhs: LabColor) -> LabColor {
        LabColor::new(self.l + rhs.l, self.a + rhs.a, self.b + rhs.b)
    }
}

impl Sub for LabColor {
    type Output = LabColor;

    #[inline]
    fn sub(self, rhs: LabColor) -> LabColor {
        LabColor::new(self.l - rhs.l, self.a - rhs.a, self.b - rhs.b)
    }
}

impl AddAssign for LabColor {
    #[inline]
    fn add_assign(&mut self, rhs: LabColor) {
        self.l += rhs.l;
        self.a += rhs.a;
        self.b += rhs.b;
    }
}

impl Mul<f32> for LabColor {
    type Output = LabColor;

    #[inline]
    fn mul(self, rhs: f32) -> LabColor {
        LabColor::new(self.l * rhs, self.a * rhs, self.b * rhs)
    }
}

#[inline]
fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

#[inline]
fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

#[inline]
fn lab_f(t: f32) -> f32 {
    if t > EPSILON {
        t.cbrt()
    } else {
        KAPPA * t + OFFSET
    }
}

#[inline]
fn lab_f_inv(t: f32) -> f32 {
    let t3 = t * t * t;
    if t3 > EPSILON {
        t3
    } else {
        (t - OFFSET) / KAPPA
    }
}

#[inline]
fn encode_channel(linear: f32) -> u8 {
    (linear_to_srgb(linear.clamp(0.0, 1.0)) * 255.0)
        .round()
        .clamp(0.0, 255.0) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_black_and_white_lightness() {
        let black = RgbColor::new(0, 0, 0).to_lab();
        assert!(black.l.abs() < 1e-3, "black L should be 0, got {}", black.l);

        let white = RgbColor::new(255, 255, 255).to_lab();
        assert!(
            (white.l - 100.0).abs() < 1e-2,
            "white L should be 100, got {}",
            white.l
        );
    }

    #[test]
    fn test_greys_are_achromatic() {
        for v in [32u8, 64, 128, 192, 224] {
            let lab = RgbColor::new(v, v, v).to_lab();
            assert!(lab.a.abs() < 0.01, "grey {} a should be ~0, got {}", v, lab.a);
            assert!(lab.b.abs() < 0.01, "grey {} b should be ~0, got {}", v, lab.b);
        }
    }

    #[test]
    fn test_red_known_values() {
        // Reference values for sRGB red under D65: L~53.24, a~80.09, b~67.20
        let red = RgbColor::new(255, 0, 0).to_lab();
        assert!((red.l - 53.24).abs() < 0.1, "red L, got {}", red.l);
        assert!((red.a - 80.09).abs() < 0.2, "red a, got {}", red.a);
        assert!((red.b - 67.20).abs() < 0.2, "red b, got {}", red.b);
    }

    #[test]
    fn test_round_trip_within_one_lsb() {
        for rgb in [
            RgbColor::new(0, 0, 0),
            RgbColor::new(255, 255, 255),
            RgbColor::new(255, 0, 0),
            RgbColor::new(0, 255, 0),
            RgbColor::new(0, 0, 255),
            RgbColor::new(128, 128, 128),
            RgbColor::new(36, 39, 63),
            RgbColor::new(240, 230, 230),
            RgbColor::new(195, 158, 56),
        ] {
            let back = rgb.to_lab().to_rgb();
            for (orig, got) in [(rgb.r, back.r), (rgb.g, back.g), (rgb.b, back.b)] {
                assert!(
                    (orig as i32 - got as i32).abs() <= 1,
                    "round trip {:?} -> {:?}",
                    rgb,
                    back
                );
            }
        }
    }

    #[test]
    fn test_distance_squared_properties() {
        let a = LabColor::new(50.0, 10.0, -5.0);
        let b = LabColor::new(60.0, -10.0, 5.0);

        assert_eq!(a.distance_squared(a), 0.0);
        assert_eq!(a.distance_squared(b), b.distance_squared(a));
        // 10^2 + 20^2 + 10^2
        assert!((a.distance_squared(b) - 600.0).abs() < 1e-3);
    }

    #[test]
    fn test_arithmetic_ops() {
        let a = LabColor::new(10.0, 2.0, -4.0);
        let b = LabColor::new(5.0, -1.0, 1.0);

        let sum = a + b;
        assert_eq!(sum, LabColor::new(15.0, 1.0, -3.0));

        let diff = a - b;
        assert_eq!(diff, LabColor::new(5.0, 3.0, -5.0));

        let scaled = a * 0.5;
        assert_eq!(scaled, LabColor::new(5.0, 1.0, -2.0));

        let mut acc = a;
        acc += b;
        assert_eq!(acc, sum);
    }
}
