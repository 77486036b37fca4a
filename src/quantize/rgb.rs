//! Integer RGB-space error diffusion view.

use std::sync::Arc;

use crate::color::RgbColor;
use crate::palette::{IndexedColor, IndexedColorMap};
use crate::surface::PixelSurface;

use super::{
    DEFAULT_DITHER_ACCURACY, DIFFUSE_BELOW, DIFFUSE_BELOW_LEFT, DIFFUSE_BELOW_RIGHT, DIFFUSE_RIGHT,
};

/// Per-channel RGB error carried between pixels, signed and unclamped.
type ChannelError = [i32; 3];

#[inline]
fn scale_error(error: ChannelError, factor: f32) -> ChannelError {
    [
        (error[0] as f32 * factor) as i32,
        (error[1] as f32 * factor) as i32,
        (error[2] as f32 * factor) as i32,
    ]
}

#[inline]
fn add_error(accumulator: &mut ChannelError, error: ChannelError) {
    accumulator[0] += error[0];
    accumulator[1] += error[1];
    accumulator[2] += error[2];
}

/// A quantizing view with Floyd–Steinberg error diffusion in integer RGB
/// channel space.
///
/// Row management is identical to [`LabDitherView`](super::LabDitherView):
/// two error rows, sequential row visitation, automatic reset on
/// out-of-order writes. The difference is the error domain: the desired
/// color is the written RGB plus the accumulated channel error, clamped to
/// [0, 255] per channel before the nearest-color lookup, and the residual
/// is the clamped desired value minus the chosen palette entry's RGB.
///
/// Faster than the Lab variant (one Lab conversion per pixel instead of
/// two) at some cost in perceptual match quality.
#[derive(Debug)]
pub struct RgbDitherView<S> {
    surface: S,
    palette: Arc<IndexedColorMap>,
    /// Residual attenuation in [0, 1]; see [`DEFAULT_DITHER_ACCURACY`].
    pub dither_accuracy: f32,
    current_row: Option<i32>,
    this_row: Vec<ChannelError>,
    next_row: Vec<ChannelError>,
}

impl<S: PixelSurface<Pixel = IndexedColor>> RgbDitherView<S> {
    /// Wrap an indexed surface with a palette and fresh diffusion state.
    pub fn new(surface: S, palette: Arc<IndexedColorMap>) -> Self {
        let width = surface.width();
        Self {
            surface,
            palette,
            dither_accuracy: DEFAULT_DITHER_ACCURACY,
            current_row: None,
            this_row: vec![[0; 3]; width],
            next_row: vec![[0; 3]; width],
        }
    }

    /// The wrapped indexed surface.
    pub fn inner(&self) -> &S {
        &self.surface
    }

    /// Unwrap, returning the indexed surface.
    pub fn into_inner(self) -> S {
        self.surface
    }

    /// Invalidate the accumulated diffusion error.
    pub fn reset_diffusion(&mut self) {
        self.current_row = None;
    }

    fn track_row(&mut self, y: i32) {
        match self.current_row {
            Some(row) if y == row => {}
            Some(row) if y == row + 1 => {
                std::mem::swap(&mut self.this_row, &mut self.next_row);
                self.next_row.fill([0; 3]);
                self.current_row = Some(y);
            }
            _ => {
                // Off by more than one row in either direction: treat as a
                // fresh frame.
                self.this_row.fill([0; 3]);
                self.next_row.fill([0; 3]);
                self.current_row = Some(y);
            }
        }
    }
}

impl<S: PixelSurface<Pixel = IndexedColor>> PixelSurface for RgbDitherView<S> {
    type Pixel = RgbColor;

    #[inline]
    fn width(&self) -> usize {
        self.surface.width()
    }

    #[inline]
    fn height(&self) -> usize {
        self.surface.height()
    }

    fn get_pixel(&self, x: i32, y: i32) -> RgbColor {
        self.palette.rgb_of(self.surface.get_pixel(x, y))
    }

    fn set_pixel(&mut self, x: i32, y: i32, color: RgbColor) {
        let width = self.surface.width() as i32;
        let height = self.surface.height() as i32;
        if x < 0 || x >= width || y < 0 || y >= height {
            return;
        }
        self.track_row(y);

        let xu = x as usize;
        let carried = self.this_row[xu];
        let desired = [
            (color.r as i32 + carried[0]).clamp(0, 255),
            (color.g as i32 + carried[1]).clamp(0, 255),
            (color.b as i32 + carried[2]).clamp(0, 255),
        ];

        let nearest = self.palette.nearest_rgb(RgbColor::new(
            desired[0] as u8,
            desired[1] as u8,
            desired[2] as u8,
        ));
        self.surface.set_pixel(x, y, nearest);

        let realized = self.palette.rgb_of(nearest);
        let error = scale_error(
            [
                desired[0] - realized.r as i32,
                desired[1] - realized.g as i32,
                desired[2] - realized.b as i32,
            ],
            self.dither_accuracy,
        );

        if x < width - 1 {
            add_error(&mut self.this_row[xu + 1], scale_error(error, DIFFUSE_RIGHT));
            add_error(&mut self.next_row[xu + 1], scale_error(error, DIFFUSE_BELOW_RIGHT));
        }
        if x > 0 {
            add_error(&mut self.next_row[xu - 1], scale_error(error, DIFFUSE_BELOW_LEFT));
        }
        if y < height - 1 {
            add_error(&mut self.next_row[xu], scale_error(error, DIFFUSE_BELOW));
        }
    }

    fn flush(&mut self) {
        self.surface.flush();
    }
}
