//! Lab-space error diffusion view.

use std::sync::Arc;

use crate::color::{LabColor, RgbColor};
use crate::palette::{IndexedColor, IndexedColorMap};
use crate::surface::PixelSurface;

use super::{
    DEFAULT_DITHER_ACCURACY, DIFFUSE_BELOW, DIFFUSE_BELOW_LEFT, DIFFUSE_BELOW_RIGHT, DIFFUSE_RIGHT,
};

/// A quantizing view with Floyd–Steinberg error diffusion in Lab space.
///
/// Holds two rows of Lab error state (the row currently being written and
/// the next one down) so a full-frame error buffer is never needed. Pixels
/// must arrive in row order; a write to any row other than the current one
/// or its successor clears the state and restarts tracking at that row, as
/// at the start of a new frame.
///
/// `dither_accuracy` attenuates each pixel's residual exactly once, after
/// the nearest-color lookup and before diffusion, keeping accumulated error
/// bounded on palettes that cannot represent the input well.
#[derive(Debug)]
pub struct LabDitherView<S> {
    surface: S,
    palette: Arc<IndexedColorMap>,
    /// Residual attenuation in [0, 1]; see [`DEFAULT_DITHER_ACCURACY`].
    pub dither_accuracy: f32,
    current_row: Option<i32>,
    this_row: Vec<LabColor>,
    next_row: Vec<LabColor>,
}

impl<S: PixelSurface<Pixel = IndexedColor>> LabDitherView<S> {
    /// Wrap an indexed surface with a palette and fresh diffusion state.
    pub fn new(surface: S, palette: Arc<IndexedColorMap>) -> Self {
        let width = surface.width();
        Self {
            surface,
            palette,
            dither_accuracy: DEFAULT_DITHER_ACCURACY,
            current_row: None,
            this_row: vec![LabColor::default(); width],
            next_row: vec![LabColor::default(); width],
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
    ///
    /// Call between decode passes that reuse one view; the next write
    /// starts from clean state.
    pub fn reset_diffusion(&mut self) {
        // Marking the row unknown is enough; buffers are cleared on the
        // next write.
        self.current_row = None;
    }

    /// Clear or rotate the error rows so `y` becomes the current row.
    fn track_row(&mut self, y: i32) {
        match self.current_row {
            Some(row) if y == row => {}
            Some(row) if y == row + 1 => {
                std::mem::swap(&mut self.this_row, &mut self.next_row);
                self.next_row.fill(LabColor::default());
                self.current_row = Some(y);
            }
            _ => {
                // Off by more than one row in either direction: treat as a
                // fresh frame.
                self.this_row.fill(LabColor::default());
                self.next_row.fill(LabColor::default());
                self.current_row = Some(y);
            }
        }
    }
}

impl<S: PixelSurface<Pixel = IndexedColor>> PixelSurface for LabDitherView<S> {
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
        // The error rows are indexed by x, so bad coordinates must be
        // rejected at this layer, not just by the wrapped surface.
        if x < 0 || x >= width || y < 0 || y >= height {
            return;
        }
        self.track_row(y);

        let xu = x as usize;
        let desired = color.to_lab() + self.this_row[xu];

        let (nearest, residual) = self.palette.nearest_with_residual(desired);
        self.surface.set_pixel(x, y, nearest);

        let error = residual * self.dither_accuracy;

        if x < width - 1 {
            self.this_row[xu + 1] += error * DIFFUSE_RIGHT;
            self.next_row[xu + 1] += error * DIFFUSE_BELOW_RIGHT;
        }
        if x > 0 {
            self.next_row[xu - 1] += error * DIFFUSE_BELOW_LEFT;
        }
        if y < height - 1 {
            self.next_row[xu] += error * DIFFUSE_BELOW;
        }
    }

    fn flush(&mut self) {
        self.surface.flush();
    }
}
