//! Direct nearest-color quantization without dithering.

use std::sync::Arc;

use crate::color::RgbColor;
use crate::palette::{IndexedColor, IndexedColorMap};
use crate::surface::PixelSurface;

/// A stateless quantizing view: every RGB write becomes the nearest palette
/// index on the wrapped surface, and the residual is discarded.
///
/// Reads map the stored index back through the palette, so the view behaves
/// like an RGB surface that can only hold palette colors.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use inkcam::{
///     ColorName, IndexedColorMap, IndexedImage, PaletteEntry, PixelSurface, QuantizeView,
///     RgbColor,
/// };
///
/// let palette = Arc::new(
///     IndexedColorMap::new(
///         vec![
///             PaletteEntry::new(ColorName::Black, 0, RgbColor::new(0, 0, 0)),
///             PaletteEntry::new(ColorName::White, 1, RgbColor::new(255, 255, 255)),
///         ],
///         false,
///     )
///     .unwrap(),
/// );
///
/// let mut view = QuantizeView::new(IndexedImage::new(2, 2), palette);
/// view.set_pixel(0, 0, RgbColor::new(250, 250, 250));
/// assert_eq!(view.inner().get_pixel(0, 0), 1);
/// ```
#[derive(Debug)]
pub struct QuantizeView<S> {
    surface: S,
    palette: Arc<IndexedColorMap>,
}

impl<S: PixelSurface<Pixel = IndexedColor>> QuantizeView<S> {
    /// Wrap an indexed surface with a palette.
    pub fn new(surface: S, palette: Arc<IndexedColorMap>) -> Self {
        Self { surface, palette }
    }

    /// The wrapped indexed surface.
    pub fn inner(&self) -> &S {
        &self.surface
    }

    /// The wrapped indexed surface, mutably.
    pub fn inner_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Unwrap, returning the indexed surface.
    pub fn into_inner(self) -> S {
        self.surface
    }
}

impl<S: PixelSurface<Pixel = IndexedColor>> PixelSurface for QuantizeView<S> {
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
        self.surface.set_pixel(x, y, self.palette.nearest_rgb(color));
    }

    fn flush(&mut self) {
        self.surface.flush();
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::palette::{ColorName, PaletteEntry};
    use crate::surface::IndexedImage;

    fn bw_palette() -> Arc<IndexedColorMap> {
        Arc::new(
            IndexedColorMap::new(
                vec![
                    PaletteEntry::new(ColorName::Black, 0, RgbColor::new(0, 0, 0)),
                    PaletteEntry::new(ColorName::White, 1, RgbColor::new(255, 255, 255)),
                ],
                false,
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_writes_nearest_index() {
        let mut view = QuantizeView::new(IndexedImage::new(2, 1), bw_palette());
        view.set_pixel(0, 0, RgbColor::new(30, 30, 30));
        view.set_pixel(1, 0, RgbColor::new(230, 230, 230));
        assert_eq!(view.inner().get_pixel(0, 0), 0);
        assert_eq!(view.inner().get_pixel(1, 0), 1);
    }

    #[test]
    fn test_reads_palette_color_back() {
        let mut view = QuantizeView::new(IndexedImage::new(1, 1), bw_palette());
        view.set_pixel(0, 0, RgbColor::new(240, 250, 245));
        assert_eq!(view.get_pixel(0, 0), RgbColor::new(255, 255, 255));
    }

    #[test]
    fn test_out_of_bounds_passes_through_safely() {
        let mut view = QuantizeView::new(IndexedImage::new(1, 1), bw_palette());
        view.set_pixel(5, 5, RgbColor::new(255, 255, 255));
        assert_eq!(view.inner().get_pixel(0, 0), 0);
    }
}
