//! Dense row-major pixel storage.

use super::{linear_index, PixelSurface};
use crate::color::RgbColor;
use crate::palette::IndexedColor;

/// A dense image: one element per pixel, row-major.
///
/// # Example
///
/// ```
/// use inkcam::{PixelSurface, RgbColor, RgbImage};
///
/// let mut image = RgbImage::new(4, 3);
/// image.set_pixel(1, 2, RgbColor::new(10, 20, 30));
/// assert_eq!(image.get_pixel(1, 2), RgbColor::new(10, 20, 30));
///
/// // Out-of-range access is safe
/// image.set_pixel(-1, 99, RgbColor::new(1, 1, 1));
/// assert_eq!(image.get_pixel(-1, 99), RgbColor::default());
/// ```
#[derive(Debug, Clone)]
pub struct DenseImage<P> {
    width: usize,
    height: usize,
    data: Vec<P>,
}

/// Dense image of RGB pixels: the decode destination type.
pub type RgbImage = DenseImage<RgbColor>;

/// Dense image of palette indices.
pub type IndexedImage = DenseImage<IndexedColor>;

impl<P: Copy + Default> DenseImage<P> {
    /// Allocate a zeroed image of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![P::default(); width * height],
        }
    }

    /// The backing pixel data in row-major order.
    pub fn data(&self) -> &[P] {
        &self.data
    }
}

impl<P: Copy + Default> PixelSurface for DenseImage<P> {
    type Pixel = P;

    #[inline]
    fn width(&self) -> usize {
        self.width
    }

    #[inline]
    fn height(&self) -> usize {
        self.height
    }

    fn get_pixel(&self, x: i32, y: i32) -> P {
        match linear_index(self.width, self.height, x, y) {
            Some(i) => self.data[i],
            None => P::default(),
        }
    }

    fn set_pixel(&mut self, x: i32, y: i32, value: P) {
        if let Some(i) = linear_index(self.width, self.height, x, y) {
            self.data[i] = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_set_get_round_trip() {
        let mut image = IndexedImage::new(3, 2);
        image.set_pixel(2, 1, 7);
        assert_eq!(image.get_pixel(2, 1), 7);
        assert_eq!(image.get_pixel(0, 0), 0);
    }

    #[test]
    fn test_row_major_layout() {
        let mut image = IndexedImage::new(3, 2);
        image.set_pixel(1, 0, 1);
        image.set_pixel(0, 1, 2);
        assert_eq!(image.data(), &[0, 1, 0, 2, 0, 0]);
    }

    #[test]
    fn test_out_of_bounds_is_safe() {
        let mut image = RgbImage::new(2, 2);
        for (x, y) in [(-1, 0), (0, -1), (2, 0), (0, 2), (100, 100), (-5, -5)] {
            image.set_pixel(x, y, RgbColor::new(9, 9, 9));
            assert_eq!(image.get_pixel(x, y), RgbColor::default());
        }
        // Nothing inside was disturbed
        assert!(image.data().iter().all(|&p| p == RgbColor::default()));
    }

    #[test]
    fn test_zero_sized_image() {
        let mut image = IndexedImage::new(0, 0);
        image.set_pixel(0, 0, 1);
        assert_eq!(image.get_pixel(0, 0), 0);
    }
}
