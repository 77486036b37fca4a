//! FramePipeline: palette + dither configuration + format dispatch.

use std::sync::Arc;

use crate::color::RgbColor;
use crate::decode::jpeg::BlockDecoder;
use crate::decode::{
    decode_jpeg, decode_rgb565, decode_yuv_interline, decode_yuyv, decode_yuyv_half, ByteSource,
    DecodeError, PixelFormat,
};
use crate::palette::{IndexedColor, IndexedColorMap};
use crate::quantize::{LabDitherView, QuantizeView, RgbDitherView, DEFAULT_DITHER_ACCURACY};
use crate::surface::PixelSurface;

/// How RGB pixels are resolved to palette indices during a decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DitherMode {
    /// Nearest palette color, no error diffusion
    None,
    /// Error diffusion in Lab space (best match quality)
    #[default]
    LabDiffusion,
    /// Error diffusion in integer RGB space (cheapest)
    RgbDiffusion,
}

/// Decode session configuration: a shared palette, a dither mode, and the
/// diffusion accuracy.
///
/// The pipeline is reusable across frames; every
/// [`decode_frame`](Self::decode_frame) call wraps the destination in a
/// fresh quantizing view.
#[derive(Debug, Clone)]
pub struct FramePipeline {
    palette: Arc<IndexedColorMap>,
    mode: DitherMode,
    accuracy: f32,
}

impl FramePipeline {
    /// Create a pipeline over a display's palette.
    ///
    /// Defaults: Lab-space diffusion at accuracy 0.95.
    pub fn new(palette: Arc<IndexedColorMap>) -> Self {
        Self {
            palette,
            mode: DitherMode::default(),
            accuracy: DEFAULT_DITHER_ACCURACY,
        }
    }

    /// Set the dither mode.
    #[inline]
    pub fn dither_mode(mut self, mode: DitherMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the diffusion accuracy (sane values 0.5 to 1.0).
    ///
    /// Ignored by [`DitherMode::None`].
    #[inline]
    pub fn dither_accuracy(mut self, accuracy: f32) -> Self {
        self.accuracy = accuracy;
        self
    }

    /// The palette this pipeline quantizes against.
    #[inline]
    pub fn palette(&self) -> &Arc<IndexedColorMap> {
        &self.palette
    }

    /// Decode one raw-format frame from `source` onto `dest`.
    pub fn decode_frame<S>(
        &self,
        format: PixelFormat,
        width: usize,
        height: usize,
        source: &mut dyn ByteSource,
        dest: &mut S,
        progress: Option<&mut dyn FnMut(f32)>,
    ) -> Result<(), DecodeError>
    where
        S: PixelSurface<Pixel = IndexedColor>,
    {
        match self.mode {
            DitherMode::None => {
                let mut view = QuantizeView::new(&mut *dest, self.palette.clone());
                decode_raw(format, width, height, source, &mut view, progress)
            }
            DitherMode::LabDiffusion => {
                let mut view = LabDitherView::new(&mut *dest, self.palette.clone());
                view.dither_accuracy = self.accuracy;
                decode_raw(format, width, height, source, &mut view, progress)
            }
            DitherMode::RgbDiffusion => {
                let mut view = RgbDitherView::new(&mut *dest, self.palette.clone());
                view.dither_accuracy = self.accuracy;
                decode_raw(format, width, height, source, &mut view, progress)
            }
        }
    }

    /// Decode one JPEG frame from `source` through `decoder` onto `dest`.
    ///
    /// Frame geometry comes from the block decoder's parsed headers.
    pub fn decode_jpeg_frame<S, D>(
        &self,
        source: &mut dyn ByteSource,
        decoder: &mut D,
        dest: &mut S,
        progress: Option<&mut dyn FnMut(f32)>,
    ) -> Result<(), DecodeError>
    where
        S: PixelSurface<Pixel = IndexedColor>,
        D: BlockDecoder + ?Sized,
    {
        match self.mode {
            DitherMode::None => {
                let mut view = QuantizeView::new(&mut *dest, self.palette.clone());
                decode_jpeg(source, decoder, &mut view, progress)
            }
            DitherMode::LabDiffusion => {
                let mut view = LabDitherView::new(&mut *dest, self.palette.clone());
                view.dither_accuracy = self.accuracy;
                decode_jpeg(source, decoder, &mut view, progress)
            }
            DitherMode::RgbDiffusion => {
                let mut view = RgbDitherView::new(&mut *dest, self.palette.clone());
                view.dither_accuracy = self.accuracy;
                decode_jpeg(source, decoder, &mut view, progress)
            }
        }
    }
}

fn decode_raw<V>(
    format: PixelFormat,
    width: usize,
    height: usize,
    source: &mut dyn ByteSource,
    view: &mut V,
    progress: Option<&mut dyn FnMut(f32)>,
) -> Result<(), DecodeError>
where
    V: PixelSurface<Pixel = RgbColor>,
{
    match format {
        PixelFormat::Rgb565 => decode_rgb565(width, height, source, view, progress),
        PixelFormat::Yuyv => decode_yuyv(width, height, source, view, progress),
        PixelFormat::YuyvHalf => decode_yuyv_half(width, height, source, view, progress),
        PixelFormat::YuvInterline => decode_yuv_interline(width, height, source, view, progress),
    }
}

/// Paint vertical color bars onto an indexed surface, one bar per palette
/// entry in insertion order.
///
/// The panel's own display order makes a recognizable factory test card;
/// any leftover columns repeat the last color.
pub fn fill_test_pattern<S>(dest: &mut S, palette: &IndexedColorMap)
where
    S: PixelSurface<Pixel = IndexedColor>,
{
    let indices: Vec<IndexedColor> = palette.indices().collect();
    if indices.is_empty() {
        return;
    }
    let cols_per_color = (dest.width() / indices.len()).max(1);

    for y in 0..dest.height() as i32 {
        for x in 0..dest.width() as i32 {
            let bar = (x as usize / cols_per_color).min(indices.len() - 1);
            dest.set_pixel(x, y, indices[bar]);
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::decode::MemorySource;
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

    fn rgb565_frame(samples: &[u16]) -> MemorySource {
        MemorySource::new(
            samples
                .iter()
                .flat_map(|s| s.to_le_bytes())
                .collect::<Vec<u8>>(),
        )
    }

    #[test]
    fn test_decode_frame_without_dithering() {
        let pipeline = FramePipeline::new(bw_palette()).dither_mode(DitherMode::None);
        let mut source = rgb565_frame(&[0xFFFF, 0x0000, 0x0000, 0xFFFF]);
        let mut dest = IndexedImage::new(2, 2);
        pipeline
            .decode_frame(PixelFormat::Rgb565, 2, 2, &mut source, &mut dest, None)
            .unwrap();

        assert_eq!(dest.data(), &[1, 0, 0, 1]);
    }

    #[test]
    fn test_decode_frame_each_mode_produces_valid_indices() {
        for mode in [
            DitherMode::None,
            DitherMode::LabDiffusion,
            DitherMode::RgbDiffusion,
        ] {
            let pipeline = FramePipeline::new(bw_palette())
                .dither_mode(mode)
                .dither_accuracy(0.75);
            // 4x2 frame of mid-grey (RGB565 0x8410 ~ 132/130/132)
            let mut source = rgb565_frame(&[0x8410; 8]);
            let mut dest = IndexedImage::new(4, 2);
            pipeline
                .decode_frame(PixelFormat::Rgb565, 4, 2, &mut source, &mut dest, None)
                .unwrap();
            assert!(
                dest.data().iter().all(|&i| i <= 1),
                "mode {mode:?} wrote an out-of-palette index"
            );
        }
    }

    #[test]
    fn test_decode_frame_propagates_precondition_failure() {
        let pipeline = FramePipeline::new(bw_palette());
        let mut source = MemorySource::new(vec![0u8; 3]);
        let mut dest = IndexedImage::new(2, 2);
        let err = pipeline
            .decode_frame(PixelFormat::Yuyv, 2, 2, &mut source, &mut dest, None)
            .unwrap_err();
        assert!(matches!(err, DecodeError::SizeMismatch { .. }));
    }

    #[test]
    fn test_decode_jpeg_frame_through_block_decoder() {
        use crate::decode::jpeg::{BlockDecodeError, McuLayout, McuPlanes, ScanType};

        // One grayscale MCU of a light tone: quantizes to white everywhere
        struct LightMcu {
            luma: Vec<u8>,
        }
        impl BlockDecoder for LightMcu {
            fn begin(
                &mut self,
                _source: &mut dyn ByteSource,
            ) -> Result<McuLayout, BlockDecodeError> {
                Ok(McuLayout {
                    scan_type: ScanType::Grayscale,
                    mcu_width: 8,
                    mcu_height: 8,
                    mcus_per_row: 1,
                    mcus_per_col: 1,
                })
            }

            fn decode_mcu(
                &mut self,
                _source: &mut dyn ByteSource,
            ) -> Result<McuPlanes<'_>, BlockDecodeError> {
                Ok(McuPlanes {
                    r: &self.luma,
                    g: &[],
                    b: &[],
                })
            }
        }

        let pipeline = FramePipeline::new(bw_palette()).dither_mode(DitherMode::None);
        let mut source = MemorySource::new(vec![]);
        let mut decoder = LightMcu {
            luma: vec![230; 64],
        };
        let mut dest = IndexedImage::new(8, 8);
        pipeline
            .decode_jpeg_frame(&mut source, &mut decoder, &mut dest, None)
            .unwrap();

        assert!(dest.data().iter().all(|&i| i == 1));
    }

    #[test]
    fn test_fill_test_pattern_bars_in_insertion_order() {
        let palette = IndexedColorMap::new(
            vec![
                PaletteEntry::new(ColorName::Black, 3, RgbColor::new(0, 0, 0)),
                PaletteEntry::new(ColorName::White, 1, RgbColor::new(255, 255, 255)),
                PaletteEntry::new(ColorName::Red, 4, RgbColor::new(255, 0, 0)),
            ],
            false,
        )
        .unwrap();

        let mut dest = IndexedImage::new(6, 2);
        fill_test_pattern(&mut dest, &palette);

        assert_eq!(dest.data(), &[3, 3, 1, 1, 4, 4, 3, 3, 1, 1, 4, 4]);
    }

    #[test]
    fn test_fill_test_pattern_leftover_columns_repeat_last_color() {
        let palette = IndexedColorMap::new(
            vec![
                PaletteEntry::new(ColorName::Black, 0, RgbColor::new(0, 0, 0)),
                PaletteEntry::new(ColorName::White, 1, RgbColor::new(255, 255, 255)),
            ],
            false,
        )
        .unwrap();

        let mut dest = IndexedImage::new(5, 1);
        fill_test_pattern(&mut dest, &palette);
        assert_eq!(dest.data(), &[0, 0, 1, 1, 1]);
    }
}
