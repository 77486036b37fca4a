//! Half-resolution YUYV stream decoder.

use crate::color::{RgbColor, YuvColor};
use crate::surface::PixelSurface;

use super::{average, check_frame_size, fill_line, ByteSource, DecodeError, YUV_CHUNK_BYTES};

/// Decode an interleaved YUYV frame at half width and half height.
///
/// Reads two scanlines per iteration and emits one output row. Each output
/// pixel is the integer average of its 2×2 source block: all four luma
/// samples, and the two chroma samples per channel the block carries.
/// Useful when the sensor's smallest frame still overshoots the panel.
///
/// Requires even `width` and `height`; fails with
/// [`DecodeError::OddDimensions`] otherwise, before consuming any bytes.
pub fn decode_yuyv_half<S>(
    width: usize,
    height: usize,
    source: &mut dyn ByteSource,
    dest: &mut S,
    mut progress: Option<&mut dyn FnMut(f32)>,
) -> Result<(), DecodeError>
where
    S: PixelSurface<Pixel = RgbColor> + ?Sized,
{
    if width % 2 != 0 || height % 2 != 0 {
        tracing::warn!(width, height, "half-resolution decode needs even dimensions");
        return Err(DecodeError::OddDimensions { width, height });
    }
    check_frame_size(source, width, height)?;

    let width_bytes = width * 2;
    let out_width = width / 2;
    let out_height = height / 2;
    let write_width = out_width.min(dest.width());
    let mut upper = vec![0u8; width_bytes];
    let mut lower = vec![0u8; width_bytes];

    for out_y in 0..out_height {
        fill_line(source, &mut upper, YUV_CHUNK_BYTES)?;
        fill_line(source, &mut lower, YUV_CHUNK_BYTES)?;

        if let Some(cb) = progress.as_deref_mut() {
            cb(out_y as f32 / out_height as f32);
        }
        if out_y >= dest.height() {
            continue;
        }

        for out_x in 0..write_width {
            // One output pixel per 4-byte group: two luma samples per row,
            // one chroma pair per row.
            let base = out_x * 4;
            let luma = ((upper[base] as u16
                + upper[base + 2] as u16
                + lower[base] as u16
                + lower[base + 2] as u16)
                / 4) as u8;
            let u = average(upper[base + 1], lower[base + 1]);
            let v = average(upper[base + 3], lower[base + 3]);

            dest.set_pixel(
                out_x as i32,
                out_y as i32,
                YuvColor::new(luma, u, v).to_rgb(),
            );
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::decode::MemorySource;
    use crate::surface::RgbImage;

    #[test]
    fn test_4x2_block_averages_exactly() {
        // Row 0: [Y=10, U=60, Y=20, V=100], [Y=30, U=200, Y=40, V=50]
        // Row 1: [Y=50, U=80, Y=60, V=140], [Y=70, U=220, Y=80, V=70]
        let bytes = vec![
            10, 60, 20, 100, 30, 200, 40, 50, //
            50, 80, 60, 140, 70, 220, 80, 70,
        ];
        let mut source = MemorySource::new(bytes);
        let mut dest = RgbImage::new(2, 1);
        decode_yuyv_half(4, 2, &mut source, &mut dest, None).unwrap();

        // Pixel 0: Y = (10+20+50+60)/4 = 35, U = (60+80)/2 = 70, V = (100+140)/2 = 120
        assert_eq!(dest.get_pixel(0, 0), YuvColor::new(35, 70, 120).to_rgb());
        // Pixel 1: Y = (30+40+70+80)/4 = 55, U = (200+220)/2 = 210, V = (50+70)/2 = 60
        assert_eq!(dest.get_pixel(1, 0), YuvColor::new(55, 210, 60).to_rgb());
    }

    #[test]
    fn test_odd_dimensions_rejected_before_reading() {
        struct PanicSource;
        impl ByteSource for PanicSource {
            fn try_read(&mut self, _buf: &mut [u8]) -> usize {
                panic!("must not read with odd dimensions");
            }
            fn total_available(&self) -> usize {
                30
            }
        }

        let mut dest = RgbImage::new(2, 2);
        assert_eq!(
            decode_yuyv_half(3, 2, &mut PanicSource, &mut dest, None).unwrap_err(),
            DecodeError::OddDimensions {
                width: 3,
                height: 2
            }
        );
        assert_eq!(
            decode_yuyv_half(2, 5, &mut PanicSource, &mut dest, None).unwrap_err(),
            DecodeError::OddDimensions {
                width: 2,
                height: 5
            }
        );
    }

    #[test]
    fn test_size_precondition_uses_source_dimensions() {
        let mut source = MemorySource::new(vec![0u8; 16]);
        let mut dest = RgbImage::new(2, 1);
        // 4x4 would need 32 bytes even though the output is only 2x2
        let err = decode_yuyv_half(4, 4, &mut source, &mut dest, None).unwrap_err();
        assert_eq!(
            err,
            DecodeError::SizeMismatch {
                got: 16,
                expected: 32
            }
        );
    }

    #[test]
    fn test_progress_per_output_row() {
        let mut source = MemorySource::new(vec![0u8; 4 * 4 * 2]);
        let mut dest = RgbImage::new(2, 2);
        let mut reports = Vec::new();
        let mut cb = |p: f32| reports.push(p);
        decode_yuyv_half(4, 4, &mut source, &mut dest, Some(&mut cb)).unwrap();
        assert_eq!(reports, vec![0.0, 0.5]);
    }
}
