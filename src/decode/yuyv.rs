//! Interleaved YUV 4:2:2 (YUYV) stream decoder.

use crate::color::{RgbColor, YuvColor};
use crate::surface::PixelSurface;

use super::{average, check_frame_size, fill_line, ByteSource, DecodeError, YUV_CHUNK_BYTES};

/// Decode an interleaved YUYV frame, one scanline at a time.
///
/// Every 4-byte group carries `(Y0, U, Y1, V)` for a pair of pixels: U is
/// co-sited with the even pixel, V with the odd one. Each pixel keeps its
/// co-sited chroma channel and horizontally interpolates the other from the
/// neighboring groups (`(a + b) / 2`); the first and last column have only
/// one neighboring sample and use it unblended.
pub fn decode_yuyv<S>(
    width: usize,
    height: usize,
    source: &mut dyn ByteSource,
    dest: &mut S,
    mut progress: Option<&mut dyn FnMut(f32)>,
) -> Result<(), DecodeError>
where
    S: PixelSurface<Pixel = RgbColor> + ?Sized,
{
    check_frame_size(source, width, height)?;

    let width_bytes = width * 2;
    let write_width = width.min(dest.width());
    let mut line = vec![0u8; width_bytes];

    for y in 0..height {
        fill_line(source, &mut line, YUV_CHUNK_BYTES)?;

        if let Some(cb) = progress.as_deref_mut() {
            cb(y as f32 / height as f32);
        }
        if y >= dest.height() {
            continue;
        }

        for x in 0..write_width {
            let group = (x / 2) * 4;
            if group + 3 >= width_bytes {
                // A trailing half group (odd width) has no V sample
                continue;
            }

            let luma = line[x * 2];
            let (u, v) = if x % 2 == 0 {
                let u = line[group + 1];
                let v = if x == 0 {
                    line[group + 3]
                } else {
                    average(line[group - 1], line[group + 3])
                };
                (u, v)
            } else {
                let v = line[group + 3];
                let u = if x == width - 1 {
                    line[group + 1]
                } else {
                    average(line[group + 1], line[group + 5])
                };
                (u, v)
            };

            dest.set_pixel(x as i32, y as i32, YuvColor::new(luma, u, v).to_rgb());
        }
    }

    Ok(())
}
