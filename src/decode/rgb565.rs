//! RGB565 stream decoder.

use crate::color::RgbColor;
use crate::surface::PixelSurface;

use super::{check_frame_size, fill_line, ByteSource, DecodeError, RGB565_CHUNK_SAMPLES};

/// Decode a packed 16-bit RGB frame, one scanline at a time.
///
/// Samples are little-endian byte pairs expanded to 8-bit channels with MSB
/// replication. The source must hold exactly `width * height * 2` bytes;
/// writes are clipped to the destination, and `progress` (if given) fires
/// once per row with `row / height`.
pub fn decode_rgb565<S>(
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

    let write_width = width.min(dest.width()) as i32;
    let mut line = vec![0u8; width * 2];

    for y in 0..height {
        fill_line(source, &mut line, RGB565_CHUNK_SAMPLES * 2)?;

        if let Some(cb) = progress.as_deref_mut() {
            cb(y as f32 / height as f32);
        }
        if y >= dest.height() {
            continue;
        }

        for x in 0..write_width {
            let i = x as usize * 2;
            let sample = u16::from_le_bytes([line[i], line[i + 1]]);
            dest.set_pixel(x, y as i32, RgbColor::from_rgb565(sample));
        }
    }

    Ok(())
}
