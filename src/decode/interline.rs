//! Row-alternating YUV 4:2:2 stream decoder with vertical interpolation.

use crate::color::{RgbColor, YuvColor};
use crate::surface::PixelSurface;

use super::{average, check_frame_size, fill_line, ByteSource, DecodeError, YUV_CHUNK_BYTES};

/// Decode a YUV 4:2:2 frame whose chroma alternates by row.
///
/// Every row carries full-resolution luma at even bytes and one chroma
/// channel at odd bytes: U on even rows, V on odd rows. Three rotating
/// line buffers hold the newest row, the pending output row, and the row
/// before it: once a row's successor has been read, the pending row is
/// emitted with its missing chroma channel vertically interpolated from
/// the rows above and below (`(above + below) / 2`).
///
/// The first row has no row above and borrows the following row's chroma
/// unblended; the last row is emitted in the final iteration using only
/// the preceding row's chroma.
pub fn decode_yuv_interline<S>(
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
    // lines[0] receives the incoming row, lines[1] is the pending output
    // row, lines[2] the row before it.
    let mut lines: [Vec<u8>; 3] = [
        vec![0u8; width_bytes],
        vec![0u8; width_bytes],
        vec![0u8; width_bytes],
    ];
    // True while the incoming row carries U chroma; rows alternate starting
    // with U.
    let mut u_row = true;

    for y in 0..height {
        fill_line(source, &mut lines[0], YUV_CHUNK_BYTES)?;

        if let Some(cb) = progress.as_deref_mut() {
            cb(y as f32 / height as f32);
        }

        let (newest, pending, oldest) = (&lines[0], &lines[1], &lines[2]);

        if y == 1 && y - 1 < dest.height() {
            // First row: native U, V borrowed from the row below, unblended
            for x in 0..write_width {
                let sample = YuvColor::new(pending[x * 2], pending[x * 2 + 1], newest[x * 2 + 1]);
                dest.set_pixel(x as i32, 0, sample.to_rgb());
            }
        } else if y > 1 && y - 1 < dest.height() {
            let out_y = (y - 1) as i32;
            if u_row {
                // Pending row carries V; interpolate U from above and below
                for x in 0..write_width {
                    let sample = YuvColor::new(
                        pending[x * 2],
                        average(newest[x * 2 + 1], oldest[x * 2 + 1]),
                        pending[x * 2 + 1],
                    );
                    dest.set_pixel(x as i32, out_y, sample.to_rgb());
                }
            } else {
                // Pending row carries U; interpolate V from above and below
                for x in 0..write_width {
                    let sample = YuvColor::new(
                        pending[x * 2],
                        pending[x * 2 + 1],
                        average(newest[x * 2 + 1], oldest[x * 2 + 1]),
                    );
                    dest.set_pixel(x as i32, out_y, sample.to_rgb());
                }
            }
        }

        if y == height - 1 && y < dest.height() {
            // Last row: native chroma plus the preceding row's, unblended
            for x in 0..write_width {
                let sample = if u_row {
                    YuvColor::new(newest[x * 2], newest[x * 2 + 1], pending[x * 2 + 1])
                } else {
                    YuvColor::new(newest[x * 2], pending[x * 2 + 1], newest[x * 2 + 1])
                };
                dest.set_pixel(x as i32, y as i32, sample.to_rgb());
            }
        }

        u_row = !u_row;
        // lines[0] becomes the pending row, lines[2] is recycled as the
        // next read target.
        lines.rotate_right(1);
    }

    Ok(())
}
