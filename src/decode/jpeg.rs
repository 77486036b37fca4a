//! Baseline JPEG MCU reassembly.
//!
//! Entropy decoding and the DCT are delegated to an external
//! [`BlockDecoder`] (the memory-constrained JPEG library on the device).
//! What lives here is the reassembly: the decoder hands over one MCU's raw
//! 8×8 sample planes per call, in a block layout that depends on the scan's
//! chroma subsampling, and [`decode_jpeg`] expands those blocks into a
//! row-major buffer covering one MCU row, then blits that buffer into the
//! destination. Memory stays at one MCU row (`mcu_height × row width`
//! pixels) instead of a full decoded frame.

use thiserror::Error;

use crate::color::RgbColor;
use crate::surface::PixelSurface;

use super::{ByteSource, DecodeError};

/// Sample width of one JPEG block edge.
const BLOCK_EDGE: usize = 8;
/// Samples per 8×8 block; multi-block planes place block `n` at `n * 64`.
const BLOCK_SAMPLES: usize = 64;

/// Chroma subsampling layout of a baseline JPEG scan.
///
/// Determines both the MCU pixel size and how the block decoder's plane
/// buffers tile into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanType {
    /// Single luma plane, duplicated into all three channels
    Grayscale,
    /// No subsampling: one 8×8 block per plane
    H1V1,
    /// 2×1 subsampling: two luma blocks side by side
    H2V1,
    /// 1×2 subsampling: two luma blocks stacked
    H1V2,
    /// 2×2 subsampling: four luma blocks in a square
    H2V2,
}

impl ScanType {
    /// MCU size in pixels, `(width, height)`.
    pub fn mcu_size(self) -> (usize, usize) {
        match self {
            ScanType::Grayscale | ScanType::H1V1 => (8, 8),
            ScanType::H2V1 => (16, 8),
            ScanType::H1V2 => (8, 16),
            ScanType::H2V2 => (16, 16),
        }
    }
}

/// Scan geometry reported by the block decoder after parsing headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct McuLayout {
    /// Subsampling layout of the scan
    pub scan_type: ScanType,
    /// MCU width in pixels
    pub mcu_width: usize,
    /// MCU height in pixels
    pub mcu_height: usize,
    /// MCUs per row of the image
    pub mcus_per_row: usize,
    /// MCU rows in the image
    pub mcus_per_col: usize,
}

/// One decoded MCU's sample planes.
///
/// Planes hold upsampled 8-bit samples with each additional luma block at a
/// 64-sample offset: H2V1 places its right block at +64, H1V2 its lower
/// block at +128, and H2V2 uses +64/+128/+192 for right/lower/lower-right.
/// Grayscale scans populate only `r`.
#[derive(Debug)]
pub struct McuPlanes<'a> {
    /// Red samples (luma for grayscale scans)
    pub r: &'a [u8],
    /// Green samples
    pub g: &'a [u8],
    /// Blue samples
    pub b: &'a [u8],
}

/// Failure status reported by the external block decoder.
///
/// Any non-zero code aborts the decode; the code itself is
/// decoder-specific and carried through for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("JPEG block decoder failed with status {code}")]
pub struct BlockDecodeError {
    /// The decoder's non-zero status code
    pub code: u8,
}

/// The external baseline-JPEG block decoder boundary.
///
/// [`begin`](Self::begin) parses headers from the source and reports the
/// scan geometry; each [`decode_mcu`](Self::decode_mcu) then yields one
/// MCU's planes, scanning left to right, top to bottom. The planes borrow
/// the decoder's internal buffers and are valid until the next call.
pub trait BlockDecoder {
    /// Parse the stream headers and report the scan layout.
    fn begin(&mut self, source: &mut dyn ByteSource) -> Result<McuLayout, BlockDecodeError>;

    /// Decode the next MCU.
    fn decode_mcu(&mut self, source: &mut dyn ByteSource)
        -> Result<McuPlanes<'_>, BlockDecodeError>;
}

/// Copy one 8×8 block into `dest` at the given row stride.
fn copy_block(r: &[u8], g: &[u8], b: &[u8], dest: &mut [RgbColor], stride: usize) {
    for row in 0..BLOCK_EDGE {
        for col in 0..BLOCK_EDGE {
            let s = row * BLOCK_EDGE + col;
            dest[row * stride + col] = RgbColor::new(r[s], g[s], b[s]);
        }
    }
}

/// Copy one 8×8 luma block into `dest`, duplicated across all channels.
fn copy_block_grayscale(luma: &[u8], dest: &mut [RgbColor], stride: usize) {
    for row in 0..BLOCK_EDGE {
        for col in 0..BLOCK_EDGE {
            let v = luma[row * BLOCK_EDGE + col];
            dest[row * stride + col] = RgbColor::new(v, v, v);
        }
    }
}

/// Expand one MCU's planes into `dest` according to the scan type.
///
/// `dest` starts at the MCU's top-left pixel and must span `stride` pixels
/// per row for the MCU's full height.
fn copy_mcu(scan_type: ScanType, planes: &McuPlanes<'_>, dest: &mut [RgbColor], stride: usize) {
    let below = BLOCK_EDGE * stride;
    match scan_type {
        ScanType::Grayscale => copy_block_grayscale(planes.r, dest, stride),
        ScanType::H1V1 => copy_block(planes.r, planes.g, planes.b, dest, stride),
        ScanType::H2V1 => {
            copy_block(planes.r, planes.g, planes.b, dest, stride);
            copy_block(
                &planes.r[BLOCK_SAMPLES..],
                &planes.g[BLOCK_SAMPLES..],
                &planes.b[BLOCK_SAMPLES..],
                &mut dest[BLOCK_EDGE..],
                stride,
            );
        }
        ScanType::H1V2 => {
            copy_block(planes.r, planes.g, planes.b, dest, stride);
            copy_block(
                &planes.r[2 * BLOCK_SAMPLES..],
                &planes.g[2 * BLOCK_SAMPLES..],
                &planes.b[2 * BLOCK_SAMPLES..],
                &mut dest[below..],
                stride,
            );
        }
        ScanType::H2V2 => {
            copy_block(planes.r, planes.g, planes.b, dest, stride);
            copy_block(
                &planes.r[BLOCK_SAMPLES..],
                &planes.g[BLOCK_SAMPLES..],
                &planes.b[BLOCK_SAMPLES..],
                &mut dest[BLOCK_EDGE..],
                stride,
            );
            copy_block(
                &planes.r[2 * BLOCK_SAMPLES..],
                &planes.g[2 * BLOCK_SAMPLES..],
                &planes.b[2 * BLOCK_SAMPLES..],
                &mut dest[below..],
                stride,
            );
            copy_block(
                &planes.r[3 * BLOCK_SAMPLES..],
                &planes.g[3 * BLOCK_SAMPLES..],
                &planes.b[3 * BLOCK_SAMPLES..],
                &mut dest[below + BLOCK_EDGE..],
                stride,
            );
        }
    }
}

/// Decode a baseline JPEG stream through an external block decoder.
///
/// Frame geometry comes from the decoder's reported [`McuLayout`]; the
/// destination is written row by row per MCU row, clipped to its own size.
/// `progress` fires once per MCU row with `mcu_row / mcu_rows`. Any
/// decoder failure aborts the decode, leaving rows already emitted in
/// place.
pub fn decode_jpeg<S, D>(
    source: &mut dyn ByteSource,
    decoder: &mut D,
    dest: &mut S,
    mut progress: Option<&mut dyn FnMut(f32)>,
) -> Result<(), DecodeError>
where
    S: PixelSurface<Pixel = RgbColor> + ?Sized,
    D: BlockDecoder + ?Sized,
{
    let layout = decoder.begin(source)?;
    tracing::debug!(scan_type = ?layout.scan_type, "decoding JPEG MCU stream");

    // One MCU row of decoded RGB, so dithering can run line-wise
    let row_width = layout.mcu_width * layout.mcus_per_row;
    let write_width = row_width.min(dest.width());
    let mut row_buf = vec![RgbColor::default(); row_width * layout.mcu_height];

    for mcu_y in 0..layout.mcus_per_col {
        for mcu_x in 0..layout.mcus_per_row {
            let planes = decoder.decode_mcu(source)?;
            copy_mcu(
                layout.scan_type,
                &planes,
                &mut row_buf[mcu_x * layout.mcu_width..],
                row_width,
            );
        }

        if let Some(cb) = progress.as_deref_mut() {
            cb(mcu_y as f32 / layout.mcus_per_col as f32);
        }

        let base_y = mcu_y * layout.mcu_height;
        for row in 0..layout.mcu_height {
            let y = base_y + row;
            if y >= dest.height() {
                break;
            }
            let line = &row_buf[row * row_width..];
            for x in 0..write_width {
                dest.set_pixel(x as i32, y as i32, line[x]);
            }
        }
    }

    Ok(())
}
