//! Streaming decoders: sensor byte streams to RGB pixel writes.
//!
//! Each decoder pulls bytes from a [`ByteSource`] (the camera transport
//! boundary), decodes them line by line with only a few scanlines of
//! working memory, and pushes RGB pixels into any
//! [`PixelSurface`](crate::PixelSurface), typically one of the quantizing
//! views, so a full frame of decoded RGB never exists in memory.
//!
//! Five formats are supported:
//!
//! - [`decode_rgb565`]: packed 16-bit RGB, one line buffered.
//! - [`decode_yuyv`]: interleaved YUV 4:2:2 with horizontal chroma
//!   interpolation, one line buffered.
//! - [`decode_yuyv_half`]: YUYV averaged down to half width and half
//!   height, two lines buffered.
//! - [`decode_yuv_interline`]: YUV 4:2:2 with chroma alternating by row,
//!   three lines buffered for vertical interpolation.
//! - [`decode_jpeg`]: baseline JPEG via an external
//!   [`BlockDecoder`](jpeg::BlockDecoder), one MCU row buffered.
//!
//! Destination writes are clipped to the overlap of the decoded frame and
//! the destination surface, so a decode may target a smaller (or larger)
//! surface than the sensor frame. Progress callbacks fire once per output
//! row (or MCU row) with a monotone value in [0, 1), and never after
//! completion.

mod half;
mod interline;
pub mod jpeg;
mod rgb565;
mod yuyv;

pub use half::decode_yuyv_half;
pub use interline::decode_yuv_interline;
pub use jpeg::decode_jpeg;
pub use rgb565::decode_rgb565;
pub use yuyv::decode_yuyv;

use thiserror::Error;

/// Raw (non-JPEG) sensor pixel formats, all two bytes per pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Packed 16-bit RGB, 5/6/5 bits per channel
    Rgb565,
    /// Interleaved YUV 4:2:2, chroma alternating by column
    Yuyv,
    /// Interleaved YUV 4:2:2 decoded at half width and half height
    YuyvHalf,
    /// YUV 4:2:2 with chroma alternating by row
    YuvInterline,
}

/// Largest number of RGB565 samples requested per transport read.
pub(crate) const RGB565_CHUNK_SAMPLES: usize = 127;

/// Largest number of bytes requested per transport read for YUV formats.
pub(crate) const YUV_CHUNK_BYTES: usize = 255;

/// A pull-based byte stream: the camera transport boundary.
///
/// Decoders loop over [`try_read`](Self::try_read), accumulating partial
/// reads until a line's worth of bytes has arrived, and never request more
/// than the transport's per-transaction limit in one call. A source that
/// blocks stalls the decode (timeouts belong to the transport layer); a
/// source that returns 0 while bytes are still expected fails it.
pub trait ByteSource {
    /// Read up to `buf.len()` bytes into `buf`, returning how many were
    /// actually read. 0 means the source is exhausted or dead.
    fn try_read(&mut self, buf: &mut [u8]) -> usize;

    /// Bytes remaining in the current frame.
    fn total_available(&self) -> usize;
}

/// An in-memory [`ByteSource`] over a byte vector, for replay and tests.
#[derive(Debug, Clone)]
pub struct MemorySource {
    data: Vec<u8>,
    position: usize,
}

impl MemorySource {
    /// Wrap a frame's bytes.
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            position: 0,
        }
    }
}

impl ByteSource for MemorySource {
    fn try_read(&mut self, buf: &mut [u8]) -> usize {
        let n = buf.len().min(self.data.len() - self.position);
        buf[..n].copy_from_slice(&self.data[self.position..self.position + n]);
        self.position += n;
        n
    }

    fn total_available(&self) -> usize {
        self.data.len() - self.position
    }
}

/// Error type for stream decoding.
///
/// Preconditions are checked before any byte is consumed or pixel written;
/// mid-stream failures leave already-emitted rows in the destination.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The source holds a different byte count than the frame needs.
    #[error("bad image size: got {got} bytes, expected {expected}")]
    SizeMismatch {
        /// Bytes the source reports available
        got: usize,
        /// Bytes the decode requires
        expected: usize,
    },

    /// Half-resolution decoding needs even dimensions.
    #[error("dimensions {width}x{height} must be even")]
    OddDimensions {
        /// Requested frame width
        width: usize,
        /// Requested frame height
        height: usize,
    },

    /// The source returned no bytes while more were expected.
    #[error("byte source stalled: got {got} of {expected} bytes for the current line")]
    SourceStalled {
        /// Bytes collected for the line so far
        got: usize,
        /// Bytes the line needs
        expected: usize,
    },

    /// The external JPEG block decoder reported a failure.
    #[error(transparent)]
    Block(#[from] jpeg::BlockDecodeError),
}

/// Fill `line` from the source in reads of at most `chunk` bytes.
pub(crate) fn fill_line(
    source: &mut dyn ByteSource,
    line: &mut [u8],
    chunk: usize,
) -> Result<(), DecodeError> {
    let expected = line.len();
    let mut filled = 0;
    while filled < expected {
        let want = chunk.min(expected - filled);
        let n = source.try_read(&mut line[filled..filled + want]);
        if n == 0 {
            return Err(DecodeError::SourceStalled {
                got: filled,
                expected,
            });
        }
        filled += n;
    }
    Ok(())
}

/// Check the two-bytes-per-pixel precondition shared by the raw formats.
pub(crate) fn check_frame_size(
    source: &dyn ByteSource,
    width: usize,
    height: usize,
) -> Result<(), DecodeError> {
    let expected = width * height * 2;
    let got = source.total_available();
    if got != expected {
        tracing::warn!(got, expected, "bad image size");
        return Err(DecodeError::SizeMismatch { got, expected });
    }
    Ok(())
}

/// Integer average of two chroma samples.
#[inline]
pub(crate) fn average(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16) / 2) as u8
}
