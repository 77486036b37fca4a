//! Session-level wiring: one entry point from sensor bytes to panel buffer.
//!
//! [`FramePipeline`] is the recommended way to drive the crate. It owns the
//! shared palette and the dithering configuration, and dispatches a frame
//! decode over any [`PixelFormat`](crate::PixelFormat) (or a JPEG block
//! decoder) onto any indexed surface. Each decode builds a fresh quantizing
//! view, so diffusion state can never leak between frames.
//!
//! ```
//! use std::sync::Arc;
//! use inkcam::api::{DitherMode, FramePipeline};
//! use inkcam::{
//!     ColorName, IndexedColorMap, MemorySource, Packed4BitImage, PaletteEntry, PixelFormat,
//!     RgbColor,
//! };
//!
//! let palette = Arc::new(
//!     IndexedColorMap::new(
//!         vec![
//!             PaletteEntry::new(ColorName::Black, 0, RgbColor::new(0, 0, 0)),
//!             PaletteEntry::new(ColorName::White, 1, RgbColor::new(255, 255, 255)),
//!         ],
//!         false,
//!     )
//!     .unwrap(),
//! );
//!
//! let pipeline = FramePipeline::new(palette).dither_mode(DitherMode::LabDiffusion);
//!
//! // A 2x2 RGB565 frame of white pixels
//! let mut source = MemorySource::new(vec![0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF]);
//! let mut panel = Packed4BitImage::new(2, 2);
//! pipeline
//!     .decode_frame(PixelFormat::Rgb565, 2, 2, &mut source, &mut panel, None)
//!     .unwrap();
//! assert_eq!(panel.data(), &[0x11, 0x11]);
//! ```

mod builder;
mod error;

pub use builder::{fill_test_pattern, DitherMode, FramePipeline};
pub use error::PipelineError;
