//! inkcam: streaming camera-to-e-paper decode and dithering pipeline.
//!
//! This library converts a live camera sensor's byte stream into a
//! palette-quantized framebuffer for a 2–7 color e-paper panel, on hardware
//! with only a few scanlines of RAM to spare. A full frame of decoded RGB
//! never exists: decoders emit pixels line by line into a quantizing view,
//! which resolves each one to a palette index and packs it straight into
//! the panel's wire format.
//!
//! # Pipeline
//!
//! ```text
//! ByteSource            (camera transport: SPI reads, <=255 bytes each)
//!     |
//!     v
//! StreamDecoder         (RGB565 / YUYV / YUYV-half / YUV-interline / JPEG MCU)
//!     |  RGB pixels, one scanline at a time
//!     v
//! QuantizingView        (nearest color; optional Lab or RGB error diffusion
//!     |                  with two rows of error state)
//!     |  palette indices
//!     v
//! PackedStorageBackend  (dense / 4-bit nibble-packed / two-plane 1-bit)
//!     |  raw backing bytes, panel wire format
//!     v
//! DisplaySink           (external: display controller transfer)
//! ```
//!
//! # Quick start
//!
//! ```
//! use std::sync::Arc;
//! use inkcam::api::{DitherMode, FramePipeline};
//! use inkcam::{
//!     ColorName, IndexedColorMap, IndexedImage, MemorySource, PaletteEntry, PixelFormat,
//!     PixelSurface, RgbColor,
//! };
//!
//! // Palette from the display-identification handshake
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
//! // A 2x1 RGB565 frame: one black pixel, one white pixel
//! let mut source = MemorySource::new(vec![0x00, 0x00, 0xFF, 0xFF]);
//! let mut framebuffer = IndexedImage::new(2, 1);
//!
//! FramePipeline::new(palette)
//!     .dither_mode(DitherMode::None)
//!     .decode_frame(PixelFormat::Rgb565, 2, 1, &mut source, &mut framebuffer, None)
//!     .unwrap();
//!
//! assert_eq!(framebuffer.get_pixel(0, 0), 0);
//! assert_eq!(framebuffer.get_pixel(1, 0), 1);
//! ```
//!
//! # Color science
//!
//! Palette matching runs in CIE L\*a\*b\*: an exhaustive scan over the
//! palette using squared Euclidean distance (lightness-only for monochrome
//! palettes). The metric is a deliberate fast approximation of perceptual
//! deltaE; measured panel palettes are tuned against it, so consistency
//! matters more than perceptual exactness here.
//!
//! Error diffusion adapts Floyd–Steinberg to a strictly forward single
//! pass: only the current and next row of error state are kept, and the
//! residual is attenuated once per pixel to keep accumulated error bounded
//! on palettes that cannot represent the input. See [`quantize`] for the
//! weights and the row-tracking rules.

pub mod api;
pub mod color;
pub mod decode;
pub mod palette;
pub mod quantize;
pub mod surface;


pub use color::{LabColor, RgbColor, YuvColor};
pub use decode::jpeg::{BlockDecodeError, BlockDecoder, McuLayout, McuPlanes, ScanType};
pub use decode::{
    decode_jpeg, decode_rgb565, decode_yuv_interline, decode_yuyv, decode_yuyv_half, ByteSource,
    DecodeError, MemorySource, PixelFormat,
};
pub use palette::{
    apply_to_base_map, color_map_with_effect, ColorName, EffectOptions, IndexedColor,
    IndexedColorMap, PaletteEffect, PaletteEntry, PaletteError, PaletteSpec,
};
pub use quantize::{LabDitherView, QuantizeView, RgbDitherView};
pub use surface::{
    DenseImage, IndexedImage, Packed4BitImage, PixelSurface, Plane, RgbImage, TwoPlaneImage,
};
