//! Unified error type for the public API.

use thiserror::Error;

use crate::decode::DecodeError;
use crate::palette::PaletteError;

/// Unified error type wrapping every failure the pipeline can report, for
/// convenient `?` propagation in application code.
///
/// # Example
///
/// ```
/// use inkcam::api::PipelineError;
/// use inkcam::{IndexedColorMap, PaletteSpec};
///
/// fn palette_from_device(spec: PaletteSpec) -> Result<IndexedColorMap, PipelineError> {
///     Ok(IndexedColorMap::from_spec(spec)?)
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PipelineError {
    /// Palette construction failed
    #[error("palette error: {0}")]
    Palette(#[from] PaletteError),

    /// A frame decode failed
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wraps_both_error_families() {
        let palette_err: PipelineError = PaletteError::Empty.into();
        assert!(matches!(palette_err, PipelineError::Palette(_)));

        let decode_err: PipelineError = DecodeError::SizeMismatch {
            got: 1,
            expected: 2,
        }
        .into();
        assert!(matches!(decode_err, PipelineError::Decode(_)));
        assert_eq!(
            decode_err.to_string(),
            "decode error: bad image size: got 1 bytes, expected 2"
        );
    }
}
