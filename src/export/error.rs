use thiserror::Error;

/// Failure reported by a [`RenderedRegion`](super::RenderedRegion).
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RasterError {
    /// The oversampling factor cannot produce an image.
    #[error("invalid raster scale {0}")]
    InvalidScale(f32),

    /// The renderer could not produce pixels.
    #[error("rasterization failed: {0}")]
    Failed(String),
}

/// Failure handing an artifact to the host.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum DeliveryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The filename cannot be used by this delivery target.
    #[error("invalid artifact filename: {0}")]
    InvalidName(String),
}

/// Errors that end an export.
///
/// [`ExportError::RegionUnavailable`] is a precondition failure: nothing was
/// attempted and no progress indicator was shown. Every other variant is a
/// mid-pipeline failure that the user is told about.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ExportError {
    /// No rendered region is registered under the configured id.
    #[error("rendered region not found: {0}")]
    RegionUnavailable(String),

    /// Another export is still running.
    #[error("an export is already in progress")]
    Busy,

    #[error(transparent)]
    Rasterize(#[from] RasterError),

    /// The region rasterized to an image with no pixels.
    #[error("rendered region is empty")]
    EmptyRaster,

    #[error("pagination error: {0}")]
    Paginate(String),

    #[error("PDF assembly error: {0}")]
    Assemble(String),

    #[error("delivery failed: {0}")]
    Delivery(#[from] DeliveryError),
}

impl ExportError {
    /// True when the export never started because its input was missing.
    pub fn is_precondition(&self) -> bool {
        matches!(self, Self::RegionUnavailable(_))
    }
}
