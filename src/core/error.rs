use thiserror::Error;

/// Errors from persisting or restoring invoice data.
///
/// Loading never returns these to the caller: a bad or missing entry falls
/// back to its default. They surface only from explicit saves.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum InvoiceError {
    /// The key-value backend failed to read or write.
    #[error("storage error: {0}")]
    Storage(String),

    /// A value could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(String),
}

impl From<std::io::Error> for InvoiceError {
    fn from(err: std::io::Error) -> Self {
        Self::Storage(err.to_string())
    }
}
