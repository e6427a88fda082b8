//! Capture the rendered invoice, paginate it, and assemble a PDF.
//!
//! The rendered region is rasterized once as a single tall image at an
//! oversampling factor, scaled to the page width, and laid onto as many
//! fixed-size pages as it needs. Every page draws the same image at a
//! different vertical offset.
//!
//! [`Exporter::export`] must run inside a Tokio runtime (the `rt` feature is
//! enough); rasterization is moved onto its blocking pool.
//!
//! # Example
//!
//! ```no_run
//! use quickbill::export::*;
//!
//! # async fn run(preview: StaticRegion) -> Result<(), ExportError> {
//! let mut regions = RegionMap::new();
//! regions.insert(DEFAULT_REGION_ID, preview);
//!
//! let (events, _notices) = tokio::sync::mpsc::unbounded_channel();
//! let exporter = Exporter::new(ExportOptions::default());
//! let artifact = exporter
//!     .export(&regions, "INV-001", &SaveToDirectory::new("."), &events)
//!     .await?;
//! assert_eq!(artifact.filename, "invoice-INV-001.pdf");
//! # Ok(())
//! # }
//! ```

mod assemble;
mod delivery;
mod error;
mod paginate;
mod pipeline;
mod region;

pub use assemble::assemble_pdf;
pub use delivery::{Artifact, Delivery, SaveToDirectory, artifact_filename};
pub use error::{DeliveryError, ExportError, RasterError};
pub use paginate::{MAX_PAGES, PageSize, PageSlice, mm_to_pt, paginate, scaled_height};
pub use pipeline::{
    DEFAULT_REGION_ID, ExportEvent, ExportOptions, ExportState, Exporter, FailureNotice,
};
pub use region::{RegionLocator, RegionMap, RenderedRegion, StaticRegion};
