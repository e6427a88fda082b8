use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, error, info};

use super::assemble::assemble_pdf;
use super::delivery::{Artifact, Delivery, artifact_filename};
use super::error::{ExportError, RasterError};
use super::paginate::{PageSize, paginate, scaled_height};
use super::region::{RegionLocator, RenderedRegion};

/// Region id the preview is registered under by default.
pub const DEFAULT_REGION_ID: &str = "invoice-preview-section";

/// Export configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportOptions {
    pub page: PageSize,
    /// Raster scale relative to the region's logical size.
    pub oversampling: f32,
    /// Artifact file extension, without the dot.
    pub extension: String,
    pub region_id: String,
}

impl ExportOptions {
    pub fn new() -> Self {
        Self {
            page: PageSize::A4,
            oversampling: 2.0,
            extension: "pdf".to_string(),
            region_id: DEFAULT_REGION_ID.to_string(),
        }
    }

    pub fn page(mut self, page: PageSize) -> Self {
        self.page = page;
        self
    }

    pub fn oversampling(mut self, scale: f32) -> Self {
        self.oversampling = scale;
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = extension.into();
        self
    }

    pub fn region_id(mut self, id: impl Into<String>) -> Self {
        self.region_id = id.into();
        self
    }
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Where one export invocation stands.
///
/// ```text
/// Idle → Capturing → Paginating → Assembling → Delivered
///            ↘           ↘            ↘
///             Failed      Failed       Failed
/// Idle → PreconditionFailed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportState {
    Idle,
    Capturing,
    Paginating,
    Assembling,
    Delivered,
    Failed,
    PreconditionFailed,
}

impl ExportState {
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Delivered | Self::Failed | Self::PreconditionFailed
        )
    }
}

/// Dismissible message shown when an export fails mid-pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureNotice {
    pub title: String,
    pub message: String,
}

impl FailureNotice {
    pub fn export_failed() -> Self {
        Self {
            title: "Failed to generate PDF.".to_string(),
            message: "An error occurred while creating the PDF. Please try again.".to_string(),
        }
    }
}

/// Notifications for the host UI, in the order they happen.
#[derive(Debug, Clone, PartialEq)]
pub enum ExportEvent {
    /// Show the blocking progress indicator.
    ProgressShown,
    State(ExportState),
    /// Remove the progress indicator. Always follows `ProgressShown`.
    ProgressHidden,
    Failed(FailureNotice),
    Delivered { filename: String, pages: usize },
}

/// Runs exports one at a time.
#[derive(Debug, Default)]
pub struct Exporter {
    options: ExportOptions,
    in_flight: AtomicBool,
}

impl Exporter {
    pub fn new(options: ExportOptions) -> Self {
        Self {
            options,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    /// True while an export is running; hosts disable the trigger.
    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Capture the configured region, paginate it, assemble a PDF named
    /// after `invoice_number` and hand it to `delivery`.
    ///
    /// Must be polled inside a Tokio runtime: rasterization runs on the
    /// runtime's blocking pool via [`tokio::task::spawn_blocking`], which
    /// panics when no runtime is running.
    ///
    /// Progress and outcome are reported on `events`; a dropped receiver is
    /// ignored. Returns [`ExportError::Busy`] without any events if another
    /// export is running, and [`ExportError::RegionUnavailable`] without a
    /// progress indicator if the region cannot be found.
    pub async fn export(
        &self,
        locator: &dyn RegionLocator,
        invoice_number: &str,
        delivery: &dyn Delivery,
        events: &UnboundedSender<ExportEvent>,
    ) -> Result<Artifact, ExportError> {
        let _slot = InFlight::acquire(&self.in_flight).ok_or(ExportError::Busy)?;
        let emit = |event: ExportEvent| {
            let _ = events.send(event);
        };

        let region_id = &self.options.region_id;
        let Some(region) = locator.locate(region_id) else {
            error!(region = %region_id, "rendered region not found, export not started");
            emit(ExportEvent::State(ExportState::PreconditionFailed));
            return Err(ExportError::RegionUnavailable(region_id.clone()));
        };

        let progress = ProgressIndicator::show(events);
        emit(ExportEvent::State(ExportState::Capturing));

        let result = self.run(region, invoice_number, delivery, &emit).await;
        match &result {
            Ok(artifact) => {
                info!(
                    filename = %artifact.filename,
                    pages = artifact.page_count,
                    bytes = artifact.bytes.len(),
                    "invoice exported"
                );
                emit(ExportEvent::State(ExportState::Delivered));
                emit(ExportEvent::Delivered {
                    filename: artifact.filename.clone(),
                    pages: artifact.page_count,
                });
            }
            Err(err) => {
                error!(error = %err, "invoice export failed");
                emit(ExportEvent::State(ExportState::Failed));
                emit(ExportEvent::Failed(FailureNotice::export_failed()));
            }
        }
        drop(progress);
        result
    }

    async fn run(
        &self,
        region: Arc<dyn RenderedRegion>,
        invoice_number: &str,
        delivery: &dyn Delivery,
        emit: &(dyn Fn(ExportEvent) + Sync),
    ) -> Result<Artifact, ExportError> {
        let raster = self.capture(region).await?;
        let (px_width, px_height) = raster.dimensions();
        if px_width == 0 || px_height == 0 {
            return Err(ExportError::EmptyRaster);
        }

        emit(ExportEvent::State(ExportState::Paginating));
        let page = self.options.page;
        let height_mm = scaled_height(px_width, px_height, page.width_mm);
        let slices = paginate(height_mm, page.height_mm)?;
        debug!(px_width, px_height, height_mm, pages = slices.len(), "paginated raster");

        emit(ExportEvent::State(ExportState::Assembling));
        let bytes = assemble_pdf(
            &raster,
            &slices,
            page,
            height_mm,
            &format!("Invoice {invoice_number}"),
        )?;

        let artifact = Artifact {
            filename: artifact_filename(invoice_number, &self.options.extension),
            bytes,
            page_count: slices.len(),
        };
        delivery.deliver(&artifact)?;
        Ok(artifact)
    }

    /// Rasterize on the blocking pool so the caller's runtime stays live.
    async fn capture(&self, region: Arc<dyn RenderedRegion>) -> Result<RgbaImage, ExportError> {
        let scale = self.options.oversampling;
        let raster = tokio::task::spawn_blocking(move || region.rasterize(scale))
            .await
            .map_err(|e| RasterError::Failed(format!("rasterizer task ended abnormally: {e}")))??;
        Ok(raster)
    }
}

/// Holds the single export slot until dropped.
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Emits `ProgressShown` on creation and `ProgressHidden` on drop, so the
/// indicator is removed on every exit path.
struct ProgressIndicator<'a> {
    events: &'a UnboundedSender<ExportEvent>,
}

impl<'a> ProgressIndicator<'a> {
    fn show(events: &'a UnboundedSender<ExportEvent>) -> Self {
        let _ = events.send(ExportEvent::ProgressShown);
        Self { events }
    }
}

impl Drop for ProgressIndicator<'_> {
    fn drop(&mut self) {
        let _ = self.events.send(ExportEvent::ProgressHidden);
    }
}
