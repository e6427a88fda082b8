//! Page geometry and slicing of one tall raster into fixed-size pages.
//!
//! Pages are not cut from the image. Every page draws the same full image,
//! shifted up by one page height per page, and the page boundary clips it.

use super::error::ExportError;

const MM_PER_INCH: f64 = 25.4;
const POINTS_PER_INCH: f64 = 72.0;

/// Leftover height below this is float noise, not another page.
const FIT_TOLERANCE_MM: f64 = 1e-6;

/// Upper bound on pages per export.
pub const MAX_PAGES: usize = 10_000;

/// Convert millimetres to PDF points.
pub fn mm_to_pt(mm: f64) -> f64 {
    mm * POINTS_PER_INCH / MM_PER_INCH
}

/// Output page size in millimetres.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSize {
    pub width_mm: f64,
    pub height_mm: f64,
}

impl PageSize {
    /// ISO A4 portrait, 210 × 297 mm.
    pub const A4: Self = Self {
        width_mm: 210.0,
        height_mm: 297.0,
    };

    pub fn new(width_mm: f64, height_mm: f64) -> Self {
        Self {
            width_mm,
            height_mm,
        }
    }

    pub fn width_pt(&self) -> f64 {
        mm_to_pt(self.width_mm)
    }

    pub fn height_pt(&self) -> f64 {
        mm_to_pt(self.height_mm)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::A4
    }
}

/// One page's view of the shared image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageSlice {
    /// Zero-based page number.
    pub index: usize,
    /// Vertical position of the image's top edge relative to the page's
    /// top edge, in mm. Zero on the first page, negative after.
    pub offset_mm: f64,
}

/// Height in mm of a `px_width × px_height` raster scaled to `page_width_mm`,
/// preserving aspect ratio.
pub fn scaled_height(px_width: u32, px_height: u32, page_width_mm: f64) -> f64 {
    f64::from(px_height) * page_width_mm / f64::from(px_width)
}

/// Lay an image `scaled_height` mm tall onto pages `page_height` mm tall.
///
/// The first page shows the image from the top. While height remains after
/// the current page, another page follows with the image shifted up by one
/// more page height. A remainder of exactly zero ends the run, so an image
/// that fills whole pages gets no empty trailing page. The result always has
/// `ceil(scaled_height / page_height)` slices.
pub fn paginate(scaled_height: f64, page_height: f64) -> Result<Vec<PageSlice>, ExportError> {
    if !page_height.is_finite() || page_height <= 0.0 {
        return Err(ExportError::Paginate(format!(
            "page height must be positive, got {page_height}"
        )));
    }
    if !scaled_height.is_finite() || scaled_height <= 0.0 {
        return Err(ExportError::Paginate(format!(
            "image height must be positive, got {scaled_height}"
        )));
    }
    if scaled_height / page_height > MAX_PAGES as f64 {
        return Err(ExportError::Paginate(format!(
            "document would exceed {MAX_PAGES} pages"
        )));
    }

    let mut slices = vec![PageSlice {
        index: 0,
        offset_mm: 0.0,
    }];
    let mut remaining = scaled_height - page_height;

    while remaining > FIT_TOLERANCE_MM {
        let index = slices.len();
        slices.push(PageSlice {
            index,
            offset_mm: -(index as f64) * page_height,
        });
        remaining -= page_height;
    }

    Ok(slices)
}
