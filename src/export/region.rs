use std::collections::HashMap;
use std::sync::Arc;

use image::imageops::{self, FilterType};
use image::{ImageFormat, RgbaImage};

use super::error::RasterError;

/// A rendered view of the invoice that can be turned into pixels.
///
/// The pipeline knows nothing about how the region was drawn; it only asks
/// for a raster at some oversampling factor.
pub trait RenderedRegion: Send + Sync {
    /// Size in logical pixels at scale 1.
    fn logical_size(&self) -> (u32, u32);

    /// Rasterize the whole region, however tall, at `scale` × logical size.
    fn rasterize(&self, scale: f32) -> Result<RgbaImage, RasterError>;
}

/// Resolves a stable region identifier to the region currently on screen.
pub trait RegionLocator: Send + Sync {
    fn locate(&self, id: &str) -> Option<Arc<dyn RenderedRegion>>;
}

/// Regions registered by id.
#[derive(Clone, Default)]
pub struct RegionMap {
    regions: HashMap<String, Arc<dyn RenderedRegion>>,
}

impl RegionMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, id: impl Into<String>, region: impl RenderedRegion + 'static) {
        self.regions.insert(id.into(), Arc::new(region));
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.regions.remove(id).is_some()
    }
}

impl RegionLocator for RegionMap {
    fn locate(&self, id: &str) -> Option<Arc<dyn RenderedRegion>> {
        self.regions.get(id).cloned()
    }
}

/// A region the host has already drawn, at scale 1.
///
/// Rasterizing at another scale resamples the stored pixels.
#[derive(Debug, Clone)]
pub struct StaticRegion {
    image: RgbaImage,
}

impl StaticRegion {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    /// Decode a PNG snapshot of the region.
    pub fn from_png(bytes: &[u8]) -> Result<Self, RasterError> {
        let decoded = image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| RasterError::Failed(format!("failed to decode PNG: {e}")))?;
        Ok(Self::new(decoded.to_rgba8()))
    }
}

impl RenderedRegion for StaticRegion {
    fn logical_size(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    fn rasterize(&self, scale: f32) -> Result<RgbaImage, RasterError> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(RasterError::InvalidScale(scale));
        }
        if scale == 1.0 {
            return Ok(self.image.clone());
        }

        let (width, height) = self.image.dimensions();
        let target_w = (width as f32 * scale).round() as u32;
        let target_h = (height as f32 * scale).round() as u32;
        Ok(imageops::resize(&self.image, target_w, target_h, FilterType::Lanczos3))
    }
}
