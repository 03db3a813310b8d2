//! Full-screen rasterization.
//!
//! The OS capture API is free to return a raster at any resolution — a
//! `RasterFrame` always carries its own dimensions and nothing downstream
//! assumes they equal screen bounds x scale factor.

use image::RgbaImage;

use crate::error::CaptureError;

/// A captured full-screen raster.
pub struct RasterFrame {
    image: RgbaImage,
}

impl RasterFrame {
    pub fn new(image: RgbaImage) -> Self {
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }
}

/// OS raster capture collaborator. Blocking; the orchestrator runs it on
/// a blocking task under a timeout.
pub trait ScreenCapturer: Send + Sync {
    fn capture_screen(&self) -> Result<RasterFrame, CaptureError>;
}

/// Production capturer over the primary monitor via xcap.
pub struct XcapCapturer;

impl ScreenCapturer for XcapCapturer {
    fn capture_screen(&self) -> Result<RasterFrame, CaptureError> {
        let start = std::time::Instant::now();
        let monitors = xcap::Monitor::all()
            .map_err(|e| CaptureError::NoCapturableSurface(e.to_string()))?;
        if monitors.is_empty() {
            return Err(CaptureError::NoCapturableSurface(
                "no monitors detected".to_string(),
            ));
        }

        let primary = monitors
            .into_iter()
            .find(|m| m.is_primary().unwrap_or(false))
            .ok_or_else(|| {
                CaptureError::NoCapturableSurface("no primary monitor".to_string())
            })?;

        let image = primary
            .capture_image()
            .map_err(|e| CaptureError::NoCapturableSurface(e.to_string()))?;

        log::info!(
            "[CAPTURE] raster {}x{} in {:.1}ms",
            image.width(),
            image.height(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(RasterFrame::new(image))
    }
}
