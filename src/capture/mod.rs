//! Screen capture domain — public API.
//!
//! This module owns rasterization and cropping. External code should
//! only use the items exported here.

mod region;
mod screenshot;

pub use region::{crop_raster, encode_png};
pub use screenshot::{RasterFrame, ScreenCapturer, XcapCapturer};

use std::sync::{Mutex, PoisonError};

/// What the last successful attempt produced, kept for the frontend to
/// fetch on demand (polling a command avoids the race where an event
/// fires before the window's JS has loaded).
#[derive(Clone, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LastCapture {
    pub text: String,
    pub confidence: f64,
    pub png_base64: String,
}

/// Thread-safe storage for the most recent capture result.
pub struct CaptureState {
    last: Mutex<Option<LastCapture>>,
}

impl CaptureState {
    pub fn new() -> Self {
        Self {
            last: Mutex::new(None),
        }
    }

    pub fn store(&self, capture: LastCapture) {
        *self.last.lock().unwrap_or_else(PoisonError::into_inner) = Some(capture);
    }

    pub fn last(&self) -> Option<LastCapture> {
        self.last
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Default for CaptureState {
    fn default() -> Self {
        Self::new()
    }
}
