//! Capture error taxonomy.
//!
//! One variant per distinct failure mode of a capture attempt. The split
//! that matters downstream is rejection vs. failure: rejections terminate
//! an attempt before any window is hidden, failures happen mid-flight and
//! are only surfaced after the visibility coordinator has restored the
//! app's windows.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    /// The OS display query failed outright. Nothing was hidden yet.
    #[error("display geometry unavailable: {0}")]
    GeometryUnavailable(String),

    /// The selection rectangle overlaps one of our own visible windows.
    #[error("selection overlaps an application window")]
    SelfCaptureRejected,

    /// The selection is below the minimum usable size.
    #[error("selection {width:.0}x{height:.0} is below the {min:.0}x{min:.0} minimum")]
    SelectionTooSmall { width: f64, height: f64, min: f64 },

    /// The OS capture API returned no usable source, or the capture call
    /// itself failed (permission denied, no monitors).
    #[error("no capturable surface: {0}")]
    NoCapturableSurface(String),

    /// The computed crop rectangle falls outside the captured raster.
    /// This is a geometry bug, not a transient condition — never clamp.
    #[error(
        "crop rectangle ({x},{y}) {width}x{height} exceeds raster {raster_width}x{raster_height}"
    )]
    OutOfBounds {
        x: i64,
        y: i64,
        width: i64,
        height: i64,
        raster_width: u32,
        raster_height: u32,
    },

    /// One or more hide/show calls failed. The coordinator keeps going
    /// past individual failures, so this carries every (label, cause) pair.
    #[error("visibility operation failed for {} window(s)", .failures.len())]
    VisibilityOperationFailed { failures: Vec<(String, String)> },

    /// The OS capture call did not complete within the configured ceiling.
    #[error("screen capture timed out after {0:?}")]
    CaptureTimedOut(Duration),

    /// A second start-capture arrived while an attempt was in flight.
    #[error("another capture attempt is already in progress")]
    AttemptInProgress,

    /// The user cancelled before the attempt committed to hiding windows,
    /// or while waiting on the OS capture.
    #[error("capture cancelled")]
    Cancelled,

    /// PNG encoding of the cropped region failed.
    #[error("image encoding failed: {0}")]
    ImageEncode(String),
}

impl CaptureError {
    /// Rejections are terminal outcomes the user caused (bad selection,
    /// double-trigger, cancel) — reported as `capture-rejected` rather
    /// than `capture-failed`.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            CaptureError::SelfCaptureRejected
                | CaptureError::SelectionTooSmall { .. }
                | CaptureError::AttemptInProgress
                | CaptureError::Cancelled
        )
    }

    /// Actionable message for the presentation layer. The core never
    /// renders UI; the frontend shows this string verbatim.
    pub fn user_message(&self) -> String {
        match self {
            CaptureError::SelfCaptureRejected => {
                "The selection covers a textgrab window — select a different area".to_string()
            }
            CaptureError::SelectionTooSmall { min, .. } => {
                format!("Selection too small — drag at least {min:.0}x{min:.0} pixels")
            }
            CaptureError::NoCapturableSurface(_) => {
                "Screen capture unavailable — check screen-recording permission".to_string()
            }
            CaptureError::AttemptInProgress => {
                "A capture is already running — wait for it to finish".to_string()
            }
            CaptureError::Cancelled => "Capture cancelled".to_string(),
            CaptureError::CaptureTimedOut(_) => {
                "Screen capture did not respond — please retry".to_string()
            }
            _ => "Capture failed — please retry".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejections_are_classified() {
        assert!(CaptureError::SelfCaptureRejected.is_rejection());
        assert!(CaptureError::Cancelled.is_rejection());
        assert!(CaptureError::SelectionTooSmall {
            width: 5.0,
            height: 5.0,
            min: 15.0
        }
        .is_rejection());
        assert!(!CaptureError::NoCapturableSurface("gone".into()).is_rejection());
        assert!(!CaptureError::CaptureTimedOut(Duration::from_secs(30)).is_rejection());
    }

    #[test]
    fn out_of_bounds_message_names_both_rectangles() {
        let err = CaptureError::OutOfBounds {
            x: 3000,
            y: 0,
            width: 100,
            height: 100,
            raster_width: 2880,
            raster_height: 1800,
        };
        let msg = err.to_string();
        assert!(msg.contains("3000"));
        assert!(msg.contains("2880x1800"));
    }
}
