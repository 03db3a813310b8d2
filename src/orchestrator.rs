//! End-to-end capture orchestration.
//!
//! One attempt walks a fixed sequence:
//!
//!   Idle -> GeometryResolved -> Guarded -> WindowsHidden -> Captured
//!        -> Cropped -> WindowsRestored
//!
//! The central invariant lives here, enforced once: after `hide_all`
//! runs, every exit path — success, OS failure, geometry bug, timeout,
//! cancellation — goes through `restore_all` before the attempt
//! completes. Callers never see a result while windows are still hidden.
//!
//! Attempts are serialized by a try-lock gate: a second trigger while
//! one attempt is in flight is rejected, not queued. Two interleaved
//! hide/restore sequences over the same registry would corrupt the
//! prior-visibility memory.

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::capture::{self, ScreenCapturer};
use crate::config::CapturePolicy;
use crate::error::CaptureError;
use crate::geometry::{
    self, DisplayGeometryProvider, DisplaySnapshot, PhysicalRect, RasterCropRect, SelectionRect,
};
use crate::windows::{self, OwnedWindowRegistry, VisibilityCoordinator};

/// Everything a successful attempt hands onward to the OCR collaborator.
#[derive(Debug)]
pub struct CapturedRegion {
    /// Cropped region, PNG-encoded.
    pub png: Vec<u8>,
    pub crop: RasterCropRect,
    pub physical: PhysicalRect,
    pub snapshot: DisplaySnapshot,
}

pub struct CaptureOrchestrator {
    geometry: Arc<dyn DisplayGeometryProvider>,
    capturer: Arc<dyn ScreenCapturer>,
    registry: Arc<OwnedWindowRegistry>,
    visibility: VisibilityCoordinator,
    policy: CapturePolicy,
    gate: tokio::sync::Mutex<()>,
}

impl CaptureOrchestrator {
    pub fn new(
        geometry: Arc<dyn DisplayGeometryProvider>,
        capturer: Arc<dyn ScreenCapturer>,
        registry: Arc<OwnedWindowRegistry>,
        policy: CapturePolicy,
    ) -> Self {
        let visibility = VisibilityCoordinator::new(registry.clone(), policy.settle_delay);
        Self {
            geometry,
            capturer,
            registry,
            visibility,
            policy,
            gate: tokio::sync::Mutex::new(()),
        }
    }

    /// Run one capture attempt to its terminal state.
    ///
    /// Exactly one `Ok`/`Err` comes back per call; the caller translates
    /// it into the single terminal event for the attempt.
    pub async fn run(
        &self,
        selection: SelectionRect,
        cancel: &CancellationToken,
    ) -> Result<CapturedRegion, CaptureError> {
        let Ok(_gate) = self.gate.try_lock() else {
            return Err(CaptureError::AttemptInProgress);
        };

        // ── Idle: input validation, nothing to clean up on exit ──
        if cancel.is_cancelled() {
            return Err(CaptureError::Cancelled);
        }
        let min = self.policy.min_selection;
        if selection.width < min || selection.height < min {
            return Err(CaptureError::SelectionTooSmall {
                width: selection.width,
                height: selection.height,
                min,
            });
        }

        // ── Idle -> GeometryResolved: fresh snapshot, never cached ──
        let snapshot = self.geometry.snapshot()?;

        // ── GeometryResolved -> Guarded ──
        let physical = geometry::to_physical(&selection, &snapshot);
        log::info!(
            "[CAPTURE] selection {:?} -> physical ({},{}) {}x{}",
            selection.origin,
            physical.x,
            physical.y,
            physical.width,
            physical.height
        );
        if windows::overlaps_owned_window(&physical, &self.registry) {
            return Err(CaptureError::SelfCaptureRejected);
        }
        if cancel.is_cancelled() {
            // Last exit with no side effects; past this point the
            // restore pairing takes over.
            return Err(CaptureError::Cancelled);
        }

        // ── Guarded -> WindowsHidden ──
        let hide_result = self.visibility.hide_all().await;

        // Every path below runs restore_all before returning.
        let outcome = match hide_result {
            Ok(()) => self.capture_and_crop(&physical, &snapshot, cancel).await,
            Err(e) => Err(e),
        };

        let restore_result = self.visibility.restore_all().await;

        match (outcome, restore_result) {
            (Ok(region), Ok(())) => Ok(region),
            (Ok(_), Err(restore_err)) => {
                // The pixels are fine but a window is stuck hidden —
                // that is the failure the user needs to hear about.
                Err(restore_err)
            }
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(restore_err)) => {
                log::error!("[CAPTURE] restore also failed: {}", restore_err);
                Err(e)
            }
        }
    }

    /// WindowsHidden -> Captured -> Cropped. Runs only while windows are
    /// hidden; errors here are surfaced by `run` after restore.
    async fn capture_and_crop(
        &self,
        physical: &PhysicalRect,
        snapshot: &DisplaySnapshot,
        cancel: &CancellationToken,
    ) -> Result<CapturedRegion, CaptureError> {
        let capturer = self.capturer.clone();
        let capture_task = tokio::task::spawn_blocking(move || capturer.capture_screen());

        // The blocking capture cannot be aborted; on timeout or cancel
        // it finishes in the background and its frame is dropped.
        let frame = tokio::select! {
            _ = cancel.cancelled() => return Err(CaptureError::Cancelled),
            joined = tokio::time::timeout(self.policy.capture_timeout, capture_task) => {
                match joined {
                    Err(_elapsed) => {
                        return Err(CaptureError::CaptureTimedOut(self.policy.capture_timeout))
                    }
                    Ok(join_result) => join_result
                        .map_err(|e| {
                            CaptureError::NoCapturableSurface(format!("capture task failed: {e}"))
                        })??,
                }
            }
        };

        // Crop math uses the raster's actual reported dimensions — the
        // OS is free to return any thumbnail size.
        let crop = geometry::to_raster_crop(physical, snapshot, frame.width(), frame.height())?;
        log::info!(
            "[CAPTURE] crop ({},{}) {}x{} from raster {}x{}",
            crop.x,
            crop.y,
            crop.width,
            crop.height,
            frame.width(),
            frame.height()
        );

        let cropped = capture::crop_raster(&frame, &crop);
        let png = capture::encode_png(&cropped)?;

        Ok(CapturedRegion {
            png,
            crop,
            physical: *physical,
            snapshot: snapshot.clone(),
        })
    }
}
