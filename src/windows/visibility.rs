//! Atomic hide-all / restore-all over the owned-window registry.
//!
//! The coordinator remembers, per `hide_all`, exactly which windows were
//! visible beforehand — `restore_all` re-shows those and only those.
//! A window the user had already hidden stays hidden.
//!
//! Individual hide/show failures never abort the loop: the remaining
//! windows are still processed, and the accumulated failures surface as
//! one `VisibilityOperationFailed` afterwards.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::error::CaptureError;
use crate::windows::OwnedWindowRegistry;

pub struct VisibilityCoordinator {
    registry: Arc<OwnedWindowRegistry>,
    settle_delay: Duration,
    /// Labels visible before the most recent `hide_all`. `Some` while a
    /// hide is outstanding; taken by the paired `restore_all`.
    remembered: Mutex<Option<Vec<String>>>,
}

impl VisibilityCoordinator {
    pub fn new(registry: Arc<OwnedWindowRegistry>, settle_delay: Duration) -> Self {
        Self {
            registry,
            settle_delay,
            remembered: Mutex::new(None),
        }
    }

    /// Hide every visible owned window, then wait out the compositor
    /// settle delay. The delay runs even on partial failure — whatever
    /// did hide still needs to finish fading before a capture.
    pub async fn hide_all(&self) -> Result<(), CaptureError> {
        let mut was_visible = Vec::new();
        let mut failures = Vec::new();

        for (label, ops) in self.registry.live_entries() {
            match ops.is_visible() {
                Ok(true) => {
                    was_visible.push(label.clone());
                    if let Err(e) = ops.hide() {
                        log::warn!("[WINDOWS] hide failed for \"{}\": {}", label, e);
                        failures.push((label, e.to_string()));
                    }
                }
                Ok(false) => {}
                Err(e) => {
                    log::warn!("[WINDOWS] visibility query failed for \"{}\": {}", label, e);
                    failures.push((label, e.to_string()));
                }
            }
        }

        log::info!(
            "[WINDOWS] hid {} window(s), settling {}ms",
            was_visible.len(),
            self.settle_delay.as_millis()
        );
        *self.remembered_lock() = Some(was_visible);

        tokio::time::sleep(self.settle_delay).await;

        if failures.is_empty() {
            Ok(())
        } else {
            Err(CaptureError::VisibilityOperationFailed { failures })
        }
    }

    /// Re-show the windows the last `hide_all` recorded as visible.
    /// Calling without an outstanding hide is a no-op, which makes the
    /// orchestrator's unconditional restore-on-every-exit safe.
    pub async fn restore_all(&self) -> Result<(), CaptureError> {
        let Some(labels) = self.remembered_lock().take() else {
            return Ok(());
        };

        let mut failures = Vec::new();
        for label in labels {
            let Some(ops) = self.registry.get(&label) else {
                // Window was unregistered (destroyed) mid-attempt.
                continue;
            };
            if ops.is_destroyed() {
                continue;
            }
            if let Err(e) = ops.show() {
                log::warn!("[WINDOWS] restore failed for \"{}\": {}", label, e);
                failures.push((label, e.to_string()));
            }
        }

        if failures.is_empty() {
            log::info!("[WINDOWS] restored all windows");
            Ok(())
        } else {
            Err(CaptureError::VisibilityOperationFailed { failures })
        }
    }

    fn remembered_lock(&self) -> std::sync::MutexGuard<'_, Option<Vec<String>>> {
        self.remembered.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
