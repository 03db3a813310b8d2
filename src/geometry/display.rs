//! Display geometry snapshot and its provider.
//!
//! A snapshot is taken fresh at the start of every capture attempt and
//! never cached across attempts — display configuration can change
//! between attempts (monitor unplugged, scale factor changed).

use crate::error::CaptureError;
use crate::geometry::LogicalRect;

/// Immutable view of the active display at the moment an attempt started.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplaySnapshot {
    /// Device pixels per logical pixel.
    pub scale_factor: f64,
    /// Full display bounds in logical pixels, origin at display origin.
    pub screen_bounds: LogicalRect,
    /// Usable area in logical pixels (excludes menu bar / taskbar).
    pub work_area: LogicalRect,
}

impl DisplaySnapshot {
    /// Height of OS chrome at the top of the display (macOS menu bar).
    ///
    /// Selection math never applies this directly — the work-area origin
    /// already excludes the chrome — but it is useful in logs when a
    /// transform result looks off by exactly this amount.
    pub fn menu_bar_inset(&self) -> f64 {
        self.screen_bounds.height - self.work_area.height
            - (self.work_area.y - self.screen_bounds.y)
    }
}

/// Source of display snapshots. One call per capture attempt.
pub trait DisplayGeometryProvider: Send + Sync {
    fn snapshot(&self) -> Result<DisplaySnapshot, CaptureError>;
}

/// Production provider backed by Tauri's monitor query.
pub struct TauriGeometryProvider {
    app: tauri::AppHandle,
}

impl TauriGeometryProvider {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl DisplayGeometryProvider for TauriGeometryProvider {
    fn snapshot(&self) -> Result<DisplaySnapshot, CaptureError> {
        let monitor = self
            .app
            .primary_monitor()
            .map_err(|e| CaptureError::GeometryUnavailable(e.to_string()))?
            .ok_or_else(|| {
                CaptureError::GeometryUnavailable("no primary monitor reported".to_string())
            })?;

        // Tauri reports everything in physical pixels; divide out the
        // scale factor once here so the rest of the core works in the
        // logical space the selection coordinates arrive in.
        let scale = monitor.scale_factor();
        let position = monitor.position();
        let size = monitor.size();
        let work_area = monitor.work_area();

        let snapshot = DisplaySnapshot {
            scale_factor: scale,
            screen_bounds: LogicalRect::new(
                position.x as f64 / scale,
                position.y as f64 / scale,
                size.width as f64 / scale,
                size.height as f64 / scale,
            ),
            work_area: LogicalRect::new(
                work_area.position.x as f64 / scale,
                work_area.position.y as f64 / scale,
                work_area.size.width as f64 / scale,
                work_area.size.height as f64 / scale,
            ),
        };
        log::debug!(
            "[GEOMETRY] snapshot: scale={}, screen={:?}, work_area={:?}, inset={}",
            snapshot.scale_factor,
            snapshot.screen_bounds,
            snapshot.work_area,
            snapshot.menu_bar_inset()
        );
        Ok(snapshot)
    }
}
