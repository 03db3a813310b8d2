//! Selection overlay window lifecycle.
//!
//! The overlay is a frameless, always-on-top window sized to the work
//! area. Because it sits exactly at the work-area origin, selections
//! drawn on it are global logical coordinates as-is — the geometry
//! transform relies on this placement.

use std::sync::Arc;

use tauri::{AppHandle, Manager, WebviewUrl, WebviewWindowBuilder};

use crate::windows::{OwnedWindowRegistry, TauriWindowOps, WindowTag};
use crate::AppState;

pub const OVERLAY_LABEL: &str = "overlay";

/// Open the selection overlay and arm a fresh cancellation token.
///
/// An already-open overlay is torn down first — a second trigger means
/// the user wants a fresh selection.
pub fn open_overlay(app: &AppHandle, state: &AppState) -> Result<(), String> {
    if let Some(existing) = app.get_webview_window(OVERLAY_LABEL) {
        log::info!("[OVERLAY] closing stale overlay before reopening");
        state.registry.unregister(OVERLAY_LABEL);
        let _ = existing.destroy();
    }

    let snapshot = state.geometry.snapshot().map_err(|e| e.to_string())?;
    let work_area = snapshot.work_area;

    let window = WebviewWindowBuilder::new(
        app,
        OVERLAY_LABEL,
        WebviewUrl::App("overlay.html".into()),
    )
    .title("textgrab selection")
    .position(work_area.x, work_area.y)
    .inner_size(work_area.width, work_area.height)
    .decorations(false)
    .transparent(true)
    .always_on_top(true)
    .skip_taskbar(true)
    .resizable(false)
    .build()
    .map_err(|e| format!("failed to create overlay window: {e}"))?;

    state
        .registry
        .register(WindowTag::Overlay, Arc::new(TauriWindowOps::new(window)));
    state.begin_attempt();

    log::info!(
        "[OVERLAY] opened at ({},{}) {}x{} (logical)",
        work_area.x,
        work_area.y,
        work_area.width,
        work_area.height
    );
    Ok(())
}

/// Destroy the overlay window and drop it from the registry.
pub fn close_overlay(app: &AppHandle, registry: &OwnedWindowRegistry) {
    if let Some(window) = app.get_webview_window(OVERLAY_LABEL) {
        registry.unregister(OVERLAY_LABEL);
        let _ = window.destroy();
    }
}
