//! Simple Tauri command handlers.
//!
//! Thin wrappers that bridge frontend invoke() calls to Rust. Each
//! command does one thing: open the overlay, cancel, read state, write
//! the clipboard. The multi-step attempt lives in pipeline.rs instead.

use crate::capture::LastCapture;
use crate::overlay;
use crate::windows::{filter_own_surfaces, CaptureSurface};
use crate::AppState;

/// Tauri command: start the capture flow by opening the selection
/// overlay. Also bound to the global shortcut.
#[tauri::command]
pub fn start_capture(app: tauri::AppHandle, state: tauri::State<'_, AppState>) -> Result<(), String> {
    overlay::open_overlay(&app, &state)
}

/// Tauri command: cancel the in-flight gesture or attempt (Escape).
///
/// Pre-hide this aborts with no side effects; if the attempt already hid
/// windows, the orchestrator still restores them before reporting.
#[tauri::command]
pub fn cancel_capture(
    app: tauri::AppHandle,
    state: tauri::State<'_, AppState>,
) -> Result<(), String> {
    log::info!("[CAPTURE] cancel requested");
    state.cancel_current();
    overlay::close_overlay(&app, &state.registry);
    Ok(())
}

/// Tauri command: copy text to the system clipboard.
///
/// Uses arboard for native clipboard access — works reliably unlike
/// navigator.clipboard in transparent webview windows.
#[tauri::command]
pub fn copy_to_clipboard(text: String) -> Result<(), String> {
    let mut clipboard = arboard::Clipboard::new().map_err(|e| e.to_string())?;
    clipboard.set_text(&text).map_err(|e| e.to_string())?;
    log::info!("[CLIPBOARD] copied {} chars", text.len());
    Ok(())
}

/// Tauri command: the result of the most recent successful capture.
///
/// Called by the main window on load and after a `capture-succeeded`
/// event.
#[tauri::command]
pub fn get_last_capture(state: tauri::State<'_, AppState>) -> Result<LastCapture, String> {
    state
        .capture
        .last()
        .ok_or_else(|| "No capture yet".to_string())
}

/// Tauri command: enumerate OS-capturable surfaces with our own windows
/// filtered out.
#[tauri::command]
pub fn get_capturable_surfaces(
    state: tauri::State<'_, AppState>,
) -> Result<Vec<CaptureSurface>, String> {
    let surfaces = enumerate_surfaces().map_err(|e| e.to_string())?;
    Ok(filter_own_surfaces(&state.registry, surfaces))
}

/// Screens and foreign windows as the OS reports them. Windows belonging
/// to this process are excluded here by pid; registry-label matches are
/// filtered by the caller on top.
fn enumerate_surfaces() -> Result<Vec<CaptureSurface>, crate::error::CaptureError> {
    use crate::error::CaptureError;

    let mut surfaces = Vec::new();

    let monitors =
        xcap::Monitor::all().map_err(|e| CaptureError::NoCapturableSurface(e.to_string()))?;
    for monitor in &monitors {
        let id = monitor
            .id()
            .map_err(|e| CaptureError::NoCapturableSurface(e.to_string()))?;
        let name = monitor.name().unwrap_or_else(|_| format!("Display {id}"));
        surfaces.push(CaptureSurface {
            id: format!("screen-{id}"),
            name,
        });
    }

    let own_pid = std::process::id();
    let windows =
        xcap::Window::all().map_err(|e| CaptureError::NoCapturableSurface(e.to_string()))?;
    for window in &windows {
        if window.pid().map(|pid| pid == own_pid).unwrap_or(false) {
            continue;
        }
        let (Ok(id), Ok(title)) = (window.id(), window.title()) else {
            continue;
        };
        if title.is_empty() {
            continue;
        }
        surfaces.push(CaptureSurface {
            id: format!("window-{id}"),
            name: title,
        });
    }

    Ok(surfaces)
}
