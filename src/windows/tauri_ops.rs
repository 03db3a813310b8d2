//! `WindowOps` over a live `tauri::WebviewWindow`.

use tauri::Manager;

use crate::geometry::PhysicalRect;
use crate::windows::{WindowOpError, WindowOps};

pub struct TauriWindowOps {
    window: tauri::WebviewWindow,
    label: String,
}

impl TauriWindowOps {
    pub fn new(window: tauri::WebviewWindow) -> Self {
        let label = window.label().to_string();
        Self { window, label }
    }
}

fn op_err(e: tauri::Error) -> WindowOpError {
    WindowOpError(e.to_string())
}

impl WindowOps for TauriWindowOps {
    fn label(&self) -> &str {
        &self.label
    }

    fn is_visible(&self) -> Result<bool, WindowOpError> {
        self.window.is_visible().map_err(op_err)
    }

    fn hide(&self) -> Result<(), WindowOpError> {
        self.window.hide().map_err(op_err)
    }

    fn show(&self) -> Result<(), WindowOpError> {
        self.window.show().map_err(op_err)
    }

    fn outer_bounds(&self) -> Result<PhysicalRect, WindowOpError> {
        let position = self.window.outer_position().map_err(op_err)?;
        let size = self.window.outer_size().map_err(op_err)?;
        Ok(PhysicalRect::new(
            position.x,
            position.y,
            size.width,
            size.height,
        ))
    }

    fn is_destroyed(&self) -> bool {
        // A webview window with no live handle under its label has been
        // destroyed; any further operation on it would error anyway.
        self.window
            .app_handle()
            .get_webview_window(&self.label)
            .is_none()
    }
}
