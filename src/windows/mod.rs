//! Owned-window domain — registry, visibility coordination, self-capture
//! guard.
//!
//! Every top-level window the app creates is registered here with a tag
//! and an operations handle. The registry is the single source of truth
//! for "which windows are ours" — there is no ambient global window
//! state anywhere else.

mod guard;
mod tauri_ops;
mod visibility;

pub use guard::{filter_own_surfaces, overlaps_owned_window, rects_overlap, CaptureSurface};
pub use tauri_ops::TauriWindowOps;
pub use visibility::VisibilityCoordinator;

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use serde::Serialize;
use thiserror::Error;

use crate::geometry::PhysicalRect;

/// Role of an owned window. Tags are informational (logging, debugging);
/// hide/restore treats every owned window the same.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowTag {
    Main,
    Overlay,
    Auxiliary,
}

/// A hide/show/query call on a specific window failed.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct WindowOpError(pub String);

/// Operations the coordinator needs on an opaque window handle.
///
/// Implemented over `tauri::WebviewWindow` in production and over mock
/// windows in tests.
pub trait WindowOps: Send + Sync {
    fn label(&self) -> &str;
    fn is_visible(&self) -> Result<bool, WindowOpError>;
    fn hide(&self) -> Result<(), WindowOpError>;
    fn show(&self) -> Result<(), WindowOpError>;
    /// Outer bounds in physical pixels.
    fn outer_bounds(&self) -> Result<PhysicalRect, WindowOpError>;
    fn is_destroyed(&self) -> bool;
}

struct RegisteredWindow {
    tag: WindowTag,
    ops: Arc<dyn WindowOps>,
}

/// Registry of every top-level window this process owns.
///
/// Entries are added on window creation and removed on destruction;
/// nothing here is persisted. Interior mutability keeps registration
/// callable from window-lifecycle callbacks while a capture attempt
/// reads concurrently.
pub struct OwnedWindowRegistry {
    entries: Mutex<HashMap<String, RegisteredWindow>>,
}

impl OwnedWindowRegistry {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
        }
    }

    /// Register a window. Re-registering a label replaces the previous
    /// entry, so creation handlers can call this unconditionally.
    pub fn register(&self, tag: WindowTag, ops: Arc<dyn WindowOps>) {
        let label = ops.label().to_string();
        log::debug!("[WINDOWS] register {:?} window \"{}\"", tag, label);
        self.lock().insert(label, RegisteredWindow { tag, ops });
    }

    /// Remove a window. Unknown labels are a no-op, so destruction
    /// handlers can also call this unconditionally.
    pub fn unregister(&self, label: &str) {
        if self.lock().remove(label).is_some() {
            log::debug!("[WINDOWS] unregister window \"{}\"", label);
        }
    }

    pub fn contains(&self, label: &str) -> bool {
        self.lock().contains_key(label)
    }

    /// Labels and handles of every live entry, for iteration outside the
    /// lock. Destroyed windows are skipped.
    pub fn live_entries(&self) -> Vec<(String, Arc<dyn WindowOps>)> {
        self.lock()
            .iter()
            .filter(|(_, entry)| !entry.ops.is_destroyed())
            .map(|(label, entry)| (label.clone(), entry.ops.clone()))
            .collect()
    }

    pub fn get(&self, label: &str) -> Option<Arc<dyn WindowOps>> {
        self.lock().get(label).map(|entry| entry.ops.clone())
    }

    pub fn tag_of(&self, label: &str) -> Option<WindowTag> {
        self.lock().get(label).map(|entry| entry.tag)
    }

    /// Tag and physical bounds of every currently visible owned window.
    /// Windows whose visibility or bounds cannot be queried are treated
    /// as visible-with-unknown-bounds and skipped — the hide step still
    /// protects against them.
    pub fn visible_bounds(&self) -> Vec<(WindowTag, PhysicalRect)> {
        self.lock()
            .values()
            .filter(|entry| !entry.ops.is_destroyed())
            .filter(|entry| entry.ops.is_visible().unwrap_or(false))
            .filter_map(|entry| entry.ops.outer_bounds().ok().map(|b| (entry.tag, b)))
            .collect()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, RegisteredWindow>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for OwnedWindowRegistry {
    fn default() -> Self {
        Self::new()
    }
}
