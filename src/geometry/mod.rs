//! Geometry domain — rectangle types and coordinate transformation.
//!
//! Four coordinate spaces meet here, each potentially scaled by a
//! different factor:
//!   - window-relative logical pixels (selection drawn in the main window)
//!   - overlay-global logical pixels (selection drawn on the full overlay)
//!   - physical device pixels (logical x scale factor)
//!   - raster pixels (whatever resolution the OS capture API returned)
//!
//! The origin of a selection is a sum type, not a runtime guess — the
//! coordinate-space ambiguity is resolved by the type system.

mod display;
mod transform;

pub use display::{DisplayGeometryProvider, DisplaySnapshot, TauriGeometryProvider};
pub use transform::{to_physical, to_raster_crop};

use serde::{Deserialize, Serialize};

/// A rectangle in logical pixels (display-density independent).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl LogicalRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// A rectangle in device pixels. Position is signed because window bounds
/// can sit left of / above the primary display origin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhysicalRect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl PhysicalRect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge in i64 to avoid overflow on extreme coordinates.
    pub fn right(&self) -> i64 {
        self.x as i64 + self.width as i64
    }

    pub fn bottom(&self) -> i64 {
        self.y as i64 + self.height as i64
    }
}

/// A crop rectangle in the pixel space of an actual captured raster.
/// Unsigned by construction: the bounds invariant is checked before one
/// of these is ever built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RasterCropRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Which coordinate space the user drew the selection in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionOrigin {
    /// Drawn on the full-work-area overlay window. The overlay's own
    /// position already encodes the global offset — these coordinates
    /// are global logical pixels as-is.
    OverlayGlobal,
    /// Drawn inside the main window. Offset by the work-area origin to
    /// reach global logical coordinates.
    WindowRelative,
}

/// A finished drag gesture: rectangle plus the space it was drawn in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SelectionRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub origin: SelectionOrigin,
}

impl SelectionRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64, origin: SelectionOrigin) -> Self {
        Self {
            x,
            y,
            width,
            height,
            origin,
        }
    }
}
