//! Selection-rectangle transformation between coordinate spaces.
//!
//! Two steps, matching the two hops a selection makes on its way to a
//! crop: logical selection -> physical device pixels, then physical
//! pixels -> the pixel space of the raster the OS actually handed back.

use crate::error::CaptureError;
use crate::geometry::{DisplaySnapshot, PhysicalRect, RasterCropRect, SelectionOrigin, SelectionRect};

/// Convert a tagged selection into a physical-pixel rectangle.
///
/// Overlay-global selections are already global: the overlay window sits
/// at the work-area origin, so its local coordinates encode the global
/// offset. Adding the work-area origin (or the menu-bar inset) here
/// would double-count it. Window-relative selections get offset by the
/// work-area origin — and only that; the work area already excludes any
/// menu bar.
///
/// Each axis is rounded independently after scaling. Rounding the scale
/// factor first would compound the error across axes.
pub fn to_physical(selection: &SelectionRect, snapshot: &DisplaySnapshot) -> PhysicalRect {
    let (global_x, global_y) = match selection.origin {
        SelectionOrigin::OverlayGlobal => (selection.x, selection.y),
        SelectionOrigin::WindowRelative => (
            selection.x + snapshot.work_area.x,
            selection.y + snapshot.work_area.y,
        ),
    };

    let scale = snapshot.scale_factor;
    PhysicalRect {
        x: (global_x * scale).round() as i32,
        y: (global_y * scale).round() as i32,
        width: (selection.width * scale).round() as u32,
        height: (selection.height * scale).round() as u32,
    }
}

/// Re-express a physical rectangle in the pixel space of the captured
/// raster.
///
/// The raster's resolution is whatever the OS capture API chose — it is
/// never assumed to equal screen bounds x scale factor. The physical
/// rectangle is taken back to logical coordinates, then scaled by the
/// raster/screen ratio per axis.
///
/// A result outside the raster is a hard error: silent clamping would
/// hide coordinate-math bugs behind subtly wrong crops.
pub fn to_raster_crop(
    physical: &PhysicalRect,
    snapshot: &DisplaySnapshot,
    raster_width: u32,
    raster_height: u32,
) -> Result<RasterCropRect, CaptureError> {
    let scale = snapshot.scale_factor;
    let ratio_x = raster_width as f64 / snapshot.screen_bounds.width;
    let ratio_y = raster_height as f64 / snapshot.screen_bounds.height;

    let x = ((physical.x as f64 / scale) * ratio_x).round() as i64;
    let y = ((physical.y as f64 / scale) * ratio_y).round() as i64;
    let width = ((physical.width as f64 / scale) * ratio_x).round() as i64;
    let height = ((physical.height as f64 / scale) * ratio_y).round() as i64;

    let in_bounds = x >= 0
        && y >= 0
        && width > 0
        && height > 0
        && x + width <= raster_width as i64
        && y + height <= raster_height as i64;
    if !in_bounds {
        return Err(CaptureError::OutOfBounds {
            x,
            y,
            width,
            height,
            raster_width,
            raster_height,
        });
    }

    Ok(RasterCropRect {
        x: x as u32,
        y: y as u32,
        width: width as u32,
        height: height as u32,
    })
}
