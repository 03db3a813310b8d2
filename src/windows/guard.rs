//! Self-capture guard.
//!
//! Rejects candidate capture rectangles that overlap one of our own
//! visible windows before the expensive hide/capture/restore sequence
//! runs. This is a fast path for specific user feedback ("select a
//! different area"), not the correctness backstop — the hide step would
//! prevent a leaked self-capture regardless.

use serde::{Deserialize, Serialize};

use crate::geometry::PhysicalRect;
use crate::windows::{OwnedWindowRegistry, WindowTag};

/// Axis-aligned overlap test. Rectangles sharing only an edge count as
/// overlapping: a capture flush against our window border would still
/// include boundary pixels once rounded.
pub fn rects_overlap(a: &PhysicalRect, b: &PhysicalRect) -> bool {
    !(a.right() < b.x as i64
        || b.right() < a.x as i64
        || a.bottom() < b.y as i64
        || b.bottom() < a.y as i64)
}

/// Does the candidate rectangle overlap any visible owned window?
///
/// The selection overlay is exempt: it spans the whole work area, so
/// every selection drawn on it would overlap it, and it is torn down
/// before the raster is taken anyway. Only main/auxiliary windows can
/// block a capture.
pub fn overlaps_owned_window(candidate: &PhysicalRect, registry: &OwnedWindowRegistry) -> bool {
    registry
        .visible_bounds()
        .iter()
        .filter(|(tag, _)| *tag != WindowTag::Overlay)
        .any(|(_, bounds)| rects_overlap(candidate, bounds))
}

/// A capturable surface as enumerated by the OS (a screen or a window).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptureSurface {
    pub id: String,
    pub name: String,
}

/// Drop surfaces that are our own windows from an OS surface
/// enumeration. Used when the capture source list can contain app
/// windows as individually capturable surfaces.
pub fn filter_own_surfaces(
    registry: &OwnedWindowRegistry,
    surfaces: Vec<CaptureSurface>,
) -> Vec<CaptureSurface> {
    surfaces
        .into_iter()
        .filter(|surface| !registry.contains(&surface.id))
        .collect()
}
