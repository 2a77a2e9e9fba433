//! # Viewport Controller
//!
//! Pan offset and zoom for the visible window into the grid.
//!
//! | Input | Effect |
//! |-------|--------|
//! | pan drag | offset = start offset + (pointer - start pointer) |
//! | wheel | zoom ±2, clamped to [5, 100] |
//! | fit to content | bounding box center moved to viewport center |
//!
//! Zooming does not re-center on the pointer.

use serde::{Deserialize, Serialize};

use crate::geometry::{self, CellCoord, Offset};
use crate::grid::CellStore;

pub const MIN_ZOOM: i32 = 5;
pub const MAX_ZOOM: i32 = 100;
pub const DEFAULT_ZOOM: i32 = 20;
/// Zoom change per wheel event.
pub const WHEEL_STEP: i32 = 2;

/// Size of the drawing surface in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for ViewportSize {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct PanStart {
    pointer: (f64, f64),
    offset: Offset,
}

/// Ephemeral pan/zoom state.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    offset: Offset,
    zoom: i32,
    pan: Option<PanStart>,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            offset: Offset::default(),
            zoom: DEFAULT_ZOOM,
            pan: None,
        }
    }
}

impl Viewport {
    pub fn new(offset: Offset, zoom: i32) -> Self {
        Self {
            offset,
            zoom: clamp_zoom(zoom),
            pan: None,
        }
    }

    pub fn offset(&self) -> Offset {
        self.offset
    }

    pub fn zoom(&self) -> i32 {
        self.zoom
    }

    pub fn set_offset(&mut self, offset: Offset) {
        self.offset = offset;
    }

    pub fn set_zoom(&mut self, zoom: i32) {
        self.zoom = clamp_zoom(zoom);
    }

    /// Positive `delta_y` (scrolling down) zooms out.
    pub fn wheel(&mut self, delta_y: f64) {
        let step = if delta_y > 0.0 { -WHEEL_STEP } else { WHEEL_STEP };
        self.set_zoom(self.zoom + step);
    }

    /// Cell under a pixel position.
    pub fn cell_at(&self, px: f64, py: f64) -> CellCoord {
        geometry::pixel_to_grid(px, py, self.offset, self.zoom as f64)
    }

    /// Start a pan gesture, replacing any pan already in progress.
    pub fn begin_pan(&mut self, px: f64, py: f64) {
        self.pan = Some(PanStart {
            pointer: (px, py),
            offset: self.offset,
        });
    }

    /// Move an active pan. Returns false when no pan is active.
    pub fn pan_to(&mut self, px: f64, py: f64) -> bool {
        let Some(start) = self.pan else {
            return false;
        };
        self.offset = Offset::new(
            start.offset.x + (px - start.pointer.0),
            start.offset.y + (py - start.pointer.1),
        );
        true
    }

    pub fn end_pan(&mut self) {
        self.pan = None;
    }

    pub fn is_panning(&self) -> bool {
        self.pan.is_some()
    }

    /// Center the populated cells in a viewport of `size`. No-op when empty.
    pub fn fit_to_content(&mut self, store: &dyn CellStore, size: ViewportSize) -> bool {
        let Some(bbox) = store.bounding_box() else {
            return false;
        };
        let (cx, cy) = bbox.center();
        let zoom = self.zoom as f64;
        self.offset = Offset::new(size.width / 2.0 - cx * zoom, size.height / 2.0 - cy * zoom);
        true
    }
}

pub fn clamp_zoom(zoom: i32) -> i32 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}
