//! # Coordinate Mapping
//!
//! Conversion between device pixels and integer grid cells under the current
//! pan offset and zoom (pixels per cell).
//!
//! ```text
//! gx = floor((px - offset.x) / zoom)      px = gx * zoom + offset.x
//! gy = floor((py - offset.y) / zoom)      py = gy * zoom + offset.y
//! ```
//!
//! Zoom is expected to be positive; clamping is done by
//! [`Viewport`](crate::viewport::Viewport), not here.

use serde::{Deserialize, Serialize};

/// Integer cell address. Unbounded on the sparse canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    pub x: i64,
    pub y: i64,
}

impl CellCoord {
    pub const fn new(x: i64, y: i64) -> Self {
        Self { x, y }
    }
}

/// Pan offset in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Map a pixel position to the cell that contains it.
pub fn pixel_to_grid(px: f64, py: f64, offset: Offset, zoom: f64) -> CellCoord {
    CellCoord {
        x: ((px - offset.x) / zoom).floor() as i64,
        y: ((py - offset.y) / zoom).floor() as i64,
    }
}

/// Map a cell to the pixel position of its top-left corner.
pub fn grid_to_pixel(cell: CellCoord, offset: Offset, zoom: f64) -> (f64, f64) {
    (
        cell.x as f64 * zoom + offset.x,
        cell.y as f64 * zoom + offset.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pixel_to_grid_origin() {
        let cell = pixel_to_grid(0.0, 0.0, Offset::default(), 20.0);
        assert_eq!(cell, CellCoord::new(0, 0));
        let cell = pixel_to_grid(19.9, 39.9, Offset::default(), 20.0);
        assert_eq!(cell, CellCoord::new(0, 1));
    }

    #[test]
    fn test_pixel_to_grid_floors_negative() {
        // Left of the offset must land in cell -1, not 0
        let cell = pixel_to_grid(95.0, 95.0, Offset::new(100.0, 100.0), 10.0);
        assert_eq!(cell, CellCoord::new(-1, -1));
    }

    #[test]
    fn test_grid_to_pixel() {
        let (px, py) = grid_to_pixel(CellCoord::new(3, -2), Offset::new(10.0, 5.0), 20.0);
        assert_eq!((px, py), (70.0, -35.0));
    }

    #[test]
    fn test_round_trip_within_one_cell() {
        let offsets = [Offset::new(0.0, 0.0), Offset::new(-13.5, 7.25), Offset::new(400.0, -300.0)];
        let zooms = [5.0, 7.0, 20.0, 100.0];
        for offset in offsets {
            for zoom in zooms {
                for (px, py) in [(0.0, 0.0), (1.5, 999.0), (-250.25, 31.0), (799.0, 599.0)] {
                    let cell = pixel_to_grid(px, py, offset, zoom);
                    let (bx, by) = grid_to_pixel(cell, offset, zoom);
                    assert!(bx <= px && px - bx < zoom, "x: {} vs {} at zoom {}", bx, px, zoom);
                    assert!(by <= py && py - by < zoom, "y: {} vs {} at zoom {}", by, py, zoom);
                }
            }
        }
    }
}
