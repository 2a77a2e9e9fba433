//! Viewport rendering of a cell store.
//!
//! ```text
//! ┌───────────────────────────┐
//! │ background #f5f5f5        │
//! │   ┼───┼───┼   grid lines  │  every integer cell boundary in view
//! │   │ ■ │   │               │  cells: (zoom-1)² fill + 1px border
//! │   ┼───┼───┼               │
//! └───────────────────────────┘
//! ```
//!
//! The 1px gap and translucent border keep adjacent cells of the same color
//! distinguishable.

use image::{Rgba, RgbaImage};

use super::raster::{fill_rect, hline, stroke_rect, vline};
use crate::color::cell_rgba;
use crate::geometry::{Offset, grid_to_pixel};
use crate::grid::CellStore;

pub const BACKGROUND: Rgba<u8> = Rgba([0xf5, 0xf5, 0xf5, 0xff]);
pub const GRID_LINE: Rgba<u8> = Rgba([0xe0, 0xe0, 0xe0, 0xff]);
/// `rgba(0, 0, 0, 0.1)`
pub const CELL_BORDER: Rgba<u8> = Rgba([0, 0, 0, 26]);

/// Draw the portion of `store` visible in a `width × height` viewport.
pub fn render_canvas(store: &dyn CellStore, width: u32, height: u32, offset: Offset, zoom: i32) -> RgbaImage {
    let mut img = RgbaImage::from_pixel(width, height, BACKGROUND);
    if width == 0 || height == 0 {
        return img;
    }
    let zoom_f = zoom.max(1) as f64;

    let start_x = (-offset.x / zoom_f).floor() as i64;
    let end_x = ((width as f64 - offset.x) / zoom_f).ceil() as i64;
    for x in start_x..=end_x {
        let px = (x as f64 * zoom_f + offset.x).floor() as i64;
        if (0..width as i64).contains(&px) {
            vline(&mut img, px, GRID_LINE);
        }
    }

    let start_y = (-offset.y / zoom_f).floor() as i64;
    let end_y = ((height as f64 - offset.y) / zoom_f).ceil() as i64;
    for y in start_y..=end_y {
        let py = (y as f64 * zoom_f + offset.y).floor() as i64;
        if (0..height as i64).contains(&py) {
            hline(&mut img, py, GRID_LINE);
        }
    }

    let side = zoom.max(1) as i64 - 1;
    for (coord, color) in store.cells() {
        let (px, py) = grid_to_pixel(coord, offset, zoom_f);
        let (px, py) = (px.floor() as i64, py.floor() as i64);
        if px >= width as i64 || py >= height as i64 || px + side <= 0 || py + side <= 0 {
            continue;
        }
        fill_rect(&mut img, px, py, side, side, cell_rgba(color));
        stroke_rect(&mut img, px, py, side, side, CELL_BORDER);
    }

    img
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::CellCoord;
    use crate::grid::SparseGrid;

    #[test]
    fn test_empty_store_draws_background_and_lines() {
        let img = render_canvas(&SparseGrid::new(), 50, 50, Offset::new(5.0, 5.0), 10);
        assert_eq!(img.dimensions(), (50, 50));
        assert_eq!(img.get_pixel(5, 17), &GRID_LINE);
        assert_eq!(img.get_pixel(25, 5), &GRID_LINE);
        assert_eq!(img.get_pixel(7, 7), &BACKGROUND);
    }

    #[test]
    fn test_cell_fill_and_gap() {
        let mut grid = SparseGrid::new();
        grid.set(CellCoord::new(1, 1), "#ff0000");
        let img = render_canvas(&grid, 60, 60, Offset::default(), 20);

        // Interior is the cell color
        assert_eq!(img.get_pixel(30, 30), &Rgba([255, 0, 0, 255]));
        // Border is darker red
        let border = img.get_pixel(20, 30);
        assert!(border.0[0] < 255 && border.0[0] > 200, "border {:?}", border);
        // Last column of the cell's span is the gap (grid background)
        assert_ne!(img.get_pixel(39, 30).0[0..3], [255, 0, 0]);
    }

    #[test]
    fn test_offscreen_cells_ignored() {
        let mut grid = SparseGrid::new();
        grid.set(CellCoord::new(-100, -100), "#000");
        grid.set(CellCoord::new(100, 100), "#000");
        let img = render_canvas(&grid, 40, 40, Offset::default(), 10);
        assert!(img.pixels().all(|p| *p == BACKGROUND || *p == GRID_LINE));
    }

    #[test]
    fn test_zero_size() {
        let img = render_canvas(&SparseGrid::new(), 0, 10, Offset::default(), 10);
        assert_eq!(img.dimensions(), (0, 10));
    }
}
