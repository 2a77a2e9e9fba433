use std::collections::BTreeMap;

use super::{CellStore, SparseGrid, brush_block};
use crate::geometry::CellCoord;

/// Fixed `cols × rows` grid of optional colors.
///
/// Coordinates outside `[0, cols) × [0, rows)` are ignored by every
/// operation. Only colored cells take memory, so the bounds themselves can
/// be as large as `u32` allows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedGrid {
    cols: u32,
    rows: u32,
    cells: BTreeMap<CellCoord, String>,
}

impl FixedGrid {
    pub fn new(cols: u32, rows: u32) -> Self {
        Self {
            cols,
            rows,
            cells: BTreeMap::new(),
        }
    }

    /// Copy the cells of `sparse` that fall inside the bounds.
    pub fn from_sparse(cols: u32, rows: u32, sparse: &SparseGrid) -> Self {
        let mut grid = Self::new(cols, rows);
        for (coord, color) in sparse.cells() {
            if grid.contains(coord) {
                grid.cells.insert(coord, color.to_string());
            }
        }
        grid
    }

    pub fn cols(&self) -> u32 {
        self.cols
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Change dimensions. Any change starts over with every cell cleared.
    pub fn resize(&mut self, cols: u32, rows: u32) {
        if cols != self.cols || rows != self.rows {
            *self = Self::new(cols, rows);
        }
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn to_sparse(&self) -> SparseGrid {
        self.cells()
            .map(|(coord, color)| (coord, color.to_string()))
            .collect()
    }

    fn contains(&self, coord: CellCoord) -> bool {
        (0..self.cols as i64).contains(&coord.x) && (0..self.rows as i64).contains(&coord.y)
    }
}

impl CellStore for FixedGrid {
    fn cell(&self, coord: CellCoord) -> Option<&str> {
        self.cells.get(&coord).map(String::as_str)
    }

    fn cells(&self) -> Box<dyn Iterator<Item = (CellCoord, &str)> + '_> {
        Box::new(self.cells.iter().map(|(coord, color)| (*coord, color.as_str())))
    }

    fn stamp_brush(&mut self, origin: CellCoord, brush_size: u32, color: Option<&str>) {
        for coord in brush_block(origin, brush_size) {
            if !self.contains(coord) {
                continue;
            }
            match color {
                Some(color) => {
                    self.cells.insert(coord, color.to_string());
                }
                None => {
                    self.cells.remove(&coord);
                }
            }
        }
    }

    fn len(&self) -> usize {
        self.cells.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stamp_clips_to_bounds() {
        let mut grid = FixedGrid::new(4, 3);
        grid.stamp_brush(CellCoord::new(2, 1), 4, Some("#f00"));
        // Only (2..4) × (1..3) is inside
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.cell(CellCoord::new(3, 2)), Some("#f00"));
        assert_eq!(grid.cell(CellCoord::new(4, 2)), None);

        grid.stamp_brush(CellCoord::new(-2, -2), 3, Some("#0f0"));
        assert_eq!(grid.cell(CellCoord::new(0, 0)), Some("#0f0"));
        assert_eq!(grid.len(), 5);
    }

    #[test]
    fn test_erase_in_place() {
        let mut grid = FixedGrid::new(3, 3);
        grid.stamp_brush(CellCoord::new(0, 0), 3, Some("#000"));
        grid.stamp_brush(CellCoord::new(1, 1), 1, None);
        assert_eq!(grid.len(), 8);
        assert_eq!(grid.cell(CellCoord::new(1, 1)), None);
    }

    #[test]
    fn test_resize_clears() {
        let mut grid = FixedGrid::new(3, 3);
        grid.stamp_brush(CellCoord::new(0, 0), 2, Some("#000"));

        grid.resize(3, 3);
        assert_eq!(grid.len(), 4, "same size keeps cells");

        grid.resize(5, 3);
        assert_eq!((grid.cols(), grid.rows()), (5, 3));
        assert!(grid.is_empty());
    }

    #[test]
    fn test_sparse_conversion() {
        let mut sparse = SparseGrid::new();
        sparse.set(CellCoord::new(1, 0), "#f00");
        sparse.set(CellCoord::new(9, 9), "#0f0");

        let fixed = FixedGrid::from_sparse(2, 2, &sparse);
        assert_eq!(fixed.len(), 1);
        assert_eq!(fixed.bounding_box().map(|b| (b.min_x, b.min_y)), Some((1, 0)));

        let back = fixed.to_sparse();
        assert_eq!(back.cell(CellCoord::new(1, 0)), Some("#f00"));
        assert_eq!(back.len(), 1);
    }

    #[test]
    fn test_huge_bounds_do_not_allocate() {
        let mut sparse = SparseGrid::new();
        sparse.set(CellCoord::new(0, 0), "#f00");
        sparse.set(CellCoord::new(-1, 0), "#0f0");
        sparse.set(CellCoord::new(4_294_967_294, 4_294_967_294), "#00f");

        let mut fixed = FixedGrid::from_sparse(u32::MAX, u32::MAX, &sparse);
        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed.cell(CellCoord::new(-1, 0)), None);

        // Brush running off the far corner keeps only the last cell
        fixed.stamp_brush(CellCoord::new(4_294_967_294, 4_294_967_294), 3, Some("#fff"));
        assert_eq!(fixed.len(), 2);
        assert_eq!(fixed.cell(CellCoord::new(4_294_967_294, 4_294_967_294)), Some("#fff"));

        let big = FixedGrid::new(100_000, 100_000);
        assert!(big.is_empty());
        assert_eq!(big.bounding_box(), None);
    }
}
