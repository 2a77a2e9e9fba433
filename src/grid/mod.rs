//! # Cell Stores
//!
//! Two grid representations share the [`CellStore`] trait:
//!
//! - [`SparseGrid`]: unbounded canvas, only colored cells are stored
//! - [`FixedGrid`]: `cols × rows` bounds, stamping clips to them
//!
//! [`Grid`] holds whichever of the two an open project uses.
//!
//! Persisted documents may carry either the sparse object encoding or the
//! legacy 2D array encoding; see [`legacy`] for the upgrade rules.
//!
//! ## Example
//!
//! ```
//! use knitgrid::geometry::CellCoord;
//! use knitgrid::grid::{CellStore, SparseGrid};
//!
//! let mut grid = SparseGrid::new();
//! grid.stamp_brush(CellCoord::new(2, 3), 2, Some("#ff0000"));
//! assert_eq!(grid.len(), 4);
//!
//! let bbox = grid.bounding_box().unwrap();
//! assert_eq!((bbox.min_x, bbox.max_x, bbox.min_y, bbox.max_y), (2, 3, 3, 4));
//! ```

mod fixed;
pub mod legacy;
mod sparse;

pub use fixed::FixedGrid;
pub use sparse::SparseGrid;

use crate::geometry::CellCoord;

/// Minimal box covering every populated cell (inclusive bounds).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: i64,
    pub max_x: i64,
    pub min_y: i64,
    pub max_y: i64,
}

impl BoundingBox {
    /// Smallest box covering `coords`, or `None` when there are none.
    pub fn covering(coords: impl IntoIterator<Item = CellCoord>) -> Option<Self> {
        coords.into_iter().fold(None, |acc, c| {
            Some(match acc {
                None => BoundingBox {
                    min_x: c.x,
                    max_x: c.x,
                    min_y: c.y,
                    max_y: c.y,
                },
                Some(b) => BoundingBox {
                    min_x: b.min_x.min(c.x),
                    max_x: b.max_x.max(c.x),
                    min_y: b.min_y.min(c.y),
                    max_y: b.max_y.max(c.y),
                },
            })
        })
    }

    /// Number of columns covered, saturating at `u64::MAX`.
    pub fn cols(&self) -> u64 {
        self.max_x.abs_diff(self.min_x).saturating_add(1)
    }

    /// Number of rows covered, saturating at `u64::MAX`.
    pub fn rows(&self) -> u64 {
        self.max_y.abs_diff(self.min_y).saturating_add(1)
    }

    /// Center in cell units (may fall on a half cell).
    pub fn center(&self) -> (f64, f64) {
        (
            (self.min_x as f64 + self.max_x as f64) / 2.0,
            (self.min_y as f64 + self.max_y as f64) / 2.0,
        )
    }
}

/// Storage of colored cells.
pub trait CellStore {
    /// Color at `coord`, if colored.
    fn cell(&self, coord: CellCoord) -> Option<&str>;

    /// Every colored cell, in no particular order.
    fn cells(&self) -> Box<dyn Iterator<Item = (CellCoord, &str)> + '_>;

    /// Set (or with `None`, clear) the `brush_size × brush_size` block whose
    /// top-left cell is `origin`.
    fn stamp_brush(&mut self, origin: CellCoord, brush_size: u32, color: Option<&str>);

    /// Number of colored cells.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `None` means the store has no colored cells.
    fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::covering(self.cells().map(|(coord, _)| coord))
    }
}

/// Cells of the brush block at `origin`, row by row. Cells past the `i64`
/// range are left out.
pub(crate) fn brush_block(origin: CellCoord, brush_size: u32) -> impl Iterator<Item = CellCoord> {
    let n = brush_size as i64;
    (0..n).flat_map(move |dy| {
        (0..n).filter_map(move |dx| Some(CellCoord::new(origin.x.checked_add(dx)?, origin.y.checked_add(dy)?)))
    })
}

/// The grid of an open project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Grid {
    Sparse(SparseGrid),
    Fixed(FixedGrid),
}

impl Default for Grid {
    fn default() -> Self {
        Grid::Sparse(SparseGrid::new())
    }
}

impl Grid {
    /// `(cols, rows)` of a fixed grid.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match self {
            Grid::Sparse(_) => None,
            Grid::Fixed(fixed) => Some((fixed.cols(), fixed.rows())),
        }
    }

    /// Switch to fixed `(cols, rows)` bounds, or to an unbounded grid with
    /// `None`. Any change empties the grid. Returns whether anything changed.
    pub fn set_dimensions(&mut self, dimensions: Option<(u32, u32)>) -> bool {
        if self.dimensions() == dimensions {
            return false;
        }
        *self = match dimensions {
            Some((cols, rows)) => Grid::Fixed(FixedGrid::new(cols, rows)),
            None => Grid::Sparse(SparseGrid::new()),
        };
        true
    }

    pub fn clear(&mut self) {
        match self {
            Grid::Sparse(sparse) => sparse.clear(),
            Grid::Fixed(fixed) => fixed.clear(),
        }
    }

    /// Colored cells in the persisted encoding.
    pub fn to_sparse(&self) -> SparseGrid {
        match self {
            Grid::Sparse(sparse) => sparse.clone(),
            Grid::Fixed(fixed) => fixed.to_sparse(),
        }
    }

    fn store(&self) -> &dyn CellStore {
        match self {
            Grid::Sparse(sparse) => sparse,
            Grid::Fixed(fixed) => fixed,
        }
    }

    fn store_mut(&mut self) -> &mut dyn CellStore {
        match self {
            Grid::Sparse(sparse) => sparse,
            Grid::Fixed(fixed) => fixed,
        }
    }
}

impl CellStore for Grid {
    fn cell(&self, coord: CellCoord) -> Option<&str> {
        self.store().cell(coord)
    }

    fn cells(&self) -> Box<dyn Iterator<Item = (CellCoord, &str)> + '_> {
        self.store().cells()
    }

    fn stamp_brush(&mut self, origin: CellCoord, brush_size: u32, color: Option<&str>) {
        self.store_mut().stamp_brush(origin, brush_size, color);
    }

    fn len(&self) -> usize {
        self.store().len()
    }
}
