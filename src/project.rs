//! Persisted project documents.
//!
//! On disk and over the wire a project is
//!
//! ```json
//! { "name": "Scarf", "grid": { "0,0": "#ff0000" }, "cols": 32, "rows": 32 }
//! ```
//!
//! `grid` may also be a legacy 2D array; it is upgraded while decoding and
//! always written back in the sparse form. `cols`/`rows` are only present for
//! fixed-size grids.

use serde::{Deserialize, Serialize};

use crate::grid::{FixedGrid, Grid, SparseGrid};

pub const DEFAULT_NAME: &str = "Untitled";

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ProjectDocument {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub grid: SparseGrid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cols: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rows: Option<u32>,
}

impl ProjectDocument {
    pub fn new(name: impl Into<String>, grid: SparseGrid) -> Self {
        Self {
            name: name.into(),
            grid,
            cols: None,
            rows: None,
        }
    }

    /// Document for a working grid. Fixed grids record their dimensions.
    pub fn from_grid(name: impl Into<String>, grid: &Grid) -> Self {
        let (cols, rows) = grid.dimensions().unzip();
        Self {
            name: name.into(),
            grid: grid.to_sparse(),
            cols,
            rows,
        }
    }

    /// The grid clipped to its bounds when the document carries dimensions.
    pub fn fixed_grid(&self) -> Option<FixedGrid> {
        match (self.cols, self.rows) {
            (Some(cols), Some(rows)) => Some(FixedGrid::from_sparse(cols, rows, &self.grid)),
            _ => None,
        }
    }

    /// The grid in its working form.
    pub fn to_grid(&self) -> Grid {
        match self.fixed_grid() {
            Some(fixed) => Grid::Fixed(fixed),
            None => Grid::Sparse(self.grid.clone()),
        }
    }
}

/// Entry of the project listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub id: String,
    pub name: String,
}

impl ProjectSummary {
    /// Text shown in a project list: the name, or the id when unnamed.
    pub fn label(&self) -> &str {
        if self.name.is_empty() { &self.id } else { &self.name }
    }
}
