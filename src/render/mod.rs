//! # Rendering Module
//!
//! Rasterization of cell stores.
//!
//! ## Modules
//!
//! - [`canvas`]: viewport rendering (grid lines + cells under pan/zoom)
//! - [`raster`]: clipped fill/stroke/blend primitives
//! - [`font`]: Spleen bitmap digits for row/column labels
//!
//! ## Usage Example
//!
//! ```
//! use knitgrid::geometry::{CellCoord, Offset};
//! use knitgrid::grid::SparseGrid;
//! use knitgrid::render::{self, canvas};
//!
//! let mut grid = SparseGrid::new();
//! grid.set(CellCoord::new(0, 0), "#336699");
//!
//! let img = canvas::render_canvas(&grid, 200, 100, Offset::new(10.0, 10.0), 20);
//! let png = render::encode_png(&img).unwrap();
//! assert!(png.starts_with(b"\x89PNG"));
//! ```

pub mod canvas;
pub mod font;
pub mod raster;

use image::RgbaImage;
use std::io::Cursor;

use crate::error::KnitError;

/// Encode an image as PNG bytes.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, KnitError> {
    let mut png_bytes = Vec::new();
    img.write_to(&mut Cursor::new(&mut png_bytes), image::ImageFormat::Png)
        .map_err(|e| KnitError::Image(format!("PNG encoding failed: {}", e)))?;
    Ok(png_bytes)
}
