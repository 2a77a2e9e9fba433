//! Grid decoding for persisted documents.
//!
//! Two encodings exist on disk:
//!
//! ```text
//! sparse:  { "x,y": "#color", ... }
//! legacy:  [ [row0col0, row0col1, ...], [row1col0, ...], ... ]
//! ```
//!
//! Legacy arrays are upgraded on read (x = column index, y = row index) and
//! never written back. Decoding is lenient per entry:
//!
//! - `null` grid, empty array, empty object: empty grid
//! - legacy rows that are not arrays: skipped; ragged rows are fine
//! - cells count only when they are non-empty strings
//! - sparse keys that are not `"<int>,<int>"`, or non-string values: skipped
//!
//! Any other JSON type for the whole grid is an error.

use serde_json::Value;
use tracing::warn;

use super::SparseGrid;
use crate::error::KnitError;
use crate::geometry::CellCoord;

/// `"x,y"` key used by the sparse encoding.
pub fn format_key(coord: CellCoord) -> String {
    format!("{},{}", coord.x, coord.y)
}

/// Parse a `"x,y"` key.
pub fn parse_key(key: &str) -> Option<CellCoord> {
    let (x, y) = key.split_once(',')?;
    Some(CellCoord::new(x.trim().parse().ok()?, y.trim().parse().ok()?))
}

/// Decode either grid encoding into a sparse grid.
pub fn grid_from_value(value: &Value) -> Result<SparseGrid, KnitError> {
    let mut skipped = 0usize;
    let grid = match value {
        Value::Null => SparseGrid::new(),
        Value::Object(map) => {
            let mut grid = SparseGrid::new();
            for (key, cell) in map {
                match (parse_key(key), truthy_color(cell)) {
                    (Some(coord), Some(color)) => grid.set(coord, color),
                    _ => skipped += 1,
                }
            }
            grid
        }
        Value::Array(rows) => upgrade_rows(rows, &mut skipped),
        other => {
            return Err(KnitError::Serialization(format!(
                "grid must be an object or an array, got {}",
                json_type(other)
            )));
        }
    };

    if skipped > 0 {
        warn!(skipped, "ignored malformed grid entries");
    }
    Ok(grid)
}

fn upgrade_rows(rows: &[Value], skipped: &mut usize) -> SparseGrid {
    let mut grid = SparseGrid::new();
    for (y, row) in rows.iter().enumerate() {
        let Value::Array(cells) = row else {
            *skipped += 1;
            continue;
        };
        for (x, cell) in cells.iter().enumerate() {
            match cell {
                Value::Null => {}
                _ => match truthy_color(cell) {
                    Some(color) => grid.set(CellCoord::new(x as i64, y as i64), color),
                    None => *skipped += 1,
                },
            }
        }
    }
    grid
}

fn truthy_color(value: &Value) -> Option<&str> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s),
        _ => None,
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
