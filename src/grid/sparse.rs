use serde::{Deserialize, Deserializer, Serialize, Serializer, ser::SerializeMap};
use std::collections::BTreeMap;

use super::{CellStore, brush_block, legacy};
use crate::geometry::CellCoord;

/// Unbounded canvas storing only colored cells.
///
/// Serializes as a JSON object keyed by `"x,y"`. Deserialization accepts both
/// that object and the legacy 2D array encoding.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SparseGrid {
    cells: BTreeMap<CellCoord, String>,
}

impl SparseGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Color a single cell.
    pub fn set(&mut self, coord: CellCoord, color: impl Into<String>) {
        self.cells.insert(coord, color.into());
    }

    /// Uncolor a single cell, returning its previous color.
    pub fn remove(&mut self, coord: CellCoord) -> Option<String> {
        self.cells.remove(&coord)
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

impl CellStore for SparseGrid {
    fn cell(&self, coord: CellCoord) -> Option<&str> {
        self.cells.get(&coord).map(String::as_str)
    }

    fn cells(&self) -> Box<dyn Iterator<Item = (CellCoord, &str)> + '_> {
        Box::new(self.cells.iter().map(|(coord, color)| (*coord, color.as_str())))
    }

    fn stamp_brush(&mut self, origin: CellCoord, brush_size: u32, color: Option<&str>) {
        for coord in brush_block(origin, brush_size) {
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

impl FromIterator<(CellCoord, String)> for SparseGrid {
    fn from_iter<I: IntoIterator<Item = (CellCoord, String)>>(iter: I) -> Self {
        Self {
            cells: iter.into_iter().collect(),
        }
    }
}

impl Serialize for SparseGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.cells.len()))?;
        for (coord, color) in &self.cells {
            map.serialize_entry(&legacy::format_key(*coord), color)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SparseGrid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        legacy::grid_from_value(&value).map_err(serde::de::Error::custom)
    }
}
