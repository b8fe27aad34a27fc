//! Tile position record shared by generation, filtering, and the registry.

use serde::{Deserialize, Serialize};

/// A board cell in the engine's tile convention.
///
/// Serialized as `{"ty": row, "tx": column}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TilePosition {
    #[serde(rename = "ty")]
    pub row: i32,
    #[serde(rename = "tx")]
    pub column: i32,
}

impl TilePosition {
    pub fn new(row: i32, column: i32) -> Self {
        Self { row, column }
    }

    /// Builds a position from an (x, y) coordinate pair: row = y, column = x.
    pub fn from_xy(x: i32, y: i32) -> Self {
        Self { row: y, column: x }
    }

    /// Returns true if the position lies on a board of the given size.
    pub fn in_bounds(&self, rows: usize, columns: usize) -> bool {
        self.row >= 0
            && self.column >= 0
            && (self.row as usize) < rows
            && (self.column as usize) < columns
    }
}
