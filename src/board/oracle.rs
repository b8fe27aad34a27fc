//! The simulation oracle seam and an in-memory grid implementation.
//!
//! The real engine sits behind `SimulationOracle`; `GridOracle` stands in
//! for it in the CLI and in tests.

use super::types::TilePosition;
use crate::constants::{TILE_GLYPH, WALL_GLYPH};
use crate::error::{ConfigError, Result};

/// Query-and-mutate capabilities the generator needs from the simulation.
pub trait SimulationOracle {
    /// Returns true if the cell is a traversable (paintable) tile rather than a wall.
    fn is_tile(&self, position: TilePosition) -> bool;

    /// Clears all board paint. Enemies are toggled into their non-chasing
    /// mode when `suppress_enemies` is set.
    fn reset_board_paint(&mut self, suppress_enemies: bool);

    /// Board size as (rows, columns).
    fn board_dimensions(&self) -> (usize, usize);
}

/// Board backed by a tile grid.
#[derive(Debug, Clone)]
pub struct GridOracle {
    tiles: Vec<Vec<bool>>,
    painted: Vec<Vec<bool>>,
    columns: usize,
    enemies_suppressed: bool,
}

impl GridOracle {
    /// A board where every cell is a tile.
    pub fn open(rows: usize, columns: usize) -> Self {
        Self::from_tiles(vec![vec![true; columns]; rows])
    }

    fn from_tiles(tiles: Vec<Vec<bool>>) -> Self {
        let columns = tiles.first().map_or(0, |row| row.len());
        let painted = tiles.iter().map(|row| vec![false; row.len()]).collect();
        Self {
            tiles,
            painted,
            columns,
            enemies_suppressed: false,
        }
    }

    /// Parses an ASCII board: `.` is a tile, `#` is a wall.
    ///
    /// Blank lines are ignored; every remaining line must have the same width.
    pub fn from_ascii(text: &str) -> Result<Self> {
        let mut tiles: Vec<Vec<bool>> = Vec::new();
        for (line_no, line) in text.lines().enumerate() {
            let line = line.trim_end();
            if line.is_empty() {
                continue;
            }
            let mut row = Vec::with_capacity(line.len());
            for ch in line.chars() {
                match ch {
                    TILE_GLYPH => row.push(true),
                    WALL_GLYPH => row.push(false),
                    other => {
                        return Err(ConfigError::MalformedBoard(format!(
                            "board line {}: unexpected glyph {:?}",
                            line_no + 1,
                            other
                        )))
                    }
                }
            }
            if let Some(width) = tiles.first().map(Vec::len) {
                if width != row.len() {
                    return Err(ConfigError::MalformedBoard(format!(
                        "board line {}: width {} differs from {}",
                        line_no + 1,
                        row.len(),
                        width
                    )));
                }
            }
            tiles.push(row);
        }
        Ok(Self::from_tiles(tiles))
    }

    pub fn set_wall(&mut self, position: TilePosition) {
        if let Some(cell) = self.cell_mut(position) {
            *cell = false;
        }
    }

    /// Paints a tile. Walls cannot be painted.
    pub fn set_paint(&mut self, position: TilePosition, painted: bool) {
        if !self.is_tile(position) {
            return;
        }
        let (row, column) = (position.row as usize, position.column as usize);
        self.painted[row][column] = painted;
    }

    pub fn is_painted(&self, position: TilePosition) -> bool {
        position.in_bounds(self.tiles.len(), self.columns)
            && self.painted[position.row as usize][position.column as usize]
    }

    /// True if the last board reset put enemies into non-chasing mode.
    pub fn enemies_suppressed(&self) -> bool {
        self.enemies_suppressed
    }

    pub fn painted_count(&self) -> usize {
        self.painted.iter().flatten().filter(|&&p| p).count()
    }

    fn cell_mut(&mut self, position: TilePosition) -> Option<&mut bool> {
        if !position.in_bounds(self.tiles.len(), self.columns) {
            return None;
        }
        Some(&mut self.tiles[position.row as usize][position.column as usize])
    }
}

impl SimulationOracle for GridOracle {
    fn is_tile(&self, position: TilePosition) -> bool {
        position.in_bounds(self.tiles.len(), self.columns)
            && self.tiles[position.row as usize][position.column as usize]
    }

    fn reset_board_paint(&mut self, suppress_enemies: bool) {
        for row in &mut self.painted {
            row.iter_mut().for_each(|cell| *cell = false);
        }
        self.enemies_suppressed = suppress_enemies;
    }

    fn board_dimensions(&self) -> (usize, usize) {
        (self.tiles.len(), self.columns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOARD: &str = "\
#####
#...#
#.#.#
#...#
#####
";

    #[test]
    fn test_from_ascii_dimensions_and_tiles() {
        let oracle = GridOracle::from_ascii(BOARD).unwrap();
        assert_eq!(oracle.board_dimensions(), (5, 5));
        assert!(oracle.is_tile(TilePosition::new(1, 1)));
        assert!(!oracle.is_tile(TilePosition::new(0, 0)));
        assert!(!oracle.is_tile(TilePosition::new(2, 2)));
    }

    #[test]
    fn test_out_of_bounds_is_not_a_tile() {
        let oracle = GridOracle::open(3, 3);
        assert!(!oracle.is_tile(TilePosition::new(3, 0)));
        assert!(!oracle.is_tile(TilePosition::new(0, -1)));
    }

    #[test]
    fn test_from_ascii_rejects_ragged_rows() {
        let result = GridOracle::from_ascii("...\n..\n");
        assert!(matches!(result, Err(ConfigError::MalformedBoard(_))));
    }

    #[test]
    fn test_from_ascii_rejects_unknown_glyph() {
        let result = GridOracle::from_ascii("..x\n");
        assert!(matches!(result, Err(ConfigError::MalformedBoard(_))));
    }

    #[test]
    fn test_walls_cannot_be_painted() {
        let mut oracle = GridOracle::from_ascii(BOARD).unwrap();
        oracle.set_paint(TilePosition::new(0, 0), true);
        oracle.set_paint(TilePosition::new(1, 1), true);
        assert_eq!(oracle.painted_count(), 1);
        assert!(oracle.is_painted(TilePosition::new(1, 1)));
    }

    #[test]
    fn test_reset_clears_paint_and_sets_enemy_mode() {
        let mut oracle = GridOracle::open(4, 4);
        oracle.set_paint(TilePosition::new(1, 2), true);
        oracle.set_paint(TilePosition::new(3, 3), true);

        oracle.reset_board_paint(true);
        assert_eq!(oracle.painted_count(), 0);
        assert!(oracle.enemies_suppressed());

        oracle.reset_board_paint(false);
        assert!(!oracle.enemies_suppressed());
    }
}
