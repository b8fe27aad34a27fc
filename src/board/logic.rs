//! Validity filtering of candidate positions.

use tracing::debug;

use super::oracle::SimulationOracle;
use super::types::TilePosition;

/// A candidate is valid if it lies on the board and the oracle reports a tile there.
pub fn is_valid<O: SimulationOracle + ?Sized>(oracle: &O, position: TilePosition) -> bool {
    let (rows, columns) = oracle.board_dimensions();
    position.in_bounds(rows, columns) && oracle.is_tile(position)
}

/// Keeps the candidates the oracle accepts as tiles, preserving order.
///
/// Positions outside `board_dimensions()` are dropped without querying the oracle.
pub fn filter_valid<O: SimulationOracle + ?Sized>(
    candidates: Vec<TilePosition>,
    oracle: &O,
) -> Vec<TilePosition> {
    let before = candidates.len();
    let kept: Vec<TilePosition> = candidates
        .into_iter()
        .filter(|pos| is_valid(oracle, *pos))
        .collect();
    debug!(before, after = kept.len(), "filtered candidate positions");
    kept
}
