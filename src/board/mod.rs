//! Board positions, the simulation oracle, and candidate validity filtering.

pub mod logic;
pub mod oracle;
pub mod types;

pub use logic::{filter_valid, is_valid};
pub use oracle::{GridOracle, SimulationOracle};
pub use types::TilePosition;
