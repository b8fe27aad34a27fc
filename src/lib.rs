//! Scenegen - procedural configuration and scene generation
//!
//! Turns declarative randomization recipes into validated, resampleable
//! configuration variables for a board-based simulation.

pub mod board;
pub mod build_info;
pub mod config;
pub mod constants;
pub mod error;
pub mod generation;
pub mod generator;
pub mod persistence;
pub mod recipe;
pub mod resample;

pub use board::{GridOracle, SimulationOracle, TilePosition};
pub use config::{Configuration, LoadOptions, LoadReport, LoadState};
pub use error::{ConfigError, Result};
pub use generator::SceneGenerator;
pub use recipe::Recipe;
