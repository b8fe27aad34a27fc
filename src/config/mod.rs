//! The configuration and its registry of randomized variables.

pub mod logic;
pub mod types;

pub use logic::{apply_overrides, normalize_weights, reset_board, LoadOptions, LoadReport};
pub use types::{Configuration, LoadState, RandomVariable};
