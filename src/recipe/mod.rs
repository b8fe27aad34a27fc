//! Recipe documents: typed parsing and file loading.

pub mod types;

pub use types::{PositionSpec, Recipe, VariableSpec};

use std::path::Path;

use crate::error::Result;
use crate::persistence::read_json;

/// Loads and parses a recipe file. A missing file is a `NotFound` error.
pub fn load_recipe(path: &Path) -> Result<Recipe> {
    let doc = read_json(path)?;
    Recipe::from_json(&doc)
}
