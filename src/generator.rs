//! Scene generator: a configuration, its oracle, and a seeded RNG.
//!
//! This is the session-level entry point. A generator is seeded from the
//! engine's current settings, recipes are applied to it, and `resample()`
//! is called once per new scene or episode.

use std::path::Path;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde_json::Value;

use crate::board::{SimulationOracle, TilePosition};
use crate::config::{self, Configuration, LoadOptions, LoadReport};
use crate::error::Result;
use crate::recipe::{load_recipe, Recipe};
use crate::resample::resample;

pub struct SceneGenerator<O: SimulationOracle> {
    oracle: O,
    config: Configuration,
    rng: ChaCha8Rng,
    options: LoadOptions,
}

impl<O: SimulationOracle> SceneGenerator<O> {
    /// Creates a generator with an entropy-seeded RNG.
    pub fn new(oracle: O, config: Configuration) -> Self {
        Self::build(oracle, config, ChaCha8Rng::from_entropy())
    }

    /// Creates a generator whose draws are reproducible for a given seed.
    pub fn with_seed(oracle: O, config: Configuration, seed: u64) -> Self {
        Self::build(oracle, config, ChaCha8Rng::seed_from_u64(seed))
    }

    fn build(oracle: O, config: Configuration, rng: ChaCha8Rng) -> Self {
        Self {
            oracle,
            config,
            rng,
            options: LoadOptions::default(),
        }
    }

    pub fn with_options(mut self, options: LoadOptions) -> Self {
        self.options = options;
        self
    }

    /// Parses and applies a recipe document.
    pub fn apply_overrides(&mut self, doc: &Value) -> Result<LoadReport> {
        let recipe = Recipe::from_json(doc)?;
        self.apply_recipe(&recipe)
    }

    pub fn apply_recipe(&mut self, recipe: &Recipe) -> Result<LoadReport> {
        config::apply_overrides(&mut self.config, recipe, &mut self.oracle, self.options)
    }

    /// Loads a recipe file and applies it. A missing file is `NotFound`.
    pub fn apply_recipe_file(&mut self, path: &Path) -> Result<LoadReport> {
        let recipe = load_recipe(path)?;
        self.apply_recipe(&recipe)
    }

    pub fn resample(&mut self) -> Result<()> {
        resample(&mut self.config, &mut self.rng)
    }

    /// Explicit board reset, independent of any recipe.
    pub fn reset_board(&mut self) -> bool {
        config::reset_board(&mut self.config, &mut self.oracle)
    }

    pub fn current_value(&self, var: &str) -> Option<&Value> {
        self.config.current_value(var)
    }

    pub fn current_position(&self, var: &str) -> Option<TilePosition> {
        self.config.current_position(var)
    }

    pub fn config(&self) -> &Configuration {
        &self.config
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    pub fn into_parts(self) -> (O, Configuration) {
        (self.oracle, self.config)
    }
}
