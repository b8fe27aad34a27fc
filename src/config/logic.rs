//! Applying recipes to a configuration.

use tracing::{info, warn};

use super::types::{Configuration, LoadState, RandomVariable};
use crate::board::{filter_valid, is_valid, SimulationOracle, TilePosition};
use crate::constants::{DEFAULT_BOARD_BUGS, NO_CHASE, WEIGHT_SUM_TOLERANCE};
use crate::error::{CandidateStage, ConfigError, Result};
use crate::generation::generate_candidates;
use crate::recipe::{PositionSpec, Recipe, VariableSpec};

/// Options for [`apply_overrides`].
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    /// Reset board paint before validating positions when the recipe calls for it
    pub reset_board: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { reset_board: true }
    }
}

/// What a successful load did.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LoadReport {
    /// Plain overrides written to the configuration
    pub overridden: Vec<String>,
    /// Top-level keys with no matching configuration key
    pub ignored: Vec<String>,
    /// Randomized variables with no candidate pipeline
    pub unsupported: Vec<String>,
    /// Registered variables and their choice counts
    pub registered: Vec<(String, usize)>,
    /// `Some(suppress_enemies)` if the board paint was reset
    pub board_reset: Option<bool>,
}

/// Validates a weight vector against its choice count and normalises it to sum to 1.
///
/// An empty vector means uniform and is returned as is.
pub fn normalize_weights(variable: &str, weights: &[f64], choices: usize) -> Result<Vec<f64>> {
    if weights.is_empty() {
        return Ok(Vec::new());
    }
    let malformed = |message: String| ConfigError::MalformedWeights {
        variable: variable.to_string(),
        message,
    };
    if weights.len() != choices {
        return Err(malformed(format!(
            "{} weights for {} choices",
            weights.len(),
            choices
        )));
    }
    if let Some(bad) = weights.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(malformed(format!("weight {} is not a non-negative number", bad)));
    }
    let total: f64 = weights.iter().sum();
    if total <= 0.0 {
        return Err(malformed("weights sum to zero".to_string()));
    }
    if (total - 1.0).abs() <= WEIGHT_SUM_TOLERANCE {
        return Ok(weights.to_vec());
    }
    Ok(weights.iter().map(|w| w / total).collect())
}

/// Resets board paint on the oracle and pins `default_board_bugs` off.
///
/// Enemies are suppressed per the configuration's `no_chase` flag. Returns
/// the suppression flag that was used.
pub fn reset_board<O: SimulationOracle + ?Sized>(
    config: &mut Configuration,
    oracle: &mut O,
) -> bool {
    let suppress = config.flag(NO_CHASE).unwrap_or(false);
    config.set(DEFAULT_BOARD_BUGS, serde_json::Value::Bool(false));
    oracle.reset_board_paint(suppress);
    info!(suppress_enemies = suppress, "reset board paint");
    suppress
}

fn resolve_positions<O: SimulationOracle + ?Sized>(
    variable: &str,
    spec: &PositionSpec,
    oracle: &O,
) -> Result<RandomVariable> {
    let candidates = generate_candidates(variable, &spec.protocols)?;
    // Weights line up with the generated candidates and are dropped with them.
    let raw_weights = normalize_weights(variable, &spec.weights, candidates.len())?;
    let (valid, kept_weights): (Vec<TilePosition>, Vec<f64>) = if raw_weights.is_empty() {
        (filter_valid(candidates, oracle), Vec::new())
    } else {
        candidates
            .into_iter()
            .zip(raw_weights)
            .filter(|(pos, _)| is_valid(oracle, *pos))
            .unzip()
    };
    if valid.is_empty() {
        return Err(ConfigError::EmptyCandidateSet {
            variable: variable.to_string(),
            stage: CandidateStage::Filtered,
        });
    }
    let weights = normalize_weights(variable, &kept_weights, valid.len())?;
    let choices = valid
        .iter()
        .map(serde_json::to_value)
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok(RandomVariable { choices, weights })
}

/// Applies a recipe to the configuration.
///
/// Plain overrides land first so the generative pipeline sees them (e.g.
/// `no_chase`). Then each randomized variable is resolved through candidate
/// generation and validity filtering. The configuration is only updated if
/// the whole load succeeds; an oracle reset, once performed, is not undone.
pub fn apply_overrides<O: SimulationOracle + ?Sized>(
    config: &mut Configuration,
    recipe: &Recipe,
    oracle: &mut O,
    options: LoadOptions,
) -> Result<LoadReport> {
    let mut next = config.clone();
    let mut report = LoadReport::default();

    for (key, value) in &recipe.overrides {
        if next.contains_setting(key) {
            next.set(key.clone(), value.clone());
            report.overridden.push(key.clone());
        } else {
            warn!(key = key.as_str(), "ignoring override for unknown configuration key");
            report.ignored.push(key.clone());
        }
    }

    if let Some(specs) = &recipe.randomize {
        if options.reset_board && recipe.needs_board_reset() {
            report.board_reset = Some(reset_board(&mut next, oracle));
        }

        next.randomize.clear();
        for (name, spec) in specs {
            match spec {
                VariableSpec::PlayerStart(position) => {
                    let variable = resolve_positions(name, position, oracle)?;
                    report.registered.push((name.clone(), variable.choices.len()));
                    next.variables.insert(name.clone(), variable);
                    next.randomize.insert(name.clone(), spec.to_json());
                }
                VariableSpec::Unsupported { name, .. } => {
                    warn!("{}", ConfigError::UnsupportedVariableKind(name.clone()));
                    report.unsupported.push(name.clone());
                }
            }
        }
    }

    next.check_randomized_choices()?;
    next.state = LoadState::Loaded;
    *config = next;

    info!(
        overridden = report.overridden.len(),
        registered = report.registered.len(),
        unsupported = report.unsupported.len(),
        "applied recipe"
    );
    Ok(report)
}
