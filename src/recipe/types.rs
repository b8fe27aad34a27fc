//! Typed recipe documents.
//!
//! A recipe is a JSON object. Top-level keys are plain configuration
//! overrides, except `randomize`, which maps variable names to generation
//! specs. Each generation spec for a board position is an object of
//! `protocol tag -> params`, plus an optional `weights` list.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::constants::{
    DEFAULT_BOARD_BUGS, GENERATIVE_SUPPORT, PLAYER_START, PROTOCOL_RANGE_PAIR,
    PROTOCOL_RANGE_PRODUCT, PROTOCOL_RECT_RANGE, RANDOMIZE_KEY, WEIGHTS_KEY,
};
use crate::error::{ConfigError, Result};
use crate::generation::Protocol;

/// Parsed recipe document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recipe {
    /// Plain configuration overrides in document order
    pub overrides: IndexMap<String, Value>,
    /// Randomized variables, `None` when the document has no `randomize` key
    pub randomize: Option<IndexMap<String, VariableSpec>>,
}

/// Generation spec for one randomized variable.
#[derive(Debug, Clone, PartialEq)]
pub enum VariableSpec {
    /// Player start tile, drawn from validated board positions
    PlayerStart(PositionSpec),
    /// A variable kind with no candidate pipeline. Kept so it can be reported.
    Unsupported { name: String, raw: Value },
}

/// Protocols and optional weights for a position-valued variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionSpec {
    pub protocols: Vec<Protocol>,
    pub weights: Vec<f64>,
}

impl VariableSpec {
    fn parse(name: &str, spec: &Value) -> Result<Self> {
        if !GENERATIVE_SUPPORT.contains(&name) {
            return Ok(VariableSpec::Unsupported {
                name: name.to_string(),
                raw: spec.clone(),
            });
        }

        let obj = spec.as_object().ok_or_else(|| {
            ConfigError::MalformedRecipe(format!("{}: generation spec must be an object", name))
        })?;

        let mut position = PositionSpec::default();
        for (tag, params) in obj {
            if tag == WEIGHTS_KEY {
                position.weights = serde_json::from_value(params.clone()).map_err(|e| {
                    ConfigError::MalformedWeights {
                        variable: name.to_string(),
                        message: e.to_string(),
                    }
                })?;
                continue;
            }
            position.protocols.push(Protocol::parse(name, tag, params)?);
        }
        Ok(VariableSpec::PlayerStart(position))
    }

    /// Document form, as stored under `randomize`.
    pub fn to_json(&self) -> Value {
        match self {
            VariableSpec::PlayerStart(position) => {
                let mut obj = Map::new();
                for protocol in &position.protocols {
                    obj.insert(protocol.tag().to_string(), protocol.params_json());
                }
                if !position.weights.is_empty() {
                    obj.insert(WEIGHTS_KEY.to_string(), Value::from(position.weights.clone()));
                }
                Value::Object(obj)
            }
            VariableSpec::Unsupported { raw, .. } => raw.clone(),
        }
    }

    pub fn is_supported(&self) -> bool {
        !matches!(self, VariableSpec::Unsupported { .. })
    }
}

/// True if the value is an object naming at least one generation protocol.
fn is_generation_spec(value: &Value) -> bool {
    value.as_object().is_some_and(|obj| {
        obj.keys().any(|k| {
            [PROTOCOL_RANGE_PRODUCT, PROTOCOL_RANGE_PAIR, PROTOCOL_RECT_RANGE].contains(&k.as_str())
        })
    })
}

impl Recipe {
    /// Parses a recipe document.
    ///
    /// A generative variable may also appear at the top level (e.g.
    /// `"player_start": {"comb_list": ...}`); it joins the `randomize` map.
    /// A top-level value without protocol tags stays a plain override.
    pub fn from_json(doc: &Value) -> Result<Self> {
        let obj = doc
            .as_object()
            .ok_or_else(|| ConfigError::MalformedRecipe("recipe must be a JSON object".into()))?;

        let mut recipe = Recipe::default();
        let mut top_level = IndexMap::new();
        for (key, value) in obj {
            if key == RANDOMIZE_KEY {
                let specs = value.as_object().ok_or_else(|| {
                    ConfigError::MalformedRecipe(format!("`{}` must be an object", RANDOMIZE_KEY))
                })?;
                let mut parsed = IndexMap::new();
                for (name, spec) in specs {
                    parsed.insert(name.clone(), VariableSpec::parse(name, spec)?);
                }
                recipe.randomize = Some(parsed);
            } else if GENERATIVE_SUPPORT.contains(&key.as_str()) && is_generation_spec(value) {
                top_level.insert(key.clone(), VariableSpec::parse(key, value)?);
            } else {
                recipe.overrides.insert(key.clone(), value.clone());
            }
        }

        if !top_level.is_empty() {
            let specs = recipe.randomize.get_or_insert_with(IndexMap::new);
            for (name, spec) in top_level {
                if specs.contains_key(&name) {
                    return Err(ConfigError::MalformedRecipe(format!(
                        "`{}` is defined both at the top level and under `{}`",
                        name, RANDOMIZE_KEY
                    )));
                }
                specs.insert(name, spec);
            }
        }
        Ok(recipe)
    }

    /// True if the recipe randomizes a player start variable.
    pub fn defines_player_start(&self) -> bool {
        self.randomize.as_ref().is_some_and(|specs| {
            matches!(specs.get(PLAYER_START), Some(VariableSpec::PlayerStart(_)))
        })
    }

    /// A player start recipe resets board paint first, unless the recipe pins
    /// `default_board_bugs` itself.
    pub fn needs_board_reset(&self) -> bool {
        self.defines_player_start() && !self.overrides.contains_key(DEFAULT_BOARD_BUGS)
    }
}
