//! Configuration data structures.
//!
//! The engine sees a flat key space: plain settings, `randomize`, and for
//! every randomized variable `v` the keys `v`, `v.choices` and `v.weights`.
//! Internally the choices and weights live in a typed registry; the current
//! value of `v` stays a plain setting.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::logic::normalize_weights;
use crate::board::TilePosition;
use crate::constants::{CHOICES_SUFFIX, RANDOMIZE_KEY, WEIGHTS_SUFFIX};
use crate::error::{ConfigError, Result};

/// Recipe lifecycle of a configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// No recipe applied yet
    Unloaded,
    /// Candidate sets resolved
    Loaded,
    /// Current values drawn for every randomized variable
    Sampled,
}

impl fmt::Display for LoadState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadState::Unloaded => write!(f, "unloaded"),
            LoadState::Loaded => write!(f, "loaded"),
            LoadState::Sampled => write!(f, "sampled"),
        }
    }
}

/// Resolved choice set of a randomized variable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RandomVariable {
    pub choices: Vec<Value>,
    /// Empty means uniform; otherwise same length as `choices`, summing to 1
    pub weights: Vec<f64>,
}

/// Mutable simulation configuration.
#[derive(Debug, Clone)]
pub struct Configuration {
    settings: IndexMap<String, Value>,
    pub(crate) randomize: IndexMap<String, Value>,
    pub(crate) variables: IndexMap<String, RandomVariable>,
    pub(crate) state: LoadState,
}

impl Default for Configuration {
    fn default() -> Self {
        Self::new()
    }
}

impl Configuration {
    pub fn new() -> Self {
        Self {
            settings: IndexMap::new(),
            randomize: IndexMap::new(),
            variables: IndexMap::new(),
            state: LoadState::Unloaded,
        }
    }

    /// Seeds a configuration from the engine's flat JSON settings.
    ///
    /// A previously saved configuration (with `randomize` and `v.choices` /
    /// `v.weights` keys) comes back `Loaded`; weights are validated here.
    pub fn from_json(doc: &Value) -> Result<Self> {
        let obj = doc.as_object().ok_or_else(|| {
            ConfigError::MalformedRecipe("configuration must be a JSON object".into())
        })?;

        let mut config = Configuration::new();
        let mut weights: IndexMap<String, Vec<f64>> = IndexMap::new();
        for (key, value) in obj {
            if key == RANDOMIZE_KEY {
                let set = value.as_object().ok_or_else(|| {
                    ConfigError::MalformedRecipe(format!("`{}` must be an object", RANDOMIZE_KEY))
                })?;
                config.randomize = set.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
            } else if let Some(var) = key.strip_suffix(CHOICES_SUFFIX) {
                let choices = value.as_array().cloned().ok_or_else(|| {
                    ConfigError::MalformedRecipe(format!("`{}` must be a list", key))
                })?;
                config.variables.entry(var.to_string()).or_default().choices = choices;
            } else if let Some(var) = key.strip_suffix(WEIGHTS_SUFFIX) {
                let parsed: Vec<f64> = serde_json::from_value(value.clone()).map_err(|e| {
                    ConfigError::MalformedWeights {
                        variable: var.to_string(),
                        message: e.to_string(),
                    }
                })?;
                weights.insert(var.to_string(), parsed);
            } else {
                config.settings.insert(key.clone(), value.clone());
            }
        }

        for (var, w) in weights {
            let variable = config.variables.entry(var.clone()).or_default();
            variable.weights = normalize_weights(&var, &w, variable.choices.len())?;
        }

        if !config.randomize.is_empty() {
            config.check_randomized_choices()?;
            config.state = LoadState::Loaded;
        }
        Ok(config)
    }

    /// Flat engine form: settings, then `randomize`, then choices and weights.
    pub fn to_json(&self) -> Value {
        let mut obj = Map::new();
        for (key, value) in &self.settings {
            obj.insert(key.clone(), value.clone());
        }
        if !self.randomize.is_empty() {
            let set: Map<String, Value> = self
                .randomize
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            obj.insert(RANDOMIZE_KEY.to_string(), Value::Object(set));
        }
        for (var, variable) in &self.variables {
            obj.insert(
                format!("{}{}", var, CHOICES_SUFFIX),
                Value::Array(variable.choices.clone()),
            );
            obj.insert(
                format!("{}{}", var, WEIGHTS_SUFFIX),
                Value::from(variable.weights.clone()),
            );
        }
        Value::Object(obj)
    }

    pub fn state(&self) -> LoadState {
        self.state
    }

    /// Plain setting, including the current value of a randomized variable.
    pub fn setting(&self, key: &str) -> Option<&Value> {
        self.settings.get(key)
    }

    pub fn contains_setting(&self, key: &str) -> bool {
        self.settings.contains_key(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Value) {
        self.settings.insert(key.into(), value);
    }

    /// Boolean setting, `None` when absent or not a boolean.
    pub fn flag(&self, key: &str) -> Option<bool> {
        self.settings.get(key).and_then(Value::as_bool)
    }

    /// Flat-key lookup: `v.choices` and `v.weights` resolve against the registry.
    pub fn get(&self, key: &str) -> Option<Value> {
        if key == RANDOMIZE_KEY {
            let set: Map<String, Value> = self
                .randomize
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect();
            return Some(Value::Object(set));
        }
        if let Some(var) = key.strip_suffix(CHOICES_SUFFIX) {
            if let Some(variable) = self.variables.get(var) {
                return Some(Value::Array(variable.choices.clone()));
            }
        }
        if let Some(var) = key.strip_suffix(WEIGHTS_SUFFIX) {
            if let Some(variable) = self.variables.get(var) {
                return Some(Value::from(variable.weights.clone()));
            }
        }
        self.settings.get(key).cloned()
    }

    /// Current sampled value of a variable.
    pub fn current_value(&self, var: &str) -> Option<&Value> {
        self.settings.get(var)
    }

    /// Current value decoded as a board position.
    pub fn current_position(&self, var: &str) -> Option<TilePosition> {
        self.current_value(var)
            .and_then(|v| serde_json::from_value(v.clone()).ok())
    }

    pub fn variable(&self, var: &str) -> Option<&RandomVariable> {
        self.variables.get(var)
    }

    pub fn choices(&self, var: &str) -> Option<&[Value]> {
        self.variables.get(var).map(|v| v.choices.as_slice())
    }

    pub fn weights(&self, var: &str) -> Option<&[f64]> {
        self.variables.get(var).map(|v| v.weights.as_slice())
    }

    /// Names in the randomize set, in declaration order.
    pub fn randomized(&self) -> impl Iterator<Item = &str> {
        self.randomize.keys().map(String::as_str)
    }

    pub fn is_randomized(&self, var: &str) -> bool {
        self.randomize.contains_key(var)
    }

    /// Every randomized variable must have a non-empty choice set.
    pub(crate) fn check_randomized_choices(&self) -> Result<()> {
        for var in self.randomize.keys() {
            let has_choices = self
                .variables
                .get(var)
                .is_some_and(|v| !v.choices.is_empty());
            if !has_choices {
                return Err(ConfigError::MissingChoicesForRandomizedVariable(var.clone()));
            }
        }
        Ok(())
    }
}
