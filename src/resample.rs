//! Drawing fresh values for every randomized variable.

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;
use tracing::trace;

use crate::config::{Configuration, LoadState, RandomVariable};
use crate::error::{ConfigError, Result};

/// Draws one value from a variable's choices, weighted when weights are present.
pub fn draw<R: Rng + ?Sized>(var: &str, variable: &RandomVariable, rng: &mut R) -> Result<Value> {
    if variable.weights.is_empty() {
        return variable
            .choices
            .choose(rng)
            .cloned()
            .ok_or_else(|| ConfigError::MissingChoicesForRandomizedVariable(var.to_string()));
    }
    let dist = WeightedIndex::new(&variable.weights).map_err(|e| ConfigError::MalformedWeights {
        variable: var.to_string(),
        message: e.to_string(),
    })?;
    variable
        .choices
        .get(dist.sample(rng))
        .cloned()
        .ok_or_else(|| ConfigError::MissingChoicesForRandomizedVariable(var.to_string()))
}

/// Resamples every variable in the randomize set.
///
/// Only valid once a recipe has been loaded. All draws happen before any
/// value is written, so an error leaves the configuration as it was.
pub fn resample<R: Rng + ?Sized>(config: &mut Configuration, rng: &mut R) -> Result<()> {
    if config.state() == LoadState::Unloaded {
        return Err(ConfigError::InvalidState {
            operation: "resample",
            state: config.state(),
        });
    }

    let mut drawn = Vec::new();
    for var in config.randomized() {
        let variable = config
            .variable(var)
            .ok_or_else(|| ConfigError::MissingChoicesForRandomizedVariable(var.to_string()))?;
        let value = draw(var, variable, rng)?;
        trace!(variable = var, value = %value, "resampled");
        drawn.push((var.to_string(), value));
    }

    for (var, value) in drawn {
        config.set(var, value);
    }
    config.state = LoadState::Sampled;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use serde_json::json;

    fn create_test_rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(12345)
    }

    fn loaded(weights: serde_json::Value) -> Configuration {
        Configuration::from_json(&json!({
            "player_start": {"ty": 0, "tx": 0},
            "randomize": {"player_start": {}},
            "player_start.choices": [{"ty": 1, "tx": 1}, {"ty": 2, "tx": 2}, {"ty": 3, "tx": 3}],
            "player_start.weights": weights
        }))
        .unwrap()
    }

    #[test]
    fn test_resample_before_load_is_rejected() {
        let mut config = Configuration::from_json(&json!({"lives": 3})).unwrap();
        let err = resample(&mut config, &mut create_test_rng()).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidState {
                state: LoadState::Unloaded,
                ..
            }
        ));
    }

    #[test]
    fn test_uniform_draws_stay_in_choices() {
        let mut config = loaded(json!([]));
        let mut rng = create_test_rng();
        let choices = config.choices("player_start").unwrap().to_vec();
        for _ in 0..200 {
            resample(&mut config, &mut rng).unwrap();
            let value = config.current_value("player_start").unwrap();
            assert!(choices.contains(value), "{value} not in choices");
        }
        assert_eq!(config.state(), LoadState::Sampled);
    }

    #[test]
    fn test_uniform_draws_cover_all_choices() {
        let mut config = loaded(json!([]));
        let mut rng = create_test_rng();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..300 {
            resample(&mut config, &mut rng).unwrap();
            seen.insert(config.current_value("player_start").unwrap().to_string());
        }
        assert_eq!(seen.len(), 3);
    }

    #[test]
    fn test_point_mass_weights_are_deterministic() {
        let mut config = loaded(json!([1.0, 0.0, 0.0]));
        let mut rng = create_test_rng();
        for _ in 0..100 {
            resample(&mut config, &mut rng).unwrap();
            assert_eq!(
                config.current_value("player_start"),
                Some(&json!({"ty": 1, "tx": 1}))
            );
        }
    }

    #[test]
    fn test_weighted_draws_follow_weights() {
        let mut config = loaded(json!([0.1, 0.0, 0.9]));
        let mut rng = create_test_rng();
        let trials = 5000;
        let mut third = 0;
        for _ in 0..trials {
            resample(&mut config, &mut rng).unwrap();
            let value = config.current_value("player_start").unwrap();
            assert_ne!(value, &json!({"ty": 2, "tx": 2}), "zero-weight choice drawn");
            if value == &json!({"ty": 3, "tx": 3}) {
                third += 1;
            }
        }
        let rate = third as f64 / trials as f64;
        assert!((0.85..0.95).contains(&rate), "rate {rate} far from 0.9");
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let mut a = loaded(json!([]));
        let mut b = loaded(json!([]));
        let mut rng_a = ChaCha8Rng::seed_from_u64(7);
        let mut rng_b = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20 {
            resample(&mut a, &mut rng_a).unwrap();
            resample(&mut b, &mut rng_b).unwrap();
            assert_eq!(a.current_value("player_start"), b.current_value("player_start"));
        }
    }

    #[test]
    fn test_resample_leaves_other_settings_alone() {
        let mut config = loaded(json!([]));
        config.set("lives", json!(3));
        resample(&mut config, &mut create_test_rng()).unwrap();
        assert_eq!(config.setting("lives"), Some(&json!(3)));
    }
}
