//! Integration test: Recipe -> Candidates -> Validity Filter -> Registry -> Resample
//!
//! Drives full loads through the public API on in-memory boards and checks
//! the registry contents and the sampled values that come out the other end.

use scenegen::board::{filter_valid, GridOracle, SimulationOracle, TilePosition};
use scenegen::error::CandidateStage;
use scenegen::generation::{generate_candidates, protocol_candidates, Protocol};
use scenegen::{ConfigError, Configuration, LoadState, Recipe, SceneGenerator};
use serde_json::{json, Value};

const AMIDAR_LIKE: &str = "\
##########
#........#
#.##.###.#
#........#
#.##.###.#
#........#
##########
";

fn engine_config() -> Configuration {
    Configuration::from_json(&json!({
        "lives": 3,
        "no_chase": false,
        "default_board_bugs": true,
        "player_start": {"ty": 1, "tx": 1}
    }))
    .unwrap()
}

fn open_generator(seed: u64) -> SceneGenerator<GridOracle> {
    SceneGenerator::with_seed(GridOracle::open(20, 20), engine_config(), seed)
}

// =========================================================================
// End-to-end scenarios
// =========================================================================

#[test]
fn test_comb_list_on_open_board_yields_six_positions() {
    let mut generator = open_generator(11);
    generator.apply_overrides(&json!({
        "randomize": {"player_start": {"comb_list": {"xrange": [1, 2, 3], "yrange": [5, 6]}}}
    }))
    .unwrap();

    let choices = generator.config().choices("player_start").unwrap().to_vec();
    assert_eq!(choices.len(), 6);
    for choice in &choices {
        let pos: TilePosition = serde_json::from_value(choice.clone()).unwrap();
        assert!([5, 6].contains(&pos.row), "row {} not in yrange", pos.row);
        assert!([1, 2, 3].contains(&pos.column), "column {} not in xrange", pos.column);
    }

    generator.resample().unwrap();
    let current = generator.current_value("player_start").unwrap();
    assert!(choices.contains(current));
}

#[test]
fn test_top_level_player_start_spec_is_generated_not_stored() {
    let mut generator = open_generator(21);
    let report = generator
        .apply_overrides(&json!({
            "player_start": {"comb_list": {"xrange": [1, 2, 3], "yrange": [5, 6]}}
        }))
        .unwrap();

    assert!(report.overridden.is_empty());
    assert_eq!(report.registered, vec![("player_start".to_string(), 6)]);
    assert!(generator.config().is_randomized("player_start"));
    // Until resampled, the engine's original start position is kept
    assert_eq!(
        generator.current_position("player_start"),
        Some(TilePosition::new(1, 1))
    );

    generator.resample().unwrap();
    let pos = generator.current_position("player_start").unwrap();
    assert!([5, 6].contains(&pos.row));
    assert!([1, 2, 3].contains(&pos.column));
}

#[test]
fn test_top_level_player_start_tile_is_a_plain_override() {
    let mut generator = open_generator(22);
    let report = generator
        .apply_overrides(&json!({"player_start": {"ty": 4, "tx": 9}}))
        .unwrap();

    assert_eq!(report.overridden, vec!["player_start".to_string()]);
    assert!(!generator.config().is_randomized("player_start"));
    assert_eq!(
        generator.current_position("player_start"),
        Some(TilePosition::new(4, 9))
    );
}

#[test]
fn test_mismatched_zip_as_only_protocol_fails_load() {
    let mut generator = open_generator(12);
    let err = generator
        .apply_overrides(&json!({
            "randomize": {"player_start": {"zip_list": {"x1": 0, "x2": 3, "y1": 0, "y2": 2}}}
        }))
        .unwrap_err();

    assert!(
        matches!(
            err,
            ConfigError::EmptyCandidateSet {
                stage: CandidateStage::Generated,
                ..
            }
        ),
        "unexpected error: {err}"
    );
    assert_eq!(generator.config().state(), LoadState::Unloaded);
}

#[test]
fn test_walls_are_never_offered_as_start_positions() {
    let oracle = GridOracle::from_ascii(AMIDAR_LIKE).unwrap();
    let mut generator = SceneGenerator::with_seed(oracle, engine_config(), 5);
    generator.apply_overrides(&json!({
        "randomize": {"player_start": {"comb_list": {
            "xrange": [0, 1, 2, 3, 4, 5, 6, 7, 8, 9],
            "yrange": [0, 1, 2, 3, 4, 5, 6]
        }}}
    }))
    .unwrap();

    let choices = generator.config().choices("player_start").unwrap().to_vec();
    assert!(!choices.is_empty());
    assert!(choices.len() < 70);
    for _ in 0..50 {
        generator.resample().unwrap();
        let pos = generator.current_position("player_start").unwrap();
        assert!(generator.oracle().is_tile(pos), "{pos:?} is a wall");
    }
}

#[test]
fn test_unsupported_variable_does_not_disturb_the_rest() {
    let mut generator = open_generator(13);
    let report = generator
        .apply_overrides(&json!({
            "lives": 7,
            "randomize": {
                "enemy_protocol": {"choices": ["EnemyLookupAI", "EnemyRandomMvmt"]},
                "player_start": {"zip_list": {"x1": 2, "x2": 5, "y1": 8, "y2": 11}}
            }
        }))
        .unwrap();

    assert_eq!(report.unsupported, vec!["enemy_protocol".to_string()]);
    assert_eq!(generator.config().setting("lives"), Some(&json!(7)));
    assert_eq!(generator.config().setting("no_chase"), Some(&json!(false)));
    assert_eq!(generator.config().choices("player_start").unwrap().len(), 3);
    assert_eq!(generator.config().randomized().collect::<Vec<_>>(), vec!["player_start"]);
}

#[test]
fn test_every_randomized_variable_has_choices_after_load() {
    let recipes = [
        json!({"randomize": {"player_start": {"comb_list": {"xrange": [0, 4], "yrange": [0, 4]}}}}),
        json!({"randomize": {"player_start": {"zip_list": {"x1": 1, "x2": 6, "y1": 10, "y2": 15}}}}),
        json!({"randomize": {"player_start": {
            "comb_list": {"xrange": [3], "yrange": [3]},
            "zip_list": {"x1": 0, "x2": 3, "y1": 0, "y2": 2}
        }}}),
    ];
    for (i, doc) in recipes.iter().enumerate() {
        let mut generator = open_generator(i as u64);
        generator.apply_overrides(doc).unwrap();
        for var in generator.config().randomized() {
            let count = generator.config().choices(var).map_or(0, |c| c.len());
            assert!(count > 0, "recipe {i}: {var} has no choices");
        }
    }
}

#[test]
fn test_point_mass_weights_pin_the_start() {
    let mut generator = open_generator(14);
    generator.apply_overrides(&json!({
        "randomize": {"player_start": {
            "comb_list": {"xrange": [4, 5, 6], "yrange": [9]},
            "weights": [1, 0, 0]
        }}
    }))
    .unwrap();

    for _ in 0..100 {
        generator.resample().unwrap();
        assert_eq!(generator.current_position("player_start"), Some(TilePosition::new(9, 4)));
    }
}

#[test]
fn test_saved_configuration_resamples_after_reload() {
    let mut generator = open_generator(15);
    generator.apply_overrides(&json!({
        "randomize": {"player_start": {"comb_list": {"xrange": [1, 2], "yrange": [3, 4]}}}
    }))
    .unwrap();
    generator.resample().unwrap();

    let saved: Value = generator.config().to_json();
    let reloaded = Configuration::from_json(&saved).unwrap();
    assert_eq!(reloaded.state(), LoadState::Loaded);

    let mut again = SceneGenerator::with_seed(GridOracle::open(20, 20), reloaded, 15);
    again.resample().unwrap();
    let value = again.current_value("player_start").unwrap();
    assert!(generator.config().choices("player_start").unwrap().contains(value));
}

#[test]
fn test_rect_range_is_rejected_not_ignored() {
    let mut generator = open_generator(16);
    let err = generator
        .apply_overrides(&json!({
            "randomize": {"player_start": {"rect_range": {"x1": 0, "x2": 3, "y1": 0, "y2": 3}}}
        }))
        .unwrap_err();
    assert!(matches!(err, ConfigError::ProtocolNotImplemented { .. }));
}

// =========================================================================
// Candidate properties
// =========================================================================

#[test]
fn test_zip_candidates_stay_within_bounds_and_dedup() {
    for (x1, y1, n) in [(0, 0, 1), (3, 7, 5), (-2, 4, 9), (10, 0, 12)] {
        let recipe = Recipe::from_json(&json!({"randomize": {"player_start": {
            "zip_list": {"x1": x1, "x2": x1 + n, "y1": y1, "y2": y1 + n}
        }}}))
        .unwrap();
        let spec = match &recipe.randomize.unwrap()["player_start"] {
            scenegen::recipe::VariableSpec::PlayerStart(p) => p.clone(),
            other => panic!("unexpected spec {other:?}"),
        };
        let coords = protocol_candidates("player_start", &spec.protocols[0]).unwrap();
        assert!(coords.len() <= n as usize);
        for (x, y) in coords {
            assert!(x1 <= x && x < x1 + n);
            assert!(y1 <= y && y < y1 + n);
        }
    }
}

#[test]
fn test_product_candidates_count_is_m_times_n() {
    for (m, n) in [(1, 1), (2, 5), (7, 3), (10, 10)] {
        let protocol = Protocol::RangeProduct {
            xrange: (0..m).collect(),
            yrange: (100..100 + n).collect(),
        };
        let candidates = generate_candidates("player_start", &[protocol]).unwrap();
        assert_eq!(candidates.len(), (m * n) as usize);
    }
}

#[test]
fn test_filtering_never_increases_count() {
    let oracle = GridOracle::from_ascii(AMIDAR_LIKE).unwrap();
    let protocol = Protocol::RangeProduct {
        xrange: (-2..12).collect(),
        yrange: (-2..9).collect(),
    };
    let generated = generate_candidates("player_start", &[protocol]).unwrap();
    let total = generated.len();
    let filtered = filter_valid(generated, &oracle);
    assert!(filtered.len() <= total);
    assert!(filtered.iter().all(|p| oracle.is_tile(*p)));
}
