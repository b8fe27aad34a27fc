//! Scene generator CLI.
//!
//! Applies a recipe to an engine configuration on a board and prints
//! resampled scenes as JSON lines.
//!
//! Usage:
//!   scenegen --recipe <FILE> --board <FILE> [OPTIONS]
//!
//! Examples:
//!   scenegen -r start.json -b amidar.txt                # One scene
//!   scenegen -r start.json -b amidar.txt -n 10 -s 42   # Ten reproducible scenes
//!   scenegen -r start.json -b amidar.txt --save out.json

use std::env;
use std::path::PathBuf;
use std::process;

use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use scenegen::board::GridOracle;
use scenegen::build_info::version_string;
use scenegen::config::{Configuration, LoadOptions};
use scenegen::persistence::{read_json, read_text, write_json};
use scenegen::{ConfigError, Result, SceneGenerator};

#[derive(Debug, Default)]
struct CliArgs {
    recipe: Option<PathBuf>,
    board: Option<PathBuf>,
    config: Option<PathBuf>,
    save: Option<PathBuf>,
    samples: usize,
    seed: Option<u64>,
    no_reset: bool,
    show_version: bool,
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = env::args().collect();
    let cli = match parse_args(&args) {
        Ok(cli) => cli,
        Err(message) => {
            eprintln!("{}", message);
            eprintln!("{}", usage());
            process::exit(2);
        }
    };

    if cli.show_version {
        println!("{}", version_string());
        return;
    }

    if let Err(e) = run(&cli) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &CliArgs) -> Result<()> {
    let recipe_path = cli
        .recipe
        .as_ref()
        .ok_or_else(|| ConfigError::MalformedRecipe("--recipe is required".into()))?;
    let board_path = cli
        .board
        .as_ref()
        .ok_or_else(|| ConfigError::MalformedBoard("--board is required".into()))?;

    let oracle = GridOracle::from_ascii(&read_text(board_path)?)?;
    let config = match &cli.config {
        Some(path) => Configuration::from_json(&read_json(path)?)?,
        None => Configuration::new(),
    };

    let mut generator = match cli.seed {
        Some(seed) => SceneGenerator::with_seed(oracle, config, seed),
        None => SceneGenerator::new(oracle, config),
    }
    .with_options(LoadOptions {
        reset_board: !cli.no_reset,
    });

    let report = generator.apply_recipe_file(recipe_path)?;
    for (name, count) in &report.registered {
        eprintln!("{}: {} choices", name, count);
    }

    let names: Vec<String> = generator.config().randomized().map(String::from).collect();
    for scene in 0..cli.samples {
        generator.resample()?;
        let mut line = Map::new();
        line.insert("scene".to_string(), Value::from(scene));
        for name in &names {
            if let Some(value) = generator.current_value(name) {
                line.insert(name.clone(), value.clone());
            }
        }
        println!("{}", Value::Object(line));
    }

    if let Some(path) = &cli.save {
        write_json(path, &generator.config().to_json())?;
        eprintln!("configuration saved to: {}", path.display());
    }
    Ok(())
}

fn parse_args(args: &[String]) -> std::result::Result<CliArgs, String> {
    let mut cli = CliArgs {
        samples: 1,
        ..Default::default()
    };

    let mut i = 1;
    while i < args.len() {
        let flag = args[i].as_str();
        let mut value = || -> std::result::Result<String, String> {
            i += 1;
            args.get(i)
                .cloned()
                .ok_or_else(|| format!("missing value for {}", flag))
        };
        match flag {
            "-r" | "--recipe" => cli.recipe = Some(PathBuf::from(value()?)),
            "-b" | "--board" => cli.board = Some(PathBuf::from(value()?)),
            "-c" | "--config" => cli.config = Some(PathBuf::from(value()?)),
            "--save" => cli.save = Some(PathBuf::from(value()?)),
            "-n" | "--samples" => {
                let raw = value()?;
                cli.samples = raw
                    .parse()
                    .map_err(|_| format!("invalid sample count: {}", raw))?;
            }
            "-s" | "--seed" => {
                let raw = value()?;
                cli.seed = Some(raw.parse().map_err(|_| format!("invalid seed: {}", raw))?);
            }
            "--no-reset" => cli.no_reset = true,
            "-V" | "--version" => cli.show_version = true,
            other => return Err(format!("unknown option: {}", other)),
        }
        i += 1;
    }
    Ok(cli)
}

fn usage() -> &'static str {
    "usage: scenegen --recipe <FILE> --board <FILE> [--config <FILE>] [--samples N] \
     [--seed N] [--save <FILE>] [--no-reset] [--version]"
}
