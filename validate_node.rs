use fedval_node::config::load_config;
use fedval_node::logging::init_tracing;
use fedval_node::{Result, Validator, ValidatorError};
use std::io::Read;
use std::process;
use tracing::{error, info};

// Validation node entry point: rebuild a model from a flat weight vector and
// print its accuracy on a held-out dataset as a bare number on stdout.
const USAGE: &str = "usage: validate_node <dataset.csv> <weights-file|-> [config.json]";

/// Parses numbers separated by commas and/or whitespace.
///
/// Empty tokens (doubled separators, trailing newline) are ignored.
fn parse_weights(text: &str) -> Result<Vec<f32>> {
    text.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .enumerate()
        .map(|(index, token)| {
            token.parse::<f32>().map_err(|_| ValidatorError::Parse {
                row: 0,
                column: index,
                value: token.to_string(),
            })
        })
        .collect()
}

/// Reads the weight vector from a file, or from stdin when `source` is "-".
fn read_weights(source: &str) -> Result<Vec<f32>> {
    let text = if source == "-" {
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        std::fs::read_to_string(source)?
    };
    parse_weights(&text)
}

/// Builds the validator from the optional third argument.
fn validator_from_args(args: &[String]) -> Result<Validator> {
    match args.get(3) {
        Some(config_path) => {
            let config = load_config(config_path)?;
            info!(config = %config_path, "using node config");
            Validator::from_config(&config)
        }
        None => Ok(Validator::reference()),
    }
}

fn run(args: &[String]) -> Result<f32> {
    let dataset_path = &args[1];
    let weights = read_weights(&args[2])?;
    info!(values = weights.len(), "read weight vector");

    let validator = validator_from_args(args)?;
    validator.compute_validation_score(&weights, dataset_path)
}

fn main() {
    init_tracing();

    let args: Vec<String> = std::env::args().collect();
    if args.len() < 3 || args.len() > 4 {
        eprintln!("{}", USAGE);
        process::exit(1);
    }

    match run(&args) {
        Ok(score) => println!("{}", score),
        Err(err) => {
            error!(%err, "validation failed");
            eprintln!("{}", err);
            process::exit(1);
        }
    }
}
