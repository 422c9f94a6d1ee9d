//! Tennis Elo CLI
//!
//! Reads a chronologically sorted A/B match table and writes it back with
//! pre-match global and per-surface Elo ratings appended.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- matches.csv -o matches_with_elo.csv --ratings final_elo.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug`, `info` or `warn` to control logging verbosity

use clap::Parser;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process;
use tennis_elo::{
    process_csv, write_file_atomically, write_ratings, InvalidRowPolicy, RatingConfig,
    RatingEngine, Result, Scope, DEFAULT_K_FACTOR, DEFAULT_START_RATING,
};

#[derive(Parser, Debug)]
#[command(name = "tennis-elo", version, about = "Compute pre-match Elo features for tennis matches")]
struct Cli {
    /// Match table, sorted by tourney_date
    input: PathBuf,

    /// Write the enriched table here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write final ratings to this file
    #[arg(long)]
    ratings: Option<PathBuf>,

    /// Rating of a player before their first match
    #[arg(long, default_value_t = DEFAULT_START_RATING, allow_negative_numbers = true)]
    start_rating: f64,

    /// Maximum rating change per match
    #[arg(long, default_value_t = DEFAULT_K_FACTOR)]
    k_factor: f64,

    /// Only compute global ratings
    #[arg(long)]
    no_surface: bool,

    /// Skip malformed rows instead of failing
    #[arg(long)]
    skip_invalid: bool,
}

impl Cli {
    fn rating_config(&self) -> RatingConfig {
        let scopes = if self.no_surface {
            vec![Scope::Global]
        } else {
            vec![Scope::Global, Scope::Surface]
        };
        RatingConfig {
            start_rating: self.start_rating,
            k_factor: self.k_factor,
            scopes,
        }
    }

    fn policy(&self) -> InvalidRowPolicy {
        if self.skip_invalid {
            InvalidRowPolicy::Skip
        } else {
            InvalidRowPolicy::Fail
        }
    }
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut engine = RatingEngine::new(cli.rating_config())?;

    let file = File::open(&cli.input)?;
    let reader = BufReader::new(file);

    match &cli.output {
        Some(path) => {
            write_file_atomically(path, |writer| {
                process_csv(&mut engine, reader, writer, cli.policy())
            })?;
        }
        None => {
            process_csv(&mut engine, reader, io::stdout().lock(), cli.policy())?;
        }
    }

    if let Some(path) = &cli.ratings {
        write_file_atomically(path, |writer| write_ratings(&engine, writer))?;
    }

    Ok(())
}
