//! Command-line interface definition using clap.
//!
//! This module defines [`Args`], the argument structure of the `listpack`
//! binary. The binary reads raw records as JSON Lines, one object per line,
//! and runs them through the pipeline configured by a JSON run file.

use std::path::PathBuf;

use clap::{ArgAction, Parser};

use crate::config::RunConfig;

/// Normalize, identify and export scraped mailing-list messages
/// into year-partitioned XML and a run-wide CSV.
#[derive(Parser, Debug, Clone)]
#[command(name = "listpack")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    listpack lkml.jsonl --config hypermail.json
    listpack git.jsonl -c marc.json -o data/git --no-bodies
    listpack tei.jsonl -c tei.json --log-file log.txt -vv")]
pub struct Args {
    /// Raw records, one JSON object per line
    pub input: PathBuf,

    /// Run configuration (JSON)
    #[arg(short, long, value_name = "FILE")]
    pub config: PathBuf,

    /// Directory for the exports, overrides the run configuration
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Skip the per-year XML exports
    #[arg(long)]
    pub no_bodies: bool,

    /// Append diagnostics to this file instead of stderr
    #[arg(long, value_name = "FILE")]
    pub log_file: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Applies the command-line overrides to a loaded run configuration.
    pub fn apply_overrides(&self, mut config: RunConfig) -> RunConfig {
        if let Some(dir) = &self.output_dir {
            config.output_dir.clone_from(dir);
        }
        if self.no_bodies {
            config.export_bodies = false;
        }
        config
    }
}
