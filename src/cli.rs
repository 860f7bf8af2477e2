//! Command-line surface (§4.K). Two subcommands: `run` drives a full replay
//! from a YAML config, `generate-sample-data` writes a small synthetic input
//! set so the `run` subcommand has something to point at.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "deskline", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Replays a configured event sequence and writes the audit log,
    /// snapshots, and final state.
    Run {
        /// Path to the simulation's YAML config file.
        #[arg(long)]
        config: PathBuf,
        /// Overrides the `RUST_LOG`-style env filter for this run.
        #[arg(long)]
        log_level: Option<String>,
    },
    /// Writes a small synthetic input set (one Parquet file per event kind)
    /// under the given directory, for trying `run` without real desk data.
    GenerateSampleData {
        #[arg(long)]
        output_dir: PathBuf,
        /// Number of direct-pair client trades to synthesize (non-core).
        #[arg(long, default_value_t = 2)]
        num_trades: usize,
        /// Number of clock ticks to synthesize (non-core).
        #[arg(long, default_value_t = 2)]
        num_ticks: usize,
    },
}
