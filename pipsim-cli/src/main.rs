//! PipSim CLI — inspect what the simulator has saved and what it will load.
//!
//! Commands:
//! - `stats`: equity, chart position and per-classification pip summaries
//! - `history`: closed trades, optionally limited to a bar window
//! - `data`: located source files and the size of the hourly series

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::debug;

use pipsim_cli::{DataReport, HistoryReport, StatsReport};
use pipsim_core::persistence;
use pipsim_core::SimConfig;

#[derive(Parser)]
#[command(
    name = "pipsim-cli",
    about = "PipSim CLI: inspect saved statistics, trade history and bar data"
)]
struct Cli {
    /// Path to a pipsim.toml. Defaults to ./pipsim.toml, then the user config dir.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Equity, chart position and per-classification pip summaries.
    Stats {
        /// Settings directory. Defaults to the configured one.
        #[arg(long)]
        settings_dir: Option<PathBuf>,

        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Closed trades in the order they were closed.
    History {
        /// Settings directory. Defaults to the configured one.
        #[arg(long)]
        settings_dir: Option<PathBuf>,

        /// Only trades closed at or after this bar index.
        #[arg(long)]
        from: Option<usize>,

        /// Only trades closed at or before this bar index.
        #[arg(long)]
        to: Option<usize>,

        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Located source files and the number of hourly bars.
    Data {
        /// Data directory. Defaults to the configured one.
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Print JSON instead of a table.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let (config, config_path) =
        SimConfig::load(cli.config.as_deref()).context("loading configuration")?;
    debug!(config = ?config_path, "configuration resolved");

    match cli.command {
        Commands::Stats { settings_dir, json } => {
            let dir = settings_dir.unwrap_or(config.settings_dir);
            let report = StatsReport::from_state(&persistence::load(&dir));
            emit(&report, json, StatsReport::render)
        }
        Commands::History {
            settings_dir,
            from,
            to,
            json,
        } => {
            if let (Some(from), Some(to)) = (from, to) {
                if from > to {
                    bail!("--from ({from}) must not exceed --to ({to})");
                }
            }
            let dir = settings_dir.unwrap_or(config.settings_dir);
            let report = HistoryReport::from_records(persistence::load(&dir).history, from, to);
            emit(&report, json, HistoryReport::render)
        }
        Commands::Data { data_dir, json } => {
            let dir = data_dir.unwrap_or(config.data_dir);
            let report = DataReport::scan(&dir)
                .with_context(|| format!("scanning data directory {}", dir.display()))?;
            emit(&report, json, DataReport::render)
        }
    }
}

fn emit<T: Serialize>(report: &T, json: bool, render: impl Fn(&T) -> String) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render(report));
    }
    Ok(())
}
