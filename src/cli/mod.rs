//! Command-line parsing for the epidemic curve fitter.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the modeling/math code. Every reference
//! constant of the pipeline (forecast horizon, delay scan range, data
//! locations) appears here as a documented flag default.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::data::fetch::DEFAULT_URL;
use crate::fit::DEFAULT_DELAY_RANGE;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "epi", version, about = "SIR epidemic curve fitter and forecaster")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the full pipeline: fetch, aggregate, fit, forecast, export, plot.
    Run(RunArgs),
    /// Fit and report only (no chart or CSV artifacts).
    Fit(RunArgs),
}

/// Common options for running and fitting.
#[derive(Debug, Parser, Clone)]
pub struct RunArgs {
    /// Remote source URL (per-region daily CSV).
    #[arg(long, default_value = DEFAULT_URL)]
    pub url: String,

    /// Directory for the cached download and CSV exports.
    #[arg(long, default_value = "data")]
    pub data_dir: PathBuf,

    /// Directory for chart images.
    #[arg(long, default_value = "images")]
    pub images_dir: PathBuf,

    /// Forecast horizon in days.
    #[arg(long, default_value_t = 60)]
    pub horizon: usize,

    /// Smallest delay to scan (inclusive).
    #[arg(long, default_value_t = DEFAULT_DELAY_RANGE.start, allow_hyphen_values = true)]
    pub delay_min: i32,

    /// Delay scan upper bound (exclusive).
    #[arg(long, default_value_t = DEFAULT_DELAY_RANGE.end, allow_hyphen_values = true)]
    pub delay_max: i32,

    /// Reuse the cached download instead of fetching.
    #[arg(long)]
    pub offline: bool,

    /// Generate a seeded synthetic epidemic instead of downloading.
    #[arg(long)]
    pub sample: bool,

    /// Random seed for synthetic data.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Synthetic series length in days.
    #[arg(long, default_value_t = 90)]
    pub sample_days: usize,

    /// Number of synthetic regions.
    #[arg(long, default_value_t = 6)]
    pub sample_regions: usize,
}
