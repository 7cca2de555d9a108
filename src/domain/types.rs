//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - used in-memory during fitting
//! - exported to CSV
//! - reloaded later for plotting or comparisons

use std::path::PathBuf;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One raw row of the source table: a single region on a single day.
///
/// All counts are cumulative except `hospitalized` and `icu`, which are
/// point-in-time occupancy figures. Missing values in the source are zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionRecord {
    pub region: String,
    pub date: NaiveDate,
    pub cases: f64,
    pub hospitalized: f64,
    pub icu: f64,
    pub dead: f64,
}

/// One day of the aggregated national series, with derived compartments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalDay {
    pub date: NaiveDate,
    pub cases: f64,
    pub hospitalized: f64,
    pub icu: f64,
    pub dead: f64,
    /// Currently infected: `hospitalized + icu`.
    pub infected: f64,
    /// Recovered proxy: `cases - infected`.
    pub recovered: f64,
}

/// Date-indexed national series, ascending with one row per source day.
///
/// The fitter indexes this series by position, not by date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NationalSeries {
    pub days: Vec<NationalDay>,
}

impl NationalSeries {
    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    pub fn start_date(&self) -> Option<NaiveDate> {
        self.days.first().map(|d| d.date)
    }

    pub fn infected(&self) -> Vec<f64> {
        self.days.iter().map(|d| d.infected).collect()
    }

    pub fn recovered(&self) -> Vec<f64> {
        self.days.iter().map(|d| d.recovered).collect()
    }

    /// Death percentage per day: `100 * dead / cases` (0 when no cases yet).
    pub fn dead_pct(&self) -> Vec<(NaiveDate, f64)> {
        self.days
            .iter()
            .map(|d| {
                let pct = if d.cases > 0.0 {
                    100.0 * d.dead / d.cases
                } else {
                    0.0
                };
                (d.date, pct)
            })
            .collect()
    }
}

/// Date × region pivot of cumulative cases.
///
/// Cells are `None` where the source has no row for that region/day pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalPivot {
    pub dates: Vec<NaiveDate>,
    pub regions: Vec<String>,
    /// Row-major: `cases[date_idx][region_idx]`.
    pub cases: Vec<Vec<Option<f64>>>,
}

/// Where the observed records come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    /// Fetch from the remote URL (cache the decoded body).
    Remote,
    /// Reuse the cached download without touching the network.
    Cache,
    /// Generate a seeded synthetic epidemic (no network, deterministic).
    Sample,
}

/// Resolved settings for one pipeline run. No globals: every stage takes
/// what it needs from here or from a previous stage's output.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub source: DataSource,
    pub url: String,
    pub data_dir: PathBuf,
    pub images_dir: PathBuf,
    /// Forecast horizon in days.
    pub horizon: usize,
    /// Delay scan range: `delay_min` inclusive, `delay_max` exclusive.
    pub delay_min: i32,
    pub delay_max: i32,
    /// Sample generator settings (only used with `DataSource::Sample`).
    pub sample_seed: u64,
    pub sample_days: usize,
    pub sample_regions: usize,
}
