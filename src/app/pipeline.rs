//! Shared pipeline logic used by both commands.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! fetch/sample -> ingest -> aggregate -> delay search -> projection
//!
//! The commands then focus on presentation (reports vs artifacts).

use std::fs;

use crate::data;
use crate::domain::{
    DataSource, NationalSeries, PipelineConfig, RegionRecord, RegionalPivot, aggregate_national,
    pivot_regions,
};
use crate::error::AppError;
use crate::fit::{DelayScanEntry, FitResult, search_best_delay};
use crate::forecast::{ForecastTable, project};
use crate::io::ingest::parse_records;

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub records: Vec<RegionRecord>,
    pub pivot: RegionalPivot,
    pub national: NationalSeries,
    pub fit: FitResult,
    pub scan: Vec<DelayScanEntry>,
    pub forecast: ForecastTable,
}

/// Execute the full pipeline and return the computed outputs.
pub fn run(config: &PipelineConfig) -> Result<RunOutput, AppError> {
    if config.delay_min >= config.delay_max {
        return Err(AppError::new(
            2,
            format!(
                "Invalid delay range: [{}, {}) is empty.",
                config.delay_min, config.delay_max
            ),
        ));
    }

    fs::create_dir_all(&config.data_dir).map_err(|e| {
        AppError::new(4, format!("Failed to create '{}': {e}", config.data_dir.display()))
    })?;

    // 1) Observed records.
    let records = load_records(config)?;

    // 2) Aggregate into the national series and the regional pivot.
    let national = aggregate_national(&records)?;
    let pivot = pivot_regions(&records)?;

    // 3) Fit the SIR model over the delay scan range.
    let infected = national.infected();
    let recovered = national.recovered();
    let (fit, scan) =
        search_best_delay(&infected, &recovered, config.delay_min..config.delay_max)?;

    // 4) Project the fitted model past the observed window.
    let forecast = project(&national, &fit, config.horizon)?;

    Ok(RunOutput {
        records,
        pivot,
        national,
        fit,
        scan,
        forecast,
    })
}

fn load_records(config: &PipelineConfig) -> Result<Vec<RegionRecord>, AppError> {
    match config.source {
        DataSource::Sample => {
            data::generate_sample(config.sample_seed, config.sample_days, config.sample_regions)
        }
        DataSource::Cache => {
            let text = data::read_cached_source(&config.url, &config.data_dir)?;
            parse_records(&text)
        }
        DataSource::Remote => {
            let text = data::fetch_source(&config.url, &config.data_dir)?;
            parse_records(&text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sample_config(dir: &str) -> PipelineConfig {
        PipelineConfig {
            source: DataSource::Sample,
            url: String::new(),
            data_dir: PathBuf::from(dir),
            images_dir: PathBuf::from(dir),
            horizon: 10,
            delay_min: 0,
            delay_max: 1,
            sample_seed: 42,
            sample_days: 40,
            sample_regions: 3,
        }
    }

    #[test]
    fn sample_pipeline_produces_consistent_output() {
        let dir = std::env::temp_dir().join("epi-curves-pipeline-test");
        let config = sample_config(dir.to_str().unwrap());

        let out = run(&config).unwrap();
        assert_eq!(out.national.len(), 40);
        assert_eq!(out.forecast.rows.len(), 50);
        assert_eq!(out.scan.len(), 1);
        assert!(out.fit.loss.is_finite());
    }

    #[test]
    fn empty_delay_range_is_rejected() {
        let mut config = sample_config("data");
        config.delay_min = 5;
        config.delay_max = 5;
        assert_eq!(run(&config).unwrap_err().exit_code(), 2);
    }
}
