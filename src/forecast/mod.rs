//! Forward projection of the fitted model.
//!
//! Re-runs the simulator past the observed window and aligns the result
//! with the observed series, producing one combined table for the SIR
//! comparison chart, the case-forecast chart and their CSV exports.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::NationalSeries;
use crate::error::AppError;
use crate::fit::FitResult;
use crate::fit::loss::window_offset;
use crate::model::simulate;

/// One calendar day of the combined observed/simulated table.
///
/// Observed columns are `None` past the end of the observed series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRow {
    pub date: NaiveDate,
    /// Observed susceptible proxy: fitted `N` minus observed infected.
    pub obs_susceptible: Option<f64>,
    pub obs_infected: Option<f64>,
    pub obs_recovered: Option<f64>,
    pub sim_s: f64,
    pub sim_i: f64,
    pub sim_r: f64,
}

impl ForecastRow {
    /// Observed cumulative cases: `infected + recovered`.
    pub fn obs_cases(&self) -> Option<f64> {
        match (self.obs_infected, self.obs_recovered) {
            (Some(i), Some(r)) => Some(i + r),
            _ => None,
        }
    }

    /// Forecast cumulative cases: `I + R` from the model.
    pub fn forecast_cases(&self) -> f64 {
        self.sim_i + self.sim_r
    }
}

/// Combined observed + simulated table, `observed_days + horizon` rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastTable {
    pub rows: Vec<ForecastRow>,
    pub observed_days: usize,
    pub horizon: usize,
}

/// Run the fitted model `horizon` days past the observed window, applying
/// the same delay window as the loss function.
pub fn project(
    series: &NationalSeries,
    fit: &FitResult,
    horizon: usize,
) -> Result<ForecastTable, AppError> {
    let days = series.len();
    let start = series
        .start_date()
        .ok_or_else(|| AppError::new(3, "Cannot project from an empty series."))?;

    let span = days + horizon;
    let pad = 2 * fit.delay.unsigned_abs() as usize;
    let trace = simulate(&fit.params, span + pad);
    let lim = window_offset(fit.delay);

    let mut rows = Vec::with_capacity(span);
    for idx in 0..span {
        let observed = series.days.get(idx);
        rows.push(ForecastRow {
            date: start + Duration::days(idx as i64),
            obs_susceptible: observed.map(|d| fit.params.n - d.infected),
            obs_infected: observed.map(|d| d.infected),
            obs_recovered: observed.map(|d| d.recovered),
            sim_s: trace.s[lim + idx],
            sim_i: trace.i[lim + idx],
            sim_r: trace.r[lim + idx],
        });
    }

    Ok(ForecastTable {
        rows,
        observed_days: days,
        horizon,
    })
}
