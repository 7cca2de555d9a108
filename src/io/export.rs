//! Derived tabular exports.
//!
//! One CSV per chart family, meant to be easy to consume in spreadsheets or
//! downstream scripts. Missing observed values are left as empty cells.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::domain::{NationalSeries, RegionalPivot};
use crate::error::AppError;
use crate::forecast::ForecastTable;

fn create(path: &Path) -> Result<File, AppError> {
    File::create(path)
        .map_err(|e| AppError::new(4, format!("Failed to create export CSV '{}': {e}", path.display())))
}

fn write_line(file: &mut File, path: &Path, line: &str) -> Result<(), AppError> {
    writeln!(file, "{line}")
        .map_err(|e| AppError::new(4, format!("Failed to write export CSV '{}': {e}", path.display())))
}

fn opt_cell(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.4}")).unwrap_or_default()
}

/// Date × region pivot of cumulative cases.
pub fn write_regional_csv(path: &Path, pivot: &RegionalPivot) -> Result<(), AppError> {
    let mut file = create(path)?;

    let mut header = String::from("date");
    for region in &pivot.regions {
        header.push(',');
        header.push_str(region);
    }
    write_line(&mut file, path, &header)?;

    for (idx, date) in pivot.dates.iter().enumerate() {
        let mut line = date.to_string();
        for cell in &pivot.cases[idx] {
            line.push(',');
            line.push_str(&opt_cell(*cell));
        }
        write_line(&mut file, path, &line)?;
    }
    Ok(())
}

/// National totals per day.
pub fn write_total_csv(path: &Path, series: &NationalSeries) -> Result<(), AppError> {
    let mut file = create(path)?;
    write_line(&mut file, path, "date,cases,hospitalized,icu,dead")?;
    for day in &series.days {
        write_line(
            &mut file,
            path,
            &format!(
                "{},{:.4},{:.4},{:.4},{:.4}",
                day.date, day.cases, day.hospitalized, day.icu, day.dead
            ),
        )?;
    }
    Ok(())
}

/// Death percentage per day.
pub fn write_dead_pct_csv(path: &Path, series: &NationalSeries) -> Result<(), AppError> {
    let mut file = create(path)?;
    write_line(&mut file, path, "date,dead_pct")?;
    for (date, pct) in series.dead_pct() {
        write_line(&mut file, path, &format!("{date},{pct:.4}"))?;
    }
    Ok(())
}

/// Combined observed/simulated SIR table, including the forecast horizon.
pub fn write_sir_csv(path: &Path, table: &ForecastTable) -> Result<(), AppError> {
    let mut file = create(path)?;
    write_line(
        &mut file,
        path,
        "date,sim_s,sim_i,sim_r,susceptible,infected,recovered",
    )?;
    for row in &table.rows {
        write_line(
            &mut file,
            path,
            &format!(
                "{},{:.4},{:.4},{:.4},{},{},{}",
                row.date,
                row.sim_s,
                row.sim_i,
                row.sim_r,
                opt_cell(row.obs_susceptible),
                opt_cell(row.obs_infected),
                opt_cell(row.obs_recovered),
            ),
        )?;
    }
    Ok(())
}

/// Observed cumulative cases next to the model's case forecast.
pub fn write_cases_csv(path: &Path, table: &ForecastTable) -> Result<(), AppError> {
    let mut file = create(path)?;
    write_line(&mut file, path, "date,forecast,cases")?;
    for row in &table.rows {
        write_line(
            &mut file,
            path,
            &format!(
                "{},{:.4},{}",
                row.date,
                row.forecast_cases(),
                opt_cell(row.obs_cases()),
            ),
        )?;
    }
    Ok(())
}

/// Write all five exports into `data_dir` and return the paths.
pub fn write_all(
    data_dir: &Path,
    pivot: &RegionalPivot,
    series: &NationalSeries,
    table: &ForecastTable,
) -> Result<Vec<PathBuf>, AppError> {
    let regional = data_dir.join("regions.csv");
    let total = data_dir.join("total.csv");
    let dead_pct = data_dir.join("dead-pct.csv");
    let sir = data_dir.join("sir.csv");
    let cases = data_dir.join("cases.csv");

    write_regional_csv(&regional, pivot)?;
    write_total_csv(&total, series)?;
    write_dead_pct_csv(&dead_pct, series)?;
    write_sir_csv(&sir, table)?;
    write_cases_csv(&cases, table)?;

    Ok(vec![regional, total, dead_pct, sir, cases])
}
