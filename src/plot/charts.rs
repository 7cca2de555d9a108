//! Plotters-based chart files.
//!
//! All five chart families funnel through one backend-generic draw routine
//! so the PNG and SVG variants of a chart are guaranteed to show the same
//! data. Observed curves are solid; simulated curves are dashed.

use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use plotters::coord::Shift;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;

use crate::domain::{NationalSeries, RegionalPivot};
use crate::error::AppError;
use crate::forecast::ForecastTable;

const CHART_SIZE: (u32, u32) = (1200, 900);

/// One named line on a chart.
#[derive(Debug, Clone)]
pub struct ChartSeries {
    pub label: String,
    pub points: Vec<(NaiveDate, f64)>,
    /// Palette index; observed/simulated pairs share one.
    pub color: usize,
    pub dashed: bool,
}

impl ChartSeries {
    fn solid(label: impl Into<String>, color: usize, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
            color,
            dashed: false,
        }
    }

    fn dashed(label: impl Into<String>, color: usize, points: Vec<(NaiveDate, f64)>) -> Self {
        Self {
            label: label.into(),
            points,
            color,
            dashed: true,
        }
    }
}

/// Date and value extents over every point of every series.
fn extents(series: &[ChartSeries]) -> Option<(NaiveDate, NaiveDate, f64, f64)> {
    let mut dates: Option<(NaiveDate, NaiveDate)> = None;
    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;

    for s in series {
        for &(date, value) in &s.points {
            if !value.is_finite() {
                continue;
            }
            dates = Some(match dates {
                None => (date, date),
                Some((lo, hi)) => (lo.min(date), hi.max(date)),
            });
            y_min = y_min.min(value);
            y_max = y_max.max(value);
        }
    }

    let (lo, hi) = dates?;
    if !(y_min.is_finite() && y_max.is_finite()) {
        return None;
    }
    // Keep zero in view and leave headroom above the top curve.
    let y_lo = y_min.min(0.0);
    let mut y_hi = y_max * 1.05;
    if y_hi <= y_lo {
        y_hi = y_lo + 1.0;
    }
    Some((lo, hi, y_lo, y_hi))
}

fn draw<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    title: &str,
    series: &[ChartSeries],
) -> Result<(), AppError> {
    let chart_err = |e: DrawingAreaErrorKind<DB::ErrorType>| {
        AppError::new(4, format!("Chart rendering failed for '{title}': {e}"))
    };

    let Some((x_lo, x_hi, y_lo, y_hi)) = extents(series) else {
        return Err(AppError::new(3, format!("No data to plot for '{title}'.")));
    };

    root.fill(&WHITE).map_err(chart_err)?;

    let mut chart = ChartBuilder::on(root)
        .caption(title, ("sans-serif", 28))
        .margin(16)
        .x_label_area_size(48)
        .y_label_area_size(72)
        .build_cartesian_2d(x_lo..x_hi, y_lo..y_hi)
        .map_err(chart_err)?;

    chart
        .configure_mesh()
        .x_label_formatter(&|d: &NaiveDate| d.format("%d/%m").to_string())
        .draw()
        .map_err(chart_err)?;

    for s in series {
        let color = Palette99::pick(s.color);
        let style = color.stroke_width(2);
        if s.dashed {
            chart
                .draw_series(DashedLineSeries::new(s.points.iter().copied(), 6, 4, style))
                .map_err(chart_err)?
                .label(s.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], style));
        } else {
            chart
                .draw_series(LineSeries::new(s.points.iter().copied(), style))
                .map_err(chart_err)?
                .label(s.label.clone())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 18, y)], style));
        }
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.85))
        .border_style(&BLACK)
        .draw()
        .map_err(chart_err)?;

    root.present().map_err(chart_err)?;
    Ok(())
}

/// Render one chart family to `<stem>.png` and `<stem>.svg`.
pub fn render_chart(
    images_dir: &Path,
    stem: &str,
    title: &str,
    series: &[ChartSeries],
) -> Result<Vec<PathBuf>, AppError> {
    let png = images_dir.join(format!("{stem}.png"));
    let svg = images_dir.join(format!("{stem}.svg"));

    {
        let root = BitMapBackend::new(&png, CHART_SIZE).into_drawing_area();
        draw(&root, title, series)?;
    }
    {
        let root = SVGBackend::new(&svg, CHART_SIZE).into_drawing_area();
        draw(&root, title, series)?;
    }

    Ok(vec![png, svg])
}

/// Regional cumulative case curves, one line per region.
pub fn regional_chart(images_dir: &Path, pivot: &RegionalPivot) -> Result<Vec<PathBuf>, AppError> {
    let series: Vec<ChartSeries> = pivot
        .regions
        .iter()
        .enumerate()
        .map(|(ri, region)| {
            let points = pivot
                .dates
                .iter()
                .enumerate()
                .filter_map(|(di, date)| pivot.cases[di][ri].map(|v| (*date, v)))
                .collect();
            ChartSeries::solid(region.clone(), ri, points)
        })
        .collect();
    render_chart(images_dir, "regions", "Cases by region", &series)
}

/// National totals: cases, hospitalized, ICU, dead.
pub fn totals_chart(images_dir: &Path, national: &NationalSeries) -> Result<Vec<PathBuf>, AppError> {
    let pick = |f: fn(&crate::domain::NationalDay) -> f64| -> Vec<(NaiveDate, f64)> {
        national.days.iter().map(|d| (d.date, f(d))).collect()
    };
    let series = vec![
        ChartSeries::solid("cases", 0, pick(|d| d.cases)),
        ChartSeries::solid("hospitalized", 1, pick(|d| d.hospitalized)),
        ChartSeries::solid("icu", 2, pick(|d| d.icu)),
        ChartSeries::solid("dead", 3, pick(|d| d.dead)),
    ];
    render_chart(images_dir, "totals", "National totals", &series)
}

/// Death percentage of cumulative cases.
pub fn dead_pct_chart(images_dir: &Path, national: &NationalSeries) -> Result<Vec<PathBuf>, AppError> {
    let series = vec![ChartSeries::solid("% dead", 3, national.dead_pct())];
    render_chart(images_dir, "dead-pct", "% dead of cumulative cases", &series)
}

/// Observed vs simulated compartments over the full horizon.
pub fn sir_chart(images_dir: &Path, table: &ForecastTable) -> Result<Vec<PathBuf>, AppError> {
    let observed = |f: fn(&crate::forecast::ForecastRow) -> Option<f64>| -> Vec<(NaiveDate, f64)> {
        table
            .rows
            .iter()
            .filter_map(|r| f(r).map(|v| (r.date, v)))
            .collect()
    };
    let simulated = |f: fn(&crate::forecast::ForecastRow) -> f64| -> Vec<(NaiveDate, f64)> {
        table.rows.iter().map(|r| (r.date, f(r))).collect()
    };

    let series = vec![
        ChartSeries::solid("susceptible", 0, observed(|r| r.obs_susceptible)),
        ChartSeries::solid("infected", 1, observed(|r| r.obs_infected)),
        ChartSeries::solid("recovered", 2, observed(|r| r.obs_recovered)),
        ChartSeries::dashed("S (model)", 0, simulated(|r| r.sim_s)),
        ChartSeries::dashed("I (model)", 1, simulated(|r| r.sim_i)),
        ChartSeries::dashed("R (model)", 2, simulated(|r| r.sim_r)),
    ];
    render_chart(images_dir, "sir", "SIR model", &series)
}

/// Observed cumulative cases against the model forecast.
pub fn cases_chart(images_dir: &Path, table: &ForecastTable) -> Result<Vec<PathBuf>, AppError> {
    let observed: Vec<(NaiveDate, f64)> = table
        .rows
        .iter()
        .filter_map(|r| r.obs_cases().map(|v| (r.date, v)))
        .collect();
    let forecast: Vec<(NaiveDate, f64)> = table
        .rows
        .iter()
        .map(|r| (r.date, r.forecast_cases()))
        .collect();

    let series = vec![
        ChartSeries::solid("cases", 0, observed),
        ChartSeries::dashed("forecast", 1, forecast),
    ];
    render_chart(images_dir, "sir-cases", "SIR case forecast", &series)
}

/// Render every chart family; returns all written paths.
pub fn render_all(
    images_dir: &Path,
    pivot: &RegionalPivot,
    national: &NationalSeries,
    table: &ForecastTable,
) -> Result<Vec<PathBuf>, AppError> {
    let mut paths = Vec::new();
    paths.extend(regional_chart(images_dir, pivot)?);
    paths.extend(totals_chart(images_dir, national)?);
    paths.extend(dead_pct_chart(images_dir, national)?);
    paths.extend(sir_chart(images_dir, table)?);
    paths.extend(cases_chart(images_dir, table)?);
    Ok(paths)
}
