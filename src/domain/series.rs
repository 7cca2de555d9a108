//! Aggregation of raw per-region records into the national series and the
//! regional pivot.
//!
//! Design goals:
//! - **Deterministic ordering**: dates ascend, regions are sorted by name.
//! - **Position-indexable output**: the fitter addresses the national series
//!   by row index, so the series must have exactly one row per source day.
//! - **Separation of concerns**: no fitting logic here.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::domain::{NationalDay, NationalSeries, RegionRecord, RegionalPivot};
use crate::error::AppError;

/// Sum all regions into one national row per day and derive the infected and
/// recovered compartments.
pub fn aggregate_national(records: &[RegionRecord]) -> Result<NationalSeries, AppError> {
    if records.is_empty() {
        return Err(AppError::new(3, "No records to aggregate."));
    }

    #[derive(Default)]
    struct Acc {
        cases: f64,
        hospitalized: f64,
        icu: f64,
        dead: f64,
    }

    let mut by_date: BTreeMap<NaiveDate, Acc> = BTreeMap::new();
    for rec in records {
        let acc = by_date.entry(rec.date).or_default();
        acc.cases += rec.cases;
        acc.hospitalized += rec.hospitalized;
        acc.icu += rec.icu;
        acc.dead += rec.dead;
    }

    let days = by_date
        .into_iter()
        .map(|(date, acc)| {
            let infected = acc.hospitalized + acc.icu;
            let recovered = acc.cases - infected;
            NationalDay {
                date,
                cases: acc.cases,
                hospitalized: acc.hospitalized,
                icu: acc.icu,
                dead: acc.dead,
                infected,
                recovered,
            }
        })
        .collect();

    Ok(NationalSeries { days })
}

/// Pivot cumulative cases into a date × region table.
///
/// Cells stay `None` where a region has no row for a given day, so plots can
/// leave gaps instead of inventing zeros.
pub fn pivot_regions(records: &[RegionRecord]) -> Result<RegionalPivot, AppError> {
    if records.is_empty() {
        return Err(AppError::new(3, "No records to pivot."));
    }

    let mut dates: Vec<NaiveDate> = records.iter().map(|r| r.date).collect();
    dates.sort();
    dates.dedup();

    let mut regions: Vec<String> = records.iter().map(|r| r.region.clone()).collect();
    regions.sort();
    regions.dedup();

    let date_idx: BTreeMap<NaiveDate, usize> =
        dates.iter().enumerate().map(|(i, d)| (*d, i)).collect();
    let region_idx: BTreeMap<&str, usize> = regions
        .iter()
        .enumerate()
        .map(|(i, r)| (r.as_str(), i))
        .collect();

    let mut cases = vec![vec![None; regions.len()]; dates.len()];
    for rec in records {
        let di = date_idx[&rec.date];
        let ri = region_idx[rec.region.as_str()];
        cases[di][ri] = Some(rec.cases);
    }

    Ok(RegionalPivot {
        dates,
        regions,
        cases,
    })
}
