//! Terminal report formatting.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use crate::domain::{NationalSeries, PipelineConfig};
use crate::fit::{DelayScanEntry, FitResult};

/// Format the delay scan log, marking the chosen delay.
pub fn format_delay_scan(scan: &[DelayScanEntry], best_delay: i32) -> String {
    let mut out = String::new();
    out.push_str("Delay scan:\n");
    for entry in scan {
        let chosen = if entry.delay == best_delay { "*" } else { " " };
        out.push_str(&format!(
            "{chosen} delay {:>3}  loss {:.3}\n",
            entry.delay, entry.loss
        ));
    }
    out
}

/// Format the full run summary (dataset stats + fitted parameters).
pub fn format_run_summary(
    series: &NationalSeries,
    fit: &FitResult,
    config: &PipelineConfig,
) -> String {
    let mut out = String::new();

    out.push_str("=== epi - SIR curve fit ===\n");
    if let (Some(first), Some(last)) = (series.days.first(), series.days.last()) {
        out.push_str(&format!(
            "Series: {} days | {} .. {}\n",
            series.len(),
            first.date,
            last.date
        ));
        out.push_str(&format!(
            "Latest: cases={:.0} hospitalized={:.0} icu={:.0} dead={:.0}\n",
            last.cases, last.hospitalized, last.icu, last.dead
        ));
        out.push_str(&format!(
            "Latest derived: infected={:.0} recovered={:.0}\n",
            last.infected, last.recovered
        ));
    }

    out.push_str("\nFitted model:\n");
    out.push_str(&format!("- N     = {:.1}\n", fit.params.n));
    out.push_str(&format!("- beta  = {:.6}\n", fit.params.beta));
    out.push_str(&format!("- gamma = {:.6}\n", fit.params.gamma));
    out.push_str(&format!("- delay = {} days\n", fit.delay));
    out.push_str(&format!("- loss  = {:.3}\n", fit.loss));
    if fit.params.gamma != 0.0 {
        out.push_str(&format!("- R0    = {:.3}\n", fit.params.beta / fit.params.gamma));
    }
    if !fit.converged {
        out.push_str(&format!(
            "- note: optimizer hit the iteration cap ({} iterations)\n",
            fit.iterations
        ));
    }

    out.push_str(&format!("\nForecast horizon: {} days\n", config.horizon));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DataSource, NationalDay};
    use crate::model::SirParams;
    use chrono::NaiveDate;
    use std::path::PathBuf;

    fn config() -> PipelineConfig {
        PipelineConfig {
            source: DataSource::Sample,
            url: String::new(),
            data_dir: PathBuf::from("data"),
            images_dir: PathBuf::from("images"),
            horizon: 60,
            delay_min: -15,
            delay_max: 15,
            sample_seed: 42,
            sample_days: 90,
            sample_regions: 6,
        }
    }

    fn series() -> NationalSeries {
        NationalSeries {
            days: vec![NationalDay {
                date: NaiveDate::from_ymd_opt(2020, 3, 1).unwrap(),
                cases: 120.0,
                hospitalized: 40.0,
                icu: 10.0,
                dead: 3.0,
                infected: 50.0,
                recovered: 70.0,
            }],
        }
    }

    fn fit() -> FitResult {
        FitResult {
            params: SirParams {
                n: 81234.5,
                beta: 0.43,
                gamma: 0.11,
            },
            delay: -3,
            loss: 123.456,
            iterations: 400,
            converged: true,
        }
    }

    #[test]
    fn summary_contains_key_figures() {
        let text = format_run_summary(&series(), &fit(), &config());
        assert!(text.contains("N     = 81234.5"));
        assert!(text.contains("delay = -3 days"));
        assert!(text.contains("Forecast horizon: 60 days"));
        assert!(text.contains("R0"));
    }

    #[test]
    fn scan_marks_chosen_delay() {
        let scan = vec![
            DelayScanEntry { delay: -1, loss: 10.0 },
            DelayScanEntry { delay: 0, loss: 5.0 },
        ];
        let text = format_delay_scan(&scan, 0);
        assert!(text.contains("* delay   0"));
        assert!(text.contains("  delay  -1"));
    }
}
