//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - runs the shared pipeline
//! - prints the report
//! - writes chart and CSV artifacts

use std::fs;

use clap::Parser;

use crate::cli::{Command, RunArgs};
use crate::domain::{DataSource, PipelineConfig};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `epi` binary.
pub fn run() -> Result<(), AppError> {
    // `epi` with no subcommand behaves like `epi run`; clap requires a
    // subcommand name, so we rewrite argv before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = crate::cli::Cli::parse_from(argv);

    match cli.command {
        Command::Run(args) => handle_run(args, OutputMode::Full),
        Command::Fit(args) => handle_run(args, OutputMode::ReportOnly),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputMode {
    Full,
    ReportOnly,
}

fn handle_run(args: RunArgs, mode: OutputMode) -> Result<(), AppError> {
    let config = pipeline_config_from_args(&args)?;
    let out = pipeline::run(&config)?;

    println!("{}", crate::report::format_delay_scan(&out.scan, out.fit.delay));
    println!(
        "{}",
        crate::report::format_run_summary(&out.national, &out.fit, &config)
    );

    if mode == OutputMode::Full {
        fs::create_dir_all(&config.images_dir).map_err(|e| {
            AppError::new(
                4,
                format!("Failed to create '{}': {e}", config.images_dir.display()),
            )
        })?;

        let mut paths = crate::io::export::write_all(
            &config.data_dir,
            &out.pivot,
            &out.national,
            &out.forecast,
        )?;
        paths.extend(crate::plot::render_all(
            &config.images_dir,
            &out.pivot,
            &out.national,
            &out.forecast,
        )?);

        println!("Artifacts:");
        for path in paths {
            println!("- {}", path.display());
        }
    }

    Ok(())
}

fn pipeline_config_from_args(args: &RunArgs) -> Result<PipelineConfig, AppError> {
    if args.sample && args.offline {
        return Err(AppError::new(2, "--sample and --offline are mutually exclusive."));
    }
    let source = if args.sample {
        DataSource::Sample
    } else if args.offline {
        DataSource::Cache
    } else {
        DataSource::Remote
    };

    Ok(PipelineConfig {
        source,
        url: args.url.clone(),
        data_dir: args.data_dir.clone(),
        images_dir: args.images_dir.clone(),
        horizon: args.horizon,
        delay_min: args.delay_min,
        delay_max: args.delay_max,
        sample_seed: args.seed,
        sample_days: args.sample_days,
        sample_regions: args.sample_regions,
    })
}

/// Rewrite argv so `epi` defaults to `epi run`.
///
/// Rules:
/// - `epi`                     -> `epi run`
/// - `epi --sample ...`        -> `epi run --sample ...`
/// - `epi --help/--version/-h` -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("run".to_string());
        return argv;
    };

    let is_top_level_help_or_version =
        matches!(arg1.as_str(), "-h" | "--help" | "-V" | "--version" | "help");
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "run" | "fit");
    if is_subcommand {
        return argv;
    }

    argv.insert(1, "run".to_string());
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_defaults_to_run() {
        assert_eq!(rewrite_args(strings(&["epi"])), strings(&["epi", "run"]));
        assert_eq!(
            rewrite_args(strings(&["epi", "--sample"])),
            strings(&["epi", "run", "--sample"])
        );
    }

    #[test]
    fn explicit_subcommands_and_help_pass_through() {
        assert_eq!(
            rewrite_args(strings(&["epi", "fit"])),
            strings(&["epi", "fit"])
        );
        assert_eq!(
            rewrite_args(strings(&["epi", "--help"])),
            strings(&["epi", "--help"])
        );
    }

    #[test]
    fn sample_and_offline_conflict() {
        let args = RunArgs {
            url: String::new(),
            data_dir: "data".into(),
            images_dir: "images".into(),
            horizon: 60,
            delay_min: -15,
            delay_max: 15,
            offline: true,
            sample: true,
            seed: 42,
            sample_days: 90,
            sample_regions: 6,
        };
        assert_eq!(pipeline_config_from_args(&args).unwrap_err().exit_code(), 2);
    }
}
