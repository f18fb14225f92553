/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

use std::path::{Path, PathBuf};
use std::process;

use anyhow::Result;
use chrono::Local;
use clap::Parser;
use tracing::{error, info, warn};

use jobsched::config::RunConfig;
use jobsched::instance::load_instance;
use jobsched::output::{append_summary, render_text, write_results, SummaryRecord};
use jobsched::schedule::Schedule;
use jobsched::scheduler::{Algorithm, JobScheduler};

// ── CLI argument definition ───────────────────────────────────────────────────

/// Preemptive job scheduling with rejection.
///
/// Example:
///   jobsched -a all -c run.yaml test/test1.txt test/test2.txt
#[derive(Debug, Parser)]
#[command(
    name = "jobsched",
    about = "Discrete-time preemptive job scheduling with rejection",
    long_about = None,
)]
struct Cli {
    /// Instance files (first line n, then n lines of r,d,p,w,l).
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Algorithm to run, or `all` for every algorithm.
    #[arg(
        short = 'a',
        long = "algorithm",
        default_value = "all",
        value_parser = [
            "greedy",
            "exact",
            "online_static",
            "online_highscore",
            "online_dynscore",
            "all",
        ],
    )]
    algorithm: String,

    /// Path to the YAML run configuration file.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Directory for `<label>.txt` result files (overrides the config).
    #[arg(short = 'o', long = "results-dir")]
    results_dir: Option<PathBuf>,

    /// CSV summary log to append to (overrides the config).
    #[arg(short = 'l', long = "summary-log")]
    summary_log: Option<PathBuf>,

    /// Print results only; write no files.
    #[arg(long = "no-write", default_value_t = false)]
    no_write: bool,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // Level is controlled by the RUST_LOG env-var (e.g. RUST_LOG=debug).
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    info!(
        inputs    = cli.inputs.len(),
        algorithm = %cli.algorithm,
        config    = ?cli.config,
        no_write  = cli.no_write,
        "Configuration"
    );

    // ── Load run configuration ────────────────────────────────────────────────
    let mut config = match &cli.config {
        Some(path) => match RunConfig::load_from_file(path) {
            Ok(config) => config,
            Err(e) => {
                error!("Failed to load run configuration: {:#}", e);
                process::exit(1);
            }
        },
        None => {
            warn!("No run configuration file provided, using default settings");
            RunConfig::default()
        }
    };
    if let Some(dir) = &cli.results_dir {
        config.output.results_dir = dir.clone();
    }
    if let Some(log) = &cli.summary_log {
        config.output.summary_log = log.clone();
    }

    let algorithms: Vec<Algorithm> = if cli.algorithm == "all" {
        Algorithm::ALL.to_vec()
    } else {
        match cli.algorithm.parse() {
            Ok(a) => vec![a],
            Err(e) => {
                error!("{}", e);
                process::exit(2);
            }
        }
    };

    // ── Run every input under every selected algorithm ────────────────────────
    let scheduler = JobScheduler::new(config.dynamic_score);
    let mut failures = 0usize;
    for input in &cli.inputs {
        failures += run_input(input, &algorithms, &scheduler, &config, !cli.no_write);
    }

    if failures > 0 {
        error!(failures, "Finished with failures");
        process::exit(1);
    }
    info!(inputs = cli.inputs.len(), "All runs finished");
}

// ── Per-input driver ──────────────────────────────────────────────────────────

/// Run one instance file; returns the number of failed steps.
fn run_input(
    input: &Path,
    algorithms: &[Algorithm],
    scheduler: &JobScheduler,
    config: &RunConfig,
    persist_results: bool,
) -> usize {
    let jobs = match load_instance(input) {
        Ok(jobs) => jobs,
        Err(e) => {
            error!("Failed to load instance: {:#}", e);
            return 1;
        }
    };

    let case = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| String::from("instance"));

    let mut failures = 0;
    let mut profits: Vec<(Algorithm, i64)> = Vec::with_capacity(algorithms.len());

    for &algorithm in algorithms {
        let label = format!("{}{}", case, algorithm.label_suffix());

        let schedule = match scheduler.schedule(&jobs, algorithm) {
            Ok(schedule) => schedule,
            Err(e) => {
                error!(label = %label, "✗ {}", e);
                failures += 1;
                continue;
            }
        };

        println!("== {label} ==");
        print!("{}", render_text(&schedule));

        check_reference(config, &label, schedule.total_profit);

        if persist_results {
            if let Err(e) = persist(config, &label, &schedule) {
                error!(label = %label, "Failed to persist results: {:#}", e);
                failures += 1;
            }
        }
        profits.push((algorithm, schedule.total_profit));
    }

    if algorithms.len() > 1 {
        log_gaps_to_optimum(&case, &profits);
    }
    failures
}

fn persist(config: &RunConfig, label: &str, schedule: &Schedule) -> Result<()> {
    let path = write_results(&config.output.results_dir, label, schedule)?;
    info!(label, path = %path.display(), "Results written");

    let record = SummaryRecord::new(label, schedule, Local::now().naive_local());
    append_summary(&config.output.summary_log, &record)
}

fn check_reference(config: &RunConfig, label: &str, profit: i64) {
    let Some(reference) = config.reference_profit(label) else {
        return;
    };
    if profit == reference {
        info!(label, profit, reference, "✓ matches reference profit");
    } else {
        warn!(
            label,
            profit,
            reference,
            diff = profit - reference,
            "✗ differs from reference profit"
        );
    }
}

fn log_gaps_to_optimum(case: &str, profits: &[(Algorithm, i64)]) {
    let Some(&(_, optimum)) = profits.iter().find(|(a, _)| *a == Algorithm::Exact) else {
        return;
    };
    for &(algorithm, profit) in profits.iter().filter(|(a, _)| *a != Algorithm::Exact) {
        let gap = optimum - profit;
        let online = algorithm.is_online();
        if gap < 0 {
            error!(case, algorithm = %algorithm, online, profit, optimum, "heuristic beat the exact optimum");
        } else {
            info!(case, algorithm = %algorithm, online, profit, optimum, gap, "gap to optimum");
        }
    }
}
