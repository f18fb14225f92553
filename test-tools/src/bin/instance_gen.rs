/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Random instance generator.
//!
//! Writes `count` files `instance_0001.txt`, `instance_0002.txt`, … into
//! `--out-dir`.  Per job: `r` in `[min_release, max_release]`, `p` in
//! `[1, max_processing]`, `d` in `[r + p, r + p + max_slack]`, `w` and `l` in
//! their own ranges.  The same `--seed` always produces the same files.

use std::path::PathBuf;
use std::process;

use anyhow::{anyhow, ensure, Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, error, info};

use jobsched::instance::to_instance_text;
use jobsched::job::{Job, JobId};

// ── CLI argument definition ───────────────────────────────────────────────────

#[derive(Debug, Parser)]
#[command(name = "instance-gen", about = "Random job-scheduling instance generator")]
struct Cli {
    /// Number of instance files to write.
    #[arg(short = 'n', long, default_value_t = 1000)]
    count: u32,

    /// Output directory (created if missing).
    #[arg(short = 'o', long, default_value = "job_scheduling_instances")]
    out_dir: PathBuf,

    /// RNG seed; omit for a random one.
    #[arg(short = 's', long)]
    seed: Option<u64>,

    #[arg(long, default_value_t = 2)]
    min_jobs: u32,
    #[arg(long, default_value_t = 19)]
    max_jobs: u32,

    #[arg(long, default_value_t = 1)]
    min_release: i64,
    #[arg(long, default_value_t = 90)]
    max_release: i64,

    #[arg(long, default_value_t = 10)]
    max_processing: i64,

    /// Upper bound of `d - (r + p)`.
    #[arg(long, default_value_t = 20)]
    max_slack: i64,

    #[arg(long, default_value_t = 10)]
    min_reward: i64,
    #[arg(long, default_value_t = 100)]
    max_reward: i64,

    #[arg(long, default_value_t = 5)]
    min_penalty: i64,
    #[arg(long, default_value_t = 50)]
    max_penalty: i64,
}

impl Cli {
    fn check(&self) -> Result<()> {
        ensure!(self.min_jobs <= self.max_jobs, "--min-jobs exceeds --max-jobs");
        ensure!(
            0 <= self.min_release && self.min_release <= self.max_release,
            "release range must satisfy 0 <= min <= max"
        );
        ensure!(self.max_processing >= 1, "--max-processing must be at least 1");
        ensure!(self.max_slack >= 0, "--max-slack must not be negative");
        ensure!(self.min_reward <= self.max_reward, "--min-reward exceeds --max-reward");
        ensure!(self.min_penalty <= self.max_penalty, "--min-penalty exceeds --max-penalty");
        Ok(())
    }

    fn random_instance(&self, rng: &mut StdRng) -> Result<Vec<Job>> {
        let n = rng.random_range(self.min_jobs..=self.max_jobs);
        (1..=n)
            .map(|id: JobId| {
                let r = rng.random_range(self.min_release..=self.max_release);
                let p = rng.random_range(1..=self.max_processing);
                let d = rng.random_range(r + p..=r + p + self.max_slack);
                let w = rng.random_range(self.min_reward..=self.max_reward);
                let l = rng.random_range(self.min_penalty..=self.max_penalty);
                Job::new(id, r, d, p, w, l)
                    .map_err(|reason| anyhow!("generated job {id} is invalid: {reason}"))
            })
            .collect()
    }
}

fn run(cli: &Cli) -> Result<()> {
    cli.check()?;

    let seed = cli.seed.unwrap_or_else(|| rand::rng().random());
    info!(seed, count = cli.count, out_dir = %cli.out_dir.display(), "Generating instances");
    let mut rng = StdRng::seed_from_u64(seed);

    std::fs::create_dir_all(&cli.out_dir)
        .with_context(|| format!("Cannot create output directory: {}", cli.out_dir.display()))?;

    for i in 1..=cli.count {
        let jobs = cli.random_instance(&mut rng)?;
        let path = cli.out_dir.join(format!("instance_{i:04}.txt"));
        std::fs::write(&path, to_instance_text(&jobs))
            .with_context(|| format!("Cannot write instance file: {}", path.display()))?;
        debug!(path = %path.display(), jobs = jobs.len(), "instance written");
    }

    info!(count = cli.count, seed, "All instances generated");
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        error!("{:#}", e);
        process::exit(1);
    }
}
