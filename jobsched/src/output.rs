/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Persisting schedules.
//!
//! Two sinks:
//!
//! | Sink | Format | Written by |
//! |---|---|---|
//! | `<results_dir>/<label>.txt` | one line per job (slots or `null`), then the profit | [`write_results`] |
//! | summary log | CSV `date,time,test_case,total_profit,job_details`, appended | [`append_summary`] |
//!
//! A job lists every slot it ran in.  An online job that missed its deadline
//! lists the ticks it did execute while still paying its penalty; a job that
//! never ran is `null`.

use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use itertools::Itertools;
use serde::Serialize;
use tracing::{debug, info};

use crate::schedule::{Schedule, ScheduledJob};

const NULL_SLOTS: &str = "null";

fn slot_list(sj: &ScheduledJob) -> String {
    match sj.occupied_slots() {
        [] => NULL_SLOTS.to_string(),
        slots => slots.iter().join(","),
    }
}

// ── Result text ───────────────────────────────────────────────────────────────

/// Render `schedule` in the result-file format.  Every line ends in `\n`.
pub fn render_text(schedule: &Schedule) -> String {
    let mut out = String::new();
    for sj in &schedule.jobs {
        out.push_str(&slot_list(sj));
        out.push('\n');
    }
    out.push_str(&schedule.total_profit.to_string());
    out.push('\n');
    out
}

/// Write `schedule` to `<dir>/<label>.txt`, creating `dir` if needed and
/// replacing any previous file.
pub fn write_results(dir: &Path, label: &str, schedule: &Schedule) -> Result<PathBuf> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Cannot create results directory: {}", dir.display()))?;

    let path = dir.join(format!("{label}.txt"));
    std::fs::write(&path, render_text(schedule))
        .with_context(|| format!("Cannot write results file: {}", path.display()))?;

    debug!(label, path = %path.display(), "results written");
    Ok(path)
}

// ── Summary log ───────────────────────────────────────────────────────────────

/// `id:<id> r:<r> d:<d> p:<p> w:<w> l:<l> slots:<list|null>` per job,
/// ascending id, joined with ` | `.
pub fn job_details(schedule: &Schedule) -> String {
    schedule
        .jobs
        .iter()
        .map(|sj| {
            let j = &sj.job;
            format!(
                "id:{} r:{} d:{} p:{} w:{} l:{} slots:{}",
                j.id,
                j.release,
                j.deadline,
                j.processing,
                j.reward,
                j.penalty,
                slot_list(sj)
            )
        })
        .join(" | ")
}

/// One row of the summary log.  Field order is the column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryRecord {
    pub date: String,
    pub time: String,
    pub test_case: String,
    pub total_profit: i64,
    pub job_details: String,
}

impl SummaryRecord {
    pub fn new(test_case: &str, schedule: &Schedule, at: NaiveDateTime) -> Self {
        Self {
            date: at.format("%Y-%m-%d").to_string(),
            time: at.format("%H:%M:%S").to_string(),
            test_case: test_case.to_string(),
            total_profit: schedule.total_profit,
            job_details: job_details(schedule),
        }
    }
}

/// Append `record` to the CSV log at `path`.  The header row is written only
/// when the file does not exist yet (or is empty).
pub fn append_summary(path: &Path, record: &SummaryRecord) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create directory: {}", parent.display()))?;
    }

    let is_new = std::fs::metadata(path).map(|m| m.len() == 0).unwrap_or(true);

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Cannot open summary log: {}", path.display()))?;

    let mut writer = csv::WriterBuilder::new()
        .has_headers(is_new)
        .from_writer(file);
    writer
        .serialize(record)
        .with_context(|| format!("Cannot append to summary log: {}", path.display()))?;
    writer
        .flush()
        .with_context(|| format!("Cannot flush summary log: {}", path.display()))?;

    info!(
        test_case = %record.test_case,
        total_profit = record.total_profit,
        log = %path.display(),
        "summary appended"
    );
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
