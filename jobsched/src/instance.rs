/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Flat-file problem instances.
//!
//! ```text
//! 3            ← job count n
//! 0,4,2,10,5   ← r,d,p,w,l for job 1
//! 1,1,1,7,3    ← job 2
//! 2,9,3,20,8   ← job 3
//! ```
//!
//! Ids are the 1-based position of the line.  Whitespace around fields is
//! ignored, and so are trailing blank lines.  Anything else that does not fit
//! the layout is an [`InstanceError`]; no defaults are ever substituted.

use std::fmt::Write as _;
use std::path::Path;

use anyhow::{Context, Result};
use thiserror::Error;
use tracing::{debug, info};

use crate::job::{InvalidJobReason, Job, JobId};

const FIELD_NAMES: [&str; 5] = ["r", "d", "p", "w", "l"];

/// Malformed instance text.  `line` is 1-based.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InstanceError {
    #[error("instance is empty")]
    Empty,

    #[error("line {line}: job count '{value}' is not a non-negative integer")]
    BadJobCount { line: usize, value: String },

    #[error("line {line}: expected 5 comma-separated fields (r,d,p,w,l), found {found}")]
    FieldCount { line: usize, found: usize },

    #[error("line {line}: field '{field}' = '{value}' is not an integer")]
    NotInteger {
        line: usize,
        field: &'static str,
        value: String,
    },

    #[error("line {line}: {reason}")]
    InvalidJob { line: usize, reason: InvalidJobReason },

    #[error("job count says {declared} but {found} job line(s) follow")]
    CountMismatch { declared: usize, found: usize },
}

/// Parse instance text into jobs in input order.
pub fn parse_instance(text: &str) -> Result<Vec<Job>, InstanceError> {
    let mut lines: Vec<&str> = text.lines().map(str::trim).collect();
    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let Some((header, body)) = lines.split_first() else {
        return Err(InstanceError::Empty);
    };

    let declared: usize = header.parse().map_err(|_| InstanceError::BadJobCount {
        line: 1,
        value: header.to_string(),
    })?;

    if body.len() != declared {
        return Err(InstanceError::CountMismatch {
            declared,
            found: body.len(),
        });
    }

    body.iter()
        .enumerate()
        .map(|(i, raw)| parse_job_line(i as JobId + 1, i + 2, raw))
        .collect()
}

fn parse_job_line(id: JobId, line: usize, raw: &str) -> Result<Job, InstanceError> {
    let fields: Vec<&str> = raw.split(',').map(str::trim).collect();
    if fields.len() != FIELD_NAMES.len() {
        return Err(InstanceError::FieldCount {
            line,
            found: fields.len(),
        });
    }

    let mut values = [0i64; 5];
    for ((slot, field), value) in values.iter_mut().zip(FIELD_NAMES).zip(&fields) {
        *slot = value.parse().map_err(|_| InstanceError::NotInteger {
            line,
            field,
            value: value.to_string(),
        })?;
    }

    let [r, d, p, w, l] = values;
    Job::new(id, r, d, p, w, l).map_err(|reason| InstanceError::InvalidJob { line, reason })
}

/// Read and parse the instance file at `path`.
///
/// # Errors
/// I/O failures and every [`InstanceError`], with the path attached.
pub fn load_instance(path: &Path) -> Result<Vec<Job>> {
    info!("Loading instance from: {}", path.display());

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot open instance file: {}", path.display()))?;

    let jobs = parse_instance(&content)
        .with_context(|| format!("Invalid instance file: {}", path.display()))?;

    for job in &jobs {
        debug!(
            "  Job {}: r={} d={} p={} w={} l={}",
            job.id, job.release, job.deadline, job.processing, job.reward, job.penalty
        );
    }
    info!("Loaded {} job(s)", jobs.len());
    Ok(jobs)
}

/// Render `jobs` back into instance text.  Ids are not written; they are
/// implied by line order.
pub fn to_instance_text(jobs: &[Job]) -> String {
    let mut out = jobs.len().to_string();
    for j in jobs {
        // writing to a String cannot fail
        let _ = write!(
            out,
            "\n{},{},{},{},{}",
            j.release, j.deadline, j.processing, j.reward, j.penalty
        );
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
