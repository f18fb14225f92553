/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Tick-driven online simulator.
//!
//! All job parameters are known up front; only the decision process is
//! causal.  Per job:
//!
//! ```text
//! Unseen ──(infeasible)──► Rejected        penalty charged at intake
//! Unseen ──► Pending ──(released)──► Active ──► Completed   remaining == 0
//!                                       └─────► Failed      t > d, remaining > 0
//! ```
//!
//! Ticks run from `min(r)` to `max(d)` over the feasible jobs.  Each tick:
//! release jobs with `r == t`, drop finished or expired ones, let the
//! [`DispatchPolicy`] pick at most one ready job, and run it for one unit.
//! After the last tick every job is settled: `+w` when finished, `-l`
//! otherwise.

pub mod policy;

use std::collections::{BTreeMap, HashMap};

use tracing::{debug, info, warn};

use crate::horizon::Horizon;
use crate::job::{Job, JobId, Slot};
use crate::schedule::{RejectReason, ScheduledJob};

use super::calendar::Calendar;
use super::feasibility::is_feasible;

pub use policy::{
    DispatchPolicy, DynamicDecay, FirstFit, HighestDensity, ReadyJob, ScoreExponents,
};

/// Per-run progress of one admitted job.
#[derive(Debug, Clone)]
struct Progress {
    job: Job,
    remaining: u32,
    executed: Vec<Slot>,
}

/// Simulate `jobs` tick by tick under `policy`.
///
/// Infeasible jobs come first in the returned list, then the admitted jobs in
/// input order.
pub fn simulate(jobs: &[Job], policy: &mut dyn DispatchPolicy) -> Vec<ScheduledJob> {
    let mut out: Vec<ScheduledJob> = Vec::with_capacity(jobs.len());

    // ── Intake ────────────────────────────────────────────────────────────────
    let mut progress: Vec<Progress> = Vec::new();
    for job in jobs {
        if is_feasible(job) {
            progress.push(Progress {
                job: *job,
                remaining: job.processing,
                executed: Vec::new(),
            });
        } else {
            debug!(job = job.id, penalty = job.penalty, "✗ infeasible at intake — rejected");
            out.push(ScheduledJob::rejected(*job, RejectReason::Infeasible));
        }
    }

    let admitted: Vec<Job> = progress.iter().map(|p| p.job).collect();
    policy.prepare(&admitted);

    let index: HashMap<JobId, usize> = progress
        .iter()
        .enumerate()
        .map(|(i, p)| (p.job.id, i))
        .collect();

    let mut releases: BTreeMap<Slot, Vec<usize>> = BTreeMap::new();
    for (i, p) in progress.iter().enumerate() {
        releases.entry(p.job.release).or_default().push(i);
    }

    // ── Simulation ────────────────────────────────────────────────────────────
    let mut calendar = Calendar::new();
    let mut idle = 0u32;

    if let Some(horizon) = Horizon::of_feasible(jobs) {
        debug!(
            start = horizon.start,
            end = horizon.end,
            ticks = horizon.slot_count(),
            "simulating"
        );
        let mut active: Vec<usize> = Vec::new();

        for t in horizon.start..=horizon.end {
            for &i in releases.get(&t).map(Vec::as_slice).unwrap_or(&[]) {
                policy.admit(&progress[i].job);
                active.push(i);
            }

            active.retain(|&i| progress[i].remaining > 0 && t <= progress[i].job.deadline);

            let ready: Vec<ReadyJob> = active
                .iter()
                .map(|&i| ReadyJob {
                    job: progress[i].job,
                    remaining: progress[i].remaining,
                })
                .collect();

            let chosen = if ready.is_empty() {
                None
            } else {
                policy.select(t, &ready)
            };

            match chosen.and_then(|id| index.get(&id).copied()) {
                Some(i) if active.contains(&i) => {
                    let p = &mut progress[i];
                    p.remaining -= 1;
                    p.executed.push(t);
                    calendar.occupy(t, p.job.id);
                }
                Some(_) | None => {
                    if let Some(id) = chosen {
                        warn!(
                            tick = t,
                            job = id,
                            policy = policy.name(),
                            "policy chose a job that is not ready — tick left idle"
                        );
                    }
                    idle += 1;
                }
            }
        }
    }

    // ── Settlement ────────────────────────────────────────────────────────────
    for p in progress {
        if p.remaining == 0 {
            debug!(job = p.job.id, reward = p.job.reward, slots = ?p.executed, "✓ completed");
            out.push(ScheduledJob::completed(p.job, p.executed));
        } else {
            debug!(
                job = p.job.id,
                penalty = p.job.penalty,
                remaining = p.remaining,
                executed = ?p.executed,
                "✗ deadline missed"
            );
            out.push(ScheduledJob::rejected(
                p.job,
                RejectReason::DeadlineMissed {
                    executed: p.executed,
                },
            ));
        }
    }

    info!(
        policy = policy.name(),
        completed = out.iter().filter(|sj| sj.is_completed()).count(),
        total = out.len(),
        busy_ticks = calendar.occupied_count(),
        idle_ticks = idle,
        "online simulation done"
    );
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────
