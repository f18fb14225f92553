/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Dispatch policies for the online simulator.
//!
//! Each tick the simulator hands the policy the ready pool (jobs released,
//! not yet expired and with work remaining) and the policy names at most one
//! of them to run for that tick.
//!
//! | Policy | Picks | Tie-break |
//! |---|---|---|
//! | [`FirstFit`] | the job that reserved this tick at intake | — |
//! | [`HighestDensity`] | max `(w + l) / p` | higher `w`, earlier `d`, smaller id |
//! | [`DynamicDecay`] | max decaying score, recomputed every tick | higher `w`, earlier `d`, smaller id |

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::job::{Job, JobId, Slot};
use crate::scheduler::calendar::Calendar;
use crate::scheduler::feasibility::{density, is_feasible};

/// Lower bound applied to the time and work fractions of the dynamic score.
pub const SCORE_EPSILON: f64 = 1e-12;

// ── Policy interface ──────────────────────────────────────────────────────────

/// A job in the ready pool at the current tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReadyJob {
    pub job: Job,

    /// Units still needed before this tick runs (always `> 0`).
    pub remaining: u32,
}

/// Chooses which ready job runs during one tick.
pub trait DispatchPolicy {
    /// Label used in logs and result file names.
    fn name(&self) -> &'static str;

    /// Called once, before the first tick, with every feasible job.
    fn prepare(&mut self, _jobs: &[Job]) {}

    /// Called when `job` is released into the active pool.
    fn admit(&mut self, _job: &Job) {}

    /// Pick the job to run at `tick`, or `None` to leave the tick idle.
    ///
    /// `ready` is never empty and lists jobs in release order.  The returned
    /// id must belong to a job in `ready`.
    fn select(&mut self, tick: Slot, ready: &[ReadyJob]) -> Option<JobId>;
}

/// Shared tie-break: higher reward, then earlier deadline, then smaller id.
/// `Greater` means `a` wins.
fn tie_break(a: &Job, b: &Job) -> Ordering {
    a.reward
        .cmp(&b.reward)
        .then(b.deadline.cmp(&a.deadline))
        .then(b.id.cmp(&a.id))
}

// ── FirstFit ──────────────────────────────────────────────────────────────────

/// Static first-fit intake without per-tick contention.
///
/// At intake, jobs are taken in id order and each reserves the earliest `p`
/// free slots of its window; a job that cannot reserve all `p` reserves
/// nothing and will miss its deadline.  Each tick simply runs the job holding
/// the reservation.
#[derive(Debug, Default)]
pub struct FirstFit {
    reservations: Calendar,
}

impl FirstFit {
    pub fn new() -> Self {
        Self::default()
    }
}

impl DispatchPolicy for FirstFit {
    fn name(&self) -> &'static str {
        "online_static"
    }

    fn prepare(&mut self, jobs: &[Job]) {
        let mut by_id: Vec<&Job> = jobs.iter().filter(|j| is_feasible(j)).collect();
        by_id.sort_by_key(|j| j.id);

        for job in by_id {
            let needed = job.processing as usize;
            let slots = self.reservations.earliest_free(job, needed);
            if slots.len() == needed {
                for &t in &slots {
                    self.reservations.occupy(t, job.id);
                }
                debug!(job = job.id, slots = ?slots, "reserved at intake");
            } else {
                debug!(job = job.id, free = slots.len(), needed, "no room at intake");
            }
        }
    }

    fn select(&mut self, tick: Slot, ready: &[ReadyJob]) -> Option<JobId> {
        let holder = self.reservations.occupant(tick)?;
        ready.iter().find(|r| r.job.id == holder).map(|r| r.job.id)
    }
}

// ── HighestDensity ────────────────────────────────────────────────────────────

/// Heap entry ordered so the max-heap pops the preferred job first.
#[derive(Debug, Clone, Copy)]
struct DensityEntry {
    score: f64,
    job: Job,
}

impl PartialEq for DensityEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for DensityEntry {}

impl PartialOrd for DensityEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for DensityEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| tie_break(&self.job, &other.job))
    }
}

/// Preemptive highest-density-first.
///
/// Jobs enter a binary heap on release.  The heap may hold entries for jobs
/// that have since finished or expired; those are discarded when popped and
/// never removed in place.  The running job is popped, and pushed back if it
/// still has work after this tick and its deadline is later than the tick.
#[derive(Debug, Default)]
pub struct HighestDensity {
    heap: BinaryHeap<DensityEntry>,
}

impl HighestDensity {
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, job: &Job) {
        self.heap.push(DensityEntry {
            score: density(job),
            job: *job,
        });
    }
}

impl DispatchPolicy for HighestDensity {
    fn name(&self) -> &'static str {
        "online_highscore"
    }

    fn admit(&mut self, job: &Job) {
        self.push(job);
    }

    fn select(&mut self, tick: Slot, ready: &[ReadyJob]) -> Option<JobId> {
        while let Some(entry) = self.heap.pop() {
            let Some(chosen) = ready.iter().find(|r| r.job.id == entry.job.id) else {
                trace!(job = entry.job.id, tick, "discarding stale heap entry");
                continue;
            };
            if chosen.remaining > 1 && tick < chosen.job.deadline {
                self.push(&chosen.job);
            }
            return Some(chosen.job.id);
        }
        None
    }
}

// ── DynamicDecay ──────────────────────────────────────────────────────────────

/// Exponents of the dynamic score.
///
/// `score(t) = (w + l)^A / (p^B · time_left(t)^C · work_left(t)^D)`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(default)]
pub struct ScoreExponents {
    /// `A`, applied to `w + l`.
    pub reward_exponent: f64,
    /// `B`, applied to `p`.
    pub processing_exponent: f64,
    /// `C`, applied to the fraction of the window still ahead.
    pub time_left_exponent: f64,
    /// `D`, applied to the fraction of work still remaining.
    pub work_left_exponent: f64,
}

impl Default for ScoreExponents {
    fn default() -> Self {
        Self {
            reward_exponent: 1.0,
            processing_exponent: 1.0,
            time_left_exponent: 1.0,
            work_left_exponent: 1.0,
        }
    }
}

/// `max(d - t + 1, 0) / max(d - r + 1, 1)`, floored at [`SCORE_EPSILON`].
pub fn frac_time_left(job: &Job, tick: Slot) -> f64 {
    let window = (i64::from(job.deadline) - i64::from(job.release) + 1).max(1);
    let left = (i64::from(job.deadline) - i64::from(tick) + 1).max(0);
    (left as f64 / window as f64).max(SCORE_EPSILON)
}

/// `remaining / p`, floored at [`SCORE_EPSILON`].
pub fn frac_work_left(job: &Job, remaining: u32) -> f64 {
    (f64::from(remaining) / f64::from(job.processing.max(1))).max(SCORE_EPSILON)
}

/// Preemptive policy favouring urgent, nearly-finished jobs.
///
/// Every tick recomputes
/// `(w + l)^A / (p^B · time_left^C · work_left^D)` for each ready job and
/// runs the maximum.
#[derive(Debug, Clone, Default)]
pub struct DynamicDecay {
    exponents: ScoreExponents,
}

impl DynamicDecay {
    pub fn new(exponents: ScoreExponents) -> Self {
        Self { exponents }
    }

    /// Score of `ready` at `tick`.
    pub fn score(&self, ready: &ReadyJob, tick: Slot) -> f64 {
        let e = &self.exponents;
        let job = &ready.job;
        let num = (job.reward as f64 + job.penalty as f64).powf(e.reward_exponent);
        let denom = f64::from(job.processing).max(SCORE_EPSILON).powf(e.processing_exponent)
            * frac_time_left(job, tick).powf(e.time_left_exponent)
            * frac_work_left(job, ready.remaining).powf(e.work_left_exponent);
        num / denom
    }
}

impl DispatchPolicy for DynamicDecay {
    fn name(&self) -> &'static str {
        "online_dynscore"
    }

    fn select(&mut self, tick: Slot, ready: &[ReadyJob]) -> Option<JobId> {
        ready
            .iter()
            .map(|r| (self.score(r, tick), r))
            .max_by(|(sa, a), (sb, b)| sa.total_cmp(sb).then_with(|| tie_break(&a.job, &b.job)))
            .map(|(_, r)| r.job.id)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
