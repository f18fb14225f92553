/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Scheduling result types.
//!
//! A [`Schedule`] is built once per run from a fixed job list and is never
//! mutated after the scheduler returns it.  It holds one [`ScheduledJob`] per
//! input job, in ascending id order, and the total profit computed by
//! [`profit::total_profit`](crate::scheduler::profit::total_profit).

use std::collections::BTreeMap;

use crate::job::{Job, JobId, Slot};
use crate::scheduler::profit;

// ── Outcome ───────────────────────────────────────────────────────────────────

/// Why a job did not complete.
///
/// Every variant is charged the job's penalty.  Only
/// [`DeadlineMissed`](RejectReason::DeadlineMissed) carries slots; the result
/// format writes its executed ticks, the others are written as `null`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RejectReason {
    /// `d - r + 1 < p`: the window can never hold the job.
    Infeasible,

    /// Feasible, but the free slots left in the window were too few when the
    /// job's turn came (greedy and first-fit intake).
    NoRoom,

    /// The exact solver found rejecting the job at least as profitable.
    Declined,

    /// Online only: the deadline passed with work remaining.  `executed` lists
    /// the ticks the job did run before it was abandoned.
    DeadlineMissed { executed: Vec<Slot> },
}

/// Final state of one job after a scheduling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// All `p` slots assigned; the reward is credited.
    Completed { slots: Vec<Slot> },

    /// Not completed; the penalty is charged.
    Rejected(RejectReason),
}

/// One input job together with its outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledJob {
    pub job: Job,
    pub outcome: Outcome,
}

impl ScheduledJob {
    /// A completed job.  `slots` is sorted ascending.
    pub fn completed(job: Job, mut slots: Vec<Slot>) -> Self {
        slots.sort_unstable();
        debug_assert_eq!(
            slots.len(),
            job.processing as usize,
            "job {} completed with the wrong slot count",
            job.id
        );
        Self {
            job,
            outcome: Outcome::Completed { slots },
        }
    }

    pub fn rejected(job: Job, reason: RejectReason) -> Self {
        Self {
            job,
            outcome: Outcome::Rejected(reason),
        }
    }

    /// Assigned slots for a completed job, `None` otherwise.
    pub fn slots(&self) -> Option<&[Slot]> {
        match &self.outcome {
            Outcome::Completed { slots } => Some(slots),
            Outcome::Rejected(_) => None,
        }
    }

    /// Every slot the job actually ran in: the assigned slots of a completed
    /// job, the executed ticks of an online job that missed its deadline,
    /// empty otherwise.
    pub fn occupied_slots(&self) -> &[Slot] {
        match &self.outcome {
            Outcome::Completed { slots } => slots,
            Outcome::Rejected(RejectReason::DeadlineMissed { executed }) => executed,
            Outcome::Rejected(_) => &[],
        }
    }

    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, Outcome::Completed { .. })
    }

    /// Profit contribution: `+w` if completed, `-l` otherwise.
    pub fn contribution(&self) -> i64 {
        if self.is_completed() {
            self.job.reward
        } else {
            -self.job.penalty
        }
    }
}

// ── Schedule ──────────────────────────────────────────────────────────────────

/// Complete result of one scheduling run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    /// Name of the algorithm that produced this schedule.
    pub algorithm: &'static str,

    /// One entry per input job, ascending by id.
    pub jobs: Vec<ScheduledJob>,

    /// `Σ w(completed) − Σ l(rejected)`.
    pub total_profit: i64,
}

impl Schedule {
    /// Sort `jobs` by id and compute the total profit.
    pub fn new(algorithm: &'static str, mut jobs: Vec<ScheduledJob>) -> Self {
        jobs.sort_by_key(|sj| sj.job.id);
        let total_profit = profit::total_profit(&jobs);
        Self {
            algorithm,
            jobs,
            total_profit,
        }
    }

    /// Recompute the profit from the per-job outcomes.
    ///
    /// Always equals `total_profit` for a schedule built by [`Schedule::new`].
    pub fn recomputed_profit(&self) -> i64 {
        profit::total_profit(&self.jobs)
    }

    pub fn get(&self, id: JobId) -> Option<&ScheduledJob> {
        self.jobs.iter().find(|sj| sj.job.id == id)
    }

    pub fn completed_count(&self) -> usize {
        self.jobs.iter().filter(|sj| sj.is_completed()).count()
    }

    /// Slot → job view of every occupied slot, partial online runs included.
    ///
    /// Returns `Err(slot)` for the first slot claimed by more than one job.
    pub fn occupancy(&self) -> Result<BTreeMap<Slot, JobId>, Slot> {
        let mut map = BTreeMap::new();
        for sj in &self.jobs {
            for &slot in sj.occupied_slots() {
                if map.insert(slot, sj.job.id).is_some() {
                    return Err(slot);
                }
            }
        }
        Ok(map)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
