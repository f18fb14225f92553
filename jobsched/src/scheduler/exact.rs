/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Exact offline solver: memoised search over (job index, occupancy mask).
//!
//! Jobs are processed in ascending deadline order (stable on input order) so
//! the recursion is canonical and reproducible.  The value function is
//!
//! ```text
//! V(n, mask) = 0
//! V(i, mask) = max( -l_i + V(i+1, mask),
//!                   max over every p_i-subset S of the free window slots:
//!                       w_i + V(i+1, mask ∪ S) )
//! ```
//!
//! and the optimal profit is `V(0, ∅)`.  Every `C(free, p)` subset is tried:
//! which slots a job occupies changes what later overlapping jobs can use, so
//! trying only the earliest free slots is unsound.
//!
//! Reconstruction replays the decisions from `(0, ∅)`.  When rejecting and
//! accepting tie, **rejection wins**; among equally good subsets the first in
//! lexicographic order wins.
//!
//! Occupancy is a `u64` bitmask with bit `t` set when slot `t` is taken, so
//! the instance's latest deadline must not exceed
//! [`OCCUPANCY_MASK_LIMIT`](crate::horizon::OCCUPANCY_MASK_LIMIT).  Runtime is
//! exponential in window overlap; this is the reference oracle, meant for
//! small instances.

use std::collections::HashMap;

use itertools::Itertools;
use tracing::{debug, info};

use crate::horizon::{check_mask_limit, OCCUPANCY_MASK_LIMIT};
use crate::job::{Job, Slot};
use crate::schedule::{RejectReason, ScheduledJob};

use super::error::SchedulerError;
use super::feasibility::is_feasible;

// ── OccupancyMask ─────────────────────────────────────────────────────────────

/// One bit per slot; bit `t` set means slot `t` is occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct OccupancyMask(u64);

impl OccupancyMask {
    pub fn is_occupied(self, slot: Slot) -> bool {
        (self.0 >> slot) & 1 == 1
    }

    /// This mask with every slot of `slots` set.
    pub fn with(self, slots: &[Slot]) -> Self {
        Self(slots.iter().fold(self.0, |m, &t| m | (1u64 << t)))
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }
}

// ── ExactSolver ───────────────────────────────────────────────────────────────

/// One invocation of the exact solver.  The memo table lives and dies with it.
struct ExactSolver {
    /// Jobs in deadline order.
    jobs: Vec<Job>,
    memo: HashMap<(usize, OccupancyMask), i64>,
}

impl ExactSolver {
    fn new(jobs: &[Job]) -> Self {
        let mut jobs = jobs.to_vec();
        jobs.sort_by_key(|j| j.deadline);
        Self {
            jobs,
            memo: HashMap::new(),
        }
    }

    /// Free slots of `job`'s window under `mask`, ascending.
    fn free_slots(job: &Job, mask: OccupancyMask) -> Vec<Slot> {
        job.window().filter(|&t| !mask.is_occupied(t)).collect()
    }

    /// `V(i, mask)`.
    fn value(&mut self, i: usize, mask: OccupancyMask) -> i64 {
        if i == self.jobs.len() {
            return 0;
        }
        if let Some(&v) = self.memo.get(&(i, mask)) {
            return v;
        }

        let job = self.jobs[i];
        let mut best = -job.penalty + self.value(i + 1, mask);

        let needed = job.processing as usize;
        let free = Self::free_slots(&job, mask);
        if free.len() >= needed {
            for subset in free.into_iter().combinations(needed) {
                let take = job.reward + self.value(i + 1, mask.with(&subset));
                best = best.max(take);
            }
        }

        self.memo.insert((i, mask), best);
        best
    }

    /// Replay the optimal decisions from `(0, ∅)`.  Returns the outcomes and
    /// the final occupancy.
    fn reconstruct(&mut self) -> Result<(Vec<ScheduledJob>, OccupancyMask), SchedulerError> {
        let mut mask = OccupancyMask::default();
        let mut out = Vec::with_capacity(self.jobs.len());

        for i in 0..self.jobs.len() {
            let job = self.jobs[i];
            let best = self.value(i, mask);
            let reject = -job.penalty + self.value(i + 1, mask);

            if best == reject {
                let reason = if is_feasible(&job) {
                    RejectReason::Declined
                } else {
                    RejectReason::Infeasible
                };
                debug!(job = job.id, ?reason, value = best, "✗ rejected");
                out.push(ScheduledJob::rejected(job, reason));
                continue;
            }

            let needed = job.processing as usize;
            let mut chosen = None;
            for subset in Self::free_slots(&job, mask).into_iter().combinations(needed) {
                let next = mask.with(&subset);
                if job.reward + self.value(i + 1, next) == best {
                    chosen = Some((subset, next));
                    break;
                }
            }
            let Some((slots, next)) = chosen else {
                return Err(SchedulerError::ReconstructionMismatch { job: job.id });
            };

            debug!(job = job.id, slots = ?slots, value = best, "✓ accepted");
            mask = next;
            out.push(ScheduledJob::completed(job, slots));
        }

        Ok((out, mask))
    }
}

/// Solve `jobs` to optimality.
///
/// Returns the per-job outcomes (in deadline order) and the optimal profit
/// `V(0, ∅)`.
///
/// # Errors
/// * [`SchedulerError::HorizonOverflow`] if any deadline exceeds
///   [`OCCUPANCY_MASK_LIMIT`]; no search is attempted.
/// * [`SchedulerError::ReconstructionMismatch`] if the replay cannot find the
///   decision behind a memoised value (internal bug).
pub fn schedule_exact(jobs: &[Job]) -> Result<(Vec<ScheduledJob>, i64), SchedulerError> {
    check_mask_limit(jobs, OCCUPANCY_MASK_LIMIT)?;

    let mut solver = ExactSolver::new(jobs);
    let optimum = solver.value(0, OccupancyMask::default());
    let (out, occupied) = solver.reconstruct()?;

    info!(
        optimum,
        scheduled = out.iter().filter(|sj| sj.is_completed()).count(),
        total = out.len(),
        occupied_slots = occupied.count(),
        memo_entries = solver.memo.len(),
        "exact done"
    );
    Ok((out, optimum))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::{Outcome, Schedule};
    use crate::scheduler::greedy::schedule_greedy;

    fn job(id: u32, r: i64, d: i64, p: i64, w: i64, l: i64) -> Job {
        Job::new(id, r, d, p, w, l).unwrap()
    }

    fn run(jobs: &[Job]) -> Schedule {
        let (out, optimum) = schedule_exact(jobs).unwrap();
        let schedule = Schedule::new("exact", out);
        assert_eq!(schedule.total_profit, optimum);
        schedule
    }

    #[test]
    fn mask_sets_and_reads_bits() {
        let m = OccupancyMask::default().with(&[0, 5, 62]);
        assert!(m.is_occupied(0));
        assert!(m.is_occupied(5));
        assert!(m.is_occupied(62));
        assert!(!m.is_occupied(1));
        assert_eq!(m.count(), 3);
    }

    #[test]
    fn single_job_is_scheduled() {
        let s = run(&[job(1, 0, 0, 1, 10, 5)]);
        assert_eq!(s.jobs[0].slots(), Some(&[0][..]));
        assert_eq!(s.total_profit, 10);
    }

    #[test]
    fn two_overlapping_unit_jobs_both_fit() {
        let s = run(&[job(1, 0, 1, 1, 8, 1), job(2, 0, 1, 1, 6, 1)]);
        assert_eq!(s.completed_count(), 2);
        assert_eq!(s.total_profit, 14);
    }

    #[test]
    fn infeasible_job_is_rejected() {
        let s = run(&[job(1, 0, 0, 2, 10, 4)]);
        assert_eq!(s.jobs[0].outcome, Outcome::Rejected(RejectReason::Infeasible));
        assert_eq!(s.total_profit, -4);
    }

    #[test]
    fn horizon_overflow_is_refused() {
        let err = schedule_exact(&[job(1, 0, 3, 1, 1, 1), job(2, 60, 70, 2, 5, 5)]).unwrap_err();
        assert!(matches!(
            err,
            SchedulerError::HorizonOverflow {
                horizon: 70,
                limit: 62
            }
        ));
    }

    #[test]
    fn beats_greedy_when_latest_first_blocks_a_tight_job() {
        // greedy: job 1 (score 10) grabs slot 2, job 2 (score 5) is left out → 30
        // exact:  job 1 in slot 0 or 1, job 2 in slot 2 → 35
        let jobs = [job(1, 0, 2, 1, 30, 0), job(2, 2, 2, 1, 5, 0)];
        let greedy = Schedule::new("greedy", schedule_greedy(&jobs));
        assert_eq!(greedy.total_profit, 30);

        let exact = run(&jobs);
        assert_eq!(exact.total_profit, 35);
        assert_eq!(exact.get(2).unwrap().slots(), Some(&[2][..]));
    }

    #[test]
    fn rejects_low_value_job_to_fit_two_others() {
        // job 3 needs slots 0 and 1; jobs 1 and 2 need one each of them
        let jobs = [
            job(1, 0, 0, 1, 10, 1),
            job(2, 1, 1, 1, 10, 1),
            job(3, 0, 1, 2, 15, 2),
        ];
        let s = run(&jobs);
        assert_eq!(s.total_profit, 10 + 10 - 2);
        assert_eq!(s.get(3).unwrap().outcome, Outcome::Rejected(RejectReason::Declined));
    }

    #[test]
    fn reject_wins_value_ties() {
        // accepting yields +5, rejecting yields -(-5) = +5
        let s = run(&[job(1, 0, 0, 1, 5, -5)]);
        assert_eq!(s.jobs[0].outcome, Outcome::Rejected(RejectReason::Declined));
        assert_eq!(s.total_profit, 5);
    }

    #[test]
    fn subset_choice_leaves_room_for_later_job() {
        // Sorted by deadline: job 1 (d=3) before job 2 (d=4).
        // Job 1 must avoid slot 3 so job 2 ([3,4], p=2) can complete.
        let jobs = [job(2, 3, 4, 2, 20, 0), job(1, 0, 3, 2, 10, 0)];
        let s = run(&jobs);
        assert_eq!(s.total_profit, 30);
        assert_eq!(s.get(1).unwrap().slots(), Some(&[0, 1][..]));
        assert_eq!(s.get(2).unwrap().slots(), Some(&[3, 4][..]));
    }

    #[test]
    fn final_mask_covers_every_accepted_slot() {
        let jobs = [job(1, 0, 3, 2, 10, 0), job(2, 1, 2, 1, 5, 0)];
        let mut solver = ExactSolver::new(&jobs);
        solver.value(0, OccupancyMask::default());
        let (out, mask) = solver.reconstruct().unwrap();

        let used: usize = out.iter().filter_map(|sj| sj.slots()).map(<[Slot]>::len).sum();
        assert_eq!(used, 3);
        assert_eq!(mask.count() as usize, used);
    }

    #[test]
    fn empty_input_has_zero_profit() {
        let (out, optimum) = schedule_exact(&[]).unwrap();
        assert!(out.is_empty());
        assert_eq!(optimum, 0);
    }
}
