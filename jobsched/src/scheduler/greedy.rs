/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Greedy offline heuristic: highest static score first, latest slots first.
//!
//! 1. Annotate every job with
//!    [`priority_score`](super::feasibility::priority_score) (`-1` when
//!    infeasible).
//! 2. Stable-sort descending by score; ties go to smaller `p`, then earlier
//!    `d`, then input order.
//! 3. Walk the sorted list once.  For each feasible job scan its window from
//!    `d` down to `r` and take the first `p` free slots.  If fewer than `p`
//!    are free the job is rejected ([`RejectReason::NoRoom`]) and nothing is
//!    reserved.
//!
//! Latest-first filling is kept as the observable behaviour; it is not proven
//! better than earliest-first.  Cost is `O(n log n + n·H)` for horizon `H`.

use std::cmp::Ordering;

use tracing::{debug, info, warn};

use crate::job::Job;
use crate::schedule::{RejectReason, ScheduledJob};

use super::calendar::Calendar;
use super::feasibility::{assess, round3, Assessment};

/// Greedy processing order: score descending, then `p` ascending, then `d`
/// ascending.
pub fn greedy_order(a: &(Job, Assessment), b: &(Job, Assessment)) -> Ordering {
    b.1.score
        .total_cmp(&a.1.score)
        .then(a.0.processing.cmp(&b.0.processing))
        .then(a.0.deadline.cmp(&b.0.deadline))
}

/// Run the greedy heuristic.  Returned entries are in processing order.
pub fn schedule_greedy(jobs: &[Job]) -> Vec<ScheduledJob> {
    let mut ranked: Vec<(Job, Assessment)> = jobs.iter().map(|j| (*j, assess(j))).collect();
    ranked.sort_by(greedy_order);

    let mut calendar = Calendar::new();
    let mut out = Vec::with_capacity(ranked.len());

    for (job, assessment) in ranked {
        if !assessment.feasible {
            debug!(job = job.id, "✗ infeasible window — rejected");
            out.push(ScheduledJob::rejected(job, RejectReason::Infeasible));
            continue;
        }

        let needed = job.processing as usize;
        let slots = calendar.latest_free(&job, needed);

        if slots.len() == needed {
            for &t in &slots {
                calendar.occupy(t, job.id);
            }
            debug!(
                job = job.id,
                score = round3(assessment.score),
                slots = ?slots,
                "✓ scheduled"
            );
            out.push(ScheduledJob::completed(job, slots));
        } else {
            warn!(
                job = job.id,
                score = round3(assessment.score),
                free = slots.len(),
                needed,
                "✗ not enough free slots left in window — rejected"
            );
            out.push(ScheduledJob::rejected(job, RejectReason::NoRoom));
        }
    }

    info!(
        scheduled = out.iter().filter(|sj| sj.is_completed()).count(),
        total = out.len(),
        occupied_slots = calendar.occupied_count(),
        "greedy done"
    );
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schedule::Schedule;

    fn job(id: u32, r: i64, d: i64, p: i64, w: i64, l: i64) -> Job {
        Job::new(id, r, d, p, w, l).unwrap()
    }

    fn run(jobs: &[Job]) -> Schedule {
        Schedule::new("greedy", schedule_greedy(jobs))
    }

    #[test]
    fn single_job_takes_its_only_slot() {
        let s = run(&[job(1, 0, 0, 1, 10, 5)]);
        assert_eq!(s.jobs[0].slots(), Some(&[0][..]));
        assert_eq!(s.total_profit, 10);
    }

    #[test]
    fn two_overlapping_unit_jobs_both_fit() {
        let s = run(&[job(1, 0, 1, 1, 8, 1), job(2, 0, 1, 1, 6, 1)]);
        assert_eq!(s.completed_count(), 2);
        assert_eq!(s.total_profit, 14);
        // job 1 scores higher (4.5 vs 3.5) and takes the latest slot
        assert_eq!(s.get(1).unwrap().slots(), Some(&[1][..]));
        assert_eq!(s.get(2).unwrap().slots(), Some(&[0][..]));
    }

    #[test]
    fn infeasible_job_is_rejected_with_penalty() {
        let s = run(&[job(1, 0, 0, 2, 10, 4)]);
        assert_eq!(
            s.jobs[0].outcome,
            crate::schedule::Outcome::Rejected(RejectReason::Infeasible)
        );
        assert_eq!(s.total_profit, -4);
    }

    #[test]
    fn lower_score_loses_contested_slot() {
        // job 1: (10 + 2) / 1 / 1 = 12
        // job 2: (20 + 3) / 1 / 1 = 23  → wins slot 4
        let s = run(&[job(1, 4, 4, 1, 10, 2), job(2, 4, 4, 1, 20, 3)]);
        assert_eq!(s.get(2).unwrap().slots(), Some(&[4][..]));
        assert_eq!(
            s.get(1).unwrap().outcome,
            crate::schedule::Outcome::Rejected(RejectReason::NoRoom)
        );
        assert_eq!(s.total_profit, 20 - 2);
    }

    #[test]
    fn fills_latest_slots_first() {
        let s = run(&[job(1, 0, 9, 3, 10, 0)]);
        assert_eq!(s.jobs[0].slots(), Some(&[7, 8, 9][..]));
    }

    #[test]
    fn equal_scores_prefer_smaller_processing_then_earlier_deadline() {
        // job 1: (8 + 0) / 2 / 1 = 4 ; job 2: (4 + 0) / 1 / 1 = 4 → p decides
        let a = job(1, 0, 1, 2, 8, 0);
        let b = job(2, 0, 0, 1, 4, 0);
        let mut ranked = vec![(a, assess(&a)), (b, assess(&b))];
        ranked.sort_by(greedy_order);
        assert_eq!(ranked[0].0.id, 2);

        // same score, same p → earlier deadline first
        let c = job(3, 0, 5, 1, 6, 0);
        let d = job(4, 3, 3, 1, 1, 0);
        // c: 6 / 1 / 6 = 1 ; d: 1 / 1 / 1 = 1
        let mut ranked = vec![(c, assess(&c)), (d, assess(&d))];
        ranked.sort_by(greedy_order);
        assert_eq!(ranked[0].0.id, 4);
    }

    #[test]
    fn full_tie_keeps_input_order() {
        let a = job(1, 0, 0, 1, 5, 0);
        let b = job(2, 0, 0, 1, 5, 0);
        let s = run(&[a, b]);
        assert!(s.get(1).unwrap().is_completed());
        assert!(!s.get(2).unwrap().is_completed());
    }

    #[test]
    fn empty_input_yields_empty_schedule() {
        let s = run(&[]);
        assert!(s.jobs.is_empty());
        assert_eq!(s.total_profit, 0);
    }
}
