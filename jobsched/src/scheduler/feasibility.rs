/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-job admissibility and static priority numbers.
//!
//! A job is **feasible** iff its window can physically hold its processing
//! time:
//!
//! $$d - r + 1 \geq p$$
//!
//! Two static scores are derived from the job's fields:
//!
//! | Score | Formula | Used by |
//! |---|---|---|
//! | [`priority_score`] | `(w + l) / p / (slack + 1)` | greedy offline |
//! | [`density`] | `(w + l) / p` | online highest-score policy |
//!
//! Both return `-1.0` for infeasible jobs so they always sort last.  Scores
//! are compared at full precision; [`round3`] is for display only.

use crate::job::Job;

/// Score assigned to infeasible jobs (lowest priority).
pub const INFEASIBLE_SCORE: f64 = -1.0;

/// Per-run annotation of one job.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Assessment {
    pub feasible: bool,

    /// Spare slots in the window beyond `p`; `None` when infeasible.
    pub slack: Option<u32>,

    /// Slack-adjusted static score, see [`priority_score`].
    pub score: f64,
}

/// Compute the full annotation for `job`.
pub fn assess(job: &Job) -> Assessment {
    Assessment {
        feasible: is_feasible(job),
        slack: slack(job),
        score: priority_score(job),
    }
}

/// `d - r + 1 >= p`.
pub fn is_feasible(job: &Job) -> bool {
    job.window_len() >= job.processing
}

/// `d - r + 1 - p` for feasible jobs.
pub fn slack(job: &Job) -> Option<u32> {
    job.window_len().checked_sub(job.processing)
}

/// Slack-adjusted static score: `(w + l) / p / (slack + 1)`.
pub fn priority_score(job: &Job) -> f64 {
    match slack(job) {
        Some(slack) => value(job) / f64::from(job.processing) / f64::from(slack + 1),
        None => INFEASIBLE_SCORE,
    }
}

/// Value density: `(w + l) / p`.
pub fn density(job: &Job) -> f64 {
    if is_feasible(job) {
        value(job) / f64::from(job.processing)
    } else {
        INFEASIBLE_SCORE
    }
}

/// Round to three decimal digits (display only).
pub fn round3(score: f64) -> f64 {
    (score * 1000.0).round() / 1000.0
}

/// `w + l`: what completing the job is worth compared with rejecting it.
fn value(job: &Job) -> f64 {
    job.reward as f64 + job.penalty as f64
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn job(r: i64, d: i64, p: i64, w: i64, l: i64) -> Job {
        Job::new(1, r, d, p, w, l).unwrap()
    }

    #[test]
    fn exact_fit_is_feasible_with_zero_slack() {
        let j = job(2, 4, 3, 10, 5);
        assert!(is_feasible(&j));
        assert_eq!(slack(&j), Some(0));
    }

    #[test]
    fn window_smaller_than_processing_is_infeasible() {
        let j = job(0, 0, 2, 10, 5);
        assert!(!is_feasible(&j));
        assert_eq!(slack(&j), None);
        assert_eq!(priority_score(&j), INFEASIBLE_SCORE);
        assert_eq!(density(&j), INFEASIBLE_SCORE);
    }

    #[test]
    fn priority_score_divides_by_slack_plus_one() {
        // (10 + 5) / 1 / (0 + 1) = 15
        assert_eq!(priority_score(&job(0, 0, 1, 10, 5)), 15.0);
        // window 4, p 2 → slack 2 → (20 + 10) / 2 / 3 = 5
        assert_eq!(priority_score(&job(0, 3, 2, 20, 10)), 5.0);
    }

    #[test]
    fn density_ignores_slack() {
        assert_eq!(density(&job(0, 3, 2, 20, 10)), 15.0);
    }

    #[test]
    fn assess_bundles_all_annotations() {
        let a = assess(&job(1, 5, 2, 7, 2));
        assert!(a.feasible);
        assert_eq!(a.slack, Some(3));
        assert!((a.score - 9.0 / 2.0 / 4.0).abs() < 1e-12);
    }

    #[test]
    fn round3_is_display_rounding() {
        assert_eq!(round3(1.0 / 3.0), 0.333);
        assert_eq!(round3(2.0 / 3.0), 0.667);
    }
}
