/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Job scheduler entry point.
//!
//! [`JobScheduler`] runs one of five algorithms over an ordered job list and
//! returns a [`Schedule`]: every job either gets exactly `p` distinct slots in
//! its window or is rejected, and the total profit is
//! `Σ w(completed) − Σ l(rejected)`.
//!
//! | Algorithm | Kind | Module |
//! |---|---|---|
//! | `greedy` | offline heuristic, score-ordered, latest slots first | [`greedy`] |
//! | `exact` | offline optimum, memoised bitmask search | [`exact`] |
//! | `online_static` | online, first-fit reservation at intake | [`online::FirstFit`] |
//! | `online_highscore` | online, preemptive max `(w + l) / p` | [`online::HighestDensity`] |
//! | `online_dynscore` | online, preemptive decaying score | [`online::DynamicDecay`] |
//!
//! # Design decisions
//!
//! | Topic | Choice |
//! |---|---|
//! | State | Stateless `schedule()`; calendar, memo table and heap are local to one call |
//! | Input | `&[Job]` borrow; `Job` is `Copy`, so annotations never leak between runs |
//! | Map iteration order | `BTreeMap` calendars and id-sorted output, so runs are deterministic |
//! | Per-job failures | Data ([`Outcome::Rejected`](crate::schedule::Outcome)), never errors |
//! | Thread safety | `Send + Sync`; independent runs may execute in parallel |
//!
//! # Example
//! ```rust
//! use jobsched::job::Job;
//! use jobsched::scheduler::{Algorithm, JobScheduler};
//!
//! let jobs = vec![Job::new(1, 0, 0, 1, 10, 5).unwrap()];
//! let schedule = JobScheduler::default().schedule(&jobs, Algorithm::Exact).unwrap();
//! assert_eq!(schedule.total_profit, 10);
//! ```

pub mod calendar;
pub mod error;
pub mod exact;
pub mod feasibility;
pub mod greedy;
pub mod online;
pub mod profit;

pub use error::SchedulerError;

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use tracing::{error, info};

use crate::job::Job;
use crate::schedule::Schedule;

use online::{DispatchPolicy, DynamicDecay, FirstFit, HighestDensity, ScoreExponents};

// ── Algorithm ─────────────────────────────────────────────────────────────────

/// Selectable scheduling algorithm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Greedy,
    Exact,
    OnlineStatic,
    OnlineHighScore,
    OnlineDynamic,
}

impl Algorithm {
    /// Every algorithm, offline first.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Greedy,
        Algorithm::Exact,
        Algorithm::OnlineStatic,
        Algorithm::OnlineHighScore,
        Algorithm::OnlineDynamic,
    ];

    /// Name accepted by [`FromStr`] and stored in [`Schedule::algorithm`].
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Greedy => "greedy",
            Algorithm::Exact => "exact",
            Algorithm::OnlineStatic => "online_static",
            Algorithm::OnlineHighScore => "online_highscore",
            Algorithm::OnlineDynamic => "online_dynscore",
        }
    }

    /// Suffix appended to a test-case label for result files and the summary
    /// log.
    pub fn label_suffix(self) -> &'static str {
        match self {
            Algorithm::Greedy => "_offline",
            Algorithm::Exact => "_exact",
            Algorithm::OnlineStatic => "_online_static",
            Algorithm::OnlineHighScore => "_online_highscore",
            Algorithm::OnlineDynamic => "_online_dynscore",
        }
    }

    pub fn is_online(self) -> bool {
        matches!(
            self,
            Algorithm::OnlineStatic | Algorithm::OnlineHighScore | Algorithm::OnlineDynamic
        )
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SchedulerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .into_iter()
            .find(|a| a.name() == s)
            .ok_or_else(|| SchedulerError::UnknownAlgorithm(s.to_string()))
    }
}

// ── JobScheduler ──────────────────────────────────────────────────────────────

/// The scheduling engine.
///
/// Holds only configuration.  All per-run state is allocated inside
/// [`schedule()`](Self::schedule) and dropped at the end of the call.
#[derive(Debug, Clone, Default)]
pub struct JobScheduler {
    exponents: ScoreExponents,
}

impl JobScheduler {
    /// Create a scheduler whose dynamic-score policy uses `exponents`.
    pub fn new(exponents: ScoreExponents) -> Self {
        Self { exponents }
    }

    // ── Public entry point ────────────────────────────────────────────────────

    /// Schedule `jobs` with `algorithm`.
    ///
    /// An empty job list yields an empty schedule with zero profit.
    ///
    /// # Errors
    /// * [`SchedulerError::InvalidJob`] / [`SchedulerError::DuplicateJobId`]:
    ///   checked before any algorithm runs.
    /// * [`SchedulerError::HorizonOverflow`]: `exact` only.
    pub fn schedule(&self, jobs: &[Job], algorithm: Algorithm) -> Result<Schedule, SchedulerError> {
        // ── Preconditions ─────────────────────────────────────────────────────
        validate_jobs(jobs)?;

        info!(
            algorithm = algorithm.name(),
            job_count = jobs.len(),
            "=== JobScheduler::schedule() ==="
        );

        // ── Algorithm dispatch ────────────────────────────────────────────────
        let schedule = match algorithm {
            Algorithm::Greedy => Schedule::new(algorithm.name(), greedy::schedule_greedy(jobs)),
            Algorithm::Exact => {
                let (entries, optimum) = exact::schedule_exact(jobs)?;
                let schedule = Schedule::new(algorithm.name(), entries);
                if schedule.total_profit != optimum {
                    error!(
                        optimum,
                        accounted = schedule.total_profit,
                        "exact schedule does not account to its own optimum"
                    );
                }
                debug_assert_eq!(schedule.total_profit, optimum);
                schedule
            }
            Algorithm::OnlineStatic => self.run_online(jobs, &mut FirstFit::new()),
            Algorithm::OnlineHighScore => self.run_online(jobs, &mut HighestDensity::new()),
            Algorithm::OnlineDynamic => {
                self.run_online(jobs, &mut DynamicDecay::new(self.exponents))
            }
        };

        info!(
            algorithm = algorithm.name(),
            completed = schedule.completed_count(),
            total = schedule.jobs.len(),
            total_profit = schedule.total_profit,
            "=== Scheduling complete ==="
        );

        Ok(schedule)
    }

    /// Schedule with an algorithm given by name.
    pub fn schedule_named(&self, jobs: &[Job], algorithm: &str) -> Result<Schedule, SchedulerError> {
        self.schedule(jobs, algorithm.parse()?)
    }

    fn run_online(&self, jobs: &[Job], policy: &mut dyn DispatchPolicy) -> Schedule {
        Schedule::new(policy.name(), online::simulate(jobs, policy))
    }
}

/// Reject jobs that break the window invariants and duplicate ids.
fn validate_jobs(jobs: &[Job]) -> Result<(), SchedulerError> {
    let mut seen = HashSet::with_capacity(jobs.len());
    for job in jobs {
        job.validate()
            .map_err(|reason| SchedulerError::InvalidJob { id: job.id, reason })?;
        if !seen.insert(job.id) {
            return Err(SchedulerError::DuplicateJobId(job.id));
        }
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::InvalidJobReason;
    use crate::schedule::{Outcome, RejectReason};

    fn job(id: u32, r: i64, d: i64, p: i64, w: i64, l: i64) -> Job {
        Job::new(id, r, d, p, w, l).unwrap()
    }

    fn sched() -> JobScheduler {
        JobScheduler::default()
    }

    // ── Algorithm names ───────────────────────────────────────────────────────

    #[test]
    fn algorithm_names_round_trip() {
        for a in Algorithm::ALL {
            assert_eq!(a.name().parse::<Algorithm>().unwrap(), a);
            assert_eq!(a.to_string(), a.name());
        }
    }

    #[test]
    fn unknown_algorithm_returns_error() {
        let err = sched()
            .schedule_named(&[job(1, 0, 0, 1, 1, 1)], "round_robin_nonsense")
            .unwrap_err();
        assert!(matches!(err, SchedulerError::UnknownAlgorithm(_)));
    }

    #[test]
    fn online_flag_matches_variants() {
        assert!(!Algorithm::Greedy.is_online());
        assert!(!Algorithm::Exact.is_online());
        assert!(Algorithm::OnlineStatic.is_online());
        assert!(Algorithm::OnlineHighScore.is_online());
        assert!(Algorithm::OnlineDynamic.is_online());
    }

    // ── Preconditions ─────────────────────────────────────────────────────────

    #[test]
    fn invalid_struct_literal_job_is_refused() {
        let bad = Job {
            id: 4,
            release: 3,
            deadline: 1,
            processing: 1,
            reward: 1,
            penalty: 1,
        };
        for a in Algorithm::ALL {
            let err = sched().schedule(&[bad], a).unwrap_err();
            assert!(matches!(
                err,
                SchedulerError::InvalidJob {
                    id: 4,
                    reason: InvalidJobReason::DeadlineBeforeRelease { .. }
                }
            ));
        }
    }

    #[test]
    fn extreme_values_are_refused_before_any_arithmetic() {
        let bad = Job {
            id: 9,
            release: 0,
            deadline: 1,
            processing: 1,
            reward: i64::MAX,
            penalty: i64::MIN,
        };
        for a in Algorithm::ALL {
            let err = sched().schedule(&[bad], a).unwrap_err();
            assert!(matches!(
                err,
                SchedulerError::InvalidJob {
                    id: 9,
                    reason: InvalidJobReason::OutOfRange { field: "reward", .. }
                }
            ));
        }
    }

    #[test]
    fn duplicate_ids_are_refused() {
        let err = sched()
            .schedule(&[job(1, 0, 1, 1, 1, 1), job(1, 0, 1, 1, 1, 1)], Algorithm::Greedy)
            .unwrap_err();
        assert!(matches!(err, SchedulerError::DuplicateJobId(1)));
    }

    #[test]
    fn empty_job_list_gives_empty_schedule() {
        for a in Algorithm::ALL {
            let s = sched().schedule(&[], a).unwrap();
            assert!(s.jobs.is_empty());
            assert_eq!(s.total_profit, 0);
        }
    }

    // ── Scenarios ─────────────────────────────────────────────────────────────

    #[test]
    fn single_job_scores_reward_everywhere() {
        for a in Algorithm::ALL {
            let s = sched().schedule(&[job(1, 0, 0, 1, 10, 5)], a).unwrap();
            assert_eq!(s.jobs[0].slots(), Some(&[0][..]), "{a}");
            assert_eq!(s.total_profit, 10, "{a}");
        }
    }

    #[test]
    fn two_overlapping_jobs_both_fit_everywhere() {
        let jobs = [job(1, 0, 1, 1, 7, 2), job(2, 0, 1, 1, 3, 2)];
        for a in Algorithm::ALL {
            let s = sched().schedule(&jobs, a).unwrap();
            assert_eq!(s.total_profit, 10, "{a}");
        }
    }

    #[test]
    fn infeasible_job_is_null_with_penalty_everywhere() {
        for a in Algorithm::ALL {
            let s = sched().schedule(&[job(1, 0, 0, 2, 10, 6)], a).unwrap();
            assert_eq!(s.jobs[0].outcome, Outcome::Rejected(RejectReason::Infeasible), "{a}");
            assert_eq!(s.total_profit, -6, "{a}");
        }
    }

    #[test]
    fn horizon_overflow_only_blocks_exact() {
        let jobs = [job(1, 65, 70, 2, 10, 1)];
        let err = sched().schedule(&jobs, Algorithm::Exact).unwrap_err();
        assert!(matches!(err, SchedulerError::HorizonOverflow { horizon: 70, .. }));

        for a in Algorithm::ALL.into_iter().filter(|a| *a != Algorithm::Exact) {
            let s = sched().schedule(&jobs, a).unwrap();
            assert_eq!(s.total_profit, 10, "{a}");
        }
    }

    #[test]
    fn schedule_label_matches_algorithm() {
        for a in Algorithm::ALL {
            let s = sched().schedule(&[job(1, 0, 0, 1, 1, 1)], a).unwrap();
            assert_eq!(s.algorithm, a.name());
        }
    }

    // ── General ───────────────────────────────────────────────────────────────

    #[test]
    fn scheduler_is_deterministic() {
        let jobs = vec![
            job(1, 0, 6, 3, 12, 4),
            job(2, 1, 4, 2, 9, 7),
            job(3, 2, 3, 1, 5, 1),
            job(4, 0, 8, 4, 20, 3),
            job(5, 5, 8, 2, 8, 8),
        ];
        for a in Algorithm::ALL {
            let reference = sched().schedule(&jobs, a).unwrap();
            for _ in 0..20 {
                assert_eq!(sched().schedule(&jobs, a).unwrap(), reference, "{a}");
            }
        }
    }

    #[test]
    fn independent_runs_in_parallel_agree_with_sequential() {
        let jobs = vec![
            job(1, 0, 5, 2, 10, 2),
            job(2, 1, 3, 2, 8, 6),
            job(3, 0, 2, 1, 4, 4),
        ];
        let scheduler = sched();
        let sequential: Vec<Schedule> = Algorithm::ALL
            .iter()
            .map(|&a| scheduler.schedule(&jobs, a).unwrap())
            .collect();

        let parallel: Vec<Schedule> = std::thread::scope(|s| {
            let handles: Vec<_> = Algorithm::ALL
                .iter()
                .map(|&a| {
                    let (scheduler, jobs) = (&scheduler, &jobs);
                    s.spawn(move || scheduler.schedule(jobs, a).unwrap())
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(sequential, parallel);
    }

    #[test]
    fn custom_exponents_reach_dynamic_policy() {
        // With C = D = 0 the dynamic score reduces to (w + l) / p, so job 2
        // (density 10) beats job 1 (density 6) for the single shared slot.
        let exps = ScoreExponents {
            time_left_exponent: 0.0,
            work_left_exponent: 0.0,
            ..Default::default()
        };
        let jobs = [job(1, 0, 0, 1, 6, 0), job(2, 0, 0, 1, 1, 9)];
        let s = JobScheduler::new(exps)
            .schedule(&jobs, Algorithm::OnlineDynamic)
            .unwrap();
        assert!(s.get(2).unwrap().is_completed());
        assert_eq!(s.total_profit, 1);
    }
}
