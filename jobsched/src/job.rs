/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Core job data structure shared by every scheduler.
//!
//! ```text
//! instance file ──(instance::parse)──►  Job  ──(scheduler)──►  ScheduledJob  ──(output)──►  results
//!                                        ↑ input                    ↑ output
//!                                        immutable, Copy            per-run annotations
//! ```
//!
//! # Ownership model
//! `Job` only carries the immutable input fields and is `Copy`, so every
//! scheduling run works on its own private copies.  Per-run annotations
//! (feasibility, score, remaining work, assigned slots) live in the scheduler
//! that computes them and are never written back into the shared job list.

/// 1-based job identifier, assigned from the position in the input sequence.
pub type JobId = u32;

/// Integer time-slot index.
pub type Slot = u32;

/// Largest accepted `|w|` and `|l|`.  Keeps `w + l` and profit sums over
/// millions of jobs inside `i64`.
pub const MAX_VALUE_MAGNITUDE: i64 = 1_000_000_000_000;

// ── Validation ────────────────────────────────────────────────────────────────

/// Why a set of raw job fields does not describe a valid job.
///
/// Carried by both [`InstanceError::InvalidJob`] (parse time, with the line
/// number) and [`SchedulerError::InvalidJob`] (schedule time, with the job id).
///
/// [`InstanceError::InvalidJob`]: crate::instance::InstanceError::InvalidJob
/// [`SchedulerError::InvalidJob`]: crate::scheduler::SchedulerError::InvalidJob
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvalidJobReason {
    /// Release time is below zero.
    NegativeRelease { release: i64 },

    /// Deadline lies before the release time.
    DeadlineBeforeRelease { release: i64, deadline: i64 },

    /// Processing time must be at least one slot.
    ZeroProcessing { processing: i64 },

    /// A time field does not fit a [`Slot`], or a reward/penalty exceeds
    /// [`MAX_VALUE_MAGNITUDE`].
    OutOfRange { field: &'static str, value: i64 },
}

impl std::fmt::Display for InvalidJobReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InvalidJobReason::NegativeRelease { release } => {
                write!(f, "release time {} is negative", release)
            }
            InvalidJobReason::DeadlineBeforeRelease { release, deadline } => write!(
                f,
                "deadline {} lies before release time {}",
                deadline, release
            ),
            InvalidJobReason::ZeroProcessing { processing } => write!(
                f,
                "processing time {} must be at least 1 slot",
                processing
            ),
            InvalidJobReason::OutOfRange { field, value } => {
                write!(f, "{} = {} is out of range", field, value)
            }
        }
    }
}

// ── Job ───────────────────────────────────────────────────────────────────────

/// A unit-slot job with a release/deadline window, a completion reward and a
/// rejection penalty.
///
/// The window `[release, deadline]` is inclusive on both ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Job {
    pub id: JobId,

    /// First slot the job may occupy (`r`).
    pub release: Slot,

    /// Last slot the job may occupy, inclusive (`d`).
    pub deadline: Slot,

    /// Number of unit slots the job needs (`p`).
    pub processing: u32,

    /// Earned when the job completes all `processing` slots (`w`).
    pub reward: i64,

    /// Charged when the job is rejected or left incomplete (`l`).
    pub penalty: i64,
}

impl Job {
    /// Build a job from raw integer fields, validating the window.
    ///
    /// Infeasible windows (`d - r + 1 < p`) are **not** an error here: an
    /// infeasible job is a first-class outcome that every scheduler rejects
    /// with its penalty.
    pub fn new(
        id: JobId,
        release: i64,
        deadline: i64,
        processing: i64,
        reward: i64,
        penalty: i64,
    ) -> Result<Self, InvalidJobReason> {
        if release < 0 {
            return Err(InvalidJobReason::NegativeRelease { release });
        }
        if deadline < release {
            return Err(InvalidJobReason::DeadlineBeforeRelease { release, deadline });
        }
        if processing < 1 {
            return Err(InvalidJobReason::ZeroProcessing { processing });
        }

        let slot = |field: &'static str, value: i64| {
            Slot::try_from(value).map_err(|_| InvalidJobReason::OutOfRange { field, value })
        };
        let job = Self {
            id,
            release: slot("release", release)?,
            deadline: slot("deadline", deadline)?,
            processing: slot("processing", processing)?,
            reward,
            penalty,
        };
        job.check_values()?;
        Ok(job)
    }

    /// Re-check the invariants of a job that may have been built with a struct
    /// literal instead of [`Job::new`].
    pub fn validate(&self) -> Result<(), InvalidJobReason> {
        if self.deadline < self.release {
            return Err(InvalidJobReason::DeadlineBeforeRelease {
                release: self.release.into(),
                deadline: self.deadline.into(),
            });
        }
        if self.processing == 0 {
            return Err(InvalidJobReason::ZeroProcessing { processing: 0 });
        }
        self.check_values()
    }

    fn check_values(&self) -> Result<(), InvalidJobReason> {
        for (field, value) in [("reward", self.reward), ("penalty", self.penalty)] {
            if !(-MAX_VALUE_MAGNITUDE..=MAX_VALUE_MAGNITUDE).contains(&value) {
                return Err(InvalidJobReason::OutOfRange { field, value });
            }
        }
        Ok(())
    }

    /// Number of slots in the inclusive window `[release, deadline]`.
    pub fn window_len(&self) -> u32 {
        self.deadline.saturating_sub(self.release).saturating_add(1)
    }

    /// Returns `true` if `slot` lies inside the job's window.
    pub fn window_contains(&self, slot: Slot) -> bool {
        self.release <= slot && slot <= self.deadline
    }

    /// Iterator over every slot of the window in ascending order.
    pub fn window(&self) -> std::ops::RangeInclusive<Slot> {
        self.release..=self.deadline
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
