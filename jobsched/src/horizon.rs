/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Time-horizon calculation.
//!
//! The horizon of an instance is the range of slots any job may touch:
//! `[min(r), max(d)]`.  The exact solver encodes occupancy as one bit per slot
//! in a `u64`, so it must refuse instances whose latest deadline does not fit.
//!
//! | Consumer | Horizon used |
//! |---|---|
//! | greedy | `max(d)` over all jobs, upper bound of the calendar |
//! | exact | `max(d)` over all jobs, checked against [`OCCUPANCY_MASK_LIMIT`] |
//! | online | `[min(r), max(d)]` over feasible jobs: the simulated ticks |

use tracing::warn;

use crate::job::{Job, Slot};
use crate::scheduler::feasibility::is_feasible;
use crate::scheduler::SchedulerError;

// ── Constants ─────────────────────────────────────────────────────────────────

/// Highest slot index the exact solver's occupancy mask can represent.
///
/// Slots `0..=62` map onto bits of a `u64`; bit 63 is never used.
pub const OCCUPANCY_MASK_LIMIT: Slot = 62;

// ── Horizon ───────────────────────────────────────────────────────────────────

/// Inclusive slot range spanned by a set of jobs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Horizon {
    /// Smallest release time.
    pub start: Slot,

    /// Largest deadline.
    pub end: Slot,
}

impl Horizon {
    /// Horizon over every job, or `None` for an empty list.
    pub fn of(jobs: &[Job]) -> Option<Self> {
        Self::spanning(jobs.iter())
    }

    /// Horizon over feasible jobs only, or `None` if no job is feasible.
    pub fn of_feasible(jobs: &[Job]) -> Option<Self> {
        Self::spanning(jobs.iter().filter(|j| is_feasible(j)))
    }

    fn spanning<'a>(jobs: impl Iterator<Item = &'a Job>) -> Option<Self> {
        jobs.fold(None, |acc: Option<Horizon>, job| {
            Some(match acc {
                None => Horizon {
                    start: job.release,
                    end: job.deadline,
                },
                Some(h) => Horizon {
                    start: h.start.min(job.release),
                    end: h.end.max(job.deadline),
                },
            })
        })
    }

    /// Number of slots in the range.  `u64` because `[0, Slot::MAX]` holds
    /// `2^32` slots.
    pub fn slot_count(&self) -> u64 {
        u64::from(self.end - self.start) + 1
    }
}

/// Check that every deadline in `jobs` fits in an occupancy mask whose highest
/// usable slot is `limit`.
///
/// # Errors
/// [`SchedulerError::HorizonOverflow`] when `max(d) > limit`.  The exact
/// solver must not run in that case.
pub fn check_mask_limit(jobs: &[Job], limit: Slot) -> Result<(), SchedulerError> {
    let Some(horizon) = Horizon::of(jobs) else {
        return Ok(());
    };
    if horizon.end > limit {
        warn!(
            horizon = horizon.end,
            limit, "time horizon exceeds the occupancy mask width"
        );
        return Err(SchedulerError::HorizonOverflow {
            horizon: horizon.end,
            limit,
        });
    }
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
