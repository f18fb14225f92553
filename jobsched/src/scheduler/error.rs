/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Structured error types for the scheduling engine.
//!
//! Only instance-level problems are errors.  Per-job outcomes (infeasible
//! windows, lost greedy races, missed online deadlines) are data carried in
//! [`Outcome`](crate::schedule::Outcome) and always resolve to a reward or a
//! penalty.
//!
//! | Variant | Raised by | Retry? |
//! |---|---|---|
//! | `UnknownAlgorithm` | [`Algorithm::from_str`](super::Algorithm) | fix the name |
//! | `InvalidJob` / `DuplicateJobId` | every scheduler, before any work | fix the input |
//! | `HorizonOverflow` | exact solver only | no, the instance is too large |
//! | `ReconstructionMismatch` | exact solver only | no, internal bug |

use thiserror::Error;

use crate::job::{InvalidJobReason, JobId, Slot};

/// Top-level error type returned by
/// [`JobScheduler::schedule()`](super::JobScheduler::schedule).
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// The algorithm name is not recognised.
    #[error("unknown scheduling algorithm: '{0}' (valid: greedy, exact, online_static, online_highscore, online_dynscore)")]
    UnknownAlgorithm(String),

    /// A job violates the basic window invariants (`d >= r`, `p >= 1`).
    #[error("job {id} is invalid: {reason}")]
    InvalidJob { id: JobId, reason: InvalidJobReason },

    /// Two jobs share the same id; ids must be unique per instance.
    #[error("job id {0} appears more than once")]
    DuplicateJobId(JobId),

    /// The latest deadline does not fit in the exact solver's occupancy mask.
    #[error("time horizon {horizon} exceeds the occupancy mask limit of {limit} slots; the exact solver cannot run on this instance")]
    HorizonOverflow { horizon: Slot, limit: Slot },

    /// The exact solver could not re-derive the choice that produced its own
    /// optimum.
    #[error("exact solver failed to reconstruct the decision for job {job}")]
    ReconstructionMismatch { job: JobId },
}
