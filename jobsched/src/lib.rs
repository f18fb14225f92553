/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! jobsched – discrete-time preemptive job scheduling with rejection
//!
//! Module layout:
//!
//! ```text
//! lib.rs
//! ├── job             – Job record and window validation
//! ├── schedule        – Schedule output, per-job outcomes, occupancy view
//! ├── horizon         – time horizon and occupancy-mask limit
//! ├── instance        – flat-file instance parser / writer
//! ├── output          – result files and the CSV summary log
//! ├── config/         – YAML run configuration
//! └── scheduler/      – JobScheduler entry point
//!     ├── feasibility – feasibility, slack and static scores
//!     ├── calendar    – slot → job occupancy map
//!     ├── profit      – profit accounting
//!     ├── greedy      – offline heuristic
//!     ├── exact       – offline optimum (bitmask search)
//!     └── online/     – tick simulator + dispatch policies
//! ```

pub mod config;
pub mod horizon;
pub mod instance;
pub mod job;
pub mod output;
pub mod schedule;
pub mod scheduler;
