/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Per-run slot calendar: slot → occupying job.
//!
//! `BTreeMap` (not `HashMap`) so iteration is always in slot order, required
//! for deterministic logging and output.  Idle slots are simply absent.

use std::collections::BTreeMap;

use tracing::debug;

use crate::job::{Job, JobId, Slot};

/// Sparse slot calendar owned by one scheduling run.
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    slots: BTreeMap<Slot, JobId>,
}

impl Calendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_free(&self, slot: Slot) -> bool {
        !self.slots.contains_key(&slot)
    }

    /// Job occupying `slot`, if any.
    pub fn occupant(&self, slot: Slot) -> Option<JobId> {
        self.slots.get(&slot).copied()
    }

    /// Mark `slot` as occupied by `job`.
    ///
    /// Returns `false` (and leaves the calendar unchanged) if the slot is
    /// already taken; a slot maps to at most one job.
    pub fn occupy(&mut self, slot: Slot, job: JobId) -> bool {
        match self.slots.entry(slot) {
            std::collections::btree_map::Entry::Occupied(e) => {
                debug!(slot, job, holder = *e.get(), "slot already occupied");
                false
            }
            std::collections::btree_map::Entry::Vacant(e) => {
                e.insert(job);
                true
            }
        }
    }

    /// Up to `count` free slots of `job`'s window, scanning from the deadline
    /// down to the release time.  Returned in scan (descending) order.
    pub fn latest_free(&self, job: &Job, count: usize) -> Vec<Slot> {
        job.window()
            .rev()
            .filter(|&t| self.is_free(t))
            .take(count)
            .collect()
    }

    /// Up to `count` free slots of `job`'s window in ascending order.
    pub fn earliest_free(&self, job: &Job, count: usize) -> Vec<Slot> {
        job.window()
            .filter(|&t| self.is_free(t))
            .take(count)
            .collect()
    }

    pub fn occupied_count(&self) -> usize {
        self.slots.len()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
