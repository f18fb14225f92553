/*
SPDX-FileCopyrightText: Copyright 2026 LG Electronics Inc.
SPDX-License-Identifier: MIT
*/

//! Profit accounting shared by every scheduler.

use crate::schedule::ScheduledJob;

/// `Σ w(completed) − Σ l(rejected)`, including jobs rejected as infeasible.
///
/// Pure function of the outcomes, so recomputing it from the same schedule
/// always yields the same value.
pub fn total_profit(jobs: &[ScheduledJob]) -> i64 {
    jobs.iter().map(ScheduledJob::contribution).sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::Job;
    use crate::schedule::RejectReason;

    #[test]
    fn empty_schedule_has_zero_profit() {
        assert_eq!(total_profit(&[]), 0);
    }

    #[test]
    fn rewards_minus_penalties() {
        let a = Job::new(1, 0, 1, 1, 30, 4).unwrap();
        let b = Job::new(2, 0, 0, 2, 50, 6).unwrap();
        let c = Job::new(3, 0, 1, 1, 20, 9).unwrap();
        let jobs = vec![
            ScheduledJob::completed(a, vec![0]),
            ScheduledJob::rejected(b, RejectReason::Infeasible),
            ScheduledJob::rejected(c, RejectReason::NoRoom),
        ];
        assert_eq!(total_profit(&jobs), 30 - 6 - 9);
        assert_eq!(total_profit(&jobs), total_profit(&jobs));
    }
}
