// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use payroll_advice_domain::{BranchKey, MappingKey};
use thiserror::Error;
use time::Date;

/// Errors returned by the advice number allocator.
#[derive(Debug, Error)]
pub enum AllocationError<E> {
    /// The backing store failed.
    #[error("storage error: {0}")]
    Store(#[from] E),

    /// Every serial of the date is taken and the overflow policy is strict.
    #[error("advice number serials exhausted for {date}: all 99 serials are allocated")]
    SerialExhausted { date: Date },

    /// The allocation kept losing duplicate-key races.
    #[error("allocation for {key} did not settle after {attempts} attempts")]
    Contention { key: MappingKey, attempts: u8 },
}

/// Errors that abort report assembly.
#[derive(Debug, Error)]
pub enum ReportError<E> {
    /// Reading the disbursement totals failed.
    #[error("failed to read disbursements for {date}: {source}")]
    Source {
        date: Date,
        #[source]
        source: E,
    },

    /// An advice number could not be allocated for one of the report lines.
    #[error("report aborted: {0}")]
    Allocation(#[from] AllocationError<E>),

    /// The branch has no disbursements on the date.
    #[error("branch {branch} has no disbursements on {date}")]
    EmptyBranch { branch: BranchKey, date: Date },
}
