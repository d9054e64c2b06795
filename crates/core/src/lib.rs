// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Advice number allocation.
//!
//! The allocator maps a `(date, branch, school type)` triple to a single
//! canonical advice number, creating it on first request and returning the
//! stored value on every later one. Serials are assigned in arrival order
//! across all branches and school types of a date, and the store is the only
//! place the "next serial" is derived from.
//!
//! Both report flows (per-branch report and per-school-type summary) go through
//! the same [`AdviceAllocator`], which is what keeps their advice numbers in
//! agreement.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod allocator;
mod config;
mod error;
mod report;
mod store;

#[cfg(test)]
mod tests;

pub use allocator::{AdviceAllocator, Allocation};
pub use config::{AllocatorConfig, OverflowPolicy};
pub use error::{AllocationError, ReportError};
pub use report::{
    BRANCH_REPORT_LABEL, BranchReport, BranchReportLine, SCHOOL_TYPE_SUMMARY_LABEL,
    SchoolTypeSection, SchoolTypeSummary, SummaryLine, build_branch_report,
    build_school_type_summary,
};
pub use store::{DisbursementSource, MappingStore, StoreError};
