// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types for the school-payroll advice number workflow.
//!
//! An advice number is an 8-digit reference of the form `YYMMDD` followed by
//! a two-digit daily serial. Each `(date, branch, school type)` combination is
//! mapped to exactly one advice number; the types here carry that vocabulary
//! without any knowledge of how mappings are stored.

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

mod advice_number;
mod dates;
mod error;
mod types;

#[cfg(test)]
mod tests;

pub use advice_number::{AdviceNumber, Serial};
pub use dates::{format_iso_date, parse_iso_date};
pub use error::DomainError;
pub use types::{
    AdviceNumberMapping, BranchKey, DEFAULT_GENERATED_BY, DisbursementGroup, MappingKey,
    NewAdviceMapping, SchoolTypeKey,
};
