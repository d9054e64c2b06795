// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Report assembly.
//!
//! Two independent flows consume advice numbers: the per-branch report and
//! the per-school-type summary. Both allocate through the same allocator, so
//! a `(date, branch, school type)` group carries the same advice number in
//! either report no matter which one is produced first. Rendering is left to
//! callers; these types only carry the numbers.

use payroll_advice_domain::{
    AdviceNumber, BranchKey, DisbursementGroup, MappingKey, SchoolTypeKey,
};
use serde::Serialize;
use time::Date;
use tracing::info;

use crate::allocator::AdviceAllocator;
use crate::error::ReportError;
use crate::store::DisbursementSource;

/// `generated_by` label recorded by the per-branch report.
pub const BRANCH_REPORT_LABEL: &str = "BranchReport";

/// `generated_by` label recorded by the per-school-type summary.
pub const SCHOOL_TYPE_SUMMARY_LABEL: &str = "SchoolTypeSummary";

/// One school type line of a branch report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchReportLine {
    pub school_type: SchoolTypeKey,
    pub advice_number: AdviceNumber,
    pub entry_count: u32,
    pub total_minor_units: i64,
}

/// Disbursements of one branch on one date, one line per school type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchReport {
    pub date: Date,
    pub branch: BranchKey,
    pub lines: Vec<BranchReportLine>,
    pub total_minor_units: i64,
}

/// One branch line inside a school type section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryLine {
    pub branch: BranchKey,
    pub advice_number: AdviceNumber,
    pub entry_count: u32,
    pub total_minor_units: i64,
}

/// All branches disbursing to one school type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolTypeSection {
    pub school_type: SchoolTypeKey,
    pub lines: Vec<SummaryLine>,
    pub total_minor_units: i64,
}

/// Disbursements of one date grouped by school type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SchoolTypeSummary {
    pub date: Date,
    pub sections: Vec<SchoolTypeSection>,
    pub total_minor_units: i64,
}

/// Builds the report for one branch on `date`.
///
/// Every line's advice number is allocated (or reused) and stamped onto the
/// covered salary entries. The first failure aborts the whole report.
///
/// # Errors
///
/// Returns `ReportError::EmptyBranch` if the branch has no disbursements,
/// `ReportError::Source` if the totals cannot be read, or
/// `ReportError::Allocation` if any advice number cannot be allocated.
pub fn build_branch_report<S: DisbursementSource>(
    allocator: &mut AdviceAllocator<S>,
    date: Date,
    branch: BranchKey,
) -> Result<BranchReport, ReportError<S::Error>> {
    let mut groups: Vec<DisbursementGroup> = read_groups(allocator, date)?
        .into_iter()
        .filter(|group| group.branch == branch)
        .collect();

    if groups.is_empty() {
        return Err(ReportError::EmptyBranch { branch, date });
    }
    groups.sort_by_key(|group| group.school_type);

    let mut lines: Vec<BranchReportLine> = Vec::with_capacity(groups.len());
    for group in groups {
        let key = MappingKey::new(date, group.branch, group.school_type);
        let allocation = allocator.allocate_and_stamp(&key, BRANCH_REPORT_LABEL)?;
        lines.push(BranchReportLine {
            school_type: group.school_type,
            advice_number: allocation.advice_number,
            entry_count: group.entry_count,
            total_minor_units: group.total_minor_units,
        });
    }

    let total_minor_units: i64 = lines.iter().map(|line| line.total_minor_units).sum();
    info!(%date, %branch, lines = lines.len(), "Built branch report");

    Ok(BranchReport {
        date,
        branch,
        lines,
        total_minor_units,
    })
}

/// Builds the school type summary for `date`.
///
/// Sections are ordered by school type and lines within a section by branch.
/// Allocation happens in that order for groups that have no advice number yet.
///
/// # Errors
///
/// Returns `ReportError::Source` if the totals cannot be read, or
/// `ReportError::Allocation` if any advice number cannot be allocated.
pub fn build_school_type_summary<S: DisbursementSource>(
    allocator: &mut AdviceAllocator<S>,
    date: Date,
) -> Result<SchoolTypeSummary, ReportError<S::Error>> {
    let mut groups: Vec<DisbursementGroup> = read_groups(allocator, date)?;
    groups.sort_by_key(|group| (group.school_type, group.branch));

    let mut sections: Vec<SchoolTypeSection> = Vec::new();
    for group in groups {
        let key = MappingKey::new(date, group.branch, group.school_type);
        let allocation = allocator.allocate_and_stamp(&key, SCHOOL_TYPE_SUMMARY_LABEL)?;
        let line = SummaryLine {
            branch: group.branch,
            advice_number: allocation.advice_number,
            entry_count: group.entry_count,
            total_minor_units: group.total_minor_units,
        };

        match sections.last_mut() {
            Some(section) if section.school_type == group.school_type => {
                section.total_minor_units += line.total_minor_units;
                section.lines.push(line);
            }
            _ => sections.push(SchoolTypeSection {
                school_type: group.school_type,
                total_minor_units: line.total_minor_units,
                lines: vec![line],
            }),
        }
    }

    let total_minor_units: i64 = sections
        .iter()
        .map(|section| section.total_minor_units)
        .sum();
    info!(%date, sections = sections.len(), "Built school type summary");

    Ok(SchoolTypeSummary {
        date,
        sections,
        total_minor_units,
    })
}

fn read_groups<S: DisbursementSource>(
    allocator: &mut AdviceAllocator<S>,
    date: Date,
) -> Result<Vec<DisbursementGroup>, ReportError<S::Error>> {
    allocator
        .store_mut()
        .disbursement_groups(date)
        .map_err(|source| ReportError::Source { date, source })
}
