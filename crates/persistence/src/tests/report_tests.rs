// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Both report flows against `SQLite`.

use payroll_advice::{
    AdviceAllocator, BRANCH_REPORT_LABEL, ReportError, build_branch_report,
    build_school_type_summary,
};
use payroll_advice_domain::BranchKey;

use super::{Fixture, add_paid_school, create_fixture, key, test_date};
use crate::SqlitePersistence;

/// Branch 1 pays type 1 and type 2 schools, branch 2 pays a type 1 school.
fn seeded_allocator() -> AdviceAllocator<SqlitePersistence> {
    let Fixture {
        mut persistence, ..
    } = create_fixture(2, 2);
    add_paid_school(&mut persistence, "North Primary", 1, 1, test_date(), 1_000);
    add_paid_school(&mut persistence, "North High", 1, 2, test_date(), 2_000);
    add_paid_school(&mut persistence, "South Primary", 2, 1, test_date(), 4_000);
    AdviceAllocator::new(persistence)
}

#[test]
fn test_summary_reuses_numbers_issued_by_branch_report() {
    let mut allocator = seeded_allocator();

    let report =
        build_branch_report(&mut allocator, test_date(), BranchKey::new(1).unwrap()).unwrap();
    let summary = build_school_type_summary(&mut allocator, test_date()).unwrap();

    assert_eq!(report.lines[0].advice_number.as_str(), "25120601");
    assert_eq!(report.lines[1].advice_number.as_str(), "25120602");

    let type_one = &summary.sections[0];
    assert_eq!(
        type_one.lines[0].advice_number,
        report.lines[0].advice_number
    );
    // Branch 2 was first seen by the summary.
    assert_eq!(type_one.lines[1].advice_number.as_str(), "25120603");
    assert_eq!(
        summary.sections[1].lines[0].advice_number,
        report.lines[1].advice_number
    );
    assert_eq!(summary.total_minor_units, 7_000);

    let stored = allocator.lookup(&key(test_date(), 1, 1)).unwrap();
    assert_eq!(stored, Some(report.lines[0].advice_number.clone()));
    assert_eq!(allocator.store_mut().count_mappings().unwrap(), 3);
}

#[test]
fn test_reports_stamp_every_entry_and_leave_no_stale_caches() {
    let mut allocator = seeded_allocator();

    build_school_type_summary(&mut allocator, test_date()).unwrap();

    let p = allocator.store_mut();
    let entries = p.list_salary_entries(test_date()).unwrap();
    assert_eq!(entries.len(), 3);
    assert!(entries.iter().all(|entry| entry.advice_number.is_some()));
    assert!(p.find_stale_salary_entries(test_date()).unwrap().is_empty());
}

#[test]
fn test_branch_report_labels_mappings_it_creates() {
    let mut allocator = seeded_allocator();

    build_branch_report(&mut allocator, test_date(), BranchKey::new(2).unwrap()).unwrap();

    let mappings = allocator.list_for_date(test_date()).unwrap();
    assert_eq!(mappings.len(), 1);
    assert_eq!(mappings[0].generated_by, BRANCH_REPORT_LABEL);
}

#[test]
fn test_branch_without_disbursements_is_rejected() {
    let Fixture {
        mut persistence, ..
    } = create_fixture(3, 1);
    add_paid_school(&mut persistence, "North", 1, 1, test_date(), 100);
    let mut allocator = AdviceAllocator::new(persistence);

    let err = build_branch_report(&mut allocator, test_date(), BranchKey::new(3).unwrap())
        .unwrap_err();

    assert!(matches!(err, ReportError::EmptyBranch { .. }));
    assert_eq!(allocator.store_mut().count_mappings().unwrap(), 0);
}
