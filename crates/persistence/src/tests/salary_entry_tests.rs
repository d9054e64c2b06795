// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Salary entry caching and stale cache detection.

use diesel::prelude::*;
use payroll_advice::AdviceAllocator;
use payroll_advice_domain::{BranchKey, SchoolTypeKey};

use super::{add_paid_school, create_fixture, key, test_date};
use crate::diesel_schema::salary_entries;

#[test]
fn test_entries_start_without_advice_number() {
    let mut fixture = create_fixture(1, 1);
    let entry = add_paid_school(&mut fixture.persistence, "North", 1, 1, test_date(), 1_500);

    let stored = fixture.persistence.get_salary_entry(entry).unwrap();

    assert_eq!(stored.entry_date, test_date());
    assert_eq!(stored.amount_minor_units, 1_500);
    assert_eq!(stored.advice_number, None);
}

#[test]
fn test_stamping_fills_only_covered_entries() {
    let mut fixture = create_fixture(2, 2);
    let p = &mut fixture.persistence;
    let covered_a = add_paid_school(p, "A", 1, 1, test_date(), 100);
    let covered_b = add_paid_school(p, "B", 1, 1, test_date(), 200);
    let other_type = add_paid_school(p, "C", 1, 2, test_date(), 300);
    let other_branch = add_paid_school(p, "D", 2, 1, test_date(), 400);

    let mut allocator = AdviceAllocator::new(fixture.persistence);
    let allocation = allocator
        .allocate_and_stamp(&key(test_date(), 1, 1), "Manual")
        .unwrap();

    assert!(allocation.created);
    assert_eq!(allocation.stamped_entries, 2);
    let p = allocator.store_mut();
    for entry in [covered_a, covered_b] {
        assert_eq!(
            p.get_salary_entry(entry).unwrap().advice_number,
            Some(allocation.advice_number.clone())
        );
    }
    for entry in [other_type, other_branch] {
        assert_eq!(p.get_salary_entry(entry).unwrap().advice_number, None);
    }
}

#[test]
fn test_stamping_other_day_entries_is_untouched() {
    let mut fixture = create_fixture(1, 1);
    let p = &mut fixture.persistence;
    let school = p.create_school("North", 1, 1).unwrap();
    let today = p.record_salary_entry(school, test_date(), 100).unwrap();
    let tomorrow = p
        .record_salary_entry(school, test_date().next_day().unwrap(), 100)
        .unwrap();

    let mut allocator = AdviceAllocator::new(fixture.persistence);
    allocator
        .allocate_and_stamp(&key(test_date(), 1, 1), "Manual")
        .unwrap();

    let p = allocator.store_mut();
    assert!(p.get_salary_entry(today).unwrap().advice_number.is_some());
    assert!(
        p.get_salary_entry(tomorrow)
            .unwrap()
            .advice_number
            .is_none()
    );
}

#[test]
fn test_late_entry_is_stamped_on_next_report_with_same_number() {
    let mut fixture = create_fixture(1, 1);
    let early = add_paid_school(&mut fixture.persistence, "Early", 1, 1, test_date(), 100);

    let mut allocator = AdviceAllocator::new(fixture.persistence);
    let first = allocator
        .allocate_and_stamp(&key(test_date(), 1, 1), "BranchReport")
        .unwrap();

    let late = add_paid_school(allocator.store_mut(), "Late", 1, 1, test_date(), 50);
    let second = allocator
        .allocate_and_stamp(&key(test_date(), 1, 1), "SchoolTypeSummary")
        .unwrap();

    assert!(!second.created);
    assert_eq!(second.advice_number, first.advice_number);
    assert_eq!(second.stamped_entries, 1);
    let p = allocator.store_mut();
    assert_eq!(
        p.get_salary_entry(early).unwrap().advice_number,
        p.get_salary_entry(late).unwrap().advice_number
    );
}

#[test]
fn test_consistent_caches_are_not_stale() {
    let mut fixture = create_fixture(1, 1);
    add_paid_school(&mut fixture.persistence, "North", 1, 1, test_date(), 100);

    let mut allocator = AdviceAllocator::new(fixture.persistence);
    allocator
        .allocate_and_stamp(&key(test_date(), 1, 1), "Manual")
        .unwrap();

    assert!(
        allocator
            .store_mut()
            .find_stale_salary_entries(test_date())
            .unwrap()
            .is_empty()
    );
}

#[test]
fn test_edited_cache_is_reported_stale() {
    let mut fixture = create_fixture(1, 2);
    let edited = add_paid_school(&mut fixture.persistence, "North", 1, 1, test_date(), 100);
    let orphan = add_paid_school(&mut fixture.persistence, "South", 1, 2, test_date(), 100);

    let mut allocator = AdviceAllocator::new(fixture.persistence);
    let advice = allocator
        .allocate_and_stamp(&key(test_date(), 1, 1), "Manual")
        .unwrap()
        .advice_number;

    let p = allocator.store_mut();
    diesel::update(salary_entries::table.filter(salary_entries::entry_id.eq(edited)))
        .set(salary_entries::advice_number.eq(Some("25120642")))
        .execute(&mut p.conn)
        .unwrap();
    diesel::update(salary_entries::table.filter(salary_entries::entry_id.eq(orphan)))
        .set(salary_entries::advice_number.eq(Some("25120643")))
        .execute(&mut p.conn)
        .unwrap();

    let stale = p.find_stale_salary_entries(test_date()).unwrap();

    assert_eq!(stale.len(), 2);
    assert_eq!(stale[0].entry_id, edited);
    assert_eq!(stale[0].cached, "25120642");
    assert_eq!(stale[0].expected, Some(advice));
    assert_eq!(stale[1].entry_id, orphan);
    assert_eq!(stale[1].expected, None);
}

#[test]
fn test_disbursement_groups_total_per_branch_and_type() {
    use payroll_advice::DisbursementSource;

    let mut fixture = create_fixture(2, 2);
    let p = &mut fixture.persistence;
    add_paid_school(p, "A", 2, 1, test_date(), 100);
    add_paid_school(p, "B", 2, 1, test_date(), 250);
    add_paid_school(p, "C", 1, 2, test_date(), 75);
    add_paid_school(p, "D", 1, 2, test_date().next_day().unwrap(), 999);

    let groups = p.disbursement_groups(test_date()).unwrap();

    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0].branch, BranchKey::new(1).unwrap());
    assert_eq!(groups[0].school_type, SchoolTypeKey::new(2).unwrap());
    assert_eq!(groups[0].entry_count, 1);
    assert_eq!(groups[0].total_minor_units, 75);
    assert_eq!(groups[1].branch, BranchKey::new(2).unwrap());
    assert_eq!(groups[1].entry_count, 2);
    assert_eq!(groups[1].total_minor_units, 350);
}
