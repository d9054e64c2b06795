// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

mod report_tests;
mod salary_entry_tests;

use payroll_advice_domain::{BranchKey, MappingKey, SchoolTypeKey};
use time::{Date, Month};

use crate::SqlitePersistence;

/// Returns December 6, 2025, the date the advice number examples are built
/// around.
pub fn test_date() -> Date {
    Date::from_calendar_date(2025, Month::December, 6).expect("Valid test date")
}

pub fn key(date: Date, branch_id: i64, school_type_id: i64) -> MappingKey {
    MappingKey::new(
        date,
        BranchKey::new(branch_id).expect("Valid branch"),
        SchoolTypeKey::new(school_type_id).expect("Valid school type"),
    )
}

/// Reference data for allocation tests.
pub struct Fixture {
    pub persistence: SqlitePersistence,
    pub branches: Vec<i64>,
    pub school_types: Vec<i64>,
}

/// Creates `branch_count` branches and `type_count` school types in a fresh
/// in-memory database.
pub fn create_fixture(branch_count: usize, type_count: usize) -> Fixture {
    let mut persistence = SqlitePersistence::new_in_memory().expect("In-memory database");

    let branches: Vec<i64> = (1..=branch_count)
        .map(|n| {
            persistence
                .create_branch(&format!("BR{n:03}"), &format!("Branch {n}"))
                .expect("Branch created")
        })
        .collect();
    let school_types: Vec<i64> = (1..=type_count)
        .map(|n| {
            persistence
                .create_school_type(&format!("Type {n}"))
                .expect("School type created")
        })
        .collect();

    Fixture {
        persistence,
        branches,
        school_types,
    }
}

/// Creates a school under `branch_id` / `school_type_id` and records one
/// salary entry for it on `date`. Returns the entry ID.
pub fn add_paid_school(
    persistence: &mut SqlitePersistence,
    name: &str,
    branch_id: i64,
    school_type_id: i64,
    date: Date,
    amount_minor_units: i64,
) -> i64 {
    let school_id = persistence
        .create_school(name, branch_id, school_type_id)
        .expect("School created");
    persistence
        .record_salary_entry(school_id, date, amount_minor_units)
        .expect("Salary entry recorded")
}
