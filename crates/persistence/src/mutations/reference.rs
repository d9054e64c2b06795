// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Reference data and salary entry mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use payroll_advice_domain::format_iso_date;
use time::Date;
use tracing::info;

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{branches, salary_entries, school_types, schools};
use crate::error::PersistenceError;

/// Creates a branch. The code is normalized to uppercase.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if the code is already in use.
pub fn create_branch(
    conn: &mut SqliteConnection,
    branch_code: &str,
    branch_name: &str,
) -> Result<i64, PersistenceError> {
    let normalized_code: String = branch_code.trim().to_uppercase();

    diesel::insert_into(branches::table)
        .values((
            branches::branch_code.eq(&normalized_code),
            branches::branch_name.eq(branch_name),
        ))
        .execute(conn)?;

    let branch_id: i64 = get_last_insert_rowid(conn)?;
    info!(branch_id, branch_code = %normalized_code, "Created branch");
    Ok(branch_id)
}

/// Creates a school type.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if the name is already in use.
pub fn create_school_type(
    conn: &mut SqliteConnection,
    type_name: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(school_types::table)
        .values(school_types::type_name.eq(type_name.trim()))
        .execute(conn)?;

    let school_type_id: i64 = get_last_insert_rowid(conn)?;
    info!(school_type_id, type_name, "Created school type");
    Ok(school_type_id)
}

/// Creates a school paid through `branch_id` and categorized as
/// `school_type_id`.
///
/// # Errors
///
/// Returns `PersistenceError::ForeignKeyViolation` if either reference does
/// not exist.
pub fn create_school(
    conn: &mut SqliteConnection,
    school_name: &str,
    branch_id: i64,
    school_type_id: i64,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(schools::table)
        .values((
            schools::school_name.eq(school_name),
            schools::branch_id.eq(branch_id),
            schools::school_type_id.eq(school_type_id),
        ))
        .execute(conn)?;

    let school_id: i64 = get_last_insert_rowid(conn)?;
    info!(school_id, branch_id, school_type_id, "Created school");
    Ok(school_id)
}

/// Records the salary disbursement of a school for a day. The advice number
/// cache starts empty.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if the school already has an
/// entry for `entry_date`, `PersistenceError::ForeignKeyViolation` if the
/// school does not exist, or `PersistenceError::ConstraintViolation` for a
/// negative amount.
pub fn record_salary_entry(
    conn: &mut SqliteConnection,
    school_id: i64,
    entry_date: Date,
    amount_minor_units: i64,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(salary_entries::table)
        .values((
            salary_entries::school_id.eq(school_id),
            salary_entries::entry_date.eq(format_iso_date(entry_date)),
            salary_entries::amount_minor_units.eq(amount_minor_units),
        ))
        .execute(conn)?;

    let entry_id: i64 = get_last_insert_rowid(conn)?;
    info!(entry_id, school_id, %entry_date, amount_minor_units, "Recorded salary entry");
    Ok(entry_id)
}
