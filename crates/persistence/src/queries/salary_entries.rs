// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Salary entry and disbursement total queries.

use std::collections::{BTreeMap, HashMap};

use diesel::SqliteConnection;
use diesel::prelude::*;
use payroll_advice_domain::{
    AdviceNumber, BranchKey, DisbursementGroup, SchoolTypeKey, format_iso_date, parse_iso_date,
};
use time::Date;
use tracing::debug;

use crate::data_models::{SalaryEntryData, StaleSalaryEntry};
use crate::diesel_schema::{salary_entries, schools};
use crate::error::PersistenceError;
use crate::queries::mappings::find_all_mappings_for_date;

#[derive(Queryable, Selectable)]
#[diesel(table_name = salary_entries)]
struct SalaryEntryRow {
    entry_id: i64,
    school_id: i64,
    entry_date: String,
    amount_minor_units: i64,
    advice_number: Option<String>,
}

impl TryFrom<SalaryEntryRow> for SalaryEntryData {
    type Error = PersistenceError;

    fn try_from(row: SalaryEntryRow) -> Result<Self, Self::Error> {
        let reconstruct = |msg: String| {
            PersistenceError::ReconstructionError(format!("salary entry {}: {msg}", row.entry_id))
        };

        let entry_date: Date =
            parse_iso_date(&row.entry_date).map_err(|e| reconstruct(e.to_string()))?;
        let advice_number: Option<AdviceNumber> = row
            .advice_number
            .as_deref()
            .map(str::parse::<AdviceNumber>)
            .transpose()
            .map_err(|e| reconstruct(e.to_string()))?;

        Ok(Self {
            entry_id: row.entry_id,
            school_id: row.school_id,
            entry_date,
            amount_minor_units: row.amount_minor_units,
            advice_number,
        })
    }
}

fn group_keys(
    branch_id: i64,
    school_type_id: i64,
) -> Result<(BranchKey, SchoolTypeKey), PersistenceError> {
    let branch = BranchKey::new(branch_id)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
    let school_type = SchoolTypeKey::new(school_type_id)
        .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?;
    Ok((branch, school_type))
}

/// Retrieves a salary entry by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the entry does not exist.
pub fn get_salary_entry(
    conn: &mut SqliteConnection,
    entry_id: i64,
) -> Result<SalaryEntryData, PersistenceError> {
    let row: Option<SalaryEntryRow> = salary_entries::table
        .filter(salary_entries::entry_id.eq(entry_id))
        .select(SalaryEntryRow::as_select())
        .first(conn)
        .optional()?;

    row.ok_or_else(|| {
        PersistenceError::NotFound(format!("Salary entry with ID {entry_id} not found"))
    })?
    .try_into()
}

/// Lists the salary entries recorded for `date`, ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn list_salary_entries(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<Vec<SalaryEntryData>, PersistenceError> {
    let rows: Vec<SalaryEntryRow> = salary_entries::table
        .filter(salary_entries::entry_date.eq(format_iso_date(date)))
        .order(salary_entries::entry_id.asc())
        .select(SalaryEntryRow::as_select())
        .load(conn)?;

    rows.into_iter().map(SalaryEntryData::try_from).collect()
}

/// Totals the salary entries of `date` per `(branch, school type)`.
///
/// Groups are ordered by branch, then school type.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn load_disbursement_groups(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<Vec<DisbursementGroup>, PersistenceError> {
    let rows: Vec<(i64, i64, i64)> = salary_entries::table
        .inner_join(schools::table)
        .filter(salary_entries::entry_date.eq(format_iso_date(date)))
        .select((
            schools::branch_id,
            schools::school_type_id,
            salary_entries::amount_minor_units,
        ))
        .load(conn)?;

    let mut totals: BTreeMap<(BranchKey, SchoolTypeKey), (u32, i64)> = BTreeMap::new();
    for (branch_id, school_type_id, amount) in rows {
        let entry = totals
            .entry(group_keys(branch_id, school_type_id)?)
            .or_insert((0, 0));
        entry.0 += 1;
        entry.1 += amount;
    }

    debug!(%date, groups = totals.len(), "Loaded disbursement groups");

    Ok(totals
        .into_iter()
        .map(|((branch, school_type), (entry_count, total_minor_units))| DisbursementGroup {
            branch,
            school_type,
            entry_count,
            total_minor_units,
        })
        .collect())
}

/// Finds salary entries of `date` whose cached advice number does not match
/// the mapping of their `(date, branch, school type)`.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn find_stale_salary_entries(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<Vec<StaleSalaryEntry>, PersistenceError> {
    let expected: HashMap<(BranchKey, SchoolTypeKey), AdviceNumber> =
        find_all_mappings_for_date(conn, date)?
            .into_iter()
            .map(|m| ((m.key.branch(), m.key.school_type()), m.advice_number))
            .collect();

    let cached: Vec<(i64, i64, i64, Option<String>)> = salary_entries::table
        .inner_join(schools::table)
        .filter(salary_entries::entry_date.eq(format_iso_date(date)))
        .filter(salary_entries::advice_number.is_not_null())
        .order(salary_entries::entry_id.asc())
        .select((
            salary_entries::entry_id,
            schools::branch_id,
            schools::school_type_id,
            salary_entries::advice_number,
        ))
        .load(conn)?;

    let mut stale: Vec<StaleSalaryEntry> = Vec::new();
    for (entry_id, branch_id, school_type_id, advice_number) in cached {
        let Some(cached) = advice_number else {
            continue;
        };
        let mapped: Option<&AdviceNumber> = expected.get(&group_keys(branch_id, school_type_id)?);
        if mapped.map(AdviceNumber::as_str) != Some(cached.as_str()) {
            stale.push(StaleSalaryEntry {
                entry_id,
                cached,
                expected: mapped.cloned(),
            });
        }
    }

    Ok(stale)
}
