// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Advice number mapping queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use num_traits::ToPrimitive;
use payroll_advice_domain::{
    AdviceNumber, AdviceNumberMapping, BranchKey, MappingKey, SchoolTypeKey, Serial,
    format_iso_date, parse_iso_date,
};
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime};
use tracing::debug;

use crate::diesel_schema::advice_number_mappings;
use crate::error::PersistenceError;

/// Diesel Queryable struct for mapping rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = advice_number_mappings)]
struct MappingRow {
    mapping_id: i64,
    advice_number: String,
    mapping_date: String,
    branch_id: i64,
    school_type_id: i64,
    serial: i32,
    generated_by: String,
    created_at: String,
}

/// Converts a stored serial column value into a `Serial`.
fn serial_from_column(value: i32) -> Result<Serial, PersistenceError> {
    let narrowed: u8 = value.to_u8().ok_or_else(|| {
        PersistenceError::ReconstructionError(format!("serial {value} out of range"))
    })?;
    Serial::new(narrowed).map_err(|e| PersistenceError::ReconstructionError(e.to_string()))
}

impl TryFrom<MappingRow> for AdviceNumberMapping {
    type Error = PersistenceError;

    fn try_from(row: MappingRow) -> Result<Self, Self::Error> {
        let reconstruct = |e: &dyn std::fmt::Display| {
            PersistenceError::ReconstructionError(format!("mapping {}: {e}", row.mapping_id))
        };

        let date: Date = parse_iso_date(&row.mapping_date).map_err(|e| reconstruct(&e))?;
        let branch: BranchKey = BranchKey::new(row.branch_id).map_err(|e| reconstruct(&e))?;
        let school_type: SchoolTypeKey =
            SchoolTypeKey::new(row.school_type_id).map_err(|e| reconstruct(&e))?;
        let advice_number: AdviceNumber = row
            .advice_number
            .parse()
            .map_err(|e: payroll_advice_domain::DomainError| reconstruct(&e))?;
        let serial: Serial = serial_from_column(row.serial)?;
        let created_at: OffsetDateTime =
            OffsetDateTime::parse(&row.created_at, &Rfc3339).map_err(|e| reconstruct(&e))?;

        Ok(Self {
            mapping_id: row.mapping_id,
            advice_number,
            key: MappingKey::new(date, branch, school_type),
            serial,
            generated_by: row.generated_by,
            created_at,
        })
    }
}

/// Retrieves the mapping for an exact `(date, branch, school type)` triple.
///
/// # Errors
///
/// Returns an error if the query fails or the stored row is invalid.
/// Returns `Ok(None)` if no mapping exists.
pub fn find_mapping_by_key(
    conn: &mut SqliteConnection,
    key: &MappingKey,
) -> Result<Option<AdviceNumberMapping>, PersistenceError> {
    debug!(%key, "Looking up advice number mapping");

    let row: Option<MappingRow> = advice_number_mappings::table
        .filter(advice_number_mappings::mapping_date.eq(format_iso_date(key.date())))
        .filter(advice_number_mappings::branch_id.eq(key.branch().value()))
        .filter(advice_number_mappings::school_type_id.eq(key.school_type().value()))
        .select(MappingRow::as_select())
        .first(conn)
        .optional()?;

    row.map(AdviceNumberMapping::try_from).transpose()
}

/// Returns the highest serial stored for `date`, or `None` if the date has
/// no mappings.
///
/// # Errors
///
/// Returns an error if the query fails or the stored serial is invalid.
pub fn find_max_serial(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<Option<Serial>, PersistenceError> {
    let max: Option<i32> = advice_number_mappings::table
        .filter(advice_number_mappings::mapping_date.eq(format_iso_date(date)))
        .select(diesel::dsl::max(advice_number_mappings::serial))
        .get_result(conn)?;

    debug!(%date, ?max, "Maximum serial for date");
    max.map(serial_from_column).transpose()
}

/// Returns every mapping for `date`, ordered by serial.
///
/// # Errors
///
/// Returns an error if the query fails or a stored row is invalid.
pub fn find_all_mappings_for_date(
    conn: &mut SqliteConnection,
    date: Date,
) -> Result<Vec<AdviceNumberMapping>, PersistenceError> {
    let rows: Vec<MappingRow> = advice_number_mappings::table
        .filter(advice_number_mappings::mapping_date.eq(format_iso_date(date)))
        .order((
            advice_number_mappings::serial.asc(),
            advice_number_mappings::mapping_id.asc(),
        ))
        .select(MappingRow::as_select())
        .load(conn)?;

    rows.into_iter()
        .map(AdviceNumberMapping::try_from)
        .collect()
}

/// Counts all stored mappings.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn count_mappings(conn: &mut SqliteConnection) -> Result<i64, PersistenceError> {
    Ok(advice_number_mappings::table.count().get_result(conn)?)
}
