// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Advice number mapping mutations.
//!
//! Mapping rows are only ever inserted. Salary entry caches are only ever
//! filled when empty.

use diesel::SqliteConnection;
use diesel::prelude::*;
use payroll_advice_domain::{
    AdviceNumber, AdviceNumberMapping, MappingKey, NewAdviceMapping, format_iso_date,
};
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

use crate::backend::sqlite::get_last_insert_rowid;
use crate::diesel_schema::{advice_number_mappings, salary_entries, schools};
use crate::error::PersistenceError;

/// Inserts a new mapping.
///
/// # Errors
///
/// Returns `PersistenceError::DuplicateKey` if the triple already has a
/// mapping, `PersistenceError::ForeignKeyViolation` if the branch or school
/// type does not exist, or another error if the insert fails.
pub fn insert_mapping(
    conn: &mut SqliteConnection,
    mapping: &NewAdviceMapping,
) -> Result<AdviceNumberMapping, PersistenceError> {
    let created_at: String = mapping.created_at.format(&Rfc3339)?;

    diesel::insert_into(advice_number_mappings::table)
        .values((
            advice_number_mappings::advice_number.eq(mapping.advice_number.as_str()),
            advice_number_mappings::mapping_date.eq(format_iso_date(mapping.key.date())),
            advice_number_mappings::branch_id.eq(mapping.key.branch().value()),
            advice_number_mappings::school_type_id.eq(mapping.key.school_type().value()),
            advice_number_mappings::serial.eq(i32::from(mapping.serial.value())),
            advice_number_mappings::generated_by.eq(&mapping.generated_by),
            advice_number_mappings::created_at.eq(&created_at),
        ))
        .execute(conn)?;

    let mapping_id: i64 = get_last_insert_rowid(conn)?;
    info!(
        mapping_id,
        advice_number = %mapping.advice_number,
        "Inserted advice number mapping"
    );

    Ok(AdviceNumberMapping {
        mapping_id,
        advice_number: mapping.advice_number.clone(),
        key: mapping.key,
        serial: mapping.serial,
        generated_by: mapping.generated_by.clone(),
        created_at: mapping.created_at,
    })
}

/// Writes `advice` into every salary entry of the key's date whose school
/// belongs to the key's branch and school type and whose cache is empty.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn stamp_salary_entries(
    conn: &mut SqliteConnection,
    key: &MappingKey,
    advice: &AdviceNumber,
) -> Result<usize, PersistenceError> {
    let covered_schools = schools::table
        .filter(schools::branch_id.eq(key.branch().value()))
        .filter(schools::school_type_id.eq(key.school_type().value()))
        .select(schools::school_id);

    let stamped: usize = diesel::update(
        salary_entries::table
            .filter(salary_entries::entry_date.eq(format_iso_date(key.date())))
            .filter(salary_entries::advice_number.is_null())
            .filter(salary_entries::school_id.eq_any(covered_schools)),
    )
    .set(salary_entries::advice_number.eq(Some(advice.as_str())))
    .execute(conn)?;

    debug!(%key, stamped, "Stamped salary entry advice numbers");
    Ok(stamped)
}
