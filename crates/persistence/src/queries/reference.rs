// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Branch, school type and school queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use payroll_advice_domain::{BranchKey, SchoolTypeKey};

use crate::data_models::{BranchData, SchoolData, SchoolTypeData};
use crate::diesel_schema::{branches, school_types, schools};
use crate::error::PersistenceError;

#[derive(Queryable, Selectable)]
#[diesel(table_name = branches)]
struct BranchRow {
    #[diesel(column_name = branch_id)]
    id: i64,
    #[diesel(column_name = branch_code)]
    code: String,
    #[diesel(column_name = branch_name)]
    name: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = school_types)]
struct SchoolTypeRow {
    school_type_id: i64,
    type_name: String,
}

#[derive(Queryable, Selectable)]
#[diesel(table_name = schools)]
struct SchoolRow {
    school_id: i64,
    school_name: String,
    branch_id: i64,
    school_type_id: i64,
}

impl TryFrom<SchoolRow> for SchoolData {
    type Error = PersistenceError;

    fn try_from(row: SchoolRow) -> Result<Self, Self::Error> {
        Ok(Self {
            school_id: row.school_id,
            school_name: row.school_name,
            branch: BranchKey::new(row.branch_id)
                .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?,
            school_type: SchoolTypeKey::new(row.school_type_id)
                .map_err(|e| PersistenceError::ReconstructionError(e.to_string()))?,
        })
    }
}

/// Lists all branches ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_branches(conn: &mut SqliteConnection) -> Result<Vec<BranchData>, PersistenceError> {
    let rows: Vec<BranchRow> = branches::table
        .order(branches::branch_id.asc())
        .select(BranchRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| BranchData {
            branch_id: row.id,
            branch_code: row.code,
            branch_name: row.name,
        })
        .collect())
}

/// Lists all school types ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_school_types(
    conn: &mut SqliteConnection,
) -> Result<Vec<SchoolTypeData>, PersistenceError> {
    let rows: Vec<SchoolTypeRow> = school_types::table
        .order(school_types::school_type_id.asc())
        .select(SchoolTypeRow::as_select())
        .load(conn)?;

    Ok(rows
        .into_iter()
        .map(|row| SchoolTypeData {
            school_type_id: row.school_type_id,
            type_name: row.type_name,
        })
        .collect())
}

/// Retrieves a school by ID.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the school does not exist.
pub fn get_school(
    conn: &mut SqliteConnection,
    school_id: i64,
) -> Result<SchoolData, PersistenceError> {
    let row: Option<SchoolRow> = schools::table
        .filter(schools::school_id.eq(school_id))
        .select(SchoolRow::as_select())
        .first(conn)
        .optional()?;

    row.ok_or_else(|| PersistenceError::NotFound(format!("School with ID {school_id} not found")))?
        .try_into()
}

/// Lists all schools ordered by ID.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn list_schools(conn: &mut SqliteConnection) -> Result<Vec<SchoolData>, PersistenceError> {
    let rows: Vec<SchoolRow> = schools::table
        .order(schools::school_id.asc())
        .select(SchoolRow::as_select())
        .load(conn)?;

    rows.into_iter().map(SchoolData::try_from).collect()
}
