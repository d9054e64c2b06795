// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for advice number allocation.
//!
//! This crate stores advice number mappings, the reference data they point
//! at (branches, school types, schools), and the salary entries reports are
//! built from. It is built on Diesel over `SQLite`.
//!
//! ## Storage Model
//!
//! - `advice_number_mappings` is the single source of truth for advice
//!   numbers. Its `(mapping_date, branch_id, school_type_id)` uniqueness
//!   constraint is what makes allocation idempotent under concurrency.
//! - `salary_entries.advice_number` is a cache. It is written once, when a
//!   report first covers the entry, and can be checked against the mappings
//!   with [`Persistence::find_stale_salary_entries`].
//!
//! ## Transactions
//!
//! [`MappingStore::atomically`] opens a `BEGIN IMMEDIATE` transaction, so the
//! write lock is held from the maximum serial read until commit. Two
//! processes sharing a database file therefore allocate one at a time; the
//! second waits on `busy_timeout` instead of reading a stale maximum.
//!
//! ## Testing Philosophy
//!
//! - Tests run against isolated in-memory `SQLite` databases
//! - Each call to [`Persistence::new_in_memory`] gets its own database

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

use diesel::SqliteConnection;
use payroll_advice::{DisbursementSource, MappingStore};
use payroll_advice_domain::{
    AdviceNumber, AdviceNumberMapping, DisbursementGroup, MappingKey, NewAdviceMapping, Serial,
};
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use time::Date;
use tracing::warn;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{BranchData, SalaryEntryData, SchoolData, SchoolTypeData, StaleSalaryEntry};
pub use error::PersistenceError;

/// Type alias for callers that name the backend explicitly.
pub type SqlitePersistence = Persistence;

/// Persistence adapter for advice number mappings and salary entries.
pub struct Persistence {
    conn: SqliteConnection,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so instances never
    /// see each other's rows.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let db_name = format!("memdb_advice_{db_id}");
        let shared_memory_url = format!("file:{db_name}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// The file is created if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;

        // Readers do not block the allocating writer.
        backend::sqlite::enable_wal_mode(&mut conn)?;

        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        backend::sqlite::verify_foreign_key_enforcement(&mut self.conn)
    }

    // ========================================================================
    // Reference Data
    // ========================================================================

    /// Creates a branch and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is already in use or the insert fails.
    pub fn create_branch(
        &mut self,
        branch_code: &str,
        branch_name: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::create_branch(&mut self.conn, branch_code, branch_name)
    }

    /// Creates a school type and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is already in use or the insert fails.
    pub fn create_school_type(&mut self, type_name: &str) -> Result<i64, PersistenceError> {
        mutations::reference::create_school_type(&mut self.conn, type_name)
    }

    /// Creates a school and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the branch or school type does not exist.
    pub fn create_school(
        &mut self,
        school_name: &str,
        branch_id: i64,
        school_type_id: i64,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::create_school(&mut self.conn, school_name, branch_id, school_type_id)
    }

    /// Lists all branches.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_branches(&mut self) -> Result<Vec<BranchData>, PersistenceError> {
        queries::reference::list_branches(&mut self.conn)
    }

    /// Lists all school types.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_school_types(&mut self) -> Result<Vec<SchoolTypeData>, PersistenceError> {
        queries::reference::list_school_types(&mut self.conn)
    }

    /// Retrieves a school by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the school does not exist.
    pub fn get_school(&mut self, school_id: i64) -> Result<SchoolData, PersistenceError> {
        queries::reference::get_school(&mut self.conn, school_id)
    }

    /// Lists all schools.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_schools(&mut self) -> Result<Vec<SchoolData>, PersistenceError> {
        queries::reference::list_schools(&mut self.conn)
    }

    // ========================================================================
    // Salary Entries
    // ========================================================================

    /// Records a school's salary disbursement for a day and returns the entry
    /// ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the school already has an entry for the date, the
    /// school does not exist, or the amount is negative.
    pub fn record_salary_entry(
        &mut self,
        school_id: i64,
        entry_date: Date,
        amount_minor_units: i64,
    ) -> Result<i64, PersistenceError> {
        mutations::reference::record_salary_entry(
            &mut self.conn,
            school_id,
            entry_date,
            amount_minor_units,
        )
    }

    /// Retrieves a salary entry by ID.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::NotFound` if the entry does not exist.
    pub fn get_salary_entry(&mut self, entry_id: i64) -> Result<SalaryEntryData, PersistenceError> {
        queries::salary_entries::get_salary_entry(&mut self.conn, entry_id)
    }

    /// Lists the salary entries recorded for `date`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_salary_entries(
        &mut self,
        date: Date,
    ) -> Result<Vec<SalaryEntryData>, PersistenceError> {
        queries::salary_entries::list_salary_entries(&mut self.conn, date)
    }

    /// Finds salary entries of `date` whose cached advice number disagrees
    /// with the stored mapping.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_stale_salary_entries(
        &mut self,
        date: Date,
    ) -> Result<Vec<StaleSalaryEntry>, PersistenceError> {
        queries::salary_entries::find_stale_salary_entries(&mut self.conn, date)
    }

    // ========================================================================
    // Mappings
    // ========================================================================

    /// Counts all stored mappings.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn count_mappings(&mut self) -> Result<i64, PersistenceError> {
        queries::mappings::count_mappings(&mut self.conn)
    }
}

impl MappingStore for Persistence {
    type Error = PersistenceError;

    fn find_by_key(
        &mut self,
        key: &MappingKey,
    ) -> Result<Option<AdviceNumberMapping>, PersistenceError> {
        queries::mappings::find_mapping_by_key(&mut self.conn, key)
    }

    fn find_max_serial(&mut self, date: Date) -> Result<Option<Serial>, PersistenceError> {
        queries::mappings::find_max_serial(&mut self.conn, date)
    }

    fn insert(
        &mut self,
        mapping: &NewAdviceMapping,
    ) -> Result<AdviceNumberMapping, PersistenceError> {
        mutations::mappings::insert_mapping(&mut self.conn, mapping)
    }

    fn find_all_for_date(
        &mut self,
        date: Date,
    ) -> Result<Vec<AdviceNumberMapping>, PersistenceError> {
        queries::mappings::find_all_mappings_for_date(&mut self.conn, date)
    }

    fn stamp_salary_entries(
        &mut self,
        key: &MappingKey,
        advice: &AdviceNumber,
    ) -> Result<usize, PersistenceError> {
        mutations::mappings::stamp_salary_entries(&mut self.conn, key, advice)
    }

    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<PersistenceError>,
    {
        backend::sqlite::begin_immediate(&mut self.conn)?;

        match f(self) {
            Ok(value) => {
                backend::sqlite::commit(&mut self.conn)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = backend::sqlite::rollback(&mut self.conn) {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(err)
            }
        }
    }
}

impl DisbursementSource for Persistence {
    fn disbursement_groups(
        &mut self,
        date: Date,
    ) -> Result<Vec<DisbursementGroup>, PersistenceError> {
        queries::salary_entries::load_disbursement_groups(&mut self.conn, date)
    }
}
