// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The storage contract the allocator runs against.

use payroll_advice_domain::{
    AdviceNumber, AdviceNumberMapping, DisbursementGroup, MappingKey, NewAdviceMapping, Serial,
};
use time::Date;

/// Classification the allocator needs from a store's error type.
pub trait StoreError: std::error::Error + Send + Sync + 'static {
    /// Returns whether the error is a uniqueness violation on the mapping
    /// triple, i.e. another writer allocated the same key first.
    fn is_duplicate_key(&self) -> bool;
}

/// Durable storage of advice number mappings.
///
/// Implementations must enforce uniqueness of `(date, branch, school type)`
/// and reject a second insert for an existing triple with an error for which
/// [`StoreError::is_duplicate_key`] returns `true`.
pub trait MappingStore {
    /// The error type returned by store operations.
    type Error: StoreError;

    /// Returns the mapping for the exact triple, if one exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_by_key(&mut self, key: &MappingKey)
    -> Result<Option<AdviceNumberMapping>, Self::Error>;

    /// Returns the highest serial assigned on `date` across all triples.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_max_serial(&mut self, date: Date) -> Result<Option<Serial>, Self::Error>;

    /// Persists a new mapping and returns it with its store-assigned identity.
    ///
    /// # Errors
    ///
    /// Returns a duplicate-key error if the triple already has a mapping, or
    /// any other storage error.
    fn insert(&mut self, mapping: &NewAdviceMapping) -> Result<AdviceNumberMapping, Self::Error>;

    /// Returns all mappings for `date`, ordered by serial.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn find_all_for_date(&mut self, date: Date) -> Result<Vec<AdviceNumberMapping>, Self::Error>;

    /// Writes `advice` into the cached advice number of every salary entry
    /// covered by `key` whose cache is still empty. Returns the number of
    /// entries written.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    fn stamp_salary_entries(
        &mut self,
        key: &MappingKey,
        advice: &AdviceNumber,
    ) -> Result<usize, Self::Error>;

    /// Runs `f` as a single atomic unit. Any error returned by `f` rolls back
    /// everything it wrote.
    ///
    /// # Errors
    ///
    /// Returns the error produced by `f`, or a store error if the unit could
    /// not be started or committed.
    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<Self::Error>;
}

/// Read access to the disbursement totals the report flows are built from.
pub trait DisbursementSource: MappingStore {
    /// Returns per `(branch, school type)` totals for `date`, ordered by
    /// branch then school type.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    fn disbursement_groups(&mut self, date: Date) -> Result<Vec<DisbursementGroup>, Self::Error>;
}
