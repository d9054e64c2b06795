// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use payroll_advice_domain::{
    AdviceNumber, AdviceNumberMapping, MappingKey, NewAdviceMapping, Serial,
};
use time::{Date, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::config::{AllocatorConfig, OverflowPolicy};
use crate::error::AllocationError;
use crate::store::{MappingStore, StoreError};

/// Outcome of a successful allocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Allocation {
    /// The canonical advice number of the triple.
    pub advice_number: AdviceNumber,
    /// The serial embedded in the advice number.
    pub serial: Serial,
    /// `true` if this call created the mapping, `false` if it already existed.
    pub created: bool,
    /// Number of salary entries whose cached advice number was written.
    pub stamped_entries: usize,
}

/// Hands out advice numbers for `(date, branch, school type)` triples.
///
/// The allocator holds no counters of its own. Every allocation derives the
/// next serial from the store inside a single atomic unit, so several
/// allocators over the same database stay consistent.
pub struct AdviceAllocator<S> {
    store: S,
    config: AllocatorConfig,
}

impl<S: MappingStore> AdviceAllocator<S> {
    /// Creates an allocator with the default (strict) configuration.
    pub fn new(store: S) -> Self {
        Self::with_config(store, AllocatorConfig::default())
    }

    pub const fn with_config(store: S, config: AllocatorConfig) -> Self {
        Self { store, config }
    }

    pub const fn config(&self) -> &AllocatorConfig {
        &self.config
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    /// Returns the advice number for `key`, allocating it on first request.
    ///
    /// Repeated calls for the same key return the same advice number
    /// regardless of `generated_by`, which is only recorded on creation.
    ///
    /// # Errors
    ///
    /// Returns `AllocationError::SerialExhausted` when the date has used all
    /// 99 serials under the strict policy, `AllocationError::Contention` if
    /// duplicate-key races persist past the configured attempts, or
    /// `AllocationError::Store` on storage failure.
    pub fn allocate(
        &mut self,
        key: &MappingKey,
        generated_by: &str,
    ) -> Result<AdviceNumber, AllocationError<S::Error>> {
        self.run(key, generated_by, false)
            .map(|allocation| allocation.advice_number)
    }

    /// Like [`AdviceAllocator::allocate`], and in the same atomic unit writes
    /// the advice number into every still-empty salary entry cache covered by
    /// `key`.
    ///
    /// # Errors
    ///
    /// Same as [`AdviceAllocator::allocate`].
    pub fn allocate_and_stamp(
        &mut self,
        key: &MappingKey,
        generated_by: &str,
    ) -> Result<Allocation, AllocationError<S::Error>> {
        self.run(key, generated_by, true)
    }

    /// Returns the existing advice number for `key` without allocating.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn lookup(
        &mut self,
        key: &MappingKey,
    ) -> Result<Option<AdviceNumber>, AllocationError<S::Error>> {
        let found = self.store.find_by_key(key)?;
        debug!(%key, found = found.is_some(), "Advice number lookup");
        Ok(found.map(|mapping| mapping.advice_number))
    }

    /// Returns the serial the next first-time allocation on `date` would
    /// receive. Nothing is reserved; a concurrent allocation may take it.
    ///
    /// The result is 100 once serial 99 has been used.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn peek_next_serial(&mut self, date: Date) -> Result<u8, AllocationError<S::Error>> {
        let max = self.store.find_max_serial(date)?;
        Ok(max.map_or(Serial::FIRST.value(), |serial| serial.value() + 1))
    }

    /// Returns every mapping of `date`, ordered by serial.
    ///
    /// # Errors
    ///
    /// Returns an error if the store cannot be read.
    pub fn list_for_date(
        &mut self,
        date: Date,
    ) -> Result<Vec<AdviceNumberMapping>, AllocationError<S::Error>> {
        Ok(self.store.find_all_for_date(date)?)
    }

    fn run(
        &mut self,
        key: &MappingKey,
        generated_by: &str,
        stamp: bool,
    ) -> Result<Allocation, AllocationError<S::Error>> {
        let policy: OverflowPolicy = self.config.overflow;
        let max_attempts: u8 = self.config.max_attempts.max(1);
        let mut attempt: u8 = 1;

        loop {
            let result = self
                .store
                .atomically(|store| allocate_once(store, key, generated_by, policy, stamp));

            match result {
                Err(AllocationError::Store(err)) if err.is_duplicate_key() => {
                    if attempt >= max_attempts {
                        return Err(AllocationError::Contention {
                            key: *key,
                            attempts: attempt,
                        });
                    }
                    warn!(%key, attempt, "Lost allocation race, re-reading mapping");
                    attempt += 1;
                }
                other => return other,
            }
        }
    }
}

/// One find-or-insert pass. Must run inside `MappingStore::atomically`.
fn allocate_once<S: MappingStore>(
    store: &mut S,
    key: &MappingKey,
    generated_by: &str,
    policy: OverflowPolicy,
    stamp: bool,
) -> Result<Allocation, AllocationError<S::Error>> {
    if let Some(existing) = store.find_by_key(key)? {
        debug!(%key, advice_number = %existing.advice_number, "Reusing existing advice number");
        let stamped_entries = if stamp {
            store.stamp_salary_entries(key, &existing.advice_number)?
        } else {
            0
        };
        return Ok(Allocation {
            advice_number: existing.advice_number,
            serial: existing.serial,
            created: false,
            stamped_entries,
        });
    }

    let serial: Serial = next_serial(store.find_max_serial(key.date())?, key.date(), policy)?;
    let mapping = NewAdviceMapping::new(*key, serial, generated_by, OffsetDateTime::now_utc());
    let stored: AdviceNumberMapping = store.insert(&mapping)?;

    info!(
        %key,
        advice_number = %stored.advice_number,
        generated_by,
        "Allocated advice number"
    );

    let stamped_entries = if stamp {
        store.stamp_salary_entries(key, &stored.advice_number)?
    } else {
        0
    };

    Ok(Allocation {
        advice_number: stored.advice_number,
        serial: stored.serial,
        created: true,
        stamped_entries,
    })
}

/// Derives the serial following `current_max` on `date`.
fn next_serial<E>(
    current_max: Option<Serial>,
    date: Date,
    policy: OverflowPolicy,
) -> Result<Serial, AllocationError<E>> {
    let Some(max) = current_max else {
        return Ok(Serial::FIRST);
    };

    match (max.successor(), policy) {
        (Some(next), _) => Ok(next),
        (None, OverflowPolicy::Strict) => Err(AllocationError::SerialExhausted { date }),
        (None, OverflowPolicy::Wrap) => {
            warn!(
                %date,
                "Serial 99 exceeded, wrapping to 01; advice numbers for this date will collide"
            );
            Ok(Serial::FIRST)
        }
    }
}
