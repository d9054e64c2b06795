// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! An in-memory `MappingStore` used to exercise the allocator without a
//! database. It can inject a racing writer and storage outages.

use payroll_advice_domain::{
    AdviceNumber, AdviceNumberMapping, BranchKey, DisbursementGroup, MappingKey, NewAdviceMapping,
    SchoolTypeKey, Serial,
};
use time::{Date, Month, OffsetDateTime};

use crate::{DisbursementSource, MappingStore, StoreError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeStoreError {
    DuplicateKey(MappingKey),
    Unavailable,
}

impl std::fmt::Display for FakeStoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateKey(key) => write!(f, "duplicate mapping for {key}"),
            Self::Unavailable => write!(f, "store unavailable"),
        }
    }
}

impl std::error::Error for FakeStoreError {}

impl StoreError for FakeStoreError {
    fn is_duplicate_key(&self) -> bool {
        matches!(self, Self::DuplicateKey(_))
    }
}

/// A salary entry as far as cache stamping is concerned.
#[derive(Debug, Clone)]
pub struct FakeEntry {
    pub key: MappingKey,
    pub amount_minor_units: i64,
    pub advice_number: Option<AdviceNumber>,
}

#[derive(Debug, Default)]
pub struct FakeStore {
    pub mappings: Vec<AdviceNumberMapping>,
    pub entries: Vec<FakeEntry>,
    /// A mapping some other writer commits just before our next insert.
    pub racing_insert: Option<NewAdviceMapping>,
    /// When set, every insert is rejected as a duplicate without the row
    /// becoming visible to reads.
    pub always_duplicate: bool,
    pub unavailable: bool,
    pub transactions: usize,
    pub inserts: usize,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn check_available(&self) -> Result<(), FakeStoreError> {
        if self.unavailable {
            Err(FakeStoreError::Unavailable)
        } else {
            Ok(())
        }
    }

    fn commit(&mut self, mapping: &NewAdviceMapping) -> AdviceNumberMapping {
        let stored = AdviceNumberMapping {
            mapping_id: i64::try_from(self.mappings.len()).unwrap() + 1,
            advice_number: mapping.advice_number.clone(),
            key: mapping.key,
            serial: mapping.serial,
            generated_by: mapping.generated_by.clone(),
            created_at: mapping.created_at,
        };
        self.mappings.push(stored.clone());
        stored
    }

    /// Seeds `count` mappings on `date` for distinct branches of school type 99.
    pub fn seed_day(&mut self, date: Date, count: u8) {
        for n in 1..=count {
            let key = MappingKey::new(
                date,
                BranchKey::new(1000 + i64::from(n)).unwrap(),
                SchoolTypeKey::new(99).unwrap(),
            );
            let mapping = NewAdviceMapping::new(
                key,
                Serial::new(n).unwrap(),
                "Seed",
                OffsetDateTime::UNIX_EPOCH,
            );
            self.commit(&mapping);
        }
    }

    pub fn add_entry(&mut self, key: MappingKey, amount_minor_units: i64) {
        self.entries.push(FakeEntry {
            key,
            amount_minor_units,
            advice_number: None,
        });
    }
}

impl MappingStore for FakeStore {
    type Error = FakeStoreError;

    fn find_by_key(
        &mut self,
        key: &MappingKey,
    ) -> Result<Option<AdviceNumberMapping>, Self::Error> {
        self.check_available()?;
        Ok(self.mappings.iter().find(|m| m.key == *key).cloned())
    }

    fn find_max_serial(&mut self, date: Date) -> Result<Option<Serial>, Self::Error> {
        self.check_available()?;
        Ok(self
            .mappings
            .iter()
            .filter(|m| m.key.date() == date)
            .map(|m| m.serial)
            .max())
    }

    fn insert(&mut self, mapping: &NewAdviceMapping) -> Result<AdviceNumberMapping, Self::Error> {
        self.check_available()?;
        self.inserts += 1;

        if self.always_duplicate {
            return Err(FakeStoreError::DuplicateKey(mapping.key));
        }
        if let Some(racing) = self.racing_insert.take() {
            self.commit(&racing);
        }

        if self.mappings.iter().any(|m| m.key == mapping.key) {
            return Err(FakeStoreError::DuplicateKey(mapping.key));
        }
        Ok(self.commit(mapping))
    }

    fn find_all_for_date(&mut self, date: Date) -> Result<Vec<AdviceNumberMapping>, Self::Error> {
        self.check_available()?;
        let mut rows: Vec<AdviceNumberMapping> = self
            .mappings
            .iter()
            .filter(|m| m.key.date() == date)
            .cloned()
            .collect();
        rows.sort_by_key(|m| m.serial);
        Ok(rows)
    }

    fn stamp_salary_entries(
        &mut self,
        key: &MappingKey,
        advice: &AdviceNumber,
    ) -> Result<usize, Self::Error> {
        self.check_available()?;
        let mut stamped = 0;
        for entry in self
            .entries
            .iter_mut()
            .filter(|e| e.key == *key && e.advice_number.is_none())
        {
            entry.advice_number = Some(advice.clone());
            stamped += 1;
        }
        Ok(stamped)
    }

    fn atomically<T, E, F>(&mut self, f: F) -> Result<T, E>
    where
        F: FnOnce(&mut Self) -> Result<T, E>,
        E: From<Self::Error>,
    {
        self.transactions += 1;
        f(self)
    }
}

impl DisbursementSource for FakeStore {
    fn disbursement_groups(&mut self, date: Date) -> Result<Vec<DisbursementGroup>, Self::Error> {
        self.check_available()?;
        let mut groups: Vec<DisbursementGroup> = Vec::new();
        for entry in self.entries.iter().filter(|e| e.key.date() == date) {
            match groups.iter_mut().find(|g| {
                g.branch == entry.key.branch() && g.school_type == entry.key.school_type()
            }) {
                Some(group) => {
                    group.entry_count += 1;
                    group.total_minor_units += entry.amount_minor_units;
                }
                None => groups.push(DisbursementGroup {
                    branch: entry.key.branch(),
                    school_type: entry.key.school_type(),
                    entry_count: 1,
                    total_minor_units: entry.amount_minor_units,
                }),
            }
        }
        groups.sort_by_key(|g| (g.branch, g.school_type));
        Ok(groups)
    }
}

/// 2025-12-06, whose advice number prefix is `251206`.
pub fn test_date() -> Date {
    Date::from_calendar_date(2025, Month::December, 6).unwrap()
}

pub fn key(date: Date, branch: i64, school_type: i64) -> MappingKey {
    MappingKey::new(
        date,
        BranchKey::new(branch).unwrap(),
        SchoolTypeKey::new(school_type).unwrap(),
    )
}
