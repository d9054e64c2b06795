// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::advice_number::{AdviceNumber, Serial};
use crate::error::DomainError;

/// Label recorded when no report flow identifies itself.
pub const DEFAULT_GENERATED_BY: &str = "Manual";

/// Identifier of a banking branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct BranchKey(i64);

impl BranchKey {
    /// Creates a branch key.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidKey` if `value` is not positive.
    pub const fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::InvalidKey {
                kind: "branch",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for BranchKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier of a school type (e.g. primary, high school).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchoolTypeKey(i64);

impl SchoolTypeKey {
    /// Creates a school type key.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidKey` if `value` is not positive.
    pub const fn new(value: i64) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::InvalidKey {
                kind: "school type",
                value,
            });
        }
        Ok(Self(value))
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for SchoolTypeKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The `(date, branch, school type)` triple an advice number is allocated for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MappingKey {
    date: Date,
    branch: BranchKey,
    school_type: SchoolTypeKey,
}

impl MappingKey {
    #[must_use]
    pub const fn new(date: Date, branch: BranchKey, school_type: SchoolTypeKey) -> Self {
        Self {
            date,
            branch,
            school_type,
        }
    }

    #[must_use]
    pub const fn date(&self) -> Date {
        self.date
    }

    #[must_use]
    pub const fn branch(&self) -> BranchKey {
        self.branch
    }

    #[must_use]
    pub const fn school_type(&self) -> SchoolTypeKey {
        self.school_type
    }
}

impl std::fmt::Display for MappingKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} / branch {} / school type {}",
            crate::format_iso_date(self.date),
            self.branch,
            self.school_type
        )
    }
}

/// A persisted advice number mapping.
///
/// Mappings are immutable once created; the store never updates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdviceNumberMapping {
    /// Store-assigned identity.
    pub mapping_id: i64,
    pub advice_number: AdviceNumber,
    pub key: MappingKey,
    pub serial: Serial,
    /// Which report flow triggered creation. Informational only.
    pub generated_by: String,
    pub created_at: OffsetDateTime,
}

/// A mapping that has not been persisted yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAdviceMapping {
    pub key: MappingKey,
    pub serial: Serial,
    pub advice_number: AdviceNumber,
    pub generated_by: String,
    pub created_at: OffsetDateTime,
}

impl NewAdviceMapping {
    /// Builds a new mapping, deriving the advice number from the key's date and
    /// the serial.
    #[must_use]
    pub fn new(
        key: MappingKey,
        serial: Serial,
        generated_by: impl Into<String>,
        created_at: OffsetDateTime,
    ) -> Self {
        Self {
            key,
            serial,
            advice_number: AdviceNumber::compose(key.date(), serial),
            generated_by: generated_by.into(),
            created_at,
        }
    }
}

/// Disbursement totals for one `(branch, school type)` pair on a date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisbursementGroup {
    pub branch: BranchKey,
    pub school_type: SchoolTypeKey,
    /// Number of salary entries in the group.
    pub entry_count: u32,
    /// Sum of the entry amounts, in minor currency units.
    pub total_minor_units: i64,
}
