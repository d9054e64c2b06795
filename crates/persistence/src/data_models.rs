// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use payroll_advice_domain::{AdviceNumber, BranchKey, SchoolTypeKey};
use serde::{Deserialize, Serialize};
use time::Date;

/// A banking branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchData {
    pub branch_id: i64,
    pub branch_code: String,
    pub branch_name: String,
}

/// A school category used for summary reporting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolTypeData {
    pub school_type_id: i64,
    pub type_name: String,
}

/// A school, paid through one branch and belonging to one school type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolData {
    pub school_id: i64,
    pub school_name: String,
    pub branch: BranchKey,
    pub school_type: SchoolTypeKey,
}

/// A salary disbursement for one school on one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalaryEntryData {
    pub entry_id: i64,
    pub school_id: i64,
    pub entry_date: Date,
    pub amount_minor_units: i64,
    /// Cached copy of the mapping's advice number, set the first time a
    /// report covers this entry.
    pub advice_number: Option<AdviceNumber>,
}

/// A salary entry whose cached advice number disagrees with its mapping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaleSalaryEntry {
    pub entry_id: i64,
    pub cached: String,
    /// The mapping's advice number, or `None` if no mapping exists.
    pub expected: Option<AdviceNumber>,
}
