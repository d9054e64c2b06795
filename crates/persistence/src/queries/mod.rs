// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries for the persistence layer.
//!
//! ## Module Organization
//!
//! - `mappings`: Advice number mappings
//! - `reference`: Branches, school types and schools
//! - `salary_entries`: Salary entries, disbursement totals and cache checks

pub mod mappings;
pub mod reference;
pub mod salary_entries;
