// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations for the persistence layer.
//!
//! ## Module Organization
//!
//! - `mappings`: Mapping inserts and salary entry cache stamping
//! - `reference`: Reference data and salary entry recording

pub mod mappings;
pub mod reference;
