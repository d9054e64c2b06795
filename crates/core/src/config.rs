// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// What to do when a date has already used serial 99.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Refuse the allocation with `AllocationError::SerialExhausted`.
    #[default]
    Strict,
    /// Restart at serial 01. The resulting advice number collides with the
    /// first mapping of the date.
    Wrap,
}

impl OverflowPolicy {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Strict => "strict",
            Self::Wrap => "wrap",
        }
    }
}

impl FromStr for OverflowPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "wrap" => Ok(Self::Wrap),
            other => Err(format!(
                "unknown overflow policy '{other}' (expected 'strict' or 'wrap')"
            )),
        }
    }
}

impl std::fmt::Display for OverflowPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Allocator configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AllocatorConfig {
    /// Behaviour past serial 99.
    pub overflow: OverflowPolicy,
    /// How many times an allocation is attempted when it loses a
    /// duplicate-key race. Values below 1 are treated as 1.
    pub max_attempts: u8,
}

impl Default for AllocatorConfig {
    fn default() -> Self {
        Self {
            overflow: OverflowPolicy::Strict,
            max_attempts: 3,
        }
    }
}
