// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur while constructing or validating domain values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A serial outside the 1..=99 range was supplied.
    InvalidSerial {
        /// The rejected value.
        value: i64,
    },
    /// An advice number string did not have the `YYMMDDSS` shape.
    MalformedAdviceNumber {
        /// The rejected input.
        value: String,
        /// What was wrong with it.
        reason: &'static str,
    },
    /// A branch or school type key was not a positive identifier.
    InvalidKey {
        /// Which kind of key was rejected.
        kind: &'static str,
        /// The rejected value.
        value: i64,
    },
    /// Failed to parse a date from a string.
    DateParseError {
        /// The invalid date string.
        date_string: String,
        /// The parsing error message.
        error: String,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidSerial { value } => {
                write!(f, "Invalid serial: {value}. Must be between 1 and 99")
            }
            Self::MalformedAdviceNumber { value, reason } => {
                write!(f, "Malformed advice number '{value}': {reason}")
            }
            Self::InvalidKey { kind, value } => {
                write!(f, "Invalid {kind} key: {value}. Must be positive")
            }
            Self::DateParseError { date_string, error } => {
                write!(f, "Failed to parse date '{date_string}': {error}")
            }
        }
    }
}

impl std::error::Error for DomainError {}
