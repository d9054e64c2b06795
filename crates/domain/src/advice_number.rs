// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, Month};

use crate::error::DomainError;

/// Two-digit year, month and day: the first six digits of an advice number.
const DATE_PREFIX: &[BorrowedFormatItem<'_>] =
    format_description!("[year repr:last_two][month][day]");

/// The position of a mapping within its calendar date.
///
/// Serials are two-digit values in the range `1..=99`. The store assigns them
/// in first-request order for each date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Serial(u8);

impl Serial {
    /// The first serial of every date.
    pub const FIRST: Self = Self(1);
    /// The highest serial that fits in two digits.
    pub const LAST: Self = Self(99);

    /// Creates a serial, validating the `1..=99` range.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvalidSerial` if `value` is 0 or greater than 99.
    pub fn new(value: u8) -> Result<Self, DomainError> {
        if (Self::FIRST.0..=Self::LAST.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DomainError::InvalidSerial {
                value: i64::from(value),
            })
        }
    }

    /// Returns the numeric value.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// Returns the serial that follows this one, or `None` past [`Serial::LAST`].
    #[must_use]
    pub const fn successor(self) -> Option<Self> {
        if self.0 >= Self::LAST.0 {
            None
        } else {
            Some(Self(self.0 + 1))
        }
    }
}

impl TryFrom<u8> for Serial {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Serial> for u8 {
    fn from(serial: Serial) -> Self {
        serial.0
    }
}

impl std::fmt::Display for Serial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}", self.0)
    }
}

/// A bank advice number: `YYMMDD` followed by a zero-padded two-digit serial.
///
/// Values are always exactly eight ASCII digits. Construction goes through
/// [`AdviceNumber::compose`] or [`str::parse`], both of which uphold that shape.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AdviceNumber(String);

impl AdviceNumber {
    /// Length of every advice number.
    pub const LENGTH: usize = 8;

    /// Builds the advice number for a date and serial.
    #[must_use]
    pub fn compose(date: Date, serial: Serial) -> Self {
        Self(format!("{}{serial}", Self::date_prefix(date)))
    }

    /// Returns the `YYMMDD` prefix shared by every advice number of `date`.
    #[must_use]
    pub fn date_prefix(date: Date) -> String {
        date.format(DATE_PREFIX).unwrap_or_else(|_| {
            format!(
                "{:02}{:02}{:02}",
                date.year().rem_euclid(100),
                u8::from(date.month()),
                date.day()
            )
        })
    }

    /// Returns the advice number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the `YYMMDD` portion.
    #[must_use]
    pub fn prefix(&self) -> &str {
        &self.0[..6]
    }

    /// Returns the serial encoded in the last two digits.
    #[must_use]
    pub fn serial(&self) -> Serial {
        let bytes = self.0.as_bytes();
        Serial((bytes[6] - b'0') * 10 + (bytes[7] - b'0'))
    }

    /// Returns whether this advice number belongs to `date`.
    #[must_use]
    pub fn belongs_to(&self, date: Date) -> bool {
        self.prefix() == Self::date_prefix(date)
    }
}

impl FromStr for AdviceNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = |reason: &'static str| DomainError::MalformedAdviceNumber {
            value: s.to_string(),
            reason,
        };

        if s.len() != Self::LENGTH {
            return Err(malformed("expected exactly 8 characters"));
        }
        if !s.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed("expected only digits"));
        }

        let digits: Vec<u8> = s.bytes().map(|b| b - b'0').collect();
        let pair = |i: usize| digits[i] * 10 + digits[i + 1];

        let month = Month::try_from(pair(2)).map_err(|_| malformed("month out of range"))?;
        // The century is not encoded; 2000 is only used to validate the day.
        Date::from_calendar_date(2000 + i32::from(pair(0)), month, pair(4))
            .map_err(|_| malformed("day out of range for month"))?;
        Serial::new(pair(6)).map_err(|_| malformed("serial must be between 01 and 99"))?;

        Ok(Self(s.to_string()))
    }
}

impl TryFrom<String> for AdviceNumber {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<AdviceNumber> for String {
    fn from(advice: AdviceNumber) -> Self {
        advice.0
    }
}

impl std::fmt::Display for AdviceNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
