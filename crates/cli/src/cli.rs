// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Command line arguments.

use clap::{Args as ClapArgs, Parser, Subcommand};
use payroll_advice::{AllocatorConfig, OverflowPolicy};
use payroll_advice_domain::{DEFAULT_GENERATED_BY, parse_iso_date};
use time::Date;

/// Advice number allocation for school payroll disbursements.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long, global = true)]
    pub database: Option<String>,

    /// What to do once a date has used serial 99.
    #[arg(long, global = true, default_value_t = OverflowPolicy::Strict)]
    pub overflow: OverflowPolicy,

    /// How many times to retry an allocation that lost a race to another writer.
    #[arg(long, global = true, default_value_t = 3)]
    pub max_attempts: u8,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    pub const fn allocator_config(&self) -> AllocatorConfig {
        AllocatorConfig {
            overflow: self.overflow,
            max_attempts: self.max_attempts,
        }
    }
}

/// A `(date, branch, school type)` triple.
#[derive(ClapArgs, Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyArgs {
    /// Disbursement date (`YYYY-MM-DD`)
    #[arg(long, value_parser = parse_date)]
    pub date: Date,

    /// Branch ID
    #[arg(long)]
    pub branch: i64,

    /// School type ID
    #[arg(long)]
    pub school_type: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Return the advice number for a triple, allocating it if needed
    #[command(visible_alias = "a")]
    Allocate {
        #[command(flatten)]
        key: KeyArgs,

        /// Label recorded on a newly created mapping
        #[arg(long, default_value = DEFAULT_GENERATED_BY)]
        generated_by: String,

        /// Also write the number into the triple's salary entries
        #[arg(long)]
        stamp: bool,
    },

    /// Show the advice number for a triple without allocating
    Lookup {
        #[command(flatten)]
        key: KeyArgs,
    },

    /// Show the serial the next new triple of a date would receive
    Peek {
        #[arg(long, value_parser = parse_date)]
        date: Date,
    },

    /// List every mapping of a date
    #[command(visible_alias = "ls")]
    List {
        #[arg(long, value_parser = parse_date)]
        date: Date,
    },

    /// Build one branch's report, allocating its advice numbers
    BranchReport {
        #[arg(long, value_parser = parse_date)]
        date: Date,

        #[arg(long)]
        branch: i64,
    },

    /// Build the school type summary of a date, allocating its advice numbers
    Summary {
        #[arg(long, value_parser = parse_date)]
        date: Date,
    },

    /// List salary entries whose cached advice number disagrees with the mapping
    Stale {
        #[arg(long, value_parser = parse_date)]
        date: Date,
    },

    /// Create a branch
    AddBranch {
        #[arg(long)]
        code: String,

        #[arg(long)]
        name: String,
    },

    /// Create a school type
    AddSchoolType {
        #[arg(long)]
        name: String,
    },

    /// Create a school
    AddSchool {
        #[arg(long)]
        name: String,

        #[arg(long)]
        branch: i64,

        #[arg(long)]
        school_type: i64,
    },

    /// List branches, school types and schools
    ListReference,

    /// Record a school's salary disbursement for a day
    AddEntry {
        #[arg(long)]
        school: i64,

        #[arg(long, value_parser = parse_date)]
        date: Date,

        /// Amount in minor currency units
        #[arg(long)]
        amount: i64,
    },
}

fn parse_date(value: &str) -> Result<Date, String> {
    parse_iso_date(value).map_err(|e| e.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    fn parse(args: &[&str]) -> Result<Args, clap::Error> {
        Args::try_parse_from(std::iter::once("advice").chain(args.iter().copied()))
    }

    #[test]
    fn test_allocate_defaults() {
        let args = parse(&[
            "allocate",
            "--date",
            "2025-12-06",
            "--branch",
            "2",
            "--school-type",
            "5",
        ])
        .unwrap();

        assert_eq!(args.database, None);
        assert_eq!(args.allocator_config(), AllocatorConfig::default());
        assert_eq!(
            args.command,
            Command::Allocate {
                key: KeyArgs {
                    date: Date::from_calendar_date(2025, Month::December, 6).unwrap(),
                    branch: 2,
                    school_type: 5,
                },
                generated_by: String::from("Manual"),
                stamp: false,
            }
        );
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = parse(&[
            "summary",
            "--date",
            "2025-12-06",
            "--database",
            "advice.sqlite",
            "--overflow",
            "wrap",
            "--max-attempts",
            "5",
        ])
        .unwrap();

        assert_eq!(args.database.as_deref(), Some("advice.sqlite"));
        assert_eq!(args.overflow, OverflowPolicy::Wrap);
        assert_eq!(args.max_attempts, 5);
    }

    #[test]
    fn test_list_reference_takes_no_arguments() {
        let args = parse(&["list-reference"]).unwrap();

        assert_eq!(args.command, Command::ListReference);
        assert!(parse(&["list-reference", "--date", "2025-12-06"]).is_err());
    }

    #[test]
    fn test_invalid_date_is_rejected() {
        assert!(parse(&["peek", "--date", "2025-13-01"]).is_err());
        assert!(parse(&["peek", "--date", "06/12/2025"]).is_err());
    }

    #[test]
    fn test_unknown_overflow_policy_is_rejected() {
        assert!(parse(&["list", "--date", "2025-12-06", "--overflow", "ignore"]).is_err());
    }

    #[test]
    fn test_allocate_requires_full_triple() {
        assert!(parse(&["allocate", "--date", "2025-12-06", "--branch", "2"]).is_err());
    }
}
