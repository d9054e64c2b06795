// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Subcommand execution.
//!
//! Every command produces a JSON value; printing is left to `main`.

use payroll_advice::{AdviceAllocator, build_branch_report, build_school_type_summary};
use payroll_advice_domain::{BranchKey, MappingKey, SchoolTypeKey};
use payroll_advice_persistence::SqlitePersistence;
use serde_json::{Value, json};
use tracing::info;

use crate::cli::{Command, KeyArgs};

type CommandResult = Result<Value, Box<dyn std::error::Error>>;

fn mapping_key(key: KeyArgs) -> Result<MappingKey, Box<dyn std::error::Error>> {
    Ok(MappingKey::new(
        key.date,
        BranchKey::new(key.branch)?,
        SchoolTypeKey::new(key.school_type)?,
    ))
}

/// Runs `command` against the allocator's store.
///
/// # Errors
///
/// Returns an error if arguments are invalid or the operation fails.
pub fn run(allocator: &mut AdviceAllocator<SqlitePersistence>, command: Command) -> CommandResult {
    match command {
        Command::Allocate {
            key,
            generated_by,
            stamp,
        } => {
            let key = mapping_key(key)?;
            let (advice_number, stamped_entries) = if stamp {
                let allocation = allocator.allocate_and_stamp(&key, &generated_by)?;
                (allocation.advice_number, allocation.stamped_entries)
            } else {
                (allocator.allocate(&key, &generated_by)?, 0)
            };
            Ok(json!({
                "key": key,
                "advice_number": advice_number,
                "stamped_entries": stamped_entries,
            }))
        }
        Command::Lookup { key } => {
            let key = mapping_key(key)?;
            Ok(json!({
                "key": key,
                "advice_number": allocator.lookup(&key)?,
            }))
        }
        Command::Peek { date } => Ok(json!({
            "date": date,
            "next_serial": allocator.peek_next_serial(date)?,
        })),
        Command::List { date } => Ok(serde_json::to_value(allocator.list_for_date(date)?)?),
        Command::BranchReport { date, branch } => {
            let report = build_branch_report(allocator, date, BranchKey::new(branch)?)?;
            Ok(serde_json::to_value(report)?)
        }
        Command::Summary { date } => {
            let summary = build_school_type_summary(allocator, date)?;
            Ok(serde_json::to_value(summary)?)
        }
        Command::Stale { date } => {
            let stale = allocator.store_mut().find_stale_salary_entries(date)?;
            if !stale.is_empty() {
                info!(%date, count = stale.len(), "Found stale salary entry advice numbers");
            }
            Ok(serde_json::to_value(stale)?)
        }
        Command::AddBranch { code, name } => {
            let branch_id = allocator.store_mut().create_branch(&code, &name)?;
            Ok(json!({ "branch_id": branch_id }))
        }
        Command::AddSchoolType { name } => {
            let school_type_id = allocator.store_mut().create_school_type(&name)?;
            Ok(json!({ "school_type_id": school_type_id }))
        }
        Command::AddSchool {
            name,
            branch,
            school_type,
        } => {
            let school_id = allocator
                .store_mut()
                .create_school(&name, branch, school_type)?;
            Ok(json!({ "school_id": school_id }))
        }
        Command::ListReference => {
            let store = allocator.store_mut();
            Ok(json!({
                "branches": store.list_branches()?,
                "school_types": store.list_school_types()?,
                "schools": store.list_schools()?,
            }))
        }
        Command::AddEntry {
            school,
            date,
            amount,
        } => {
            let entry_id = allocator
                .store_mut()
                .record_salary_entry(school, date, amount)?;
            Ok(json!({ "entry_id": entry_id }))
        }
    }
}
