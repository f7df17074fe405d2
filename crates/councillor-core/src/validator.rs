//! Data-quality checks for a single roster
//!
//! None of these are enforced by the merge engine; callers decide whether a
//! failing report should stop them.

use crate::error::{Error, Result};
use crate::table::Dataset;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashMap;

/// Columns holding ISO dates
const DATE_COLUMNS: &[&str] = &["start_date", "end_date"];
const DATE_FORMAT: &str = "%Y-%m-%d";

/// A date cell that could not be accepted
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DateIssue {
    /// 1-based data row number
    pub row: usize,
    pub column: String,
    pub value: String,
    pub reason: String,
}

/// Outcome of validating a roster
#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    /// Key values present on more than one row, in order of first occurrence
    pub duplicate_ids: Vec<String>,
    /// 1-based data row numbers whose key is blank
    pub blank_ids: Vec<usize>,
    pub invalid_dates: Vec<DateIssue>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.duplicate_ids.is_empty() && self.blank_ids.is_empty() && self.invalid_dates.is_empty()
    }
}

/// Key values that occur more than once, each reported once
pub fn duplicate_keys(dataset: &Dataset, key_column: &str) -> Result<Vec<String>> {
    let key_idx = dataset.key_index(key_column)?;

    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut order: Vec<&str> = Vec::new();
    for row in &dataset.rows {
        let key = row.get(key_idx).unwrap_or_default();
        let count = counts.entry(key).or_insert(0);
        if *count == 0 {
            order.push(key);
        }
        *count += 1;
    }

    Ok(order
        .into_iter()
        .filter(|k| counts[k] > 1)
        .map(str::to_string)
        .collect())
}

/// Fail with `DuplicateKey` if any key value repeats
pub fn ensure_unique_keys(dataset: &Dataset, key_column: &str) -> Result<()> {
    let keys = duplicate_keys(dataset, key_column)?;
    if keys.is_empty() {
        Ok(())
    } else {
        Err(Error::DuplicateKey { keys })
    }
}

/// Run every roster check
pub fn validate(dataset: &Dataset, key_column: &str) -> Result<ValidationReport> {
    let key_idx = dataset.key_index(key_column)?;
    let mut report = ValidationReport {
        duplicate_ids: duplicate_keys(dataset, key_column)?,
        ..Default::default()
    };

    let date_cols: Vec<(&str, usize)> = DATE_COLUMNS
        .iter()
        .filter_map(|name| dataset.column_index(name).map(|idx| (*name, idx)))
        .collect();

    for (i, row) in dataset.rows.iter().enumerate() {
        let row_no = i + 1;

        if row.get(key_idx).unwrap_or_default().trim().is_empty() {
            report.blank_ids.push(row_no);
        }

        let mut parsed: HashMap<&str, NaiveDate> = HashMap::new();
        for &(column, idx) in &date_cols {
            let value = row.get(idx).unwrap_or_default();
            if value.is_empty() {
                continue;
            }
            match NaiveDate::parse_from_str(value, DATE_FORMAT) {
                Ok(date) => {
                    parsed.insert(column, date);
                }
                Err(e) => report.invalid_dates.push(DateIssue {
                    row: row_no,
                    column: column.to_string(),
                    value: value.to_string(),
                    reason: e.to_string(),
                }),
            }
        }

        if let (Some(start), Some(end)) = (parsed.get("start_date"), parsed.get("end_date")) {
            if end < start {
                report.invalid_dates.push(DateIssue {
                    row: row_no,
                    column: "end_date".to_string(),
                    value: end.format(DATE_FORMAT).to_string(),
                    reason: format!("ends before start date {}", start.format(DATE_FORMAT)),
                });
            }
        }
    }

    tracing::debug!(
        path = %dataset.source_path.display(),
        valid = report.is_valid(),
        "validated roster"
    );
    Ok(report)
}
