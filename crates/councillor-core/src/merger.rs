//! Merge engine for folding a batch of changes into a master roster

use crate::error::{Error, Result};
use crate::parser::{load, load_header};
use crate::schema::ensure_headers_match;
use crate::table::{Dataset, KEY_COLUMN};
use crate::writer::save;
use std::collections::HashMap;
use std::path::PathBuf;

/// Result of merging a changes dataset into a master dataset
#[derive(Debug, Clone)]
pub struct MergeOutcome {
    /// The merged dataset, with the master's header and source path
    pub dataset: Dataset,
    /// Keys of rows that replaced an existing row, in the order applied
    pub updated: Vec<String>,
    /// Keys of rows appended to the end, in the order appended
    pub appended: Vec<String>,
}

/// Merge `changes` into `master` keyed on the `id` column
pub fn merge(master: &Dataset, changes: &Dataset) -> Result<Dataset> {
    merge_on(master, changes, KEY_COLUMN).map(|outcome| outcome.dataset)
}

/// Merge `changes` into `master` keyed on `key_column`
///
/// A change row whose key already exists replaces that row in place, every
/// column included, even when the new value is empty. Any other change row is
/// appended. Appended rows are indexed too, so a key repeated within
/// `changes` is applied again on top of the earlier occurrence.
pub fn merge_on(master: &Dataset, changes: &Dataset, key_column: &str) -> Result<MergeOutcome> {
    ensure_headers_match(master, changes)?;
    let key_idx = master.key_index(key_column)?;
    master.check_arity()?;
    changes.check_arity()?;

    let mut merged = master.clone();

    // First occurrence wins if the master itself repeats a key
    let mut index: HashMap<String, usize> = HashMap::with_capacity(merged.row_count());
    for (pos, row) in merged.rows.iter().enumerate() {
        index.entry(row.values[key_idx].clone()).or_insert(pos);
    }

    let mut updated = Vec::new();
    let mut appended = Vec::new();

    for row in &changes.rows {
        let key = &row.values[key_idx];
        match index.get(key).copied() {
            Some(pos) => {
                merged.rows[pos] = row.clone();
                updated.push(key.clone());
            }
            None => {
                index.insert(key.clone(), merged.rows.len());
                merged.rows.push(row.clone());
                appended.push(key.clone());
            }
        }
    }

    tracing::debug!(
        updated = updated.len(),
        appended = appended.len(),
        rows = merged.row_count(),
        "merged changes"
    );

    Ok(MergeOutcome {
        dataset: merged,
        updated,
        appended,
    })
}

/// Merges a changes CSV into a master CSV on disk
#[derive(Debug, Clone)]
pub struct CsvMerger {
    pub master_path: PathBuf,
    pub changes_path: PathBuf,
    pub key_column: String,
}

impl CsvMerger {
    /// Create a merger keyed on the `id` column
    pub fn new(master_path: impl Into<PathBuf>, changes_path: impl Into<PathBuf>) -> Self {
        Self {
            master_path: master_path.into(),
            changes_path: changes_path.into(),
            key_column: KEY_COLUMN.to_string(),
        }
    }

    /// Use a different key column
    pub fn with_key_column(mut self, key_column: impl Into<String>) -> Self {
        self.key_column = key_column.into();
        self
    }

    /// Header records of the master and changes files, in that order
    ///
    /// Only the first record of each file is read.
    pub fn headers(&self) -> Result<(Vec<String>, Vec<String>)> {
        Ok((
            load_header(&self.master_path)?,
            load_header(&self.changes_path)?,
        ))
    }

    /// Whether the changes file declares the same header as the master file
    pub fn changes_valid(&self) -> Result<bool> {
        let (master, changes) = self.headers()?;
        Ok(master == changes)
    }

    /// Load both files, merge, and rewrite the master file
    ///
    /// Headers are compared before any data row is read, so a changes file
    /// with a foreign header fails with `HeaderMismatch` whatever its rows
    /// look like. Nothing is written unless the merge succeeds.
    pub fn merge(&self) -> Result<MergeOutcome> {
        let (master_header, changes_header) = self.headers()?;
        if master_header != changes_header {
            return Err(Error::HeaderMismatch {
                expected: master_header,
                found: changes_header,
            });
        }

        let master = load(&self.master_path)?;
        let changes = load(&self.changes_path)?;
        let outcome = merge_on(&master, &changes, &self.key_column)?;
        save(&outcome.dataset, &self.master_path)?;

        tracing::info!(
            master = %self.master_path.display(),
            changes = %self.changes_path.display(),
            updated = outcome.updated.len(),
            appended = outcome.appended.len(),
            "merged changes into master"
        );
        Ok(outcome)
    }
}
