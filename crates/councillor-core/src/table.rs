//! Core dataset types for representing a councillor roster

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Column holding the record key in a councillor roster
pub const KEY_COLUMN: &str = "id";

/// A parsed tabular dataset: an ordered header plus ordered rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dataset {
    /// Column names, in file order
    pub header: Vec<String>,
    /// Row data, each aligned with `header`
    pub rows: Vec<Row>,
    /// Location the dataset was read from
    pub source_path: PathBuf,
}

impl Dataset {
    /// Create a new dataset with no rows
    pub fn new(header: Vec<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            header,
            rows: Vec::new(),
            source_path: source_path.into(),
        }
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.header.len()
    }

    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Position of a column in the header
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|c| c == name)
    }

    /// Value of `column` in the row at `row_idx`
    pub fn value(&self, row_idx: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row_idx).and_then(|r| r.get(col))
    }

    /// Position of the key column, or `MissingKeyColumn`
    pub fn key_index(&self, key_column: &str) -> Result<usize> {
        self.column_index(key_column)
            .ok_or_else(|| Error::MissingKeyColumn {
                column: key_column.to_string(),
            })
    }

    /// Fail with `MalformedData` if any row's arity differs from the header
    pub fn check_arity(&self) -> Result<()> {
        match self.rows.iter().position(|r| r.len() != self.header.len()) {
            Some(idx) => Err(Error::malformed(
                self.source_path.clone(),
                format!(
                    "row {} has {} fields, expected {}",
                    idx + 1,
                    self.rows[idx].len(),
                    self.header.len()
                ),
            )),
            None => Ok(()),
        }
    }

    /// Append a row, rejecting it if its arity differs from the header
    pub fn push_row(&mut self, row: Row) -> Result<()> {
        if row.len() != self.header.len() {
            return Err(Error::malformed(
                self.source_path.clone(),
                format!(
                    "row has {} fields, expected {}",
                    row.len(),
                    self.header.len()
                ),
            ));
        }
        self.rows.push(row);
        Ok(())
    }
}

/// A row of data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Row {
    /// Cell values, one per header column
    pub values: Vec<String>,
}

impl Row {
    /// Create a new row
    pub fn new(values: Vec<String>) -> Self {
        Self { values }
    }

    /// Get a cell value by column index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Row {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Row::new(iter.into_iter().map(Into::into).collect())
    }
}
