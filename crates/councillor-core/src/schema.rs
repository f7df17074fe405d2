//! Header compatibility checks between datasets

use crate::error::{Error, Result};
use crate::table::Dataset;

/// True when both datasets declare the same columns in the same order
pub fn headers_match(a: &Dataset, b: &Dataset) -> bool {
    a.header == b.header
}

/// Fail with `HeaderMismatch` unless `changes` can be read against `master`
pub fn ensure_headers_match(master: &Dataset, changes: &Dataset) -> Result<()> {
    if headers_match(master, changes) {
        Ok(())
    } else {
        Err(Error::HeaderMismatch {
            expected: master.header.clone(),
            found: changes.header.clone(),
        })
    }
}
