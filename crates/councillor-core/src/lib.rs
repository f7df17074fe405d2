//! councillor-core: Core library for maintaining local councillor rosters
//!
//! This library provides functionality to:
//! - Load and save roster CSV files, preserving column and row order
//! - Check that two rosters share the same header
//! - Merge a batch of changes into a master roster, keyed on councillor id
//! - Report duplicate ids and malformed dates in a roster
//! - Resolve region codes to roster locations
//! - Convert a roster into Popolo JSON

pub mod config;
pub mod error;
pub mod merger;
pub mod parser;
pub mod popolo;
pub mod processor;
pub mod region;
pub mod schema;
pub mod table;
pub mod validator;
pub mod writer;

pub use config::Config;
pub use error::{Error, ErrorKind, Result};
pub use merger::{merge, merge_on, CsvMerger, MergeOutcome};
pub use parser::{load, load_header, parse_csv_str};
pub use popolo::{to_popolo, write_popolo, Popolo};
pub use processor::Processor;
pub use region::{scan_regions, RegionPaths};
pub use schema::{ensure_headers_match, headers_match};
pub use table::{Dataset, Row, KEY_COLUMN};
pub use validator::{duplicate_keys, ensure_unique_keys, validate, ValidationReport};
pub use writer::save;
