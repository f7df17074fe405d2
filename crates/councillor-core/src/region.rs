//! Resolving region codes to roster locations

use crate::config::Config;
use crate::error::Result;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// File locations for one region's roster and Popolo output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegionPaths {
    /// Upper-cased region code (e.g. "NSW")
    pub region: String,
    pub master_csv: PathBuf,
    pub popolo_json: PathBuf,
}

impl RegionPaths {
    /// Resolve a region code against the configured data directory
    pub fn new(config: &Config, region: &str) -> Self {
        let region = region.to_uppercase();
        let dir = config.data_dir.join(&region);
        Self {
            master_csv: dir.join(&config.master_file_name),
            popolo_json: dir.join(&config.popolo_file_name),
            region,
        }
    }
}

/// Find every region directory under `data_dir` that holds a master roster
///
/// Returns region codes sorted alphabetically.
pub fn scan_regions<P: AsRef<Path>>(data_dir: P, master_file_name: &str) -> Result<Vec<String>> {
    let mut regions = Vec::new();

    for entry in WalkDir::new(data_dir.as_ref())
        .min_depth(2)
        .max_depth(2)
        .follow_links(true)
    {
        let entry = entry?;
        if !entry.file_type().is_file() || entry.file_name() != master_file_name {
            continue;
        }
        let region = entry
            .path()
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|n| n.to_str());
        if let Some(region) = region {
            regions.push(region.to_string());
        }
    }

    regions.sort();
    Ok(regions)
}
