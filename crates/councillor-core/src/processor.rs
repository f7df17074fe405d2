//! Per-region pipeline: validate a roster, merge changes into it, publish Popolo

use crate::config::Config;
use crate::error::Result;
use crate::merger::{CsvMerger, MergeOutcome};
use crate::parser::load;
use crate::popolo::{to_popolo, write_popolo, Popolo};
use crate::region::RegionPaths;
use crate::validator::{duplicate_keys, ensure_unique_keys};
use std::path::Path;

/// Operations on one region's roster
#[derive(Debug, Clone)]
pub struct Processor {
    paths: RegionPaths,
    key_column: String,
}

impl Processor {
    pub fn new(config: &Config, region: &str) -> Self {
        Self {
            paths: RegionPaths::new(config, region),
            key_column: config.key_column.clone(),
        }
    }

    pub fn paths(&self) -> &RegionPaths {
        &self.paths
    }

    /// Whether the roster has no repeated councillor ids
    pub fn roster_valid(&self) -> Result<bool> {
        Ok(self.duplicate_ids()?.is_empty())
    }

    /// Councillor ids that appear on more than one row
    pub fn duplicate_ids(&self) -> Result<Vec<String>> {
        let roster = load(&self.paths.master_csv)?;
        duplicate_keys(&roster, &self.key_column)
    }

    /// Regenerate the region's Popolo JSON from its roster
    ///
    /// Fails with `DuplicateKey` without touching the JSON file if any id
    /// repeats.
    pub fn update_popolo(&self) -> Result<Popolo> {
        let roster = load(&self.paths.master_csv)?;
        ensure_unique_keys(&roster, &self.key_column)?;

        let popolo = to_popolo(&roster, &self.key_column)?;
        write_popolo(&popolo, &self.paths.popolo_json)?;
        tracing::info!(
            region = %self.paths.region,
            path = %self.paths.popolo_json.display(),
            persons = popolo.persons.len(),
            "wrote popolo"
        );
        Ok(popolo)
    }

    /// Merge a changes CSV into the region's roster
    pub fn merge_changes<P: AsRef<Path>>(&self, changes_path: P) -> Result<MergeOutcome> {
        CsvMerger::new(&self.paths.master_csv, changes_path.as_ref())
            .with_key_column(self.key_column.clone())
            .merge()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;

    const HEADER: &str = "name,council,id\n";

    fn setup(roster: &str) -> (tempfile::TempDir, Processor) {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("NSW")).unwrap();
        fs::write(
            dir.path().join("NSW/local_councillors.csv"),
            format!("{HEADER}{roster}"),
        )
        .unwrap();

        let config = Config::default().with_data_dir(dir.path());
        let processor = Processor::new(&config, "nsw");
        (dir, processor)
    }

    #[test]
    fn test_update_popolo_writes_json() {
        let (_dir, processor) = setup("Julia,Foo City Council,foo/julia\n");

        let popolo = processor.update_popolo().unwrap();
        assert_eq!(popolo.persons.len(), 1);
        assert!(processor.paths().popolo_json.exists());
    }

    #[test]
    fn test_duplicate_ids_block_popolo() {
        let (_dir, processor) = setup("Julia,Foo,foo/julia\nJulia,Foo,foo/julia\n");

        assert!(!processor.roster_valid().unwrap());
        assert_eq!(processor.duplicate_ids().unwrap(), vec!["foo/julia"]);
        assert!(matches!(
            processor.update_popolo(),
            Err(Error::DuplicateKey { .. })
        ));
        assert!(!processor.paths().popolo_json.exists());
    }

    #[test]
    fn test_merge_changes() {
        let (dir, processor) = setup("Julia,Foo,foo/julia\n");
        let changes = dir.path().join("changes.csv");
        fs::write(&changes, format!("{HEADER}Hisayo,Foo,foo/hisayo\n")).unwrap();

        let outcome = processor.merge_changes(&changes).unwrap();
        assert_eq!(outcome.appended, vec!["foo/hisayo"]);
        assert_eq!(
            fs::read_to_string(&processor.paths().master_csv).unwrap(),
            format!("{HEADER}Julia,Foo,foo/julia\nHisayo,Foo,foo/hisayo\n")
        );
    }

    #[test]
    fn test_update_popolo_uses_configured_key_column() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("NSW")).unwrap();
        fs::write(
            dir.path().join("NSW/local_councillors.csv"),
            "name,council,uuid\nJulia,Foo City Council,7f3a\n",
        )
        .unwrap();

        let config = Config {
            key_column: "uuid".to_string(),
            ..Config::default().with_data_dir(dir.path())
        };
        let processor = Processor::new(&config, "nsw");

        assert!(processor.roster_valid().unwrap());
        let popolo = processor.update_popolo().unwrap();
        assert_eq!(popolo.persons[0].id, "7f3a");
        assert!(processor.paths().popolo_json.exists());
    }

    #[test]
    fn test_missing_region() {
        let config = Config::default().with_data_dir("/nonexistent/data");
        let processor = Processor::new(&config, "tas");
        assert!(matches!(
            processor.roster_valid(),
            Err(Error::NotFound { .. })
        ));
    }
}
