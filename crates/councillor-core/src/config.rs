//! Configuration file for locating region rosters

use crate::error::{Error, Result};
use crate::table::KEY_COLUMN;
use crate::writer::replace_file;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Where rosters live and how they are keyed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Directory holding one sub-directory per region
    pub data_dir: PathBuf,
    /// Column identifying a councillor
    pub key_column: String,
    /// File name of a region's master roster
    pub master_file_name: String,
    /// File name of a region's Popolo output
    pub popolo_file_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            key_column: KEY_COLUMN.to_string(),
            master_file_name: "local_councillors.csv".to_string(),
            popolo_file_name: "local_councillor_popolo.json".to_string(),
        }
    }
}

impl Config {
    /// Load a config file from JSON; missing fields take their defaults
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the config file as JSON, replacing `path` atomically
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        replace_file(path.as_ref(), |out| {
            serde_json::to_writer_pretty(&mut *out, self)?;
            out.write_all(b"\n")?;
            Ok(())
        })
    }

    pub fn with_data_dir(mut self, data_dir: impl Into<PathBuf>) -> Self {
        self.data_dir = data_dir.into();
        self
    }
}
