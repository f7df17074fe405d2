//! CSV loader for councillor roster files

use crate::error::{Error, Result};
use crate::table::{Dataset, Row};
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Load a CSV file into a Dataset
///
/// The first record is the header. Every following record must carry exactly
/// as many fields as the header; values are kept verbatim.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Dataset> {
    let path = path.as_ref();
    let file = open(path)?;

    let dataset = read_dataset(BufReader::new(file), path.to_path_buf())?;
    tracing::debug!(
        path = %path.display(),
        columns = dataset.column_count(),
        rows = dataset.row_count(),
        "loaded dataset"
    );
    Ok(dataset)
}

/// Read only the header record of a CSV file
///
/// Data rows are not inspected, so a file whose rows disagree with its header
/// still yields that header.
pub fn load_header<P: AsRef<Path>>(path: P) -> Result<Vec<String>> {
    let path = path.as_ref();
    let file = open(path)?;
    let mut csv_reader = reader_for(BufReader::new(file));
    read_header(&mut csv_reader, path)
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::NotFound {
            path: path.to_path_buf(),
        },
        _ => Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

fn reader_for<R: Read>(reader: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // arity is checked per record so the error can name the line
        .from_reader(reader)
}

fn read_header<R: Read>(csv_reader: &mut csv::Reader<R>, path: &Path) -> Result<Vec<String>> {
    let header: Vec<String> = csv_reader
        .headers()
        .map_err(|e| Error::Csv {
            path: path.to_path_buf(),
            source: e,
        })?
        .iter()
        .map(str::to_string)
        .collect();

    if header.is_empty() {
        return Err(Error::malformed(path, "no header row found"));
    }
    Ok(header)
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<Dataset> {
    read_dataset(content.as_bytes(), PathBuf::from(source_name))
}

fn read_dataset<R: Read>(reader: R, path: PathBuf) -> Result<Dataset> {
    let mut csv_reader = reader_for(reader);
    let header = read_header(&mut csv_reader, &path)?;

    let mut dataset = Dataset::new(header, path);
    for result in csv_reader.records() {
        let record = result.map_err(|e| Error::Csv {
            path: dataset.source_path.clone(),
            source: e,
        })?;

        if record.len() != dataset.column_count() {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(Error::malformed(
                dataset.source_path.clone(),
                format!(
                    "line {} has {} fields, expected {}",
                    line,
                    record.len(),
                    dataset.column_count()
                ),
            ));
        }

        dataset.rows.push(record.iter().collect::<Row>());
    }

    Ok(dataset)
}
