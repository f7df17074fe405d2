//! Writing datasets and documents back to disk
//!
//! Output is staged in a temporary file next to the target and renamed over
//! it once fully flushed, so a reader of the target only ever sees the old or
//! the new content.

use crate::error::{Error, Result};
use crate::table::Dataset;
use std::io::{BufWriter, Write};
use std::path::Path;
use tempfile::NamedTempFile;

/// Save a dataset as CSV: header first, then every row in header order
pub fn save<P: AsRef<Path>>(dataset: &Dataset, path: P) -> Result<()> {
    let path = path.as_ref();
    replace_file(path, |out| write_csv(dataset, out))?;
    tracing::debug!(
        path = %path.display(),
        rows = dataset.row_count(),
        "saved dataset"
    );
    Ok(())
}

/// Render a dataset as a CSV string
pub fn to_csv_string(dataset: &Dataset) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(dataset, &mut buf)?;
    String::from_utf8(buf).map_err(|e| {
        Error::malformed(dataset.source_path.clone(), format!("invalid UTF-8: {e}"))
    })
}

fn write_csv<W: Write>(dataset: &Dataset, out: W) -> Result<()> {
    let csv_error = |e: csv::Error| Error::Csv {
        path: dataset.source_path.clone(),
        source: e,
    };

    let mut writer = csv::WriterBuilder::new().has_headers(false).from_writer(out);
    writer.write_record(&dataset.header).map_err(csv_error)?;
    for row in &dataset.rows {
        writer.write_record(&row.values).map_err(csv_error)?;
    }
    writer.flush()?;
    Ok(())
}

/// Atomically replace `path` with whatever `write` produces
///
/// The temporary file is deleted if `write` or the final rename fails.
pub(crate) fn replace_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<&mut NamedTempFile>) -> Result<()>,
{
    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let write_error = |e: std::io::Error| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(write_error)?;
    {
        let mut out = BufWriter::new(&mut tmp);
        write(&mut out)?;
        out.flush().map_err(write_error)?;
    }
    tmp.as_file().sync_all().map_err(write_error)?;
    tmp.persist(path).map_err(|e| write_error(e.error))?;
    Ok(())
}
