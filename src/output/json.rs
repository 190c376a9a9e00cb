//! JSON artifact sink
//!
//! Writes the aggregate collection as a 2-space indented JSON array, creating
//! parent directories as needed, and reads it back for `--stats`. The array is
//! staged in a sibling file and renamed over the artifact once complete.

use crate::output::traits::{RecordSink, SinkError, SinkResult};
use crate::record::Record;
use std::ffi::{OsStr, OsString};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Sink writing a JSON array of records to a fixed path
#[derive(Debug, Clone)]
pub struct JsonSink {
    path: PathBuf,
}

impl JsonSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the artifact is written to before being renamed into place
    fn staging_path(&self) -> PathBuf {
        let mut name = OsString::from(".");
        name.push(self.path.file_name().unwrap_or_else(|| OsStr::new("records")));
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn write_file(&self, path: &Path, records: &[Record]) -> SinkResult<()> {
        let file = File::create(path).map_err(|source| SinkError::Write {
            path: path.to_path_buf(),
            source,
        })?;

        let mut writer = BufWriter::new(file);
        write_records(&mut writer, path, records)?;

        writer
            .get_ref()
            .sync_all()
            .map_err(|source| SinkError::Write {
                path: path.to_path_buf(),
                source,
            })
    }
}

impl RecordSink for JsonSink {
    /// Writes to a staging file and renames it over the artifact, so a failed
    /// write leaves the previous artifact untouched.
    fn persist(&self, records: &[Record]) -> SinkResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|source| SinkError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let staging = self.staging_path();
        let result = self.write_file(&staging, records).and_then(|()| {
            std::fs::rename(&staging, &self.path).map_err(|source| SinkError::Write {
                path: self.path.clone(),
                source,
            })
        });

        if result.is_err() && staging.is_file() {
            if let Err(e) = std::fs::remove_file(&staging) {
                tracing::debug!("Failed to remove {}: {}", staging.display(), e);
            }
        }
        result?;

        tracing::info!("Wrote {} records to {}", records.len(), self.path.display());
        Ok(())
    }

    fn destination(&self) -> String {
        self.path.display().to_string()
    }
}

/// Serializes records as an indented array followed by a newline
///
/// I/O failures surface as `SinkError::Write` against `path`; only genuine
/// encoding failures are reported as `SinkError::Json`.
fn write_records<W: Write>(mut writer: W, path: &Path, records: &[Record]) -> SinkResult<()> {
    let write_error = |source: std::io::Error| SinkError::Write {
        path: path.to_path_buf(),
        source,
    };

    serde_json::to_writer_pretty(&mut writer, records).map_err(|e| {
        if e.is_io() {
            write_error(e.into())
        } else {
            SinkError::Json(e)
        }
    })?;
    writer.write_all(b"\n").map_err(write_error)?;
    writer.flush().map_err(write_error)
}

/// Reads a JSON artifact written by [`JsonSink`]
pub fn read_records(path: &Path) -> SinkResult<Vec<Record>> {
    let file = File::open(path).map_err(|source| SinkError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_reader(BufReader::new(file))?)
}
