//! CSV output writer.

use std::fs::File;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::format::Projection;
use crate::record::Record;

/// The run-wide tabular export.
///
/// # Format
/// - Delimiter: `,`
/// - Header: the projection field names, written once on creation
/// - One row per record, in arrival order; absent values are empty cells
/// - Encoding: UTF-8
#[derive(Debug)]
pub struct CsvSink {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows: usize,
}

impl CsvSink {
    /// Creates (truncating) the file at `path` and writes the header.
    pub fn create(path: &Path, projection: &Projection) -> Result<Self> {
        let mut writer = csv::WriterBuilder::new().from_path(path)?;
        writer.write_record(projection.names())?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            rows: 0,
        })
    }

    /// Appends one record.
    pub fn write(&mut self, record: &Record, projection: &Projection) -> Result<()> {
        self.writer.write_record(projection.row(record))?;
        self.rows += 1;
        Ok(())
    }

    /// Flushes buffered rows to disk.
    pub fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Rows written so far, header excluded.
    pub fn rows(&self) -> usize {
        self.rows
    }
}
