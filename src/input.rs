//! Streaming reader for raw records stored as JSON Lines.
//!
//! Each non-blank line holds one [`RawRecord`] object. Records are decoded
//! lazily, so arbitrarily large scrapes can be fed to the pipeline without
//! loading them into memory.
//!
//! # Example
//!
//! ```rust
//! use listpack::input::RecordReader;
//!
//! let data = r#"{"url": "http://marc.info/?m=1", "timeReceived": "2005-04-07 22:13:13"}
//!
//! {"url": "http://marc.info/?m=2"}
//! "#;
//! let records: Vec<_> = RecordReader::new(data.as_bytes()).collect::<Result<_, _>>()?;
//! assert_eq!(records.len(), 2);
//! assert_eq!(records[1].url, "http://marc.info/?m=2");
//! # Ok::<(), listpack::ListpackError>(())
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{ListpackError, Result};
use crate::record::RawRecord;

/// Iterator over the records of a JSON Lines source.
///
/// After the first error the iterator is fused and yields `None`.
pub struct RecordReader<R: BufRead> {
    reader: R,
    line: usize,
    bytes_read: u64,
    line_buffer: String,
    failed: bool,
}

impl RecordReader<BufReader<File>> {
    /// Opens a JSON Lines file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            line: 0,
            bytes_read: 0,
            line_buffer: String::with_capacity(4096),
            failed: false,
        }
    }

    /// Number of lines consumed so far, blank ones included.
    pub fn lines_read(&self) -> usize {
        self.line
    }

    pub fn bytes_processed(&self) -> u64 {
        self.bytes_read
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<RawRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        loop {
            self.line_buffer.clear();
            match self.reader.read_line(&mut self.line_buffer) {
                Ok(0) => return None,
                Ok(n) => {
                    self.line += 1;
                    self.bytes_read += n as u64;
                    let trimmed = self.line_buffer.trim();
                    if trimmed.is_empty() {
                        continue;
                    }
                    let decoded = serde_json::from_str(trimmed)
                        .map_err(|e| ListpackError::invalid_record(self.line, e));
                    self.failed = decoded.is_err();
                    return Some(decoded);
                }
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e.into()));
                }
            }
        }
    }
}
