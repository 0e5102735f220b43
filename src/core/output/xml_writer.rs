//! XML output writer.
//!
//! One file per partition year:
//!
//! ```xml
//! <?xml version="1.0" encoding="utf-8"?>
//! <emails>
//!   <email>
//!     <senderName>Michael Sperberg-McQueen</senderName>
//!     <timestampReceived>1990-08-08 12:36:34-0500</timestampReceived>
//!     ...
//!   </email>
//! </emails>
//! ```

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::Result;
use crate::format::Projection;
use crate::record::Record;

/// Root element wrapping every record of a file.
pub const ROOT_ELEMENT: &str = "emails";

/// Element holding one record.
pub const ITEM_ELEMENT: &str = "email";

/// An open structured export for one partition year.
pub struct XmlPartition {
    writer: Writer<BufWriter<File>>,
    path: PathBuf,
    year: i32,
    records: usize,
}

impl std::fmt::Debug for XmlPartition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("XmlPartition")
            .field("path", &self.path)
            .field("year", &self.year)
            .field("records", &self.records)
            .finish_non_exhaustive()
    }
}

impl XmlPartition {
    /// Creates (truncating) the file at `path` and opens the root element.
    pub fn create(path: &Path, year: i32) -> Result<Self> {
        let file = File::create(path)?;
        let mut writer = Writer::new_with_indent(BufWriter::new(file), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        writer.write_event(Event::Start(BytesStart::new(ROOT_ELEMENT)))?;
        Ok(Self {
            writer,
            path: path.to_path_buf(),
            year,
            records: 0,
        })
    }

    /// Appends one record as an `<email>` element.
    ///
    /// Absent values are left out rather than written empty.
    pub fn write(&mut self, record: &Record, projection: &Projection) -> Result<()> {
        self.writer
            .write_event(Event::Start(BytesStart::new(ITEM_ELEMENT)))?;
        for &field in projection.fields() {
            if let Some(value) = field.value(record) {
                self.writer
                    .create_element(field.name())
                    .write_text_content(BytesText::new(value))?;
            }
        }
        self.writer
            .write_event(Event::End(BytesEnd::new(ITEM_ELEMENT)))?;
        self.records += 1;
        Ok(())
    }

    /// Closes the root element and flushes the file.
    pub fn finish(&mut self) -> Result<()> {
        self.writer
            .write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;
        self.writer.get_mut().flush()?;
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    /// Records written so far.
    pub fn records(&self) -> usize {
        self.records
    }
}
