//! CTI3 Writer
//!
//! Emits a document in a fixed canonical layout:
//!
//! ```text
//! CTI3
//!
//! KEYWORD "value"
//! ...
//!
//! NUMBER_OF_FIELDS <F>
//! BEGIN_DATA_FORMAT
//! SAMPLE_ID <field> ... <field>
//! END_DATA_FORMAT
//!
//! NUMBER_OF_SETS <R>
//! BEGIN_DATA
//! <sample id> <cell> ... <cell>
//! END_DATA
//! ```
//!
//! The header is always `CTI3`. Structural keywords are written from the
//! document shape, never from the property map. Property values are wrapped
//! in double quotes without escaping.

use std::io::{self, Write};

use crate::document::{CTI3_FILE_TYPE, Ti3Document};
use crate::keyword::Keyword;
use crate::{Error, Result};

/// Write a document to a UTF-8 sink
///
/// The sink is not buffered here; wrap files in a `BufWriter`.
pub fn write<W: Write>(document: &Ti3Document, sink: W) -> Result<()> {
    Ti3Writer::new(sink).write_document(document)
}

/// Render a document to a string
pub fn to_string(document: &Ti3Document) -> Result<String> {
    let mut buf = Vec::new();
    write(document, &mut buf)?;
    String::from_utf8(buf).map_err(|e| Error::Io(io::Error::new(io::ErrorKind::InvalidData, e)))
}

/// Serializes documents section by section
pub struct Ti3Writer<W> {
    out: W,
}

impl<W: Write> Ti3Writer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    /// Write every section of the document
    pub fn write_document(&mut self, document: &Ti3Document) -> Result<()> {
        self.write_header()?;
        self.write_properties(document)?;
        writeln!(self.out)?;
        self.write_format(document)?;
        writeln!(self.out)?;
        self.write_data(document)?;
        Ok(())
    }

    fn write_header(&mut self) -> Result<()> {
        writeln!(self.out, "{}", CTI3_FILE_TYPE)?;
        writeln!(self.out)?;
        Ok(())
    }

    fn write_properties(&mut self, document: &Ti3Document) -> Result<()> {
        for property in document.properties() {
            if property.keyword.is_layout() {
                continue;
            }
            writeln!(self.out, "{} \"{}\"", property.keyword, property.value)?;
        }
        Ok(())
    }

    fn write_format(&mut self, document: &Ti3Document) -> Result<()> {
        let fields = document.fields();

        writeln!(self.out, "{} {}", Keyword::NumberOfFields, fields.len())?;
        writeln!(self.out, "{}", Keyword::BeginDataFormat)?;
        for field in &fields {
            write!(self.out, "{} ", field)?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "{}", Keyword::EndDataFormat)?;
        Ok(())
    }

    fn write_data(&mut self, document: &Ti3Document) -> Result<()> {
        let table = document.data();

        writeln!(self.out, "{} {}", Keyword::NumberOfSets, table.rows())?;
        writeln!(self.out, "{}", Keyword::BeginData)?;
        for (sample_id, cells) in table.iter_rows() {
            write!(self.out, "{}", sample_id)?;
            for cell in cells {
                write!(self.out, " {}", cell)?;
            }
            writeln!(self.out)?;
        }
        writeln!(self.out, "{}", Keyword::EndData)?;
        Ok(())
    }

    /// Recover the sink
    pub fn into_inner(self) -> W {
        self.out
    }
}
