//! CTI3 document model
//!
//! A `Ti3Document` aggregates the file-type tag, the metadata properties, the
//! declared fields and the sample table.
//!
//! The sample-identifier field is stored apart from the table: the table's
//! column labels are the remaining fields, so `fields()[1..]` and the table
//! columns can never drift apart.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use crate::keyword::Keyword;
use crate::table::DataTable;
use crate::{Error, Result};

/// File-type tag written by the writer
pub const CTI3_FILE_TYPE: &str = "CTI3";

/// Canonical name of the sample-identifier field
pub const SAMPLE_ID_FIELD: &str = "SAMPLE_ID";

/// A keyword/value metadata pair
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Property {
    pub keyword: Keyword,
    pub value: String,
}

impl Property {
    pub fn new(keyword: Keyword, value: impl Into<String>) -> Self {
        Self {
            keyword,
            value: value.into(),
        }
    }
}

/// An in-memory CTI3 file
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Ti3Document {
    file_type: String,
    properties: BTreeMap<Keyword, String>,
    sample_id_field: String,
    data: DataTable<String>,
}

impl Ti3Document {
    /// Create a document around a sample table
    ///
    /// The fields become `SAMPLE_ID` followed by the table's column labels.
    /// When a keyword appears more than once in `properties` the last value wins.
    pub fn new(
        file_type: impl Into<String>,
        data: DataTable<String>,
        properties: impl IntoIterator<Item = Property>,
    ) -> Self {
        Self::from_parts(
            file_type.into(),
            SAMPLE_ID_FIELD.to_string(),
            data,
            properties
                .into_iter()
                .map(|p| (p.keyword, p.value))
                .collect(),
        )
    }

    pub(crate) fn from_parts(
        file_type: String,
        sample_id_field: String,
        data: DataTable<String>,
        properties: BTreeMap<Keyword, String>,
    ) -> Self {
        Self {
            file_type,
            properties,
            sample_id_field,
            data,
        }
    }

    /// Parse a document from a file
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let file = File::open(path)?;
        crate::parse(BufReader::new(file))
    }

    /// Write the document to a file in canonical layout
    pub fn write_path(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut out = BufWriter::new(File::create(path)?);
        crate::write(self, &mut out)?;
        out.flush()?;
        Ok(())
    }

    /// The file-type tag from the header line
    pub fn file_type(&self) -> &str {
        &self.file_type
    }

    /// Get a cell by sample id and field name
    ///
    /// Asking for the sample-id field returns the sample id itself.
    pub fn get(&self, row: &str, field: &str) -> Result<&str> {
        if self.data.column_index(field).is_none() && field == self.sample_id_field {
            let i = self
                .data
                .row_index(row)
                .ok_or_else(|| Error::unknown_row(row))?;
            return Ok(self.data.row_labels()[i].as_str());
        }
        self.data.get(row, field).map(String::as_str)
    }

    /// Value of a property
    pub fn property(&self, keyword: Keyword) -> Option<&str> {
        self.properties.get(&keyword).map(String::as_str)
    }

    /// Value of a property by its textual keyword; `None` for unregistered names
    pub fn property_by_name(&self, name: &str) -> Option<&str> {
        Keyword::lookup(name).and_then(|kw| self.property(kw))
    }

    /// All properties, ordered by keyword
    pub fn properties(&self) -> Vec<Property> {
        self.properties
            .iter()
            .map(|(&keyword, value)| Property::new(keyword, value.clone()))
            .collect()
    }

    /// Number of properties
    pub fn property_count(&self) -> usize {
        self.properties.len()
    }

    /// Declared fields; index 0 is the sample-id field
    pub fn fields(&self) -> Vec<&str> {
        std::iter::once(self.sample_id_field.as_str())
            .chain(self.data.column_labels().iter().map(String::as_str))
            .collect()
    }

    /// Name of the sample-id field
    pub fn sample_id_field(&self) -> &str {
        &self.sample_id_field
    }

    /// Sample ids, in file order
    pub fn row_labels(&self) -> &[String] {
        self.data.row_labels()
    }

    /// The sample table
    pub fn data(&self) -> &DataTable<String> {
        &self.data
    }

    /// Mutable access to the sample table
    ///
    /// Appends made here leave declared `NUMBER_OF_FIELDS`/`NUMBER_OF_SETS`
    /// untouched; use [`add_row`](Self::add_row) and
    /// [`add_column`](Self::add_column) to keep them in step.
    pub fn data_mut(&mut self) -> &mut DataTable<String> {
        &mut self.data
    }

    /// Append a sample row
    ///
    /// A declared `NUMBER_OF_SETS` is updated to the new row count.
    pub fn add_row(&mut self, sample_id: impl Into<String>, values: Vec<String>) -> Result<()> {
        self.data.add_row(sample_id, values)?;
        self.update_declared(Keyword::NumberOfSets, self.data.rows());
        Ok(())
    }

    /// Append a measurement field
    ///
    /// A declared `NUMBER_OF_FIELDS` is updated to the new field count.
    pub fn add_column(&mut self, field: impl Into<String>, values: Vec<String>) -> Result<()> {
        self.data.add_column(field, values)?;
        self.update_declared(Keyword::NumberOfFields, self.data.cols() + 1);
        Ok(())
    }

    fn update_declared(&mut self, keyword: Keyword, count: usize) {
        if let Some(value) = self.properties.get_mut(&keyword) {
            *value = count.to_string();
        }
    }

    /// Compare properties, fields and data, ignoring the file-type tag
    pub fn content_eq(&self, other: &Self) -> bool {
        self.properties == other.properties
            && self.sample_id_field == other.sample_id_field
            && self.data == other.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s1_table() -> DataTable<String> {
        DataTable::new(
            vec!["A01".to_string()],
            vec!["XYZ_Y".to_string()],
            vec![vec!["41.78148".to_string()]],
        )
        .unwrap()
    }

    #[test]
    fn test_new_derives_fields() {
        let doc = Ti3Document::new("CTI3", s1_table(), []);
        assert_eq!(doc.fields(), ["SAMPLE_ID", "XYZ_Y"]);
        assert_eq!(doc.row_labels(), ["A01".to_string()]);
        assert_eq!(doc.get("A01", "XYZ_Y").unwrap(), "41.78148");
    }

    #[test]
    fn test_later_property_overwrites_earlier() {
        let doc = Ti3Document::new(
            "CTI3",
            s1_table(),
            [
                Property::new(Keyword::Originator, "v1"),
                Property::new(Keyword::Originator, "v2"),
            ],
        );
        assert_eq!(doc.property(Keyword::Originator), Some("v2"));
        assert_eq!(doc.property_count(), 1);
        assert_eq!(doc.properties(), [Property::new(Keyword::Originator, "v2")]);
    }

    #[test]
    fn test_get_sample_id_field_returns_row_label() {
        let doc = Ti3Document::new("CTI3", s1_table(), []);
        assert_eq!(doc.get("A01", "SAMPLE_ID").unwrap(), "A01");
        assert!(doc.get("B01", "SAMPLE_ID").is_err());
    }

    #[test]
    fn test_property_by_name() {
        let doc = Ti3Document::new(
            "CTI3",
            s1_table(),
            [Property::new(Keyword::ColorRep, "XYZ_RGB")],
        );
        assert_eq!(doc.property_by_name("COLOR_REP"), Some("XYZ_RGB"));
        assert_eq!(doc.property_by_name("FOO"), None);
        assert_eq!(doc.property_by_name("DESCRIPTOR"), None);
    }

    #[test]
    fn test_add_column_keeps_fields_in_sync() {
        let mut doc = Ti3Document::new("CTI3", s1_table(), []);
        doc.add_column("RGB_R", vec!["8.586318".to_string()]).unwrap();
        assert_eq!(doc.fields(), ["SAMPLE_ID", "XYZ_Y", "RGB_R"]);
    }

    #[test]
    fn test_appends_update_declared_counts() {
        let mut doc = Ti3Document::new(
            "CTI3",
            s1_table(),
            [
                Property::new(Keyword::NumberOfFields, "2"),
                Property::new(Keyword::NumberOfSets, "1"),
            ],
        );
        doc.add_column("RGB_R", vec!["8.586318".to_string()]).unwrap();
        doc.add_row("A02", vec!["42.0".to_string(), "9.1".to_string()])
            .unwrap();
        assert_eq!(doc.property(Keyword::NumberOfFields), Some("3"));
        assert_eq!(doc.property(Keyword::NumberOfSets), Some("2"));

        // A failed append changes nothing
        assert!(doc.add_row("A03", vec!["1".to_string()]).is_err());
        assert_eq!(doc.property(Keyword::NumberOfSets), Some("2"));
    }

    #[test]
    fn test_appends_do_not_invent_declared_counts() {
        let mut doc = Ti3Document::new("CTI3", s1_table(), []);
        doc.add_row("A02", vec!["42.0".to_string()]).unwrap();
        assert_eq!(doc.property(Keyword::NumberOfSets), None);
        assert_eq!(doc.property_count(), 0);
    }

    #[test]
    fn test_content_eq_ignores_file_type() {
        let a = Ti3Document::new("CTI3", s1_table(), []);
        let b = Ti3Document::new("CGATS.17", s1_table(), []);
        assert_ne!(a, b);
        assert!(a.content_eq(&b));
    }
}
