//! Round-trip harness
//!
//! Writes a document, parses the output back and reports which parts of the
//! document survived.

use std::fmt;

use cti3::{Keyword, Property, Ti3Document};

/// Outcome of one write/re-parse cycle
#[derive(Debug)]
pub struct RoundTripResult {
    /// Name of the check
    pub name: String,
    /// The written text
    pub text: String,
    /// The re-parsed document
    pub reparsed: Ti3Document,
    /// Fields vector equal, in order
    pub fields_match: bool,
    /// Row labels, column labels and cells equal
    pub data_match: bool,
    /// Properties other than the shape-derived ones equal as a keyed set
    pub metadata_match: bool,
    /// Every NUMBER_OF_FIELDS/NUMBER_OF_SETS the document declares survived
    pub counts_match: bool,
}

impl RoundTripResult {
    /// Check if every part survived
    pub fn passed(&self) -> bool {
        self.fields_match && self.data_match && self.metadata_match && self.counts_match
    }
}

impl fmt::Display for RoundTripResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: fields={} data={} metadata={} counts={}",
            self.name, self.fields_match, self.data_match, self.metadata_match, self.counts_match
        )
    }
}

/// A named round-trip check
pub struct RoundTripCheck {
    /// Check name
    pub name: String,
}

impl RoundTripCheck {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Write `document`, parse it back and compare
    pub fn run(&self, document: &Ti3Document) -> cti3::Result<RoundTripResult> {
        let text = cti3::to_string(document)?;
        let reparsed = cti3::parse_str(&text)?;

        let fields_match = document.fields() == reparsed.fields();
        let data_match = document.data() == reparsed.data();
        let metadata_match = metadata(document) == metadata(&reparsed);
        let counts_match = [Keyword::NumberOfFields, Keyword::NumberOfSets]
            .into_iter()
            .all(|keyword| match document.property(keyword) {
                Some(declared) => reparsed.property(keyword) == Some(declared),
                None => true,
            });

        let result = RoundTripResult {
            name: self.name.clone(),
            text,
            reparsed,
            fields_match,
            data_match,
            metadata_match,
            counts_match,
        };
        log::debug!("{}", result);
        Ok(result)
    }
}

fn metadata(document: &Ti3Document) -> Vec<Property> {
    document
        .properties()
        .into_iter()
        .filter(|p| !p.keyword.is_layout())
        .collect()
}
