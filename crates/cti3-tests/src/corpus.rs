//! Test corpus management
//!
//! Fixtures live under `testdata/ti3/` at the repository root and are
//! described by `manifest.json` in that directory.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::Deserialize;

/// Expectations for a well-formed fixture
#[derive(Debug, Clone, Deserialize)]
pub struct Fixture {
    /// Path relative to the corpus directory
    pub file: String,
    /// What the fixture exercises
    #[serde(default)]
    pub description: String,
    /// Expected number of samples
    pub rows: usize,
    /// Expected number of fields, sample id included
    pub fields: usize,
    /// Expected property values by keyword text
    #[serde(default)]
    pub properties: BTreeMap<String, String>,
    /// Expected `[sample id, field, value]` cells
    #[serde(default)]
    pub cells: Vec<[String; 3]>,
}

/// Kind of failure a malformed fixture must produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpectedError {
    Truncated,
    MissingFormat,
    ShapeMismatch,
    InvalidShape,
    MissingData,
}

impl ExpectedError {
    /// Check whether a parse error is of this kind
    pub fn matches(&self, err: &cti3::Error) -> bool {
        matches!(
            (self, err),
            (Self::Truncated, cti3::Error::Truncated { .. })
                | (Self::MissingFormat, cti3::Error::MissingFormat { .. })
                | (Self::ShapeMismatch, cti3::Error::ShapeMismatch { .. })
                | (Self::InvalidShape, cti3::Error::InvalidShape(_))
                | (Self::MissingData, cti3::Error::MissingData)
        )
    }
}

/// A fixture that must fail to parse
#[derive(Debug, Clone, Deserialize)]
pub struct MalformedFixture {
    pub file: String,
    pub error: ExpectedError,
}

#[derive(Debug, Deserialize)]
struct Manifest {
    fixtures: Vec<Fixture>,
    #[serde(default)]
    malformed: Vec<MalformedFixture>,
}

/// Fixture corpus loaded from a manifest
pub struct TestCorpus {
    fixtures: Vec<Fixture>,
    malformed: Vec<MalformedFixture>,
    base_path: PathBuf,
}

impl TestCorpus {
    /// Default corpus location, `testdata/ti3` at the repository root
    pub fn default_path() -> PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("..")
            .join("..")
            .join("testdata")
            .join("ti3")
    }

    /// Load the manifest from `base_path/manifest.json`
    pub fn load(base_path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let base_path = base_path.as_ref().to_path_buf();
        let manifest_path = base_path.join("manifest.json");
        let text = std::fs::read_to_string(&manifest_path)
            .with_context(|| format!("reading {}", manifest_path.display()))?;
        let manifest: Manifest = serde_json::from_str(&text)
            .with_context(|| format!("parsing {}", manifest_path.display()))?;

        log::debug!(
            "corpus at {}: {} fixtures, {} malformed",
            base_path.display(),
            manifest.fixtures.len(),
            manifest.malformed.len()
        );

        Ok(Self {
            fixtures: manifest.fixtures,
            malformed: manifest.malformed,
            base_path,
        })
    }

    /// Well-formed fixtures
    pub fn fixtures(&self) -> &[Fixture] {
        &self.fixtures
    }

    /// Fixtures that must fail
    pub fn malformed(&self) -> &[MalformedFixture] {
        &self.malformed
    }

    /// Get a fixture by file name
    pub fn get(&self, file: &str) -> Option<&Fixture> {
        self.fixtures.iter().find(|f| f.file == file)
    }

    /// Absolute path of a fixture file
    pub fn path_of(&self, file: &str) -> PathBuf {
        self.base_path.join(file)
    }

    /// Parse a fixture file
    pub fn parse(&self, file: &str) -> cti3::Result<cti3::Ti3Document> {
        cti3::Ti3Document::from_path(self.path_of(file))
    }
}

/// Inline documents used across the test suites
pub mod samples {
    /// The minimal single-sample document
    pub const MINIMAL: &str = "CTI3
ORIGINATOR \"Argyll target\"
NUMBER_OF_FIELDS 2
BEGIN_DATA_FORMAT
SAMPLE_ID XYZ_Y
END_DATA_FORMAT
NUMBER_OF_SETS 1
BEGIN_DATA
A01 41.78148
END_DATA
";

    /// Insert `lines` before the first line starting with `anchor`
    pub fn insert_before(text: &str, anchor: &str, lines: &[&str]) -> String {
        let mut out = String::with_capacity(text.len() + 64);
        let mut inserted = false;
        for line in text.lines() {
            if !inserted && line.starts_with(anchor) {
                for extra in lines {
                    out.push_str(extra);
                    out.push('\n');
                }
                inserted = true;
            }
            out.push_str(line);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_loads() {
        let corpus = TestCorpus::load(TestCorpus::default_path()).unwrap();
        assert!(!corpus.fixtures().is_empty());
        assert!(corpus.get("xyz_rgb_target.ti3").is_some());
    }

    #[test]
    fn test_insert_before() {
        let text = samples::insert_before("A\nB\nC\n", "B", &["x", "y"]);
        assert_eq!(text, "A\nx\ny\nB\nC\n");
    }

    #[test]
    fn test_expected_error_matching() {
        let err = cti3::Error::MissingFormat { line: 3 };
        assert!(ExpectedError::MissingFormat.matches(&err));
        assert!(!ExpectedError::Truncated.matches(&err));
    }
}
