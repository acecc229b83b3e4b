//! Numeric comparison of measurement sets
//!
//! Compares two documents cell by cell over the first document's samples and
//! measurement fields, looking each one up by label in the second document.
//! Typical use: a re-measurement of the same chart against the original.

use cti3::Ti3Document;
use thiserror::Error;

/// Errors from numeric comparison
#[derive(Error, Debug)]
pub enum CompareError {
    /// A cell could not be read as a number
    #[error("Cell ({row}, {field}) is not numeric: {value:?}")]
    NotNumeric {
        row: String,
        field: String,
        value: String,
    },

    /// A sample or field of the first document is missing from the second
    #[error(transparent)]
    Lookup(#[from] cti3::Error),

    /// No cells to compare
    #[error("Nothing to compare")]
    Empty,
}

/// Statistics from a numeric comparison
#[derive(Debug, Clone)]
pub struct DifferenceStats {
    /// Mean of squared differences
    pub mean_square: f64,
    /// Largest absolute difference
    pub max_abs: f64,
    /// Sample and field of the largest difference
    pub worst: Option<(String, String)>,
    /// Number of cells compared
    pub count: usize,
}

impl DifferenceStats {
    /// Root of the mean square difference
    pub fn rms(&self) -> f64 {
        self.mean_square.sqrt()
    }

    /// Check if every cell agrees within `tolerance`
    pub fn within(&self, tolerance: f64) -> bool {
        self.max_abs <= tolerance
    }
}

/// Compare all measurement fields of `a` against `b`
pub fn compare_documents(a: &Ti3Document, b: &Ti3Document) -> Result<DifferenceStats, CompareError> {
    let fields: Vec<&str> = a.data().column_labels().iter().map(String::as_str).collect();
    compare_fields(a, b, &fields)
}

/// Compare the named fields of `a` against `b`
pub fn compare_fields(
    a: &Ti3Document,
    b: &Ti3Document,
    fields: &[&str],
) -> Result<DifferenceStats, CompareError> {
    let mut sum = 0.0;
    let mut max_abs = 0.0;
    let mut worst = None;
    let mut count = 0;

    for row in a.row_labels() {
        for &field in fields {
            let diff = numeric(a, row, field)? - numeric(b, row, field)?;
            sum += diff * diff;
            count += 1;

            if diff.abs() > max_abs || worst.is_none() {
                max_abs = diff.abs();
                worst = Some((row.clone(), field.to_string()));
            }
        }
    }

    if count == 0 {
        return Err(CompareError::Empty);
    }

    Ok(DifferenceStats {
        mean_square: sum / count as f64,
        max_abs,
        worst,
        count,
    })
}

/// Mean square difference over all measurement fields of `a`
pub fn mean_square_difference(a: &Ti3Document, b: &Ti3Document) -> Result<f64, CompareError> {
    compare_documents(a, b).map(|stats| stats.mean_square)
}

fn numeric(doc: &Ti3Document, row: &str, field: &str) -> Result<f64, CompareError> {
    let value = doc.get(row, field)?;
    value.trim().parse().map_err(|_| CompareError::NotNumeric {
        row: row.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cti3::DataTable;

    fn doc(values: &[[&str; 2]]) -> Ti3Document {
        let rows = (0..values.len()).map(|i| format!("A{:02}", i + 1)).collect();
        let cells = values
            .iter()
            .map(|r| r.iter().map(|v| v.to_string()).collect())
            .collect();
        let table = DataTable::new(
            rows,
            vec!["XYZ_Y".to_string(), "RGB_R".to_string()],
            cells,
        )
        .unwrap();
        Ti3Document::new("CTI3", table, [])
    }

    #[test]
    fn test_identical_documents() {
        let a = doc(&[["1.0", "2.0"], ["3.0", "4.0"]]);
        let stats = compare_documents(&a, &a).unwrap();
        assert_eq!(stats.mean_square, 0.0);
        assert_eq!(stats.count, 4);
        assert!(stats.within(0.0));
    }

    #[test]
    fn test_differences_accumulate() {
        let a = doc(&[["1.0", "2.0"], ["3.0", "4.0"]]);
        let b = doc(&[["2.0", "2.0"], ["3.0", "2.0"]]);
        // (1 + 0 + 0 + 4) / 4; assigning instead of summing would give 1.0
        assert_eq!(mean_square_difference(&a, &b).unwrap(), 1.25);

        let stats = compare_documents(&a, &b).unwrap();
        assert_eq!(stats.max_abs, 2.0);
        assert_eq!(stats.worst, Some(("A02".to_string(), "RGB_R".to_string())));
        assert!((stats.rms() - 1.25f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_non_numeric_cell() {
        let a = doc(&[["1.0", "x"]]);
        let b = doc(&[["1.0", "2.0"]]);
        assert!(matches!(
            compare_documents(&a, &b),
            Err(CompareError::NotNumeric { .. })
        ));
    }

    #[test]
    fn test_missing_sample_in_second_document() {
        let a = doc(&[["1.0", "2.0"], ["3.0", "4.0"]]);
        let b = doc(&[["1.0", "2.0"]]);
        assert!(matches!(
            compare_documents(&a, &b),
            Err(CompareError::Lookup(cti3::Error::UnknownLabel { .. }))
        ));
    }

    #[test]
    fn test_no_fields_is_empty() {
        let a = doc(&[["1.0", "2.0"]]);
        assert!(matches!(compare_fields(&a, &a, &[]), Err(CompareError::Empty)));
    }
}
