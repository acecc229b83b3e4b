//! Labelled two-dimensional table
//!
//! A `DataTable` is a rectangular grid of cells addressed either by index or
//! by a (row label, column label) pair. In a CTI3 document the row labels are
//! the sample identifiers and the column labels are the measurement fields.
//!
//! Label lookup is a linear first-match search on each axis, so duplicate
//! labels are tolerated but only the first occurrence is addressable by name.

use crate::{Error, Result};

/// A rectangular grid of cells with labelled rows and columns
///
/// Every row always holds exactly `cols()` cells; the constructor and both
/// append operations check this before touching the table.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawDataTable<T>"))]
pub struct DataTable<T> {
    row_labels: Vec<String>,
    column_labels: Vec<String>,
    cells: Vec<Vec<T>>,
}

/// Unchecked table as it appears in serialized form
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct RawDataTable<T> {
    row_labels: Vec<String>,
    column_labels: Vec<String>,
    cells: Vec<Vec<T>>,
}

#[cfg(feature = "serde")]
impl<T> TryFrom<RawDataTable<T>> for DataTable<T> {
    type Error = Error;

    fn try_from(raw: RawDataTable<T>) -> Result<Self> {
        Self::new(raw.row_labels, raw.column_labels, raw.cells)
    }
}

impl<T> DataTable<T> {
    /// Create a table from labels and a row-major cell grid
    ///
    /// Requires at least one row and one column, one cell row per row label
    /// and one cell per column label in every row.
    pub fn new(
        row_labels: Vec<String>,
        column_labels: Vec<String>,
        cells: Vec<Vec<T>>,
    ) -> Result<Self> {
        if row_labels.is_empty() {
            return Err(Error::InvalidShape("table has no rows".to_string()));
        }
        if column_labels.is_empty() {
            return Err(Error::InvalidShape("table has no columns".to_string()));
        }
        if cells.len() != row_labels.len() {
            return Err(Error::InvalidShape(format!(
                "{} row labels but {} cell rows",
                row_labels.len(),
                cells.len()
            )));
        }
        if let Some((i, row)) = cells
            .iter()
            .enumerate()
            .find(|(_, row)| row.len() != column_labels.len())
        {
            return Err(Error::InvalidShape(format!(
                "row {} has {} cells, expected {}",
                i,
                row.len(),
                column_labels.len()
            )));
        }

        Ok(Self {
            row_labels,
            column_labels,
            cells,
        })
    }

    /// Number of rows
    pub fn rows(&self) -> usize {
        self.row_labels.len()
    }

    /// Number of columns
    pub fn cols(&self) -> usize {
        self.column_labels.len()
    }

    /// Row labels, in order
    pub fn row_labels(&self) -> &[String] {
        &self.row_labels
    }

    /// Column labels, in order
    pub fn column_labels(&self) -> &[String] {
        &self.column_labels
    }

    /// Index of the first row with this label
    pub fn row_index(&self, label: &str) -> Option<usize> {
        self.row_labels.iter().position(|l| l == label)
    }

    /// Index of the first column with this label
    pub fn column_index(&self, label: &str) -> Option<usize> {
        self.column_labels.iter().position(|l| l == label)
    }

    /// Get a cell by row and column label
    pub fn get(&self, row: &str, column: &str) -> Result<&T> {
        let i = self.row_index(row).ok_or_else(|| Error::unknown_row(row))?;
        let j = self
            .column_index(column)
            .ok_or_else(|| Error::unknown_column(column))?;
        self.get_at(i, j)
    }

    /// Get a cell by row and column index
    pub fn get_at(&self, row: usize, column: usize) -> Result<&T> {
        self.cells
            .get(row)
            .and_then(|r| r.get(column))
            .ok_or(Error::OutOfRange {
                row,
                column,
                rows: self.rows(),
                columns: self.cols(),
            })
    }

    /// Get a mutable cell by row and column index
    pub fn get_at_mut(&mut self, row: usize, column: usize) -> Result<&mut T> {
        let (rows, columns) = (self.rows(), self.cols());
        self.cells
            .get_mut(row)
            .and_then(|r| r.get_mut(column))
            .ok_or(Error::OutOfRange {
                row,
                column,
                rows,
                columns,
            })
    }

    /// Cells of row `i`
    pub fn row(&self, i: usize) -> Option<&[T]> {
        self.cells.get(i).map(Vec::as_slice)
    }

    /// Iterate over `(row label, cells)` pairs
    pub fn iter_rows(&self) -> impl Iterator<Item = (&str, &[T])> + '_ {
        self.row_labels
            .iter()
            .map(String::as_str)
            .zip(self.cells.iter().map(Vec::as_slice))
    }

    /// Append a column; `values` must hold one cell per row
    pub fn add_column(&mut self, label: impl Into<String>, values: Vec<T>) -> Result<()> {
        if values.len() != self.rows() {
            return Err(Error::ShapeMismatch {
                expected: self.rows(),
                actual: values.len(),
            });
        }

        self.column_labels.push(label.into());
        for (row, value) in self.cells.iter_mut().zip(values) {
            row.push(value);
        }
        Ok(())
    }

    /// Append a row; `values` must hold one cell per column
    pub fn add_row(&mut self, label: impl Into<String>, values: Vec<T>) -> Result<()> {
        if values.len() != self.cols() {
            return Err(Error::ShapeMismatch {
                expected: self.cols(),
                actual: values.len(),
            });
        }

        self.row_labels.push(label.into());
        self.cells.push(values);
        Ok(())
    }

    /// Convert every cell, keeping labels and shape
    pub fn map<U>(&self, mut f: impl FnMut(&T) -> U) -> DataTable<U> {
        DataTable {
            row_labels: self.row_labels.clone(),
            column_labels: self.column_labels.clone(),
            cells: self
                .cells
                .iter()
                .map(|row| row.iter().map(&mut f).collect())
                .collect(),
        }
    }

    /// Convert every cell, stopping at the first failure
    pub fn try_map<U, E>(
        &self,
        mut f: impl FnMut(&T) -> std::result::Result<U, E>,
    ) -> std::result::Result<DataTable<U>, E> {
        let mut cells = Vec::with_capacity(self.cells.len());
        for row in &self.cells {
            cells.push(row.iter().map(&mut f).collect::<std::result::Result<Vec<_>, _>>()?);
        }

        Ok(DataTable {
            row_labels: self.row_labels.clone(),
            column_labels: self.column_labels.clone(),
            cells,
        })
    }
}
