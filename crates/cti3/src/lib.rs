//! # cti3 - Argyll CTI3 calibration data
//!
//! Reader and writer for the plain-text tabular format used by the Argyll
//! color management toolchain for calibration targets and measurements
//! (`.ti1`/`.ti2`/`.ti3` files, see <https://argyllcms.com/doc/ti3_format.html>).
//!
//! A file has four parts:
//!
//! 1. A file-type tag on the first line (`CTI3`)
//! 2. Keyword/value metadata such as `ORIGINATOR "Argyll target"`
//! 3. A `BEGIN_DATA_FORMAT` block naming the fields, `SAMPLE_ID` first
//! 4. A `BEGIN_DATA` block with one sample per line
//!
//! Only the subset of keywords in [`Keyword`] is understood; other lines are
//! skipped. Cells are kept as text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use cti3::Keyword;
//!
//! let text = std::fs::read_to_string("target.ti3").unwrap();
//! let mut doc = cti3::parse_str(&text).unwrap();
//!
//! println!("{:?}", doc.property(Keyword::Originator));
//! println!("{}", doc.get("A01", "XYZ_Y").unwrap());
//!
//! let n = doc.row_labels().len();
//! doc.add_column("NOTE", vec!["-".to_string(); n]).unwrap();
//!
//! let out = cti3::to_string(&doc).unwrap();
//! ```

pub mod document;
pub mod error;
pub mod keyword;
pub mod parser;
pub mod table;
pub mod writer;

pub use document::{CTI3_FILE_TYPE, Property, SAMPLE_ID_FIELD, Ti3Document};
pub use error::{Axis, Error, Result};
pub use keyword::Keyword;
pub use parser::{ParseOptions, parse, parse_str, parse_with_options};
pub use table::DataTable;
pub use writer::{Ti3Writer, to_string, write};

/// Version of cti3
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
