//! CTI3 Parser
//!
//! A single pass over the source lines with three phases:
//! 1. The header line, which becomes the file type
//! 2. Body lines: keyword/value properties, skipped comments and unknown lines
//! 3. The format and data blocks, each read by its own sub-parser when the
//!    body reaches `BEGIN_DATA_FORMAT` or `BEGIN_DATA`
//!
//! # Usage
//!
//! ```ignore
//! let doc = cti3::parse(BufReader::new(File::open("target.ti3")?))?;
//! println!("{} samples", doc.row_labels().len());
//! ```

use std::collections::BTreeMap;
use std::io::{BufRead, Lines};

use log::{debug, trace, warn};

use crate::document::{SAMPLE_ID_FIELD, Ti3Document};
use crate::keyword::Keyword;
use crate::table::DataTable;
use crate::{Error, Result};

/// Options controlling how strictly a CTI3 source is read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Require `NUMBER_OF_FIELDS` and `NUMBER_OF_SETS` to match what was read
    pub check_declared_counts: bool,
    /// Skip blank lines inside the data block instead of rejecting them
    pub skip_blank_data_lines: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            check_declared_counts: false,
            skip_blank_data_lines: true,
        }
    }
}

impl ParseOptions {
    pub fn with_check_declared_counts(mut self, check: bool) -> Self {
        self.check_declared_counts = check;
        self
    }

    pub fn with_skip_blank_data_lines(mut self, skip: bool) -> Self {
        self.skip_blank_data_lines = skip;
        self
    }
}

/// Parse a document with default options
pub fn parse<R: BufRead>(source: R) -> Result<Ti3Document> {
    parse_with_options(source, ParseOptions::default())
}

/// Parse a document
pub fn parse_with_options<R: BufRead>(source: R, options: ParseOptions) -> Result<Ti3Document> {
    Ti3Parser::new(source, options).parse()
}

/// Parse a document held in memory with default options
pub fn parse_str(text: &str) -> Result<Ti3Document> {
    parse(text.as_bytes())
}

struct Ti3Parser<R> {
    lines: Lines<R>,
    /// 1-based number of the last line read
    line: usize,
    options: ParseOptions,
}

impl<R: BufRead> Ti3Parser<R> {
    fn new(source: R, options: ParseOptions) -> Self {
        Self {
            lines: source.lines(),
            line: 0,
            options,
        }
    }

    fn next_line(&mut self) -> Result<Option<String>> {
        match self.lines.next() {
            Some(line) => {
                self.line += 1;
                Ok(Some(line?))
            }
            None => Ok(None),
        }
    }

    /// Next line, failing with `Truncated` at end of input
    fn require_line(&mut self, block: &'static str) -> Result<String> {
        self.next_line()?.ok_or(Error::Truncated { block })
    }

    fn parse(mut self) -> Result<Ti3Document> {
        let file_type = self.read_header()?;
        debug!("file type {:?}", file_type);

        let mut properties = BTreeMap::new();
        let mut fields: Option<Vec<String>> = None;
        let mut data: Option<DataTable<String>> = None;

        while let Some(raw) = self.next_line()? {
            let line = raw.trim();
            if is_blank_or_comment(line) {
                continue;
            }

            let tokens = tokenize(line);
            let Some(&first) = tokens.first() else {
                continue;
            };
            let Some(keyword) = Keyword::lookup(first) else {
                trace!("line {}: skipping unknown keyword {:?}", self.line, first);
                continue;
            };

            match keyword {
                Keyword::BeginDataFormat => {
                    fields = Some(self.read_format()?);
                }
                Keyword::BeginData => {
                    let Some(declared) = &fields else {
                        return Err(Error::MissingFormat { line: self.line });
                    };
                    data = Some(self.read_data(declared[1..].to_vec())?);
                }
                _ => match tokens.get(1) {
                    Some(value) => {
                        properties.insert(keyword, value.replace('"', ""));
                    }
                    None => trace!("line {}: {} without a value", self.line, keyword),
                },
            }
        }

        let data = data.ok_or(Error::MissingData)?;
        // A data block always follows a format block, so fields are set here
        let mut fields = fields.ok_or(Error::MissingData)?;

        if fields[1..] != *data.column_labels() {
            return Err(Error::InvalidShape(format!(
                "declared fields {:?} do not match data columns {:?}",
                &fields[1..],
                data.column_labels()
            )));
        }

        self.check_declared_counts(&properties, fields.len(), data.rows())?;

        let sample_id_field = fields.remove(0);
        Ok(Ti3Document::from_parts(
            file_type,
            sample_id_field,
            data,
            properties,
        ))
    }

    /// Read the file-type tag, skipping any leading blank or comment lines
    fn read_header(&mut self) -> Result<String> {
        loop {
            let raw = self.require_line("header")?;
            let line = raw.trim();
            if !is_blank_or_comment(line) {
                return Ok(line.to_string());
            }
        }
    }

    /// Read the field line and the `END_DATA_FORMAT` line after it
    fn read_format(&mut self) -> Result<Vec<String>> {
        let raw = self.require_line("BEGIN_DATA_FORMAT")?;
        let line = raw.trim();
        if line.is_empty() || line == Keyword::EndDataFormat.as_str() {
            return Err(Error::InvalidShape(format!(
                "empty data format on line {}",
                self.line
            )));
        }

        let fields: Vec<String> = line
            .split(' ')
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();

        if fields[0] != SAMPLE_ID_FIELD {
            debug!(
                "line {}: first field is {:?}, not {}",
                self.line, fields[0], SAMPLE_ID_FIELD
            );
        }

        let terminator = self.require_line("BEGIN_DATA_FORMAT")?;
        if terminator.trim() != Keyword::EndDataFormat.as_str() {
            warn!(
                "line {}: expected END_DATA_FORMAT, found {:?}",
                self.line,
                terminator.trim()
            );
        }

        debug!("data format with {} fields", fields.len());
        Ok(fields)
    }

    /// Read sample rows up to `END_DATA`
    fn read_data(&mut self, columns: Vec<String>) -> Result<DataTable<String>> {
        let mut row_labels = Vec::new();
        let mut cells = Vec::new();

        loop {
            let raw = self.require_line("BEGIN_DATA")?;
            let line = raw.trim();
            if line == Keyword::EndData.as_str() {
                break;
            }

            if line.is_empty() {
                if self.options.skip_blank_data_lines {
                    warn!("line {}: blank line inside data block", self.line);
                    continue;
                }
                return Err(Error::ShapeMismatch {
                    expected: columns.len(),
                    actual: 0,
                });
            }

            let mut tokens = line.split_whitespace();
            let label = tokens.next().unwrap_or_default();
            let values: Vec<String> = tokens.map(str::to_string).collect();
            if values.len() != columns.len() {
                debug!(
                    "line {}: sample {:?} has {} values for {} fields",
                    self.line,
                    label,
                    values.len(),
                    columns.len()
                );
                return Err(Error::ShapeMismatch {
                    expected: columns.len(),
                    actual: values.len(),
                });
            }

            row_labels.push(label.to_string());
            cells.push(values);
        }

        debug!("data block with {} samples", row_labels.len());
        DataTable::new(row_labels, columns, cells)
    }

    fn check_declared_counts(
        &self,
        properties: &BTreeMap<Keyword, String>,
        fields: usize,
        sets: usize,
    ) -> Result<()> {
        for (keyword, actual) in [
            (Keyword::NumberOfFields, fields),
            (Keyword::NumberOfSets, sets),
        ] {
            let Some(value) = properties.get(&keyword) else {
                continue;
            };

            match value.trim().parse::<usize>() {
                Ok(declared) if declared == actual => {}
                Ok(declared) if self.options.check_declared_counts => {
                    return Err(Error::ShapeMismatch {
                        expected: declared,
                        actual,
                    });
                }
                Ok(declared) => {
                    warn!("{} declares {} but {} were read", keyword, declared, actual);
                }
                Err(_) if self.options.check_declared_counts => {
                    return Err(Error::InvalidShape(format!(
                        "{} is not a count: {:?}",
                        keyword, value
                    )));
                }
                Err(_) => {
                    warn!("{} is not a count: {:?}", keyword, value);
                }
            }
        }
        Ok(())
    }
}

fn is_blank_or_comment(line: &str) -> bool {
    line.is_empty() || line.starts_with('#')
}

/// Split a line on whitespace runs, keeping whitespace inside double quotes
///
/// A whitespace character separates tokens only when an even number of
/// unescaped quotes follow it on the line. Quotes are kept in the tokens.
fn tokenize(line: &str) -> Vec<&str> {
    let mut remaining = count_quotes(line);
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut prev = None;

    for (i, c) in line.char_indices() {
        if is_unescaped_quote(prev, c) {
            remaining -= 1;
        } else if c.is_whitespace() && remaining % 2 == 0 {
            if start < i {
                tokens.push(&line[start..i]);
            }
            start = i + c.len_utf8();
        }
        prev = Some(c);
    }

    if start < line.len() {
        tokens.push(&line[start..]);
    }
    tokens
}

fn count_quotes(line: &str) -> usize {
    let mut prev = None;
    let mut count = 0;
    for c in line.chars() {
        if is_unescaped_quote(prev, c) {
            count += 1;
        }
        prev = Some(c);
    }
    count
}

fn is_unescaped_quote(prev: Option<char>, c: char) -> bool {
    c == '"' && prev != Some('\\')
}

#[cfg(test)]
mod tests {
    use super::*;

    const S1: &str = "CTI3
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

    #[test]
    fn test_tokenize_plain() {
        assert_eq!(tokenize("NUMBER_OF_SETS   1"), ["NUMBER_OF_SETS", "1"]);
        assert_eq!(tokenize("A\tB"), ["A", "B"]);
        assert!(tokenize("").is_empty());
    }

    #[test]
    fn test_tokenize_keeps_quoted_whitespace() {
        assert_eq!(
            tokenize("DESCRIPTOR \"a b  c\""),
            ["DESCRIPTOR", "\"a b  c\""]
        );
        assert_eq!(
            tokenize("CREATED \"Thu Nov 03 17:55:21 2016\" extra"),
            ["CREATED", "\"Thu Nov 03 17:55:21 2016\"", "extra"]
        );
    }

    #[test]
    fn test_tokenize_unbalanced_quote() {
        // One quote to the right of the first space: it does not split
        assert_eq!(tokenize("A \"b c"), ["A \"b", "c"]);
    }

    #[test]
    fn test_tokenize_escaped_quote_is_not_counted() {
        assert_eq!(tokenize("A \\\" b"), ["A", "\\\"", "b"]);
    }

    #[test]
    fn test_parse_minimal() {
        let doc = parse_str(S1).unwrap();
        assert_eq!(doc.file_type(), "CTI3");
        assert_eq!(doc.property(Keyword::Originator), Some("Argyll target"));
        assert_eq!(doc.property(Keyword::NumberOfFields), Some("2"));
        assert_eq!(doc.property(Keyword::NumberOfSets), Some("1"));
        assert_eq!(doc.fields(), ["SAMPLE_ID", "XYZ_Y"]);
        assert_eq!(doc.get("A01", "XYZ_Y").unwrap(), "41.78148");
    }

    #[test]
    fn test_parse_skips_comments_blank_and_unknown() {
        let text = S1.replace(
            "ORIGINATOR",
            "# a comment\n\n   # indented comment\nFOO \"bar\"\nKEYWORD \"x\"\nORIGINATOR",
        );
        let doc = parse_str(&text).unwrap();
        assert_eq!(doc, parse_str(S1).unwrap());
        assert_eq!(doc.property_by_name("FOO"), None);
    }

    #[test]
    fn test_parse_strips_all_quotes_from_value() {
        let text = S1.replace("\"Argyll target\"", "\"Ar\"g\"yll\"");
        let doc = parse_str(&text).unwrap();
        assert_eq!(doc.property(Keyword::Originator), Some("Argyll"));
    }

    #[test]
    fn test_property_without_value_is_ignored() {
        let text = S1.replace("ORIGINATOR \"Argyll target\"", "ORIGINATOR");
        let doc = parse_str(&text).unwrap();
        assert_eq!(doc.property(Keyword::Originator), None);
    }

    #[test]
    fn test_header_is_trimmed_and_may_follow_comments() {
        let text = format!("# produced by a script\n\n  CGATS.17  \n{}", &S1[5..]);
        let doc = parse_str(&text).unwrap();
        assert_eq!(doc.file_type(), "CGATS.17");
    }

    #[test]
    fn test_empty_source_is_truncated() {
        assert!(matches!(
            parse_str(""),
            Err(Error::Truncated { block: "header" })
        ));
    }

    #[test]
    fn test_data_before_format() {
        let text = "CTI3\nBEGIN_DATA\nA01 1\nEND_DATA\n";
        assert!(matches!(
            parse_str(text),
            Err(Error::MissingFormat { line: 2 })
        ));
    }

    #[test]
    fn test_missing_end_data_is_truncated() {
        let text = S1.replace("END_DATA\n", "");
        assert!(matches!(
            parse_str(&text),
            Err(Error::Truncated { block: "BEGIN_DATA" })
        ));
    }

    #[test]
    fn test_format_block_at_end_is_truncated() {
        let text = "CTI3\nBEGIN_DATA_FORMAT\nSAMPLE_ID XYZ_Y\n";
        assert!(matches!(
            parse_str(text),
            Err(Error::Truncated { block: "BEGIN_DATA_FORMAT" })
        ));
    }

    #[test]
    fn test_row_width_mismatch() {
        let text = S1.replace("A01 41.78148", "A01 41.78148 8.5");
        assert!(matches!(
            parse_str(&text),
            Err(Error::ShapeMismatch { expected: 1, actual: 2 })
        ));
    }

    #[test]
    fn test_no_data_block() {
        let text = "CTI3\nORIGINATOR \"x\"\n";
        assert!(matches!(parse_str(text), Err(Error::MissingData)));
    }

    #[test]
    fn test_empty_format_rejected() {
        let text = "CTI3\nBEGIN_DATA_FORMAT\nEND_DATA_FORMAT\nBEGIN_DATA\nEND_DATA\n";
        assert!(matches!(parse_str(text), Err(Error::InvalidShape(_))));
    }

    #[test]
    fn test_empty_data_block_rejected() {
        let text = S1.replace("A01 41.78148\n", "");
        assert!(matches!(parse_str(&text), Err(Error::InvalidShape(_))));
    }

    #[test]
    fn test_format_line_with_trailing_space() {
        let text = S1.replace("SAMPLE_ID XYZ_Y\n", "SAMPLE_ID XYZ_Y \n");
        let doc = parse_str(&text).unwrap();
        assert_eq!(doc.fields(), ["SAMPLE_ID", "XYZ_Y"]);
    }

    #[test]
    fn test_data_rows_split_on_space_runs() {
        let text = S1.replace("A01 41.78148", "  A01    41.78148  ");
        let doc = parse_str(&text).unwrap();
        assert_eq!(doc.get("A01", "XYZ_Y").unwrap(), "41.78148");
    }

    #[test]
    fn test_blank_data_lines() {
        let text = S1.replace("A01 41.78148\n", "A01 41.78148\n\n");
        assert!(parse_str(&text).is_ok());

        let strict = ParseOptions::default().with_skip_blank_data_lines(false);
        assert!(matches!(
            parse_with_options(text.as_bytes(), strict),
            Err(Error::ShapeMismatch { expected: 1, actual: 0 })
        ));
    }

    #[test]
    fn test_declared_counts() {
        let text = S1.replace("NUMBER_OF_SETS 1", "NUMBER_OF_SETS 5");
        // Carried as a property by default
        let doc = parse_str(&text).unwrap();
        assert_eq!(doc.property(Keyword::NumberOfSets), Some("5"));

        let strict = ParseOptions::default().with_check_declared_counts(true);
        assert!(matches!(
            parse_with_options(text.as_bytes(), strict),
            Err(Error::ShapeMismatch { expected: 5, actual: 1 })
        ));
        assert!(parse_with_options(S1.as_bytes(), strict).is_ok());

        let text = S1.replace("NUMBER_OF_FIELDS 2", "NUMBER_OF_FIELDS two");
        assert!(matches!(
            parse_with_options(text.as_bytes(), strict),
            Err(Error::InvalidShape(_))
        ));
    }

    #[test]
    fn test_crlf_line_endings() {
        let text = S1.replace('\n', "\r\n");
        let doc = parse_str(&text).unwrap();
        assert_eq!(doc, parse_str(S1).unwrap());
    }

    #[test]
    fn test_format_redeclared_after_data_is_rejected() {
        let text = format!("{}BEGIN_DATA_FORMAT\nSAMPLE_ID XYZ_X\nEND_DATA_FORMAT\n", S1);
        assert!(matches!(parse_str(&text), Err(Error::InvalidShape(_))));
    }

    #[test]
    fn test_later_data_block_replaces_earlier() {
        let text = format!("{}BEGIN_DATA\nB01 1.0\nB02 2.0\nEND_DATA\n", S1);
        let doc = parse_str(&text).unwrap();
        assert_eq!(doc.row_labels(), ["B01".to_string(), "B02".to_string()]);
    }
}
