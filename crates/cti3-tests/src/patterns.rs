//! Test document generation
//!
//! Provides deterministic documents of various shapes for round-trip and
//! shape-invariant tests.

use cti3::{DataTable, Keyword, Property, Ti3Document};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

/// Document shapes
#[derive(Debug, Clone, Copy)]
pub enum DocumentPattern {
    /// One sample, one XYZ_Y field
    Minimal,
    /// XYZ, RGB and per-channel deviation for a chart of `rows` patches
    XyzRgb { rows: usize },
    /// CMYK device values plus `bands` spectral readings
    Spectral { rows: usize, bands: usize },
    /// Random shape, labels, properties and cells with seed
    Random(u64),
}

/// Non-structural keywords, the ones a generated document may carry
pub fn metadata_keywords() -> Vec<Keyword> {
    Keyword::ALL
        .into_iter()
        .filter(|k| !k.is_structural())
        .collect()
}

/// Generate a document of the given pattern
pub fn generate_document(pattern: DocumentPattern) -> Ti3Document {
    match pattern {
        DocumentPattern::Minimal => build(
            vec!["A01".to_string()],
            &["XYZ_Y"],
            vec![vec!["41.78148".to_string()]],
            vec![Property::new(Keyword::Originator, "Argyll target")],
        ),
        DocumentPattern::XyzRgb { rows } => {
            let fields = [
                "XYZ_X", "XYZ_Y", "XYZ_Z", "RGB_R", "RGB_G", "RGB_B", "STDEV_R", "STDEV_G",
                "STDEV_B",
            ];
            let cells = (0..rows)
                .map(|i| {
                    (0..fields.len())
                        .map(|j| format!("{:.6}", ((i * 131 + j * 17) % 10000) as f64 / 100.0))
                        .collect()
                })
                .collect();
            build(
                chart_labels(rows),
                &fields,
                cells,
                vec![
                    Property::new(
                        Keyword::Descriptor,
                        "Argyll Calibration Target chart information 3",
                    ),
                    Property::new(Keyword::Originator, "Argyll target"),
                    Property::new(Keyword::DeviceClass, "INPUT"),
                    Property::new(Keyword::ColorRep, "XYZ_RGB"),
                ],
            )
        }
        DocumentPattern::Spectral { rows, bands } => {
            let start = 380;
            let step = 10;
            let mut fields: Vec<String> = ["CMYK_C", "CMYK_M", "CMYK_Y", "CMYK_K"]
                .iter()
                .map(|f| f.to_string())
                .collect();
            fields.extend((0..bands).map(|b| format!("SPEC_{}", start + b * step)));
            let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();

            let cells = (0..rows)
                .map(|i| {
                    (0..fields.len())
                        .map(|j| format!("{:.2}", ((i * 7 + j * 3) % 101) as f64))
                        .collect()
                })
                .collect();
            build(
                (1..=rows).map(|i| i.to_string()).collect(),
                &field_refs,
                cells,
                vec![
                    Property::new(Keyword::ColorRep, "CMYK_XYZ"),
                    Property::new(Keyword::SpectralBands, bands.to_string()),
                    Property::new(Keyword::SpectralStartNm, format!("{}.000000", start)),
                    Property::new(
                        Keyword::SpectralEndNm,
                        format!("{}.000000", start + bands.saturating_sub(1) * step),
                    ),
                    Property::new(Keyword::InstrumentTypeSpectral, "YES"),
                ],
            )
        }
        DocumentPattern::Random(seed) => random_document(&mut ChaCha8Rng::seed_from_u64(seed)),
    }
}

fn build(
    rows: Vec<String>,
    fields: &[&str],
    cells: Vec<Vec<String>>,
    properties: Vec<Property>,
) -> Ti3Document {
    let columns = fields.iter().map(|f| f.to_string()).collect();
    let table = DataTable::new(rows, columns, cells).expect("generated table is rectangular");
    Ti3Document::new(cti3::CTI3_FILE_TYPE, table, properties)
}

/// Chart-style sample ids: A01..A12, B01.., ...
fn chart_labels(rows: usize) -> Vec<String> {
    (0..rows)
        .map(|i| {
            let letter = (b'A' + (i / 12 % 26) as u8) as char;
            let pass = i / (12 * 26);
            if pass == 0 {
                format!("{}{:02}", letter, i % 12 + 1)
            } else {
                format!("{}{}{:02}", letter, pass, i % 12 + 1)
            }
        })
        .collect()
}

fn random_document(rng: &mut ChaCha8Rng) -> Ti3Document {
    let rows = rng.gen_range(1..=40);
    let cols = rng.gen_range(1..=12);

    let row_labels: Vec<String> = (0..rows).map(|i| format!("S{}_{}", i, random_word(rng, 3))).collect();
    let fields: Vec<String> = (0..cols)
        .map(|j| format!("F{}_{}", j, random_word(rng, 4).to_uppercase()))
        .collect();
    let field_refs: Vec<&str> = fields.iter().map(String::as_str).collect();

    let cells = (0..rows)
        .map(|_| (0..cols).map(|_| random_cell(rng)).collect())
        .collect();

    let mut properties = Vec::new();
    for keyword in metadata_keywords() {
        if rng.gen_bool(0.4) {
            properties.push(Property::new(keyword, random_value(rng)));
        }
    }

    build(row_labels, &field_refs, cells, properties)
}

fn random_word(rng: &mut ChaCha8Rng, max_len: usize) -> String {
    const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
    let len = rng.gen_range(1..=max_len);
    (0..len)
        .map(|_| *ALPHABET.choose(rng).unwrap_or(&b'x') as char)
        .collect()
}

/// A whitespace-free cell token
fn random_cell(rng: &mut ChaCha8Rng) -> String {
    match rng.gen_range(0..4) {
        0 => format!("{:.6}", rng.gen_range(0.0..100.0)),
        1 => format!("{:.3}", rng.gen_range(-10.0..10.0)),
        2 => rng.gen_range(0..256).to_string(),
        _ => random_word(rng, 8),
    }
}

/// A property value: quote-free, may contain inner and outer spaces or be empty
fn random_value(rng: &mut ChaCha8Rng) -> String {
    let words = rng.gen_range(0..=4);
    let mut value = (0..words)
        .map(|_| random_word(rng, 6))
        .collect::<Vec<_>>()
        .join(if rng.gen_bool(0.5) { " " } else { "  " });
    if rng.gen_bool(0.1) {
        value.push(' ');
    }
    value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_random_is_deterministic() {
        let a = generate_document(DocumentPattern::Random(42));
        let b = generate_document(DocumentPattern::Random(42));
        assert_eq!(a, b);
    }

    #[test]
    fn test_chart_labels() {
        let labels = chart_labels(14);
        assert_eq!(labels[0], "A01");
        assert_eq!(labels[11], "A12");
        assert_eq!(labels[12], "B01");
    }

    #[test]
    fn test_spectral_shape() {
        let doc = generate_document(DocumentPattern::Spectral { rows: 5, bands: 3 });
        assert_eq!(doc.fields().len(), 1 + 4 + 3);
        assert_eq!(doc.property(Keyword::SpectralEndNm), Some("400.000000"));
    }

    #[test]
    fn test_metadata_keywords_exclude_structure() {
        let keywords = metadata_keywords();
        assert_eq!(keywords.len(), 16);
        assert!(!keywords.contains(&Keyword::BeginData));
    }
}
