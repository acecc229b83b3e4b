//! # cti3-tests
//!
//! Cross-checking test framework for cti3.
//!
//! This crate provides:
//! - A fixture corpus of real-world shaped `.ti3` files with expectations
//! - Seeded random document generation
//! - A round-trip harness (parse, write, re-parse, compare)
//! - Numeric comparison of measurement tables
//!
//! ## Test Categories
//!
//! 1. **Scenarios**: small hand-written inputs with exact expectations
//! 2. **Round Trip**: semantic equality after write and re-parse
//! 3. **Corpus**: every fixture parses and matches its manifest entry
//! 4. **Numeric**: mean-square difference between measurement sets

pub mod accuracy;
pub mod corpus;
pub mod patterns;
pub mod roundtrip;

pub use accuracy::{CompareError, DifferenceStats, compare_documents, mean_square_difference};
pub use corpus::{Fixture, TestCorpus};
pub use patterns::{DocumentPattern, generate_document};
pub use roundtrip::{RoundTripCheck, RoundTripResult};
