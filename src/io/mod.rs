//! # I/O Module
//!
//! File reading boundaries. Converts text call files into in-memory
//! `Genotype` / `Haplotype` arrays, and writes pipeline reports.

pub mod call_file;
pub mod report;

pub use call_file::{CallFileReader, GenotypeRecord, PhaseRecord};
pub use report::{OutputFormat, ReportWriter};
