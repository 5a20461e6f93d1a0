//! # Call File Reading
//!
//! Whitespace-separated text files with one row per genotype or haplotype:
//!
//! ```text
//! # id   calls...
//! ind1   0 1 2 9 1
//! ind2   2 2 1 0 9
//! ```
//!
//! Genotype files hold one row per individual. Phase files hold two
//! consecutive rows per individual, both starting with the same id. Blank
//! lines and lines starting with `#` are ignored. Every row in a file must
//! have the same number of loci. Out-of-domain codes are kept and coerced by
//! the array constructors; only non-integer tokens are parse errors.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, info_span};

use crate::data::genotype::parse_codes;
use crate::data::{Backend, Genotype, Haplotype};
use crate::error::{GenopackError, Result};

/// One individual's genotype row
#[derive(Clone, Debug, PartialEq)]
pub struct GenotypeRecord<B: Backend> {
    pub id: String,
    pub genotype: Genotype<B>,
}

/// One individual's pair of haplotype rows
#[derive(Clone, Debug, PartialEq)]
pub struct PhaseRecord<B: Backend> {
    pub id: String,
    pub haplotypes: [Haplotype<B>; 2],
}

/// A parsed data row: id, codes and the 1-based line it came from
struct Row {
    line: usize,
    id: String,
    codes: Vec<i32>,
}

/// Reader for genotype and phase call files
pub struct CallFileReader {
    reader: Box<dyn BufRead + Send>,
}

impl CallFileReader {
    /// Open a call file
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GenopackError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let file = File::open(path)?;
        Ok(Self::from_reader(Box::new(BufReader::new(file))))
    }

    /// Create from a reader
    pub fn from_reader(reader: Box<dyn BufRead + Send>) -> Self {
        Self { reader }
    }

    /// Read every row as one individual's genotype
    pub fn read_genotypes<B: Backend>(self) -> Result<Vec<GenotypeRecord<B>>> {
        info_span!("read_genotypes", backend = B::NAME).in_scope(|| {
            let rows = self.read_rows()?;
            debug!(n_rows = rows.len(), "parsed genotype rows");
            Ok(rows
                .into_iter()
                .map(|row| GenotypeRecord {
                    genotype: Genotype::from_codes(&row.codes),
                    id: row.id,
                })
                .collect())
        })
    }

    /// Read consecutive row pairs as one individual's haplotypes
    pub fn read_phases<B: Backend>(self) -> Result<Vec<PhaseRecord<B>>> {
        info_span!("read_phases", backend = B::NAME).in_scope(|| {
            let rows = self.read_rows()?;
            if rows.len() % 2 != 0 {
                return Err(GenopackError::invalid_data(format!(
                    "phase file has {} rows, expected two per individual",
                    rows.len()
                )));
            }
            debug!(n_individuals = rows.len() / 2, "parsed phase rows");

            let mut records = Vec::with_capacity(rows.len() / 2);
            let mut rows = rows.into_iter();
            while let (Some(first), Some(second)) = (rows.next(), rows.next()) {
                if first.id != second.id {
                    return Err(GenopackError::parse(
                        second.line,
                        format!(
                            "haplotype rows for '{}' and '{}' are paired; ids must match",
                            first.id, second.id
                        ),
                    ));
                }
                records.push(PhaseRecord {
                    haplotypes: [
                        Haplotype::from_codes(&first.codes),
                        Haplotype::from_codes(&second.codes),
                    ],
                    id: first.id,
                });
            }
            Ok(records)
        })
    }

    fn read_rows(mut self) -> Result<Vec<Row>> {
        let mut rows: Vec<Row> = Vec::new();
        let mut line = String::new();
        let mut line_no = 0;

        loop {
            line.clear();
            if self.reader.read_line(&mut line)? == 0 {
                break;
            }
            line_no += 1;

            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (id, rest) = match trimmed.split_once(char::is_whitespace) {
                Some((id, rest)) => (id, rest),
                None => (trimmed, ""),
            };
            let codes = parse_codes(rest, line_no)?;

            if let Some(first) = rows.first() {
                if first.codes.len() != codes.len() {
                    return Err(GenopackError::invalid_data(format!(
                        "line {} has {} loci, line {} has {}",
                        line_no,
                        codes.len(),
                        first.line,
                        first.codes.len()
                    )));
                }
            }

            rows.push(Row {
                line: line_no,
                id: id.to_string(),
                codes,
            });
        }

        Ok(rows)
    }
}
