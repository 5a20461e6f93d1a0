//! # Compare Pipeline
//!
//! Concordance between two genotype files (e.g. two genotyping runs of the
//! same individuals), matched by individual id.

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::{BackendKind, Command, Config};
use crate::data::{Backend, Bytes, Packed};
use crate::error::{GenopackError, Result};
use crate::io::report::ReportRow;
use crate::io::{CallFileReader, GenotypeRecord, ReportWriter};
use crate::pipelines::index_by_id;

/// Concordance counts for one individual
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CompareRow {
    pub id: String,
    pub n_loci: usize,
    /// Loci whose calls differ, missing included
    pub not_equal: usize,
    /// Loci called in both whose calls differ
    pub not_equal_called: usize,
    /// Loci homozygous for opposite alleles
    pub opposing_homozygotes: usize,
}

impl ReportRow for CompareRow {
    fn header() -> &'static [&'static str] {
        &[
            "id",
            "n_loci",
            "not_equal",
            "not_equal_called",
            "opposing_homozygotes",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.n_loci.to_string(),
            self.not_equal.to_string(),
            self.not_equal_called.to_string(),
            self.opposing_homozygotes.to_string(),
        ]
    }
}

/// Compare individuals present in both files, in the order of `left`
pub fn compare_genotypes<B: Backend>(
    left: &[GenotypeRecord<B>],
    right: &[GenotypeRecord<B>],
) -> Result<Vec<CompareRow>> {
    let left_index = index_by_id(left)?;
    let right_index = index_by_id(right)?;

    let pairs: Vec<_> = left
        .iter()
        .filter_map(|l| right_index.get(l.id.as_str()).map(|&r| (l, r)))
        .collect();
    let unmatched = (left.len() - pairs.len())
        + right
            .iter()
            .filter(|r| !left_index.contains_key(r.id.as_str()))
            .count();
    if unmatched > 0 {
        warn!(unmatched, "individuals present in only one file skipped");
    }

    pairs
        .par_iter()
        .map(|&(l, r)| -> Result<CompareRow> {
            let (a, b) = (&l.genotype, &r.genotype);
            Ok(CompareRow {
                id: l.id.clone(),
                n_loci: a.len(),
                not_equal: a.count_not_equal(b)?,
                not_equal_called: a.count_not_equal_exclude_missing(b)?,
                opposing_homozygotes: a.count_mismatches(b)?,
            })
        })
        .collect()
}

pub struct ComparePipeline {
    config: Config,
}

impl ComparePipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the compare pipeline
    pub fn run(&mut self) -> Result<()> {
        match self.config.backend {
            BackendKind::Packed => self.run_with::<Packed>(),
            BackendKind::Bytes => self.run_with::<Bytes>(),
        }
    }

    #[instrument(skip_all, fields(backend = B::NAME))]
    fn run_with<B: Backend>(&self) -> Result<()> {
        let Command::Compare { left, right, .. } = &self.config.command else {
            return Err(GenopackError::config("compare pipeline run without the compare command"));
        };

        let left = CallFileReader::open(left)?.read_genotypes::<B>()?;
        let right = CallFileReader::open(right)?.read_genotypes::<B>()?;
        info!(n_left = left.len(), n_right = right.len(), "loaded inputs");

        let rows = compare_genotypes(&left, &right)?;

        let mut writer = ReportWriter::create(self.config.out(), self.config.format)?;
        writer.write_rows(&rows)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Genotype;

    fn record(id: &str, codes: &[i32]) -> GenotypeRecord<Bytes> {
        GenotypeRecord {
            id: id.to_string(),
            genotype: Genotype::from_codes(codes),
        }
    }

    #[test]
    fn test_compare_genotypes() {
        let left = vec![record("x", &[0, 1, 2, 9, 0]), record("only_left", &[0; 5])];
        let right = vec![record("y", &[1; 5]), record("x", &[2, 1, 0, 1, 9])];

        let rows = compare_genotypes(&left, &right).unwrap();
        assert_eq!(
            rows,
            vec![CompareRow {
                id: "x".to_string(),
                n_loci: 5,
                not_equal: 4,
                not_equal_called: 2,
                opposing_homozygotes: 2,
            }]
        );
    }

    #[test]
    fn test_compare_length_mismatch() {
        let left = vec![record("x", &[0, 1])];
        let right = vec![record("x", &[0, 1, 2])];
        assert!(compare_genotypes(&left, &right).is_err());
    }
}
