//! # Stats Pipeline
//!
//! Per-individual call counts for a genotype file:
//! 1. Load genotypes with the configured backend
//! 2. Count missing, heterozygous and homozygous calls (parallel over individuals)
//! 3. Write one report row per individual

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument};

use crate::config::{BackendKind, Command, Config};
use crate::data::{Backend, Bytes, Packed};
use crate::error::{GenopackError, Result};
use crate::io::report::ReportRow;
use crate::io::{CallFileReader, GenotypeRecord, ReportWriter};

/// Call counts for one individual
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct StatsRow {
    pub id: String,
    pub n_loci: usize,
    pub missing: usize,
    pub called: usize,
    pub het: usize,
    pub hom: usize,
}

impl ReportRow for StatsRow {
    fn header() -> &'static [&'static str] {
        &["id", "n_loci", "missing", "called", "het", "hom"]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.n_loci.to_string(),
            self.missing.to_string(),
            self.called.to_string(),
            self.het.to_string(),
            self.hom.to_string(),
        ]
    }
}

/// Count calls for every individual
pub fn summarize<B: Backend>(records: &[GenotypeRecord<B>]) -> Vec<StatsRow> {
    records
        .par_iter()
        .map(|record| {
            let g = &record.genotype;
            StatsRow {
                id: record.id.clone(),
                n_loci: g.len(),
                missing: g.count_missing(),
                called: g.count_not_missing(),
                het: g.num_het(),
                hom: g.num_hom(),
            }
        })
        .collect()
}

pub struct StatsPipeline {
    config: Config,
}

impl StatsPipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the stats pipeline
    pub fn run(&mut self) -> Result<()> {
        match self.config.backend {
            BackendKind::Packed => self.run_with::<Packed>(),
            BackendKind::Bytes => self.run_with::<Bytes>(),
        }
    }

    #[instrument(skip_all, fields(backend = B::NAME))]
    fn run_with<B: Backend>(&self) -> Result<()> {
        let Command::Stats { genotypes, .. } = &self.config.command else {
            return Err(GenopackError::config("stats pipeline run without the stats command"));
        };

        let records = CallFileReader::open(genotypes)?.read_genotypes::<B>()?;
        info!(n_individuals = records.len(), "loaded genotypes");

        let rows = summarize(&records);

        let mut writer = ReportWriter::create(self.config.out(), self.config.format)?;
        writer.write_rows(&rows)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Genotype;

    #[test]
    fn test_summarize() {
        let records: Vec<GenotypeRecord<Packed>> = vec![
            GenotypeRecord {
                id: "a".to_string(),
                genotype: Genotype::from_codes(&[0, 1, 2, 9]),
            },
            GenotypeRecord {
                id: "b".to_string(),
                genotype: Genotype::from_codes(&[1, 1, 9, 9]),
            },
        ];
        let rows = summarize(&records);
        assert_eq!(
            rows[0],
            StatsRow {
                id: "a".to_string(),
                n_loci: 4,
                missing: 1,
                called: 3,
                het: 1,
                hom: 2,
            }
        );
        assert_eq!(rows[1].het, 2);
        assert_eq!(rows[1].hom, 0);
        assert_eq!(rows[1].missing, 2);
    }
}
