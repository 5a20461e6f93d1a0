//! # Check Pipeline
//!
//! Validates phased haplotype pairs against observed genotypes:
//! 1. Load genotypes and phase pairs, matched by individual id
//! 2. Count homozygous loci each haplotype contradicts
//! 3. Derive a genotype from the pair and count discordant calls
//! 4. Count missing genotype calls the pair could fill

use rayon::prelude::*;
use serde::Serialize;
use tracing::{info, instrument, warn};

use crate::config::{BackendKind, Command, Config};
use crate::data::{Backend, Bytes, Genotype, Packed};
use crate::error::{GenopackError, Result};
use crate::io::report::ReportRow;
use crate::io::{CallFileReader, GenotypeRecord, PhaseRecord, ReportWriter};
use crate::pipelines::index_by_id;

/// Phase check results for one individual
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct CheckRow {
    pub id: String,
    pub n_loci: usize,
    /// Homozygous loci contradicted by the first haplotype
    pub conflicts_hap1: usize,
    /// Homozygous loci contradicted by the second haplotype
    pub conflicts_hap2: usize,
    /// Both haplotypes within the conflict threshold
    pub compatible: bool,
    /// Loci called in both where the pair implies a different genotype
    pub discordant: usize,
    /// Missing genotype calls the pair resolves
    pub fillable: usize,
}

impl ReportRow for CheckRow {
    fn header() -> &'static [&'static str] {
        &[
            "id",
            "n_loci",
            "conflicts_hap1",
            "conflicts_hap2",
            "compatible",
            "discordant",
            "fillable",
        ]
    }

    fn fields(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.n_loci.to_string(),
            self.conflicts_hap1.to_string(),
            self.conflicts_hap2.to_string(),
            self.compatible.to_string(),
            self.discordant.to_string(),
            self.fillable.to_string(),
        ]
    }
}

fn check_one<B: Backend>(
    genotype: &GenotypeRecord<B>,
    phase: &PhaseRecord<B>,
    threshold: usize,
) -> Result<CheckRow> {
    let g = &genotype.genotype;
    let [hap1, hap2] = &phase.haplotypes;

    let derived = Genotype::from_haplotypes(&phase.haplotypes)?;
    let discordant = g.count_not_equal_exclude_missing(&derived)?;

    let mut filled = g.clone();
    filled.merge_missing_from(&derived)?;

    Ok(CheckRow {
        id: genotype.id.clone(),
        n_loci: g.len(),
        conflicts_hap1: g.count_phase_conflicts(hap1),
        conflicts_hap2: g.count_phase_conflicts(hap2),
        compatible: g.is_compatible_with_phase(hap1, threshold)
            && g.is_compatible_with_phase(hap2, threshold),
        discordant,
        fillable: g.count_missing() - filled.count_missing(),
    })
}

/// Check every individual that has both a genotype and a phase pair.
///
/// Individuals missing from either file are skipped with a warning. Rows
/// follow the order of `genotypes`.
pub fn check_phases<B: Backend>(
    genotypes: &[GenotypeRecord<B>],
    phases: &[PhaseRecord<B>],
    threshold: usize,
) -> Result<Vec<CheckRow>> {
    let phase_index = index_by_id(phases)?;
    let genotype_index = index_by_id(genotypes)?;

    let unphased = genotypes
        .iter()
        .filter(|g| !phase_index.contains_key(g.id.as_str()))
        .count();
    if unphased > 0 {
        warn!(unphased, "individuals without phase rows skipped");
    }
    let orphaned = phases
        .iter()
        .filter(|p| !genotype_index.contains_key(p.id.as_str()))
        .count();
    if orphaned > 0 {
        warn!(orphaned, "phase rows without genotypes skipped");
    }

    let pairs: Vec<_> = genotypes
        .iter()
        .filter_map(|g| phase_index.get(g.id.as_str()).map(|&p| (g, p)))
        .collect();

    pairs
        .par_iter()
        .map(|&(g, p)| check_one(g, p, threshold))
        .collect()
}

pub struct CheckPipeline {
    config: Config,
}

impl CheckPipeline {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Run the check pipeline
    pub fn run(&mut self) -> Result<()> {
        match self.config.backend {
            BackendKind::Packed => self.run_with::<Packed>(),
            BackendKind::Bytes => self.run_with::<Bytes>(),
        }
    }

    #[instrument(skip_all, fields(backend = B::NAME))]
    fn run_with<B: Backend>(&self) -> Result<()> {
        let Command::Check {
            genotypes,
            phase,
            threshold,
            ..
        } = &self.config.command
        else {
            return Err(GenopackError::config("check pipeline run without the check command"));
        };

        let genotypes = CallFileReader::open(genotypes)?.read_genotypes::<B>()?;
        let phases = CallFileReader::open(phase)?.read_phases::<B>()?;
        info!(
            n_genotyped = genotypes.len(),
            n_phased = phases.len(),
            "loaded inputs"
        );

        let rows = check_phases(&genotypes, &phases, *threshold)?;
        let incompatible = rows.iter().filter(|r| !r.compatible).count();
        info!(n_checked = rows.len(), incompatible, "checked phase pairs");

        let mut writer = ReportWriter::create(self.config.out(), self.config.format)?;
        writer.write_rows(&rows)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Haplotype;

    fn genotype(id: &str, codes: &[i32]) -> GenotypeRecord<Packed> {
        GenotypeRecord {
            id: id.to_string(),
            genotype: Genotype::from_codes(codes),
        }
    }

    fn phase(id: &str, a: &[i32], b: &[i32]) -> PhaseRecord<Packed> {
        PhaseRecord {
            id: id.to_string(),
            haplotypes: [Haplotype::from_codes(a), Haplotype::from_codes(b)],
        }
    }

    #[test]
    fn test_check_phases() {
        let genotypes = vec![
            genotype("a", &[0, 2, 1, 9, 9, 0]),
            genotype("b", &[0, 0, 0, 0, 0, 0]),
            genotype("c", &[1, 1, 1, 1, 1, 1]),
        ];
        let phases = vec![
            phase("b", &[1, 0, 0, 0, 0, 0], &[0, 0, 0, 0, 0, 0]),
            phase("a", &[0, 1, 1, 1, 9, 1], &[0, 1, 0, 1, 0, 1]),
        ];

        let rows = check_phases(&genotypes, &phases, 0).unwrap();
        assert_eq!(rows.len(), 2);

        let a = &rows[0];
        assert_eq!(a.id, "a");
        assert_eq!(a.conflicts_hap1, 1);
        assert_eq!(a.conflicts_hap2, 1);
        assert!(!a.compatible);
        // derived: 0 2 1 2 9 2 -> discordant at locus 5 only
        assert_eq!(a.discordant, 1);
        assert_eq!(a.fillable, 1);

        let b = &rows[1];
        assert_eq!(b.id, "b");
        assert_eq!(b.conflicts_hap1, 1);
        assert_eq!(b.conflicts_hap2, 0);
        assert_eq!(b.discordant, 1);
        assert_eq!(b.fillable, 0);

        let rows = check_phases(&genotypes, &phases, 1).unwrap();
        assert!(rows.iter().all(|r| r.compatible));
    }

    #[test]
    fn test_length_mismatch() {
        let genotypes = vec![genotype("a", &[0, 1, 2])];
        let phases = vec![phase("a", &[0, 1], &[0, 0])];
        assert!(matches!(
            check_phases(&genotypes, &phases, 0),
            Err(GenopackError::LengthMismatch { .. })
        ));
    }
}
