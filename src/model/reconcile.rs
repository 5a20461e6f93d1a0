//! # Genotype / Haplotype Reconciliation
//!
//! Operations that relate a genotype to the two haplotypes that make it up.
//! All of them walk the per-locus truth tables in `data::call`; the loci of
//! a genotype and a haplotype are matched by array index, not by the
//! haplotype's `start` offset. Only [`intersect_compare`] works in absolute
//! coordinates.

use serde::Serialize;
use tracing::trace;

use crate::data::call::GenotypeCall;
use crate::data::storage::{Backend, PhaseStore};
use crate::data::{Genotype, Haplotype};
use crate::error::{GenopackError, Result};

impl<B: Backend> Genotype<B> {
    /// Genotype implied by a haplotype pair.
    ///
    /// Fails unless exactly two haplotypes are given. The result covers the
    /// shorter of the two; a locus uncalled on either haplotype is missing.
    pub fn from_haplotypes(haplotypes: &[Haplotype<B>]) -> Result<Self> {
        let [a, b] = haplotypes else {
            return Err(GenopackError::IncorrectHaplotypeNumber {
                expected: 2,
                found: haplotypes.len(),
            });
        };
        Ok(a.iter()
            .zip(b.iter())
            .map(|(pa, pb)| GenotypeCall::from_phase_pair(pa, pb))
            .collect())
    }

    /// Homozygous loci where `haplotype` carries the opposite allele, over
    /// the shorter of the two arrays. Uncalled phases never conflict.
    pub fn count_phase_conflicts(&self, haplotype: &Haplotype<B>) -> usize {
        self.iter()
            .zip(haplotype.iter())
            .filter(|&(g, p)| g.conflicts_with(p))
            .count()
    }

    /// True if `haplotype` conflicts with this genotype at no more than
    /// `threshold` homozygous loci.
    pub fn is_compatible_with_phase(&self, haplotype: &Haplotype<B>, threshold: usize) -> bool {
        let conflicts = self.count_phase_conflicts(haplotype);
        trace!(conflicts, threshold, "phase compatibility");
        conflicts <= threshold
    }

    /// The haplotype that pairs with `partner` to make this genotype.
    ///
    /// Homozygous loci resolve on their own, heterozygous loci take the
    /// opposite of the partner's allele and are missing where the partner is
    /// uncalled. Covers the shorter of the two arrays and inherits the
    /// partner's `start`.
    pub fn complement_to_phase(&self, partner: &Haplotype<B>) -> Haplotype<B> {
        self.iter()
            .zip(partner.iter())
            .map(|(g, p)| g.complement(p))
            .collect::<Haplotype<B>>()
            .with_start(partner.start())
    }
}

impl<B: Backend> Haplotype<B> {
    /// Fill uncalled loci from the homozygous calls of `genotype`:
    /// 2 gives a 1, 0 gives a 0, anything else leaves the locus alone.
    pub fn merge_missing_from_genotype(&mut self, genotype: &Genotype<B>) -> Result<()> {
        GenopackError::check_lengths(self.len(), genotype.len())?;
        let store = self.store_mut();
        for (i, g) in genotype.iter().enumerate() {
            if store.get(i).is_called() {
                continue;
            }
            if let Some(phase) = g.implied_phase() {
                store.set(i, phase);
            }
        }
        Ok(())
    }
}

/// Agreement between two haplotypes over their shared absolute window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct WindowComparison {
    /// Loci called in both with the same allele
    pub matching: usize,
    /// Loci called in both with different alleles
    pub non_matching: usize,
    /// Loci called in both
    pub non_missing: usize,
    /// Length of the shared window
    pub window_len: usize,
}

/// Compare two haplotypes over `[max(starts), min(ends))` in absolute
/// coordinates. Disjoint haplotypes give an all-zero result.
pub fn intersect_compare<B: Backend>(a: &Haplotype<B>, b: &Haplotype<B>) -> WindowComparison {
    let lo = a.start().max(b.start());
    let hi = a.end().min(b.end());
    if lo >= hi {
        return WindowComparison::default();
    }

    let wa = a.store().slice(lo - a.start(), hi - a.start());
    let wb = b.store().slice(lo - b.start(), hi - b.start());
    let cmp = wa.compare_called(&wb);

    WindowComparison {
        matching: cmp.matching,
        non_matching: cmp.non_matching,
        non_missing: cmp.both_called,
        window_len: hi - lo,
    }
}
