//! # Call Storage Backends
//!
//! ## Role
//! Interchangeable storage for genotype and phase calls. Every array type is
//! generic over a [`Backend`], a zero-sized marker that names one genotype
//! store and one phase store:
//!
//! ```rust,ignore
//! let packed: Genotype<Packed> = Genotype::from_codes(&[0, 1, 2, 9]);
//! let bytes: Genotype<Bytes> = Genotype::from_codes(&[0, 1, 2, 9]);
//! ```
//!
//! ## Backends
//! - [`Packed`]: two parallel bit planes per array, bulk counts run over
//!   whole `u64` words.
//! - [`Bytes`]: one enum value per locus. Simpler, larger, and the
//!   reference the packed planes are tested against.
//!
//! The store traits carry per-locus default implementations for every bulk
//! operation; the packed stores override them with word-level versions.
//! Callers (`Genotype`, `Haplotype`) check bounds and lengths before
//! reaching a store, so stores may panic on bad indices.

pub mod bytes;
pub mod packed;

use std::fmt::Debug;

use crate::data::call::{GenotypeCall, PhaseCall};

pub use bytes::{ByteGenotypes, BytePhases};
pub use packed::{PackedGenotypes, PackedPhases};

/// Storage for a run of genotype calls.
pub trait GenotypeStore: Clone + Debug + Default + PartialEq + Send + Sync {
    /// A store of `len` copies of `call`
    fn filled(len: usize, call: GenotypeCall) -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call at `idx` (`idx < len`)
    fn get(&self, idx: usize) -> GenotypeCall;

    /// Overwrite the call at `idx` (`idx < len`)
    fn set(&mut self, idx: usize, call: GenotypeCall);

    fn push(&mut self, call: GenotypeCall);

    /// Copy of `[start, end)`, both within bounds
    fn slice(&self, start: usize, end: usize) -> Self {
        let mut out = Self::default();
        for i in start..end {
            out.push(self.get(i));
        }
        out
    }

    fn count_missing(&self) -> usize {
        (0..self.len()).filter(|&i| self.get(i).is_missing()).count()
    }

    fn count_het(&self) -> usize {
        (0..self.len())
            .filter(|&i| self.get(i).is_heterozygous())
            .count()
    }

    /// Positions whose calls differ, missing included (equal lengths)
    fn count_not_equal(&self, other: &Self) -> usize {
        (0..self.len())
            .filter(|&i| self.get(i) != other.get(i))
            .count()
    }

    /// Positions whose calls differ and are called in both (equal lengths)
    fn count_not_equal_exclude_missing(&self, other: &Self) -> usize {
        (0..self.len())
            .filter(|&i| {
                let (a, b) = (self.get(i), other.get(i));
                !a.is_missing() && !b.is_missing() && a != b
            })
            .count()
    }

    /// Positions homozygous in both for opposite alleles (equal lengths)
    fn count_opposing_homozygotes(&self, other: &Self) -> usize {
        (0..self.len())
            .filter(|&i| {
                matches!(
                    (self.get(i), other.get(i)),
                    (GenotypeCall::Zero, GenotypeCall::Two) | (GenotypeCall::Two, GenotypeCall::Zero)
                )
            })
            .count()
    }

    /// Replace every missing call with `other`'s call (equal lengths)
    fn fill_missing_from(&mut self, other: &Self) {
        for i in 0..self.len() {
            if self.get(i).is_missing() {
                self.set(i, other.get(i));
            }
        }
    }
}

/// Storage for a run of phase calls.
pub trait PhaseStore: Clone + Debug + Default + PartialEq + Send + Sync {
    /// A store of `len` copies of `call`
    fn filled(len: usize, call: PhaseCall) -> Self;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Call at `idx` (`idx < len`)
    fn get(&self, idx: usize) -> PhaseCall;

    /// Overwrite the call at `idx` (`idx < len`)
    fn set(&mut self, idx: usize, call: PhaseCall);

    fn push(&mut self, call: PhaseCall);

    /// Copy of `[start, end)`, both within bounds
    fn slice(&self, start: usize, end: usize) -> Self {
        let mut out = Self::default();
        for i in start..end {
            out.push(self.get(i));
        }
        out
    }

    /// Uncalled positions (missing or error)
    fn count_missing(&self) -> usize {
        (0..self.len()).filter(|&i| !self.get(i).is_called()).count()
    }

    /// Positions whose states differ (equal lengths)
    fn count_not_equal(&self, other: &Self) -> usize {
        (0..self.len())
            .filter(|&i| self.get(i) != other.get(i))
            .count()
    }

    /// Positions called in both with different alleles (equal lengths)
    fn count_not_equal_exclude_missing(&self, other: &Self) -> usize {
        self.compare_called(other).non_matching
    }

    /// Agreement over positions called in both (equal lengths)
    fn compare_called(&self, other: &Self) -> CalledComparison {
        let mut out = CalledComparison::default();
        for i in 0..self.len() {
            let (a, b) = (self.get(i), other.get(i));
            if a.is_called() && b.is_called() {
                out.both_called += 1;
                if a == b {
                    out.matching += 1;
                } else {
                    out.non_matching += 1;
                }
            }
        }
        out
    }

    /// Replace every uncalled position with `other`'s call where that one
    /// is called (equal lengths)
    fn fill_missing_from(&mut self, other: &Self) {
        for i in 0..self.len() {
            let merged = self.get(i).or_called(other.get(i));
            self.set(i, merged);
        }
    }
}

/// Counts over the positions called in both of two phase stores
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CalledComparison {
    pub matching: usize,
    pub non_matching: usize,
    pub both_called: usize,
}

/// Marker trait selecting a pair of stores.
///
/// This trait is sealed; only [`Packed`] and [`Bytes`] implement it.
pub trait Backend:
    Copy + Clone + Default + Debug + PartialEq + Eq + Send + Sync + 'static + private::Sealed
{
    type Genotypes: GenotypeStore;
    type Phases: PhaseStore;

    /// Name used in logs and on the command line
    const NAME: &'static str;
}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Packed {}
    impl Sealed for super::Bytes {}
}

/// Backend marker: two bit planes per array.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Packed;

impl Backend for Packed {
    type Genotypes = PackedGenotypes;
    type Phases = PackedPhases;
    const NAME: &'static str = "packed";
}

/// Backend marker: one byte per call.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
pub struct Bytes;

impl Backend for Bytes {
    type Genotypes = ByteGenotypes;
    type Phases = BytePhases;
    const NAME: &'static str = "bytes";
}
