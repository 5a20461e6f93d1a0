//! # Bit-Plane Storage
//!
//! Two parallel bit vectors per array. Each locus is the pair of bits at the
//! same index in both planes:
//!
//! ```text
//! genotype   homo additional      phase   phase missing
//! 0            1      0           0         0     0
//! 1            0      0           1         1     0
//! 2            1      1           missing   0     1
//! missing      0      1           error     1     1
//! ```
//!
//! Bulk operations combine the raw `u64` words of both planes and popcount
//! the result, 64 loci per step. Planes are always head-aligned (bit 0 of
//! word 0 is locus 0) so word `w` of every plane covers the same loci; the
//! dead bits past `len` in the last word are masked off before counting.

use bitvec::prelude::*;

use crate::data::call::{GenotypeCall, PhaseCall};
use crate::data::storage::{CalledComparison, GenotypeStore, PhaseStore};
use crate::error::{GenopackError, Result};

/// One bit plane
pub type Plane = BitVec<u64, Lsb0>;

const WORD_BITS: usize = u64::BITS as usize;

/// Mask selecting the live bits of word `word` in a plane of `len` bits
#[inline(always)]
fn live_mask(word: usize, len: usize) -> u64 {
    let remaining = len - word * WORD_BITS;
    if remaining >= WORD_BITS {
        u64::MAX
    } else {
        (1u64 << remaining) - 1
    }
}

/// Popcount of `word(w)` over all words of a `len`-bit plane
#[inline]
fn count_words(len: usize, mut word: impl FnMut(usize) -> u64) -> usize {
    (0..len.div_ceil(WORD_BITS))
        .map(|w| (word(w) & live_mask(w, len)).count_ones() as usize)
        .sum()
}

fn copy_range(plane: &Plane, start: usize, end: usize) -> Plane {
    plane[start..end].iter().by_vals().collect()
}

/// Genotype calls as `homo` / `additional` bit planes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackedGenotypes {
    homo: Plane,
    additional: Plane,
}

impl PackedGenotypes {
    #[inline(always)]
    fn encode(call: GenotypeCall) -> (bool, bool) {
        match call {
            GenotypeCall::Zero => (true, false),
            GenotypeCall::One => (false, false),
            GenotypeCall::Two => (true, true),
            GenotypeCall::Missing => (false, true),
        }
    }

    /// Build directly from the two planes
    pub fn from_planes(mut homo: Plane, mut additional: Plane) -> Result<Self> {
        GenopackError::check_lengths(homo.len(), additional.len())?;
        homo.force_align();
        additional.force_align();
        Ok(Self { homo, additional })
    }

    pub fn homo(&self) -> &BitSlice<u64, Lsb0> {
        &self.homo
    }

    pub fn additional(&self) -> &BitSlice<u64, Lsb0> {
        &self.additional
    }

    /// Memory usage in bytes
    pub fn size_bytes(&self) -> usize {
        (self.homo.as_raw_slice().len() + self.additional.as_raw_slice().len())
            * std::mem::size_of::<u64>()
            + std::mem::size_of::<Self>()
    }
}

impl GenotypeStore for PackedGenotypes {
    fn filled(len: usize, call: GenotypeCall) -> Self {
        let (h, a) = Self::encode(call);
        Self {
            homo: BitVec::repeat(h, len),
            additional: BitVec::repeat(a, len),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.homo.len()
    }

    #[inline]
    fn get(&self, idx: usize) -> GenotypeCall {
        match (self.homo[idx], self.additional[idx]) {
            (true, false) => GenotypeCall::Zero,
            (false, false) => GenotypeCall::One,
            (true, true) => GenotypeCall::Two,
            (false, true) => GenotypeCall::Missing,
        }
    }

    #[inline]
    fn set(&mut self, idx: usize, call: GenotypeCall) {
        let (h, a) = Self::encode(call);
        self.homo.set(idx, h);
        self.additional.set(idx, a);
    }

    fn push(&mut self, call: GenotypeCall) {
        let (h, a) = Self::encode(call);
        self.homo.push(h);
        self.additional.push(a);
    }

    fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            homo: copy_range(&self.homo, start, end),
            additional: copy_range(&self.additional, start, end),
        }
    }

    fn count_missing(&self) -> usize {
        let (h, a) = (self.homo.as_raw_slice(), self.additional.as_raw_slice());
        count_words(self.len(), |w| !h[w] & a[w])
    }

    fn count_het(&self) -> usize {
        let (h, a) = (self.homo.as_raw_slice(), self.additional.as_raw_slice());
        count_words(self.len(), |w| !h[w] & !a[w])
    }

    fn count_not_equal(&self, other: &Self) -> usize {
        let (h1, a1) = (self.homo.as_raw_slice(), self.additional.as_raw_slice());
        let (h2, a2) = (other.homo.as_raw_slice(), other.additional.as_raw_slice());
        count_words(self.len(), |w| (h1[w] ^ h2[w]) | (a1[w] ^ a2[w]))
    }

    fn count_not_equal_exclude_missing(&self, other: &Self) -> usize {
        let (h1, a1) = (self.homo.as_raw_slice(), self.additional.as_raw_slice());
        let (h2, a2) = (other.homo.as_raw_slice(), other.additional.as_raw_slice());
        count_words(self.len(), |w| {
            let missing = (!h1[w] & a1[w]) | (!h2[w] & a2[w]);
            ((h1[w] ^ h2[w]) | (a1[w] ^ a2[w])) & !missing
        })
    }

    fn count_opposing_homozygotes(&self, other: &Self) -> usize {
        let (h1, a1) = (self.homo.as_raw_slice(), self.additional.as_raw_slice());
        let (h2, a2) = (other.homo.as_raw_slice(), other.additional.as_raw_slice());
        count_words(self.len(), |w| (h1[w] & h2[w]) & (a1[w] ^ a2[w]))
    }

    fn fill_missing_from(&mut self, other: &Self) {
        let (oh, oa) = (other.homo.as_raw_slice(), other.additional.as_raw_slice());
        let h = self.homo.as_raw_mut_slice();
        let a = self.additional.as_raw_mut_slice();
        for w in 0..h.len() {
            let missing = !h[w] & a[w];
            h[w] = (h[w] & !missing) | (oh[w] & missing);
            a[w] = (a[w] & !missing) | (oa[w] & missing);
        }
    }
}

/// Phase calls as `phase` / `missing` bit planes
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PackedPhases {
    phase: Plane,
    missing: Plane,
}

impl PackedPhases {
    #[inline(always)]
    fn encode(call: PhaseCall) -> (bool, bool) {
        match call {
            PhaseCall::Zero => (false, false),
            PhaseCall::One => (true, false),
            PhaseCall::Missing => (false, true),
            PhaseCall::Error => (true, true),
        }
    }

    /// Build directly from the two planes
    pub fn from_planes(mut phase: Plane, mut missing: Plane) -> Result<Self> {
        GenopackError::check_lengths(phase.len(), missing.len())?;
        phase.force_align();
        missing.force_align();
        Ok(Self { phase, missing })
    }

    pub fn phase(&self) -> &BitSlice<u64, Lsb0> {
        &self.phase
    }

    pub fn missing(&self) -> &BitSlice<u64, Lsb0> {
        &self.missing
    }

    /// Memory usage in bytes
    pub fn size_bytes(&self) -> usize {
        (self.phase.as_raw_slice().len() + self.missing.as_raw_slice().len())
            * std::mem::size_of::<u64>()
            + std::mem::size_of::<Self>()
    }
}

impl PhaseStore for PackedPhases {
    fn filled(len: usize, call: PhaseCall) -> Self {
        let (p, m) = Self::encode(call);
        Self {
            phase: BitVec::repeat(p, len),
            missing: BitVec::repeat(m, len),
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.phase.len()
    }

    #[inline]
    fn get(&self, idx: usize) -> PhaseCall {
        match (self.phase[idx], self.missing[idx]) {
            (false, false) => PhaseCall::Zero,
            (true, false) => PhaseCall::One,
            (false, true) => PhaseCall::Missing,
            (true, true) => PhaseCall::Error,
        }
    }

    #[inline]
    fn set(&mut self, idx: usize, call: PhaseCall) {
        let (p, m) = Self::encode(call);
        self.phase.set(idx, p);
        self.missing.set(idx, m);
    }

    fn push(&mut self, call: PhaseCall) {
        let (p, m) = Self::encode(call);
        self.phase.push(p);
        self.missing.push(m);
    }

    fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            phase: copy_range(&self.phase, start, end),
            missing: copy_range(&self.missing, start, end),
        }
    }

    fn count_missing(&self) -> usize {
        self.missing.count_ones()
    }

    fn count_not_equal(&self, other: &Self) -> usize {
        let (p1, m1) = (self.phase.as_raw_slice(), self.missing.as_raw_slice());
        let (p2, m2) = (other.phase.as_raw_slice(), other.missing.as_raw_slice());
        count_words(self.len(), |w| (p1[w] ^ p2[w]) | (m1[w] ^ m2[w]))
    }

    fn count_not_equal_exclude_missing(&self, other: &Self) -> usize {
        let (p1, m1) = (self.phase.as_raw_slice(), self.missing.as_raw_slice());
        let (p2, m2) = (other.phase.as_raw_slice(), other.missing.as_raw_slice());
        count_words(self.len(), |w| (p1[w] ^ p2[w]) & !(m1[w] | m2[w]))
    }

    fn compare_called(&self, other: &Self) -> CalledComparison {
        let (p1, m1) = (self.phase.as_raw_slice(), self.missing.as_raw_slice());
        let (p2, m2) = (other.phase.as_raw_slice(), other.missing.as_raw_slice());
        let len = self.len();
        let both_called = count_words(len, |w| !(m1[w] | m2[w]));
        let non_matching = count_words(len, |w| (p1[w] ^ p2[w]) & !(m1[w] | m2[w]));
        CalledComparison {
            matching: both_called - non_matching,
            non_matching,
            both_called,
        }
    }

    fn fill_missing_from(&mut self, other: &Self) {
        let (op, om) = (other.phase.as_raw_slice(), other.missing.as_raw_slice());
        let p = self.phase.as_raw_mut_slice();
        let m = self.missing.as_raw_mut_slice();
        for w in 0..p.len() {
            let take = m[w] & !om[w];
            p[w] = (p[w] & !take) | (op[w] & take);
            m[w] &= !take;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn genotypes(calls: &[GenotypeCall]) -> PackedGenotypes {
        let mut store = PackedGenotypes::default();
        for &c in calls {
            store.push(c);
        }
        store
    }

    #[test]
    fn test_live_mask() {
        assert_eq!(live_mask(0, 64), u64::MAX);
        assert_eq!(live_mask(0, 3), 0b111);
        assert_eq!(live_mask(1, 65), 0b1);
        assert_eq!(live_mask(1, 200), u64::MAX);
    }

    #[test]
    fn test_plane_layout() {
        use GenotypeCall::*;
        let store = genotypes(&[Zero, One, Two, Missing]);
        assert_eq!(store.homo().iter().by_vals().collect::<Vec<_>>(), [true, false, true, false]);
        assert_eq!(
            store.additional().iter().by_vals().collect::<Vec<_>>(),
            [false, false, true, true]
        );
    }

    #[test]
    fn test_dead_bits_ignored() {
        // 70 missing loci then truncate to 65 via slice: dead bits of the
        // second word must never be counted.
        let store = PackedGenotypes::filled(70, GenotypeCall::Missing);
        let sliced = store.slice(0, 65);
        assert_eq!(sliced.count_missing(), 65);
        assert_eq!(sliced.count_het(), 0);

        let mut merged = PackedGenotypes::filled(65, GenotypeCall::Missing);
        merged.fill_missing_from(&PackedGenotypes::filled(65, GenotypeCall::Two));
        assert_eq!(merged.count_missing(), 0);
        merged.push(GenotypeCall::One);
        assert_eq!(merged.get(65), GenotypeCall::One);
        assert_eq!(merged.count_het(), 1);
    }

    #[test]
    fn test_from_planes_length_check() {
        let homo = bitvec![u64, Lsb0; 1, 0, 1];
        let additional = bitvec![u64, Lsb0; 0, 0];
        assert!(matches!(
            PackedGenotypes::from_planes(homo, additional),
            Err(GenopackError::LengthMismatch { left: 3, right: 2 })
        ));
    }

    #[test]
    fn test_from_unaligned_planes() {
        let source = bitvec![u64, Lsb0; 0, 0, 0, 1, 0, 1];
        let homo = source[3..].to_bitvec();
        let additional = bitvec![u64, Lsb0; 0, 1, 1];
        let store = PackedGenotypes::from_planes(homo, additional).unwrap();
        assert_eq!(store.get(0), GenotypeCall::Zero);
        assert_eq!(store.get(1), GenotypeCall::Missing);
        assert_eq!(store.get(2), GenotypeCall::Two);
        assert_eq!(store.count_missing(), 1);
    }

    #[test]
    fn test_phase_from_planes_length_check() {
        let phase = bitvec![u64, Lsb0; 1, 0];
        let missing = bitvec![u64, Lsb0; 0, 0, 1, 1];
        assert!(matches!(
            PackedPhases::from_planes(phase, missing),
            Err(GenopackError::LengthMismatch { left: 2, right: 4 })
        ));
    }

    #[test]
    fn test_phase_from_unaligned_planes() {
        let source = bitvec![u64, Lsb0; 0, 0, 0, 1, 0, 1, 1];
        let phase = source[3..].to_bitvec();
        let missing = bitvec![u64, Lsb0; 0, 1, 1, 0];
        let store = PackedPhases::from_planes(phase, missing).unwrap();
        assert_eq!(store.len(), 4);
        assert_eq!(store.get(0), PhaseCall::One);
        assert_eq!(store.get(1), PhaseCall::Missing);
        assert_eq!(store.get(2), PhaseCall::Error);
        assert_eq!(store.get(3), PhaseCall::One);
        assert_eq!(store.count_missing(), 2);

        let mut pushed = PackedPhases::default();
        for c in [PhaseCall::One, PhaseCall::Missing, PhaseCall::Error, PhaseCall::Zero] {
            pushed.push(c);
        }
        assert_eq!(store.count_not_equal(&pushed), 1);
        assert_eq!(store.compare_called(&pushed).both_called, 2);
    }

    #[test]
    fn test_phase_fill_keeps_error_partner() {
        let mut a = PackedPhases::filled(3, PhaseCall::Missing);
        let mut b = PackedPhases::default();
        for c in [PhaseCall::One, PhaseCall::Error, PhaseCall::Zero] {
            b.push(c);
        }
        a.fill_missing_from(&b);
        assert_eq!(a.get(0), PhaseCall::One);
        assert_eq!(a.get(1), PhaseCall::Missing);
        assert_eq!(a.get(2), PhaseCall::Zero);
    }
}
