//! # Genotype Arrays
//!
//! Diploid genotype calls along a run of loci, stored in a pluggable
//! [`Backend`]. Derivations that involve haplotypes live in
//! `model::reconcile`.

use std::fmt;
use std::marker::PhantomData;
use std::num::IntErrorKind;
use std::str::FromStr;

use tracing::warn;

use crate::data::call::GenotypeCall;
use crate::data::storage::{Backend, GenotypeStore, Packed};
use crate::error::{GenopackError, Result};

/// Genotype calls for one individual
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Genotype<B: Backend = Packed> {
    calls: B::Genotypes,
    _backend: PhantomData<B>,
}

impl<B: Backend> Genotype<B> {
    /// Empty array
    pub fn new() -> Self {
        Self::from_store(B::Genotypes::default())
    }

    /// `len` missing calls
    pub fn with_len(len: usize) -> Self {
        Self::from_store(B::Genotypes::filled(len, GenotypeCall::Missing))
    }

    pub fn from_store(calls: B::Genotypes) -> Self {
        Self {
            calls,
            _backend: PhantomData,
        }
    }

    /// Encode raw integer codes. Codes outside {0, 1, 2} become missing.
    pub fn from_codes(codes: &[i32]) -> Self {
        codes.iter().map(|&c| GenotypeCall::from_code(c)).collect()
    }

    pub fn store(&self) -> &B::Genotypes {
        &self.calls
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.calls.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.calls.is_empty()
    }

    #[inline]
    fn check_index(&self, idx: usize) -> Result<()> {
        if idx < self.len() {
            Ok(())
        } else {
            Err(GenopackError::index(idx, self.len()))
        }
    }

    /// Call at `idx`
    pub fn get(&self, idx: usize) -> Result<GenotypeCall> {
        self.check_index(idx)?;
        Ok(self.calls.get(idx))
    }

    /// Overwrite the call at `idx`
    pub fn set(&mut self, idx: usize, call: GenotypeCall) -> Result<()> {
        self.check_index(idx)?;
        self.calls.set(idx, call);
        Ok(())
    }

    /// Overwrite the call at `idx` from a raw code (coerced like
    /// [`Genotype::from_codes`])
    pub fn set_code(&mut self, idx: usize, code: i32) -> Result<()> {
        self.set(idx, GenotypeCall::from_code(code))
    }

    /// Append a call at the tail
    pub fn push(&mut self, call: GenotypeCall) {
        self.calls.push(call);
    }

    pub fn iter(&self) -> impl Iterator<Item = GenotypeCall> + '_ {
        (0..self.len()).map(move |i| self.calls.get(i))
    }

    /// Decode to integer codes (missing as 9)
    pub fn to_codes(&self) -> Vec<i32> {
        self.iter().map(GenotypeCall::code).collect()
    }

    pub fn count_missing(&self) -> usize {
        self.calls.count_missing()
    }

    pub fn count_not_missing(&self) -> usize {
        self.len() - self.count_missing()
    }

    /// Number of heterozygous calls
    pub fn num_het(&self) -> usize {
        self.calls.count_het()
    }

    /// Number of homozygous calls
    pub fn num_hom(&self) -> usize {
        self.count_not_missing() - self.num_het()
    }

    /// Positions whose calls differ, missing treated as a value
    pub fn count_not_equal(&self, other: &Self) -> Result<usize> {
        GenopackError::check_lengths(self.len(), other.len())?;
        Ok(self.calls.count_not_equal(&other.calls))
    }

    /// Positions whose calls differ, ignoring positions missing in either
    pub fn count_not_equal_exclude_missing(&self, other: &Self) -> Result<usize> {
        GenopackError::check_lengths(self.len(), other.len())?;
        Ok(self.calls.count_not_equal_exclude_missing(&other.calls))
    }

    /// Opposing homozygotes: 0 in one array and 2 in the other
    pub fn count_mismatches(&self, other: &Self) -> Result<usize> {
        GenopackError::check_lengths(self.len(), other.len())?;
        Ok(self.calls.count_opposing_homozygotes(&other.calls))
    }

    /// Fill every missing call from `other`; called positions are untouched.
    pub fn merge_missing_from(&mut self, other: &Self) -> Result<()> {
        GenopackError::check_lengths(self.len(), other.len())?;
        self.calls.fill_missing_from(&other.calls);
        Ok(())
    }

    /// Copy of loci `[start, end)`.
    ///
    /// An `end` past the array is clamped with a warning instead of failing.
    pub fn subset(&self, start: usize, end: usize) -> Self {
        let (start, end) = clamp_range(start, end, self.len());
        Self::from_store(self.calls.slice(start, end))
    }

    /// Copy the calls into another storage backend
    pub fn to_backend<C: Backend>(&self) -> Genotype<C> {
        self.iter().collect()
    }
}

/// Clamp `[start, end)` to `[0, len)`, warning when the caller overshoots.
pub(crate) fn clamp_range(start: usize, end: usize, len: usize) -> (usize, usize) {
    let mut end = end;
    if end > len {
        warn!(end, len, "subset end past array length, clamping");
        end = len;
    }
    if start > end {
        warn!(start, end, "subset start past end, returning empty range");
        return (end, end);
    }
    (start, end)
}

impl<B: Backend> FromIterator<GenotypeCall> for Genotype<B> {
    fn from_iter<I: IntoIterator<Item = GenotypeCall>>(iter: I) -> Self {
        let mut out = Self::new();
        for call in iter {
            out.push(call);
        }
        out
    }
}

impl<B: Backend> fmt::Display for Genotype<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, call) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}", call)?;
        }
        Ok(())
    }
}

impl<B: Backend> FromStr for Genotype<B> {
    type Err = GenopackError;

    /// Parse whitespace-separated integer codes
    fn from_str(s: &str) -> Result<Self> {
        parse_codes(s, 1).map(|codes| Self::from_codes(&codes))
    }
}

/// Stand-in for integer tokens that overflow `i32`; outside every call domain
const OVERFLOW_CODE: i32 = i32::MIN;

/// Parse whitespace-separated integers, reporting `line` on failure.
///
/// Integers too large for `i32` are kept as an out-of-domain code so the
/// array constructors coerce them like any other invalid code.
pub(crate) fn parse_codes(s: &str, line: usize) -> Result<Vec<i32>> {
    s.split_whitespace()
        .map(|tok| match tok.parse::<i32>() {
            Ok(code) => Ok(code),
            Err(e) if matches!(e.kind(), IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                Ok(OVERFLOW_CODE)
            }
            Err(e) => Err(GenopackError::parse(line, format!("'{}': {}", tok, e))),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::storage::Bytes;

    #[test]
    fn test_decode_scenario() {
        let g: Genotype = Genotype::from_codes(&[0, 1, 2, 9]);
        assert_eq!(g.to_codes(), vec![0, 1, 2, 9]);
        assert_eq!(g.count_missing(), 1);
        assert_eq!(g.count_not_missing(), 3);
        assert_eq!(g.num_het(), 1);
        assert_eq!(g.num_hom(), 2);
    }

    #[test]
    fn test_out_of_domain_codes() {
        let g: Genotype<Bytes> = Genotype::from_codes(&[3, -1, 42, 7]);
        assert_eq!(g.to_codes(), vec![9, 9, 9, 9]);
        assert_eq!(g.count_missing(), 4);
    }

    #[test]
    fn test_get_set() {
        let mut g: Genotype = Genotype::with_len(3);
        g.set(1, GenotypeCall::Two).unwrap();
        g.set_code(2, 0).unwrap();
        assert_eq!(g.get(0).unwrap(), GenotypeCall::Missing);
        assert_eq!(g.get(1).unwrap(), GenotypeCall::Two);
        assert_eq!(g.get(2).unwrap(), GenotypeCall::Zero);
        assert!(matches!(
            g.get(3),
            Err(GenopackError::IndexOutOfRange { index: 3, len: 3 })
        ));
        assert!(g.set(7, GenotypeCall::One).is_err());
    }

    #[test]
    fn test_push() {
        let mut g: Genotype = Genotype::new();
        assert!(g.is_empty());
        g.push(GenotypeCall::One);
        g.push(GenotypeCall::Missing);
        assert_eq!(g.len(), 2);
        assert_eq!(g.to_codes(), vec![1, 9]);
    }

    #[test]
    fn test_comparisons() {
        let a: Genotype = Genotype::from_codes(&[0, 1, 2, 9, 0, 2]);
        let b: Genotype = Genotype::from_codes(&[0, 2, 0, 1, 9, 2]);
        assert_eq!(a.count_not_equal(&b).unwrap(), 4);
        assert_eq!(a.count_not_equal_exclude_missing(&b).unwrap(), 2);
        assert_eq!(a.count_mismatches(&b).unwrap(), 1);
        assert_eq!(a.count_not_equal(&a).unwrap(), 0);
        assert_eq!(a.count_mismatches(&a).unwrap(), 0);
    }

    #[test]
    fn test_length_mismatch() {
        let a: Genotype = Genotype::from_codes(&[0, 1]);
        let b: Genotype = Genotype::from_codes(&[0, 1, 2]);
        assert!(matches!(
            a.count_not_equal(&b),
            Err(GenopackError::LengthMismatch { left: 2, right: 3 })
        ));
    }

    #[test]
    fn test_merge_missing_from() {
        let mut a: Genotype = Genotype::from_codes(&[9, 1, 9]);
        let b: Genotype = Genotype::from_codes(&[0, 1, 2]);
        a.merge_missing_from(&b).unwrap();
        assert_eq!(a.to_codes(), vec![0, 1, 2]);

        let mut c: Genotype = Genotype::from_codes(&[2, 9, 9]);
        c.merge_missing_from(&Genotype::from_codes(&[0, 9, 1])).unwrap();
        assert_eq!(c.to_codes(), vec![2, 9, 1]);
    }

    #[test]
    fn test_subset_clamps() {
        let g: Genotype = Genotype::from_codes(&[0, 1, 2, 9, 1]);
        assert_eq!(g.subset(1, 3).to_codes(), vec![1, 2]);
        assert_eq!(g.subset(3, 100).to_codes(), vec![9, 1]);
        assert!(g.subset(4, 2).is_empty());
        assert!(g.subset(9, 12).is_empty());
    }

    #[test]
    fn test_display_and_parse() {
        let g: Genotype = "0 1  2\t9 5".parse().unwrap();
        assert_eq!(g.to_string(), "0 1 2 9 9");
        assert!("0 x 2".parse::<Genotype>().is_err());
    }

    #[test]
    fn test_parse_overflowing_codes() {
        let g: Genotype = "0 1 99999999999 2 -99999999999".parse().unwrap();
        assert_eq!(g.to_codes(), vec![0, 1, 9, 2, 9]);
        assert_eq!(g.count_missing(), 2);
        assert!(matches!(
            "0 1.5".parse::<Genotype>(),
            Err(GenopackError::Parse { line: 1, .. })
        ));
    }

    #[test]
    fn test_to_backend() {
        let g: Genotype = Genotype::from_codes(&[2, 9, 1]);
        let bytes: Genotype<Bytes> = g.to_backend();
        assert_eq!(bytes.to_codes(), g.to_codes());
    }
}
