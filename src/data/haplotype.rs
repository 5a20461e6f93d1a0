//! # Haplotype Arrays
//!
//! Phase calls along one chromosome copy. A haplotype may cover a window of
//! a larger chromosome: `start` is the absolute coordinate of its first
//! locus, and only `intersect_compare` reads it.

use std::fmt;
use std::marker::PhantomData;
use std::str::FromStr;

use crate::data::call::PhaseCall;
use crate::data::genotype::{clamp_range, parse_codes};
use crate::data::storage::{Backend, Packed, PhaseStore};
use crate::error::{GenopackError, Result};

/// Phase calls for one chromosome copy
#[derive(Clone, Debug, PartialEq)]
pub struct Haplotype<B: Backend = Packed> {
    calls: B::Phases,
    /// Absolute coordinate of locus 0
    start: usize,
    weight: f64,
    _backend: PhantomData<B>,
}

impl<B: Backend> Default for Haplotype<B> {
    fn default() -> Self {
        Self::from_store(B::Phases::default())
    }
}

impl<B: Backend> Haplotype<B> {
    /// Empty haplotype at offset 0 with weight 1
    pub fn new() -> Self {
        Self::default()
    }

    /// `len` missing calls
    pub fn with_len(len: usize) -> Self {
        Self::from_store(B::Phases::filled(len, PhaseCall::Missing))
    }

    pub fn from_store(calls: B::Phases) -> Self {
        Self {
            calls,
            start: 0,
            weight: 1.0,
            _backend: PhantomData,
        }
    }

    /// Encode raw integer codes: 0 and 1 are calls, 9 is missing, anything
    /// else is an error call.
    pub fn from_codes(codes: &[i32]) -> Self {
        codes.iter().map(|&c| PhaseCall::from_code(c)).collect()
    }

    /// Place the haplotype at an absolute offset
    pub fn with_start(mut self, start: usize) -> Self {
        self.start = start;
        self
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn store(&self) -> &B::Phases {
        &self.calls
    }

    pub(crate) fn store_mut(&mut self) -> &mut B::Phases {
        &mut self.calls
    }

    /// Absolute coordinate of the first locus
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// Absolute coordinate one past the last locus
    #[inline]
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.len())
    }

    #[inline]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn set_weight(&mut self, weight: f64) {
        self.weight = weight;
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

    /// Call at array index `idx` (not an absolute coordinate)
    pub fn get(&self, idx: usize) -> Result<PhaseCall> {
        self.check_index(idx)?;
        Ok(self.calls.get(idx))
    }

    pub fn set(&mut self, idx: usize, call: PhaseCall) -> Result<()> {
        self.check_index(idx)?;
        self.calls.set(idx, call);
        Ok(())
    }

    pub fn set_code(&mut self, idx: usize, code: i32) -> Result<()> {
        self.set(idx, PhaseCall::from_code(code))
    }

    pub fn push(&mut self, call: PhaseCall) {
        self.calls.push(call);
    }

    pub fn iter(&self) -> impl Iterator<Item = PhaseCall> + '_ {
        (0..self.len()).map(move |i| self.calls.get(i))
    }

    /// Decode to integer codes (missing as 9, error as -1)
    pub fn to_codes(&self) -> Vec<i32> {
        self.iter().map(PhaseCall::code).collect()
    }

    /// Uncalled positions; error calls count as missing
    pub fn count_missing(&self) -> usize {
        self.calls.count_missing()
    }

    pub fn count_not_missing(&self) -> usize {
        self.len() - self.count_missing()
    }

    /// Positions whose states differ, missing and error included
    pub fn count_not_equal(&self, other: &Self) -> Result<usize> {
        GenopackError::check_lengths(self.len(), other.len())?;
        Ok(self.calls.count_not_equal(&other.calls))
    }

    /// Positions called in both with different alleles
    pub fn count_not_equal_exclude_missing(&self, other: &Self) -> Result<usize> {
        GenopackError::check_lengths(self.len(), other.len())?;
        Ok(self.calls.count_not_equal_exclude_missing(&other.calls))
    }

    /// Fill uncalled positions from `other` where `other` is called.
    pub fn merge_missing_from(&mut self, other: &Self) -> Result<()> {
        GenopackError::check_lengths(self.len(), other.len())?;
        self.calls.fill_missing_from(&other.calls);
        Ok(())
    }

    /// Copy of array indices `[start, end)`, positioned at
    /// `self.start() + start`. An `end` past the array is clamped.
    pub fn subset(&self, start: usize, end: usize) -> Self {
        let (start, end) = clamp_range(start, end, self.len());
        Self {
            calls: self.calls.slice(start, end),
            start: self.start.saturating_add(start),
            weight: self.weight,
            _backend: PhantomData,
        }
    }

    pub fn to_backend<C: Backend>(&self) -> Haplotype<C> {
        self.iter()
            .collect::<Haplotype<C>>()
            .with_start(self.start)
            .with_weight(self.weight)
    }
}

impl<B: Backend> FromIterator<PhaseCall> for Haplotype<B> {
    fn from_iter<I: IntoIterator<Item = PhaseCall>>(iter: I) -> Self {
        let mut out = Self::new();
        for call in iter {
            out.push(call);
        }
        out
    }
}

impl<B: Backend> fmt::Display for Haplotype<B> {
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

impl<B: Backend> FromStr for Haplotype<B> {
    type Err = GenopackError;

    fn from_str(s: &str) -> Result<Self> {
        parse_codes(s, 1).map(|codes| Self::from_codes(&codes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::storage::Bytes;

    #[test]
    fn test_codes() {
        let h: Haplotype = Haplotype::from_codes(&[0, 1, 9, 2, -4]);
        assert_eq!(
            h.iter().collect::<Vec<_>>(),
            vec![
                PhaseCall::Zero,
                PhaseCall::One,
                PhaseCall::Missing,
                PhaseCall::Error,
                PhaseCall::Error
            ]
        );
        assert_eq!(h.to_codes(), vec![0, 1, 9, -1, -1]);
        assert_eq!(h.count_missing(), 3);
        assert_eq!(h.count_not_missing(), 2);
    }

    #[test]
    fn test_defaults() {
        let h: Haplotype<Bytes> = Haplotype::with_len(4);
        assert_eq!(h.start(), 0);
        assert_eq!(h.end(), 4);
        assert_eq!(h.weight(), 1.0);
        assert_eq!(h.count_missing(), 4);
    }

    #[test]
    fn test_index_errors() {
        let mut h: Haplotype = Haplotype::from_codes(&[0, 1]);
        assert!(h.get(1).is_ok());
        assert!(matches!(
            h.get(2),
            Err(GenopackError::IndexOutOfRange { index: 2, len: 2 })
        ));
        assert!(h.set_code(5, 1).is_err());
        h.set_code(0, 9).unwrap();
        assert_eq!(h.get(0).unwrap(), PhaseCall::Missing);
    }

    #[test]
    fn test_merge_missing_from() {
        let mut a: Haplotype = Haplotype::from_codes(&[9, 1, 9, 5]);
        let b: Haplotype = Haplotype::from_codes(&[0, 0, 9, 1]);
        a.merge_missing_from(&b).unwrap();
        assert_eq!(a.to_codes(), vec![0, 1, 9, 1]);

        let short: Haplotype = Haplotype::from_codes(&[0]);
        assert!(a.merge_missing_from(&short).is_err());
    }

    #[test]
    fn test_count_not_equal() {
        let a: Haplotype = Haplotype::from_codes(&[0, 1, 9, 1, 0]);
        let b: Haplotype = Haplotype::from_codes(&[1, 1, 0, 9, 0]);
        assert_eq!(a.count_not_equal(&b).unwrap(), 3);
        assert_eq!(a.count_not_equal_exclude_missing(&b).unwrap(), 1);
    }

    #[test]
    fn test_parse_overflowing_codes() {
        let h: Haplotype = "0 1 99999999999 9".parse().unwrap();
        assert_eq!(h.to_codes(), vec![0, 1, -1, 9]);
        assert_eq!(h.count_missing(), 2);
        assert!("0 one".parse::<Haplotype>().is_err());
    }

    #[test]
    fn test_end_saturates() {
        let h: Haplotype = Haplotype::from_codes(&[0, 1, 0]).with_start(usize::MAX - 1);
        assert_eq!(h.end(), usize::MAX);
        assert_eq!(h.subset(2, 3).start(), usize::MAX);
    }

    #[test]
    fn test_subset_keeps_coordinates() {
        let h: Haplotype = Haplotype::from_codes(&[0, 1, 1, 0, 9])
            .with_start(100)
            .with_weight(0.5);
        let sub = h.subset(2, 10);
        assert_eq!(sub.to_codes(), vec![1, 0, 9]);
        assert_eq!(sub.start(), 102);
        assert_eq!(sub.end(), 105);
        assert_eq!(sub.weight(), 0.5);
    }

    #[test]
    fn test_display_and_parse() {
        let h: Haplotype = "1 0 9 3".parse().unwrap();
        assert_eq!(h.to_string(), "1 0 9 -1");
    }
}
