//! # Byte-Per-Call Storage
//!
//! One enum value per locus. All bulk operations use the per-locus defaults
//! from the store traits.

use crate::data::call::{GenotypeCall, PhaseCall};
use crate::data::storage::{GenotypeStore, PhaseStore};

/// Genotype calls stored one byte each
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ByteGenotypes {
    calls: Vec<GenotypeCall>,
}

impl ByteGenotypes {
    pub fn as_slice(&self) -> &[GenotypeCall] {
        &self.calls
    }
}

impl GenotypeStore for ByteGenotypes {
    fn filled(len: usize, call: GenotypeCall) -> Self {
        Self {
            calls: vec![call; len],
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.calls.len()
    }

    #[inline]
    fn get(&self, idx: usize) -> GenotypeCall {
        self.calls[idx]
    }

    #[inline]
    fn set(&mut self, idx: usize, call: GenotypeCall) {
        self.calls[idx] = call;
    }

    fn push(&mut self, call: GenotypeCall) {
        self.calls.push(call);
    }

    fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            calls: self.calls[start..end].to_vec(),
        }
    }
}

/// Phase calls stored one byte each
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BytePhases {
    calls: Vec<PhaseCall>,
}

impl BytePhases {
    pub fn as_slice(&self) -> &[PhaseCall] {
        &self.calls
    }
}

impl PhaseStore for BytePhases {
    fn filled(len: usize, call: PhaseCall) -> Self {
        Self {
            calls: vec![call; len],
        }
    }

    #[inline]
    fn len(&self) -> usize {
        self.calls.len()
    }

    #[inline]
    fn get(&self, idx: usize) -> PhaseCall {
        self.calls[idx]
    }

    #[inline]
    fn set(&mut self, idx: usize, call: PhaseCall) {
        self.calls[idx] = call;
    }

    fn push(&mut self, call: PhaseCall) {
        self.calls.push(call);
    }

    fn slice(&self, start: usize, end: usize) -> Self {
        Self {
            calls: self.calls[start..end].to_vec(),
        }
    }
}
