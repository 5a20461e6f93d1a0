//! # Per-Locus Call States
//!
//! The two small state spaces every array is built from, together with the
//! truth tables that relate them. Storage backends only ever hold values of
//! these enums, so no fifth state is representable.
//!
//! ## Genotype truth table (from a haplotype pair)
//! ```text
//!            b=0      b=1      b=9/err
//! a=0        Zero     One      Missing
//! a=1        One      Two      Missing
//! a=9/err    Missing  Missing  Missing
//! ```
//!
//! ## Complement truth table (genotype + partner phase -> other phase)
//! ```text
//!            p=0      p=1      p=9/err
//! g=0        Zero     Zero     Zero
//! g=1        One      Zero     Missing
//! g=2        One      One      One
//! g=9        Missing  Missing  Missing
//! ```

use std::fmt;

/// Integer code for a missing genotype or phase call
pub const MISSING_CODE: i32 = 9;

/// Integer code reported for a phase call in the error state
pub const PHASE_ERROR_CODE: i32 = -1;

/// Diploid genotype call at one locus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum GenotypeCall {
    /// Homozygous for the first allele
    Zero = 0,
    /// Heterozygous
    One = 1,
    /// Homozygous for the second allele
    Two = 2,
    /// No call
    #[default]
    Missing = 3,
}

impl GenotypeCall {
    /// Decode an integer code. Anything outside {0, 1, 2} is missing.
    #[inline]
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Zero,
            1 => Self::One,
            2 => Self::Two,
            _ => Self::Missing,
        }
    }

    /// Integer code (0, 1, 2 or 9)
    #[inline]
    pub fn code(self) -> i32 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Two => 2,
            Self::Missing => MISSING_CODE,
        }
    }

    #[inline]
    pub fn is_missing(self) -> bool {
        self == Self::Missing
    }

    #[inline]
    pub fn is_homozygous(self) -> bool {
        matches!(self, Self::Zero | Self::Two)
    }

    #[inline]
    pub fn is_heterozygous(self) -> bool {
        self == Self::One
    }

    /// Genotype implied by two phase calls
    #[inline]
    pub fn from_phase_pair(a: PhaseCall, b: PhaseCall) -> Self {
        match (a, b) {
            (PhaseCall::Zero, PhaseCall::Zero) => Self::Zero,
            (PhaseCall::One, PhaseCall::One) => Self::Two,
            (PhaseCall::Zero, PhaseCall::One) | (PhaseCall::One, PhaseCall::Zero) => Self::One,
            _ => Self::Missing,
        }
    }

    /// Phase call a homozygous genotype forces onto both haplotypes
    #[inline]
    pub fn implied_phase(self) -> Option<PhaseCall> {
        match self {
            Self::Zero => Some(PhaseCall::Zero),
            Self::Two => Some(PhaseCall::One),
            Self::One | Self::Missing => None,
        }
    }

    /// The phase call on the other haplotype, given this genotype and one
    /// known haplotype.
    #[inline]
    pub fn complement(self, partner: PhaseCall) -> PhaseCall {
        match (self, partner) {
            (Self::Zero, _) => PhaseCall::Zero,
            (Self::Two, _) => PhaseCall::One,
            (Self::One, PhaseCall::Zero) => PhaseCall::One,
            (Self::One, PhaseCall::One) => PhaseCall::Zero,
            (Self::One, _) | (Self::Missing, _) => PhaseCall::Missing,
        }
    }

    /// True if a called phase contradicts a homozygous genotype
    #[inline]
    pub fn conflicts_with(self, phase: PhaseCall) -> bool {
        matches!(
            (self, phase),
            (Self::Zero, PhaseCall::One) | (Self::Two, PhaseCall::Zero)
        )
    }
}

impl fmt::Display for GenotypeCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Haplotype phase call at one locus
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[repr(u8)]
pub enum PhaseCall {
    Zero = 0,
    One = 1,
    /// No call
    #[default]
    Missing = 2,
    /// Both storage bits set; produced by out-of-domain input codes
    Error = 3,
}

impl PhaseCall {
    /// Decode an integer code. 9 is missing, anything else outside {0, 1}
    /// is an error call.
    #[inline]
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => Self::Zero,
            1 => Self::One,
            MISSING_CODE => Self::Missing,
            _ => Self::Error,
        }
    }

    /// Integer code (0, 1, 9 or [`PHASE_ERROR_CODE`])
    #[inline]
    pub fn code(self) -> i32 {
        match self {
            Self::Zero => 0,
            Self::One => 1,
            Self::Missing => MISSING_CODE,
            Self::Error => PHASE_ERROR_CODE,
        }
    }

    /// True for Zero and One. Missing and Error are both uncalled.
    #[inline]
    pub fn is_called(self) -> bool {
        matches!(self, Self::Zero | Self::One)
    }

    /// Keep a called value, otherwise take `other` if that one is called
    #[inline]
    pub fn or_called(self, other: PhaseCall) -> PhaseCall {
        if !self.is_called() && other.is_called() {
            other
        } else {
            self
        }
    }
}

impl fmt::Display for PhaseCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
