//! # Data Module
//!
//! In-memory representations of genotype and phase calls. This is the core
//! "Model" layer.
//!
//! ## Design Philosophy
//! - **Explicit states:** every locus holds a `GenotypeCall` or `PhaseCall`
//!   enum value; no fifth state is representable.
//! - **Backend as a type parameter:** `Genotype<B>` and `Haplotype<B>` are
//!   generic over a zero-sized `Backend` marker, so the storage strategy is
//!   fixed at compile time and every bulk operation is monomorphised.

pub mod call;
pub mod genotype;
pub mod haplotype;
pub mod storage;

// Re-export commonly used types
pub use call::{GenotypeCall, PhaseCall, MISSING_CODE, PHASE_ERROR_CODE};
pub use genotype::Genotype;
pub use haplotype::Haplotype;
pub use storage::{Backend, Bytes, GenotypeStore, Packed, PhaseStore};
