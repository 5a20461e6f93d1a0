//! # Genopack Library
//!
//! Compact genotype and haplotype arrays with fast pairwise comparison.
//! Every array can live in one of two storage backends: two bit planes per
//! array (`Packed`, word-at-a-time counting) or one byte per call (`Bytes`).
//! Both give identical results.
//!
//! ## Modules
//! - `config`: CLI argument parsing and validation
//! - `data`: Call codes, storage backends, genotype and haplotype arrays
//! - `error`: Error types and result aliases
//! - `io`: Call file reading and report writing
//! - `model`: Operations that combine genotypes with haplotypes
//! - `pipelines`: High-level workflow orchestration
//! - `utils`: Shared utilities (thread pool)

pub mod config;
pub mod data;
pub mod error;
pub mod io;
pub mod model;
pub mod pipelines;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use data::{Backend, Bytes, Genotype, GenotypeCall, Haplotype, Packed, PhaseCall};
pub use error::{GenopackError, Result};
pub use model::{intersect_compare, WindowComparison};

pub use pipelines::{CheckPipeline, ComparePipeline, StatsPipeline};
