//! # Model Module
//!
//! Algorithms relating genotypes to haplotypes.

pub mod reconcile;

pub use reconcile::{intersect_compare, WindowComparison};
