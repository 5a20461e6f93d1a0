//! # Pipeline Module
//!
//! Batch workflows over files of individuals. Each pipeline reads its
//! inputs with the configured storage backend, processes individuals in
//! parallel, and writes one report row per individual.

pub mod check;
pub mod compare;
pub mod stats;

use std::collections::HashMap;

pub use check::{CheckPipeline, CheckRow};
pub use compare::{ComparePipeline, CompareRow};
pub use stats::{StatsPipeline, StatsRow};

use crate::data::Backend;
use crate::error::{GenopackError, Result};
use crate::io::{GenotypeRecord, PhaseRecord};

/// A record keyed by individual id
pub trait Individual {
    fn id(&self) -> &str;
}

impl<B: Backend> Individual for GenotypeRecord<B> {
    fn id(&self) -> &str {
        &self.id
    }
}

impl<B: Backend> Individual for PhaseRecord<B> {
    fn id(&self) -> &str {
        &self.id
    }
}

/// Map ids to records, rejecting duplicated ids
pub(crate) fn index_by_id<T: Individual>(records: &[T]) -> Result<HashMap<&str, &T>> {
    let mut index = HashMap::with_capacity(records.len());
    for record in records {
        if index.insert(record.id(), record).is_some() {
            return Err(GenopackError::invalid_data(format!(
                "individual '{}' appears more than once",
                record.id()
            )));
        }
    }
    Ok(index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Genotype, Packed};

    fn record(id: &str) -> GenotypeRecord<Packed> {
        GenotypeRecord {
            id: id.to_string(),
            genotype: Genotype::from_codes(&[0, 1]),
        }
    }

    #[test]
    fn test_index_by_id() {
        let records = vec![record("a"), record("b")];
        let index = index_by_id(&records).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index["b"].id, "b");

        let dup = vec![record("a"), record("a")];
        assert!(matches!(
            index_by_id(&dup),
            Err(GenopackError::InvalidData { .. })
        ));
    }
}
