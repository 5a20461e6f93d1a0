//! # Threading Configuration
//!
//! Configure the global rayon pool the pipelines run on. Called once from
//! the binary before any parallel work starts.

use tracing::debug;

use crate::error::{GenopackError, Result};

/// Install the global rayon pool with `n_threads` named workers.
///
/// Fails if `n_threads` is zero or a global pool was already built.
pub fn configure_global_pool(n_threads: usize) -> Result<()> {
    if n_threads == 0 {
        return Err(GenopackError::config("thread pool needs at least one thread"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(n_threads)
        .thread_name(|i| format!("genopack-worker-{}", i))
        .build_global()
        .map_err(|e| GenopackError::config(format!("Failed to create thread pool: {}", e)))?;
    debug!(n_threads, "configured global thread pool");
    Ok(())
}
