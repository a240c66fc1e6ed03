//! Parallel execution configuration
//!
//! All parallel phases (row generation, row sorting, block multiplication)
//! run through [`ParallelConfig::install`], so the worker count is always a
//! caller decision rather than a compile-time constant.

use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Parallel execution configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParallelConfig {
    /// Enable parallel execution (disabled = a single worker)
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// Number of threads to use (None = use rayon's global pool)
    #[serde(default)]
    pub num_threads: Option<usize>,
}

fn default_enabled() -> bool {
    true
}

impl Default for ParallelConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            num_threads: None, // Use rayon's default (typically num_cpus)
        }
    }
}

impl ParallelConfig {
    /// Configuration running on exactly `num_threads` workers
    pub fn with_threads(num_threads: usize) -> Self {
        Self {
            enabled: true,
            num_threads: Some(num_threads.max(1)),
        }
    }

    /// Configuration running everything on one worker
    pub fn sequential() -> Self {
        Self {
            enabled: false,
            num_threads: None,
        }
    }

    /// Number of workers `install` will run on
    pub fn effective_threads(&self) -> usize {
        if !self.enabled {
            1
        } else {
            self.num_threads
                .map(|n| n.max(1))
                .unwrap_or_else(rayon::current_num_threads)
        }
    }

    /// Run `op` with this configuration's worker count.
    ///
    /// Parallel iterators used inside `op` execute on a dedicated pool when a
    /// thread count is fixed (or parallelism is disabled), and on the global
    /// pool otherwise.
    pub fn install<R, F>(&self, op: F) -> Result<R>
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        let num_threads = match (self.enabled, self.num_threads) {
            (false, _) => 1,
            (true, Some(n)) => n.max(1),
            (true, None) => return Ok(op()),
        };

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .build()?;
        log::trace!("running on a dedicated pool of {} threads", num_threads);
        Ok(pool.install(op))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn test_default_uses_global_pool() {
        let config = ParallelConfig::default();
        assert!(config.enabled);
        assert_eq!(config.num_threads, None);
        assert_eq!(config.effective_threads(), rayon::current_num_threads());
    }

    #[test]
    fn test_install_fixed_threads() {
        let config = ParallelConfig::with_threads(3);
        let threads = config.install(rayon::current_num_threads).unwrap();
        assert_eq!(threads, 3);
    }

    #[test]
    fn test_sequential_runs_on_one_thread() {
        let config = ParallelConfig::sequential();
        assert_eq!(config.effective_threads(), 1);
        let threads = config.install(rayon::current_num_threads).unwrap();
        assert_eq!(threads, 1);
    }

    #[test]
    fn test_install_runs_parallel_iterators() {
        let config = ParallelConfig::with_threads(2);
        let result: Vec<usize> = config
            .install(|| (0..5usize).into_par_iter().map(|i| i * 2).collect())
            .unwrap();
        assert_eq!(result, vec![0, 2, 4, 6, 8]);
    }

    #[test]
    fn test_zero_threads_clamped() {
        let config = ParallelConfig::with_threads(0);
        assert_eq!(config.num_threads, Some(1));
    }

    #[test]
    fn test_config_from_json() {
        let config: ParallelConfig = serde_json::from_str(r#"{"num_threads": 4}"#).unwrap();
        assert!(config.enabled);
        assert_eq!(config.effective_threads(), 4);
    }
}
