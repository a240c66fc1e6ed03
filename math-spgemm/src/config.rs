//! JSON configuration for benchmark runs

use crate::generator::GeneratorConfig;
use crate::multiply::MultiplyConfig;
use crate::parallel::ParallelConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Thread counts swept when none are given
pub const DEFAULT_THREAD_COUNTS: [usize; 10] = [1, 2, 4, 8, 12, 14, 16, 20, 24, 28];

/// Complete benchmark configuration loaded from JSON
///
/// `A` is `a_rows x a_cols`; the right-hand matrix is generated directly in
/// transposed form as `b_cols x a_cols`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchConfig {
    /// Rows of `A`
    pub a_rows: usize,
    /// Columns of `A` (and of `Bt`)
    pub a_cols: usize,
    /// Columns of `B` (rows of `Bt`)
    pub b_cols: usize,
    /// Fill factor of both inputs
    pub fill_factor: f64,
    /// Seed of `A`; `Bt` uses `seed + 1`
    #[serde(default)]
    pub seed: u64,
    /// Rows per block (None = 1% of `a_rows`)
    #[serde(default)]
    pub block_size: Option<usize>,
    /// Thread counts to time, one multiplication each
    #[serde(default = "default_thread_counts")]
    pub thread_counts: Vec<usize>,
}

fn default_thread_counts() -> Vec<usize> {
    DEFAULT_THREAD_COUNTS.to_vec()
}

impl BenchConfig {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents =
            fs::read_to_string(path).map_err(|e| format!("Failed to read config file: {}", e))?;

        let config: BenchConfig =
            serde_json::from_str(&contents).map_err(|e| format!("Failed to parse JSON: {}", e))?;

        Ok(config)
    }

    /// Save configuration to JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), String> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(path, json).map_err(|e| format!("Failed to write config file: {}", e))?;

        Ok(())
    }

    /// Generator settings for `A`
    pub fn left_generator(&self) -> GeneratorConfig {
        GeneratorConfig {
            fill_factor: self.fill_factor,
            seed: self.seed,
            parallel: ParallelConfig::default(),
        }
    }

    /// Generator settings for `Bt`
    pub fn right_generator(&self) -> GeneratorConfig {
        GeneratorConfig {
            seed: self.seed.wrapping_add(1),
            ..self.left_generator()
        }
    }

    /// Multiplication settings for a run on `threads` workers
    pub fn multiply_config(&self, threads: usize) -> MultiplyConfig {
        MultiplyConfig {
            block_size: self.block_size,
            parallel: ParallelConfig::with_threads(threads),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_config() {
        let json = r#"{ "a_rows": 100, "a_cols": 50, "b_cols": 80, "fill_factor": 0.05 }"#;
        let config: BenchConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.seed, 0);
        assert_eq!(config.block_size, None);
        assert_eq!(config.thread_counts, DEFAULT_THREAD_COUNTS.to_vec());
        assert_eq!(config.right_generator().seed, 1);
        assert_eq!(config.multiply_config(4).parallel.num_threads, Some(4));
    }

    #[test]
    fn test_file_roundtrip() {
        let config = BenchConfig {
            a_rows: 10,
            a_cols: 20,
            b_cols: 30,
            fill_factor: 0.1,
            seed: 7,
            block_size: Some(2),
            thread_counts: vec![1, 3],
        };
        let path = std::env::temp_dir().join(format!("spgemm_config_{}.json", std::process::id()));

        config.to_file(&path).unwrap();
        let loaded = BenchConfig::from_file(&path).unwrap();
        let _ = fs::remove_file(&path);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_file() {
        let err = BenchConfig::from_file("/nonexistent/spgemm.json").unwrap_err();
        assert!(err.starts_with("Failed to read config file"));
    }
}
