//! Configuration management and validation.
//!
//! Provides configuration structures for the loader, the load cache and
//! the text report, with defaults matching the Lichess export workflow.

use crate::constants::{
    DEFAULT_BLOCK_SIZE, DEFAULT_INFER_SCHEMA_LENGTH, DEFAULT_SAMPLE_SEED, DEFAULT_TOP_OPENINGS,
    DEFAULT_TOP_TERMINATIONS,
};
use crate::error::{ChessError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Loader configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoaderConfig {
    /// Rows per sequential block when a sample size is requested
    pub block_size: usize,

    /// Seed for the uniform sample; fixed so loads are reproducible
    pub seed: u64,

    /// Rows scanned to infer column types
    pub infer_schema_length: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            block_size: DEFAULT_BLOCK_SIZE,
            seed: DEFAULT_SAMPLE_SEED,
            infer_schema_length: DEFAULT_INFER_SCHEMA_LENGTH,
        }
    }
}

/// Load cache configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CacheConfig {
    /// Entry lifetime in seconds; `None` keeps entries until cleared
    pub ttl_seconds: Option<u64>,
}

impl CacheConfig {
    pub fn ttl(&self) -> Option<Duration> {
        self.ttl_seconds.map(Duration::from_secs)
    }
}

/// Text report configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportConfig {
    pub top_openings: usize,
    pub top_terminations: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            top_openings: DEFAULT_TOP_OPENINGS,
            top_terminations: DEFAULT_TOP_TERMINATIONS,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InsightsConfig {
    pub loader: LoaderConfig,
    pub cache: CacheConfig,
    pub report: ReportConfig,
}

impl InsightsConfig {
    /// Reject settings that would make the pipeline meaningless
    pub fn validate(&self) -> Result<()> {
        if self.loader.block_size == 0 {
            return Err(ChessError::Configuration {
                message: "loader block size must be greater than zero".to_string(),
            });
        }

        if self.loader.infer_schema_length == 0 {
            return Err(ChessError::Configuration {
                message: "schema inference length must be greater than zero".to_string(),
            });
        }

        if self.report.top_openings == 0 || self.report.top_terminations == 0 {
            return Err(ChessError::Configuration {
                message: "report top-N values must be greater than zero".to_string(),
            });
        }

        debug!(
            "Configuration valid: block_size={}, seed={}, ttl={:?}",
            self.loader.block_size, self.loader.seed, self.cache.ttl_seconds
        );
        Ok(())
    }
}
