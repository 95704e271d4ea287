//! Chess Insights Library
//!
//! Loads Lichess-style chess game exports from CSV and turns them into an
//! analysis-ready table.
//!
//! This library provides tools for:
//! - Loading a game table in full or as a reproducible uniform sample read in sequential blocks
//! - Deriving timestamps, calendar fields, time-control buckets, rating aggregates,
//!   result flags, move-text estimates and opening families from the raw columns
//! - Caching loaded tables keyed by file identity and sample size
//! - Filtering and aggregating the preprocessed table for reporting

pub mod analysis;
pub mod cache;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod loader;
pub mod models;
pub mod preprocess;

// Re-export commonly used types
pub use analysis::{GameFilter, KeyMetrics, Summary};
pub use cache::{InvalidationPolicy, LoadCache, NeverExpire, TimeToLive};
pub use config::InsightsConfig;
pub use error::{ChessError, Result};
pub use loader::{GameLoader, load_games};
pub use models::{GameResult, OpeningCategory, PreprocessStats, TimeControlCategory};
pub use preprocess::{Derivation, Preprocessor, preprocess, preprocess_with_stats};
