//! Error handling for chess game loading and preprocessing.
//!
//! Only whole-table failures are errors. Malformed cells degrade to null
//! or a fallback category inside the derivations and never reach this type.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ChessError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Polars error: {0}")]
    Polars(#[from] polars::error::PolarsError),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Game file not found at path: {path}")]
    FileNotFound { path: PathBuf },

    #[error("Invalid CSV table in file: {path} - {reason}")]
    InvalidFormat { path: PathBuf, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ChessError {
    /// Whether this error means the source table could not be produced at all.
    ///
    /// Callers must stop the pipeline on a load failure rather than carry on
    /// with an empty table.
    pub fn is_load_failure(&self) -> bool {
        matches!(
            self,
            ChessError::Io(_)
                | ChessError::Polars(_)
                | ChessError::Csv(_)
                | ChessError::FileNotFound { .. }
                | ChessError::InvalidFormat { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, ChessError>;
