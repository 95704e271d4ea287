//! Preprocessing engine for raw game tables.
//!
//! Each derivation is a pure per-row transformation over one or more raw
//! columns. The preprocessor runs every derivation whose input columns are
//! present, skips the rest, and returns an augmented copy of the table. The
//! caller's table is never modified and no row is ever dropped.

pub mod moves;
pub mod opening;
pub mod outcome;
pub mod rating;
pub mod temporal;
pub mod time_control;

#[cfg(test)]
pub mod tests;

use self::{
    moves::MoveTextDerivation,
    opening::OpeningDerivation,
    outcome::OutcomeDerivation,
    rating::RatingDerivation,
    temporal::{CalendarDerivation, TimestampDerivation},
    time_control::TimeControlDerivation,
};

use crate::error::Result;
use crate::models::{PreprocessStats, SkippedDerivation};

use polars::prelude::*;
use tracing::{debug, info, warn};

/// A group of derived columns computed from named raw columns
pub trait Derivation: Send + Sync {
    fn name(&self) -> &'static str;

    /// Raw columns that must all be present for this derivation to run
    fn required_columns(&self) -> &'static [&'static str];

    /// Compute the derived columns, one value per input row
    fn derive(&self, df: &DataFrame) -> Result<Vec<Series>>;
}

/// Runs a fixed list of derivations over a table
pub struct Preprocessor {
    derivations: Vec<Box<dyn Derivation>>,
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Preprocessor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preprocessor")
            .field(
                "derivations",
                &self.derivations.iter().map(|d| d.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Preprocessor {
    /// Preprocessor with every standard derivation
    pub fn new() -> Self {
        Self::with_derivations(vec![
            Box::new(TimestampDerivation),
            Box::new(CalendarDerivation),
            Box::new(TimeControlDerivation),
            Box::new(RatingDerivation),
            Box::new(OutcomeDerivation),
            Box::new(MoveTextDerivation),
            Box::new(OpeningDerivation),
        ])
    }

    pub fn with_derivations(derivations: Vec<Box<dyn Derivation>>) -> Self {
        Self { derivations }
    }

    /// Return an augmented copy of `df` and a summary of what ran
    pub fn run(&self, df: &DataFrame) -> Result<(DataFrame, PreprocessStats)> {
        let mut output = df.clone();
        let mut stats = PreprocessStats {
            rows: df.height(),
            ..Default::default()
        };

        for derivation in &self.derivations {
            let missing: Vec<&'static str> = derivation
                .required_columns()
                .iter()
                .copied()
                .filter(|name| df.get_column_index(name).is_none())
                .collect();

            if !missing.is_empty() {
                warn!(
                    "Skipping {} derivation, missing columns: {}",
                    derivation.name(),
                    missing.join(", ")
                );
                stats.skipped.push(SkippedDerivation {
                    derivation: derivation.name(),
                    missing_columns: missing,
                });
                continue;
            }

            for series in derivation.derive(df)? {
                debug!(
                    "Derived {} ({} of {} values null)",
                    series.name(),
                    series.null_count(),
                    series.len()
                );
                output.with_column(series)?;
            }
            stats.applied.push(derivation.name());
        }

        info!(
            "Preprocessed {} rows: {} derivations applied, {} skipped",
            stats.rows,
            stats.applied.len(),
            stats.skipped.len()
        );

        Ok((output, stats))
    }
}

/// Preprocess with the standard derivations
pub fn preprocess(df: &DataFrame) -> Result<DataFrame> {
    preprocess_with_stats(df).map(|(output, _)| output)
}

pub fn preprocess_with_stats(df: &DataFrame) -> Result<(DataFrame, PreprocessStats)> {
    Preprocessor::new().run(df)
}

/// Column values as strings, whatever type the CSV reader inferred
pub(crate) fn string_column(df: &DataFrame, name: &str) -> Result<StringChunked> {
    let column = df.column(name)?.cast(&DataType::String)?;
    Ok(column.str()?.clone())
}

/// Column values as floats; unparseable cells become null
pub(crate) fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df.column(name)?.cast(&DataType::Float64)?;
    Ok(column.f64()?.clone())
}
