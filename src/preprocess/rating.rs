//! Rating aggregates from `WhiteElo` and `BlackElo`.

use super::{Derivation, float_column};
use crate::constants::{derived, raw};
use crate::error::Result;

use polars::prelude::*;

/// Mean of both ratings; null if either is missing
pub fn average_rating(white: Option<f64>, black: Option<f64>) -> Option<f64> {
    Some((white? + black?) / 2.0)
}

/// Absolute rating gap; null if either is missing
pub fn rating_difference(white: Option<f64>, black: Option<f64>) -> Option<f64> {
    Some((white? - black?).abs())
}

/// Adds `AvgElo` and `EloDiff`
#[derive(Debug, Clone, Copy, Default)]
pub struct RatingDerivation;

impl Derivation for RatingDerivation {
    fn name(&self) -> &'static str {
        "rating"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[raw::WHITE_ELO, raw::BLACK_ELO]
    }

    fn derive(&self, df: &DataFrame) -> Result<Vec<Series>> {
        // Non-numeric ratings such as "?" become null in the cast
        let white = float_column(df, raw::WHITE_ELO)?;
        let black = float_column(df, raw::BLACK_ELO)?;

        let pairs: Vec<(Option<f64>, Option<f64>)> =
            white.into_iter().zip(black.into_iter()).collect();

        let avg: Float64Chunked = pairs.iter().map(|&(w, b)| average_rating(w, b)).collect();
        let diff: Float64Chunked = pairs
            .iter()
            .map(|&(w, b)| rating_difference(w, b))
            .collect();

        Ok(vec![
            avg.with_name(derived::AVG_ELO.into()).into_series(),
            diff.with_name(derived::ELO_DIFF.into()).into_series(),
        ])
    }
}
