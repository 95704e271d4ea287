//! Move-count and duration estimates from the annotated move text (`AN`).
//!
//! Both values are heuristics over free text, not ply counts. Move numbers
//! are counted wherever they appear, so digits followed by a period inside
//! comments or engine evaluations (`[%eval 0.17]`) are counted too.

use super::{Derivation, string_column};
use crate::constants::{MINUTES_PER_MOVE_MARKER, derived, raw};
use crate::error::Result;

use polars::prelude::*;
use regex::Regex;
use std::sync::LazyLock;

/// A move number: digits, a period, and an optional `..` for black's move
static MOVE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.(?:\.\.)?").expect("move marker pattern is valid"));

/// Approximate move count: the number of move-number markers in the text
pub fn count_move_markers(moves: Option<&str>) -> Option<u32> {
    moves.map(|text| MOVE_MARKER.find_iter(text).count() as u32)
}

/// Rough game length in minutes, two minutes per period in the move text
pub fn estimate_duration_minutes(moves: Option<&str>) -> Option<u32> {
    moves.map(|text| text.matches('.').count() as u32 * MINUTES_PER_MOVE_MARKER)
}

/// Adds `MoveCount` and `EstimatedDurationMinutes`
#[derive(Debug, Clone, Copy, Default)]
pub struct MoveTextDerivation;

impl Derivation for MoveTextDerivation {
    fn name(&self) -> &'static str {
        "move_text"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[raw::MOVES]
    }

    fn derive(&self, df: &DataFrame) -> Result<Vec<Series>> {
        let moves = string_column(df, raw::MOVES)?;

        let counts: UInt32Chunked = moves.into_iter().map(count_move_markers).collect();
        let minutes: UInt32Chunked = moves.into_iter().map(estimate_duration_minutes).collect();

        Ok(vec![
            counts.with_name(derived::MOVE_COUNT.into()).into_series(),
            minutes
                .with_name(derived::ESTIMATED_DURATION_MINUTES.into())
                .into_series(),
        ])
    }
}
