//! Boolean result indicators from `Result`.

use super::{Derivation, string_column};
use crate::constants::{derived, raw};
use crate::error::Result;
use crate::models::GameResult;

use polars::prelude::*;

/// Indicator flags for one game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ResultFlags {
    pub white_wins: bool,
    pub black_wins: bool,
    pub draw: bool,
}

impl From<GameResult> for ResultFlags {
    fn from(result: GameResult) -> Self {
        Self {
            white_wins: result == GameResult::WhiteWin,
            black_wins: result == GameResult::BlackWin,
            draw: result == GameResult::Draw,
        }
    }
}

/// All flags are false for an unrecognised or missing result
pub fn result_flags(raw: Option<&str>) -> ResultFlags {
    GameResult::from_raw(raw).into()
}

/// Adds `WhiteWins`, `BlackWins` and `Draw`
#[derive(Debug, Clone, Copy, Default)]
pub struct OutcomeDerivation;

impl Derivation for OutcomeDerivation {
    fn name(&self) -> &'static str {
        "outcome"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[raw::RESULT]
    }

    fn derive(&self, df: &DataFrame) -> Result<Vec<Series>> {
        let results = string_column(df, raw::RESULT)?;
        let flags: Vec<ResultFlags> = results.into_iter().map(result_flags).collect();

        let white: BooleanChunked = flags.iter().map(|f| f.white_wins).collect();
        let black: BooleanChunked = flags.iter().map(|f| f.black_wins).collect();
        let draw: BooleanChunked = flags.iter().map(|f| f.draw).collect();

        Ok(vec![
            white.with_name(derived::WHITE_WINS.into()).into_series(),
            black.with_name(derived::BLACK_WINS.into()).into_series(),
            draw.with_name(derived::DRAW.into()).into_series(),
        ])
    }
}
