//! ECO code to opening family.

use super::{Derivation, string_column};
use crate::constants::{derived, raw};
use crate::error::Result;
use crate::models::OpeningCategory;

use polars::prelude::*;

/// Map an ECO code to its family by the uppercased first character.
///
/// Missing codes are `Unknown`; present but unrecognised codes (including
/// the empty string) are `Other`.
pub fn categorize_opening(eco: Option<&str>) -> OpeningCategory {
    let Some(eco) = eco else {
        return OpeningCategory::Unknown;
    };

    match eco.chars().next().and_then(|c| c.to_uppercase().next()) {
        Some('A') => OpeningCategory::FlankOpenings,
        Some('B') => OpeningCategory::SemiOpenGames,
        Some('C') => OpeningCategory::OpenGames,
        Some('D') => OpeningCategory::ClosedGames,
        Some('E') => OpeningCategory::IndianDefenses,
        _ => OpeningCategory::Other,
    }
}

/// Adds `OpeningCategory`
#[derive(Debug, Clone, Copy, Default)]
pub struct OpeningDerivation;

impl Derivation for OpeningDerivation {
    fn name(&self) -> &'static str {
        "opening_category"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[raw::ECO]
    }

    fn derive(&self, df: &DataFrame) -> Result<Vec<Series>> {
        let eco = string_column(df, raw::ECO)?;
        let categories: StringChunked = eco
            .into_iter()
            .map(|code| Some(categorize_opening(code).label()))
            .collect();

        Ok(vec![
            categories
                .with_name(derived::OPENING_CATEGORY.into())
                .into_series(),
        ])
    }
}
