//! Read-only aggregations over a preprocessed game table.
//!
//! These are the groupings a front end charts: result shares, top
//! categories, rating-binned rates and activity by hour and weekday. None of
//! them modifies the table they read.

pub mod bins;
pub mod filter;

pub use self::bins::{BinRate, draw_rate_by_avg_elo, higher_rated_win_rate_by_diff};
pub use self::filter::GameFilter;

use crate::config::ReportConfig;
use crate::constants::{WEEKDAY_ORDER, derived, raw};
use crate::error::Result;
use crate::models::GameResult;
use crate::preprocess::{float_column, string_column};

use polars::prelude::*;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// Headline counts of game outcomes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyMetrics {
    pub total_games: usize,
    pub white_wins: usize,
    pub black_wins: usize,
    pub draws: usize,
}

impl KeyMetrics {
    pub fn from_table(df: &DataFrame) -> Result<Self> {
        let mut metrics = KeyMetrics {
            total_games: df.height(),
            ..Default::default()
        };

        for result in string_column(df, raw::RESULT)?.into_iter() {
            match GameResult::from_raw(result) {
                GameResult::WhiteWin => metrics.white_wins += 1,
                GameResult::BlackWin => metrics.black_wins += 1,
                GameResult::Draw => metrics.draws += 1,
                GameResult::Unknown => {}
            }
        }
        Ok(metrics)
    }

    fn pct(&self, count: usize) -> Option<f64> {
        (self.total_games > 0).then(|| count as f64 / self.total_games as f64 * 100.0)
    }

    pub fn white_win_pct(&self) -> Option<f64> {
        self.pct(self.white_wins)
    }

    pub fn black_win_pct(&self) -> Option<f64> {
        self.pct(self.black_wins)
    }

    pub fn draw_pct(&self) -> Option<f64> {
        self.pct(self.draws)
    }
}

/// Lowest and highest rating over both colours
pub fn rating_bounds(df: &DataFrame) -> Result<Option<(f64, f64)>> {
    let white = float_column(df, raw::WHITE_ELO)?;
    let black = float_column(df, raw::BLACK_ELO)?;

    Ok(white
        .into_iter()
        .chain(black.into_iter())
        .flatten()
        .fold(None, |bounds, value| match bounds {
            None => Some((value, value)),
            Some((lo, hi)) => Some((f64::min(lo, value), f64::max(hi, value))),
        }))
}

/// Most frequent non-null values of `column`, ties broken alphabetically
pub fn value_counts(df: &DataFrame, column: &str, top_n: usize) -> Result<Vec<(String, usize)>> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let values = string_column(df, column)?;
    for value in values.into_iter().flatten() {
        *counts.entry(value).or_default() += 1;
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(value, count)| (value.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked.truncate(top_n);
    Ok(ranked)
}

/// Games per UTC hour of day
pub fn games_by_hour(df: &DataFrame) -> Result<[usize; 24]> {
    let hours = df.column(derived::HOUR)?.cast(&DataType::Int32)?;
    let mut buckets = [0usize; 24];
    for hour in hours.i32()?.into_iter().flatten() {
        if let Some(bucket) = usize::try_from(hour).ok().and_then(|h| buckets.get_mut(h)) {
            *bucket += 1;
        }
    }
    Ok(buckets)
}

/// Games per weekday in Monday-to-Sunday order, absent days counted as zero
pub fn games_by_weekday(df: &DataFrame) -> Result<Vec<(&'static str, usize)>> {
    let days = string_column(df, derived::DAY_OF_WEEK)?;
    let mut counts: Vec<(&'static str, usize)> =
        WEEKDAY_ORDER.iter().map(|day| (*day, 0)).collect();

    for day in days.into_iter().flatten() {
        if let Some(entry) = counts.iter_mut().find(|(name, _)| *name == day) {
            entry.1 += 1;
        }
    }
    Ok(counts)
}

/// Result distribution within one category
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutcomeShares {
    pub games: usize,
    pub white_wins: usize,
    pub black_wins: usize,
    pub draws: usize,
    pub other: usize,
}

impl OutcomeShares {
    fn pct(&self, count: usize) -> f64 {
        if self.games == 0 {
            0.0
        } else {
            count as f64 / self.games as f64 * 100.0
        }
    }

    pub fn white_win_pct(&self) -> f64 {
        self.pct(self.white_wins)
    }

    pub fn black_win_pct(&self) -> f64 {
        self.pct(self.black_wins)
    }

    pub fn draw_pct(&self) -> f64 {
        self.pct(self.draws)
    }

    pub fn other_pct(&self) -> f64 {
        self.pct(self.other)
    }
}

/// Result shares grouped by the values of `column`.
///
/// Rows with a null category or a null result are left out.
pub fn outcome_shares_by(df: &DataFrame, column: &str) -> Result<BTreeMap<String, OutcomeShares>> {
    let categories = string_column(df, column)?;
    let results = string_column(df, raw::RESULT)?;
    let mut shares: BTreeMap<String, OutcomeShares> = BTreeMap::new();

    for (category, result) in categories.into_iter().zip(results.into_iter()) {
        let (Some(category), Some(result)) = (category, result) else {
            continue;
        };
        let entry = shares.entry(category.to_string()).or_default();
        entry.games += 1;
        match GameResult::from_raw(Some(result)) {
            GameResult::WhiteWin => entry.white_wins += 1,
            GameResult::BlackWin => entry.black_wins += 1,
            GameResult::Draw => entry.draws += 1,
            GameResult::Unknown => entry.other += 1,
        }
    }
    Ok(shares)
}

/// Everything the text report shows, computed in one pass over the table.
///
/// A section is `None` when the table lacks the columns it needs, so a
/// partial export still yields every section it can.
#[derive(Debug, Clone)]
pub struct Summary {
    pub total_games: usize,
    pub metrics: Option<KeyMetrics>,
    pub rating_bounds: Option<(f64, f64)>,
    pub terminations: Option<Vec<(String, usize)>>,
    pub openings: Option<Vec<(String, usize)>>,
    pub opening_categories: Option<Vec<(String, usize)>>,
    pub time_controls: Option<Vec<(String, usize)>>,
    pub outcomes_by_opening: Option<BTreeMap<String, OutcomeShares>>,
    pub outcomes_by_time_control: Option<BTreeMap<String, OutcomeShares>>,
    pub higher_rated_wins: Option<Vec<BinRate>>,
    pub draw_rates: Option<Vec<BinRate>>,
    pub hours: Option<[usize; 24]>,
    pub weekdays: Option<Vec<(&'static str, usize)>>,
}

impl Summary {
    /// Summarise a preprocessed table, skipping sections with missing columns
    pub fn from_table(df: &DataFrame, config: &ReportConfig) -> Result<Self> {
        const RATED_RESULTS: &[&str] = &[raw::WHITE_ELO, raw::BLACK_ELO, raw::RESULT];

        Ok(Self {
            total_games: df.height(),
            metrics: when_present(df, &[raw::RESULT], || KeyMetrics::from_table(df))?,
            rating_bounds: when_present(df, &[raw::WHITE_ELO, raw::BLACK_ELO], || {
                rating_bounds(df)
            })?
            .flatten(),
            terminations: when_present(df, &[raw::TERMINATION], || {
                value_counts(df, raw::TERMINATION, config.top_terminations)
            })?,
            openings: when_present(df, &[raw::OPENING], || {
                value_counts(df, raw::OPENING, config.top_openings)
            })?,
            opening_categories: when_present(df, &[derived::OPENING_CATEGORY], || {
                value_counts(df, derived::OPENING_CATEGORY, usize::MAX)
            })?,
            time_controls: when_present(df, &[derived::TIME_CONTROL_GROUPED], || {
                value_counts(df, derived::TIME_CONTROL_GROUPED, usize::MAX)
            })?,
            outcomes_by_opening: when_present(df, &[derived::OPENING_CATEGORY, raw::RESULT], || {
                outcome_shares_by(df, derived::OPENING_CATEGORY)
            })?,
            outcomes_by_time_control: when_present(
                df,
                &[derived::TIME_CONTROL_GROUPED, raw::RESULT],
                || outcome_shares_by(df, derived::TIME_CONTROL_GROUPED),
            )?,
            higher_rated_wins: when_present(df, RATED_RESULTS, || {
                higher_rated_win_rate_by_diff(df)
            })?,
            draw_rates: when_present(df, RATED_RESULTS, || draw_rate_by_avg_elo(df))?,
            hours: when_present(df, &[derived::HOUR], || games_by_hour(df))?,
            weekdays: when_present(df, &[derived::DAY_OF_WEEK], || games_by_weekday(df))?,
        })
    }
}

fn when_present<T>(
    df: &DataFrame,
    columns: &[&str],
    compute: impl FnOnce() -> Result<T>,
) -> Result<Option<T>> {
    match columns.iter().find(|name| df.get_column_index(name).is_none()) {
        Some(missing) => {
            debug!("Summary section skipped, missing column {}", missing);
            Ok(None)
        }
        None => compute().map(Some),
    }
}
