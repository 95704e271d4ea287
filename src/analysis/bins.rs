//! Rating-binned rates.
//!
//! Bins are right-closed `(lower, upper]` intervals. Values outside every
//! bin, including an exact lower edge of the first bin, are not counted.

use crate::constants::raw;
use crate::error::Result;
use crate::models::GameResult;
use crate::preprocess::rating::{average_rating, rating_difference};
use crate::preprocess::{float_column, string_column};

use polars::prelude::*;

/// One `(lower, upper]` interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RatingBin {
    pub label: &'static str,
    pub lower: f64,
    pub upper: f64,
}

impl RatingBin {
    const fn new(label: &'static str, lower: f64, upper: f64) -> Self {
        Self {
            label,
            lower,
            upper,
        }
    }

    pub fn contains(&self, value: f64) -> bool {
        value > self.lower && value <= self.upper
    }
}

pub const ELO_DIFF_BINS: &[RatingBin] = &[
    RatingBin::new("0-50", 0.0, 50.0),
    RatingBin::new("50-100", 50.0, 100.0),
    RatingBin::new("100-200", 100.0, 200.0),
    RatingBin::new("200-500", 200.0, 500.0),
    RatingBin::new("500+", 500.0, 1000.0),
];

pub const AVG_ELO_BINS: &[RatingBin] = &[
    RatingBin::new("<1000", 0.0, 1000.0),
    RatingBin::new("1000-1200", 1000.0, 1200.0),
    RatingBin::new("1200-1400", 1200.0, 1400.0),
    RatingBin::new("1400-1600", 1400.0, 1600.0),
    RatingBin::new("1600-1800", 1600.0, 1800.0),
    RatingBin::new("1800-2000", 1800.0, 2000.0),
    RatingBin::new("2000+", 2000.0, 3000.0),
];

/// Share of games in a bin satisfying some condition
#[derive(Debug, Clone, PartialEq)]
pub struct BinRate {
    pub label: &'static str,
    pub games: usize,
    pub hits: usize,
}

impl BinRate {
    /// Percentage of hits, `None` for an empty bin
    pub fn rate_pct(&self) -> Option<f64> {
        (self.games > 0).then(|| self.hits as f64 / self.games as f64 * 100.0)
    }
}

fn bin_rates<I>(bins: &[RatingBin], observations: I) -> Vec<BinRate>
where
    I: IntoIterator<Item = (Option<f64>, bool)>,
{
    let mut rates: Vec<BinRate> = bins
        .iter()
        .map(|bin| BinRate {
            label: bin.label,
            games: 0,
            hits: 0,
        })
        .collect();

    for (value, hit) in observations {
        let Some(value) = value else { continue };
        if let Some(index) = bins.iter().position(|bin| bin.contains(value)) {
            rates[index].games += 1;
            rates[index].hits += usize::from(hit);
        }
    }
    rates
}

fn ratings_and_results(df: &DataFrame) -> Result<Vec<(Option<f64>, Option<f64>, GameResult)>> {
    let white = float_column(df, raw::WHITE_ELO)?;
    let black = float_column(df, raw::BLACK_ELO)?;
    let results = string_column(df, raw::RESULT)?;

    Ok(white
        .into_iter()
        .zip(black.into_iter())
        .zip(results.into_iter())
        .map(|((w, b), r)| (w, b, GameResult::from_raw(r)))
        .collect())
}

/// How often the higher-rated player wins, by rating gap
pub fn higher_rated_win_rate_by_diff(df: &DataFrame) -> Result<Vec<BinRate>> {
    let rows = ratings_and_results(df)?;
    let observations = rows.into_iter().map(|(w, b, result)| {
        let higher_won = match (w, b) {
            (Some(w), Some(b)) if w > b => result == GameResult::WhiteWin,
            (Some(w), Some(b)) if b > w => result == GameResult::BlackWin,
            _ => false,
        };
        (rating_difference(w, b), higher_won)
    });
    Ok(bin_rates(ELO_DIFF_BINS, observations))
}

/// Draw percentage by average rating
pub fn draw_rate_by_avg_elo(df: &DataFrame) -> Result<Vec<BinRate>> {
    let rows = ratings_and_results(df)?;
    let observations = rows
        .into_iter()
        .map(|(w, b, result)| (average_rating(w, b), result == GameResult::Draw));
    Ok(bin_rates(AVG_ELO_BINS, observations))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bins_are_right_closed() {
        let bin = ELO_DIFF_BINS[0];
        assert!(!bin.contains(0.0));
        assert!(bin.contains(0.5));
        assert!(bin.contains(50.0));
        assert!(!bin.contains(50.1));
    }

    #[test]
    fn test_higher_rated_win_rate() {
        let df = df!(
            "WhiteElo" => [Some(1540i64), Some(1500), Some(1500), Some(2000), Some(1500), None],
            "BlackElo" => [Some(1500i64), Some(1540), Some(1500), Some(1300), Some(1450), Some(1500)],
            "Result" => ["1-0", "1-0", "1-0", "1-0", "0-1", "1-0"]
        )
        .unwrap();

        let rates = higher_rated_win_rate_by_diff(&df).unwrap();
        let labels: Vec<_> = rates.iter().map(|r| r.label).collect();
        assert_eq!(labels, vec!["0-50", "50-100", "100-200", "200-500", "500+"]);

        // Gap 40 won by the higher side, gap 40 lost, gap 50 lost; the equal
        // ratings and the null rating fall outside every bin
        assert_eq!(rates[0].games, 3);
        assert_eq!(rates[0].hits, 1);
        assert_eq!(rates[4].games, 1);
        assert_eq!(rates[4].rate_pct(), Some(100.0));
        assert_eq!(rates[1].rate_pct(), None);
    }

    #[test]
    fn test_draw_rate_by_average_rating() {
        let df = df!(
            "WhiteElo" => [900i64, 1000, 1500, 1500, 2500],
            "BlackElo" => [900i64, 1000, 1500, 1600, 2400],
            "Result" => ["1/2-1/2", "1-0", "1/2-1/2", "0-1", "1/2-1/2"]
        )
        .unwrap();

        let rates = draw_rate_by_avg_elo(&df).unwrap();

        assert_eq!(rates[0].label, "<1000");
        assert_eq!(rates[0].games, 2);
        assert_eq!(rates[0].rate_pct(), Some(50.0));
        assert_eq!(rates[3].games, 2);
        assert_eq!(rates[3].hits, 1);
        assert_eq!(rates[6].rate_pct(), Some(100.0));
        assert_eq!(rates[1].games, 0);
    }
}
