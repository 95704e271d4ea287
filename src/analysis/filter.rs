//! Row filters over a preprocessed game table.

use crate::constants::derived;
use crate::error::Result;
use crate::models::TimeControlCategory;
use crate::preprocess::{float_column, string_column};

use polars::prelude::*;
use tracing::debug;

/// Selection by time-control bucket and average-rating range
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GameFilter {
    pub time_control: Option<TimeControlCategory>,
    /// Inclusive `(min, max)` bounds on `AvgElo`
    pub avg_elo: Option<(f64, f64)>,
}

impl GameFilter {
    pub fn is_empty(&self) -> bool {
        self.time_control.is_none() && self.avg_elo.is_none()
    }

    /// Return the matching rows as a new table.
    ///
    /// Rows with a null `AvgElo` never satisfy a rating range.
    pub fn apply(&self, df: &DataFrame) -> Result<DataFrame> {
        if self.is_empty() {
            return Ok(df.clone());
        }

        let mut keep = vec![true; df.height()];

        if let Some(category) = self.time_control {
            let grouped = string_column(df, derived::TIME_CONTROL_GROUPED)?;
            for (keep, value) in keep.iter_mut().zip(grouped.into_iter()) {
                *keep &= value == Some(category.label());
            }
        }

        if let Some((min, max)) = self.avg_elo {
            let avg = float_column(df, derived::AVG_ELO)?;
            for (keep, value) in keep.iter_mut().zip(avg.into_iter()) {
                *keep &= value.is_some_and(|v| v >= min && v <= max);
            }
        }

        let mask: BooleanChunked = keep.into_iter().collect();
        let filtered = df.filter(&mask)?;
        debug!("Filter kept {} of {} rows", filtered.height(), df.height());
        Ok(filtered)
    }
}
