//! Time-control parsing and bucketing.
//!
//! A time control is `"<base>+<increment>"` in seconds. Each side parses
//! independently, so `"300+x"` still yields a base of 300.

use super::{Derivation, string_column};
use crate::constants::time_control::{
    BLITZ_BELOW_SECONDS, BULLET_BELOW_SECONDS, RAPID_BELOW_SECONDS,
};
use crate::constants::{derived, raw};
use crate::error::Result;
use crate::models::TimeControlCategory;

use polars::prelude::*;

/// Base and increment seconds of a time control
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TimeControl {
    pub base: Option<f64>,
    pub increment: Option<f64>,
}

/// Split on `+` and parse each side as seconds
pub fn parse_time_control(raw: &str) -> TimeControl {
    let mut parts = raw.split('+');
    TimeControl {
        base: parts.next().and_then(parse_seconds),
        increment: parts.next().and_then(parse_seconds),
    }
}

/// Bucket a raw time-control string; never fails
pub fn categorize_time_control(raw: Option<&str>) -> TimeControlCategory {
    raw.map(parse_time_control)
        .and_then(|tc| tc.base)
        .map_or(TimeControlCategory::Unknown, categorize_base_seconds)
}

/// Half-open buckets, first match wins
pub fn categorize_base_seconds(base: f64) -> TimeControlCategory {
    if base.is_nan() {
        TimeControlCategory::Unknown
    } else if base < BULLET_BELOW_SECONDS {
        TimeControlCategory::Bullet
    } else if base < BLITZ_BELOW_SECONDS {
        TimeControlCategory::Blitz
    } else if base < RAPID_BELOW_SECONDS {
        TimeControlCategory::Rapid
    } else {
        TimeControlCategory::Classical
    }
}

fn parse_seconds(part: &str) -> Option<f64> {
    part.trim().parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Adds `TimeControlBase`, `TimeControlIncrement` and `TimeControlGrouped`
#[derive(Debug, Clone, Copy, Default)]
pub struct TimeControlDerivation;

impl Derivation for TimeControlDerivation {
    fn name(&self) -> &'static str {
        "time_control"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[raw::TIME_CONTROL]
    }

    fn derive(&self, df: &DataFrame) -> Result<Vec<Series>> {
        let values = string_column(df, raw::TIME_CONTROL)?;
        let parsed: Vec<Option<TimeControl>> =
            values.into_iter().map(|v| v.map(parse_time_control)).collect();

        let base: Float64Chunked = parsed.iter().map(|tc| tc.and_then(|tc| tc.base)).collect();
        let increment: Float64Chunked = parsed
            .iter()
            .map(|tc| tc.and_then(|tc| tc.increment))
            .collect();
        let grouped: StringChunked = values
            .into_iter()
            .map(|v| Some(categorize_time_control(v).label()))
            .collect();

        Ok(vec![
            base.with_name(derived::TIME_CONTROL_BASE.into())
                .into_series(),
            increment
                .with_name(derived::TIME_CONTROL_INCREMENT.into())
                .into_series(),
            grouped
                .with_name(derived::TIME_CONTROL_GROUPED.into())
                .into_series(),
        ])
    }
}
