//! Date and time derivations from `UTCDate` and `UTCTime`.
//!
//! The combined instant and the date-only value are parsed separately.
//! A malformed time nulls `DateTime` and `Hour` but leaves `Date` and
//! `DayOfWeek` intact.

use super::{Derivation, string_column};
use crate::constants::{DATE_FORMAT, DATE_TIME_FORMAT, derived, raw};
use crate::error::Result;

use chrono::{Datelike, NaiveDate, NaiveDateTime, Timelike, Weekday};
use polars::prelude::*;

pub fn parse_date_time(date: Option<&str>, time: Option<&str>) -> Option<NaiveDateTime> {
    let combined = format!("{} {}", date?, time?);
    NaiveDateTime::parse_from_str(&combined, DATE_TIME_FORMAT).ok()
}

pub fn parse_date(date: Option<&str>) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date?, DATE_FORMAT).ok()
}

pub fn hour_of(instant: Option<NaiveDateTime>) -> Option<i32> {
    instant.map(|dt| dt.hour() as i32)
}

pub fn weekday_name(date: NaiveDate) -> &'static str {
    match date.weekday() {
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
        Weekday::Sun => "Sunday",
    }
}

/// Adds `DateTime` and `Hour`
#[derive(Debug, Clone, Copy, Default)]
pub struct TimestampDerivation;

impl Derivation for TimestampDerivation {
    fn name(&self) -> &'static str {
        "timestamp"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[raw::UTC_DATE, raw::UTC_TIME]
    }

    fn derive(&self, df: &DataFrame) -> Result<Vec<Series>> {
        let dates = string_column(df, raw::UTC_DATE)?;
        let times = string_column(df, raw::UTC_TIME)?;

        let instants: Vec<Option<NaiveDateTime>> = dates
            .into_iter()
            .zip(times.into_iter())
            .map(|(date, time)| parse_date_time(date, time))
            .collect();

        let hours: Int32Chunked = instants.iter().map(|dt| hour_of(*dt)).collect();
        let date_times = DatetimeChunked::from_naive_datetime_options(
            derived::DATE_TIME.into(),
            instants,
            TimeUnit::Milliseconds,
        );

        Ok(vec![
            date_times.into_series(),
            hours.with_name(derived::HOUR.into()).into_series(),
        ])
    }
}

/// Adds `Date` and `DayOfWeek`
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarDerivation;

impl Derivation for CalendarDerivation {
    fn name(&self) -> &'static str {
        "calendar"
    }

    fn required_columns(&self) -> &'static [&'static str] {
        &[raw::UTC_DATE]
    }

    fn derive(&self, df: &DataFrame) -> Result<Vec<Series>> {
        let raw_dates = string_column(df, raw::UTC_DATE)?;
        let dates: Vec<Option<NaiveDate>> = raw_dates.into_iter().map(parse_date).collect();

        let day_names: StringChunked = dates
            .iter()
            .map(|date| date.map(weekday_name))
            .collect();
        let dates = DateChunked::from_naive_date_options(derived::DATE.into(), dates);

        Ok(vec![
            dates.into_series(),
            day_names.with_name(derived::DAY_OF_WEEK.into()).into_series(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_combined_instant() {
        let dt = parse_date_time(Some("2016.07.01"), Some("12:30:00")).unwrap();
        assert_eq!(dt.hour(), 12);
        assert_eq!(dt.minute(), 30);
        assert_eq!(dt.date(), NaiveDate::from_ymd_opt(2016, 7, 1).unwrap());
    }

    #[test]
    fn test_malformed_time_keeps_date() {
        assert_eq!(parse_date_time(Some("2016.07.01"), Some("25:99:00")), None);
        assert_eq!(parse_date_time(Some("2016.07.01"), None), None);
        assert_eq!(
            parse_date(Some("2016.07.01")),
            NaiveDate::from_ymd_opt(2016, 7, 1)
        );
    }

    #[test]
    fn test_malformed_dates() {
        assert_eq!(parse_date(Some("2016-07-01")), None);
        assert_eq!(parse_date(Some("????.??.??")), None);
        assert_eq!(parse_date(None), None);
        assert_eq!(parse_date_time(Some("2016-07-01"), Some("12:30:00")), None);
    }

    #[test]
    fn test_weekday_names() {
        let friday = NaiveDate::from_ymd_opt(2016, 7, 1).unwrap();
        assert_eq!(weekday_name(friday), "Friday");
        let sunday = NaiveDate::from_ymd_opt(2016, 7, 3).unwrap();
        assert_eq!(weekday_name(sunday), "Sunday");
    }

    #[test]
    fn test_hour_is_null_without_instant() {
        assert_eq!(hour_of(None), None);
    }

    #[test]
    fn test_timestamp_and_calendar_disagree_on_bad_time() {
        let df = df!(
            "UTCDate" => [Some("2016.07.01"), Some("2016.07.02"), None],
            "UTCTime" => [Some("23:59:59"), Some("garbage"), Some("10:00:00")]
        )
        .unwrap();

        let timestamp = TimestampDerivation.derive(&df).unwrap();
        assert_eq!(timestamp[0].name().as_str(), "DateTime");
        assert_eq!(timestamp[0].null_count(), 2);
        let hours = timestamp[1].i32().unwrap();
        assert_eq!(hours.get(0), Some(23));
        assert_eq!(hours.get(1), None);
        assert_eq!(hours.get(2), None);

        let calendar = CalendarDerivation.derive(&df).unwrap();
        assert_eq!(calendar[0].name().as_str(), "Date");
        assert_eq!(calendar[0].null_count(), 1);
        let days = calendar[1].str().unwrap();
        assert_eq!(days.get(0), Some("Friday"));
        assert_eq!(days.get(1), Some("Saturday"));
        assert_eq!(days.get(2), None);
    }
}
