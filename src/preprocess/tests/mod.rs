//! Pipeline tests for the preprocessor
//!
//! Exercises the full derivation set over small in-memory game tables.


use polars::prelude::*;

/// Four games covering a clean row, missing ratings, malformed fields
/// and an unknown result
pub fn sample_games() -> DataFrame {
    df!(
        "WhiteElo" => [Some(1500i64), None, Some(2100), Some(1200)],
        "BlackElo" => [Some(1520i64), Some(1800), Some(1900), Some(1250)],
        "Result" => [Some("1/2-1/2"), Some("1-0"), Some("0-1"), Some("*")],
        "TimeControl" => [Some("300+3"), Some("-"), Some("60+0"), None],
        "UTCDate" => [Some("2016.07.01"), Some("2016.07.02"), Some("bad"), Some("2016.07.03")],
        "UTCTime" => [Some("12:30:00"), Some("99:00:00"), Some("08:00:00"), Some("23:15:00")],
        "ECO" => [Some("C50"), Some("b12"), Some("Z99"), None],
        "AN" => [Some("1. e4 e5 2. Nf3 Nc6"), None, Some("1. d4 1... d5"), Some("")],
        "Opening" => [Some("Italian Game"), Some("Caro-Kann Defense"), None, Some("Van't Kruijs Opening")],
        "Termination" => [Some("Normal"), Some("Time forfeit"), Some("Normal"), Some("Abandoned")]
    )
    .unwrap()
}
