//! End-to-end tests over CSV files written to a temporary directory
//!
//! These cover the path a caller takes: load the file (full or sampled),
//! preprocess it, then filter and aggregate the augmented table.

use chess_insights::analysis::{Summary, games_by_weekday, value_counts};
use chess_insights::config::{LoaderConfig, ReportConfig};
use chess_insights::{
    ChessError, GameFilter, GameLoader, LoadCache, TimeControlCategory, load_games, preprocess,
    preprocess_with_stats,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const HEADER: &str =
    "Event,WhiteElo,BlackElo,Result,UTCDate,UTCTime,TimeControl,ECO,Opening,Termination,AN";

/// Write `rows` synthetic games cycling through a few realistic shapes
fn write_games(dir: &Path, rows: usize) -> PathBuf {
    let shapes = [
        r#"Rated Blitz game,1500,1520,1/2-1/2,2016.06.30,22:00:01,300+0,C20,King's Pawn Game,Normal,"1. e4 e5 2. Nf3 Nc6 3. Bb5 a6""#,
        "Rated Bullet game,1800,1650,1-0,2016.07.01,08:15:00,60+0,B01,Scandinavian Defense,Time forfeit,1. e4 d5",
        "Rated Classical game,2100,2050,0-1,2016.07.02,13:30:00,3600+30,E60,King's Indian Defense,Normal,1. d4 Nf6 2. c4 g6",
        "Rated Rapid game,1200,,1-0,2016.07.03,19:45:10,-,A00,Polish Opening,Abandoned,",
    ];

    let mut content = String::from(HEADER);
    content.push('\n');
    for i in 0..rows {
        content.push_str(shapes[i % shapes.len()]);
        content.push('\n');
    }

    let path = dir.join("games.csv");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_full_load_and_preprocess() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_games(temp_dir.path(), 8);

    let raw = load_games(&path, None).unwrap();
    assert_eq!(raw.height(), 8);
    assert_eq!(raw.width(), 11);

    let (games, stats) = preprocess_with_stats(&raw).unwrap();
    assert_eq!(games.height(), 8);
    assert!(stats.skipped.is_empty());
    assert!(games.width() > raw.width());

    let grouped = games.column("TimeControlGrouped").unwrap();
    let grouped = grouped.str().unwrap();
    assert_eq!(grouped.get(0), Some("Blitz (3-10min)"));
    assert_eq!(grouped.get(1), Some("Bullet (<3min)"));
    assert_eq!(grouped.get(2), Some("Classical (>60min)"));
    assert_eq!(grouped.get(3), Some("Unknown"));

    let draws = games.column("Draw").unwrap();
    assert_eq!(draws.bool().unwrap().get(0), Some(true));

    // A missing rating leaves both aggregates null
    let avg = games.column("AvgElo").unwrap();
    assert_eq!(avg.f64().unwrap().get(0), Some(1510.0));
    assert_eq!(avg.f64().unwrap().get(3), None);

    let moves = games.column("MoveCount").unwrap();
    assert_eq!(moves.u32().unwrap().get(0), Some(3));
}

#[test]
fn test_sampled_load_is_reproducible() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_games(temp_dir.path(), 200);

    let loader = GameLoader::new(LoaderConfig {
        block_size: 30,
        ..Default::default()
    });

    let (first, stats) = loader.load_with_stats(&path, Some(50)).unwrap();
    let second = loader.load(&path, Some(50)).unwrap();

    assert_eq!(first.height(), 50);
    assert!(stats.sampled);
    assert_eq!(stats.blocks_read, 2);
    assert_eq!(stats.rows_read, 60);
    assert!(first.equals_missing(&second));
}

#[test]
fn test_sample_larger_than_file_returns_every_row() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_games(temp_dir.path(), 12);

    let sampled = load_games(&path, Some(1_000)).unwrap();
    assert_eq!(sampled.height(), 12);
}

#[test]
fn test_missing_file_is_a_load_failure() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nonexistent.csv");

    let error = load_games(&path, None).unwrap_err();
    assert!(matches!(error, ChessError::FileNotFound { .. }));
    assert!(error.is_load_failure());
}

#[test]
fn test_cached_load_then_filter_and_summarise() {
    let temp_dir = TempDir::new().unwrap();
    let path = write_games(temp_dir.path(), 40);
    let cache = LoadCache::default();
    let loader = GameLoader::default();

    let raw = cache
        .get_or_try_insert(&path, None, |p, n| loader.load(p, n))
        .unwrap();
    let again = cache
        .get_or_try_insert(&path, None, |_, _| panic!("expected a cached table"))
        .unwrap();
    assert_eq!(raw.height(), again.height());

    let games = preprocess(&raw).unwrap();
    let blitz = GameFilter {
        time_control: Some(TimeControlCategory::Blitz),
        ..Default::default()
    }
    .apply(&games)
    .unwrap();
    assert_eq!(blitz.height(), 10);

    let summary = Summary::from_table(&games, &ReportConfig::default()).unwrap();
    let metrics = summary.metrics.unwrap();
    assert_eq!(metrics.total_games, 40);
    assert_eq!(metrics.draws, 10);
    assert_eq!(summary.terminations.unwrap()[0], ("Normal".to_string(), 20));

    let families = value_counts(&games, "OpeningCategory", usize::MAX).unwrap();
    assert_eq!(families.len(), 4);

    // 2016-06-30 is a Thursday; 2016-07-03 is a Sunday
    let weekdays = games_by_weekday(&games).unwrap();
    assert_eq!(weekdays[3], ("Thursday", 10));
    assert_eq!(weekdays[6], ("Sunday", 10));
}
