//! Core data structures and types for chess game analysis.
//!
//! Defines the categorical values of the derived columns and the
//! statistics objects reported by the loader and preprocessor.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Outcome of a finished game as encoded in the `Result` column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    WhiteWin,
    BlackWin,
    Draw,
    Unknown,
}

impl GameResult {
    /// Decode a raw result string; anything unrecognised is `Unknown`
    pub fn from_raw(raw: Option<&str>) -> Self {
        match raw.map(str::trim) {
            Some("1-0") => GameResult::WhiteWin,
            Some("0-1") => GameResult::BlackWin,
            Some("1/2-1/2") => GameResult::Draw,
            _ => GameResult::Unknown,
        }
    }

    /// The raw encoding, if the result is a recognised outcome
    pub fn as_raw(&self) -> Option<&'static str> {
        match self {
            GameResult::WhiteWin => Some("1-0"),
            GameResult::BlackWin => Some("0-1"),
            GameResult::Draw => Some("1/2-1/2"),
            GameResult::Unknown => None,
        }
    }
}

/// Time-control bucket derived from the base time in seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TimeControlCategory {
    Bullet,
    Blitz,
    Rapid,
    Classical,
    Unknown,
}

impl TimeControlCategory {
    pub const ALL: [TimeControlCategory; 5] = [
        TimeControlCategory::Bullet,
        TimeControlCategory::Blitz,
        TimeControlCategory::Rapid,
        TimeControlCategory::Classical,
        TimeControlCategory::Unknown,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            TimeControlCategory::Bullet => "Bullet (<3min)",
            TimeControlCategory::Blitz => "Blitz (3-10min)",
            TimeControlCategory::Rapid => "Rapid (10-60min)",
            TimeControlCategory::Classical => "Classical (>60min)",
            TimeControlCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for TimeControlCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for TimeControlCategory {
    type Err = String;

    /// Accepts either the full label or the bare bucket name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        TimeControlCategory::ALL
            .into_iter()
            .find(|category| {
                let label = category.label().to_lowercase();
                label == wanted || label.split_whitespace().next() == Some(wanted.as_str())
            })
            .ok_or_else(|| format!("Unknown time control category: {}", s))
    }
}

/// Broad opening family keyed by the first letter of the ECO code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum OpeningCategory {
    FlankOpenings,
    SemiOpenGames,
    OpenGames,
    ClosedGames,
    IndianDefenses,
    /// ECO present but not starting with A-E
    Other,
    /// ECO missing
    Unknown,
}

impl OpeningCategory {
    pub fn label(&self) -> &'static str {
        match self {
            OpeningCategory::FlankOpenings => "Flank Openings",
            OpeningCategory::SemiOpenGames => "Semi-Open Games",
            OpeningCategory::OpenGames => "Open Games",
            OpeningCategory::ClosedGames => "Closed Games",
            OpeningCategory::IndianDefenses => "Indian Defenses",
            OpeningCategory::Other => "Other",
            OpeningCategory::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for OpeningCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Statistics from a single load
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub path: PathBuf,
    pub blocks_read: usize,
    pub rows_read: usize,
    pub rows_returned: usize,
    pub sampled: bool,
}

/// A derivation that did not run because the input lacked columns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedDerivation {
    pub derivation: &'static str,
    pub missing_columns: Vec<&'static str>,
}

/// Statistics from a preprocessing pass
#[derive(Debug, Clone, Default)]
pub struct PreprocessStats {
    pub rows: usize,
    pub applied: Vec<&'static str>,
    pub skipped: Vec<SkippedDerivation>,
}

impl PreprocessStats {
    pub fn was_applied(&self, derivation: &str) -> bool {
        self.applied.iter().any(|name| *name == derivation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_game_result_decoding() {
        assert_eq!(GameResult::from_raw(Some("1-0")), GameResult::WhiteWin);
        assert_eq!(GameResult::from_raw(Some("0-1")), GameResult::BlackWin);
        assert_eq!(GameResult::from_raw(Some("1/2-1/2")), GameResult::Draw);
        assert_eq!(GameResult::from_raw(Some("*")), GameResult::Unknown);
        assert_eq!(GameResult::from_raw(None), GameResult::Unknown);
        assert_eq!(GameResult::Draw.as_raw(), Some("1/2-1/2"));
        assert_eq!(GameResult::Unknown.as_raw(), None);
    }

    #[test]
    fn test_time_control_category_from_label() {
        assert_eq!(
            "Blitz (3-10min)".parse::<TimeControlCategory>(),
            Ok(TimeControlCategory::Blitz)
        );
        assert_eq!(
            "bullet".parse::<TimeControlCategory>(),
            Ok(TimeControlCategory::Bullet)
        );
        assert_eq!(
            "CLASSICAL".parse::<TimeControlCategory>(),
            Ok(TimeControlCategory::Classical)
        );
        assert!("hyperbullet".parse::<TimeControlCategory>().is_err());
    }

    #[test]
    fn test_category_labels_are_distinct() {
        let mut labels: Vec<_> = TimeControlCategory::ALL.iter().map(|c| c.label()).collect();
        labels.sort();
        labels.dedup();
        assert_eq!(labels.len(), 5);
        assert_eq!(OpeningCategory::IndianDefenses.to_string(), "Indian Defenses");
    }
}
