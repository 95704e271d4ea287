//! Application constants for the chess insights pipeline
//!
//! Column names of the raw export and of the derived fields, loader
//! defaults, and the bucket thresholds used by the derivations.

// =============================================================================
// Raw Columns
// =============================================================================

/// Raw column names as they appear in the Lichess-style CSV export
pub mod raw {
    pub const WHITE_ELO: &str = "WhiteElo";
    pub const BLACK_ELO: &str = "BlackElo";
    pub const RESULT: &str = "Result";
    pub const TIME_CONTROL: &str = "TimeControl";
    pub const UTC_DATE: &str = "UTCDate";
    pub const UTC_TIME: &str = "UTCTime";
    pub const ECO: &str = "ECO";
    pub const MOVES: &str = "AN";
    pub const OPENING: &str = "Opening";
    pub const TERMINATION: &str = "Termination";

    /// Columns needed for every derivation to run
    pub const ALL: &[&str] = &[
        WHITE_ELO,
        BLACK_ELO,
        RESULT,
        TIME_CONTROL,
        UTC_DATE,
        UTC_TIME,
        ECO,
        MOVES,
        OPENING,
        TERMINATION,
    ];
}

// =============================================================================
// Derived Columns
// =============================================================================

/// Column names produced by the preprocessor
pub mod derived {
    pub const DATE_TIME: &str = "DateTime";
    pub const DATE: &str = "Date";
    pub const HOUR: &str = "Hour";
    pub const DAY_OF_WEEK: &str = "DayOfWeek";
    pub const TIME_CONTROL_BASE: &str = "TimeControlBase";
    pub const TIME_CONTROL_INCREMENT: &str = "TimeControlIncrement";
    pub const TIME_CONTROL_GROUPED: &str = "TimeControlGrouped";
    pub const AVG_ELO: &str = "AvgElo";
    pub const ELO_DIFF: &str = "EloDiff";
    pub const WHITE_WINS: &str = "WhiteWins";
    pub const BLACK_WINS: &str = "BlackWins";
    pub const DRAW: &str = "Draw";
    pub const MOVE_COUNT: &str = "MoveCount";
    pub const ESTIMATED_DURATION_MINUTES: &str = "EstimatedDurationMinutes";
    pub const OPENING_CATEGORY: &str = "OpeningCategory";
}

// =============================================================================
// Loader Defaults
// =============================================================================

/// Rows per sequential block when sampling a large file
pub const DEFAULT_BLOCK_SIZE: usize = 100_000;

/// Fixed seed so repeated sampled loads return the same rows
pub const DEFAULT_SAMPLE_SEED: u64 = 42;

/// Rows scanned for column type inference
pub const DEFAULT_INFER_SCHEMA_LENGTH: usize = 10_000;

// =============================================================================
// Parsing Formats
// =============================================================================

/// Format of the combined `UTCDate UTCTime` string
pub const DATE_TIME_FORMAT: &str = "%Y.%m.%d %H:%M:%S";

/// Format of `UTCDate` on its own
pub const DATE_FORMAT: &str = "%Y.%m.%d";

// =============================================================================
// Time Control Thresholds
// =============================================================================

/// Upper bounds (exclusive) of the base-time buckets, in seconds
pub mod time_control {
    pub const BULLET_BELOW_SECONDS: f64 = 180.0;
    pub const BLITZ_BELOW_SECONDS: f64 = 600.0;
    pub const RAPID_BELOW_SECONDS: f64 = 3600.0;
}

/// Minutes attributed to each move marker by the duration estimate
pub const MINUTES_PER_MOVE_MARKER: u32 = 2;

// =============================================================================
// Report Defaults
// =============================================================================

pub const DEFAULT_TOP_OPENINGS: usize = 15;
pub const DEFAULT_TOP_TERMINATIONS: usize = 10;

/// Day names in display order
pub const WEEKDAY_ORDER: &[&str] = &[
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
    "Sunday",
];
