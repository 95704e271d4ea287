//! Command-line interface components.

use crate::analysis::{BinRate, GameFilter, OutcomeShares, Summary};
use crate::cache::LoadCache;
use crate::config::{InsightsConfig, LoaderConfig, ReportConfig};
use crate::constants::DEFAULT_TOP_OPENINGS;
use crate::loader::GameLoader;
use crate::models::TimeControlCategory;
use crate::preprocess::Preprocessor;

use anyhow::{Context, Result};
use clap::Parser;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, info};

#[derive(Parser, Debug)]
#[command(name = "chess-insights")]
#[command(about = "Load, preprocess and summarise a CSV export of chess games")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Args {
    /// Path to the games CSV file
    #[arg(value_name = "CSV")]
    pub csv_path: PathBuf,

    /// Load a uniform random sample of this many games (0 loads everything)
    #[arg(long)]
    pub sample_size: Option<usize>,

    /// Rows per block read while sampling
    #[arg(long, default_value_t = LoaderConfig::default().block_size)]
    pub block_size: usize,

    /// Seed for the random sample
    #[arg(long, default_value_t = LoaderConfig::default().seed)]
    pub seed: u64,

    /// Keep only one time-control bucket (bullet, blitz, rapid, classical, unknown)
    #[arg(long, value_name = "LABEL")]
    pub time_control: Option<TimeControlCategory>,

    /// Lowest average rating to keep
    #[arg(long)]
    pub min_elo: Option<f64>,

    /// Highest average rating to keep
    #[arg(long)]
    pub max_elo: Option<f64>,

    /// Number of openings to list
    #[arg(long, default_value_t = DEFAULT_TOP_OPENINGS)]
    pub top: usize,

    /// Enable verbose logging (-v: info, -vv: debug, -vvv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only show errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    pub fn to_config(&self) -> InsightsConfig {
        InsightsConfig {
            loader: LoaderConfig {
                block_size: self.block_size,
                seed: self.seed,
                ..Default::default()
            },
            report: ReportConfig {
                top_openings: self.top,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Row filter from the selection flags; one missing rating bound is left open
    pub fn filter(&self) -> GameFilter {
        let avg_elo = match (self.min_elo, self.max_elo) {
            (None, None) => None,
            (min, max) => Some((
                min.unwrap_or(f64::NEG_INFINITY),
                max.unwrap_or(f64::INFINITY),
            )),
        };
        GameFilter {
            time_control: self.time_control,
            avg_elo,
        }
    }
}

pub fn setup_logging(args: &Args) {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("chess_insights={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .init();

    debug!("Logging initialized at level: {}", log_level);
}

/// Load, preprocess, filter and report
pub fn run(args: &Args) -> Result<()> {
    let config = args.to_config();
    config.validate().context("Invalid command-line settings")?;

    let start_time = Instant::now();
    let progress = (!args.quiet).then(|| {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} [{elapsed_precise}] {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message(format!("Loading {}...", args.csv_path.display()));
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    });

    let cache = LoadCache::with_ttl(config.cache.ttl());
    let loader = GameLoader::new(config.loader.clone());
    let loaded = cache.get_or_try_insert(&args.csv_path, args.sample_size, |path, sample| {
        loader.load(path, sample)
    });

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }
    let raw = loaded.with_context(|| format!("Failed to load {}", args.csv_path.display()))?;
    if raw.height() == 0 {
        anyhow::bail!("No games found in {}", args.csv_path.display());
    }

    let (games, stats) = Preprocessor::new()
        .run(&raw)
        .context("Failed to preprocess game table")?;
    for skipped in &stats.skipped {
        info!(
            "{} columns not derived (missing {})",
            skipped.derivation,
            skipped.missing_columns.join(", ")
        );
    }

    let filter = args.filter();
    let games = filter.apply(&games).context("Failed to filter game table")?;
    let summary = Summary::from_table(&games, &config.report)
        .context("Failed to summarise game table")?;

    print_report(&summary, start_time.elapsed());
    Ok(())
}

fn pct(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.1}%", v))
}

fn print_counts(title: &str, counts: Option<&Vec<(String, usize)>>) {
    let Some(counts) = counts.filter(|counts| !counts.is_empty()) else {
        return;
    };
    println!("\n{}", title.bright_green().bold());
    for (value, count) in counts {
        println!(
            "  {:<40} {}",
            value.bright_cyan(),
            count.to_string().bright_white()
        );
    }
}

fn print_shares(title: &str, shares: Option<&BTreeMap<String, OutcomeShares>>) {
    let Some(shares) = shares.filter(|shares| !shares.is_empty()) else {
        return;
    };
    println!("\n{}", title.bright_green().bold());
    for (category, share) in shares {
        println!(
            "  {:<22} {:>7} games  white {:>5.1}%  black {:>5.1}%  draw {:>5.1}%",
            category.bright_cyan(),
            share.games.to_string().bright_white(),
            share.white_win_pct(),
            share.black_win_pct(),
            share.draw_pct()
        );
    }
}

fn print_rates(title: &str, rates: Option<&Vec<BinRate>>) {
    let Some(rates) = rates else { return };
    println!("\n{}", title.bright_green().bold());
    for rate in rates {
        println!(
            "  {:<12} {:>7} games  {}",
            rate.label.bright_cyan(),
            rate.games.to_string().bright_white(),
            pct(rate.rate_pct())
        );
    }
}

fn print_report(summary: &Summary, elapsed: Duration) {
    println!("\n{}", "Game Summary".bright_green().bold());
    println!(
        "  {} {}",
        "Total games:".bright_cyan(),
        summary.total_games.to_string().bright_white().bold()
    );
    if let Some(metrics) = &summary.metrics {
        println!(
            "  {} {}",
            "White wins:".bright_cyan(),
            pct(metrics.white_win_pct()).bright_white()
        );
        println!(
            "  {} {}",
            "Black wins:".bright_cyan(),
            pct(metrics.black_win_pct()).bright_white()
        );
        println!(
            "  {} {}",
            "Draws:".bright_cyan(),
            pct(metrics.draw_pct()).bright_white()
        );
    }
    if let Some((low, high)) = summary.rating_bounds {
        println!(
            "  {} {:.0} - {:.0}",
            "Rating range:".bright_cyan(),
            low,
            high
        );
    }

    print_counts("Time Controls", summary.time_controls.as_ref());
    print_shares(
        "Results by Time Control",
        summary.outcomes_by_time_control.as_ref(),
    );
    print_counts("Top Openings", summary.openings.as_ref());
    print_counts("Opening Families", summary.opening_categories.as_ref());
    print_shares(
        "Results by Opening Family",
        summary.outcomes_by_opening.as_ref(),
    );
    print_counts("Terminations", summary.terminations.as_ref());
    print_rates(
        "Higher-Rated Win Rate by Rating Gap",
        summary.higher_rated_wins.as_ref(),
    );
    print_rates("Draw Rate by Average Rating", summary.draw_rates.as_ref());

    if let Some(weekdays) = &summary.weekdays {
        println!("\n{}", "Games by Weekday".bright_green().bold());
        for (day, count) in weekdays {
            println!("  {:<10} {}", day.bright_cyan(), count.to_string().bright_white());
        }
    }

    let busiest_hour = summary.hours.as_ref().and_then(|hours| {
        hours
            .iter()
            .enumerate()
            .max_by_key(|&(hour, count)| (*count, std::cmp::Reverse(hour)))
            .filter(|(_, count)| **count > 0)
    });
    if let Some((busiest, count)) = busiest_hour {
        println!(
            "\n  {} {:02}:00 UTC ({} games)",
            "Busiest hour:".bright_cyan(),
            busiest,
            count.to_string().bright_white()
        );
    }

    println!(
        "\n  {} {}ms",
        "Time elapsed:".bright_cyan(),
        elapsed.as_millis().to_string().bright_white()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        Args::try_parse_from(std::iter::once("chess-insights").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let args = parse(&["games.csv"]);

        assert_eq!(args.csv_path, PathBuf::from("games.csv"));
        assert_eq!(args.sample_size, None);
        assert_eq!(args.get_log_level(), "warn");
        assert!(args.filter().is_empty());
        assert_eq!(args.to_config(), InsightsConfig::default());
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(parse(&["games.csv", "-v"]).get_log_level(), "info");
        assert_eq!(parse(&["games.csv", "-vv"]).get_log_level(), "debug");
        assert_eq!(parse(&["games.csv", "-q"]).get_log_level(), "error");
        assert!(
            Args::try_parse_from(["chess-insights", "games.csv", "-q", "-v"]).is_err()
        );
    }

    #[test]
    fn test_filter_flags() {
        let args = parse(&["games.csv", "--time-control", "blitz", "--min-elo", "1500"]);
        let filter = args.filter();

        assert_eq!(filter.time_control, Some(TimeControlCategory::Blitz));
        assert_eq!(filter.avg_elo, Some((1500.0, f64::INFINITY)));
        assert!(Args::try_parse_from(["chess-insights", "games.csv", "--time-control", "hyper"]).is_err());
    }

    #[test]
    fn test_header_only_file_is_rejected() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("games.csv");
        std::fs::write(&path, "WhiteElo,BlackElo,Result\n").unwrap();
        let path = path.to_string_lossy().into_owned();

        let error = run(&parse(&[path.as_str(), "-q"])).unwrap_err();
        assert!(error.to_string().starts_with("No games found in"));

        let error = run(&parse(&[path.as_str(), "-q", "--sample-size", "10"])).unwrap_err();
        assert!(error.to_string().starts_with("No games found in"));
    }

    #[test]
    fn test_missing_file_fails_the_run() {
        let temp_dir = tempfile::TempDir::new().unwrap();
        let path = temp_dir.path().join("nonexistent.csv");
        let path = path.to_string_lossy().into_owned();

        let error = run(&parse(&[path.as_str(), "-q"])).unwrap_err();
        assert!(format!("{:#}", error).contains("Game file not found"));
    }

    #[test]
    fn test_loader_flags_reach_config() {
        let args = parse(&[
            "games.csv",
            "--sample-size",
            "500",
            "--block-size",
            "50",
            "--seed",
            "7",
            "--top",
            "3",
        ]);
        let config = args.to_config();

        assert_eq!(args.sample_size, Some(500));
        assert_eq!(config.loader.block_size, 50);
        assert_eq!(config.loader.seed, 7);
        assert_eq!(config.report.top_openings, 3);
    }
}
