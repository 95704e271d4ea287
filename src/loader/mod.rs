//! Game table loader.
//!
//! Reads a CSV export of chess games into a polars `DataFrame`. Without a
//! sample size the whole file is read. With one, the file is consumed in
//! sequential blocks until enough rows have accumulated, and a uniform,
//! seeded subset is drawn from those rows. Peak memory is bounded by the
//! blocks needed to reach the sample size instead of by the file size.

pub mod blocks;

use self::blocks::{RawBlock, RecordBlocks};

use crate::config::LoaderConfig;
use crate::error::{ChessError, Result};
use crate::models::LoadStats;

use polars::prelude::*;
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Loader for raw game tables
#[derive(Debug, Clone, Default)]
pub struct GameLoader {
    config: LoaderConfig,
}

impl GameLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Load the table, optionally sampled down to `sample_size` rows.
    ///
    /// `Some(0)` is treated like `None` and loads the full file.
    pub fn load(&self, path: &Path, sample_size: Option<usize>) -> Result<DataFrame> {
        self.load_with_stats(path, sample_size).map(|(df, _)| df)
    }

    /// Load the table and report how much of the file was read
    pub fn load_with_stats(
        &self,
        path: &Path,
        sample_size: Option<usize>,
    ) -> Result<(DataFrame, LoadStats)> {
        check_source(path)?;

        let (df, stats) = match sample_size.filter(|&n| n > 0) {
            None => {
                let df = self.read_full(path)?;
                let rows = df.height();
                let stats = LoadStats {
                    path: path.to_path_buf(),
                    blocks_read: 1,
                    rows_read: rows,
                    rows_returned: rows,
                    sampled: false,
                };
                (df, stats)
            }
            Some(n) => self.read_sampled(path, n)?,
        };

        info!(
            "Loaded {} rows from {} ({} rows read in {} blocks{})",
            stats.rows_returned,
            path.display(),
            stats.rows_read,
            stats.blocks_read,
            if stats.sampled { ", sampled" } else { "" }
        );

        Ok((df, stats))
    }

    fn read_full(&self, path: &Path) -> Result<DataFrame> {
        debug!("Reading full table from {}", path.display());

        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.config.infer_schema_length))
            .with_ignore_errors(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .map_err(|e| invalid_format(path, e.to_string()))
    }

    fn read_sampled(&self, path: &Path, sample_size: usize) -> Result<(DataFrame, LoadStats)> {
        let file = File::open(path)?;
        let blocks = RecordBlocks::new(BufReader::new(file), self.config.block_size)?
            .ok_or_else(|| invalid_format(path, "file has no header row"))?;

        // Column types come from the head of the file, as in a full read, so
        // block boundaries never change them
        let head = self.read_head(path)?;
        let schema = head.schema().clone();
        debug!(
            "Sampling {} columns in blocks of {}",
            blocks.header().len(),
            self.config.block_size
        );

        let mut accumulated: Option<DataFrame> = None;
        let mut blocks_read = 0;
        let mut rows_read = 0;

        for block in blocks {
            let frame = self.parse_block(path, block?, &schema)?;
            blocks_read += 1;
            rows_read += frame.height();

            debug!(
                "Read block {} ({} rows, {} accumulated)",
                blocks_read,
                frame.height(),
                rows_read
            );

            match accumulated.as_mut() {
                Some(acc) => {
                    acc.vstack_mut(&frame)?;
                }
                None => accumulated = Some(frame),
            }

            if rows_read >= sample_size {
                break;
            }
        }

        let combined = accumulated.unwrap_or(head);
        let take = sample_size.min(combined.height());
        let sampled = combined.sample_n_literal(take, false, false, Some(self.config.seed))?;

        let stats = LoadStats {
            path: path.to_path_buf(),
            blocks_read,
            rows_read,
            rows_returned: sampled.height(),
            sampled: true,
        };
        Ok((sampled, stats))
    }

    /// The first `infer_schema_length` rows, typed the way a full read types them
    fn read_head(&self, path: &Path) -> Result<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(self.config.infer_schema_length))
            .with_n_rows(Some(self.config.infer_schema_length))
            .with_ignore_errors(true)
            .try_into_reader_with_file_path(Some(path.to_path_buf()))?
            .finish()
            .map_err(|e| invalid_format(path, e.to_string()))
    }

    fn parse_block(&self, path: &Path, block: RawBlock, schema: &SchemaRef) -> Result<DataFrame> {
        CsvReadOptions::default()
            .with_has_header(true)
            .with_schema(Some(schema.clone()))
            .with_ignore_errors(true)
            .into_reader_with_file_handle(Cursor::new(block.bytes))
            .finish()
            .map_err(|e| invalid_format(path, e.to_string()))
    }
}

/// Load a game table with the default loader configuration
pub fn load_games(path: &Path, sample_size: Option<usize>) -> Result<DataFrame> {
    GameLoader::default().load(path, sample_size)
}

fn check_source(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(ChessError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(invalid_format(path, "not a regular file"));
    }
    Ok(())
}

fn invalid_format(path: &Path, reason: impl Into<String>) -> ChessError {
    ChessError::InvalidFormat {
        path: PathBuf::from(path),
        reason: reason.into(),
    }
}
