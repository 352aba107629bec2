use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

use super::engine::SpectralMatcher;
use super::error::{ConfigError, QueryError};
use super::query::{FeatureRow, Scan};
use super::record::MatchRecord;
use super::stats::MatchStats;

fn log_query_error(error: &QueryError) {
    match error {
        QueryError::NoCandidateScans { .. } => debug!("{}", error),
        _ => warn!("{}", error),
    }
}

/// Shared flag that stops a batch from admitting further rows
#[derive(Debug, Clone, Default)]
pub struct CancellationToken(Arc<AtomicBool>);

impl CancellationToken {
    /// A token that is not cancelled
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// True once [`cancel`](Self::cancel) was called on any clone
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Matches of one scan
#[derive(Debug, Clone, Serialize)]
pub struct ScanMatches {
    /// Matched scan
    pub scan_number: u32,
    /// Accepted records, best first
    pub records: Vec<MatchRecord>,
    /// Tally of the run
    pub stats: MatchStats,
}

/// Matches of one feature-list row
#[derive(Debug, Clone, Serialize)]
pub struct RowMatches {
    /// Matched row
    pub row_id: u32,
    /// Best record per library entry, best first
    pub records: Vec<MatchRecord>,
}

/// Outcome of a row batch
#[derive(Debug, Clone, Serialize)]
pub struct RowBatchResult {
    /// Rows that finished without error, in input order
    pub rows: Vec<RowMatches>,
    /// Tally of the run
    pub stats: MatchStats,
}

impl SpectralMatcher {
    /// Compare one scan with every library entry.
    ///
    /// A data problem with the scan is counted in the stats and logged; it
    /// only fails for settings that are invalid at the scan's MS level.
    pub fn match_scan(&self, scan: &Scan) -> Result<ScanMatches, ConfigError> {
        self.validate_for_scan(scan)?;
        info!(
            "Comparing {} library spectra of {} to scan #{}",
            self.entries.len(),
            self.library_names,
            scan.scan_number
        );

        let mut stats = MatchStats {
            rows_total: 1,
            rows_processed: 1,
            library_entries: self.entries.len(),
            ..Default::default()
        };
        let records = match self.try_match_scan(scan) {
            Ok(records) => records,
            Err(e) => {
                log_query_error(&e);
                stats.errors = 1;
                Vec::new()
            }
        };
        stats.matches = records.len();

        info!("{} for scan #{}", stats, scan.scan_number);
        Ok(ScanMatches {
            scan_number: scan.scan_number,
            records,
            stats,
        })
    }

    /// Match feature-list rows, in parallel with the `parallel` feature.
    ///
    /// Rows with data problems are skipped and counted. Cancellation is
    /// checked before each row; rows already running finish.
    pub fn match_rows(&self, rows: &[FeatureRow], cancel: &CancellationToken) -> Result<RowBatchResult, ConfigError> {
        self.config.validate_for_ms_level(self.config.ms_level)?;
        info!(
            "Comparing {} library spectra of {} to {} feature list rows",
            self.entries.len(),
            self.library_names,
            rows.len()
        );

        let matches = AtomicUsize::new(0);
        let errors = AtomicUsize::new(0);
        let finished = AtomicUsize::new(0);

        let process = |row: &FeatureRow| -> Option<RowMatches> {
            if cancel.is_cancelled() {
                return None;
            }
            let result = match self.match_row(row) {
                Ok(records) => {
                    matches.fetch_add(records.len(), Ordering::Relaxed);
                    Some(RowMatches {
                        row_id: row.id,
                        records,
                    })
                }
                Err(e) => {
                    log_query_error(&e);
                    errors.fetch_add(1, Ordering::Relaxed);
                    None
                }
            };
            finished.fetch_add(1, Ordering::Relaxed);
            result
        };

        #[cfg(feature = "parallel")]
        let results: Vec<RowMatches> = rows.par_iter().filter_map(process).collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<RowMatches> = rows.iter().filter_map(process).collect();

        let rows_processed = finished.load(Ordering::Relaxed);
        let stats = MatchStats {
            matches: matches.load(Ordering::Relaxed),
            errors: errors.load(Ordering::Relaxed),
            rows_total: rows.len(),
            rows_processed,
            library_entries: self.entries.len(),
            cancelled: rows_processed < rows.len(),
        };
        info!("{}", stats);

        Ok(RowBatchResult { rows: results, stats })
    }
}
