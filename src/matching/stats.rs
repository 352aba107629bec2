use std::fmt;

use serde::Serialize;

/// Tally of a matching run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchStats {
    /// Accepted match records
    pub matches: usize,
    /// Query units skipped because of data errors
    pub errors: usize,
    /// Query units handed in
    pub rows_total: usize,
    /// Query units that finished, with or without error
    pub rows_processed: usize,
    /// Library entries compared against
    pub library_entries: usize,
    /// True if the run stopped admitting units early
    pub cancelled: bool,
}

impl MatchStats {
    /// Share of query units that finished, 0 for an empty run
    pub fn finished_fraction(&self) -> f64 {
        if self.rows_total == 0 {
            0.0
        } else {
            self.rows_processed as f64 / self.rows_total as f64
        }
    }
}

impl fmt::Display for MatchStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "library matches={} (Errors:{}); rows={}/{}; library entries={}",
            self.matches, self.errors, self.rows_processed, self.rows_total, self.library_entries
        )?;
        if self.cancelled {
            write!(f, " (cancelled)")?;
        }
        Ok(())
    }
}
