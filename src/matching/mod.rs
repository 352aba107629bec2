//! # Spectral Match Engine
//!
//! Compares query spectra with reference libraries and produces ranked
//! [`MatchRecord`]s.
//!
//! A query is either a single [`Scan`] or a [`FeatureRow`] that owns
//! candidate scans. Every query/entry pair runs through the same filters:
//!
//! 1. retention time (when configured and both sides are known)
//! 2. precursor m/z, at MS level > 1 only
//! 3. relative CCS deviation (missing values pass)
//! 4. optional crop to the shared m/z span
//! 5. optional removal of precursor signals
//! 6. the configured [`SimilarityFunction`](crate::similarity::SimilarityFunction)
//! 7. optional isotope corroboration
//!
//! In row mode only the best record per library entry across a row's
//! candidate scans is kept. Rows are processed in parallel; the shared state
//! is limited to atomic counters.
//!
//! ## Example
//!
//! ```
//! use mzmatch::library::{LibraryEntryBuilder, SpectralLibrary};
//! use mzmatch::matching::{CancellationToken, FeatureRow, MatchConfig, Scan, SpectralMatcher};
//! use mzmatch::spectrum::SpectrumBuilder;
//!
//! let library = SpectralLibrary::with_entries(
//!     "demo",
//!     vec![LibraryEntryBuilder::new()
//!         .name("compound")
//!         .precursor_mz(300.1)
//!         .add_point(120.0, 50.0)
//!         .add_point(150.0, 100.0)
//!         .build()],
//! );
//! let config = MatchConfig {
//!     min_match: 2,
//!     ..Default::default()
//! };
//! let matcher = SpectralMatcher::new(config, &[library])?;
//!
//! let spectrum = SpectrumBuilder::new()
//!     .ms_level(2)
//!     .precursor(300.1, Some(1))
//!     .add_point(120.0, 40.0)
//!     .add_point(150.0, 90.0)
//!     .build();
//! let row = FeatureRow::new(1, 300.1).add_fragment_scan(Scan::centroided(7, spectrum));
//!
//! let result = matcher.match_rows(&[row], &CancellationToken::new())?;
//! assert_eq!(result.rows[0].records.len(), 1);
//! # Ok::<(), mzmatch::matching::ConfigError>(())
//! ```

mod batch;
mod config;
mod engine;
mod error;
mod query;
mod record;
mod stats;


use std::sync::Arc;

use crate::library::LibraryEntry;

pub use batch::{CancellationToken, RowBatchResult, RowMatches, ScanMatches};
pub use config::{IsotopePatternConfig, MatchConfig};
pub use engine::SpectralMatcher;
pub use error::{ConfigError, MatchError, QueryError};
pub use query::{FeatureRow, Query, QueryIdentity, Scan};
pub use record::{sort_by_score, MatchRecord};
pub use stats::MatchStats;

/// Match one query against library entries.
///
/// Unlike the batch methods of [`SpectralMatcher`], a data problem with the
/// query is returned as [`MatchError::Query`]. An empty list means the query
/// was matched and nothing passed.
pub fn match_query_to_library(
    query: Query<'_>,
    entries: &[Arc<LibraryEntry>],
    config: &MatchConfig,
) -> Result<Vec<MatchRecord>, MatchError> {
    let matcher = SpectralMatcher::from_entries(config.clone(), entries.to_vec())?;
    let records = match query {
        Query::Scan(scan) => {
            matcher.validate_for_scan(scan)?;
            matcher.try_match_scan(scan)?
        }
        Query::Row(row) => {
            config.validate_for_ms_level(config.ms_level)?;
            matcher.match_row(row)?
        }
    };
    Ok(records)
}
