//! # mzmatch - Spectral Consensus Merging and Library Matching
//!
//! `mzmatch` turns raw mass spectrometry scans into annotated library hits.
//! It covers two stages of a metabolomics / lipidomics workflow:
//!
//! - **Peak consensus merging** ([`merging`]): collapses many source spectra,
//!   such as the mobility sub-scans of a PASEF precursor, into one
//!   deduplicated signal list. A consensus cluster never holds two signals
//!   of the same source spectrum.
//!
//! - **Spectral library matching** ([`matching`]): compares query scans or
//!   feature-list rows with reference libraries. Retention time, precursor
//!   m/z, CCS and isotope filters run in front of a configurable similarity
//!   function. Feature-list rows are matched in parallel.
//!
//! ## Quick Start - Merging
//!
//! ```rust
//! use mzmatch::merging::{merge_spectra, CenterFunction, MergingType};
//! use mzmatch::spectrum::SpectrumBuilder;
//! use mzmatch::tolerance::MzTolerance;
//!
//! let sources = vec![
//!     SpectrumBuilder::new().add_point(100.000, 50.0).add_point(200.0, 10.0).build(),
//!     SpectrumBuilder::new().add_point(100.002, 30.0).build(),
//! ];
//! let merged = merge_spectra(
//!     &sources,
//!     0.0,
//!     &MzTolerance::absolute(0.005)?,
//!     MergingType::Summed,
//!     &CenterFunction::default(),
//! )?;
//!
//! assert_eq!(merged.len(), 2);
//! assert_eq!(merged.points[0].intensity, 80.0);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Quick Start - Library Matching
//!
//! ```rust
//! use std::sync::Arc;
//!
//! use mzmatch::library::LibraryEntryBuilder;
//! use mzmatch::matching::{match_query_to_library, MatchConfig, Query, Scan};
//! use mzmatch::spectrum::SpectrumBuilder;
//!
//! let entry = LibraryEntryBuilder::new()
//!     .name("caffeine")
//!     .precursor_mz(195.0877)
//!     .add_point(110.0713, 20.0)
//!     .add_point(138.0662, 100.0)
//!     .build();
//!
//! let spectrum = SpectrumBuilder::new()
//!     .ms_level(2)
//!     .precursor(195.0876, Some(1))
//!     .add_point(110.0714, 18.0)
//!     .add_point(138.0661, 95.0)
//!     .build();
//! let scan = Scan::centroided(42, spectrum);
//!
//! let config = MatchConfig {
//!     min_match: 2,
//!     ..Default::default()
//! };
//! let records = match_query_to_library(Query::Scan(&scan), &[Arc::new(entry)], &config)?;
//! assert_eq!(records[0].entry.name(), Some("caffeine"));
//! # Ok::<(), mzmatch::matching::MatchError>(())
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`spectrum`] | Points, spectra and input validation |
//! | [`tolerance`] | m/z, RT and percent tolerances, m/z ranges |
//! | [`merging`] | Consensus merging and PASEF MS/MS merging |
//! | [`similarity`] | Signal alignment and similarity functions |
//! | [`isotopes`] | Isotope corroboration and 13C deisotoping |
//! | [`library`] | Library entries with typed metadata fields |
//! | [`chemistry`] | TIMS mobility to CCS conversion |
//! | [`matching`] | The match engine and parallel row batches |
//!
//! ## Parallelism
//!
//! With the default `parallel` feature, feature-list rows are distributed
//! over a rayon thread pool. Without it the same code runs sequentially.

// Documentation lints - enforce complete documentation for publication
#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
// Allow some patterns common in scientific code
#![allow(clippy::too_many_arguments)]

pub mod chemistry;
pub mod isotopes;
pub mod library;
pub mod matching;
pub mod merging;
pub mod similarity;
pub mod spectrum;
pub mod tolerance;

pub use matching::match_query_to_library;
pub use merging::merge_spectra;

/// Re-export commonly used types for convenience
pub mod prelude {
    pub use crate::isotopes::{check_for_isotope_pattern, filter_isotopes, DeisotoperConfig};
    pub use crate::library::{DbEntryField, FieldValue, LibraryEntry, LibraryEntryBuilder, SpectralLibrary};
    pub use crate::matching::{
        match_query_to_library, CancellationToken, ConfigError, FeatureRow, MatchConfig, MatchError,
        MatchRecord, MatchStats, Query, QueryError, RowBatchResult, Scan, SpectralMatcher,
    };
    pub use crate::merging::{
        merge_pasef_msms, merge_spectra, CenterFunction, CenterMeasure, MergeConfig, MergeError, MergingType,
        SpectraMerger, Weighting,
    };
    pub use crate::similarity::{SimilarityFunction, SimilarityResult, UnmatchedSignals, WeightsPreset};
    pub use crate::spectrum::{Point, Spectrum, SpectrumBuilder};
    pub use crate::tolerance::{MzTolerance, PercentTolerance, RtTolerance};
}
