use std::borrow::Cow;
use std::sync::Arc;

use crate::isotopes::{check_for_isotope_pattern, filter_isotopes};
use crate::library::{combine_entries, joined_names, LibraryEntry, SpectralLibrary};
use crate::similarity::{crop_to_overlap, remove_precursor, SimilarityResult, SpectrumView};
use crate::spectrum::{filter_above_noise, validate_metadata, validate_points, Point, SpectrumError};
use crate::tolerance::relative_error;

use super::config::MatchConfig;
use super::error::{ConfigError, QueryError};
use super::query::{FeatureRow, QueryIdentity, Scan};
use super::record::{sort_by_score, MatchRecord};

/// A library entry with its comparison signals computed once
#[derive(Debug, Clone)]
pub(super) struct PreparedEntry {
    pub(super) entry: Arc<LibraryEntry>,
    pub(super) points: Vec<Point>,
    pub(super) precursor_mz: Option<f64>,
    pub(super) retention_time: Option<f32>,
    pub(super) ccs: Option<f32>,
}

/// What the per-pair filters know about the query side
#[derive(Debug, Clone, Copy)]
pub(super) struct QueryContext {
    pub(super) ms_level: u8,
    pub(super) retention_time: Option<f32>,
    pub(super) precursor_mz: Option<f64>,
    pub(super) ccs: Option<f32>,
}

/// Matches query spectra against a fixed, combined set of library entries
#[derive(Debug, Clone)]
pub struct SpectralMatcher {
    pub(super) config: MatchConfig,
    pub(super) entries: Vec<PreparedEntry>,
    pub(super) library_names: String,
}

impl SpectralMatcher {
    /// Combine the libraries and prepare their entries.
    ///
    /// Fails if the settings are invalid or an entry holds non-finite or
    /// negative values.
    pub fn new(config: MatchConfig, libraries: &[SpectralLibrary]) -> Result<Self, ConfigError> {
        let mut matcher = Self::from_entries(config, combine_entries(libraries))?;
        matcher.library_names = joined_names(libraries);
        Ok(matcher)
    }

    /// Prepare an already combined entry list
    pub fn from_entries(config: MatchConfig, entries: Vec<Arc<LibraryEntry>>) -> Result<Self, ConfigError> {
        config.validate()?;

        let entries = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| -> Result<PreparedEntry, ConfigError> {
                validate_library_entry(&entry).map_err(|error| ConfigError::InvalidLibraryEntry { index, error })?;
                let mut points = match &config.deisotoping {
                    Some(deisotoping) => filter_isotopes(&entry.points, deisotoping),
                    None => entry.points.clone(),
                };
                points.sort_by(|a, b| a.mz.total_cmp(&b.mz));
                Ok(PreparedEntry {
                    precursor_mz: entry.precursor_mz(),
                    retention_time: entry.retention_time(),
                    ccs: entry.ccs(),
                    points,
                    entry,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            config,
            entries,
            library_names: String::from("unnamed entries"),
        })
    }

    /// Active settings
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Names of the combined libraries, as they appear in log messages
    pub fn library_names(&self) -> &str {
        &self.library_names
    }

    /// Number of combined library entries
    pub fn library_size(&self) -> usize {
        self.entries.len()
    }

    /// Settings check before matching `scan`. MS level 0 is a fault of the
    /// scan and is reported by [`try_match_scan`](Self::try_match_scan).
    pub(super) fn validate_for_scan(&self, scan: &Scan) -> Result<(), ConfigError> {
        match scan.spectrum.ms_level {
            0 => self.config.validate(),
            ms_level => self.config.validate_for_ms_level(ms_level),
        }
    }

    /// Noise-filtered and optionally deisotoped mass list of a scan
    pub(super) fn prepare_query(&self, scan: &Scan) -> Result<Vec<Point>, QueryError> {
        let mass_list = scan.require_mass_list()?;
        validate_points(mass_list).map_err(|error| QueryError::InvalidData {
            scan_number: scan.scan_number,
            error,
        })?;

        let filtered = filter_above_noise(mass_list, self.config.noise_level);
        Ok(match &self.config.deisotoping {
            Some(deisotoping) => filter_isotopes(&filtered, deisotoping),
            None => filtered,
        })
    }

    /// Run every filter and the similarity function for one query/entry pair.
    ///
    /// Filter order: retention time, precursor m/z (MS level > 1), CCS,
    /// crop, precursor removal, similarity, isotope corroboration.
    pub(super) fn match_spectrum(
        &self,
        query: &QueryContext,
        query_points: &[Point],
        entry: &PreparedEntry,
    ) -> Option<SimilarityResult> {
        let config = &self.config;

        if let (Some(tolerance), Some(query_rt), Some(library_rt)) =
            (&config.rt_tolerance, query.retention_time, entry.retention_time)
        {
            if !tolerance.check_within_tolerance(library_rt, query_rt) {
                return None;
            }
        }

        let precursor_tolerance = config.precursor_tolerance.as_ref();
        if query.ms_level > 1 {
            let library_mz = entry.precursor_mz?;
            let query_mz = query.precursor_mz?;
            if !precursor_tolerance?.check_within_tolerance(library_mz, query_mz) {
                return None;
            }
        }

        if let Some(tolerance) = &config.ccs_tolerance {
            if !tolerance.matches(query.ccs, entry.ccs) {
                return None;
            }
        }

        let mut library = Cow::Borrowed(entry.points.as_slice());
        let mut query_signals = Cow::Borrowed(query_points);

        if config.crop_to_overlap {
            let (lib, q) = crop_to_overlap(&config.mz_tolerance, &library, &query_signals);
            library = Cow::Owned(lib);
            query_signals = Cow::Owned(q);
        }

        if query.ms_level > 1 && config.remove_precursor {
            if let (Some(precursor_mz), Some(tolerance)) = (entry.precursor_mz, precursor_tolerance) {
                library = Cow::Owned(remove_precursor(&library, precursor_mz, tolerance));
                query_signals = Cow::Owned(remove_precursor(&query_signals, precursor_mz, tolerance));
            }
        }

        let similarity = config.similarity.score(
            SpectrumView::new(&library).with_precursor(entry.precursor_mz),
            SpectrumView::new(&query_signals).with_precursor(query.precursor_mz),
            &config.mz_tolerance,
            config.min_match,
        )?;

        if let Some(isotopes) = &config.isotope_pattern {
            if !check_for_isotope_pattern(&similarity, &config.mz_tolerance, isotopes.min_matched_signals) {
                return None;
            }
        }
        Some(similarity)
    }

    /// All accepted records of one scan, best first
    pub(super) fn try_match_scan(&self, scan: &Scan) -> Result<Vec<MatchRecord>, QueryError> {
        let spectrum = &scan.spectrum;
        if spectrum.ms_level == 0 {
            return Err(QueryError::InvalidMsLevel {
                scan_number: scan.scan_number,
            });
        }
        spectrum.validate_metadata().map_err(|error| QueryError::InvalidData {
            scan_number: scan.scan_number,
            error,
        })?;
        let query_points = self.prepare_query(scan)?;

        let precursor_mz = self.config.scan_precursor_mz.or(spectrum.precursor_mz);
        if spectrum.ms_level > 1 && precursor_mz.is_none() {
            return Err(QueryError::MissingPrecursorMz {
                scan_number: scan.scan_number,
            });
        }
        let ccs = match self.config.ccs_tolerance {
            Some(_) => scan.precursor_ccs(),
            None => spectrum.ccs,
        };

        let context = QueryContext {
            ms_level: spectrum.ms_level,
            retention_time: spectrum.retention_time,
            precursor_mz,
            ccs,
        };

        let mut records: Vec<MatchRecord> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let similarity = self.match_spectrum(&context, &query_points, entry)?;
                Some(MatchRecord {
                    entry: Arc::clone(&entry.entry),
                    similarity,
                    query: QueryIdentity::Scan {
                        scan_number: scan.scan_number,
                    },
                    ccs_relative_error: relative_error(ccs, entry.ccs),
                })
            })
            .collect();
        sort_by_score(&mut records);
        Ok(records)
    }

    /// Best record per library entry across the row's candidate scans,
    /// best first
    pub(super) fn match_row(&self, row: &FeatureRow) -> Result<Vec<MatchRecord>, QueryError> {
        let config = &self.config;
        validate_row(row).map_err(|error| QueryError::InvalidRowData { row_id: row.id, error })?;
        let scans = row.candidate_scans(config.ms_level, config.noise_level, config.min_match, config.all_ms2_spectra)?;
        let mass_lists = scans
            .iter()
            .map(|scan| self.prepare_query(scan))
            .collect::<Result<Vec<_>, _>>()?;

        let context = QueryContext {
            ms_level: config.ms_level,
            retention_time: row.average_rt,
            precursor_mz: Some(row.average_mz),
            ccs: row.average_ccs,
        };

        let mut records = Vec::new();
        for entry in &self.entries {
            let mut best: Option<(SimilarityResult, u32)> = None;
            for (scan, query_points) in scans.iter().zip(&mass_lists) {
                let Some(similarity) = self.match_spectrum(&context, query_points, entry) else {
                    continue;
                };
                if best.as_ref().map_or(true, |(b, _)| b.score < similarity.score) {
                    best = Some((similarity, scan.scan_number));
                }
            }

            if let Some((similarity, scan_number)) = best {
                records.push(MatchRecord {
                    entry: Arc::clone(&entry.entry),
                    similarity,
                    query: QueryIdentity::Row {
                        row_id: row.id,
                        scan_number,
                    },
                    ccs_relative_error: relative_error(row.average_ccs, entry.ccs),
                });
            }
        }
        sort_by_score(&mut records);
        Ok(records)
    }
}

fn validate_library_entry(entry: &LibraryEntry) -> Result<(), SpectrumError> {
    validate_points(&entry.points)?;
    validate_metadata("precursor m/z", entry.precursor_mz())?;
    validate_metadata("retention time", entry.retention_time().map(f64::from))?;
    validate_metadata("CCS", entry.ccs().map(f64::from))
}

fn validate_row(row: &FeatureRow) -> Result<(), SpectrumError> {
    validate_metadata("average m/z", Some(row.average_mz))?;
    validate_metadata("average retention time", row.average_rt.map(f64::from))?;
    validate_metadata("average CCS", row.average_ccs.map(f64::from))
}
