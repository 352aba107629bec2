use serde::{Deserialize, Serialize};

use crate::chemistry::tims_ccs;
use crate::merging::MergedMsMsSpectrum;
use crate::spectrum::{total_ion_current_above, Point, Spectrum};

use super::error::QueryError;

/// A scan handed to the matcher
#[derive(Debug, Clone, PartialEq)]
pub struct Scan {
    /// Scan number in the run
    pub scan_number: u32,
    /// Signals and acquisition metadata
    pub spectrum: Spectrum,
    /// Centroided signals used for matching
    pub mass_list: Option<Vec<Point>>,
}

impl Scan {
    /// Scan without a mass list
    pub fn new(scan_number: u32, spectrum: Spectrum) -> Self {
        Self {
            scan_number,
            spectrum,
            mass_list: None,
        }
    }

    /// Scan whose signals are already centroided: they double as the mass list
    pub fn centroided(scan_number: u32, spectrum: Spectrum) -> Self {
        let mass_list = Some(spectrum.points.clone());
        Self {
            scan_number,
            spectrum,
            mass_list,
        }
    }

    /// Attach a mass list
    pub fn with_mass_list(mut self, mass_list: Vec<Point>) -> Self {
        self.mass_list = Some(mass_list);
        self
    }

    /// Scan from a merged PASEF MS/MS spectrum
    pub fn from_merged(scan_number: u32, merged: MergedMsMsSpectrum) -> Self {
        Self::centroided(scan_number, merged.spectrum)
    }

    /// Mass list, or [`QueryError::MissingMassList`]
    pub fn require_mass_list(&self) -> Result<&[Point], QueryError> {
        self.mass_list.as_deref().ok_or(QueryError::MissingMassList {
            scan_number: self.scan_number,
        })
    }

    /// CCS of the precursor: the annotated value, or one derived from the
    /// scan mobility, precursor m/z and charge
    pub fn precursor_ccs(&self) -> Option<f32> {
        let spectrum = &self.spectrum;
        spectrum.ccs.or_else(|| {
            tims_ccs(spectrum.mobility?, spectrum.precursor_mz?, spectrum.precursor_charge?)
        })
    }
}

/// A feature-list row with its candidate scans
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureRow {
    /// Row identifier
    pub id: u32,
    /// Average m/z of the row's features
    pub average_mz: f64,
    /// Average retention time
    pub average_rt: Option<f32>,
    /// Average collision cross-section
    pub average_ccs: Option<f32>,
    /// Representative MS1 scan of the best feature
    pub representative_scan: Option<Scan>,
    /// Fragment scans of all features
    pub fragment_scans: Vec<Scan>,
}

impl FeatureRow {
    /// Row without scans
    pub fn new(id: u32, average_mz: f64) -> Self {
        Self {
            id,
            average_mz,
            ..Default::default()
        }
    }

    /// Set the average retention time
    pub fn with_rt(mut self, rt: f32) -> Self {
        self.average_rt = Some(rt);
        self
    }

    /// Set the average CCS
    pub fn with_ccs(mut self, ccs: f32) -> Self {
        self.average_ccs = Some(ccs);
        self
    }

    /// Set the representative MS1 scan
    pub fn with_representative_scan(mut self, scan: Scan) -> Self {
        self.representative_scan = Some(scan);
        self
    }

    /// Add a fragment scan
    pub fn add_fragment_scan(mut self, scan: Scan) -> Self {
        self.fragment_scans.push(scan);
        self
    }

    /// Scans this row is matched with.
    ///
    /// At MS level 1 this is the representative scan. Otherwise the fragment
    /// scans holding at least `min_match` signals above `noise_level`,
    /// highest TIC first; only the first unless `all` is set.
    pub fn candidate_scans(
        &self,
        ms_level: u8,
        noise_level: f64,
        min_match: usize,
        all: bool,
    ) -> Result<Vec<&Scan>, QueryError> {
        if ms_level <= 1 {
            return match &self.representative_scan {
                Some(scan) => {
                    scan.require_mass_list()?;
                    Ok(vec![scan])
                }
                None => Err(QueryError::NoCandidateScans { row_id: self.id }),
            };
        }

        let mut candidates = Vec::new();
        for scan in &self.fragment_scans {
            let mass_list = scan.require_mass_list()?;
            let signals = mass_list.iter().filter(|p| p.intensity > noise_level).count();
            if signals >= min_match {
                candidates.push((total_ion_current_above(mass_list, noise_level), scan));
            }
        }
        candidates.sort_by(|a, b| b.0.total_cmp(&a.0));
        if !all {
            candidates.truncate(1);
        }

        if candidates.is_empty() {
            return Err(QueryError::NoCandidateScans { row_id: self.id });
        }
        Ok(candidates.into_iter().map(|(_, scan)| scan).collect())
    }
}

/// Which query unit a match belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum QueryIdentity {
    /// Direct scan match
    Scan {
        /// Matched scan
        scan_number: u32,
    },
    /// Feature-list row match
    Row {
        /// Matched row
        row_id: u32,
        /// Candidate scan that gave the best score
        scan_number: u32,
    },
}

/// A query for [`match_query_to_library`](super::match_query_to_library)
#[derive(Debug, Clone, Copy)]
pub enum Query<'a> {
    /// Single scan
    Scan(&'a Scan),
    /// Feature-list row with candidate scans
    Row(&'a FeatureRow),
}
