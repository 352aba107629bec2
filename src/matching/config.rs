use serde::{Deserialize, Serialize};

use crate::isotopes::DeisotoperConfig;
use crate::similarity::SimilarityFunction;
use crate::tolerance::{MzTolerance, PercentTolerance, RtTolerance};

use super::error::ConfigError;

/// Isotope corroboration settings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IsotopePatternConfig {
    /// Isotope spacings that must be found among the aligned library signals
    pub min_matched_signals: usize,
}

impl Default for IsotopePatternConfig {
    fn default() -> Self {
        Self { min_matched_signals: 3 }
    }
}

fn default_ms_level() -> u8 {
    2
}

fn default_min_match() -> usize {
    4
}

fn default_precursor_tolerance() -> Option<MzTolerance> {
    Some(MzTolerance {
        absolute: 0.001,
        ppm: 5.0,
    })
}

fn default_true() -> bool {
    true
}

/// Settings of a library search
///
/// Optional filters are disabled when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Tolerance used to align signals
    #[serde(default)]
    pub mz_tolerance: MzTolerance,
    /// Tolerance for precursor m/z comparison and precursor signal removal
    #[serde(default = "default_precursor_tolerance")]
    pub precursor_tolerance: Option<MzTolerance>,
    /// MS level of the candidate scans in row mode
    #[serde(default = "default_ms_level")]
    pub ms_level: u8,
    /// Minimum number of aligned signals
    #[serde(default = "default_min_match")]
    pub min_match: usize,
    /// Similarity function
    #[serde(default)]
    pub similarity: SimilarityFunction,
    /// Query signals at or below this intensity are ignored
    #[serde(default)]
    pub noise_level: f64,
    /// Retention time filter
    #[serde(default)]
    pub rt_tolerance: Option<RtTolerance>,
    /// Relative CCS filter
    #[serde(default)]
    pub ccs_tolerance: Option<PercentTolerance>,
    /// Isotope corroboration requirement
    #[serde(default)]
    pub isotope_pattern: Option<IsotopePatternConfig>,
    /// 13C removal applied to library and query signals
    #[serde(default)]
    pub deisotoping: Option<DeisotoperConfig>,
    /// Crop both spectra to their shared m/z span
    #[serde(default)]
    pub crop_to_overlap: bool,
    /// Remove precursor signals at MS level > 1
    #[serde(default = "default_true")]
    pub remove_precursor: bool,
    /// Use every candidate fragment scan of a row instead of only the best
    #[serde(default)]
    pub all_ms2_spectra: bool,
    /// Precursor m/z used instead of the scan's own in scan mode
    #[serde(default)]
    pub scan_precursor_mz: Option<f64>,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            mz_tolerance: MzTolerance::default(),
            precursor_tolerance: default_precursor_tolerance(),
            ms_level: default_ms_level(),
            min_match: default_min_match(),
            similarity: SimilarityFunction::default(),
            noise_level: 0.0,
            rt_tolerance: None,
            ccs_tolerance: None,
            isotope_pattern: None,
            deisotoping: None,
            crop_to_overlap: false,
            remove_precursor: true,
            all_ms2_spectra: false,
            scan_precursor_mz: None,
        }
    }
}

impl MatchConfig {
    /// Parse settings from a TOML string.
    ///
    /// Numeric settings are checked right away; MS-level dependent checks
    /// run when a batch starts, see [`MatchConfig::validate_for_ms_level`].
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every setting that does not depend on the MS level
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.mz_tolerance.validate()?;
        if let Some(tolerance) = &self.precursor_tolerance {
            tolerance.validate()?;
        }
        if let Some(tolerance) = &self.rt_tolerance {
            tolerance.validate()?;
        }
        if let Some(tolerance) = &self.ccs_tolerance {
            tolerance.validate()?;
        }
        if !self.noise_level.is_finite() || self.noise_level < 0.0 {
            return Err(ConfigError::InvalidNoiseLevel(self.noise_level));
        }
        if self.min_match == 0 {
            return Err(ConfigError::InvalidMinMatch);
        }
        if !self.similarity.is_valid() {
            return Err(ConfigError::InvalidMinScore(self.similarity.min_score()));
        }
        if matches!(self.isotope_pattern, Some(p) if p.min_matched_signals == 0) {
            return Err(ConfigError::InvalidIsotopeMinimum);
        }
        if let Some(deisotoping) = &self.deisotoping {
            deisotoping.validate()?;
            if deisotoping.maximum_charge == 0 {
                return Err(ConfigError::InvalidMaximumCharge);
            }
        }
        if let Some(mz) = self.scan_precursor_mz {
            if !mz.is_finite() || mz <= 0.0 {
                return Err(ConfigError::InvalidScanPrecursorMz(mz));
            }
        }
        Ok(())
    }

    /// Check all settings for queries of `ms_level`
    pub fn validate_for_ms_level(&self, ms_level: u8) -> Result<(), ConfigError> {
        if ms_level == 0 {
            return Err(ConfigError::InvalidMsLevel(ms_level));
        }
        self.validate()?;
        if ms_level > 1 && self.precursor_tolerance.is_none() {
            return Err(ConfigError::MissingPrecursorTolerance { ms_level });
        }
        Ok(())
    }
}
