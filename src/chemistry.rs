//! Ion mobility conversions (Mason-Schamp).

/// Mass of N2, the usual drift gas
pub const MASS_N2: f64 = 28.013;

/// Default drift gas temperature in °C
pub const DEFAULT_TEMPERATURE: f64 = 31.85;

/// Offset from °C to K
pub const KELVIN_OFFSET: f64 = 273.15;

const SUMMARY_CONSTANT: f64 = 18509.8632163405;

fn reduced_mass(mz: f64, charge: u32, mass_gas: f64) -> f64 {
    let mass = mz * charge as f64;
    (mass * mass_gas) / (mass + mass_gas)
}

/// Convert inverse reduced ion mobility (1/K0) to a collision cross-section
///
/// Arguments:
///
/// * `one_over_k0` - inverse reduced mobility in V·s/cm²
/// * `mz` - mass-over-charge of the ion
/// * `charge` - charge state of the ion
/// * `mass_gas` - mass of the drift gas
/// * `temp` - temperature of the drift gas in °C
/// * `t_diff` - offset from °C to K
pub fn one_over_reduced_mobility_to_ccs(
    one_over_k0: f64,
    mz: f64,
    charge: u32,
    mass_gas: f64,
    temp: f64,
    t_diff: f64,
) -> f64 {
    let reduced_mobility = 1.0 / one_over_k0;
    SUMMARY_CONSTANT * charge as f64
        / (reduced_mass(mz, charge, mass_gas) * (temp + t_diff)).sqrt()
        / reduced_mobility
}

/// Convert a collision cross-section back to inverse reduced mobility (1/K0)
pub fn ccs_to_one_over_reduced_mobility(ccs: f64, mz: f64, charge: u32, mass_gas: f64, temp: f64, t_diff: f64) -> f64 {
    ((reduced_mass(mz, charge, mass_gas) * (temp + t_diff)).sqrt() * ccs) / (SUMMARY_CONSTANT * charge as f64)
}

/// CCS of a TIMS precursor under default conditions.
///
/// Returns `None` for a zero charge or a mobility or m/z that is not
/// positive and finite.
pub fn tims_ccs(mobility: f64, mz: f64, charge: i32) -> Option<f32> {
    let charge = charge.unsigned_abs();
    if charge == 0 || !(mobility.is_finite() && mobility > 0.0) || !(mz.is_finite() && mz > 0.0) {
        return None;
    }
    let ccs = one_over_reduced_mobility_to_ccs(mobility, mz, charge, MASS_N2, DEFAULT_TEMPERATURE, KELVIN_OFFSET);
    Some(ccs as f32)
}
