use std::fmt;

use serde::{Deserialize, Serialize};

/// Well-known keys of the library entry field bag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DbEntryField {
    /// Compound name
    Name,
    /// Identifier inside the source library
    EntryId,
    /// Precursor m/z
    PrecursorMz,
    /// Retention time in minutes
    Rt,
    /// Collision cross-section in Å²
    Ccs,
    /// Precursor charge
    Charge,
    /// MS level of the reference spectrum
    MsLevel,
    /// Molecular formula
    Formula,
    /// SMILES string
    Smiles,
    /// InChIKey
    InchiKey,
    /// Ion type, e.g. `[M+H]+`
    IonType,
    /// Collision energy
    CollisionEnergy,
}

impl DbEntryField {
    /// Key under which the field is stored
    pub fn as_str(&self) -> &'static str {
        match self {
            DbEntryField::Name => "name",
            DbEntryField::EntryId => "entry_id",
            DbEntryField::PrecursorMz => "precursor_mz",
            DbEntryField::Rt => "rt",
            DbEntryField::Ccs => "ccs",
            DbEntryField::Charge => "charge",
            DbEntryField::MsLevel => "ms_level",
            DbEntryField::Formula => "formula",
            DbEntryField::Smiles => "smiles",
            DbEntryField::InchiKey => "inchikey",
            DbEntryField::IonType => "ion_type",
            DbEntryField::CollisionEnergy => "collision_energy",
        }
    }
}

impl fmt::Display for DbEntryField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A scalar or string attribute of a library entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    /// Integer value
    Int(i64),
    /// Floating point value
    Float(f64),
    /// Text value
    Text(String),
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(value as f64)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value as i64)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

/// Typed extraction from a [`FieldValue`].
///
/// Numbers convert between integer and float representations; text only
/// converts to strings and to numbers it parses as.
pub trait FromFieldValue: Sized {
    /// Convert, or `None` if the value has an incompatible type
    fn from_field_value(value: &FieldValue) -> Option<Self>;
}

impl FromFieldValue for f64 {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl FromFieldValue for f32 {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        f64::from_field_value(value).map(|v| v as f32)
    }
}

impl FromFieldValue for i64 {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Int(v) => Some(*v),
            FieldValue::Float(v) if v.fract() == 0.0 => Some(*v as i64),
            FieldValue::Float(_) => None,
            FieldValue::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl FromFieldValue for i32 {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        i64::from_field_value(value).and_then(|v| i32::try_from(v).ok())
    }
}

impl FromFieldValue for u8 {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        i64::from_field_value(value).and_then(|v| u8::try_from(v).ok())
    }
}

impl FromFieldValue for String {
    fn from_field_value(value: &FieldValue) -> Option<Self> {
        match value {
            FieldValue::Text(s) => Some(s.clone()),
            FieldValue::Int(v) => Some(v.to_string()),
            FieldValue::Float(v) => Some(v.to_string()),
        }
    }
}
