use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::spectrum::{validate_points, Point, SpectrumError};

use super::fields::{DbEntryField, FieldValue, FromFieldValue};

/// One reference spectrum with its annotations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LibraryEntry {
    /// Reference signals, ascending m/z
    pub points: Vec<Point>,
    /// Named attributes
    #[serde(default)]
    pub fields: BTreeMap<String, FieldValue>,
}

impl LibraryEntry {
    /// Create an entry without fields; signals are sorted by m/z
    pub fn new(mut points: Vec<Point>) -> Self {
        points.sort_by(|a, b| a.mz.total_cmp(&b.mz));
        Self {
            points,
            fields: BTreeMap::new(),
        }
    }

    /// Set a well-known field
    pub fn set_field(&mut self, field: DbEntryField, value: impl Into<FieldValue>) {
        self.fields.insert(field.as_str().to_string(), value.into());
    }

    /// Raw value stored under `key`
    pub fn field(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    /// Typed value of a well-known field
    pub fn get<T: FromFieldValue>(&self, field: DbEntryField) -> Option<T> {
        self.get_by_key(field.as_str())
    }

    /// Typed value stored under an arbitrary key
    pub fn get_by_key<T: FromFieldValue>(&self, key: &str) -> Option<T> {
        self.fields.get(key).and_then(T::from_field_value)
    }

    /// Typed value of a field, or `default` if absent or of the wrong type
    pub fn get_or<T: FromFieldValue>(&self, field: DbEntryField, default: T) -> T {
        self.get(field).unwrap_or(default)
    }

    /// Precursor m/z, if annotated
    pub fn precursor_mz(&self) -> Option<f64> {
        self.get(DbEntryField::PrecursorMz)
    }

    /// Retention time in minutes, if annotated
    pub fn retention_time(&self) -> Option<f32> {
        self.get(DbEntryField::Rt)
    }

    /// Collision cross-section, if annotated
    pub fn ccs(&self) -> Option<f32> {
        self.get(DbEntryField::Ccs)
    }

    /// Compound name, if annotated
    pub fn name(&self) -> Option<&str> {
        match self.fields.get(DbEntryField::Name.as_str()) {
            Some(FieldValue::Text(name)) => Some(name),
            _ => None,
        }
    }

    /// Check the numeric contract of the reference signals
    pub fn validate(&self) -> Result<(), SpectrumError> {
        validate_points(&self.points)
    }
}

/// Builder for [`LibraryEntry`]
#[derive(Debug, Clone, Default)]
pub struct LibraryEntryBuilder {
    points: Vec<Point>,
    fields: BTreeMap<String, FieldValue>,
}

impl LibraryEntryBuilder {
    /// Start an empty entry
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single signal
    pub fn add_point(mut self, mz: f64, intensity: f64) -> Self {
        self.points.push(Point::new(mz, intensity));
        self
    }

    /// Add multiple signals
    pub fn add_points(mut self, points: impl IntoIterator<Item = Point>) -> Self {
        self.points.extend(points);
        self
    }

    /// Set a well-known field
    pub fn field(mut self, field: DbEntryField, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(field.as_str().to_string(), value.into());
        self
    }

    /// Set a custom field
    pub fn custom_field(mut self, key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Shorthand for the compound name
    pub fn name(self, name: &str) -> Self {
        self.field(DbEntryField::Name, name)
    }

    /// Shorthand for the precursor m/z
    pub fn precursor_mz(self, mz: f64) -> Self {
        self.field(DbEntryField::PrecursorMz, mz)
    }

    /// Shorthand for the retention time
    pub fn retention_time(self, rt: f32) -> Self {
        self.field(DbEntryField::Rt, rt)
    }

    /// Shorthand for the collision cross-section
    pub fn ccs(self, ccs: f32) -> Self {
        self.field(DbEntryField::Ccs, ccs)
    }

    /// Build the entry
    pub fn build(self) -> LibraryEntry {
        let mut entry = LibraryEntry::new(self.points);
        entry.fields = self.fields;
        entry
    }
}
