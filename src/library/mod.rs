//! # Spectral libraries
//!
//! Reference spectra with a free-form field bag. Well-known fields are
//! addressed through [`DbEntryField`]; values are read with typed accessors
//! that fall back to a default when a field is missing.
//!
//! Entries are shared through [`Arc`] so match records can point at them
//! without copying signals.

mod entry;
mod fields;


use std::sync::Arc;

use serde::{Deserialize, Serialize};

pub use entry::{LibraryEntry, LibraryEntryBuilder};
pub use fields::{DbEntryField, FieldValue, FromFieldValue};

/// A named collection of library entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpectralLibrary {
    /// Library name
    pub name: String,
    /// Entries in library order
    pub entries: Vec<Arc<LibraryEntry>>,
}

impl SpectralLibrary {
    /// Create an empty library
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    /// Create a library from entries
    pub fn with_entries(name: impl Into<String>, entries: impl IntoIterator<Item = LibraryEntry>) -> Self {
        Self {
            name: name.into(),
            entries: entries.into_iter().map(Arc::new).collect(),
        }
    }

    /// Append an entry
    pub fn push(&mut self, entry: LibraryEntry) {
        self.entries.push(Arc::new(entry));
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True if the library holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Concatenate the entries of several libraries, in library order
pub fn combine_entries(libraries: &[SpectralLibrary]) -> Vec<Arc<LibraryEntry>> {
    libraries
        .iter()
        .flat_map(|library| library.entries.iter().cloned())
        .collect()
}

/// Names of several libraries joined for log messages
pub fn joined_names(libraries: &[SpectralLibrary]) -> String {
    libraries
        .iter()
        .map(|library| library.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
