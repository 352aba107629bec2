use std::sync::Arc;

use serde::Serialize;

use crate::library::LibraryEntry;
use crate::similarity::SimilarityResult;

use super::query::QueryIdentity;

/// One accepted library hit
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchRecord {
    /// Matched library entry
    pub entry: Arc<LibraryEntry>,
    /// Score and alignment
    pub similarity: SimilarityResult,
    /// Query unit the hit belongs to
    pub query: QueryIdentity,
    /// Relative CCS deviation of the query from the entry
    pub ccs_relative_error: Option<f32>,
}

impl MatchRecord {
    /// Similarity score
    pub fn score(&self) -> f64 {
        self.similarity.score
    }
}

/// Sort records by descending score; ties keep their order
pub fn sort_by_score(records: &mut [MatchRecord]) {
    records.sort_by(|a, b| b.score().total_cmp(&a.score()));
}
