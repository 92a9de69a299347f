use std::collections::HashSet;

use chrono::NaiveDate;
use serde::Serialize;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One finished-book row from the Goodreads export.
///
/// The loader has already filtered to the finished shelf; the engine treats
/// every record it receives as in scope. ISBN fields keep their raw exported
/// form (including Excel `="…"` guards) — normalization happens at match time.
#[derive(Debug, Clone, Serialize)]
pub struct SourceRecord {
    pub goodreads_id: String,
    pub title: String,
    pub author: String,
    pub isbn10: Option<String>,
    pub isbn13: Option<String>,
    pub date_read: Option<NaiveDate>,
}

/// One item from the Audiobookshelf library.
#[derive(Debug, Clone, Serialize)]
pub struct CatalogItem {
    pub id: String,
    pub title: Option<String>,
    pub author: Option<String>,
    pub isbn: Option<String>,
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// Which strategy produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchTier {
    Identifier,
    ExactText,
    FuzzyText,
}

impl std::fmt::Display for MatchTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier"),
            Self::ExactText => write!(f, "exact_text"),
            Self::FuzzyText => write!(f, "fuzzy_text"),
        }
    }
}

/// An export row paired with the catalog item it resolved to.
#[derive(Debug, Clone, Serialize)]
pub struct MatchPair {
    pub source: SourceRecord,
    pub item: CatalogItem,
    pub tier: MatchTier,
}

/// Output of one tier: matches found, records left for the next tier, and
/// the catalog item ids assigned so far. The consumed set is threaded tier
/// to tier as a value — no catalog item is ever double-booked.
#[derive(Debug)]
pub struct TierOutput {
    pub matched: Vec<MatchPair>,
    pub residual: Vec<SourceRecord>,
    pub consumed: HashSet<String>,
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct MatchSummary {
    pub total_records: usize,
    pub by_identifier: usize,
    pub by_exact_text: usize,
    pub by_fuzzy_text: usize,
    pub matched: usize,
    pub unmatched: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunMeta {
    pub engine_version: String,
    pub run_at: String,
}

/// The run's output. Pairs are ordered tier 1 → 2 → 3, each tier keeping
/// its source-record encounter order. Never mutated after the run.
#[derive(Debug, Clone, Serialize)]
pub struct MatchResult {
    pub meta: RunMeta,
    pub summary: MatchSummary,
    pub pairs: Vec<MatchPair>,
    pub unmatched: Vec<SourceRecord>,
}
