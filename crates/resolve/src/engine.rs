//! Pipeline driver: runs the tiers strictly in order 1 → 2 → 3, each
//! consuming the prior tier's residual, and assembles the final result.

use std::collections::HashSet;

use crate::index;
use crate::matcher::{match_exact_text, match_fuzzy_text, match_identifier};
use crate::model::{CatalogItem, MatchResult, RunMeta, SourceRecord};
use crate::report::compute_summary;

/// Resolve export records against the catalog. Pure and deterministic:
/// no tier is retried, and a record unmatched after tier 3 is terminally
/// unmatched for this run.
pub fn run(records: Vec<SourceRecord>, catalog: &[CatalogItem]) -> MatchResult {
    let total_records = records.len();

    let id_index = index::by_identifier(catalog);
    let ta_index = index::by_title_author(catalog);

    let tier1 = match_identifier(records, catalog, &id_index, HashSet::new());
    let tier2 = match_exact_text(tier1.residual, catalog, &ta_index, tier1.consumed);
    let tier3 = match_fuzzy_text(tier2.residual, catalog, tier2.consumed);

    let mut pairs = tier1.matched;
    pairs.extend(tier2.matched);
    pairs.extend(tier3.matched);

    let summary = compute_summary(total_records, &pairs, &tier3.residual);

    MatchResult {
        meta: RunMeta {
            engine_version: env!("CARGO_PKG_VERSION").to_string(),
            run_at: chrono::Utc::now().to_rfc3339(),
        },
        summary,
        pairs,
        unmatched: tier3.residual,
    }
}
