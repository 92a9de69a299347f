//! The three matching tiers. Each tier takes the previous tier's residual
//! records and the consumed-id set, and returns its matches, the new
//! residual, and the updated set. Ambiguity is never resolved by an
//! arbitrary pick — an ambiguous record stays in the residual.

use std::collections::HashSet;

use crate::index::{IdentifierIndex, TitleAuthorIndex};
use crate::model::{CatalogItem, MatchPair, MatchTier, SourceRecord, TierOutput};
use crate::normalize::{normalize_identifier, normalize_text, similarity};

pub const TITLE_THRESHOLD: f64 = 0.90;
pub const AUTHOR_THRESHOLD: f64 = 0.85;

/// Tier 1 — identifier match. ISBN-13 is looked up before ISBN-10; the
/// first non-consumed hit wins. Records without a usable identifier, or
/// whose identifier is absent from the index, pass through.
pub fn match_identifier(
    records: Vec<SourceRecord>,
    catalog: &[CatalogItem],
    index: &IdentifierIndex,
    mut consumed: HashSet<String>,
) -> TierOutput {
    let mut matched = Vec::new();
    let mut residual = Vec::new();

    for record in records {
        let hit = [record.isbn13.as_deref(), record.isbn10.as_deref()]
            .into_iter()
            .flatten()
            .filter_map(normalize_identifier)
            .find_map(|key| {
                index
                    .get(&key)
                    .map(|&pos| &catalog[pos])
                    .filter(|item| !consumed.contains(&item.id))
            });

        match hit {
            Some(item) => {
                consumed.insert(item.id.clone());
                matched.push(MatchPair {
                    source: record,
                    item: item.clone(),
                    tier: MatchTier::Identifier,
                });
            }
            None => residual.push(record),
        }
    }

    TierOutput { matched, residual, consumed }
}

/// Tier 2 — exact normalized (title, author) match. A record matches only
/// when exactly one non-consumed catalog item carries its key; multiple
/// same-keyed items cannot be safely disambiguated here.
pub fn match_exact_text(
    records: Vec<SourceRecord>,
    catalog: &[CatalogItem],
    index: &TitleAuthorIndex,
    mut consumed: HashSet<String>,
) -> TierOutput {
    let mut matched = Vec::new();
    let mut residual = Vec::new();

    for record in records {
        let key = match (normalize_text(&record.title), normalize_text(&record.author)) {
            (Some(title), Some(author)) => (title, author),
            _ => {
                residual.push(record);
                continue;
            }
        };

        let candidates: Vec<&CatalogItem> = index
            .get(&key)
            .map(|positions| {
                positions
                    .iter()
                    .map(|&pos| &catalog[pos])
                    .filter(|item| !consumed.contains(&item.id))
                    .collect()
            })
            .unwrap_or_default();

        if let [item] = candidates[..] {
            consumed.insert(item.id.clone());
            matched.push(MatchPair {
                source: record,
                item: item.clone(),
                tier: MatchTier::ExactText,
            });
        } else {
            residual.push(record);
        }
    }

    TierOutput { matched, residual, consumed }
}

/// Tier 3 — fuzzy text match against every remaining catalog item. A
/// candidate qualifies only when title similarity ≥ 0.90 AND author
/// similarity ≥ 0.85; exactly one qualifier is a match, zero or several
/// leave the record unmatched. O(residual × catalog) — fine at
/// personal-library scale.
pub fn match_fuzzy_text(
    records: Vec<SourceRecord>,
    catalog: &[CatalogItem],
    mut consumed: HashSet<String>,
) -> TierOutput {
    // Normalize the catalog side once, not per record.
    let normalized: Vec<Option<(String, String)>> = catalog
        .iter()
        .map(|item| {
            let title = item.title.as_deref().and_then(normalize_text)?;
            let author = item.author.as_deref().and_then(normalize_text)?;
            Some((title, author))
        })
        .collect();

    let mut matched = Vec::new();
    let mut residual = Vec::new();

    for record in records {
        let (title, author) = match (normalize_text(&record.title), normalize_text(&record.author)) {
            (Some(title), Some(author)) => (title, author),
            _ => {
                residual.push(record);
                continue;
            }
        };

        let mut qualifying = Vec::new();
        for (pos, norm) in normalized.iter().enumerate() {
            let Some((item_title, item_author)) = norm else {
                continue;
            };
            if consumed.contains(&catalog[pos].id) {
                continue;
            }
            if similarity(&title, item_title) >= TITLE_THRESHOLD
                && similarity(&author, item_author) >= AUTHOR_THRESHOLD
            {
                qualifying.push(pos);
            }
        }

        if let [pos] = qualifying[..] {
            let item = &catalog[pos];
            consumed.insert(item.id.clone());
            matched.push(MatchPair {
                source: record,
                item: item.clone(),
                tier: MatchTier::FuzzyText,
            });
        } else {
            residual.push(record);
        }
    }

    TierOutput { matched, residual, consumed }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index;

    fn record(title: &str, author: &str, isbn10: Option<&str>, isbn13: Option<&str>) -> SourceRecord {
        SourceRecord {
            goodreads_id: format!("gr_{title}"),
            title: title.into(),
            author: author.into(),
            isbn10: isbn10.map(String::from),
            isbn13: isbn13.map(String::from),
            date_read: None,
        }
    }

    fn item(id: &str, title: &str, author: &str, isbn: Option<&str>) -> CatalogItem {
        CatalogItem {
            id: id.into(),
            title: Some(title.into()),
            author: Some(author.into()),
            isbn: isbn.map(String::from),
        }
    }

    #[test]
    fn identifier_matches_formatted_isbn() {
        let catalog = vec![item("abc", "Dune", "Frank Herbert", Some("978-0-441-01359-3"))];
        let records = vec![record("Dune", "Frank Herbert", None, Some("9780441013593"))];
        let out = match_identifier(records, &catalog, &index::by_identifier(&catalog), HashSet::new());
        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.matched[0].item.id, "abc");
        assert_eq!(out.matched[0].tier, MatchTier::Identifier);
        assert!(out.residual.is_empty());
        assert!(out.consumed.contains("abc"));
    }

    #[test]
    fn identifier_prefers_isbn13() {
        let catalog = vec![
            item("ten", "Dune", "Frank Herbert", Some("0441013597")),
            item("thirteen", "Dune", "Frank Herbert", Some("9780441013593")),
        ];
        let records = vec![record("Dune", "Frank Herbert", Some("0441013597"), Some("9780441013593"))];
        let out = match_identifier(records, &catalog, &index::by_identifier(&catalog), HashSet::new());
        assert_eq!(out.matched[0].item.id, "thirteen");
    }

    #[test]
    fn identifier_falls_back_to_isbn10() {
        let catalog = vec![item("ten", "Dune", "Frank Herbert", Some("0441013597"))];
        let records = vec![record("Dune", "Frank Herbert", Some("0-441-01359-7"), Some("9999999999999"))];
        let out = match_identifier(records, &catalog, &index::by_identifier(&catalog), HashSet::new());
        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.matched[0].item.id, "ten");
    }

    #[test]
    fn identifier_never_matches_without_identifiers() {
        let catalog = vec![item("abc", "Dune", "Frank Herbert", Some("9780441013593"))];
        let records = vec![record("Dune", "Frank Herbert", None, None)];
        let out = match_identifier(records, &catalog, &index::by_identifier(&catalog), HashSet::new());
        assert!(out.matched.is_empty());
        assert_eq!(out.residual.len(), 1);
    }

    #[test]
    fn identifier_skips_consumed_item() {
        let catalog = vec![item("abc", "Dune", "Frank Herbert", Some("9780441013593"))];
        let idx = index::by_identifier(&catalog);
        let records = vec![
            record("Dune", "Frank Herbert", None, Some("9780441013593")),
            record("Dune (dup row)", "Frank Herbert", None, Some("9780441013593")),
        ];
        let out = match_identifier(records, &catalog, &idx, HashSet::new());
        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.residual.len(), 1);
    }

    #[test]
    fn exact_text_single_candidate() {
        let catalog = vec![item("abc", "Dune", "Frank Herbert", None)];
        let records = vec![record("Dune: A Novel", "Frank Herbert", None, None)];
        let out = match_exact_text(records, &catalog, &index::by_title_author(&catalog), HashSet::new());
        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.matched[0].tier, MatchTier::ExactText);
    }

    #[test]
    fn exact_text_ambiguity_stays_unmatched() {
        let catalog = vec![
            item("a", "Foundation", "Isaac Asimov", None),
            item("b", "Foundation", "Isaac Asimov", None),
        ];
        let records = vec![record("Foundation", "Isaac Asimov", None, None)];
        let out = match_exact_text(records, &catalog, &index::by_title_author(&catalog), HashSet::new());
        assert!(out.matched.is_empty());
        assert_eq!(out.residual.len(), 1);
    }

    #[test]
    fn exact_text_consumed_candidate_excluded() {
        let catalog = vec![
            item("a", "Foundation", "Isaac Asimov", None),
            item("b", "Foundation", "Isaac Asimov", None),
        ];
        let idx = index::by_title_author(&catalog);
        // One duplicate already taken by an earlier tier: the survivor is
        // unambiguous now.
        let consumed: HashSet<String> = ["a".to_string()].into();
        let records = vec![record("Foundation", "Isaac Asimov", None, None)];
        let out = match_exact_text(records, &catalog, &idx, consumed);
        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.matched[0].item.id, "b");
    }

    #[test]
    fn exact_text_missing_field_passes_through() {
        let catalog = vec![item("a", "Dune", "Frank Herbert", None)];
        let records = vec![record("Dune", "", None, None)];
        let out = match_exact_text(records, &catalog, &index::by_title_author(&catalog), HashSet::new());
        assert_eq!(out.residual.len(), 1);
    }

    #[test]
    fn fuzzy_matches_close_title() {
        let catalog = vec![item("a", "Fellowship of the Ring", "J.R.R. Tolkien", None)];
        let records = vec![record("The Fellowship of the Ring", "J.R.R. Tolkien", None, None)];
        let out = match_fuzzy_text(records, &catalog, HashSet::new());
        assert_eq!(out.matched.len(), 1);
        assert_eq!(out.matched[0].tier, MatchTier::FuzzyText);
    }

    #[test]
    fn fuzzy_requires_both_thresholds() {
        // Title identical (1.0) but author well below 0.85: no match.
        let catalog = vec![item("a", "Leviathan Wakes", "Daniel Abraham", None)];
        let records = vec![record("Leviathan Wakes", "James S.A. Corey", None, None)];
        let out = match_fuzzy_text(records, &catalog, HashSet::new());
        assert!(out.matched.is_empty());
        assert_eq!(out.residual.len(), 1);
    }

    #[test]
    fn fuzzy_tolerates_author_typo() {
        let catalog = vec![item("a", "The Way of Kings", "Brandon Sandersen", None)];
        let records = vec![record("The Way of Kings", "Brandon Sanderson", None, None)];
        let out = match_fuzzy_text(records, &catalog, HashSet::new());
        assert_eq!(out.matched.len(), 1);
    }

    #[test]
    fn fuzzy_ambiguity_stays_unmatched() {
        let catalog = vec![
            item("a", "Foundation", "Isaac Asimov", None),
            item("b", "Foundation", "Isaac Asimov", None),
        ];
        let records = vec![record("Foundation", "Isaac Asimov", None, None)];
        let out = match_fuzzy_text(records, &catalog, HashSet::new());
        assert!(out.matched.is_empty());
        assert_eq!(out.residual.len(), 1);
    }

    #[test]
    fn fuzzy_excludes_consumed_items() {
        let catalog = vec![item("a", "Dune", "Frank Herbert", None)];
        let consumed: HashSet<String> = ["a".to_string()].into();
        let records = vec![record("Dune", "Frank Herbert", None, None)];
        let out = match_fuzzy_text(records, &catalog, consumed);
        assert!(out.matched.is_empty());
        assert_eq!(out.residual.len(), 1);
    }
}
