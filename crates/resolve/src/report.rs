//! Summary statistics over a finished run — the only aggregate state the
//! engine exposes for display.

use crate::model::{MatchPair, MatchSummary, MatchTier, SourceRecord};

/// Count matches per tier plus totals.
pub fn compute_summary(
    total_records: usize,
    pairs: &[MatchPair],
    unmatched: &[SourceRecord],
) -> MatchSummary {
    let mut by_identifier = 0;
    let mut by_exact_text = 0;
    let mut by_fuzzy_text = 0;

    for pair in pairs {
        match pair.tier {
            MatchTier::Identifier => by_identifier += 1,
            MatchTier::ExactText => by_exact_text += 1,
            MatchTier::FuzzyText => by_fuzzy_text += 1,
        }
    }

    MatchSummary {
        total_records,
        by_identifier,
        by_exact_text,
        by_fuzzy_text,
        matched: pairs.len(),
        unmatched: unmatched.len(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CatalogItem, SourceRecord};

    fn pair(tier: MatchTier) -> MatchPair {
        MatchPair {
            source: record("r"),
            item: CatalogItem {
                id: "i".into(),
                title: None,
                author: None,
                isbn: None,
            },
            tier,
        }
    }

    fn record(title: &str) -> SourceRecord {
        SourceRecord {
            goodreads_id: "1".into(),
            title: title.into(),
            author: "a".into(),
            isbn10: None,
            isbn13: None,
            date_read: None,
        }
    }

    #[test]
    fn summary_counts() {
        let pairs = vec![
            pair(MatchTier::Identifier),
            pair(MatchTier::Identifier),
            pair(MatchTier::ExactText),
            pair(MatchTier::FuzzyText),
        ];
        let unmatched = vec![record("leftover")];
        let summary = compute_summary(5, &pairs, &unmatched);
        assert_eq!(summary.total_records, 5);
        assert_eq!(summary.by_identifier, 2);
        assert_eq!(summary.by_exact_text, 1);
        assert_eq!(summary.by_fuzzy_text, 1);
        assert_eq!(summary.matched, 4);
        assert_eq!(summary.unmatched, 1);
    }
}
