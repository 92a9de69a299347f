//! Lookup structures over the catalog, keyed by normalized identifier and
//! by normalized (title, author).

use std::collections::HashMap;

use crate::model::CatalogItem;
use crate::normalize::{normalize_identifier, normalize_text};

/// Normalized ISBN digits → catalog position.
pub type IdentifierIndex = HashMap<String, usize>;

/// Normalized (title, author) → catalog positions sharing that key.
pub type TitleAuthorIndex = HashMap<(String, String), Vec<usize>>;

/// Index catalog items by normalized ISBN. Items without a usable
/// identifier are skipped. On duplicate keys the later item overwrites the
/// earlier one — inherited last-write-wins policy, see DESIGN.md.
pub fn by_identifier(catalog: &[CatalogItem]) -> IdentifierIndex {
    let mut index = IdentifierIndex::new();
    for (pos, item) in catalog.iter().enumerate() {
        if let Some(key) = item.isbn.as_deref().and_then(normalize_identifier) {
            index.insert(key, pos);
        }
    }
    index
}

/// Index catalog items by normalized (title, author), skipping items
/// missing either field. Collisions accumulate rather than overwrite:
/// same-keyed items signal ambiguity that tier 2 must detect.
pub fn by_title_author(catalog: &[CatalogItem]) -> TitleAuthorIndex {
    let mut index = TitleAuthorIndex::new();
    for (pos, item) in catalog.iter().enumerate() {
        let title = item.title.as_deref().and_then(normalize_text);
        let author = item.author.as_deref().and_then(normalize_text);
        if let (Some(title), Some(author)) = (title, author) {
            index.entry((title, author)).or_default().push(pos);
        }
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: &str, title: &str, author: &str, isbn: Option<&str>) -> CatalogItem {
        CatalogItem {
            id: id.into(),
            title: Some(title.into()),
            author: Some(author.into()),
            isbn: isbn.map(String::from),
        }
    }

    #[test]
    fn identifier_index_normalizes_keys() {
        let catalog = vec![item("a", "Dune", "Frank Herbert", Some("978-0-441-01359-3"))];
        let index = by_identifier(&catalog);
        assert_eq!(index.get("9780441013593"), Some(&0));
    }

    #[test]
    fn identifier_index_skips_unusable() {
        let catalog = vec![
            item("a", "Dune", "Frank Herbert", None),
            item("b", "Hyperion", "Dan Simmons", Some("n/a")),
        ];
        assert!(by_identifier(&catalog).is_empty());
    }

    #[test]
    fn identifier_index_last_write_wins() {
        let catalog = vec![
            item("a", "Dune", "Frank Herbert", Some("9780441013593")),
            item("b", "Dune (reissue)", "Frank Herbert", Some("978-0441013593")),
        ];
        let index = by_identifier(&catalog);
        assert_eq!(index.get("9780441013593"), Some(&1));
    }

    #[test]
    fn title_author_index_accumulates_collisions() {
        let catalog = vec![
            item("a", "Foundation", "Isaac Asimov", None),
            item("b", "Foundation", "Isaac Asimov", None),
            item("c", "Dune", "Frank Herbert", None),
        ];
        let index = by_title_author(&catalog);
        assert_eq!(
            index.get(&("foundation".into(), "isaac asimov".into())).map(Vec::len),
            Some(2)
        );
        assert_eq!(
            index.get(&("dune".into(), "frank herbert".into())),
            Some(&vec![2])
        );
    }

    #[test]
    fn title_author_index_skips_missing_fields() {
        let catalog = vec![CatalogItem {
            id: "a".into(),
            title: Some("Dune".into()),
            author: None,
            isbn: None,
        }];
        assert!(by_title_author(&catalog).is_empty());
    }
}
