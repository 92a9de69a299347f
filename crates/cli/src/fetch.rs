//! Fetch stage — pull library items from the server and map them to the
//! engine's catalog records.

use shelfmark_abs::{AbsClient, Library};
use shelfmark_resolve::CatalogItem;

use crate::CliError;

/// Fetch the catalog: the named library, or every book library on the
/// server when none is named. Podcast libraries are never matched against.
pub fn fetch_catalog(
    client: &AbsClient,
    library: Option<&str>,
    progress: bool,
) -> Result<Vec<CatalogItem>, CliError> {
    let libraries = client.list_libraries().map_err(CliError::abs)?;

    let selected: Vec<Library> = match library {
        Some(name) => {
            match libraries.into_iter().find(|l| l.name.eq_ignore_ascii_case(name)) {
                Some(lib) => vec![lib],
                None => {
                    return Err(CliError::usage(format!(
                        "no library named '{name}' on the server"
                    )))
                }
            }
        }
        None => libraries.into_iter().filter(|l| l.media_type == "book").collect(),
    };

    if selected.is_empty() {
        return Err(CliError::usage("no book libraries on the server"));
    }

    let mut catalog = Vec::new();
    for lib in &selected {
        let items = client.list_library_items(&lib.id).map_err(CliError::abs)?;
        if progress {
            eprintln!("  {}: {} items", lib.name, items.len());
        }
        catalog.extend(items.into_iter().map(|item| CatalogItem {
            id: item.id,
            title: item.media.metadata.title,
            author: item.media.metadata.author_name,
            isbn: item.media.metadata.isbn,
        }));
    }

    Ok(catalog)
}
