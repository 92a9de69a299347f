//! Goodreads CSV export loader.
//!
//! Header-driven: column positions are resolved by name, so extra or
//! reordered columns in the export are harmless. Only rows on the
//! finished shelf are loaded.

use chrono::NaiveDate;

use crate::error::ResolveError;
use crate::model::SourceRecord;

/// Shelf value marking a finished book in the export.
pub const FINISHED_SHELF: &str = "read";

const DATE_READ_FORMAT: &str = "%Y/%m/%d";

/// Load finished-book records from Goodreads export CSV data.
///
/// ISBN cells keep their raw exported form (Excel `="…"` guards included);
/// `normalize_identifier` handles them at match time. An unparseable
/// `Date Read` becomes None rather than an error — a missing read date
/// must not block migration.
pub fn load_export(csv_data: &str) -> Result<Vec<SourceRecord>, ResolveError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ResolveError::Csv(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let idx = |name: &str| -> Result<usize, ResolveError> {
        headers
            .iter()
            .position(|h| h == name)
            .ok_or_else(|| ResolveError::MissingColumn { column: name.into() })
    };

    let id_idx = idx("Book Id")?;
    let title_idx = idx("Title")?;
    let author_idx = idx("Author")?;
    let isbn10_idx = idx("ISBN")?;
    let isbn13_idx = idx("ISBN13")?;
    let shelf_idx = idx("Exclusive Shelf")?;
    let date_read_idx = idx("Date Read")?;

    let mut records = Vec::new();

    for record in reader.records() {
        let record = record.map_err(|e| ResolveError::Csv(e.to_string()))?;

        if record.get(shelf_idx).unwrap_or("") != FINISHED_SHELF {
            continue;
        }

        let optional = |i: usize| -> Option<String> {
            let value = record.get(i).unwrap_or("").trim();
            if value.is_empty() {
                None
            } else {
                Some(value.to_string())
            }
        };

        let date_read = record
            .get(date_read_idx)
            .and_then(|v| NaiveDate::parse_from_str(v.trim(), DATE_READ_FORMAT).ok());

        records.push(SourceRecord {
            goodreads_id: record.get(id_idx).unwrap_or("").to_string(),
            title: record.get(title_idx).unwrap_or("").to_string(),
            author: record.get(author_idx).unwrap_or("").to_string(),
            isbn10: optional(isbn10_idx),
            isbn13: optional(isbn13_idx),
            date_read,
        });
    }

    Ok(records)
}
