//! `shelfmark-resolve` — entity resolution between a Goodreads export and
//! an Audiobookshelf library.
//!
//! Pure engine crate: receives pre-loaded records, returns matched pairs
//! and the unmatched residue. No HTTP or CLI dependencies.

pub mod engine;
pub mod error;
pub mod goodreads;
pub mod index;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod report;

pub use engine::run;
pub use error::ResolveError;
pub use model::{CatalogItem, MatchPair, MatchResult, MatchTier, SourceRecord};
