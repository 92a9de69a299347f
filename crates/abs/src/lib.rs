//! Audiobookshelf API client — the single source of truth for the wire
//! contract ShelfMark needs: verify token, list libraries, page through
//! library items, mark an item's progress finished.
//!
//! No matching logic. No retries beyond the request timeout. No progress
//! bars.

mod auth;
mod client;

pub use auth::{auth_file_path, load_auth, save_auth, AuthCredentials};
pub use client::{AbsClient, AbsError, Library, LibraryItem, Media, Metadata, User};
