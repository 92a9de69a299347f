//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract — scripts rely on them.
//!
//! # Exit Code Ranges
//!
//! | Range   | Domain       | Description                                  |
//! |---------|--------------|----------------------------------------------|
//! | 0       | Universal    | Success                                      |
//! | 1       | Universal    | General error (unspecified)                  |
//! | 2       | Universal    | Usage error (bad args, missing credentials)  |
//! | 3       | Export       | Goodreads export parse error                 |
//! | 50-59   | ABS          | Audiobookshelf server errors                 |

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unreadable export file, missing
/// credentials.
pub const EXIT_USAGE: u8 = 2;

/// The Goodreads export could not be parsed (bad CSV, missing column).
pub const EXIT_EXPORT_PARSE: u8 = 3;

/// Audiobookshelf rejected the API key.
pub const EXIT_ABS_AUTH: u8 = 50;

/// Audiobookshelf upstream failure (network, 5xx, malformed response).
pub const EXIT_ABS_UPSTREAM: u8 = 51;

/// At least one status update failed after matching succeeded.
/// The remaining updates were still applied; see the final tally.
pub const EXIT_APPLY_PARTIAL: u8 = 52;
