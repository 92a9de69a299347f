//! Credential storage.
//!
//! Reads/writes ~/.config/shelfmark/auth.json (0600 on Unix) so the
//! server URL and API key only have to be passed once.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Audiobookshelf credentials stored locally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthCredentials {
    /// Server base URL (e.g., "http://localhost:13378")
    pub server_url: String,
    /// API key used as a bearer token
    pub api_key: String,
}

impl AuthCredentials {
    pub fn new(server_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            api_key: api_key.into(),
        }
    }
}

/// Returns the path to the auth credentials file.
pub fn auth_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|c| c.join("shelfmark/auth.json"))
}

/// Load saved credentials from disk.
/// Returns None if nothing is saved or the file is invalid.
pub fn load_auth() -> Option<AuthCredentials> {
    read_auth_file(&auth_file_path()?)
}

/// Save credentials to disk.
/// Creates the parent directory if it doesn't exist.
/// Sets 0600 permissions on Unix.
pub fn save_auth(creds: &AuthCredentials) -> Result<(), String> {
    let path = auth_file_path().ok_or("Could not determine config directory")?;
    write_auth_file(&path, creds)
}

fn read_auth_file(path: &Path) -> Option<AuthCredentials> {
    let contents = std::fs::read_to_string(path).ok()?;
    serde_json::from_str(&contents).ok()
}

fn write_auth_file(path: &Path, creds: &AuthCredentials) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
    }

    let contents = serde_json::to_string_pretty(creds)
        .map_err(|e| format!("Failed to serialize credentials: {}", e))?;

    std::fs::write(path, &contents).map_err(|e| format!("Failed to write auth file: {}", e))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let permissions = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(path, permissions)
            .map_err(|e| format!("Failed to set file permissions: {}", e))?;
    }

    Ok(())
}
