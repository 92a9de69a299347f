//! Audiobookshelf HTTP client.
//!
//! Blocking reqwest client (no Tokio runtime required).
//! Covers the migration flow: verify token → list libraries → page
//! through library items → mark progress finished.

use std::time::Duration;

use serde::Deserialize;

const PAGE_LIMIT: usize = 100;

/// Audiobookshelf API client (blocking).
#[derive(Clone)]
pub struct AbsClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

/// Error type for Audiobookshelf operations.
#[derive(Debug)]
pub enum AbsError {
    /// Server rejected the API key (401/403)
    NotAuthenticated,
    /// Network error
    Network(String),
    /// HTTP error with status code
    Http(u16, String),
    /// JSON parsing error
    Parse(String),
}

impl std::fmt::Display for AbsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AbsError::NotAuthenticated => {
                write!(f, "Audiobookshelf rejected the API key")
            }
            AbsError::Network(msg) => write!(f, "Network error: {}", msg),
            AbsError::Http(code, msg) => write!(f, "HTTP {}: {}", code, msg),
            AbsError::Parse(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for AbsError {}

/// User info from /api/me.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
}

/// Library info from /api/libraries.
#[derive(Debug, Clone, Deserialize)]
pub struct Library {
    pub id: String,
    pub name: String,
    #[serde(rename = "mediaType")]
    pub media_type: String,
}

/// One item from a library items page. Only the metadata the matcher
/// needs is deserialized; everything else in the payload is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryItem {
    pub id: String,
    #[serde(default)]
    pub media: Media,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Media {
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Metadata {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(rename = "authorName", default)]
    pub author_name: Option<String>,
    #[serde(default)]
    pub isbn: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LibrariesResponse {
    libraries: Vec<Library>,
}

#[derive(Debug, Deserialize)]
struct ItemsPage {
    results: Vec<LibraryItem>,
    total: usize,
}

impl AbsClient {
    /// Create a new client. A trailing slash on the server URL is
    /// tolerated.
    pub fn new(server_url: &str, api_key: &str) -> Self {
        let http = reqwest::blocking::Client::builder()
            .user_agent(concat!("shelfmark/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http,
            base_url: server_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        }
    }

    /// Verify the API key and get the authenticated user — fail fast
    /// before fetching anything.
    pub fn verify(&self) -> Result<User, AbsError> {
        let url = format!("{}/api/me", self.base_url);
        let resp = self.get(&url)?;
        resp.json::<User>().map_err(|e| AbsError::Parse(e.to_string()))
    }

    /// List all libraries on the server.
    pub fn list_libraries(&self) -> Result<Vec<Library>, AbsError> {
        let url = format!("{}/api/libraries", self.base_url);
        let resp = self.get(&url)?;
        let body: LibrariesResponse = resp.json().map_err(|e| AbsError::Parse(e.to_string()))?;
        Ok(body.libraries)
    }

    /// Fetch every item in a library, paging until the server's reported
    /// total is reached.
    pub fn list_library_items(&self, library_id: &str) -> Result<Vec<LibraryItem>, AbsError> {
        let mut items = Vec::new();
        let mut page = 0usize;

        loop {
            let url = format!(
                "{}/api/libraries/{}/items?limit={}&page={}",
                self.base_url, library_id, PAGE_LIMIT, page
            );
            let resp = self.get(&url)?;
            let body: ItemsPage = resp.json().map_err(|e| AbsError::Parse(e.to_string()))?;

            // Guard: more items claimed but an empty page returned.
            if body.results.is_empty() && items.len() < body.total {
                return Err(AbsError::Parse(format!(
                    "library {}: server reported {} items but returned an empty page",
                    library_id, body.total
                )));
            }

            let page_len = body.results.len();
            items.extend(body.results);

            if page_len < PAGE_LIMIT || items.len() >= body.total {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// Mark a library item finished for the authenticated user.
    /// `finished_at_ms` carries the export's read date when known.
    pub fn mark_finished(
        &self,
        item_id: &str,
        finished_at_ms: Option<i64>,
    ) -> Result<(), AbsError> {
        let url = format!("{}/api/me/progress/{}", self.base_url, item_id);

        let mut body = serde_json::json!({ "isFinished": true });
        if let Some(ms) = finished_at_ms {
            body["finishedAt"] = serde_json::json!(ms);
        }

        let resp = self
            .http
            .patch(&url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .map_err(|e| AbsError::Network(e.to_string()))?;

        check_status(resp).map(|_| ())
    }

    fn get(&self, url: &str) -> Result<reqwest::blocking::Response, AbsError> {
        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .send()
            .map_err(|e| AbsError::Network(e.to_string()))?;
        check_status(resp)
    }
}

fn check_status(
    resp: reqwest::blocking::Response,
) -> Result<reqwest::blocking::Response, AbsError> {
    let status = resp.status();
    if status.as_u16() == 401 || status.as_u16() == 403 {
        return Err(AbsError::NotAuthenticated);
    }
    if !status.is_success() {
        let code = status.as_u16();
        let body = resp.text().unwrap_or_default();
        return Err(AbsError::Http(code, body));
    }
    Ok(resp)
}
