//! Source client: fetches the member array over HTTP or from disk.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use reqwest::Client;
use tracing::{debug, info, warn};

use roster_core::config::SourceConfig;
use roster_core::store::MemberStore;
use roster_core::types::{parse_members, Member};

use crate::error::SourceError;

/// Where member records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberSource {
    /// HTTP(S) GET against a URL.
    Http {
        /// Absolute URL of the members JSON.
        url: String,
    },
    /// A JSON file on the local filesystem.
    File {
        /// Path to the members JSON.
        path: PathBuf,
    },
}

impl MemberSource {
    /// Pick a source kind from a configured location: `http://` and
    /// `https://` URLs are fetched, anything else is read as a file path.
    #[must_use]
    pub fn from_location(location: &str) -> Self {
        let trimmed = location.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            Self::Http {
                url: trimmed.to_string(),
            }
        } else {
            Self::File {
                path: PathBuf::from(trimmed),
            }
        }
    }
}

impl std::fmt::Display for MemberSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Http { url } => f.write_str(url),
            Self::File { path } => write!(f, "{}", path.display()),
        }
    }
}

/// Loads member records from a [`MemberSource`]. No retries.
pub struct SourceClient {
    http: Client,
    timeout_ms: u64,
}

impl SourceClient {
    /// Create a client with a per-request timeout.
    #[must_use]
    pub fn new(timeout_ms: u64) -> Self {
        Self {
            http: Client::new(),
            timeout_ms,
        }
    }

    /// Create a client and resolve the configured source location.
    #[must_use]
    pub fn from_config(config: &SourceConfig) -> (Self, MemberSource) {
        (Self::new(config.timeout_ms), MemberSource::from_location(&config.url))
    }

    /// Fetch and decode the member array.
    ///
    /// # Errors
    /// `Fetch`/`Status`/`Timeout` for transport failures, `Parse` for a
    /// malformed payload.
    pub async fn fetch(&self, source: &MemberSource) -> Result<Vec<Member>, SourceError> {
        let start = Instant::now();
        let body = match source {
            MemberSource::Http { url } => self.fetch_http(url).await?,
            MemberSource::File { path } => tokio::fs::read(path).await?,
        };

        let members = parse_payload(&body)?;
        debug!(
            %source,
            count = members.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "Fetched member records"
        );
        Ok(members)
    }

    /// Fetch from `source` and replace the contents of `store`.
    ///
    /// On error the store is left untouched.
    ///
    /// # Errors
    /// See [`SourceClient::fetch`].
    pub async fn load_into(
        &self,
        source: &MemberSource,
        store: &mut MemberStore,
    ) -> Result<usize, SourceError> {
        match self.fetch(source).await {
            Ok(members) => {
                store.replace_all(members);
                info!(%source, count = store.len(), "Member store populated");
                Ok(store.len())
            }
            Err(e) => {
                warn!(%source, error = %e, "Failed to load members");
                Err(e)
            }
        }
    }

    async fn fetch_http(&self, url: &str) -> Result<Vec<u8>, SourceError> {
        let result = self
            .http
            .get(url)
            .timeout(Duration::from_millis(self.timeout_ms))
            .send()
            .await;

        let resp = match result {
            Ok(resp) => resp,
            Err(e) if e.is_timeout() => return Err(SourceError::Timeout(self.timeout_ms)),
            Err(e) => return Err(e.into()),
        };

        if !resp.status().is_success() {
            return Err(SourceError::Status {
                status: resp.status().as_u16(),
            });
        }

        match resp.bytes().await {
            Ok(bytes) => Ok(bytes.to_vec()),
            Err(e) if e.is_timeout() => Err(SourceError::Timeout(self.timeout_ms)),
            Err(e) => Err(e.into()),
        }
    }
}

/// Decode a raw payload into member records.
///
/// # Errors
/// Returns `SourceError::Parse` if the bytes are not UTF-8 JSON describing an
/// array of member records.
pub fn parse_payload(body: &[u8]) -> Result<Vec<Member>, SourceError> {
    let text = std::str::from_utf8(body).map_err(|e| SourceError::Parse(e.to_string()))?;
    parse_members(text).map_err(|e| SourceError::Parse(e.to_string()))
}
