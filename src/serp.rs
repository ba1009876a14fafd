//! SERP API integration for the site-authority lookup.
//!
//! The engine never calls the network during analysis; this client runs once
//! before the analyzers and produces an [`AuthorityLookup`] value. A missing
//! API key, a timeout, a non-2xx status, or a malformed response all map to
//! an unavailable lookup so the audit still completes on five modules.

use crate::config::AuthorityConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Environment variable holding the SERP API key
pub const AUTHORITY_API_KEY_VAR: &str = "GEOAUDIT_AUTHORITY_API_KEY";

const DEFAULT_BASE_URL: &str = "https://google.serper.dev/search";

/// Outcome of the indexed-page-count and SERP-relevance lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupStatus {
    Ok,
    /// API key not configured
    Unavailable,
    /// Request failed (timeout, non-2xx, malformed body)
    Error,
}

/// Result of the third-party site-authority lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorityLookup {
    pub indexed_count: Option<u64>,
    pub top_relevant: Option<bool>,
    pub status: LookupStatus,
}

impl AuthorityLookup {
    pub fn unavailable() -> Self {
        Self {
            indexed_count: None,
            top_relevant: None,
            status: LookupStatus::Unavailable,
        }
    }

    pub fn error() -> Self {
        Self {
            indexed_count: None,
            top_relevant: None,
            status: LookupStatus::Error,
        }
    }
}

/// Blocking client for a Serper-style SERP API
pub struct SerpClient {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl SerpClient {
    /// Create a client from the environment; `None` when no key is set
    pub fn from_env(timeout: Duration) -> Option<Self> {
        let api_key = std::env::var(AUTHORITY_API_KEY_VAR).ok()?;
        if api_key.trim().is_empty() {
            return None;
        }
        Some(Self {
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout,
        })
    }

    /// Override the API endpoint (used by tests)
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.to_string();
        self
    }

    /// Look up the audited domain with a single bounded request. Any failure
    /// degrades to `LookupStatus::Error`; this never panics or retries.
    pub fn lookup(&self, domain: &str, config: &AuthorityConfig) -> AuthorityLookup {
        match self.try_lookup(domain, config) {
            Ok(lookup) => lookup,
            Err(reason) => {
                log::warn!("site-authority lookup failed for {domain}: {reason}");
                AuthorityLookup::error()
            }
        }
    }

    fn try_lookup(&self, domain: &str, config: &AuthorityConfig) -> Result<AuthorityLookup, String> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| e.to_string())?;

        let body = serde_json::json!({ "q": format!("site:{domain}") });
        let response = client
            .post(&self.base_url)
            .header("X-API-KEY", &self.api_key)
            .json(&body)
            .send()
            .map_err(|e| e.to_string())?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("API returned {status}"));
        }

        let json: serde_json::Value = response.json().map_err(|e| e.to_string())?;
        let organic = json["organic"]
            .as_array()
            .ok_or_else(|| "no organic results in response".to_string())?;

        let indexed_count = organic.len() as u64;
        let top_relevant = organic
            .iter()
            .take(config.top_n)
            .filter_map(|entry| entry["link"].as_str())
            .any(|link| link.contains(domain));

        Ok(AuthorityLookup {
            indexed_count: Some(indexed_count),
            top_relevant: Some(top_relevant),
            status: LookupStatus::Ok,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_api_key_means_no_client() {
        std::env::remove_var(AUTHORITY_API_KEY_VAR);
        assert!(SerpClient::from_env(Duration::from_secs(1)).is_none());
    }

    #[test]
    fn unavailable_lookup_has_no_values() {
        let lookup = AuthorityLookup::unavailable();
        assert_eq!(lookup.status, LookupStatus::Unavailable);
        assert!(lookup.indexed_count.is_none());
        assert!(lookup.top_relevant.is_none());
    }

    #[test]
    fn unreachable_endpoint_degrades_to_error() {
        let client = SerpClient {
            api_key: "test-key".to_string(),
            base_url: "http://127.0.0.1:1/search".to_string(),
            timeout: Duration::from_millis(200),
        };
        let lookup = client.lookup("example.com", &AuthorityConfig::default());
        assert_eq!(lookup.status, LookupStatus::Error);
    }
}
