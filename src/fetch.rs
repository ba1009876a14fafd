//! HTTP fetching of the audited page and its robots.txt.
//!
//! The engine consumes already-fetched text; this module is the collaborator
//! that produces it. Page fetches get a small retry budget, robots.txt gets a
//! single attempt (absence is treated as allow-all downstream).

use crate::error::AuditError;
use std::time::Duration;
use url::Url;

const USER_AGENT: &str = "Mozilla/5.0 (compatible; GeoAudit/0.3)";
const MAX_RETRIES: usize = 2;

/// A fetched page payload
#[derive(Debug)]
pub struct FetchedPage {
    /// Decoded body text
    pub body: String,
    /// Decoded payload size in bytes
    pub bytes: usize,
    /// URL after redirects
    pub final_url: Url,
}

pub struct Fetcher {
    client: reqwest::blocking::Client,
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Result<Self, AuditError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| AuditError::Fetch {
                url: String::new(),
                reason: format!("could not build HTTP client: {e}"),
            })?;
        Ok(Self { client })
    }

    /// Fetch the audited page, retrying transient failures
    pub fn fetch_page(&self, url: &Url) -> Result<FetchedPage, AuditError> {
        let mut last_error = String::new();
        for attempt in 0..=MAX_RETRIES {
            if attempt > 0 {
                log::debug!("retrying {url} (attempt {})", attempt + 1);
            }
            match self.try_fetch(url) {
                Ok(page) => return Ok(page),
                Err(reason) => last_error = reason,
            }
        }
        Err(AuditError::Fetch {
            url: url.to_string(),
            reason: last_error,
        })
    }

    fn try_fetch(&self, url: &Url) -> Result<FetchedPage, String> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .map_err(|e| e.to_string())?;
        let status = response.status();
        if !status.is_success() {
            return Err(format!("server returned {status}"));
        }
        let final_url = response.url().clone();
        let body = response.text().map_err(|e| e.to_string())?;
        let bytes = body.len();
        Ok(FetchedPage {
            body,
            bytes,
            final_url,
        })
    }

    /// Fetch robots.txt from the page's origin. Returns `None` when it is
    /// missing or unreadable; the robots analyzer treats that as allow-all.
    pub fn fetch_robots(&self, page_url: &Url) -> Option<String> {
        let robots_url = page_url.join("/robots.txt").ok()?;
        match self.client.get(robots_url.clone()).send() {
            Ok(response) if response.status().is_success() => response.text().ok(),
            Ok(response) => {
                log::debug!("robots.txt returned {}", response.status());
                None
            }
            Err(e) => {
                log::debug!("robots.txt fetch failed: {e}");
                None
            }
        }
    }
}

/// Normalize a CLI-supplied URL: prepend https:// when no scheme is given
pub fn normalize_url(raw: &str) -> Result<Url, AuditError> {
    let candidate = if raw.contains("://") {
        raw.to_string()
    } else {
        format!("https://{raw}")
    };
    Url::parse(&candidate).map_err(|e| AuditError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_adds_scheme() {
        let url = normalize_url("example.com/page").unwrap();
        assert_eq!(url.as_str(), "https://example.com/page");
    }

    #[test]
    fn normalize_keeps_existing_scheme() {
        let url = normalize_url("http://example.com").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(matches!(
            normalize_url("ht tp://??"),
            Err(AuditError::InvalidUrl { .. })
        ));
    }
}
