//! Audit error taxonomy.
//!
//! Only two conditions abort an audit: the page could not be fetched at all,
//! or the payload is not parseable as an HTML document. Everything else
//! (missing robots.txt, malformed JSON-LD, unconfigured authority API)
//! degrades to a failing finding or an unavailable module.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuditError {
    /// The HTML document itself cannot be parsed; no report can be produced.
    #[error("fatal input error: {0}")]
    FatalInput(String),

    /// The page (or robots.txt origin) could not be fetched.
    #[error("failed to fetch {url}: {reason}")]
    Fetch { url: String, reason: String },

    /// The audited URL is not a valid absolute URL.
    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },
}
