//! Audit analyzers.
//!
//! Each analyzer inspects one facet of the page and emits an
//! [`AnalyzerResult`]. Analyzers are pure functions over the already-fetched
//! [`AuditInput`] snapshot, so they run in parallel with no shared state.

pub mod authority;
pub mod eeat;
pub mod page_size;
pub mod robots;
pub mod schema_data;
pub mod structure;

pub use authority::AuthorityAnalyzer;
pub use eeat::EeatAnalyzer;
pub use page_size::PageSizeAnalyzer;
pub use robots::RobotsAnalyzer;
pub use schema_data::SchemaDataAnalyzer;
pub use structure::StructureAnalyzer;

use crate::config::Config;
use crate::page::PageModel;
use crate::serp::AuthorityLookup;
use crate::{AnalyzerResult, Module};
use rayon::prelude::*;
use url::Url;

/// Everything an audit run consumes, fetched and parsed up front
#[derive(Debug, Clone)]
pub struct AuditInput {
    /// The audited URL (after redirects)
    pub url: Url,
    pub page: PageModel,
    /// Decoded payload size in bytes
    pub payload_bytes: usize,
    /// robots.txt text; `None` when missing or unreachable
    pub robots: Option<String>,
    pub authority: AuthorityLookup,
}

impl AuditInput {
    /// Path component of the audited URL, used for robots matching
    pub fn page_path(&self) -> &str {
        self.url.path()
    }

    /// Host of the audited URL, used to classify links as external
    pub fn host(&self) -> &str {
        self.url.host_str().unwrap_or("")
    }
}

/// Trait implemented by every audit module
pub trait Analyzer: Sync {
    fn module(&self) -> Module;

    fn analyze(&self, input: &AuditInput, config: &Config) -> AnalyzerResult;
}

/// Run all six analyzers in parallel, returning results in module order
pub fn run_analyzers(input: &AuditInput, config: &Config) -> Vec<AnalyzerResult> {
    let analyzers: Vec<Box<dyn Analyzer>> = vec![
        Box::new(RobotsAnalyzer),
        Box::new(StructureAnalyzer),
        Box::new(SchemaDataAnalyzer),
        Box::new(EeatAnalyzer),
        Box::new(PageSizeAnalyzer),
        Box::new(AuthorityAnalyzer),
    ];

    let mut results: Vec<AnalyzerResult> = analyzers
        .par_iter()
        .map(|analyzer| analyzer.analyze(input, config))
        .collect();

    // par_iter preserves order, but keep the reporting order explicit
    results.sort_by_key(|r| Module::ALL.iter().position(|m| *m == r.module));
    results
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::page::parse_page;

    /// Build an [`AuditInput`] for analyzer tests from raw HTML
    pub fn input_from_html(html: &str) -> AuditInput {
        AuditInput {
            url: Url::parse("https://example.com/post").unwrap(),
            page: parse_page(html).unwrap(),
            payload_bytes: html.len(),
            robots: None,
            authority: AuthorityLookup::unavailable(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_support::input_from_html;

    #[test]
    fn runs_all_modules_in_order() {
        let input = input_from_html("<h1>Title</h1><p>some words here</p>");
        let results = run_analyzers(&input, &Config::default());
        let modules: Vec<Module> = results.iter().map(|r| r.module).collect();
        assert_eq!(modules, Module::ALL.to_vec());
    }
}
