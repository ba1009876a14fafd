//! Site authority analyzer.
//!
//! Consumes the result of the external SERP lookup; it never performs
//! network calls itself. When the lookup is not configured or failed, the
//! module reports `unavailable` and its weight is redistributed across the
//! remaining modules — a missing API key must never fail the audit.

use super::{Analyzer, AuditInput};
use crate::config::Config;
use crate::serp::LookupStatus;
use crate::{AnalyzerResult, Finding, Module, Rule};

pub struct AuthorityAnalyzer;

impl Analyzer for AuthorityAnalyzer {
    fn module(&self) -> Module {
        Module::SiteAuthority
    }

    fn analyze(&self, input: &AuditInput, config: &Config) -> AnalyzerResult {
        let lookup = &input.authority;
        if lookup.status != LookupStatus::Ok {
            log::debug!("site-authority lookup {:?}; excluding module", lookup.status);
            return AnalyzerResult::unavailable(Module::SiteAuthority);
        }

        let authority = &config.authority;
        let mut findings = Vec::new();

        let indexed = lookup.indexed_count.unwrap_or(0);
        findings.push(if indexed >= authority.min_indexed {
            Finding::pass(
                Rule::IndexedPages,
                Module::SiteAuthority,
                authority.indexed_weight,
                format!("{indexed} indexed pages found for the domain"),
            )
        } else {
            Finding::fail(
                Rule::IndexedPages,
                Module::SiteAuthority,
                authority.indexed_weight,
                format!(
                    "only {indexed} indexed pages found (minimum: {})",
                    authority.min_indexed
                ),
                "Publish and interlink more indexable content to grow domain presence",
            )
        });

        findings.push(if lookup.top_relevant == Some(true) {
            Finding::pass(
                Rule::SerpPresence,
                Module::SiteAuthority,
                authority.serp_weight,
                format!("domain appears in the top {} results for its proxy query", authority.top_n),
            )
        } else {
            Finding::fail(
                Rule::SerpPresence,
                Module::SiteAuthority,
                authority.serp_weight,
                format!(
                    "domain absent from the top {} results for its proxy query",
                    authority.top_n
                ),
                "Strengthen topical authority so the domain ranks for its own brand queries",
            )
        });

        AnalyzerResult::ok(Module::SiteAuthority, findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::input_from_html;
    use crate::serp::AuthorityLookup;
    use crate::{FindingStatus, ModuleStatus};

    fn analyze(authority: AuthorityLookup) -> AnalyzerResult {
        let mut input = input_from_html("<h1>T</h1><p>words</p>");
        input.authority = authority;
        AuthorityAnalyzer.analyze(&input, &Config::default())
    }

    #[test]
    fn unconfigured_lookup_is_unavailable_with_no_findings() {
        let result = analyze(AuthorityLookup::unavailable());
        assert_eq!(result.status, ModuleStatus::Unavailable);
        assert!(result.findings.is_empty());
    }

    #[test]
    fn failed_lookup_is_also_unavailable() {
        let result = analyze(AuthorityLookup::error());
        assert_eq!(result.status, ModuleStatus::Unavailable);
    }

    #[test]
    fn healthy_domain_passes_both_findings() {
        let result = analyze(AuthorityLookup {
            indexed_count: Some(8),
            top_relevant: Some(true),
            status: LookupStatus::Ok,
        });
        assert_eq!(result.status, ModuleStatus::Ok);
        assert!(result
            .findings
            .iter()
            .all(|f| f.status == FindingStatus::Pass));
        assert!((result.raw_score() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn thin_domain_fails_indexed_count() {
        let result = analyze(AuthorityLookup {
            indexed_count: Some(2),
            top_relevant: Some(true),
            status: LookupStatus::Ok,
        });
        let indexed = result
            .findings
            .iter()
            .find(|f| f.rule == Rule::IndexedPages)
            .unwrap();
        assert_eq!(indexed.status, FindingStatus::Fail);
        assert!(indexed.detail.contains("only 2"));
        // serp (0.4) passes, indexed (0.6) fails
        assert!((result.raw_score() - 40.0).abs() < 1e-9);
    }
}
