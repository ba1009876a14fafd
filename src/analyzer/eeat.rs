//! E-E-A-T & credibility analyzer.
//!
//! Four findings: an author byline with bio evidence, professional profile
//! links (LinkedIn, ORCID), external citation density, and factual density
//! (sentences carrying numbers or percentages). Density scores saturate at
//! configured ceilings so a page cannot game them by sheer volume.

use super::{Analyzer, AuditInput};
use crate::config::Config;
use crate::{AnalyzerResult, Finding, Module, Rule};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;

/// Numbers with at least two digits, or percentages; single digits are too
/// often list markers or dates to count as factual signal.
static NUMERIC_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:[.,]\d+)?%|\d{2,}").expect("numeric regex is valid"));

pub struct EeatAnalyzer;

impl Analyzer for EeatAnalyzer {
    fn module(&self) -> Module {
        Module::Credibility
    }

    fn analyze(&self, input: &AuditInput, config: &Config) -> AnalyzerResult {
        let weights = &config.credibility_weights;

        let profile_link = find_profile_link(input, config);

        let findings = vec![
            author_bio_finding(input, config, profile_link.is_some(), weights.author_bio),
            profile_links_finding(profile_link, weights.profile_links),
            citation_density_finding(input, config, weights.citation_density),
            factual_density_finding(input, config, weights.factual_density),
        ];

        AnalyzerResult::ok(Module::Credibility, findings)
    }
}

fn find_profile_link<'a>(input: &'a AuditInput, config: &Config) -> Option<&'a str> {
    input.page.links.iter().map(String::as_str).find(|href| {
        let lower = href.to_lowercase();
        config
            .profile_patterns
            .iter()
            .any(|pattern| lower.contains(pattern.as_str()))
    })
}

/// Byline phrase in the text, or a profile link doubling as byline evidence
fn author_bio_finding(
    input: &AuditInput,
    config: &Config,
    has_profile_link: bool,
    weight: f64,
) -> Finding {
    let text_lower = input.page.text.to_lowercase();
    let byline = config
        .byline_patterns
        .iter()
        .find(|pattern| text_lower.contains(pattern.as_str()));

    match (byline, has_profile_link) {
        (Some(pattern), _) => Finding::pass(
            Rule::AuthorBio,
            Module::Credibility,
            weight,
            format!("author byline found (\"{pattern}\")"),
        ),
        (None, true) => Finding::pass(
            Rule::AuthorBio,
            Module::Credibility,
            weight,
            "author identified via a professional profile link",
        ),
        (None, false) => Finding::fail(
            Rule::AuthorBio,
            Module::Credibility,
            weight,
            "no author byline or bio found",
            "Add a clear author byline with a short bio to establish authority",
        ),
    }
}

fn profile_links_finding(profile_link: Option<&str>, weight: f64) -> Finding {
    match profile_link {
        Some(href) => Finding::pass(
            Rule::ProfileLinks,
            Module::Credibility,
            weight,
            format!("professional profile link found: {href}"),
        ),
        None => Finding::fail(
            Rule::ProfileLinks,
            Module::Credibility,
            weight,
            "no links to professional-identity profiles",
            "Link the author to LinkedIn or ORCID to validate expertise",
        ),
    }
}

/// External links per 1000 words, saturating at the configured density
fn citation_density_finding(input: &AuditInput, config: &Config, weight: f64) -> Finding {
    let host = input.host();
    let external = input
        .page
        .links
        .iter()
        .filter(|href| is_external_citation(href, host, &config.excluded_citation_hosts))
        .count();

    let words = input.page.word_count.max(1);
    let density = external as f64 * 1000.0 / words as f64;
    let score = (density / config.citation_saturation).min(1.0);

    Finding::scored(
        Rule::CitationDensity,
        Module::Credibility,
        weight,
        score,
        format!(
            "{external} external citations over {words} words ({density:.1} per 1000 words)"
        ),
        "Cite more external sources to back up claims",
    )
}

fn is_external_citation(href: &str, page_host: &str, excluded: &[String]) -> bool {
    let Ok(url) = url::Url::parse(href) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let Some(host) = url.host_str() else {
        return false;
    };
    if host == page_host || host.ends_with(&format!(".{page_host}")) {
        return false;
    }
    !excluded
        .iter()
        .any(|ex| host == ex.as_str() || host.ends_with(&format!(".{ex}")))
}

/// Fraction of distinct sentences containing a numeric token, capped at the
/// configured ceiling
fn factual_density_finding(input: &AuditInput, config: &Config, weight: f64) -> Finding {
    let sentences: HashSet<&str> = input
        .page
        .text
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.split_whitespace().count() >= 3)
        .collect();

    if sentences.is_empty() {
        return Finding::fail(
            Rule::FactualDensity,
            Module::Credibility,
            weight,
            "no sentences of meaningful length found",
            "Add substantive prose with concrete figures",
        );
    }

    let numeric = sentences
        .iter()
        .filter(|s| NUMERIC_TOKEN.is_match(s))
        .count();
    let fraction = numeric as f64 / sentences.len() as f64;
    let score = (fraction / config.factual_density_ceiling).min(1.0);

    Finding::scored(
        Rule::FactualDensity,
        Module::Credibility,
        weight,
        score,
        format!(
            "{numeric} of {} sentences contain numeric data ({:.0}%)",
            sentences.len(),
            fraction * 100.0
        ),
        "Enrich the content with statistics, numbers, and percentages",
    )
}
