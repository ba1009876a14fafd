//! Structured data (JSON-LD) analyzer.
//!
//! Parses every embedded JSON-LD block, matches `@type` values against the
//! configured registry, and checks knowledge-graph entity links (`sameAs`)
//! and content freshness (`dateModified`/`datePublished`). A malformed block
//! is skipped and recorded as a failing finding, never a fatal error. When
//! no relevant schema is present the module score is hard-capped, since the
//! other checks are meaningless without a matched block.

use super::{Analyzer, AuditInput};
use crate::config::Config;
use crate::{AnalyzerResult, Finding, Module, Rule};
use chrono::{DateTime, NaiveDate, Utc};
use serde_json::Value;

pub struct SchemaDataAnalyzer;

impl Analyzer for SchemaDataAnalyzer {
    fn module(&self) -> Module {
        Module::StructuredData
    }

    fn analyze(&self, input: &AuditInput, config: &Config) -> AnalyzerResult {
        let weights = &config.schema_weights;
        let mut findings = Vec::new();

        let mut matched: Vec<Value> = Vec::new();
        let mut matched_types: Vec<String> = Vec::new();
        for (index, block) in input.page.json_ld.iter().enumerate() {
            match serde_json::from_str::<Value>(block) {
                Ok(value) => {
                    for entity in flatten_entities(&value) {
                        if let Some(type_name) = matched_type(entity, &config.schema_types) {
                            if !matched_types.contains(&type_name) {
                                matched_types.push(type_name);
                            }
                            matched.push(entity.clone());
                        }
                    }
                }
                Err(e) => {
                    log::debug!("skipping malformed JSON-LD block {index}: {e}");
                    findings.push(Finding::fail(
                        Rule::MalformedJsonLd,
                        Module::StructuredData,
                        weights.malformed_block,
                        format!("JSON-LD block {} is not valid JSON: {e}", index + 1),
                        "Fix the malformed JSON-LD block so structured data can be parsed",
                    ));
                }
            }
        }

        let has_schema = !matched.is_empty();
        findings.push(if has_schema {
            Finding::pass(
                Rule::SchemaPresence,
                Module::StructuredData,
                weights.presence,
                format!("relevant schema types found: {}", matched_types.join(", ")),
            )
        } else {
            Finding::fail(
                Rule::SchemaPresence,
                Module::StructuredData,
                weights.presence,
                "no relevant schema.org types found in JSON-LD",
                "Add JSON-LD markup for Organization, Article, Product, or FAQPage",
            )
        });

        findings.push(entity_links_finding(&matched, config, weights.entity_links));
        findings.push(freshness_finding(&matched, config, weights.freshness));

        let result = AnalyzerResult::ok(Module::StructuredData, findings);
        if has_schema {
            result
        } else {
            result.with_cap(weights.missing_schema_cap)
        }
    }
}

/// Flatten a JSON-LD document into its entities: top-level arrays and
/// `@graph` containers are expanded, everything else is a single entity.
fn flatten_entities(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().flat_map(flatten_entities).collect(),
        Value::Object(map) => match map.get("@graph").and_then(Value::as_array) {
            Some(graph) => graph.iter().flat_map(flatten_entities).collect(),
            None => vec![value],
        },
        _ => Vec::new(),
    }
}

/// The entity's `@type` (scalar or array) if it matches the registry
fn matched_type(entity: &Value, registry: &[String]) -> Option<String> {
    let type_value = entity.get("@type")?;
    let candidates: Vec<&str> = match type_value {
        Value::String(s) => vec![s.as_str()],
        Value::Array(items) => items.iter().filter_map(Value::as_str).collect(),
        _ => Vec::new(),
    };
    candidates
        .into_iter()
        .find(|t| registry.iter().any(|r| r == t))
        .map(|t| t.to_string())
}

/// Any matched entity with a sameAs URL on a knowledge-graph domain
fn entity_links_finding(matched: &[Value], config: &Config, weight: f64) -> Finding {
    let mut same_as_urls: Vec<&str> = Vec::new();
    for entity in matched {
        match entity.get("sameAs") {
            Some(Value::String(url)) => same_as_urls.push(url),
            Some(Value::Array(urls)) => {
                same_as_urls.extend(urls.iter().filter_map(Value::as_str))
            }
            _ => {}
        }
    }

    let linked = same_as_urls.iter().find(|url| {
        config
            .knowledge_graph_patterns
            .iter()
            .any(|pattern| url.contains(pattern.as_str()))
    });

    match linked {
        Some(url) => Finding::pass(
            Rule::EntityLinks,
            Module::StructuredData,
            weight,
            format!("sameAs links to a knowledge graph: {url}"),
        ),
        None => Finding::fail(
            Rule::EntityLinks,
            Module::StructuredData,
            weight,
            "no sameAs link to a knowledge-graph domain",
            "Add sameAs entries pointing to Wikidata or Wikipedia in your Organization/Person schema",
        ),
    }
}

/// dateModified (fallback datePublished) younger than the freshness threshold
fn freshness_finding(matched: &[Value], config: &Config, weight: f64) -> Finding {
    let date = matched
        .iter()
        .find_map(|e| parse_schema_date(e.get("dateModified")))
        .or_else(|| {
            matched
                .iter()
                .find_map(|e| parse_schema_date(e.get("datePublished")))
        });

    match date {
        Some(date) => {
            let age_days = (Utc::now() - date).num_days();
            if age_days < config.freshness_days {
                Finding::pass(
                    Rule::ContentFreshness,
                    Module::StructuredData,
                    weight,
                    format!("content was modified {age_days} days ago"),
                )
            } else {
                Finding::fail(
                    Rule::ContentFreshness,
                    Module::StructuredData,
                    weight,
                    format!(
                        "content was last modified {age_days} days ago (threshold: {} days)",
                        config.freshness_days
                    ),
                    "Update the content and its dateModified to signal freshness",
                )
            }
        }
        // Absent dates are a distinct failure, not conflated with staleness
        None => Finding::fail(
            Rule::ContentFreshness,
            Module::StructuredData,
            weight,
            "missing freshness signal: no dateModified or datePublished in structured data",
            "Add dateModified to your Article/BlogPosting schema",
        ),
    }
}

/// Parse an ISO 8601 date or datetime from a JSON-LD date property
fn parse_schema_date(value: Option<&Value>) -> Option<DateTime<Utc>> {
    let raw = value?.as_str()?.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
        return Some(datetime.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date.and_hms_opt(0, 0, 0)?.and_utc());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::input_from_html;
    use crate::FindingStatus;
    use chrono::Duration;

    fn analyze(html: &str) -> AnalyzerResult {
        SchemaDataAnalyzer.analyze(&input_from_html(html), &Config::default())
    }

    fn finding(result: &AnalyzerResult, rule: Rule) -> &Finding {
        result.findings.iter().find(|f| f.rule == rule).unwrap()
    }

    fn jsonld(body: &str) -> String {
        format!(r#"<script type="application/ld+json">{body}</script><h1>T</h1><p>x y</p>"#)
    }

    fn days_ago(days: i64) -> String {
        (Utc::now() - Duration::days(days))
            .format("%Y-%m-%dT%H:%M:%S+00:00")
            .to_string()
    }

    #[test]
    fn relevant_type_passes_presence() {
        let result = analyze(&jsonld(r#"{"@type":"Article","headline":"x"}"#));
        assert_eq!(
            finding(&result, Rule::SchemaPresence).status,
            FindingStatus::Pass
        );
        assert!(result.cap.is_none());
    }

    #[test]
    fn missing_schema_caps_module_score() {
        let result = analyze("<h1>T</h1><p>x y</p>");
        assert_eq!(
            finding(&result, Rule::SchemaPresence).status,
            FindingStatus::Fail
        );
        assert_eq!(result.cap, Some(20.0));
        assert!(result.raw_score() <= 20.0);
    }

    #[test]
    fn type_array_and_graph_are_flattened() {
        let result = analyze(&jsonld(
            r#"{"@graph":[{"@type":["Thing","Person"],"name":"A"}]}"#,
        ));
        assert_eq!(
            finding(&result, Rule::SchemaPresence).status,
            FindingStatus::Pass
        );
    }

    #[test]
    fn malformed_block_is_a_finding_not_fatal() {
        let html = format!(
            r#"<script type="application/ld+json">{{not json</script>{}"#,
            jsonld(r#"{"@type":"Article"}"#)
        );
        let result = analyze(&html);
        assert_eq!(
            finding(&result, Rule::MalformedJsonLd).status,
            FindingStatus::Fail
        );
        // the well-formed sibling still earns presence credit
        assert_eq!(
            finding(&result, Rule::SchemaPresence).status,
            FindingStatus::Pass
        );
    }

    #[test]
    fn wikidata_same_as_passes_entity_links() {
        let result = analyze(&jsonld(
            r#"{"@type":"Organization","sameAs":["https://www.wikidata.org/wiki/Q42"]}"#,
        ));
        assert_eq!(
            finding(&result, Rule::EntityLinks).status,
            FindingStatus::Pass
        );
    }

    #[test]
    fn scalar_same_as_is_accepted() {
        let result = analyze(&jsonld(
            r#"{"@type":"Person","sameAs":"https://en.wikipedia.org/wiki/Ada_Lovelace"}"#,
        ));
        assert_eq!(
            finding(&result, Rule::EntityLinks).status,
            FindingStatus::Pass
        );
    }

    #[test]
    fn recent_date_modified_passes_freshness() {
        let body = format!(r#"{{"@type":"Article","dateModified":"{}"}}"#, days_ago(10));
        let result = analyze(&jsonld(&body));
        assert_eq!(
            finding(&result, Rule::ContentFreshness).status,
            FindingStatus::Pass
        );
    }

    #[test]
    fn stale_date_modified_fails_with_age() {
        let body = format!(r#"{{"@type":"Article","dateModified":"{}"}}"#, days_ago(91));
        let result = analyze(&jsonld(&body));
        let f = finding(&result, Rule::ContentFreshness);
        assert_eq!(f.status, FindingStatus::Fail);
        assert!(f.detail.contains("91 days ago"));
    }

    #[test]
    fn date_published_is_the_fallback() {
        let body = format!(r#"{{"@type":"Article","datePublished":"{}"}}"#, days_ago(5));
        let result = analyze(&jsonld(&body));
        assert_eq!(
            finding(&result, Rule::ContentFreshness).status,
            FindingStatus::Pass
        );
    }

    #[test]
    fn missing_dates_are_a_distinct_failure() {
        let result = analyze(&jsonld(r#"{"@type":"Article"}"#));
        let f = finding(&result, Rule::ContentFreshness);
        assert_eq!(f.status, FindingStatus::Fail);
        assert!(f.detail.contains("missing freshness signal"));
    }

    #[test]
    fn plain_date_format_is_parsed() {
        let date = (Utc::now() - Duration::days(3)).format("%Y-%m-%d").to_string();
        let body = format!(r#"{{"@type":"Article","dateModified":"{date}"}}"#);
        let result = analyze(&jsonld(&body));
        assert_eq!(
            finding(&result, Rule::ContentFreshness).status,
            FindingStatus::Pass
        );
    }
}
