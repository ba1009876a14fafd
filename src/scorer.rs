//! Score aggregation.
//!
//! Combines the analyzer results into the final report: per-module raw
//! scores, weight normalization over available modules, the rounded overall
//! score, and the prioritized recommendation list.

use crate::config::Config;
use crate::{
    AnalyzerResult, Finding, FindingStatus, ModuleScore, ModuleStatus, Priority, Recommendation,
    Report, Rule, ScoreBreakdown,
};
use chrono::Utc;

pub struct Scorer<'a> {
    config: &'a Config,
}

impl<'a> Scorer<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self { config }
    }

    /// Build the final report from all analyzer results
    pub fn finalize(&self, url: &str, results: Vec<AnalyzerResult>) -> Report {
        let breakdown = self.breakdown(&results);

        let overall: f64 = breakdown
            .modules
            .iter()
            .map(|m| m.raw_score * m.weight)
            .sum();
        let overall_score = overall.round().clamp(0.0, 100.0) as u8;

        let recommendations = self.recommendations(&results);

        let findings = results.into_iter().flat_map(|r| r.findings).collect();

        Report {
            url: url.to_string(),
            overall_score,
            breakdown,
            recommendations,
            findings,
            generated_at: Utc::now(),
        }
    }

    /// Per-module scores with weights normalized across available modules.
    /// Unavailable modules keep their status visible but carry zero weight.
    fn breakdown(&self, results: &[AnalyzerResult]) -> ScoreBreakdown {
        let weights = &self.config.module_weights;

        let available_weight: f64 = results
            .iter()
            .filter(|r| r.status != ModuleStatus::Unavailable)
            .map(|r| weights.for_module(r.module))
            .sum();

        let modules = results
            .iter()
            .map(|result| {
                let configured = weights.for_module(result.module);
                let weight = if result.status == ModuleStatus::Unavailable || available_weight <= 0.0
                {
                    0.0
                } else {
                    configured / available_weight
                };
                ModuleScore {
                    module: result.module,
                    raw_score: result.raw_score(),
                    weight,
                    status: result.status,
                }
            })
            .collect();

        ScoreBreakdown { modules }
    }

    /// Failed and partial findings become recommendations, sorted by
    /// priority then by originating finding weight descending, truncated to
    /// the configured maximum (lowest priority dropped first).
    fn recommendations(&self, results: &[AnalyzerResult]) -> Vec<Recommendation> {
        let mut candidates: Vec<(Priority, f64, Recommendation)> = results
            .iter()
            .flat_map(|r| r.findings.iter())
            .filter(|f| f.status != FindingStatus::Pass)
            .map(|finding| {
                let priority = priority_for(finding);
                let text = finding
                    .remediation
                    .clone()
                    .unwrap_or_else(|| finding.detail.clone());
                (
                    priority,
                    finding.weight,
                    Recommendation {
                        priority,
                        text,
                        source_rule: finding.rule,
                    },
                )
            })
            .collect();

        candidates.sort_by(|a, b| a.0.cmp(&b.0).then(b.1.total_cmp(&a.1)));
        candidates.truncate(self.config.max_recommendations);
        candidates.into_iter().map(|(_, _, rec)| rec).collect()
    }
}

/// Fixed mapping from rule (and finding severity) to recommendation priority
fn priority_for(finding: &Finding) -> Priority {
    match finding.rule {
        // A blocked major AI bot or missing structured data defeats the
        // purpose of the page outright
        Rule::BotAccess | Rule::SchemaPresence => Priority::Critical,
        Rule::HeadingHierarchy | Rule::AnswerCapsules | Rule::AuthorBio => Priority::High,
        Rule::ContentFreshness
        | Rule::EntityLinks
        | Rule::MalformedJsonLd
        | Rule::CitationDensity
        | Rule::IndexedPages => Priority::Medium,
        Rule::PayloadSize => match finding.status {
            FindingStatus::Fail => Priority::High,
            _ => Priority::Medium,
        },
        Rule::InterrogativeHeadings
        | Rule::DeepAnchors
        | Rule::ProfileLinks
        | Rule::FactualDensity
        | Rule::SerpPresence
        | Rule::RobotsUnreachable => Priority::Low,
    }
}
