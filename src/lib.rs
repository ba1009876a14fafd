//! GeoAudit: Generative Engine Optimization auditor
//!
//! This library inspects a single web page and scores how well it can be
//! retrieved, parsed, and cited by AI-driven answer engines. Six independent
//! analyzers each produce a set of findings; the scorer aggregates them into
//! a weighted 0-100 score and a prioritized list of recommendations.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod fetch;
pub mod page;
pub mod reporter;
pub mod scorer;
pub mod serp;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six audit modules, in reporting order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Module {
    RobotsAccess,
    Structure,
    StructuredData,
    Credibility,
    PageSize,
    SiteAuthority,
}

impl Module {
    pub const ALL: [Module; 6] = [
        Module::RobotsAccess,
        Module::Structure,
        Module::StructuredData,
        Module::Credibility,
        Module::PageSize,
        Module::SiteAuthority,
    ];

    /// Human-readable module title for reports
    pub fn title(&self) -> &'static str {
        match self {
            Module::RobotsAccess => "AI Bot Access (robots.txt)",
            Module::Structure => "Structure & Semantics",
            Module::StructuredData => "Structured Data (JSON-LD)",
            Module::Credibility => "E-E-A-T & Credibility",
            Module::PageSize => "Page Size",
            Module::SiteAuthority => "Site Authority",
        }
    }
}

impl std::fmt::Display for Module {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Module::RobotsAccess => write!(f, "robots-access"),
            Module::Structure => write!(f, "structure"),
            Module::StructuredData => write!(f, "structured-data"),
            Module::Credibility => write!(f, "credibility"),
            Module::PageSize => write!(f, "page-size"),
            Module::SiteAuthority => write!(f, "site-authority"),
        }
    }
}

/// Status of one module after analysis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleStatus {
    /// Module analyzed its input normally
    Ok,
    /// Module ran on incomplete input (e.g. robots.txt unreachable)
    Degraded,
    /// Module could not run; its weight is redistributed
    Unavailable,
}

/// Audit rules. Each finding is produced by exactly one rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Rule {
    BotAccess,
    RobotsUnreachable,
    HeadingHierarchy,
    InterrogativeHeadings,
    AnswerCapsules,
    DeepAnchors,
    SchemaPresence,
    EntityLinks,
    ContentFreshness,
    MalformedJsonLd,
    AuthorBio,
    ProfileLinks,
    CitationDensity,
    FactualDensity,
    PayloadSize,
    IndexedPages,
    SerpPresence,
}

impl std::fmt::Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::BotAccess => write!(f, "bot-access"),
            Rule::RobotsUnreachable => write!(f, "robots-unreachable"),
            Rule::HeadingHierarchy => write!(f, "heading-hierarchy"),
            Rule::InterrogativeHeadings => write!(f, "interrogative-headings"),
            Rule::AnswerCapsules => write!(f, "answer-capsules"),
            Rule::DeepAnchors => write!(f, "deep-anchors"),
            Rule::SchemaPresence => write!(f, "schema-presence"),
            Rule::EntityLinks => write!(f, "entity-links"),
            Rule::ContentFreshness => write!(f, "content-freshness"),
            Rule::MalformedJsonLd => write!(f, "malformed-json-ld"),
            Rule::AuthorBio => write!(f, "author-bio"),
            Rule::ProfileLinks => write!(f, "profile-links"),
            Rule::CitationDensity => write!(f, "citation-density"),
            Rule::FactualDensity => write!(f, "factual-density"),
            Rule::PayloadSize => write!(f, "payload-size"),
            Rule::IndexedPages => write!(f, "indexed-pages"),
            Rule::SerpPresence => write!(f, "serp-presence"),
        }
    }
}

/// Pass/partial/fail outcome of one finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FindingStatus {
    Pass,
    Partial,
    Fail,
}

/// A single check result produced by an analyzer.
///
/// `score` is the credit earned in [0.0, 1.0]. Binary checks map pass/fail to
/// 1.0/0.0; fraction-valued checks (e.g. the share of headings with an answer
/// capsule) carry the exact fraction and report `partial`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Finding {
    /// Rule that produced this finding
    pub rule: Rule,
    /// Module the rule belongs to
    pub module: Module,
    /// Pass/partial/fail view of `score`
    pub status: FindingStatus,
    /// Credit earned (0.0-1.0)
    pub score: f64,
    /// Weight of this finding within its module
    pub weight: f64,
    /// Human-readable explanation of the outcome
    pub detail: String,
    /// Suggested fix when the finding did not fully pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remediation: Option<String>,
}

impl Finding {
    pub fn pass(rule: Rule, module: Module, weight: f64, detail: impl Into<String>) -> Self {
        Self {
            rule,
            module,
            status: FindingStatus::Pass,
            score: 1.0,
            weight,
            detail: detail.into(),
            remediation: None,
        }
    }

    pub fn fail(
        rule: Rule,
        module: Module,
        weight: f64,
        detail: impl Into<String>,
        remediation: impl Into<String>,
    ) -> Self {
        Self {
            rule,
            module,
            status: FindingStatus::Fail,
            score: 0.0,
            weight,
            detail: detail.into(),
            remediation: Some(remediation.into()),
        }
    }

    /// Create a finding from a fractional score; status is derived from the
    /// score (1.0 passes, 0.0 fails, anything in between is partial).
    pub fn scored(
        rule: Rule,
        module: Module,
        weight: f64,
        score: f64,
        detail: impl Into<String>,
        remediation: impl Into<String>,
    ) -> Self {
        let score = score.clamp(0.0, 1.0);
        let status = if score >= 1.0 {
            FindingStatus::Pass
        } else if score > 0.0 {
            FindingStatus::Partial
        } else {
            FindingStatus::Fail
        };
        let remediation = if status == FindingStatus::Pass {
            None
        } else {
            Some(remediation.into())
        };
        Self {
            rule,
            module,
            status,
            score,
            weight,
            detail: detail.into(),
            remediation,
        }
    }
}

/// Ordered findings produced by one analyzer for one audited page
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerResult {
    pub module: Module,
    pub status: ModuleStatus,
    pub findings: Vec<Finding>,
    /// Upper bound on the raw score, used when a prerequisite check failed
    /// (e.g. no relevant schema type found)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cap: Option<f64>,
}

impl AnalyzerResult {
    pub fn ok(module: Module, findings: Vec<Finding>) -> Self {
        Self {
            module,
            status: ModuleStatus::Ok,
            findings,
            cap: None,
        }
    }

    pub fn degraded(module: Module, findings: Vec<Finding>) -> Self {
        Self {
            module,
            status: ModuleStatus::Degraded,
            findings,
            cap: None,
        }
    }

    pub fn unavailable(module: Module) -> Self {
        Self {
            module,
            status: ModuleStatus::Unavailable,
            findings: Vec::new(),
            cap: None,
        }
    }

    pub fn with_cap(mut self, cap: f64) -> Self {
        self.cap = Some(cap);
        self
    }

    /// Weighted mean of finding scores, scaled to 0-100 and clamped to the
    /// cap when one is set. Empty finding sets score 0.
    pub fn raw_score(&self) -> f64 {
        let total_weight: f64 = self.findings.iter().map(|f| f.weight).sum();
        if total_weight <= 0.0 {
            return 0.0;
        }
        let earned: f64 = self.findings.iter().map(|f| f.score * f.weight).sum();
        let score = (earned / total_weight) * 100.0;
        match self.cap {
            Some(cap) => score.min(cap),
            None => score,
        }
    }
}

/// Recommendation priority, ordered from most to least urgent
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Critical => write!(f, "CRITICAL"),
            Priority::High => write!(f, "HIGH"),
            Priority::Medium => write!(f, "MEDIUM"),
            Priority::Low => write!(f, "LOW"),
        }
    }
}

/// A remediation action derived from a failed or partial finding
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recommendation {
    pub priority: Priority,
    pub text: String,
    /// Rule that produced the originating finding
    pub source_rule: Rule,
}

/// Per-module entry in the score breakdown
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleScore {
    pub module: Module,
    /// Module score (0-100)
    pub raw_score: f64,
    /// Normalized share of the overall score (0.0 for unavailable modules)
    pub weight: f64,
    pub status: ModuleStatus,
}

/// Scores of all modules. Weights of modules with status != unavailable
/// always sum to 1.0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScoreBreakdown {
    pub modules: Vec<ModuleScore>,
}

impl ScoreBreakdown {
    pub fn get(&self, module: Module) -> Option<&ModuleScore> {
        self.modules.iter().find(|m| m.module == module)
    }
}

/// The final audit result, rendered identically as console text or JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Audited URL
    pub url: String,
    /// Overall GEO score (0-100)
    pub overall_score: u8,
    pub breakdown: ScoreBreakdown,
    pub recommendations: Vec<Recommendation>,
    /// Findings of all modules, in module order
    pub findings: Vec<Finding>,
    pub generated_at: DateTime<Utc>,
}

/// Public API: run all analyzers over an already-fetched input and aggregate
/// the results into a report.
pub fn audit(input: &analyzer::AuditInput, config: &config::Config) -> Report {
    let results = analyzer::run_analyzers(input, config);
    scorer::Scorer::new(config).finalize(input.url.as_str(), results)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scored_finding_derives_status() {
        let pass = Finding::scored(
            Rule::AnswerCapsules,
            Module::Structure,
            0.35,
            1.0,
            "all capsules present",
            "n/a",
        );
        assert_eq!(pass.status, FindingStatus::Pass);
        assert!(pass.remediation.is_none());

        let partial = Finding::scored(
            Rule::AnswerCapsules,
            Module::Structure,
            0.35,
            0.5,
            "half present",
            "add capsules",
        );
        assert_eq!(partial.status, FindingStatus::Partial);
        assert!(partial.remediation.is_some());

        let fail = Finding::scored(
            Rule::AnswerCapsules,
            Module::Structure,
            0.35,
            0.0,
            "none",
            "add capsules",
        );
        assert_eq!(fail.status, FindingStatus::Fail);
    }

    #[test]
    fn raw_score_is_weighted_mean() {
        let result = AnalyzerResult::ok(
            Module::Structure,
            vec![
                Finding::pass(Rule::HeadingHierarchy, Module::Structure, 3.0, "ok"),
                Finding::fail(Rule::DeepAnchors, Module::Structure, 1.0, "none", "add ids"),
            ],
        );
        // (1.0*3 + 0.0*1) / 4 = 0.75
        assert!((result.raw_score() - 75.0).abs() < 1e-9);
    }

    #[test]
    fn raw_score_respects_cap() {
        let result = AnalyzerResult::ok(
            Module::StructuredData,
            vec![Finding::pass(
                Rule::ContentFreshness,
                Module::StructuredData,
                1.0,
                "fresh",
            )],
        )
        .with_cap(20.0);
        assert!((result.raw_score() - 20.0).abs() < 1e-9);
    }

    #[test]
    fn raw_score_empty_findings_is_zero() {
        let result = AnalyzerResult::unavailable(Module::SiteAuthority);
        assert_eq!(result.raw_score(), 0.0);
    }

    #[test]
    fn priority_orders_critical_first() {
        let mut priorities = vec![Priority::Low, Priority::Critical, Priority::Medium];
        priorities.sort();
        assert_eq!(priorities[0], Priority::Critical);
        assert_eq!(priorities[2], Priority::Low);
    }

    #[test]
    fn rule_display_is_kebab_case() {
        assert_eq!(Rule::BotAccess.to_string(), "bot-access");
        assert_eq!(Rule::AnswerCapsules.to_string(), "answer-capsules");
        assert_eq!(Rule::MalformedJsonLd.to_string(), "malformed-json-ld");
    }
}
