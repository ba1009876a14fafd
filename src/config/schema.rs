//! Config schema and deserialization.
//!
//! All scoring policy lives here: module weights, finding weights, the bot
//! registry, pattern tables, and thresholds. Every field has a default so an
//! empty config file (or no file at all) yields the documented defaults.

use serde::Deserialize;
use crate::Module;

/// Per-module share of the overall score. Must sum to 1.0 when every module
/// is available; the scorer renormalizes when a module is unavailable.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModuleWeights {
    pub robots_access: f64,
    pub structure: f64,
    pub structured_data: f64,
    pub credibility: f64,
    pub page_size: f64,
    pub site_authority: f64,
}

impl Default for ModuleWeights {
    fn default() -> Self {
        Self {
            robots_access: 0.15,
            structure: 0.25,
            structured_data: 0.20,
            credibility: 0.20,
            page_size: 0.05,
            site_authority: 0.15,
        }
    }
}

impl ModuleWeights {
    pub fn for_module(&self, module: Module) -> f64 {
        match module {
            Module::RobotsAccess => self.robots_access,
            Module::Structure => self.structure,
            Module::StructuredData => self.structured_data,
            Module::Credibility => self.credibility,
            Module::PageSize => self.page_size,
            Module::SiteAuthority => self.site_authority,
        }
    }
}

/// Finding weights within the structure module. Hierarchy and answer capsules
/// carry the most weight since they most directly affect excerptability.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StructureWeights {
    pub heading_hierarchy: f64,
    pub answer_capsules: f64,
    pub interrogative_headings: f64,
    pub deep_anchors: f64,
}

impl Default for StructureWeights {
    fn default() -> Self {
        Self {
            heading_hierarchy: 0.35,
            answer_capsules: 0.35,
            interrogative_headings: 0.15,
            deep_anchors: 0.15,
        }
    }
}

/// Finding weights within the structured-data module
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaWeights {
    pub presence: f64,
    pub entity_links: f64,
    pub freshness: f64,
    /// Weight of each malformed-block finding (additive, one per bad block)
    pub malformed_block: f64,
    /// Ceiling on the module score (0-100) when no relevant schema is found
    pub missing_schema_cap: f64,
}

impl Default for SchemaWeights {
    fn default() -> Self {
        Self {
            presence: 0.40,
            entity_links: 0.30,
            freshness: 0.30,
            malformed_block: 0.10,
            missing_schema_cap: 20.0,
        }
    }
}

/// Finding weights within the credibility module
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CredibilityWeights {
    pub author_bio: f64,
    pub profile_links: f64,
    pub citation_density: f64,
    pub factual_density: f64,
}

impl Default for CredibilityWeights {
    fn default() -> Self {
        Self {
            author_bio: 0.30,
            profile_links: 0.15,
            citation_density: 0.30,
            factual_density: 0.25,
        }
    }
}

/// Page size thresholds in decoded bytes
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PageSizeThresholds {
    /// Below this the page passes without any alert
    pub warn_bytes: usize,
    /// Above this the page fails outright
    pub max_bytes: usize,
}

impl Default for PageSizeThresholds {
    fn default() -> Self {
        Self {
            warn_bytes: 2_000_000,
            max_bytes: 5_000_000,
        }
    }
}

/// Site-authority thresholds and finding weights
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorityConfig {
    /// Minimum indexed-page count considered healthy
    pub min_indexed: u64,
    /// How many SERP results to scan for the audited domain
    pub top_n: usize,
    pub indexed_weight: f64,
    pub serp_weight: f64,
}

impl Default for AuthorityConfig {
    fn default() -> Self {
        Self {
            min_indexed: 5,
            top_n: 10,
            indexed_weight: 0.60,
            serp_weight: 0.40,
        }
    }
}

/// Root config structure for geoaudit.json
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Minimum overall score (exit 1 if below). Default: none.
    pub threshold: Option<u8>,

    pub module_weights: ModuleWeights,
    pub structure_weights: StructureWeights,
    pub schema_weights: SchemaWeights,
    pub credibility_weights: CredibilityWeights,
    pub page_size: PageSizeThresholds,
    pub authority: AuthorityConfig,

    /// AI crawler user-agent tokens checked against robots.txt
    pub bots: Vec<String>,

    /// Words that mark a heading as a question (locale-aware, lowercase)
    pub interrogative_patterns: Vec<String>,

    /// schema.org @type values considered relevant
    pub schema_types: Vec<String>,

    /// Knowledge-graph domains accepted in sameAs links
    pub knowledge_graph_patterns: Vec<String>,

    /// Professional-identity URL fragments (bylines, author profiles)
    pub profile_patterns: Vec<String>,

    /// Byline phrases accepted as author-bio evidence (lowercase)
    pub byline_patterns: Vec<String>,

    /// Hosts excluded from external citation counting (share widgets)
    pub excluded_citation_hosts: Vec<String>,

    /// dateModified/datePublished older than this many days is stale
    pub freshness_days: i64,

    /// External links per 1000 words at which citation credit saturates
    pub citation_saturation: f64,

    /// Fraction of numeric sentences beyond which factual credit saturates
    pub factual_density_ceiling: f64,

    /// Maximum recommendation list length
    pub max_recommendations: usize,

    /// HTTP timeout for page, robots.txt, and authority fetches
    pub timeout_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            threshold: None,
            module_weights: ModuleWeights::default(),
            structure_weights: StructureWeights::default(),
            schema_weights: SchemaWeights::default(),
            credibility_weights: CredibilityWeights::default(),
            page_size: PageSizeThresholds::default(),
            authority: AuthorityConfig::default(),
            bots: vec![
                "GPTBot".to_string(),
                "ClaudeBot".to_string(),
                "PerplexityBot".to_string(),
                "GoogleOther".to_string(),
                "Applebot-Extended".to_string(),
            ],
            interrogative_patterns: [
                "how", "what", "why", "when", "where", "which", "who", "como", "o que", "por que",
                "quando", "onde", "qual", "quem",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            schema_types: [
                "Organization",
                "Person",
                "FAQPage",
                "Article",
                "NewsArticle",
                "BlogPosting",
                "Product",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            knowledge_graph_patterns: [
                "wikidata.org",
                "wikipedia.org",
                "google.com/search",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            profile_patterns: ["linkedin.com/in", "orcid.org"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            byline_patterns: [
                "written by",
                "about the author",
                "escrito por",
                "sobre o autor",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            excluded_citation_hosts: [
                "facebook.com",
                "twitter.com",
                "x.com",
                "instagram.com",
                "linkedin.com",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            freshness_days: 90,
            citation_saturation: 5.0,
            factual_density_ceiling: 0.25,
            max_recommendations: 10,
            timeout_secs: 5,
        }
    }
}

impl Config {
    /// Merge CLI overrides into config. CLI values take precedence.
    pub fn merge_with_cli(
        mut self,
        cli_threshold: Option<u8>,
        cli_timeout: Option<u64>,
        cli_max_recommendations: Option<usize>,
    ) -> Self {
        if cli_threshold.is_some() {
            self.threshold = cli_threshold;
        }
        if let Some(timeout) = cli_timeout {
            self.timeout_secs = timeout;
        }
        if let Some(max) = cli_max_recommendations {
            self.max_recommendations = max;
        }
        self
    }
}
