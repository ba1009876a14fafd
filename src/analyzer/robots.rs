//! Robots access analyzer.
//!
//! Parses robots.txt and checks whether each AI crawler in the configured
//! bot registry may fetch the audited page. Matching follows the standard
//! semantics: the group with the most specific user-agent token applies,
//! the longest matching path rule wins, and Allow beats Disallow of equal
//! length. A missing or unreadable robots.txt is allow-all, not a failure.

use super::{Analyzer, AuditInput};
use crate::config::Config;
use crate::{AnalyzerResult, Finding, Module, Rule};

pub struct RobotsAnalyzer;

impl Analyzer for RobotsAnalyzer {
    fn module(&self) -> Module {
        Module::RobotsAccess
    }

    fn analyze(&self, input: &AuditInput, config: &Config) -> AnalyzerResult {
        let path = input.page_path();

        let text = match input.robots.as_deref() {
            Some(text) if !text.trim().is_empty() => text,
            _ => {
                let mut findings = vec![Finding {
                    rule: Rule::RobotsUnreachable,
                    module: Module::RobotsAccess,
                    status: crate::FindingStatus::Pass,
                    score: 1.0,
                    weight: 0.0,
                    detail: "robots.txt is missing or unreadable; treating as allow-all"
                        .to_string(),
                    remediation: None,
                }];
                for bot in &config.bots {
                    findings.push(Finding::pass(
                        Rule::BotAccess,
                        Module::RobotsAccess,
                        1.0,
                        format!("{bot} is allowed (no robots.txt)"),
                    ));
                }
                return AnalyzerResult::degraded(Module::RobotsAccess, findings);
            }
        };

        let robots = RobotsTxt::parse(text);
        let findings = config
            .bots
            .iter()
            .map(|bot| {
                if robots.is_allowed(bot, path) {
                    Finding::pass(
                        Rule::BotAccess,
                        Module::RobotsAccess,
                        1.0,
                        format!("{bot} is allowed to fetch {path}"),
                    )
                } else {
                    Finding::fail(
                        Rule::BotAccess,
                        Module::RobotsAccess,
                        1.0,
                        format!("{bot} is blocked from {path} by robots.txt"),
                        format!("Unblock {bot} in robots.txt so AI answer engines can cite this page"),
                    )
                }
            })
            .collect();

        AnalyzerResult::ok(Module::RobotsAccess, findings)
    }
}

/// One user-agent group's path rules
#[derive(Debug, Default)]
struct Group {
    agents: Vec<String>,
    /// (allow, pattern) pairs in file order
    rules: Vec<(bool, String)>,
}

/// Parsed robots.txt
#[derive(Debug, Default)]
pub struct RobotsTxt {
    groups: Vec<Group>,
}

impl RobotsTxt {
    pub fn parse(text: &str) -> Self {
        let mut groups: Vec<Group> = Vec::new();
        let mut current: Option<Group> = None;
        // Consecutive User-agent lines share the following rules
        let mut collecting_agents = false;

        for line in text.lines() {
            let line = line.split('#').next().unwrap_or("").trim();
            if line.is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let key = key.trim().to_ascii_lowercase();
            let value = value.trim();

            match key.as_str() {
                "user-agent" => {
                    if !collecting_agents {
                        if let Some(group) = current.take() {
                            groups.push(group);
                        }
                        current = Some(Group::default());
                        collecting_agents = true;
                    }
                    if let Some(group) = current.as_mut() {
                        group.agents.push(value.to_ascii_lowercase());
                    }
                }
                "allow" | "disallow" => {
                    collecting_agents = false;
                    if let Some(group) = current.as_mut() {
                        // Empty Disallow means allow everything; no rule needed
                        if !value.is_empty() {
                            group.rules.push((key == "allow", value.to_string()));
                        }
                    }
                }
                // crawl-delay, sitemap, and unknown directives end the
                // user-agent run but carry no path rules
                _ => collecting_agents = false,
            }
        }
        if let Some(group) = current.take() {
            groups.push(group);
        }

        Self { groups }
    }

    /// Whether `agent` may fetch `path` under these rules
    pub fn is_allowed(&self, agent: &str, path: &str) -> bool {
        let rules = self.rules_for(agent);

        let mut best_len = 0usize;
        let mut allowed = true;
        for (allow, pattern) in rules {
            if !path_matches(path, pattern) {
                continue;
            }
            let len = pattern.len();
            // Longest match wins; Allow wins ties
            if len > best_len || (len == best_len && *allow) {
                best_len = len;
                allowed = *allow;
            }
        }
        allowed
    }

    /// Rules applying to `agent`: every group carrying the longest matching
    /// user-agent token, merged (a crawler's groups may be split across the
    /// file); the `*` groups apply when no token matches.
    fn rules_for(&self, agent: &str) -> Vec<&(bool, String)> {
        let agent_lower = agent.to_ascii_lowercase();

        let mut best_len = 0usize;
        for group in &self.groups {
            for token in &group.agents {
                if token != "*" && agent_lower.contains(token.as_str()) && token.len() > best_len {
                    best_len = token.len();
                }
            }
        }

        let applies = |group: &&Group| -> bool {
            if best_len > 0 {
                group.agents.iter().any(|token| {
                    token != "*"
                        && token.len() == best_len
                        && agent_lower.contains(token.as_str())
                })
            } else {
                group.agents.iter().any(|token| token == "*")
            }
        };

        self.groups
            .iter()
            .filter(applies)
            .flat_map(|group| group.rules.iter())
            .collect()
    }
}

/// robots.txt path pattern match: prefix semantics with `*` wildcards and an
/// optional `$` end anchor. An anchored final segment is matched as a suffix,
/// so a wildcard can absorb repeats of it (`/*.pdf$` matches `/x.pdf.pdf`).
fn path_matches(path: &str, pattern: &str) -> bool {
    let (pattern, anchored) = match pattern.strip_suffix('$') {
        Some(p) => (p, true),
        None => (pattern, false),
    };

    let mut parts = pattern.split('*');
    let first = parts.next().unwrap_or("");
    let Some(mut rest) = path.strip_prefix(first) else {
        return false;
    };

    let segments: Vec<&str> = parts.collect();
    for (i, segment) in segments.iter().enumerate() {
        let last = i + 1 == segments.len();
        if segment.is_empty() {
            // Trailing wildcard matches anything left
            if last {
                return true;
            }
            continue;
        }
        if last && anchored {
            return rest.ends_with(segment);
        }
        match rest.find(segment) {
            Some(pos) => rest = &rest[pos + segment.len()..],
            None => return false,
        }
    }

    !anchored || rest.is_empty()
}
