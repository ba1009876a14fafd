//! Structure & semantics analyzer.
//!
//! Four findings over the page model: heading hierarchy validity,
//! interrogative H2/H3 phrasing, answer capsules (a 40-60 word paragraph
//! right after a heading), and deep anchors (unique fragment ids on
//! sections). Hierarchy and capsules carry the highest weights since they
//! most directly affect how quotable the page is.

use super::{Analyzer, AuditInput};
use crate::config::Config;
use crate::page::Heading;
use crate::{AnalyzerResult, Finding, Module, Rule};
use std::collections::HashSet;

/// Answer capsule word-count bounds, inclusive
const CAPSULE_MIN_WORDS: usize = 40;
const CAPSULE_MAX_WORDS: usize = 60;

pub struct StructureAnalyzer;

impl Analyzer for StructureAnalyzer {
    fn module(&self) -> Module {
        Module::Structure
    }

    fn analyze(&self, input: &AuditInput, config: &Config) -> AnalyzerResult {
        let headings = &input.page.headings;
        let weights = &config.structure_weights;

        let findings = vec![
            hierarchy_finding(headings, weights.heading_hierarchy),
            interrogative_finding(headings, config, weights.interrogative_headings),
            capsules_finding(headings, weights.answer_capsules),
            anchors_finding(input, weights.deep_anchors),
        ];

        AnalyzerResult::ok(Module::Structure, findings)
    }
}

/// Exactly one H1 and no skipped levels while descending
fn hierarchy_finding(headings: &[Heading], weight: f64) -> Finding {
    let mut violations = Vec::new();

    let h1_count = headings.iter().filter(|h| h.level == 1).count();
    match h1_count {
        0 => violations.push("no top-level heading (H1) found".to_string()),
        1 => {}
        n => violations.push(format!("{n} top-level headings (H1); expected exactly one")),
    }

    let mut prev_level = 0u8;
    for heading in headings {
        if prev_level > 0 && heading.level > prev_level + 1 {
            violations.push(format!(
                "heading level jumps from H{} to H{} at \"{}\"",
                prev_level, heading.level, heading.text
            ));
        }
        prev_level = heading.level;
    }

    if violations.is_empty() {
        Finding::pass(
            Rule::HeadingHierarchy,
            Module::Structure,
            weight,
            "heading hierarchy is valid: one H1, no skipped levels",
        )
    } else {
        Finding::fail(
            Rule::HeadingHierarchy,
            Module::Structure,
            weight,
            violations.join("; "),
            "Use a single H1 and descend heading levels one step at a time",
        )
    }
}

/// Fraction of H2/H3 headings phrased as questions
fn interrogative_finding(headings: &[Heading], config: &Config, weight: f64) -> Finding {
    let section_headings: Vec<&Heading> = headings
        .iter()
        .filter(|h| h.level == 2 || h.level == 3)
        .collect();

    if section_headings.is_empty() {
        return Finding::fail(
            Rule::InterrogativeHeadings,
            Module::Structure,
            weight,
            "no H2/H3 section headings found",
            "Break content into H2/H3 sections phrased as questions to capture search intent",
        );
    }

    let questions = section_headings
        .iter()
        .filter(|h| is_question(&h.text, &config.interrogative_patterns))
        .count();
    let fraction = questions as f64 / section_headings.len() as f64;

    Finding::scored(
        Rule::InterrogativeHeadings,
        Module::Structure,
        weight,
        fraction,
        format!(
            "{questions} of {} section headings are phrased as questions",
            section_headings.len()
        ),
        "Phrase more H2/H3 headings as questions (e.g. \"What is ...?\")",
    )
}

fn is_question(text: &str, patterns: &[String]) -> bool {
    let trimmed = text.trim();
    if trimmed.ends_with('?') {
        return true;
    }
    let lower = trimmed.to_lowercase();
    patterns.iter().any(|pattern| {
        lower
            .strip_prefix(pattern.as_str())
            .is_some_and(|rest| rest.is_empty() || !rest.starts_with(|c: char| c.is_alphanumeric()))
    })
}

/// Fraction of headings immediately followed by a 40-60 word paragraph
fn capsules_finding(headings: &[Heading], weight: f64) -> Finding {
    if headings.is_empty() {
        return Finding::fail(
            Rule::AnswerCapsules,
            Module::Structure,
            weight,
            "no headings to anchor answer capsules",
            "Add headings followed by concise 40-60 word answer paragraphs",
        );
    }

    let qualifying = headings
        .iter()
        .filter(|h| {
            h.following_paragraph_words
                .is_some_and(|w| (CAPSULE_MIN_WORDS..=CAPSULE_MAX_WORDS).contains(&w))
        })
        .count();
    let fraction = qualifying as f64 / headings.len() as f64;

    Finding::scored(
        Rule::AnswerCapsules,
        Module::Structure,
        weight,
        fraction,
        format!(
            "{qualifying} of {} headings are followed by a {CAPSULE_MIN_WORDS}-{CAPSULE_MAX_WORDS} word answer paragraph",
            headings.len()
        ),
        "Follow each heading with a directly quotable 40-60 word answer paragraph",
    )
}

/// Fraction of headings with a unique fragment anchor; duplicate ids only
/// credit the first heading using them.
fn anchors_finding(input: &AuditInput, weight: f64) -> Finding {
    let headings = &input.page.headings;
    if headings.is_empty() {
        return Finding::fail(
            Rule::DeepAnchors,
            Module::Structure,
            weight,
            "no headings to anchor",
            "Add id attributes to sections so AI engines can deep-link into them",
        );
    }

    // The page model already drops ids owned by an earlier element; the
    // claimed set keeps two headings inside one id-carrying section from
    // both taking credit for the same anchor.
    let mut claimed: HashSet<&str> = HashSet::new();
    let mut anchored = 0usize;
    for heading in headings {
        let Some(id) = heading.anchor_id.as_deref() else {
            continue;
        };
        if claimed.insert(id) {
            anchored += 1;
        }
    }

    let fraction = anchored as f64 / headings.len() as f64;
    Finding::scored(
        Rule::DeepAnchors,
        Module::Structure,
        weight,
        fraction,
        format!(
            "{anchored} of {} headings carry a unique fragment anchor",
            headings.len()
        ),
        "Give each section a unique id attribute for fragment linking",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::test_support::input_from_html;
    use crate::FindingStatus;

    fn analyze(html: &str) -> AnalyzerResult {
        StructureAnalyzer.analyze(&input_from_html(html), &Config::default())
    }

    fn finding(result: &AnalyzerResult, rule: Rule) -> &Finding {
        result.findings.iter().find(|f| f.rule == rule).unwrap()
    }

    fn words(n: usize) -> String {
        (0..n).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn clean_hierarchy_passes() {
        let result = analyze("<h1>A</h1><h2>B</h2><h3>C</h3>");
        assert_eq!(
            finding(&result, Rule::HeadingHierarchy).status,
            FindingStatus::Pass
        );
    }

    #[test]
    fn skipped_level_fails_and_names_the_heading() {
        let result = analyze("<h1>Main</h1><h3>Deep Dive</h3>");
        let f = finding(&result, Rule::HeadingHierarchy);
        assert_eq!(f.status, FindingStatus::Fail);
        assert!(f.detail.contains("Deep Dive"));
        assert!(f.detail.contains("H1"));
        assert!(f.detail.contains("H3"));
    }

    #[test]
    fn missing_h1_fails() {
        let result = analyze("<h2>Only Section</h2>");
        let f = finding(&result, Rule::HeadingHierarchy);
        assert_eq!(f.status, FindingStatus::Fail);
        assert!(f.detail.contains("no top-level heading"));
    }

    #[test]
    fn multiple_h1_fails() {
        let result = analyze("<h1>One</h1><h1>Two</h1>");
        let f = finding(&result, Rule::HeadingHierarchy);
        assert_eq!(f.status, FindingStatus::Fail);
        assert!(f.detail.contains('2'));
    }

    #[test]
    fn question_mark_and_interrogative_prefix_count() {
        let result = analyze(
            "<h1>T</h1><h2>What is GEO</h2><h2>Is it useful?</h2><h2>Conclusion</h2><h3>Como funciona</h3>",
        );
        let f = finding(&result, Rule::InterrogativeHeadings);
        // 3 of 4 section headings are questions
        assert_eq!(f.status, FindingStatus::Partial);
        assert!((f.score - 0.75).abs() < 1e-9);
        assert!(f.detail.contains("3 of 4"));
    }

    #[test]
    fn interrogative_prefix_requires_word_boundary() {
        // "Howard" starts with "how" but is not a question
        assert!(!is_question("Howard's biography", &Config::default().interrogative_patterns));
        assert!(is_question("How GEO works", &Config::default().interrogative_patterns));
    }

    #[test]
    fn fifty_word_paragraph_is_a_capsule() {
        let html = format!("<h1>T</h1><h2>Q?</h2><p>{}</p>", words(50));
        let result = analyze(&html);
        let f = finding(&result, Rule::AnswerCapsules);
        // 1 of 2 headings (the H1 has no following paragraph)
        assert!((f.score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn thirty_and_seventy_word_paragraphs_are_not_capsules() {
        for n in [30usize, 70] {
            let html = format!("<h2>Q?</h2><p>{}</p>", words(n));
            let result = analyze(&html);
            let f = finding(&result, Rule::AnswerCapsules);
            assert_eq!(f.status, FindingStatus::Fail, "{n} words should not qualify");
        }
    }

    #[test]
    fn boundary_word_counts_qualify() {
        for n in [40usize, 60] {
            let html = format!("<h2>Q?</h2><p>{}</p>", words(n));
            let result = analyze(&html);
            let f = finding(&result, Rule::AnswerCapsules);
            assert_eq!(f.status, FindingStatus::Pass, "{n} words should qualify");
        }
    }

    #[test]
    fn unique_anchors_earn_credit() {
        let result = analyze("<h1 id=\"top\">T</h1><h2 id=\"a\">A</h2><h2>B</h2>");
        let f = finding(&result, Rule::DeepAnchors);
        assert!((f.score - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn duplicate_ids_only_credit_the_first() {
        let result = analyze("<h2 id=\"dup\">A</h2><h2 id=\"dup\">B</h2>");
        let f = finding(&result, Rule::DeepAnchors);
        assert!((f.score - 0.5).abs() < 1e-9);
        assert_eq!(f.status, FindingStatus::Partial);
    }

    #[test]
    fn id_taken_by_an_earlier_non_heading_element_earns_no_credit() {
        let result = analyze("<div id=\"x\">some words</div><h1 id=\"x\">Title</h1>");
        let f = finding(&result, Rule::DeepAnchors);
        assert_eq!(f.status, FindingStatus::Fail);
        assert_eq!(f.score, 0.0);
    }

    #[test]
    fn headings_sharing_a_section_anchor_credit_one() {
        let result =
            analyze("<section id=\"s\"><h2>A</h2><p>x</p><h3>B</h3></section>");
        let f = finding(&result, Rule::DeepAnchors);
        assert!((f.score - 0.5).abs() < 1e-9);
    }

    #[test]
    fn no_headings_fails_all_structure_findings() {
        let result = analyze("<p>just a paragraph of text</p>");
        assert_eq!(
            finding(&result, Rule::AnswerCapsules).status,
            FindingStatus::Fail
        );
        assert_eq!(
            finding(&result, Rule::DeepAnchors).status,
            FindingStatus::Fail
        );
    }
}
