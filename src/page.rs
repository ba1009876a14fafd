//! Page model extraction.
//!
//! Parses the fetched HTML once with `scraper` and reduces it to an owned,
//! `Send` snapshot with exactly the accessors the analyzers need (headings,
//! following paragraphs, links, JSON-LD blocks, visible text). Analyzers then
//! run in parallel over the snapshot without touching the DOM tree.

use crate::error::AuditError;
use ego_tree::NodeId;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::LazyLock;

static BLOCK_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("h1,h2,h3,h4,h5,h6,p").expect("block selector is valid")
});

static ANCHOR_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("anchor selector is valid"));

static JSON_LD_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(r#"script[type="application/ld+json"]"#).expect("json-ld selector is valid")
});

static ID_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("[id]").expect("id selector is valid"));

/// A heading in document order
#[derive(Debug, Clone)]
pub struct Heading {
    /// 1 for h1 through 6 for h6
    pub level: u8,
    /// Whitespace-normalized text content
    pub text: String,
    /// Fragment anchor usable for deep links: the heading's own `id`, or the
    /// `id` of its nearest section/article/div ancestor. An id owned by an
    /// earlier element in the document resolves there, not here, so it does
    /// not qualify.
    pub anchor_id: Option<String>,
    /// Word count of the first paragraph following this heading, if any
    pub following_paragraph_words: Option<usize>,
}

/// Owned snapshot of one parsed HTML document
#[derive(Debug, Clone)]
pub struct PageModel {
    pub headings: Vec<Heading>,
    /// Raw href values of every `<a href>` element
    pub links: Vec<String>,
    /// Raw text of every JSON-LD script block
    pub json_ld: Vec<String>,
    /// Visible text content (script/style excluded), whitespace-normalized
    pub text: String,
    pub word_count: usize,
}

/// Parse an HTML payload into a page model.
///
/// An empty payload or one with no markup at all is a fatal input error; a
/// partially broken document still yields a model (html5ever recovers).
pub fn parse_page(html: &str) -> Result<PageModel, AuditError> {
    if html.trim().is_empty() {
        return Err(AuditError::FatalInput(
            "page payload is empty".to_string(),
        ));
    }
    if !html.contains('<') {
        return Err(AuditError::FatalInput(
            "page payload does not look like an HTML document".to_string(),
        ));
    }

    let document = Html::parse_document(html);

    // First document-order owner of each id; a duplicated id resolves to
    // this element only.
    let mut id_owners: HashMap<String, NodeId> = HashMap::new();
    for element in document.select(&ID_SELECTOR) {
        if let Some(id) = element.value().attr("id") {
            id_owners.entry(id.to_string()).or_insert_with(|| element.id());
        }
    }

    let mut headings = Vec::new();
    for element in document.select(&BLOCK_SELECTOR) {
        let tag = element.value().name();
        if let Some(level) = heading_level(tag) {
            headings.push(Heading {
                level,
                text: normalize_whitespace(&element.text().collect::<String>()),
                anchor_id: anchor_for(element, &id_owners),
                following_paragraph_words: None,
            });
        } else {
            // First non-empty paragraph after the most recent heading
            let words = element.text().collect::<String>();
            let count = words.split_whitespace().count();
            if count == 0 {
                continue;
            }
            if let Some(last) = headings.last_mut() {
                if last.following_paragraph_words.is_none() {
                    last.following_paragraph_words = Some(count);
                }
            }
        }
    }

    let links: Vec<String> = document
        .select(&ANCHOR_SELECTOR)
        .filter_map(|a| a.value().attr("href"))
        .map(|href| href.trim().to_string())
        .filter(|href| !href.is_empty())
        .collect();

    let json_ld: Vec<String> = document
        .select(&JSON_LD_SELECTOR)
        .map(|script| script.text().collect::<String>())
        .filter(|block| !block.trim().is_empty())
        .collect();

    let mut raw_text = String::new();
    collect_text(document.root_element(), &mut raw_text);
    let text = normalize_whitespace(&raw_text);
    let word_count = text.split_whitespace().count();

    log::debug!(
        "parsed page: {} headings, {} links, {} json-ld blocks, {} words",
        headings.len(),
        links.len(),
        json_ld.len(),
        word_count
    );

    Ok(PageModel {
        headings,
        links,
        json_ld,
        text,
        word_count,
    })
}

fn heading_level(tag: &str) -> Option<u8> {
    match tag {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

/// Fragment anchor for a heading: its own id, else the id of the nearest
/// wrapping section/article/div. Only the document's first owner of an id
/// counts; a duplicate points the fragment at the earlier element.
fn anchor_for(element: ElementRef, id_owners: &HashMap<String, NodeId>) -> Option<String> {
    if let Some(id) = element.value().attr("id") {
        if id_owners.get(id) == Some(&element.id()) {
            return Some(id.to_string());
        }
    }
    for ancestor in element.ancestors() {
        if let Some(ancestor_el) = ElementRef::wrap(ancestor) {
            let name = ancestor_el.value().name();
            if matches!(name, "section" | "article" | "div") {
                if let Some(id) = ancestor_el.value().attr("id") {
                    if id_owners.get(id) == Some(&ancestor_el.id()) {
                        return Some(id.to_string());
                    }
                }
            }
        }
    }
    None
}

/// Collect visible text, skipping script and style subtrees
fn collect_text(element: ElementRef, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_el) = ElementRef::wrap(child) {
            let name = child_el.value().name();
            if name != "script" && name != "style" {
                collect_text(child_el, out);
            }
        }
    }
}

fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_payload_is_fatal() {
        assert!(matches!(
            parse_page("   "),
            Err(AuditError::FatalInput(_))
        ));
    }

    #[test]
    fn non_markup_payload_is_fatal() {
        assert!(matches!(
            parse_page("just a plain sentence"),
            Err(AuditError::FatalInput(_))
        ));
    }

    #[test]
    fn extracts_headings_in_document_order() {
        let page = parse_page(
            "<html><body><h1>Title</h1><h2 id=\"a\">First</h2><p>text</p><h3>Second</h3></body></html>",
        )
        .unwrap();
        assert_eq!(page.headings.len(), 3);
        assert_eq!(page.headings[0].level, 1);
        assert_eq!(page.headings[1].text, "First");
        assert_eq!(page.headings[1].anchor_id.as_deref(), Some("a"));
        assert_eq!(page.headings[2].level, 3);
    }

    #[test]
    fn first_following_paragraph_word_count() {
        let words_30 = (0..30).map(|i| format!("w{i}")).collect::<Vec<_>>().join(" ");
        let html = format!("<h2>Q?</h2><p>{words_30}</p><p>later one</p>");
        let page = parse_page(&html).unwrap();
        assert_eq!(page.headings[0].following_paragraph_words, Some(30));
    }

    #[test]
    fn heading_without_paragraph_has_none() {
        let page = parse_page("<h2>Lonely</h2><h3>Next</h3><p>tail words here</p>").unwrap();
        assert_eq!(page.headings[0].following_paragraph_words, None);
        assert_eq!(page.headings[1].following_paragraph_words, Some(3));
    }

    #[test]
    fn anchor_falls_back_to_wrapping_section() {
        let page =
            parse_page("<section id=\"intro\"><h2>Inside</h2><p>x y z</p></section>").unwrap();
        assert_eq!(page.headings[0].anchor_id.as_deref(), Some("intro"));
    }

    #[test]
    fn id_owned_by_an_earlier_element_is_not_an_anchor() {
        let page = parse_page("<div id=\"x\">decoy</div><h1 id=\"x\">Title</h1>").unwrap();
        assert_eq!(page.headings[0].anchor_id, None);
    }

    #[test]
    fn first_owner_of_a_duplicated_id_keeps_its_anchor() {
        let page = parse_page("<h1 id=\"x\">Title</h1><div id=\"x\">decoy</div>").unwrap();
        assert_eq!(page.headings[0].anchor_id.as_deref(), Some("x"));
    }

    #[test]
    fn text_excludes_script_and_style() {
        let page = parse_page(
            "<body><p>visible words</p><script>var hidden = 42;</script><style>p{}</style></body>",
        )
        .unwrap();
        assert!(page.text.contains("visible words"));
        assert!(!page.text.contains("hidden"));
        assert_eq!(page.word_count, 2);
    }

    #[test]
    fn collects_json_ld_blocks() {
        let page = parse_page(
            r#"<script type="application/ld+json">{"@type":"Article"}</script><p>hi there</p>"#,
        )
        .unwrap();
        assert_eq!(page.json_ld.len(), 1);
        assert!(page.json_ld[0].contains("Article"));
    }
}
