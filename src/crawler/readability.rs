//! Readable text extraction from HTML
//!
//! Two passes are provided:
//! - [`extract_main_text`]: focused extraction that isolates the primary
//!   content of a page and discards navigation and other boilerplate
//! - [`extract_visible_text`]: every visible text node of a rendered page,
//!   one per line
//!
//! Both collapse runs of whitespace and return `None` when nothing is left.

use scraper::node::Element;
use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;

/// Containers that usually hold the primary content, most specific first
const CONTENT_CONTAINERS: &[&str] = &[
    "article",
    "main",
    "[role='main']",
    "#mw-content-text",
    "#main-content",
    ".main-content",
    "#content",
    ".entry-content",
    ".post-content",
];

static CONTENT_SELECTORS: LazyLock<Vec<Selector>> = LazyLock::new(|| {
    CONTENT_CONTAINERS
        .iter()
        .map(|css| {
            Selector::parse(css)
                .unwrap_or_else(|_| panic!("BUG: hardcoded CSS selector '{}' is invalid", css))
        })
        .collect()
});

/// Elements scored when no content container is present
static SCORED_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div, section, td")
        .expect("BUG: hardcoded CSS selector 'div, section, td' is invalid")
});

static BODY_SELECTOR: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("body").expect("BUG: hardcoded CSS selector 'body' is invalid")
});

/// Children counted as paragraph text when scoring a candidate
const PARAGRAPH_TAGS: &[&str] = &["p", "pre", "blockquote"];

/// Never readable, in either pass
const NON_TEXT_TAGS: &[&str] = &[
    "script", "style", "noscript", "template", "svg", "canvas", "iframe", "object",
];

/// Page chrome dropped by focused extraction
const BOILERPLATE_TAGS: &[&str] = &[
    "nav", "header", "footer", "aside", "form", "button", "select", "menu", "dialog",
];

/// Class/id fragments that mark boilerplate blocks
const BOILERPLATE_MARKERS: &[&str] = &[
    "sidebar",
    "navbar",
    "navigation",
    "menu",
    "breadcrumb",
    "footer",
    "header",
    "cookie",
    "banner",
    "advert",
    "promo",
    "social",
    "share",
    "comment",
    "related",
    "newsletter",
    "popup",
    "modal",
];

/// Elements that end the current line of text
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "figcaption", "figure",
    "h1", "h2", "h3", "h4", "h5", "h6", "hr", "li", "main", "ol", "p", "pre", "section", "table",
    "tbody", "td", "th", "thead", "tr", "ul",
];

/// Extracts the primary readable content of a page
///
/// The first non-empty well-known content container wins (`<article>`,
/// `<main>`, `#content`, ...). Without one, the `div`/`section`/`td` with
/// the most paragraph text is chosen, falling back to `<body>`. Navigation,
/// headers, footers, sidebars, forms and similar blocks are discarded.
///
/// # Example
///
/// ```
/// use focus_crawl::crawler::extract_main_text;
///
/// let html = r#"<html><body>
///     <nav><a href="/">Home</a></nav>
///     <article><h1>Title</h1><p>Body text.</p></article>
/// </body></html>"#;
/// assert_eq!(extract_main_text(html).as_deref(), Some("Title\nBody text."));
/// ```
pub fn extract_main_text(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    for selector in CONTENT_SELECTORS.iter() {
        for container in document.select(selector) {
            if is_boilerplate(container.value()) {
                continue;
            }
            if let Some(text) = collect_text(container, true) {
                return Some(text);
            }
        }
    }

    if let Some(candidate) = best_scored_candidate(&document) {
        if let Some(text) = collect_text(candidate, true) {
            return Some(text);
        }
    }

    let root = document
        .select(&BODY_SELECTOR)
        .next()
        .unwrap_or_else(|| document.root_element());
    collect_text(root, true)
}

/// Extracts every visible text node of a document, one per line
///
/// Tags are stripped, each text node is trimmed and its inner whitespace
/// collapsed, and the non-empty nodes are joined with newlines. Script and
/// style contents are not text and are skipped.
pub fn extract_visible_text(document: &Html) -> Option<String> {
    let mut lines = Vec::new();
    collect_text_nodes(document.root_element(), &mut lines);

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn collect_text_nodes(element: ElementRef<'_>, lines: &mut Vec<String>) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => {
                let line = collapse_whitespace(text);
                if !line.is_empty() {
                    lines.push(line);
                }
            }
            Node::Element(el) if NON_TEXT_TAGS.contains(&el.name()) => {}
            Node::Element(_) => {
                if let Some(child_ref) = ElementRef::wrap(child) {
                    collect_text_nodes(child_ref, lines);
                }
            }
            _ => {}
        }
    }
}

/// Picks the element whose direct paragraph children carry the most text
fn best_scored_candidate(document: &Html) -> Option<ElementRef<'_>> {
    document
        .select(&SCORED_SELECTOR)
        .filter(|candidate| !is_boilerplate(candidate.value()))
        .map(|candidate| (paragraph_score(candidate), candidate))
        .filter(|(score, _)| *score > 0)
        .max_by_key(|(score, _)| *score)
        .map(|(_, candidate)| candidate)
}

fn paragraph_score(candidate: ElementRef<'_>) -> usize {
    candidate
        .children()
        .filter_map(ElementRef::wrap)
        .filter(|child| PARAGRAPH_TAGS.contains(&child.value().name()))
        .map(|child| child.text().map(|t| t.trim().len()).sum::<usize>())
        .sum()
}

fn is_boilerplate(element: &Element) -> bool {
    if BOILERPLATE_TAGS.contains(&element.name()) {
        return true;
    }

    if element.attr("hidden").is_some() || element.attr("aria-hidden") == Some("true") {
        return true;
    }

    let id = element.id().unwrap_or("").to_ascii_lowercase();
    let class = element.attr("class").unwrap_or("").to_ascii_lowercase();
    BOILERPLATE_MARKERS
        .iter()
        .any(|marker| id.contains(marker) || class.contains(marker))
}

/// Gathers the text below `root`, one line per block element
fn collect_text(root: ElementRef<'_>, skip_boilerplate: bool) -> Option<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    walk(root, skip_boilerplate, &mut lines, &mut line);
    flush_line(&mut line, &mut lines);

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn walk(
    element: ElementRef<'_>,
    skip_boilerplate: bool,
    lines: &mut Vec<String>,
    line: &mut String,
) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => line.push_str(text),
            Node::Element(el) => {
                if NON_TEXT_TAGS.contains(&el.name())
                    || (skip_boilerplate && is_boilerplate(el))
                {
                    continue;
                }

                let is_block = BLOCK_TAGS.contains(&el.name());
                if is_block {
                    flush_line(line, lines);
                }

                if let Some(child_ref) = ElementRef::wrap(child) {
                    walk(child_ref, skip_boilerplate, lines, line);
                }

                if is_block {
                    flush_line(line, lines);
                }
            }
            _ => {}
        }
    }
}

fn flush_line(line: &mut String, lines: &mut Vec<String>) {
    let collapsed = collapse_whitespace(line);
    if !collapsed.is_empty() {
        lines.push(collapsed);
    }
    line.clear();
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
