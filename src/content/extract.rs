//! Structured extraction from a parsed document
//!
//! Pulls the title, a flattened plain-text stream, and every anchor href
//! out of a page. Text is gathered per category (paragraphs, headings,
//! list items, non-chrome divs) in document order within each category;
//! a failure in one category never blocks the others.

use scraper::{ElementRef, Html, Selector};

/// Class-name fragments marking page chrome rather than article content
const CHROME_CLASS_PATTERNS: &[&str] = &["header", "footer", "nav", "menu"];

/// Everything extracted from one parsed page
#[derive(Debug, Clone, Default)]
pub struct ExtractedContent {
    /// Content of the first `<title>` element, if any
    pub title: Option<String>,

    /// Flattened text blocks in category order
    pub text_blocks: Vec<String>,

    /// Raw `href` values of every anchor, in document order
    ///
    /// Relative and malformed values are included; resolution happens in
    /// the link classifier.
    pub hrefs: Vec<String>,
}

/// Extracts title, text content, and anchor hrefs from a document
pub fn extract_content(document: &Html) -> ExtractedContent {
    let title = extract_title(document);

    let mut text_blocks = Vec::new();
    text_blocks.extend(collect_text(document, "p", |_| true));
    text_blocks.extend(collect_text(document, "h1, h2, h3, h4, h5, h6", |_| true));
    text_blocks.extend(collect_text(document, "li", |_| true));
    text_blocks.extend(collect_text(document, "div", |el| !is_chrome_div(el)));

    let hrefs = collect_hrefs(document);

    ExtractedContent {
        title,
        text_blocks,
        hrefs,
    }
}

/// Extracts the page title from the document
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").ok()?;

    document
        .select(&selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Collects trimmed, whitespace-collapsed text for one category
///
/// A selector that fails to parse yields an empty contribution and a
/// warning rather than aborting the page.
fn collect_text<F>(document: &Html, selector_str: &str, keep: F) -> Vec<String>
where
    F: Fn(&ElementRef) -> bool,
{
    let selector = match Selector::parse(selector_str) {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(selector = selector_str, error = %e, "bad selector, category skipped");
            return Vec::new();
        }
    };

    document
        .select(&selector)
        .filter(|element| keep(element))
        .filter_map(|element| {
            let text = collapse_whitespace(&element.text().collect::<String>());
            if text.is_empty() {
                None
            } else {
                Some(text)
            }
        })
        .collect()
}

/// Collects the raw href attribute of every anchor, in document order
fn collect_hrefs(document: &Html) -> Vec<String> {
    let selector = match Selector::parse("a") {
        Ok(s) => s,
        Err(e) => {
            tracing::warn!(error = %e, "bad anchor selector, no links extracted");
            return Vec::new();
        }
    };

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.to_string())
        .collect()
}

/// Returns true if a div looks like page chrome (header/footer/nav/menu)
fn is_chrome_div(element: &ElementRef) -> bool {
    element
        .value()
        .attr("class")
        .map(|class| {
            let class = class.to_lowercase();
            CHROME_CLASS_PATTERNS
                .iter()
                .any(|pattern| class.contains(pattern))
        })
        .unwrap_or(false)
}

/// Collapses internal whitespace runs to single spaces and trims the ends
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
