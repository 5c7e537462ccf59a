//! HTML sanitization
//!
//! Strips executable and presentational noise from raw HTML while keeping
//! the document structure intact. Malformed input never fails the page:
//! the html5ever parser recovers where it can, and if the rewrite yields
//! nothing usable the raw markup is returned unchanged with a warning.

use ego_tree::NodeRef;
use regex::Regex;
use scraper::node::Node;
use scraper::Html;

/// Elements removed entirely, including their subtrees
///
/// Scripts, styles, embedded plugin containers, frames, and decorative
/// nuisance tags. Comments and processing instructions are dropped at the
/// node level.
const STRIPPED_TAGS: &[&str] = &[
    "script", "style", "noscript", "object", "embed", "applet", "param", "iframe", "frame",
    "frameset", "noframes", "marquee", "blink",
];

/// Elements serialized without a closing tag
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "hr", "img", "input", "link", "meta", "source", "track", "wbr",
];

/// Sanitizes raw HTML, preserving structure and dropping noise
///
/// Inputs larger than `cheap_threshold` bytes skip tree parsing and take a
/// pattern-based strip of script/style/comment blocks instead, trading
/// precision for throughput.
pub fn sanitize_html(raw: &str, cheap_threshold: usize) -> String {
    if raw.len() > cheap_threshold {
        tracing::warn!(
            bytes = raw.len(),
            threshold = cheap_threshold,
            "input exceeds sanitization threshold, using pattern-based strip"
        );
        return cheap_sanitize(raw);
    }

    let document = Html::parse_document(raw);
    let mut out = String::with_capacity(raw.len());
    write_node(document.tree.root(), &mut out);

    if out.trim().is_empty() && !raw.trim().is_empty() {
        tracing::warn!("sanitizer produced no output, keeping raw markup");
        return raw.to_string();
    }

    out
}

/// Pattern-based strip for oversized inputs
fn cheap_sanitize(raw: &str) -> String {
    const STRIP_PATTERNS: &[&str] = &[
        r"(?is)<script\b[^>]*>.*?</script>",
        r"(?is)<style\b[^>]*>.*?</style>",
        r"(?s)<!--.*?-->",
    ];

    let mut cleaned = raw.to_string();
    for pattern in STRIP_PATTERNS {
        match Regex::new(pattern) {
            Ok(re) => cleaned = re.replace_all(&cleaned, "").into_owned(),
            Err(e) => {
                tracing::warn!(pattern, error = %e, "failed to compile strip pattern");
            }
        }
    }
    cleaned
}

/// Re-serializes a node, skipping stripped elements, comments, and PIs
fn write_node(node: NodeRef<'_, Node>, out: &mut String) {
    match node.value() {
        Node::Document | Node::Fragment => {
            for child in node.children() {
                write_node(child, out);
            }
        }
        Node::Doctype(doctype) => {
            out.push_str("<!DOCTYPE ");
            out.push_str(doctype.name());
            out.push('>');
        }
        Node::Comment(_) | Node::ProcessingInstruction(_) => {}
        Node::Text(text) => push_escaped_text(&text.text, out),
        Node::Element(element) => {
            let name = element.name();
            if STRIPPED_TAGS.contains(&name) {
                return;
            }

            out.push('<');
            out.push_str(name);
            for (attr, value) in element.attrs() {
                out.push(' ');
                out.push_str(attr);
                out.push_str("=\"");
                push_escaped_attr(value, out);
                out.push('"');
            }
            out.push('>');

            if VOID_TAGS.contains(&name) {
                return;
            }

            for child in node.children() {
                write_node(child, out);
            }

            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
    }
}

fn push_escaped_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
}

fn push_escaped_attr(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '<' => out.push_str("&lt;"),
            _ => out.push(c),
        }
    }
}
