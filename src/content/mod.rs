//! Content pipeline: HTML sanitization and structured extraction

mod extract;
mod sanitize;

pub use extract::{extract_content, ExtractedContent};
pub use sanitize::sanitize_html;
