//! URL handling module for Burrow
//!
//! This module provides URL normalization, domain extraction, and the
//! exact-or-suffix domain matching used to scope a crawl.

mod domain;
mod matcher;
mod normalize;

pub use domain::extract_domain;
pub use matcher::matches_domain;
pub use normalize::normalize_url;
