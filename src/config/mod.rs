//! Configuration loading and validation
//!
//! Configuration is read from a TOML file once at startup and is immutable
//! for the lifetime of the run.

mod parser;
mod types;
mod validation;

pub use parser::{load_config, load_config_with_hash};
pub use types::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
pub use validation::validate;
