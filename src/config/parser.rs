use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigResult;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and validates configuration from a TOML file
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let (config, _hash) = load_config_with_hash(path)?;
    Ok(config)
}

/// Loads configuration and returns the sha256 hash of the raw file
///
/// The hash identifies the exact configuration a run was started with.
pub fn load_config_with_hash(path: &Path) -> ConfigResult<(Config, String)> {
    let raw = std::fs::read_to_string(path)?;

    let mut hasher = Sha256::new();
    hasher.update(raw.as_bytes());
    let hash = hex::encode(hasher.finalize());

    let config: Config = toml::from_str(&raw)?;
    validate(&config)?;

    Ok((config, hash))
}
