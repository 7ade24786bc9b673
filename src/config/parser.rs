use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads, parses and validates a TOML configuration file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use koala_search::config::load_config;
///
/// let config = load_config(Path::new("koala.toml")).unwrap();
/// println!("{} sites configured", config.sites.len());
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Hex SHA-256 of the configuration file
///
/// Recorded with each crawl run so runs made under different settings can
/// be told apart.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    Ok(hash_content(&content))
}

/// Loads a configuration together with the hash of the exact text parsed
pub fn load_config_with_hash(path: &Path) -> Result<(Config, String), ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config = parse_config(&content)?;
    Ok((config, hash_content(&content)))
}

fn parse_config(content: &str) -> Result<Config, ConfigError> {
    let config: Config = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

fn hash_content(content: &str) -> String {
    hex::encode(Sha256::digest(content.as_bytes()))
}
