use crate::config::types::{Config, ConfigOverrides};
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use listing_harvest::config::load_config;
///
/// let config = load_config(Path::new("harvest.toml")).unwrap();
/// println!("Profile: {}", config.site.profile);
/// ```
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    load_config_with_overrides(path, &ConfigOverrides::default())
}

/// Loads a configuration file, applying `overrides` before validation
///
/// A value given on the command line can therefore satisfy a rule the file alone
/// would fail, such as a profile that needs an explicit page count.
pub fn load_config_with_overrides(
    path: &Path,
    overrides: &ConfigOverrides,
) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config_with_overrides(&content, overrides)
}

/// Parses and validates configuration from TOML text
pub fn parse_config(content: &str) -> Result<Config, ConfigError> {
    parse_config_with_overrides(content, &ConfigOverrides::default())
}

/// Parses TOML text, applies `overrides`, then validates the result
pub fn parse_config_with_overrides(
    content: &str,
    overrides: &ConfigOverrides,
) -> Result<Config, ConfigError> {
    let mut config: Config = toml::from_str(content)?;
    overrides.apply(&mut config);
    validate(&config)?;
    Ok(config)
}

/// Computes a SHA-256 hash of the configuration file content
///
/// Logged at startup so two runs can be matched to the exact settings they used.
pub fn compute_config_hash(path: &Path) -> Result<String, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let result = hasher.finalize();
    Ok(hex::encode(result))
}

/// Loads a configuration with `overrides` applied and returns it with the file's hash
pub fn load_config_with_hash(
    path: &Path,
    overrides: &ConfigOverrides,
) -> Result<(Config, String), ConfigError> {
    let config = load_config_with_overrides(path, overrides)?;
    let hash = compute_config_hash(path)?;
    Ok((config, hash))
}
