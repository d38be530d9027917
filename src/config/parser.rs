use crate::config::types::Config;
use crate::ConfigResult;
use std::path::Path;

/// Loads and parses a configuration file from the given path
///
/// The file is only parsed here; validation runs after command-line overrides
/// have been applied (see [`crate::config::validate`]).
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(Config)` - Successfully loaded configuration
/// * `Err(ConfigError)` - Failed to read or parse the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use sitecrawl::config::load_config;
///
/// let config = load_config(Path::new("sitecrawl.toml")).unwrap();
/// println!("Concurrency: {}", config.crawler.max_concurrency);
/// ```
pub fn load_config(path: &Path) -> ConfigResult<Config> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses configuration from TOML text
pub fn parse_config(content: &str) -> ConfigResult<Config> {
    let config: Config = toml::from_str(content)?;
    Ok(config)
}

/// Splits a `Name:Value,Name:Value` header string into trimmed pairs
///
/// Pairs without a `:` separator are skipped silently. Only the first `:` splits,
/// so values may themselves contain colons.
///
/// # Example
///
/// ```
/// use sitecrawl::config::parse_header_pairs;
///
/// let pairs = parse_header_pairs("X-Token: abc, broken, Referer:https://example.com");
/// assert_eq!(pairs.len(), 2);
/// assert_eq!(pairs[1], ("Referer".to_string(), "https://example.com".to_string()));
/// ```
pub fn parse_header_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (name, value) = pair.split_once(':')?;
            Some((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}
