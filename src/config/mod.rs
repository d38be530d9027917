//! Configuration module for sitecrawl
//!
//! This module handles loading TOML configuration files, layering command-line
//! overrides on top, and validating the result.
//!
//! # Example
//!
//! ```no_run
//! use sitecrawl::config::{load_config, validate};
//! use std::path::Path;
//!
//! let config = load_config(Path::new("sitecrawl.toml")).unwrap();
//! validate(&config).unwrap();
//! println!("Crawler will run {} fetches at once", config.crawler.max_concurrency);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    CliOverrides, Config, CrawlerConfig, RequestConfig, DEFAULT_MAX_CONCURRENCY,
    DEFAULT_REQUEST_TIMEOUT_MS,
};

// Re-export parser and validation functions
pub use parser::{load_config, parse_config, parse_header_pairs};
pub use validation::{entry_point, validate, EntryPoint};
