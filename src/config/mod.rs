//! Configuration module for Koala Search
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use koala_search::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("koala.toml")).unwrap();
//! println!("Crawler will accept at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, SearchConfig, SiteEntry, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
