//! Receiver configuration management
//!
//! This crate provides configuration loading and parsing for the trunking receiver:
//! - TOML configuration file parsing
//! - Per-network follow configuration (control channels, talkgroup lists and tags)
//! - Worker pool and timing settings

pub mod toml_config;
pub mod trunk_config;

pub use toml_config::*;
pub use trunk_config::*;
