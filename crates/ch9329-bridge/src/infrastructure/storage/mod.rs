//! Storage infrastructure: configuration file persistence.
//!
//! The `config` sub-module reads the TOML file from the platform config
//! directory, fills missing fields with defaults, and writes it back.

pub mod config;
