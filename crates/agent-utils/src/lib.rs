//! Shared utilities for news-agent-rs
//!
//! This crate provides common functionality used across the workspace:
//! tracing setup and the key/value configuration sources that credentials,
//! endpoints and file locations are read from.

pub mod config;
pub mod logging;

pub use config::{ConfigSource, EnvSource, MapSource};
pub use logging::{LogFormat, init_tracing, init_tracing_with};
