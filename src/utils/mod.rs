//! Configuration utilities.

/// TOML configuration (`agora.toml`).
pub mod config;
