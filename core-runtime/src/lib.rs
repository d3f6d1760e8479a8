//! # Core Runtime Module
//!
//! Foundational runtime infrastructure for the OneDrive media adapter:
//! - Logging and tracing infrastructure
//! - Adapter configuration and capability wiring
//!
//! ## Overview
//!
//! This crate establishes the logging conventions and the fail-fast
//! configuration builder used by `provider-onedrive`. Host capabilities
//! (HTTP, accounts, cache) are collected here and validated before the
//! adapter is constructed.

pub mod config;
pub mod error;
pub mod logging;

pub use config::{AddonConfig, AddonConfigBuilder};
pub use error::{Error, Result};
