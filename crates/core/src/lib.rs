//! Core types and configuration for the flea-pricer system.
//!
//! This crate provides shared types used across all other crates:
//! - Market feed, catalog and handbook data types
//! - Configuration structures
//! - Common error types

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, EstimatorConfig, PackRuleConfig, SourceConfig};
pub use error::{Error, Result};
pub use types::*;
