//! Market feed normalization for the flea-pricer system.
//!
//! This crate handles:
//! - Durability-variant and empty-history filtering
//! - Anomaly warnings for large 48h price swings
//! - Smoothed price derivation via the estimator

pub mod normalizer;

pub use normalizer::{normalize, normalize_with_stats, NormalizeStats};
