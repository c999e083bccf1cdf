//! Statistical price estimation for the flea-pricer system.
//!
//! This crate handles:
//! - Trailing-window sample selection with graceful degradation
//! - Asymmetric outlier-band rejection of manipulated samples
//! - Smoothed price computation

pub mod smoothing;

pub use smoothing::estimate;
