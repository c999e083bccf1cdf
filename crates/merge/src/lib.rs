//! Price merging for the flea-pricer system.
//!
//! This crate handles:
//! - Layered patching of the baseline price list with market prices
//! - Ammo-pack price synthesis from unit prices and capacities
//! - Gap filling from the manual override table

pub mod engine;
pub mod pack;

pub use engine::{
    apply_market_prices, apply_overrides, apply_pack_prices, merge, MergeOutcome,
};
pub use pack::is_ammo_pack;
