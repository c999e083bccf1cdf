//! Remote data retrieval and persistence for the flea-pricer system.
//!
//! This crate handles:
//! - Market feed queries against the tarkov.dev GraphQL API
//! - Reference document download (handbook, baseline prices)
//! - JSON document parsing into the core model and price list persistence
//!
//! The pricing crates never touch the network or the filesystem; everything
//! that does lives here.

pub mod files;
pub mod market_api;

pub use files::{
    download_file, load_baseline_prices, load_catalog, load_handbook, load_market_items,
    save_market_items, save_price_list,
};
pub use market_api::{GameMode, MarketApiClient};
