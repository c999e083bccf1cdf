//! Core data types for the flea-pricer system.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::error::{Error, Result};

/// Timestamp in milliseconds since Unix epoch (UTC).
pub type TimestampMs = i64;

/// Milliseconds per day.
pub const MS_PER_DAY: i64 = 86_400_000;

/// A single historical price observation for one item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PriceSample {
    /// Observed flea price in roubles.
    pub price: f64,
    /// Observation timestamp in milliseconds.
    pub timestamp: TimestampMs,
}

/// One tradable item as reported by the market feed.
///
/// `historical_prices` is not guaranteed to be sorted by timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketItem {
    /// Item template id.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Feed-reported 24h average price.
    pub avg_24h_price: f64,
    /// Percentage price change over the last 48 hours.
    pub change_last_48h_percent: f64,
    /// Historical price series, unordered.
    pub historical_prices: Vec<PriceSample>,
}

/// Multi-unit pack composition: N units of a referenced base item.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackComposition {
    /// Units of the referenced item contained in the pack.
    pub unit_capacity: u32,
    /// Template id of the contained item.
    pub referenced_item_id: String,
}

/// Authoritative item definition from the server's template database.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogItem {
    /// Item template id.
    pub id: String,
    /// Internal template name (not the display name).
    pub name: String,
    /// Template id of the parent category.
    pub parent_category_id: String,
    /// Present only for multi-unit packs (e.g. ammo boxes).
    pub pack_composition: Option<PackComposition>,
}

/// Static fallback price from the reference handbook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HandbookEntry {
    /// Item template id.
    pub id: String,
    /// Handbook price in roubles.
    pub price: i64,
}

/// Smoothed market price for one item that survived feed filtering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedPrice {
    /// Item template id.
    pub item_id: String,
    /// Display name.
    pub name: String,
    /// Feed-reported 24h average price.
    pub avg_24h_price: f64,
    /// Outlier-rejected smoothed price.
    pub smoothed_price: i64,
}

/// Final item id -> integer price mapping consumed by the game server.
pub type PriceList = HashMap<String, i64>;

/// Manually curated price for a known problem item.
///
/// Applied only when the item is otherwise absent from the merged list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManualOverride {
    /// Item template id.
    pub item_id: String,
    /// Price to assign.
    pub price: i64,
}

/// Validate a price list before it is handed to the server.
///
/// Every value must be non-negative; a negative price means an upstream
/// document was malformed and the whole batch is rejected.
pub fn validate_price_list(prices: &PriceList) -> Result<()> {
    for (id, price) in prices {
        if *price < 0 {
            return Err(Error::malformed_input(format!(
                "negative price {price} for item {id}"
            )));
        }
    }
    Ok(())
}
