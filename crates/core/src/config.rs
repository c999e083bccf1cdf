//! Configuration structures for the flea-pricer system.

use serde::{Deserialize, Serialize};

use crate::types::{ManualOverride, MS_PER_DAY};

/// Main configuration for the price pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Statistical estimator configuration.
    pub estimator: EstimatorConfig,
    /// Ammo-pack derivation rule configuration.
    pub pack_rule: PackRuleConfig,
    /// Remote source and local file configuration.
    pub sources: SourceConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            estimator: EstimatorConfig::default(),
            pack_rule: PackRuleConfig::default(),
            sources: SourceConfig::default(),
        }
    }
}

/// Statistical estimator configuration.
///
/// The window and band multipliers are tuning knobs, kept out of the
/// estimator's control flow so they can be tested independently.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EstimatorConfig {
    /// Trailing window for historical samples, in milliseconds.
    pub window_ms: i64,
    /// Outlier band lower bound: mean - lower_band_sigma * stddev.
    pub lower_band_sigma: f64,
    /// Outlier band upper bound: mean + upper_band_sigma * stddev.
    ///
    /// Tighter than the lower bound: manipulation usually inflates prices.
    pub upper_band_sigma: f64,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            window_ms: 14 * MS_PER_DAY,
            lower_band_sigma: 2.0,
            upper_band_sigma: 1.5,
        }
    }
}

/// Rule set identifying ammo-pack catalog items (see `flea_merge::is_ammo_pack`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackRuleConfig {
    /// Parent category ids of the ammo-container classes.
    pub parent_category_ids: Vec<String>,
    /// Internal-name markers; at least one must match.
    pub name_markers: Vec<String>,
    /// Internal-name marker excluding damaged pack variants.
    pub damaged_marker: String,
}

impl Default for PackRuleConfig {
    fn default() -> Self {
        Self {
            parent_category_ids: vec![
                "5661632d4bdc2d903d8b456b".to_string(),
                "543be5cb4bdc2deb348b4568".to_string(),
            ],
            name_markers: vec!["item_ammo_box_".to_string(), "ammo_box_".to_string()],
            damaged_marker: "_damaged".to_string(),
        }
    }
}

/// Remote endpoints and local document paths.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Market feed GraphQL endpoint.
    pub market_api_url: String,
    /// URL of the server's reference handbook document.
    pub handbook_url: String,
    /// URL of the server's baseline price document.
    pub baseline_prices_url: String,
    /// Local path of the item template database document.
    pub templates_path: String,
    /// Directory for cached feed documents and output price lists.
    pub data_dir: String,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            market_api_url: "https://api.tarkov.dev/graphql".to_string(),
            handbook_url: "https://raw.githubusercontent.com/sp-tarkov/server/refs/heads/master/project/assets/database/templates/handbook.json".to_string(),
            baseline_prices_url: "https://raw.githubusercontent.com/sp-tarkov/server/refs/heads/master/project/assets/database/templates/prices.json".to_string(),
            templates_path: "items.json".to_string(),
            data_dir: ".".to_string(),
        }
    }
}

/// Static override table for items with no usable market data.
///
/// Applied last and only for ids still absent after merging, so an override
/// can never mask a computed price.
pub fn manual_overrides() -> Vec<ManualOverride> {
    let table: &[(&str, i64)] = &[
        // TerraGroup Labs access keycard, not flea listable
        ("5c94bbff86f7747ee735c08f", 150_000),
        // GP coin
        ("5d235b4d86f7742e017bc88a", 25_000),
    ];
    table
        .iter()
        .map(|(id, price)| ManualOverride {
            item_id: (*id).to_string(),
            price: *price,
        })
        .collect()
}
