//! Market feed normalization.
//!
//! Applies item-level inclusion policy to a raw feed batch and produces a
//! clean per-item price lookup. Items without usable history, items without
//! a derivable estimate, and zero-durability variants are dropped; large
//! 48h price swings are logged but not rejected.

use flea_core::{EstimatorConfig, MarketItem, NormalizedPrice, TimestampMs};
use std::collections::HashMap;

/// Display-name marker for zero-durability item variants, e.g.
/// `"Gasmask (0/30)"`. These must never receive an independent price.
const ZERO_DURABILITY_MARKER: &str = " (0/";

/// 48h price change (percent) above which an item is flagged as anomalous.
const SWING_WARN_PERCENT: f64 = 100.0;

/// Counters describing what happened to a normalized batch.
#[derive(Debug, Clone, Default)]
pub struct NormalizeStats {
    /// Items in the input batch.
    pub total_items: u64,
    /// Items emitted with a smoothed price.
    pub emitted: u64,
    /// Items dropped for an empty historical series.
    pub skipped_no_history: u64,
    /// Items dropped because no estimate was derivable.
    pub skipped_no_estimate: u64,
    /// Zero-durability variants dropped by the name marker.
    pub skipped_zero_durability: u64,
    /// Items that tripped the large-swing warning (still processed).
    pub large_swings: u64,
}

impl NormalizeStats {
    /// Fraction of the batch that survived filtering.
    pub fn emit_rate(&self) -> f64 {
        if self.total_items > 0 {
            self.emitted as f64 / self.total_items as f64
        } else {
            0.0
        }
    }
}

/// Normalize a raw market feed batch into a per-item price lookup.
///
/// Output keys are a subset of input item ids; no id is ever invented.
pub fn normalize(
    items: &[MarketItem],
    now: TimestampMs,
    cfg: &EstimatorConfig,
) -> HashMap<String, NormalizedPrice> {
    normalize_with_stats(items, now, cfg).0
}

/// [`normalize`], also returning batch counters.
pub fn normalize_with_stats(
    items: &[MarketItem],
    now: TimestampMs,
    cfg: &EstimatorConfig,
) -> (HashMap<String, NormalizedPrice>, NormalizeStats) {
    let mut out = HashMap::with_capacity(items.len());
    let mut stats = NormalizeStats::default();

    for item in items {
        stats.total_items += 1;

        if item.historical_prices.is_empty() {
            stats.skipped_no_history += 1;
            continue;
        }

        if item.change_last_48h_percent > SWING_WARN_PERCENT {
            stats.large_swings += 1;
            tracing::warn!(
                id = %item.id,
                name = %item.name,
                change = item.change_last_48h_percent,
                "item has a large recent price increase"
            );
        }

        let smoothed_price =
            match flea_estimator::estimate(&item.historical_prices, now, cfg) {
                Some(price) => price,
                None => {
                    stats.skipped_no_estimate += 1;
                    continue;
                }
            };

        if item.name.contains(ZERO_DURABILITY_MARKER) {
            stats.skipped_zero_durability += 1;
            tracing::debug!(id = %item.id, name = %item.name, "skipping zero durability variant");
            continue;
        }

        stats.emitted += 1;
        out.insert(
            item.id.clone(),
            NormalizedPrice {
                item_id: item.id.clone(),
                name: item.name.clone(),
                avg_24h_price: item.avg_24h_price,
                smoothed_price,
            },
        );
    }

    (out, stats)
}
