//! Price smoothing with asymmetric outlier rejection.
//!
//! Reduces a noisy historical price series to a single representative value.
//! Samples are restricted to a trailing window, then values outside a band
//! around the mean are discarded before averaging. The band is asymmetric:
//! tighter above the mean than below, since market manipulation usually
//! inflates prices rather than crashing them.

use flea_core::{EstimatorConfig, PriceSample, TimestampMs};
use statrs::statistics::Statistics;

/// Estimate a smoothed price from a historical sample series.
///
/// Returns `None` when no estimate can be made: fewer than two samples in
/// the window, or (in theory) an empty set after band rejection. Callers
/// must treat `None` as "no market price for this item", never as zero.
///
/// Pure and deterministic; sample order never matters.
pub fn estimate(
    samples: &[PriceSample],
    now: TimestampMs,
    cfg: &EstimatorConfig,
) -> Option<i64> {
    let cutoff = now - cfg.window_ms;
    let mut prices: Vec<f64> = samples
        .iter()
        .filter(|s| s.timestamp >= cutoff && s.timestamp <= now)
        .map(|s| s.price)
        .collect();

    // Window empty: degrade gracefully to the full series.
    if prices.is_empty() {
        prices = samples.iter().map(|s| s.price).collect();
    }

    if prices.len() < 2 {
        return None;
    }

    let mean = prices.iter().mean();
    let variance = prices.iter().population_variance();
    // Guard against tiny negative variance from floating point error.
    let stddev = if variance <= 0.0 { 0.0 } else { variance.sqrt() };

    let lower = mean - cfg.lower_band_sigma * stddev;
    let upper = mean + cfg.upper_band_sigma * stddev;

    let surviving: Vec<f64> = prices
        .into_iter()
        .filter(|p| *p >= lower && *p <= upper)
        .collect();

    // Not reachable for finite inputs (the sum of squared z-scores equals n,
    // so at least one value always sits inside the band), guarded anyway.
    if surviving.is_empty() {
        return None;
    }

    Some(surviving.iter().mean().round() as i64)
}
