//! Layered price merging.
//!
//! The final price list is built by applying patches to an accumulator in
//! increasing priority: baseline copy, normalized market prices, synthesized
//! pack prices, manual overrides. The patch order is the contract; each
//! patch is a separate function so the priority of every layer can be
//! tested in isolation.

use flea_core::{
    CatalogItem, Error, HandbookEntry, ManualOverride, NormalizedPrice, PackRuleConfig,
    PriceList,
};
use std::collections::HashMap;

use crate::pack::is_ammo_pack;

/// Result of a merge: the completed price list plus any per-pack
/// derivation failures. Failures never abort the batch.
#[derive(Debug)]
pub struct MergeOutcome {
    /// The fully merged id -> price mapping.
    pub prices: PriceList,
    /// Pack items whose price could not be synthesized.
    pub pack_failures: Vec<Error>,
}

/// Patch layer 2: overlay normalized market prices.
///
/// The catalog is the authority on valid tradable ids; feed ids absent from
/// it (typically weapon presets) are discarded, not merged as unknowns.
pub fn apply_market_prices(
    acc: &mut PriceList,
    normalized: &HashMap<String, NormalizedPrice>,
    catalog: &HashMap<String, CatalogItem>,
) {
    for (item_id, np) in normalized {
        if !catalog.contains_key(item_id) {
            tracing::debug!(id = %item_id, name = %np.name, "feed id not in catalog, dropping");
            continue;
        }
        acc.insert(item_id.clone(), np.smoothed_price);
    }
}

/// Patch layer 3: synthesize prices for ammo packs that are still unpriced.
///
/// Unit price comes from the accumulator when the contained round has a
/// market price, else from the reference handbook. Neither existing is a
/// hard failure for that pack: pricing it at zero or leaving the stale
/// baseline value would under-price the bundle far below the ammo inside.
pub fn apply_pack_prices(
    acc: &mut PriceList,
    catalog: &HashMap<String, CatalogItem>,
    handbook: &[HandbookEntry],
    cfg: &PackRuleConfig,
) -> Vec<Error> {
    let mut failures = Vec::new();

    // Sorted so failure reporting is deterministic across runs.
    let mut packs: Vec<&CatalogItem> = catalog
        .values()
        .filter(|item| is_ammo_pack(item, cfg))
        .collect();
    packs.sort_by(|a, b| a.id.cmp(&b.id));

    for pack in packs {
        if acc.contains_key(&pack.id) {
            continue;
        }

        let comp = match &pack.pack_composition {
            Some(comp) => comp,
            None => {
                tracing::error!(id = %pack.id, name = %pack.name, "ammo pack has no composition data");
                failures.push(Error::malformed_input(format!(
                    "ammo pack {} ({}) has no composition data",
                    pack.id, pack.name
                )));
                continue;
            }
        };

        let unit_price = acc.get(&comp.referenced_item_id).copied().or_else(|| {
            handbook
                .iter()
                .find(|entry| entry.id == comp.referenced_item_id)
                .map(|entry| entry.price)
        });

        match unit_price {
            Some(unit_price) => {
                let price = unit_price * i64::from(comp.unit_capacity);
                tracing::debug!(id = %pack.id, name = %pack.name, price, "synthesized pack price");
                acc.insert(pack.id.clone(), price);
            }
            None => {
                tracing::error!(
                    pack_id = %pack.id,
                    referenced_id = %comp.referenced_item_id,
                    "no reference price for pack contents"
                );
                failures.push(Error::missing_reference_price(
                    &pack.id,
                    &comp.referenced_item_id,
                ));
            }
        }
    }

    failures
}

/// Patch layer 4: fill remaining gaps from the manual override table.
///
/// Overrides never replace a computed value; they only plug holes.
pub fn apply_overrides(acc: &mut PriceList, overrides: &[ManualOverride]) {
    for ov in overrides {
        if !acc.contains_key(&ov.item_id) {
            acc.insert(ov.item_id.clone(), ov.price);
        }
    }
}

/// Merge all price sources into the final list.
///
/// Inputs are never mutated; the baseline is copied and patched in layer
/// order. Deterministic given identical inputs.
pub fn merge(
    baseline: &PriceList,
    normalized: &HashMap<String, NormalizedPrice>,
    catalog: &HashMap<String, CatalogItem>,
    handbook: &[HandbookEntry],
    overrides: &[ManualOverride],
    cfg: &PackRuleConfig,
) -> MergeOutcome {
    let mut acc = baseline.clone();

    apply_market_prices(&mut acc, normalized, catalog);
    let pack_failures = apply_pack_prices(&mut acc, catalog, handbook, cfg);
    apply_overrides(&mut acc, overrides);

    MergeOutcome {
        prices: acc,
        pack_failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flea_core::PackComposition;

    const AMMO_CATEGORY: &str = "5485a8684bdc2da71d8b4567";
    const PACK_CATEGORY: &str = "5661632d4bdc2d903d8b456b";

    fn make_normalized(id: &str, price: i64) -> (String, NormalizedPrice) {
        (
            id.to_string(),
            NormalizedPrice {
                item_id: id.to_string(),
                name: format!("item {id}"),
                avg_24h_price: price as f64,
                smoothed_price: price,
            },
        )
    }

    fn make_catalog_item(id: &str, name: &str, parent: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: name.to_string(),
            parent_category_id: parent.to_string(),
            pack_composition: None,
        }
    }

    fn make_pack(id: &str, capacity: u32, referenced: &str) -> CatalogItem {
        CatalogItem {
            id: id.to_string(),
            name: format!("item_ammo_box_{id}"),
            parent_category_id: PACK_CATEGORY.to_string(),
            pack_composition: Some(PackComposition {
                unit_capacity: capacity,
                referenced_item_id: referenced.to_string(),
            }),
        }
    }

    fn catalog_of(items: Vec<CatalogItem>) -> HashMap<String, CatalogItem> {
        items.into_iter().map(|i| (i.id.clone(), i)).collect()
    }

    fn cfg() -> PackRuleConfig {
        PackRuleConfig::default()
    }

    #[test]
    fn test_market_price_overlays_baseline() {
        let baseline = PriceList::from([("a".to_string(), 100), ("b".to_string(), 200)]);
        let normalized = HashMap::from([make_normalized("a", 500)]);
        let catalog = catalog_of(vec![make_catalog_item("a", "item_a", AMMO_CATEGORY)]);

        let out = merge(&baseline, &normalized, &catalog, &[], &[], &cfg());
        assert_eq!(out.prices["a"], 500);
        assert_eq!(out.prices["b"], 200);
        assert!(out.pack_failures.is_empty());
    }

    #[test]
    fn test_unknown_catalog_id_is_dropped() {
        let baseline = PriceList::new();
        let normalized = HashMap::from([make_normalized("preset123", 500)]);
        let catalog = HashMap::new();

        let out = merge(&baseline, &normalized, &catalog, &[], &[], &cfg());
        assert!(!out.prices.contains_key("preset123"));
    }

    #[test]
    fn test_baseline_layer_is_idempotent() {
        let baseline = PriceList::from([("a".to_string(), 100), ("b".to_string(), 200)]);
        let catalog = HashMap::new();
        let handbook = vec![HandbookEntry {
            id: "x".to_string(),
            price: 10,
        }];

        let once = merge(&baseline, &HashMap::new(), &catalog, &handbook, &[], &cfg());
        let twice = merge(&once.prices, &HashMap::new(), &catalog, &handbook, &[], &cfg());
        assert_eq!(once.prices, twice.prices);
    }

    #[test]
    fn test_baseline_is_not_mutated() {
        let baseline = PriceList::from([("a".to_string(), 100)]);
        let normalized = HashMap::from([make_normalized("a", 500)]);
        let catalog = catalog_of(vec![make_catalog_item("a", "item_a", AMMO_CATEGORY)]);

        let _ = merge(&baseline, &normalized, &catalog, &[], &[], &cfg());
        assert_eq!(baseline["a"], 100);
    }

    #[test]
    fn test_pack_price_from_market_unit_price() {
        let baseline = PriceList::new();
        let normalized = HashMap::from([make_normalized("ammoA", 10)]);
        let catalog = catalog_of(vec![
            make_catalog_item("ammoA", "patron_556x45", AMMO_CATEGORY),
            make_pack("pack1", 30, "ammoA"),
        ]);

        let out = merge(&baseline, &normalized, &catalog, &[], &[], &cfg());
        assert_eq!(out.prices["pack1"], 300);
    }

    #[test]
    fn test_pack_price_falls_back_to_handbook() {
        let baseline = PriceList::new();
        let catalog = catalog_of(vec![make_pack("pack1", 50, "ammoA")]);
        let handbook = vec![HandbookEntry {
            id: "ammoA".to_string(),
            price: 7,
        }];

        let out = merge(&baseline, &HashMap::new(), &catalog, &handbook, &[], &cfg());
        assert_eq!(out.prices["pack1"], 350);
    }

    #[test]
    fn test_pack_never_overwrites_existing_price() {
        // Pack already priced by the feed: derivation must not touch it.
        let baseline = PriceList::new();
        let normalized = HashMap::from([
            make_normalized("ammoA", 10),
            make_normalized("pack1", 123),
        ]);
        let catalog = catalog_of(vec![
            make_catalog_item("ammoA", "patron_556x45", AMMO_CATEGORY),
            make_pack("pack1", 30, "ammoA"),
        ]);

        let out = merge(&baseline, &normalized, &catalog, &[], &[], &cfg());
        assert_eq!(out.prices["pack1"], 123);
    }

    #[test]
    fn test_missing_reference_is_reported_not_zeroed() {
        let baseline = PriceList::new();
        let catalog = catalog_of(vec![
            make_pack("pack1", 30, "ghost"),
            make_pack("pack2", 20, "ammoA"),
        ]);
        let handbook = vec![HandbookEntry {
            id: "ammoA".to_string(),
            price: 5,
        }];

        let out = merge(&baseline, &HashMap::new(), &catalog, &handbook, &[], &cfg());
        // The failing pack is absent, never zero, and the rest completed.
        assert!(!out.prices.contains_key("pack1"));
        assert_eq!(out.prices["pack2"], 100);
        assert_eq!(out.pack_failures.len(), 1);
        match &out.pack_failures[0] {
            Error::MissingReferencePrice {
                pack_id,
                referenced_id,
            } => {
                assert_eq!(pack_id, "pack1");
                assert_eq!(referenced_id, "ghost");
            }
            other => panic!("unexpected failure: {other}"),
        }
    }

    #[test]
    fn test_pack_without_composition_is_a_failure() {
        let baseline = PriceList::new();
        let mut bare = make_pack("pack1", 30, "ammoA");
        bare.pack_composition = None;
        let catalog = catalog_of(vec![bare]);

        let out = merge(&baseline, &HashMap::new(), &catalog, &[], &[], &cfg());
        assert!(!out.prices.contains_key("pack1"));
        assert_eq!(out.pack_failures.len(), 1);
    }

    #[test]
    fn test_override_fills_gap_only() {
        let baseline = PriceList::new();
        let normalized = HashMap::from([make_normalized("x", 500)]);
        let catalog = catalog_of(vec![make_catalog_item("x", "item_x", AMMO_CATEGORY)]);
        let overrides = vec![
            ManualOverride {
                item_id: "x".to_string(),
                price: 1,
            },
            ManualOverride {
                item_id: "y".to_string(),
                price: 9_999,
            },
        ];

        let out = merge(&baseline, &normalized, &catalog, &[], &overrides, &cfg());
        assert_eq!(out.prices["x"], 500);
        assert_eq!(out.prices["y"], 9_999);
    }

    #[test]
    fn test_merge_is_deterministic() {
        let baseline = PriceList::from([("a".to_string(), 100)]);
        let normalized = HashMap::from([make_normalized("ammoA", 10)]);
        let catalog = catalog_of(vec![
            make_catalog_item("ammoA", "patron_556x45", AMMO_CATEGORY),
            make_pack("pack1", 30, "ammoA"),
            make_pack("pack2", 30, "ghost"),
        ]);

        let first = merge(&baseline, &normalized, &catalog, &[], &[], &cfg());
        let second = merge(&baseline, &normalized, &catalog, &[], &[], &cfg());
        assert_eq!(first.prices, second.prices);
        assert_eq!(first.pack_failures.len(), second.pack_failures.len());
    }
}
