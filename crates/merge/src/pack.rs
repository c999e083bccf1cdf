//! Ammo-pack identification.
//!
//! Packs are rarely listed on the flea individually, so the server would
//! fall back to a stale baseline price often worth a fraction of the ammo
//! inside. The merge engine synthesizes their price instead; this module
//! decides which catalog items that rule applies to.

use flea_core::{CatalogItem, PackRuleConfig};

/// True when a catalog item is an intact ammo pack.
///
/// An item qualifies when its parent category is one of the configured
/// ammo-container classes, its internal name carries an ammo-box marker,
/// and it is not a damaged variant.
pub fn is_ammo_pack(item: &CatalogItem, cfg: &PackRuleConfig) -> bool {
    cfg.parent_category_ids
        .iter()
        .any(|cat| cat == &item.parent_category_id)
        && cfg.name_markers.iter().any(|m| item.name.contains(m))
        && !item.name.contains(&cfg.damaged_marker)
}
