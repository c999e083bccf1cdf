//! Reference document retrieval and JSON persistence.
//!
//! Downloads the server's reference documents, parses them into the core
//! model, and writes the final price list back out. The upstream SPT
//! template/handbook shapes live here as private deserialize-only structs.

use flea_core::{
    CatalogItem, Error, HandbookEntry, MarketItem, PackComposition, PriceList, Result,
};
use reqwest::Client;
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Download a document to a local file.
pub async fn download_file(client: &Client, url: &str, path: impl AsRef<Path>) -> Result<()> {
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| Error::http(format!("download of {url} failed: {e}")))?;

    let status = response.status();
    if !status.is_success() {
        return Err(Error::http(format!("download of {url} returned {status}")));
    }

    let bytes = response
        .bytes()
        .await
        .map_err(|e| Error::http(format!("download of {url} failed: {e}")))?;

    tokio::fs::write(path.as_ref(), &bytes).await?;
    tracing::info!(url, path = %path.as_ref().display(), bytes = bytes.len(), "downloaded");
    Ok(())
}

/// Load the baseline price list (a plain id -> price JSON object).
pub fn load_baseline_prices(path: impl AsRef<Path>) -> Result<PriceList> {
    let body = std::fs::read_to_string(path)?;
    let prices: PriceList = serde_json::from_str(&body)?;
    Ok(prices)
}

/// Load the reference handbook document.
pub fn load_handbook(path: impl AsRef<Path>) -> Result<Vec<HandbookEntry>> {
    let body = std::fs::read_to_string(path)?;
    parse_handbook(&body)
}

/// Load the item template database into the catalog model.
pub fn load_catalog(path: impl AsRef<Path>) -> Result<HashMap<String, CatalogItem>> {
    let body = std::fs::read_to_string(path)?;
    parse_catalog(&body)
}

/// Load a previously cached market feed document.
pub fn load_market_items(path: impl AsRef<Path>) -> Result<Vec<MarketItem>> {
    let body = std::fs::read_to_string(path)?;
    let items: Vec<MarketItem> = serde_json::from_str(&body)?;
    Ok(items)
}

/// Cache a fetched market feed for offline reprocessing.
pub fn save_market_items(path: impl AsRef<Path>, items: &[MarketItem]) -> Result<()> {
    let body = serde_json::to_string_pretty(items)?;
    std::fs::write(path, body)?;
    Ok(())
}

/// Persist the final price list as a pretty-printed JSON object.
///
/// Keys are written in sorted order so successive runs diff cleanly.
pub fn save_price_list(path: impl AsRef<Path>, prices: &PriceList) -> Result<()> {
    let sorted: BTreeMap<&String, &i64> = prices.iter().collect();
    let body = serde_json::to_string_pretty(&sorted)?;
    std::fs::write(path.as_ref(), body)?;
    tracing::info!(path = %path.as_ref().display(), items = prices.len(), "wrote price list");
    Ok(())
}

// ---- upstream SPT document shapes ----

#[derive(Debug, Deserialize)]
struct RawHandbook {
    #[serde(rename = "Items")]
    items: Vec<RawHandbookItem>,
}

#[derive(Debug, Deserialize)]
struct RawHandbookItem {
    #[serde(rename = "Id")]
    id: String,
    #[serde(rename = "Price")]
    price: i64,
}

#[derive(Debug, Deserialize)]
struct RawTemplateItem {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_name")]
    name: String,
    #[serde(rename = "_parent")]
    parent: String,
    #[serde(rename = "_props", default)]
    props: RawTemplateProps,
}

#[derive(Debug, Default, Deserialize)]
struct RawTemplateProps {
    #[serde(rename = "StackSlots", default)]
    stack_slots: Vec<RawStackSlot>,
}

#[derive(Debug, Deserialize)]
struct RawStackSlot {
    #[serde(rename = "_max_count")]
    max_count: u32,
    #[serde(rename = "_props", default)]
    props: RawStackSlotProps,
}

#[derive(Debug, Default, Deserialize)]
struct RawStackSlotProps {
    #[serde(default)]
    filters: Vec<RawStackFilter>,
}

#[derive(Debug, Deserialize)]
struct RawStackFilter {
    #[serde(rename = "Filter", default)]
    filter: Vec<String>,
}

/// Parse a handbook document body.
pub fn parse_handbook(body: &str) -> Result<Vec<HandbookEntry>> {
    let raw: RawHandbook = serde_json::from_str(body)
        .map_err(|e| Error::malformed_input(format!("handbook document: {e}")))?;
    Ok(raw
        .items
        .into_iter()
        .map(|item| HandbookEntry {
            id: item.id,
            price: item.price,
        })
        .collect())
}

/// Parse an item template database body into the catalog model.
///
/// Pack composition is taken from the first stack slot's first filter
/// entry; items without stack slots simply have no composition.
pub fn parse_catalog(body: &str) -> Result<HashMap<String, CatalogItem>> {
    let raw: HashMap<String, RawTemplateItem> = serde_json::from_str(body)
        .map_err(|e| Error::malformed_input(format!("template document: {e}")))?;

    Ok(raw
        .into_values()
        .map(|item| {
            let pack_composition = item.props.stack_slots.first().and_then(|slot| {
                slot.props
                    .filters
                    .first()
                    .and_then(|f| f.filter.first())
                    .map(|referenced| PackComposition {
                        unit_capacity: slot.max_count,
                        referenced_item_id: referenced.clone(),
                    })
            });
            (
                item.id.clone(),
                CatalogItem {
                    id: item.id,
                    name: item.name,
                    parent_category_id: item.parent,
                    pack_composition,
                },
            )
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_handbook() {
        let body = r#"{
            "Items": [
                { "Id": "ammoA", "ParentId": "cat", "Price": 120 },
                { "Id": "ammoB", "ParentId": "cat", "Price": 45 }
            ]
        }"#;

        let entries = parse_handbook(body).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].id, "ammoA");
        assert_eq!(entries[0].price, 120);
    }

    #[test]
    fn test_parse_catalog_with_pack() {
        let body = r#"{
            "pack1": {
                "_id": "pack1",
                "_name": "item_ammo_box_556x45_30",
                "_parent": "5661632d4bdc2d903d8b456b",
                "_props": {
                    "StackSlots": [
                        {
                            "_max_count": 30,
                            "_props": {
                                "filters": [ { "Filter": [ "ammoA" ] } ]
                            }
                        }
                    ]
                }
            },
            "knife1": {
                "_id": "knife1",
                "_name": "weapon_knife",
                "_parent": "5447e1d04bdc2dff2f8b4567",
                "_props": {}
            }
        }"#;

        let catalog = parse_catalog(body).unwrap();
        assert_eq!(catalog.len(), 2);

        let pack = &catalog["pack1"];
        let comp = pack.pack_composition.as_ref().unwrap();
        assert_eq!(comp.unit_capacity, 30);
        assert_eq!(comp.referenced_item_id, "ammoA");

        assert!(catalog["knife1"].pack_composition.is_none());
    }

    #[test]
    fn test_parse_catalog_rejects_missing_fields() {
        let body = r#"{ "x": { "_id": "x", "_name": "thing" } }"#;
        assert!(parse_catalog(body).is_err());
    }

    #[test]
    fn test_parse_handbook_rejects_malformed() {
        let body = r#"{ "Items": [ { "Id": "a" } ] }"#;
        assert!(parse_handbook(body).is_err());
    }
}
