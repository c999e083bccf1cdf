//! Market feed client.
//!
//! Queries the tarkov.dev GraphQL API for current item prices and their
//! historical series, and converts the raw wire shape into the core model.

use flea_core::{Error, MarketItem, PriceSample, Result};
use reqwest::Client;
use serde::Deserialize;

/// Game mode the feed is queried for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameMode {
    /// Live-Tarkov-equivalent PvP economy.
    Regular,
    /// PvE economy.
    Pve,
}

impl GameMode {
    /// Wire value used in the GraphQL query and in file names.
    pub fn as_str(self) -> &'static str {
        match self {
            GameMode::Regular => "regular",
            GameMode::Pve => "pve",
        }
    }
}

/// Client for the market feed GraphQL endpoint.
pub struct MarketApiClient {
    client: Client,
    endpoint: String,
}

#[derive(Debug, Deserialize)]
struct FeedEnvelope {
    data: Option<FeedData>,
}

#[derive(Debug, Deserialize)]
struct FeedData {
    items: Vec<RawMarketItem>,
}

/// Raw feed record. Prices and history routinely come back null for
/// unlisted items; id and name are required and fail the batch if absent.
#[derive(Debug, Deserialize)]
struct RawMarketItem {
    id: String,
    name: String,
    #[serde(rename = "avg24hPrice", default)]
    avg_24h_price: Option<f64>,
    #[serde(rename = "changeLast48hPercent", default)]
    change_last_48h_percent: Option<f64>,
    #[serde(rename = "historicalPrices", default)]
    historical_prices: Vec<RawPriceSample>,
}

#[derive(Debug, Deserialize)]
struct RawPriceSample {
    price: Option<f64>,
    // Millisecond epoch, sent as a string.
    timestamp: String,
}

impl MarketApiClient {
    /// Create a client for the given GraphQL endpoint.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    /// Fetch the full item price feed for one game mode.
    pub async fn fetch_items(&self, mode: GameMode) -> Result<Vec<MarketItem>> {
        let query = format!(
            "{{ items(lang: en, gameMode: {}) {{ id name avg24hPrice changeLast48hPercent \
             historicalPrices {{ price timestamp }} }} }}",
            mode.as_str()
        );

        let response = self
            .client
            .post(&self.endpoint)
            .json(&serde_json::json!({ "query": query }))
            .send()
            .await
            .map_err(|e| Error::http(format!("market feed request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::http(format!("market feed returned {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| Error::http(format!("market feed body read failed: {e}")))?;

        let items = parse_feed_response(&body)?;
        tracing::info!(mode = mode.as_str(), items = items.len(), "fetched market feed");
        Ok(items)
    }
}

/// Parse a raw feed response body into core market items.
///
/// A record missing a required field fails the whole batch rather than
/// producing a partially-correct feed.
pub fn parse_feed_response(body: &str) -> Result<Vec<MarketItem>> {
    let envelope: FeedEnvelope = serde_json::from_str(body)
        .map_err(|e| Error::malformed_input(format!("market feed document: {e}")))?;

    let data = envelope
        .data
        .ok_or_else(|| Error::malformed_input("market feed document has no data"))?;

    data.items.into_iter().map(convert_item).collect()
}

fn convert_item(raw: RawMarketItem) -> Result<MarketItem> {
    let historical_prices = raw
        .historical_prices
        .into_iter()
        .map(|sample| {
            let price = sample.price.ok_or_else(|| {
                Error::malformed_input(format!("history sample without price for {}", raw.id))
            })?;
            let timestamp = sample.timestamp.parse::<i64>().map_err(|_| {
                Error::malformed_input(format!(
                    "bad history timestamp {:?} for {}",
                    sample.timestamp, raw.id
                ))
            })?;
            Ok(PriceSample { price, timestamp })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(MarketItem {
        id: raw.id,
        name: raw.name,
        avg_24h_price: raw.avg_24h_price.unwrap_or(0.0),
        change_last_48h_percent: raw.change_last_48h_percent.unwrap_or(0.0),
        historical_prices,
    })
}
