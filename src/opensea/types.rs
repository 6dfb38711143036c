use serde_aux::prelude::*;

// ============ Listings ============

/// Body of `GET /v2/listings/collection/{slug}/all`.
///
/// Orders stay untyped here so one bad order can be dropped without failing the page.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ListingsResponse {
    pub listings: Vec<serde_json::Value>,
    #[serde(default)]
    pub next: Option<String>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Order {
    pub order_hash: String,
    pub price: OrderPrice,
    pub protocol_data: ProtocolData,
    #[serde(default)]
    pub asset: Option<OrderAsset>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OrderPrice {
    pub current: CurrentPrice,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct CurrentPrice {
    pub currency: String,
    /// Amount in the smallest currency unit, as a decimal string.
    pub value: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ProtocolData {
    pub parameters: OrderParameters,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OrderParameters {
    pub offer: Vec<OfferItem>,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferItem {
    pub identifier_or_criteria: String,
}

#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct OrderAsset {
    #[serde(default)]
    pub image_url: Option<String>,
}

// ============ Stats ============

/// Body of `GET /v1/collection/{slug}/stats`.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StatsResponse {
    pub stats: CollectionStats,
}

#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct CollectionStats {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub floor_price: Option<f64>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub one_day_volume: Option<f64>,
}

// ============ Raw payload ============

/// Parsed upstream body, one variant per request kind.
#[derive(Debug, Clone)]
pub enum RawPayload {
    Listings(ListingsResponse),
    Stats(StatsResponse),
}
