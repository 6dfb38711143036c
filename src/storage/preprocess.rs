use super::{ListingRecord, StatsRecord};
use crate::from_wei;
use crate::opensea::types::{CollectionStats, ListingsResponse, Order, RawPayload, StatsResponse};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Records that survived validation, plus why the rest were dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct Normalized<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedEntry>,
}

impl<T> Default for Normalized<T> {
    fn default() -> Self {
        Self {
            records: vec![],
            skipped: vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    /// Position in the upstream `listings` array.
    pub index: usize,
    pub reason: String,
}

pub fn normalize_listings(resp: &ListingsResponse) -> Normalized<ListingRecord> {
    let mut normalized = Normalized::default();

    for (index, raw) in resp.listings.iter().enumerate() {
        match listing_from_raw(raw) {
            Ok(listing) => normalized.records.push(listing),
            Err(reason) => {
                log::debug!("Skipping listing #{}: {}", index, reason);
                normalized.skipped.push(SkippedEntry { index, reason });
            }
        }
    }

    normalized
}

fn listing_from_raw(raw: &serde_json::Value) -> Result<ListingRecord, String> {
    let order = Order::deserialize(raw).map_err(|e| e.to_string())?;

    let token_id = order
        .protocol_data
        .parameters
        .offer
        .into_iter()
        .next()
        .ok_or_else(|| "order has no offer items".to_string())?
        .identifier_or_criteria;

    let price = from_wei(&order.price.current.value).map_err(|e| e.to_string())?;

    Ok(ListingRecord {
        token_id,
        currency: order.price.current.currency,
        price,
        order_hash: order.order_hash,
        image_url: order.asset.and_then(|a| a.image_url).unwrap_or_default(),
    })
}

/// Figures upstream did not report, or reported as negative, are absent rather than zero.
pub fn normalize_stats(resp: &StatsResponse) -> StatsRecord {
    let CollectionStats {
        floor_price,
        one_day_volume,
    } = resp.stats;

    StatsRecord {
        floor_price: floor_price.and_then(to_amount),
        one_day_volume: one_day_volume.and_then(to_amount),
    }
}

/// Dispatches on the payload kind; the listings half of a stats payload is empty and vice versa.
pub fn normalize(payload: &RawPayload) -> (Normalized<ListingRecord>, Option<StatsRecord>) {
    match payload {
        RawPayload::Listings(resp) => (normalize_listings(resp), None),
        RawPayload::Stats(resp) => (Normalized::default(), Some(normalize_stats(resp))),
    }
}

fn to_amount(v: f64) -> Option<Decimal> {
    if v.is_finite() && v >= 0.0 {
        Decimal::from_f64(v)
    } else {
        None
    }
}
