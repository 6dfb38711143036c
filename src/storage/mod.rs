use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::Arc;

pub mod preprocess;
pub mod read;
pub mod write;

/// One active sale listing, prices in whole currency units.
#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, PartialEq)]
pub struct ListingRecord {
    pub token_id: String,
    pub currency: String,
    pub price: Decimal,
    pub order_hash: String,
    pub image_url: String,
}

#[derive(serde::Serialize, serde::Deserialize, Debug, Clone, Copy, Default, PartialEq)]
pub struct StatsRecord {
    pub floor_price: Option<Decimal>,
    pub one_day_volume: Option<Decimal>,
}

#[derive(serde::Serialize, Debug, Clone, Default, PartialEq)]
pub struct CacheEntry {
    /// Upstream response order.
    pub listings: Vec<ListingRecord>,
    pub stats: Option<StatsRecord>,
    pub listings_updated_at: Option<DateTime<Utc>>,
    pub stats_updated_at: Option<DateTime<Utc>>,
}

/// Process-wide collection slug -> entry mapping.
///
/// Entries are handed out as `Arc`s and replaced copy-on-write, so the lock is
/// only ever held for a map lookup or a field swap and never across network I/O.
#[derive(Debug, Default)]
pub struct CollectionCache {
    entries: RwLock<HashMap<String, Arc<CacheEntry>>>,
}

impl CollectionCache {
    pub fn new() -> Self {
        Self::default()
    }
}
