use super::{CollectionCache, ListingRecord, StatsRecord};
use chrono::Utc;
use std::sync::Arc;

// Writers swap one field group under the write lock. A reader holding an older
// `Arc` keeps its copy; the next `get` sees the new one.
impl CollectionCache {
    // ============ Listings ============
    pub fn replace_listings(&self, collection_slug: &str, listings: Vec<ListingRecord>) {
        let mut entries = self.entries.write();
        let entry = Arc::make_mut(entries.entry(collection_slug.to_string()).or_default());
        entry.listings = listings;
        entry.listings_updated_at = Some(Utc::now());
    }

    // ============ Stats ============
    pub fn replace_stats(&self, collection_slug: &str, stats: StatsRecord) {
        let mut entries = self.entries.write();
        let entry = Arc::make_mut(entries.entry(collection_slug.to_string()).or_default());
        entry.stats = Some(stats);
        entry.stats_updated_at = Some(Utc::now());
    }
}
