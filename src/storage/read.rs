use super::{CacheEntry, CollectionCache};
use std::sync::Arc;

impl CollectionCache {
    // ============ Entry ============
    /// Last committed entry for `collection_slug`, possibly stale.
    pub fn get(&self, collection_slug: &str) -> Option<Arc<CacheEntry>> {
        self.entries.read().get(collection_slug).cloned()
    }

    pub fn has(&self, collection_slug: &str) -> bool {
        self.entries.read().contains_key(collection_slug)
    }

    // ============ Collections ============
    pub fn collection_slugs(&self) -> Vec<String> {
        let mut slugs = self.entries.read().keys().cloned().collect::<Vec<_>>();
        slugs.sort();
        slugs
    }

    /// Every entry sorted by slug, for status reporting.
    pub fn snapshot(&self) -> Vec<(String, Arc<CacheEntry>)> {
        let mut entries = self
            .entries
            .read()
            .iter()
            .map(|(slug, entry)| (slug.clone(), entry.clone()))
            .collect::<Vec<_>>();
        entries.sort_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}
