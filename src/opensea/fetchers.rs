use super::{errors::FetchError, OpenseaAPIClient};
use crate::storage::preprocess::{normalize_listings, normalize_stats};
use crate::storage::{ListingRecord, StatsRecord};

pub async fn fetch_collection_listings(
    client: &OpenseaAPIClient,
    collection_slug: &str,
) -> Result<Vec<ListingRecord>, FetchError> {
    let resp = client.fetch_listings(collection_slug).await?;
    let normalized = normalize_listings(&resp);

    if !normalized.skipped.is_empty() {
        log::info!(
            "{}: kept {} listings, skipped {}",
            collection_slug,
            normalized.records.len(),
            normalized.skipped.len()
        );
    }

    Ok(normalized.records)
}

pub async fn fetch_collection_stats(
    client: &OpenseaAPIClient,
    collection_slug: &str,
) -> Result<StatsRecord, FetchError> {
    let resp = client.fetch_stats(collection_slug).await?;
    Ok(normalize_stats(&resp))
}
