pub mod offers;

use crate::service::OffersService;
use crate::updater::UpdaterState;
use rweb::*;

#[derive(Debug, Schema, serde::Serialize, serde::Deserialize)]
pub struct CollectionStatusJSON {
    pub slug: String,
    pub listings: usize,
    pub listings_updated_at: Option<String>,
    pub stats_updated_at: Option<String>,
}

#[derive(Debug, Schema, serde::Serialize, serde::Deserialize)]
pub struct StatusJSON {
    /// `idle` or `refreshing`
    pub state: String,
    pub collections: Vec<CollectionStatusJSON>,
}

#[get("/status")]
#[openapi(tags("System"))]
#[openapi(summary = "Healthcheck")]
#[openapi(description = r#"
Reports whether a refresh cycle is running and what is currently cached
"#)]
pub async fn status(#[data] service: OffersService) -> Result<Json<StatusJSON>, Rejection> {
    let state = match service.status().state() {
        UpdaterState::Idle => "idle",
        UpdaterState::Refreshing => "refreshing",
    };
    let collections = service
        .cache()
        .snapshot()
        .into_iter()
        .map(|(slug, entry)| CollectionStatusJSON {
            slug,
            listings: entry.listings.len(),
            listings_updated_at: entry.listings_updated_at.map(|t| t.to_rfc3339()),
            stats_updated_at: entry.stats_updated_at.map(|t| t.to_rfc3339()),
        })
        .collect();

    Ok(StatusJSON {
        state: state.to_string(),
        collections,
    }
    .into())
}
