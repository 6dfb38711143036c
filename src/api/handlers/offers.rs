use super::super::errors::{bad_request, not_found};
use crate::service::OffersService;
use crate::storage::{ListingRecord, StatsRecord};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rweb::*;

static NOT_FOUND: &str = "Collection not found";

#[derive(Debug, Schema, serde::Serialize, serde::Deserialize)]
pub struct OfferJSON {
    pub id: String,
    pub currency: String,
    pub price: f64,
    pub order_hash: String,
    pub image_url: String,
}

impl From<&ListingRecord> for OfferJSON {
    fn from(l: &ListingRecord) -> Self {
        Self {
            id: l.token_id.clone(),
            currency: l.currency.clone(),
            price: to_f64(l.price),
            order_hash: l.order_hash.clone(),
            image_url: l.image_url.clone(),
        }
    }
}

#[derive(Debug, Schema, serde::Serialize, serde::Deserialize)]
pub struct StatsJSON {
    pub floor_price: Option<f64>,
    pub one_day_volume: Option<f64>,
}

impl From<StatsRecord> for StatsJSON {
    fn from(s: StatsRecord) -> Self {
        Self {
            floor_price: s.floor_price.map(to_f64),
            one_day_volume: s.one_day_volume.map(to_f64),
        }
    }
}

fn to_f64(d: Decimal) -> f64 {
    d.to_f64().unwrap_or_default()
}

fn check_slug(collection_slug: &str) -> Result<(), Rejection> {
    if collection_slug.trim().is_empty() {
        return Err(bad_request("collection slug must not be empty"));
    }
    Ok(())
}

#[get("/offers/{collection_slug}")]
#[openapi(tags("Collection"))]
#[openapi(summary = "Get active listings for a collection")]
#[openapi(description = r#"
Returns the cached listings for collection_slug, fetching them from the marketplace on first request
"#)]
pub async fn get_offers(
    #[data] service: OffersService,
    collection_slug: String,
) -> Result<Json<Vec<OfferJSON>>, Rejection> {
    ::log::info!("/offers/{}", collection_slug);
    check_slug(&collection_slug)?;

    match service.get_offers(&collection_slug).await {
        Some(listings) => Ok(listings.iter().map(OfferJSON::from).collect::<Vec<_>>().into()),
        None => Err(not_found(NOT_FOUND)),
    }
}

#[get("/stats/{collection_slug}")]
#[openapi(tags("Collection"))]
#[openapi(summary = "Get floor price and volume for a collection")]
#[openapi(description = r#"
Returns the cached stats for collection_slug, fetching the collection on first request
"#)]
pub async fn get_stats(
    #[data] service: OffersService,
    collection_slug: String,
) -> Result<Json<StatsJSON>, Rejection> {
    ::log::info!("/stats/{}", collection_slug);
    check_slug(&collection_slug)?;

    match service.get_stats(&collection_slug).await {
        Some(stats) => Ok(StatsJSON::from(stats).into()),
        None => Err(not_found(NOT_FOUND)),
    }
}
