use nft_offers::api::server;
use nft_offers::config::Config;
use nft_offers::opensea::OpenseaAPIClient;
use nft_offers::service::OffersService;
use nft_offers::storage::CollectionCache;
use nft_offers::updater::Updater;

use anyhow::Result;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env()?;
    let client = OpenseaAPIClient::from_config(&config)?;
    let service = OffersService::new(Arc::new(client), Arc::new(CollectionCache::new()));

    // run the updater in the background
    let updater = Updater::from_config(&service, &config);
    log::info!(
        "Refreshing {:?} every {:?}",
        updater.collections(),
        config.refresh_interval
    );
    tokio::task::spawn(async move {
        if let Err(e) = updater.run().await {
            log::error!("Updater stopped: {}", e);
        }
    });

    //start the server
    server::start(service, config.bind_addr()).await;
    Ok(())
}
