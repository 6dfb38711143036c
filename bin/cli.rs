use anyhow::Result;
use clap::{Parser, Subcommand};
use nft_offers::config::Config;
use nft_offers::opensea::fetchers::{fetch_collection_listings, fetch_collection_stats};
use nft_offers::opensea::OpenseaAPIClient;

#[derive(Parser)]
#[command(name = "nft-offers", version, about = "One-shot marketplace fetches")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch and normalize the active listings of a collection
    Offers { collection_slug: String },
    /// Fetch floor price and one day volume of a collection
    Stats { collection_slug: String },
}

#[tokio::main]
pub async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = Config::from_env()?;
    let client = OpenseaAPIClient::from_config(&config)?;

    match cli.command {
        Command::Offers { collection_slug } => {
            let listings = fetch_collection_listings(&client, &collection_slug).await?;
            println!("{}", serde_json::to_string_pretty(&listings)?);
        }
        Command::Stats { collection_slug } => {
            let stats = fetch_collection_stats(&client, &collection_slug).await?;
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
    }

    Ok(())
}
