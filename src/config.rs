use crate::opensea::{retry::RetryPolicy, API_BASE};
use anyhow::{anyhow, Result};
use dotenv::dotenv;
use std::fmt::Display;
use std::net::{Ipv4Addr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

pub static DEFAULT_COLLECTIONS: &str = "nakamigos";

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub api_base: String,
    /// Collections refreshed on a timer. Anything else is filled on demand.
    pub collections: Vec<String>,
    pub listings_limit: usize,
    pub refresh_interval: Duration,
    pub refresh_concurrency: usize,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub endpoint: Ipv4Addr,
    pub port: u16,
}

impl Config {
    /// Reads `.env` (if any) and the process environment.
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("OPENSEA_API_KEY")
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| anyhow!("OPENSEA_API_KEY must be set"))?;

        let collections = parse_collections(
            &lookup("COLLECTIONS").unwrap_or_else(|| DEFAULT_COLLECTIONS.to_string()),
        );

        let retry = RetryPolicy::new(
            parse_or(&lookup, "RETRY_ATTEMPTS", 3u32)?,
            Duration::from_millis(parse_or(&lookup, "RETRY_DELAY_MS", 1000u64)?),
        );

        let refresh_interval =
            Duration::from_secs(parse_or(&lookup, "REFRESH_INTERVAL_SECS", 600u64)?);
        if refresh_interval.is_zero() {
            return Err(anyhow!("REFRESH_INTERVAL_SECS must be greater than zero"));
        }

        Ok(Self {
            api_key,
            api_base: lookup("OPENSEA_API_BASE").unwrap_or_else(|| API_BASE.to_string()),
            collections,
            listings_limit: parse_or(&lookup, "LISTINGS_LIMIT", 10usize)?,
            refresh_interval,
            refresh_concurrency: parse_or(&lookup, "REFRESH_CONCURRENCY", 4usize)?.max(1),
            retry,
            request_timeout: Duration::from_secs(parse_or(&lookup, "REQUEST_TIMEOUT_SECS", 10u64)?),
            endpoint: parse_or(&lookup, "ENDPOINT", Ipv4Addr::UNSPECIFIED)?,
            port: parse_or(&lookup, "PORT", 8000u16)?,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::from((self.endpoint, self.port))
    }
}

/// Comma separated slugs; blanks are ignored and duplicates dropped.
pub fn parse_collections(raw: &str) -> Vec<String> {
    let mut collections: Vec<String> = vec![];
    for slug in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        if !collections.iter().any(|c| c == slug) {
            collections.push(slug.to_string());
        }
    }
    collections
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| anyhow!("invalid {} {:?}: {}", key, raw, e)),
        _ => Ok(default),
    }
}
