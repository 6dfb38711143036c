extern crate dotenv;

pub mod api;
pub mod config;
pub mod opensea;
pub mod service;
pub mod storage;
pub mod updater;

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

/// Decimals used by the marketplace for native currency amounts.
pub const WEI_DECIMALS: u32 = 18;

/// Converts an integer amount in the smallest currency unit into whole units.
///
/// The conversion is exact: `"500000000000000000"` becomes `0.5`.
pub fn from_wei(raw: &str) -> Result<Decimal> {
    let wei: u128 = raw
        .trim()
        .parse()
        .map_err(|e| anyhow!("invalid wei amount {:?}: {}", raw, e))?;
    let wei = i128::try_from(wei).map_err(|_| anyhow!("wei amount {} out of range", raw))?;
    Decimal::try_from_i128_with_scale(wei, WEI_DECIMALS)
        .map(|d| d.normalize())
        .map_err(|e| anyhow!("wei amount {} out of range: {}", raw, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_from_wei_exact() {
        assert_eq!(from_wei("1000000000000000000").unwrap(), Decimal::ONE);
        assert_eq!(from_wei("500000000000000000").unwrap(), Decimal::new(5, 1));
        assert_eq!(
            from_wei("1234500000000000000").unwrap(),
            Decimal::from_str("1.2345").unwrap()
        );
        assert_eq!(from_wei("0").unwrap(), Decimal::ZERO);
        assert_eq!(from_wei("500000000000000000").unwrap().to_string(), "0.5");
    }

    #[test]
    fn test_from_wei_rejects_garbage() {
        assert!(from_wei("").is_err());
        assert!(from_wei("-1").is_err());
        assert!(from_wei("1.5").is_err());
        assert!(from_wei("0x10").is_err());
        assert!(from_wei("340282366920938463463374607431768211455").is_err());
    }
}
