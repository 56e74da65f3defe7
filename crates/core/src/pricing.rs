//! Price derivation from platform currency and episode counts.
//!
//! Prices arrive in diamonds (钻石); 10 diamonds are one yuan. Totals are kept
//! exact and only rounded to 2 decimals when a per-episode price is derived or a
//! value is rendered.

use std::fmt;

use serde::{Serialize, Serializer};

/// Diamonds per currency unit.
pub const DIAMONDS_PER_YUAN: f64 = 10.0;

/// Round to 2 decimals, exact ties to the even digit (0.125 → 0.12).
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

fn serialize_rounded<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(round2(*value))
}

/// A price per episode, keeping apart why it might be missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PerEpisodePrice {
    /// Denominator not stated in the abstract.
    Unknown,
    /// Denominator stated as zero.
    Zero,
    /// Computed price, rounded to 2 decimals.
    Value(f64),
}

impl PerEpisodePrice {
    fn over(total: f64, episodes: Option<u32>) -> Self {
        match episodes {
            None => PerEpisodePrice::Unknown,
            Some(0) => PerEpisodePrice::Zero,
            Some(n) => PerEpisodePrice::Value(round2(total / f64::from(n))),
        }
    }

    /// Numeric value with `0` standing in for `Unknown` and `Zero`.
    pub fn sentinel(&self) -> f64 {
        match self {
            PerEpisodePrice::Value(v) => *v,
            PerEpisodePrice::Unknown | PerEpisodePrice::Zero => 0.0,
        }
    }

    pub fn is_value(&self) -> bool {
        matches!(self, PerEpisodePrice::Value(_))
    }
}

impl fmt::Display for PerEpisodePrice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PerEpisodePrice::Value(v) => write!(f, "{v:.2}"),
            PerEpisodePrice::Unknown | PerEpisodePrice::Zero => f.write_str("0"),
        }
    }
}

impl Serialize for PerEpisodePrice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.sentinel())
    }
}

/// Non-fatal problems met while pricing a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingWarning {
    MainEpisodesUnknown,
    MainEpisodesZero,
    PaidEpisodesUnknown,
    PaidEpisodesZero,
}

impl fmt::Display for PricingWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            PricingWarning::MainEpisodesUnknown => "main episode count unknown; average price set to 0",
            PricingWarning::MainEpisodesZero => "main episode count is 0; average price set to 0",
            PricingWarning::PaidEpisodesUnknown => "paid episode count unknown; unit price set to 0",
            PricingWarning::PaidEpisodesZero => "no paid episodes; unit price set to 0",
        };
        f.write_str(msg)
    }
}

/// Derived prices for one listing, in yuan.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PricingInfo {
    #[serde(serialize_with = "serialize_rounded")]
    pub total_price: f64,
    pub avg_price_per_episode: PerEpisodePrice,
    pub unit_price_per_paid_episode: PerEpisodePrice,
}

impl PricingInfo {
    /// Total price rounded for display.
    pub fn total_price_rounded(&self) -> f64 {
        round2(self.total_price)
    }

    pub fn warnings(&self) -> Vec<PricingWarning> {
        let mut warnings = Vec::new();
        match self.avg_price_per_episode {
            PerEpisodePrice::Unknown => warnings.push(PricingWarning::MainEpisodesUnknown),
            PerEpisodePrice::Zero => warnings.push(PricingWarning::MainEpisodesZero),
            PerEpisodePrice::Value(_) => {}
        }
        match self.unit_price_per_paid_episode {
            PerEpisodePrice::Unknown => warnings.push(PricingWarning::PaidEpisodesUnknown),
            PerEpisodePrice::Zero => warnings.push(PricingWarning::PaidEpisodesZero),
            PerEpisodePrice::Value(_) => {}
        }
        warnings
    }
}

/// Derive total, average and paid-episode prices.
pub fn calculate_pricing(price_units: u64, main_episodes: Option<u32>, paid_episodes: Option<u32>) -> PricingInfo {
    let total_price = price_units as f64 / DIAMONDS_PER_YUAN;

    PricingInfo {
        total_price,
        avg_price_per_episode: PerEpisodePrice::over(total_price, main_episodes),
        unit_price_per_paid_episode: PerEpisodePrice::over(total_price, paid_episodes),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_pricing() {
        let info = calculate_pricing(200, Some(10), Some(8));
        assert_eq!(info.total_price, 20.0);
        assert_eq!(info.avg_price_per_episode, PerEpisodePrice::Value(2.0));
        assert_eq!(info.unit_price_per_paid_episode, PerEpisodePrice::Value(2.5));
        assert!(info.warnings().is_empty());
    }

    #[test]
    fn test_unknown_main_is_sentinel_with_warning() {
        let info = calculate_pricing(50, None, None);
        assert_eq!(info.total_price, 5.0);
        assert_eq!(info.avg_price_per_episode, PerEpisodePrice::Unknown);
        assert_eq!(info.avg_price_per_episode.sentinel(), 0.0);
        assert_eq!(info.warnings(), vec![PricingWarning::MainEpisodesUnknown, PricingWarning::PaidEpisodesUnknown]);
    }

    #[test]
    fn test_zero_paid_episodes() {
        let info = calculate_pricing(99, Some(3), Some(0));
        assert_eq!(info.unit_price_per_paid_episode, PerEpisodePrice::Zero);
        assert_eq!(info.unit_price_per_paid_episode.sentinel(), 0.0);
        assert_eq!(info.warnings(), vec![PricingWarning::PaidEpisodesZero]);
    }

    #[test]
    fn test_rounding_only_on_derived_values() {
        let info = calculate_pricing(299, Some(3), Some(3));
        assert_eq!(info.total_price, 29.9);
        assert_eq!(info.avg_price_per_episode, PerEpisodePrice::Value(9.97));
        assert_eq!(info.total_price_rounded(), 29.9);
    }

    #[test]
    fn test_ties_round_to_even() {
        let info = calculate_pricing(10, Some(8), Some(8));
        assert_eq!(info.avg_price_per_episode, PerEpisodePrice::Value(0.12));

        let info = calculate_pricing(30, Some(8), Some(8));
        assert_eq!(info.unit_price_per_paid_episode, PerEpisodePrice::Value(0.38));
    }

    #[test]
    fn test_display() {
        assert_eq!(PerEpisodePrice::Value(2.5).to_string(), "2.50");
        assert_eq!(PerEpisodePrice::Unknown.to_string(), "0");
        assert_eq!(PerEpisodePrice::Zero.to_string(), "0");
    }

    #[test]
    fn test_serialize_as_sentinel() {
        let info = calculate_pricing(200, None, Some(8));
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["total_price"], 20.0);
        assert_eq!(json["avg_price_per_episode"], 0.0);
        assert_eq!(json["unit_price_per_paid_episode"], 2.5);
    }
}
