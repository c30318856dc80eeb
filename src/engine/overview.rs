use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::config::types::AnalyticsConfig;
use crate::domain::listing::Listing;

use super::stats;

/// Reading of the market's price spread: does the spread leave room for
/// premium positioning, or does it demand competitive pricing?
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PricingPosture {
    PremiumFriendly,
    CompetitionDriven,
}

impl std::fmt::Display for PricingPosture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PremiumFriendly => {
                write!(f, "high price variance leaves room for premium positioning")
            }
            Self::CompetitionDriven => {
                write!(f, "low price variance calls for competitive pricing")
            }
        }
    }
}

/// Headline statistics for a whole market dataset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarketOverview {
    pub total_listings: u32,
    /// Distinct non-missing neighbourhoods.
    pub neighbourhoods: u32,
    /// Distinct non-missing room types.
    pub room_types: u32,
    pub mean_price: Option<f64>,
    pub median_price: Option<f64>,
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub price_std_dev: Option<f64>,
    pub pricing_posture: Option<PricingPosture>,
    /// Listings excluded from price statistics for lack of a price.
    pub skipped_missing_price: u32,
}

impl std::fmt::Display for MarketOverview {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# Market overview")?;
        writeln!(f, "Listings: {}", self.total_listings)?;
        writeln!(
            f,
            "Neighbourhoods: {} | Room types: {}",
            self.neighbourhoods, self.room_types
        )?;
        if let (Some(mean), Some(median)) = (self.mean_price, self.median_price) {
            writeln!(f, "Avg price: {mean:.0}/night (median {median:.0})")?;
        }
        if let (Some(min), Some(max)) = (self.min_price, self.max_price) {
            writeln!(f, "Price range: {min:.0} - {max:.0}/night")?;
        }
        if let Some(sd) = self.price_std_dev {
            writeln!(f, "Price std dev: {sd:.0}")?;
        }
        if let Some(posture) = self.pricing_posture {
            writeln!(f, "Posture: {posture}")?;
        }
        if self.skipped_missing_price > 0 {
            writeln!(f, "Skipped (no price): {}", self.skipped_missing_price)?;
        }
        Ok(())
    }
}

/// Computes dataset-wide totals and price statistics, plus the variance
/// posture: a std dev above `variance_posture_ratio` × mean reads as a
/// market that rewards premium pricing.
pub fn market_overview(listings: &[Listing], config: &AnalyticsConfig) -> MarketOverview {
    let neighbourhoods: BTreeSet<&str> = listings
        .iter()
        .filter_map(|l| l.neighbourhood.as_deref())
        .filter(|s| !s.trim().is_empty())
        .collect();
    let room_types: BTreeSet<&str> = listings
        .iter()
        .filter_map(|l| l.room_type.as_deref())
        .filter(|s| !s.trim().is_empty())
        .collect();

    let mut prices: Vec<f64> = listings.iter().filter_map(|l| l.price).collect();
    stats::sort_prices(&mut prices);
    let mean_price = stats::mean(&prices);
    let price_std_dev = stats::std_dev(&prices);
    let pricing_posture = match (mean_price, price_std_dev) {
        (Some(mean), Some(sd)) if mean > f64::EPSILON => {
            if sd > config.variance_posture_ratio * mean {
                Some(PricingPosture::PremiumFriendly)
            } else {
                Some(PricingPosture::CompetitionDriven)
            }
        }
        _ => None,
    };

    MarketOverview {
        total_listings: listings.len() as u32,
        neighbourhoods: neighbourhoods.len() as u32,
        room_types: room_types.len() as u32,
        mean_price,
        median_price: stats::median(&prices),
        min_price: prices.first().copied(),
        max_price: prices.last().copied(),
        price_std_dev,
        pricing_posture,
        skipped_missing_price: (listings.len() - prices.len()) as u32,
    }
}
