#![allow(clippy::cast_precision_loss)]

use serde::{Deserialize, Serialize};

use crate::config::types::AnalyticsConfig;
use crate::domain::listing::Listing;

use super::stats;

/// How price and amenity breadth relate to guest ratings, over the rated
/// part of the market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RatingCorrelation {
    /// Listings that carried a rating and entered the sample.
    pub rated_count: u32,
    /// Listings excluded for having no rating, reported for transparency.
    pub unrated_count: u32,
    /// Rated listings excluded from the price pairing for lack of a price.
    pub skipped_missing_price: u32,
    /// Pearson r between nightly price and rating.
    pub price_rating: Option<f64>,
    /// Pearson r between amenity count and rating.
    pub amenity_count_rating: Option<f64>,
    /// Fewer rated listings than the configured floor: coefficients are
    /// withheld rather than reported numerically unstable.
    pub insufficient_data: bool,
}

impl std::fmt::Display for RatingCorrelation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "# Rating correlation ({} rated, {} unrated)",
            self.rated_count, self.unrated_count
        )?;
        if self.insufficient_data {
            return writeln!(f, "Insufficient rated listings for stable correlations");
        }
        if let Some(r) = self.price_rating {
            writeln!(f, "Price vs rating: r = {r:.3}")?;
        }
        if let Some(r) = self.amenity_count_rating {
            writeln!(f, "Amenity count vs rating: r = {r:.3}")?;
        }
        Ok(())
    }
}

/// Correlates price and amenity count with ratings.
///
/// Only listings with a rating enter the sample; below the configured
/// minimum the result is flagged insufficient instead of reporting an
/// unstable coefficient. Zero-variance samples yield `None`, never NaN.
pub fn rating_correlation(listings: &[Listing], config: &AnalyticsConfig) -> RatingCorrelation {
    let mut rated_count = 0;
    let mut unrated_count = 0;
    let mut skipped_missing_price = 0;
    let mut price_pairs: (Vec<f64>, Vec<f64>) = (Vec::new(), Vec::new());
    let mut amenity_pairs: (Vec<f64>, Vec<f64>) = (Vec::new(), Vec::new());

    for listing in listings {
        let Some(rating) = listing.rating else {
            unrated_count += 1;
            continue;
        };
        rated_count += 1;
        match listing.price {
            Some(price) => {
                price_pairs.0.push(price);
                price_pairs.1.push(rating);
            }
            None => skipped_missing_price += 1,
        }
        amenity_pairs.0.push(listing.amenities.len() as f64);
        amenity_pairs.1.push(rating);
    }

    let insufficient_data = rated_count < config.min_rated_listings;
    let (price_rating, amenity_count_rating) = if insufficient_data {
        (None, None)
    } else {
        (
            stats::pearson(&price_pairs.0, &price_pairs.1),
            stats::pearson(&amenity_pairs.0, &amenity_pairs.1),
        )
    };

    RatingCorrelation {
        rated_count,
        unrated_count,
        skipped_missing_price,
        price_rating,
        amenity_count_rating,
        insufficient_data,
    }
}
