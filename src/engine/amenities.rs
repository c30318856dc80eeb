#![allow(clippy::cast_precision_loss)]

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::config::types::AnalyticsConfig;
use crate::domain::listing::Listing;
use crate::domain::segment::SegmentKey;

use super::segments::SegmentIndex;
use super::stats;

/// Marginal price contribution of one amenity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmenityImpact {
    pub amenity: String,
    /// Listings carrying the amenity, dataset-wide.
    pub with_count: u32,
    /// Listings lacking it, dataset-wide.
    pub without_count: u32,
    /// Sample-size-weighted mean price delta (has − lacks), averaged
    /// across segments to avoid neighbourhood-price confounds.
    pub mean_delta: f64,
    /// `mean_delta` divided by the market price std dev: dimensionless,
    /// comparable across amenities. Absent when normalization is not
    /// meaningful.
    pub impact_score: Option<f64>,
    /// One contrast side fell below the evidence threshold.
    pub insufficient_data: bool,
}

/// Full amenity analysis: the ranked list plus everything that lacked the
/// evidence to be ranked, kept separately for transparency.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmenityReport {
    /// Sufficient-evidence amenities, impact score descending.
    pub ranked: Vec<AmenityImpact>,
    /// Below-threshold amenities, name order.
    pub insufficient: Vec<AmenityImpact>,
    pub market_price_std_dev: Option<f64>,
}

impl std::fmt::Display for AmenityReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# Amenity impact")?;
        writeln!(
            f,
            "{:<30} {:>8} {:>8} {:>10} {:>8}",
            "Amenity", "With", "Without", "Delta", "Score"
        )?;
        for impact in &self.ranked {
            writeln!(
                f,
                "{:<30} {:>8} {:>8} {:>10.0} {:>8.2}",
                impact.amenity,
                impact.with_count,
                impact.without_count,
                impact.mean_delta,
                impact.impact_score.unwrap_or(0.0)
            )?;
        }
        if !self.insufficient.is_empty() {
            writeln!(f, "\nInsufficient data:")?;
            for impact in &self.insufficient {
                writeln!(
                    f,
                    "  {} ({} with / {} without)",
                    impact.amenity, impact.with_count, impact.without_count
                )?;
            }
        }
        Ok(())
    }
}

/// Estimates each amenity's marginal price contribution.
///
/// The has/lacks contrast is computed inside each segment and the per-
/// segment deltas are combined as a sample-size-weighted average, so a
/// premium neighbourhood full of saunas does not make saunas look valuable
/// market-wide. Output order is deterministic: score descending, then name.
pub fn amenity_impacts(
    listings: &[Listing],
    index: &SegmentIndex,
    config: &AnalyticsConfig,
) -> AmenityReport {
    let market_price_std_dev = stats::std_dev(&index.global().prices);

    // Per-segment price lists, split by amenity possession.
    let mut by_segment: BTreeMap<SegmentKey, Vec<&Listing>> = BTreeMap::new();
    let mut amenities: BTreeSet<&String> = BTreeSet::new();
    for listing in listings {
        let key = SegmentKey::from_parts(
            listing.neighbourhood.as_deref(),
            listing.room_type.as_deref(),
        );
        by_segment.entry(key).or_default().push(listing);
        amenities.extend(listing.amenities.iter());
    }

    let mut ranked = Vec::new();
    let mut insufficient = Vec::new();
    for amenity in amenities {
        let mut with_count: u32 = 0;
        let mut without_count: u32 = 0;
        let mut weighted_delta = 0.0;
        let mut total_weight = 0.0;
        for members in by_segment.values() {
            let mut has = Vec::new();
            let mut lacks = Vec::new();
            for listing in members {
                if listing.amenities.contains(amenity) {
                    with_count += 1;
                    if let Some(price) = listing.price {
                        has.push(price);
                    }
                } else {
                    without_count += 1;
                    if let Some(price) = listing.price {
                        lacks.push(price);
                    }
                }
            }
            if let (Some(mean_has), Some(mean_lacks)) = (stats::mean(&has), stats::mean(&lacks)) {
                let weight = (has.len() + lacks.len()) as f64;
                weighted_delta += weight * (mean_has - mean_lacks);
                total_weight += weight;
            }
        }

        let mean_delta = if total_weight > 0.0 {
            weighted_delta / total_weight
        } else {
            0.0
        };
        let contrasted = total_weight > 0.0
            && with_count >= config.min_amenity_count
            && without_count >= config.min_amenity_count;
        let impact_score = match market_price_std_dev {
            Some(sd) if sd > f64::EPSILON && contrasted => Some(mean_delta / sd),
            _ => None,
        };
        let impact = AmenityImpact {
            amenity: amenity.clone(),
            with_count,
            without_count,
            mean_delta,
            impact_score,
            insufficient_data: impact_score.is_none(),
        };
        if impact.insufficient_data {
            insufficient.push(impact);
        } else {
            ranked.push(impact);
        }
    }

    ranked.sort_by(|a, b| {
        b.impact_score
            .partial_cmp(&a.impact_score)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.amenity.cmp(&b.amenity))
    });

    AmenityReport {
        ranked,
        insufficient,
        market_price_std_dev,
    }
}
