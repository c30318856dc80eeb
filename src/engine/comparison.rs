#![allow(clippy::cast_precision_loss)]

use serde::{Deserialize, Serialize};

use crate::config::types::AnalyticsConfig;
use crate::domain::listing::Listing;
use crate::domain::segment::{GeneralizationLevel, SegmentKey};

use super::segments::SegmentIndex;
use super::stats;

/// Whether a host listing could be placed in a market price distribution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PositionStatus {
    Ranked,
    /// No resolvable segment (empty market) or no listing price; kept in
    /// the report so callers can audit coverage.
    Unranked,
}

/// One host listing's standing within its resolved market segment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingPosition {
    pub listing_id: String,
    pub price: Option<f64>,
    pub segment: Option<SegmentKey>,
    pub generalization: Option<GeneralizationLevel>,
    /// Price percentile within the segment, in [0, 100].
    pub percentile: Option<f64>,
    /// Listing price minus segment median.
    pub median_gap: Option<f64>,
    pub status: PositionStatus,
}

/// Host-level positioning against the market.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PositioningReport {
    pub positions: Vec<ListingPosition>,
    pub ranked_count: u32,
    pub unranked_count: u32,
    pub mean_percentile: Option<f64>,
    /// Ranked listings priced above / below their segment median.
    pub above_median: u32,
    pub below_median: u32,
}

impl std::fmt::Display for PositioningReport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "# Market positioning ({} ranked, {} unranked)",
            self.ranked_count, self.unranked_count
        )?;
        if let Some(mean) = self.mean_percentile {
            writeln!(f, "Mean percentile: {mean:.0}")?;
        }
        writeln!(
            f,
            "Above segment median: {} | below: {}",
            self.above_median, self.below_median
        )?;
        for position in &self.positions {
            match (position.percentile, position.median_gap) {
                (Some(pct), Some(gap)) => {
                    write!(
                        f,
                        "  {} — P{pct:.0}, {gap:+.0} vs median",
                        position.listing_id
                    )?;
                    if let Some(level) = position.generalization {
                        write!(f, " ({level})")?;
                    }
                    writeln!(f)?;
                }
                _ => writeln!(f, "  {} — unranked", position.listing_id)?,
            }
        }
        Ok(())
    }
}

/// Positions each of a host's listings within its resolved market segment
/// and aggregates the results.
///
/// Segment resolution reuses the generalization ladder, so a sparse exact
/// segment is compared against its broader rung, with the rung recorded
/// for audit. Listings that cannot be ranked stay in the report, flagged.
pub fn compare(
    host_listings: &[Listing],
    index: &SegmentIndex,
    config: &AnalyticsConfig,
) -> PositioningReport {
    let mut positions = Vec::with_capacity(host_listings.len());
    let mut percentiles = Vec::new();
    let mut above_median = 0;
    let mut below_median = 0;

    for listing in host_listings {
        let resolved = index.segment_for(
            listing.neighbourhood.as_deref(),
            listing.room_type.as_deref(),
            config.min_segment_size,
        );
        let position = match (listing.price, resolved) {
            (Some(price), Some(resolved)) => {
                let percentile = stats::percentile_rank(&resolved.segment.prices, price);
                let median_gap = resolved.segment.price_stats.map(|s| price - s.median);
                if let Some(gap) = median_gap {
                    if gap > 0.0 {
                        above_median += 1;
                    } else if gap < 0.0 {
                        below_median += 1;
                    }
                }
                if let Some(pct) = percentile {
                    percentiles.push(pct);
                }
                ListingPosition {
                    listing_id: listing.id.clone(),
                    price: listing.price,
                    segment: Some(resolved.segment.key.clone()),
                    generalization: Some(resolved.level),
                    percentile,
                    median_gap,
                    status: PositionStatus::Ranked,
                }
            }
            _ => ListingPosition {
                listing_id: listing.id.clone(),
                price: listing.price,
                segment: None,
                generalization: None,
                percentile: None,
                median_gap: None,
                status: PositionStatus::Unranked,
            },
        };
        positions.push(position);
    }

    let ranked_count = positions
        .iter()
        .filter(|p| p.status == PositionStatus::Ranked)
        .count() as u32;
    PositioningReport {
        unranked_count: positions.len() as u32 - ranked_count,
        ranked_count,
        mean_percentile: stats::mean(&percentiles),
        above_median,
        below_median,
        positions,
    }
}
