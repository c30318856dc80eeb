#![allow(clippy::cast_precision_loss)]

use crate::config::types::AnalyticsConfig;
use crate::domain::listing::ListingProfile;
use crate::domain::recommendation::{Confidence, PriceTier, Recommendation};
use crate::domain::segment::{GeneralizationLevel, Segment};

use super::segments::SegmentIndex;

/// Produces price guidance for a listing or hypothetical profile.
///
/// The profile's segment is resolved through the generalization ladder;
/// tier bands come from that segment's price quartiles. A profile with a
/// current price is told which band it sits in; one without gets the
/// Competitive band as the default suggestion. An empty market yields an
/// explicitly unranked result — never an error.
pub fn recommend(
    profile: &ListingProfile,
    index: &SegmentIndex,
    config: &AnalyticsConfig,
) -> Recommendation {
    let Some(resolved) = index.segment_for(
        profile.neighbourhood.as_deref(),
        profile.room_type.as_deref(),
        config.min_segment_size,
    ) else {
        return Recommendation::unranked();
    };
    let segment = resolved.segment;
    // segment_for only returns rungs with a price distribution
    let Some(dist) = segment.price_stats else {
        return Recommendation::unranked();
    };

    let confidence = match resolved.level {
        GeneralizationLevel::Exact if segment.count >= 2 * config.min_segment_size => {
            Confidence::High
        }
        GeneralizationLevel::Exact if segment.count >= config.min_segment_size => {
            Confidence::Medium
        }
        _ => Confidence::Low,
    };

    let (tier, suggested_range) = if dist.is_degenerate() {
        // All observed prices are (quartile-wise) identical: a zero-width
        // tier would be inconsistent, so widen around a reference price.
        let reference = profile.price.unwrap_or(dist.median);
        let band = config.degenerate_band_ratio;
        (
            PriceTier::Competitive,
            (reference * (1.0 - band), reference * (1.0 + band)),
        )
    } else {
        let tier = profile
            .price
            .map_or(PriceTier::Competitive, |price| {
                PriceTier::for_price(price, &dist)
            });
        (tier, tier.bounds(&dist))
    };
    let suggested_range = (suggested_range.0.max(0.0), suggested_range.1.max(0.0));

    Recommendation {
        segment: Some(segment.key.clone()),
        generalization: Some(resolved.level),
        tier: Some(tier),
        suggested_range: Some(suggested_range),
        confidence,
        sample_size: segment.count,
        unranked: false,
        amenity_suggestions: suggest_amenities(profile, segment, config),
    }
}

/// Amenities that are common in the segment but missing from the profile,
/// most prevalent first. Frequency order comes from the segment's amenity
/// table; ties resolve alphabetically via the underlying `BTreeMap`.
fn suggest_amenities(
    profile: &ListingProfile,
    segment: &Segment,
    config: &AnalyticsConfig,
) -> Vec<String> {
    if segment.count == 0 {
        return Vec::new();
    }
    let floor = (f64::from(segment.count) * config.amenity_suggestion_share).ceil() as u32;
    let mut candidates: Vec<(&String, u32)> = segment
        .amenity_counts
        .iter()
        .filter(|(amenity, count)| **count >= floor && !profile.amenities.contains(*amenity))
        .map(|(amenity, count)| (amenity, *count))
        .collect();
    candidates.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    candidates
        .into_iter()
        .take(config.max_amenity_suggestions)
        .map(|(amenity, _)| amenity.clone())
        .collect()
}
