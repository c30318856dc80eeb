use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::listing::Listing;
use crate::domain::segment::{GeneralizationLevel, PriceDistribution, Segment, SegmentKey};

use super::stats;

/// Wildcard axis label for the aggregated generalization rungs.
pub const ANY: &str = "Any";

/// Partition of the listing population into (neighbourhood, room type)
/// segments, with the broader aggregates the generalization ladder needs
/// precomputed. Build it once per dataset and pass it to every consumer —
/// the engine never caches one internally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SegmentIndex {
    segments: BTreeMap<SegmentKey, Segment>,
    by_neighbourhood: BTreeMap<String, Segment>,
    by_room_type: BTreeMap<String, Segment>,
    global: Segment,
    /// Listings whose price was absent, across the whole dataset.
    pub skipped_missing_price: u32,
}

/// A ladder lookup result: the segment plus the rung it was found on.
#[derive(Debug, Clone, Copy)]
pub struct ResolvedSegment<'a> {
    pub segment: &'a Segment,
    pub level: GeneralizationLevel,
}

#[derive(Default)]
struct SegmentAccumulator {
    count: u32,
    prices: Vec<f64>,
    ratings: Vec<f64>,
    amenity_counts: BTreeMap<String, u32>,
    skipped_missing_price: u32,
}

impl SegmentAccumulator {
    fn add(&mut self, listing: &Listing) {
        self.count += 1;
        match listing.price {
            Some(price) => self.prices.push(price),
            None => self.skipped_missing_price += 1,
        }
        if let Some(rating) = listing.rating {
            self.ratings.push(rating);
        }
        for amenity in &listing.amenities {
            *self.amenity_counts.entry(amenity.clone()).or_insert(0) += 1;
        }
    }

    fn into_segment(mut self, key: SegmentKey) -> Segment {
        stats::sort_prices(&mut self.prices);
        let price_stats = distribution(&self.prices);
        Segment {
            key,
            count: self.count,
            mean_rating: stats::mean(&self.ratings),
            amenity_counts: self.amenity_counts,
            skipped_missing_price: self.skipped_missing_price,
            prices: self.prices,
            price_stats,
        }
    }
}

fn distribution(sorted: &[f64]) -> Option<PriceDistribution> {
    Some(PriceDistribution {
        min: *sorted.first()?,
        q1: stats::quantile(sorted, 0.25)?,
        median: stats::quantile(sorted, 0.5)?,
        q3: stats::quantile(sorted, 0.75)?,
        max: *sorted.last()?,
    })
}

impl SegmentIndex {
    /// Groups listings into segments and computes per-segment statistics.
    /// Listings missing a neighbourhood or room type land in the
    /// "Unclassified" sentinel so totals stay reconcilable. Zero listings
    /// yield an empty index, which downstream code treats as "no data".
    pub fn build(listings: &[Listing]) -> Self {
        let mut exact: BTreeMap<SegmentKey, SegmentAccumulator> = BTreeMap::new();
        let mut by_neighbourhood: BTreeMap<String, SegmentAccumulator> = BTreeMap::new();
        let mut by_room_type: BTreeMap<String, SegmentAccumulator> = BTreeMap::new();
        let mut global = SegmentAccumulator::default();

        for listing in listings {
            let key = SegmentKey::from_parts(
                listing.neighbourhood.as_deref(),
                listing.room_type.as_deref(),
            );
            by_neighbourhood
                .entry(key.neighbourhood.clone())
                .or_default()
                .add(listing);
            by_room_type
                .entry(key.room_type.clone())
                .or_default()
                .add(listing);
            exact.entry(key).or_default().add(listing);
            global.add(listing);
        }

        let skipped_missing_price = global.skipped_missing_price;
        Self {
            segments: exact
                .into_iter()
                .map(|(key, acc)| {
                    let segment = acc.into_segment(key.clone());
                    (key, segment)
                })
                .collect(),
            by_neighbourhood: by_neighbourhood
                .into_iter()
                .map(|(nb, acc)| {
                    let key = SegmentKey {
                        neighbourhood: nb.clone(),
                        room_type: ANY.to_string(),
                    };
                    (nb, acc.into_segment(key))
                })
                .collect(),
            by_room_type: by_room_type
                .into_iter()
                .map(|(rt, acc)| {
                    let key = SegmentKey {
                        neighbourhood: ANY.to_string(),
                        room_type: rt.clone(),
                    };
                    (rt, acc.into_segment(key))
                })
                .collect(),
            global: global.into_segment(SegmentKey {
                neighbourhood: ANY.to_string(),
                room_type: ANY.to_string(),
            }),
            skipped_missing_price,
        }
    }

    /// Resolves a segment for the given axes, walking the generalization
    /// ladder: exact → (neighbourhood, any) → (any, room type) → global.
    /// The first rung with enough listings *and* a price distribution wins.
    /// When every rung is sparse the global segment is still returned
    /// best-effort; `None` means the index holds no priced listings at all.
    pub fn segment_for(
        &self,
        neighbourhood: Option<&str>,
        room_type: Option<&str>,
        min_segment_size: u32,
    ) -> Option<ResolvedSegment<'_>> {
        let key = SegmentKey::from_parts(neighbourhood, room_type);
        let rungs = [
            (self.segments.get(&key), GeneralizationLevel::Exact),
            (
                self.by_neighbourhood.get(&key.neighbourhood),
                GeneralizationLevel::Neighbourhood,
            ),
            (
                self.by_room_type.get(&key.room_type),
                GeneralizationLevel::RoomType,
            ),
            (Some(&self.global), GeneralizationLevel::Global),
        ];
        for (segment, level) in rungs {
            if let Some(segment) = segment
                && !segment.is_sparse(min_segment_size)
                && segment.price_stats.is_some()
            {
                return Some(ResolvedSegment { segment, level });
            }
        }
        if self.global.price_stats.is_some() {
            return Some(ResolvedSegment {
                segment: &self.global,
                level: GeneralizationLevel::Global,
            });
        }
        None
    }

    pub fn get(&self, key: &SegmentKey) -> Option<&Segment> {
        self.segments.get(key)
    }

    /// Exact segments, in key order.
    pub fn segments(&self) -> impl Iterator<Item = &Segment> {
        self.segments.values()
    }

    pub fn segment_count(&self) -> usize {
        self.segments.len()
    }

    /// The whole-market aggregate (the ladder's last rung).
    pub fn global(&self) -> &Segment {
        &self.global
    }

    pub fn is_empty(&self) -> bool {
        self.global.count == 0
    }
}
