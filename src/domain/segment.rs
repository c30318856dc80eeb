use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Sentinel bucket for listings missing a neighbourhood or room type.
/// Routing them here instead of dropping them keeps aggregate totals
/// reconcilable with the input.
pub const UNCLASSIFIED: &str = "Unclassified";

/// The unit of statistical comparison: (neighbourhood, room type).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SegmentKey {
    pub neighbourhood: String,
    pub room_type: String,
}

impl SegmentKey {
    /// Builds a key from possibly-absent axes, substituting the sentinel.
    /// Blank strings count as absent.
    pub fn from_parts(neighbourhood: Option<&str>, room_type: Option<&str>) -> Self {
        let classify = |part: Option<&str>| {
            part.map(str::trim)
                .filter(|s| !s.is_empty())
                .unwrap_or(UNCLASSIFIED)
                .to_string()
        };
        Self {
            neighbourhood: classify(neighbourhood),
            room_type: classify(room_type),
        }
    }
}

impl std::fmt::Display for SegmentKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} / {}", self.neighbourhood, self.room_type)
    }
}

/// Five-number summary of a price sample. Quartiles use linear
/// interpolation between order statistics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PriceDistribution {
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl PriceDistribution {
    /// All quartiles collapsed onto one value — the degenerate case the
    /// recommendation engine must widen into an explicit band.
    pub fn is_degenerate(&self) -> bool {
        (self.q3 - self.q1).abs() < f64::EPSILON
    }
}

/// How far up the generalization ladder a lookup had to walk before it
/// found a usable sample. Propagated into recommendations for audit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GeneralizationLevel {
    /// The exact (neighbourhood, room type) segment.
    Exact,
    /// Same neighbourhood, any room type.
    Neighbourhood,
    /// Any neighbourhood, same room type.
    RoomType,
    /// The whole market.
    Global,
}

impl std::fmt::Display for GeneralizationLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact => write!(f, "exact segment"),
            Self::Neighbourhood => write!(f, "neighbourhood-wide"),
            Self::RoomType => write!(f, "room-type-wide"),
            Self::Global => write!(f, "market-wide"),
        }
    }
}

/// Aggregate over every listing sharing a key. A value object: built once
/// per run, never mutated afterwards, safe to share across readers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    pub key: SegmentKey,
    /// Listings in the segment, including ones without a price.
    pub count: u32,
    /// Sorted prices of the listings that have one.
    pub prices: Vec<f64>,
    pub price_stats: Option<PriceDistribution>,
    pub mean_rating: Option<f64>,
    /// How many listings carry each amenity.
    pub amenity_counts: BTreeMap<String, u32>,
    /// Listings excluded from price statistics for lack of a price.
    pub skipped_missing_price: u32,
}

impl Segment {
    pub fn is_sparse(&self, min_segment_size: u32) -> bool {
        self.count < min_segment_size
    }
}

impl std::fmt::Display for Segment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# Segment: {}", self.key)?;
        writeln!(f, "Listings: {}", self.count)?;
        if let Some(stats) = self.price_stats {
            writeln!(
                f,
                "Prices: {:.0} | {:.0} | {:.0} | {:.0} | {:.0} (min/Q1/median/Q3/max)",
                stats.min, stats.q1, stats.median, stats.q3, stats.max
            )?;
        }
        if let Some(rating) = self.mean_rating {
            writeln!(f, "Average rating: {rating:.2}")?;
        }
        if self.skipped_missing_price > 0 {
            writeln!(f, "Skipped (no price): {}", self.skipped_missing_price)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_full_parts() {
        let key = SegmentKey::from_parts(Some("Nørrebro"), Some("Entire home/apt"));
        assert_eq!(key.neighbourhood, "Nørrebro");
        assert_eq!(key.room_type, "Entire home/apt");
    }

    #[test]
    fn key_substitutes_sentinel() {
        let key = SegmentKey::from_parts(None, Some("Private room"));
        assert_eq!(key.neighbourhood, UNCLASSIFIED);
        assert_eq!(key.room_type, "Private room");
    }

    #[test]
    fn key_blank_counts_as_missing() {
        let key = SegmentKey::from_parts(Some("  "), Some(""));
        assert_eq!(key.neighbourhood, UNCLASSIFIED);
        assert_eq!(key.room_type, UNCLASSIFIED);
    }

    #[test]
    fn key_display() {
        let key = SegmentKey::from_parts(Some("Østerbro"), Some("Entire home/apt"));
        assert_eq!(key.to_string(), "Østerbro / Entire home/apt");
    }

    #[test]
    fn distribution_degenerate() {
        let flat = PriceDistribution {
            min: 100.0,
            q1: 100.0,
            median: 100.0,
            q3: 100.0,
            max: 100.0,
        };
        assert!(flat.is_degenerate());

        let spread = PriceDistribution {
            min: 100.0,
            q1: 120.0,
            median: 150.0,
            q3: 180.0,
            max: 300.0,
        };
        assert!(!spread.is_degenerate());
    }

    #[test]
    fn generalization_display() {
        assert_eq!(GeneralizationLevel::Exact.to_string(), "exact segment");
        assert_eq!(GeneralizationLevel::Global.to_string(), "market-wide");
    }

    #[test]
    fn segment_display() {
        let segment = Segment {
            key: SegmentKey::from_parts(Some("Indre By"), Some("Entire home/apt")),
            count: 12,
            prices: vec![800.0, 900.0, 1000.0],
            price_stats: Some(PriceDistribution {
                min: 800.0,
                q1: 850.0,
                median: 900.0,
                q3: 950.0,
                max: 1000.0,
            }),
            mean_rating: Some(4.71),
            amenity_counts: BTreeMap::new(),
            skipped_missing_price: 1,
        };
        let s = segment.to_string();
        assert!(s.contains("Indre By"));
        assert!(s.contains("Listings: 12"));
        assert!(s.contains("4.71"));
        assert!(s.contains("Skipped (no price): 1"));
    }
}
