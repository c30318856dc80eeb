use serde::{Deserialize, Serialize};

use super::segment::{GeneralizationLevel, PriceDistribution, SegmentKey};

/// Quartile-derived price band within a segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PriceTier {
    /// [min, Q1)
    Budget,
    /// [Q1, median]
    Competitive,
    /// (median, Q3]
    Premium,
    /// (Q3, max]
    Luxury,
}

impl PriceTier {
    /// Band bounds within the given distribution, low inclusive.
    pub fn bounds(self, dist: &PriceDistribution) -> (f64, f64) {
        match self {
            Self::Budget => (dist.min, dist.q1),
            Self::Competitive => (dist.q1, dist.median),
            Self::Premium => (dist.median, dist.q3),
            Self::Luxury => (dist.q3, dist.max),
        }
    }

    /// Which band a price falls into. Prices below the observed minimum
    /// map to Budget, above the maximum to Luxury.
    pub fn for_price(price: f64, dist: &PriceDistribution) -> Self {
        if price < dist.q1 {
            Self::Budget
        } else if price <= dist.median {
            Self::Competitive
        } else if price <= dist.q3 {
            Self::Premium
        } else {
            Self::Luxury
        }
    }
}

impl std::fmt::Display for PriceTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Budget => write!(f, "Budget"),
            Self::Competitive => write!(f, "Competitive"),
            Self::Premium => write!(f, "Premium"),
            Self::Luxury => write!(f, "Luxury"),
        }
    }
}

/// How much the sample behind a recommendation can be trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Confidence {
    /// Exact segment, at least twice the minimum sample.
    High,
    /// Exact segment, between one and two times the minimum sample.
    Medium,
    /// A generalization rung was used, or no rung met the threshold.
    Low,
}

impl std::fmt::Display for Confidence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::High => write!(f, "high"),
            Self::Medium => write!(f, "medium"),
            Self::Low => write!(f, "low"),
        }
    }
}

/// Price guidance for one listing or hypothetical profile. Produced fresh
/// per query; never mutated once returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// Key of the segment the guidance is based on; `None` when no segment
    /// could be resolved at any rung (empty market).
    pub segment: Option<SegmentKey>,
    pub generalization: Option<GeneralizationLevel>,
    pub tier: Option<PriceTier>,
    /// Suggested nightly price band, low inclusive, clipped non-negative.
    pub suggested_range: Option<(f64, f64)>,
    pub confidence: Confidence,
    /// Listing count of the resolved segment.
    pub sample_size: u32,
    /// No market data was available to rank against.
    pub unranked: bool,
    /// Amenities common in the segment but missing from the profile.
    pub amenity_suggestions: Vec<String>,
}

impl Recommendation {
    /// The empty-market answer: flagged, low confidence, never an error.
    pub fn unranked() -> Self {
        Self {
            segment: None,
            generalization: None,
            tier: None,
            suggested_range: None,
            confidence: Confidence::Low,
            sample_size: 0,
            unranked: true,
            amenity_suggestions: Vec::new(),
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.unranked {
            return writeln!(f, "No market data available to rank this listing");
        }
        if let Some(ref key) = self.segment {
            writeln!(f, "# Recommendation for segment {key}")?;
        }
        if let Some(level) = self.generalization {
            writeln!(f, "Resolved at: {level} ({} listings)", self.sample_size)?;
        }
        if let Some(tier) = self.tier {
            writeln!(f, "Price tier: {tier}")?;
        }
        if let Some((low, high)) = self.suggested_range {
            writeln!(f, "Suggested range: {low:.0} - {high:.0}/night")?;
        }
        writeln!(f, "Confidence: {}", self.confidence)?;
        if !self.amenity_suggestions.is_empty() {
            writeln!(
                f,
                "Consider adding: {}",
                self.amenity_suggestions.join(", ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dist() -> PriceDistribution {
        PriceDistribution {
            min: 400.0,
            q1: 600.0,
            median: 800.0,
            q3: 1000.0,
            max: 1400.0,
        }
    }

    #[test]
    fn tier_bounds_cover_distribution() {
        let d = dist();
        assert_eq!(PriceTier::Budget.bounds(&d), (400.0, 600.0));
        assert_eq!(PriceTier::Competitive.bounds(&d), (600.0, 800.0));
        assert_eq!(PriceTier::Premium.bounds(&d), (800.0, 1000.0));
        assert_eq!(PriceTier::Luxury.bounds(&d), (1000.0, 1400.0));
    }

    #[test]
    fn tier_for_price_band_edges() {
        let d = dist();
        assert_eq!(PriceTier::for_price(400.0, &d), PriceTier::Budget);
        assert_eq!(PriceTier::for_price(599.9, &d), PriceTier::Budget);
        // Q1 belongs to Competitive, not Budget
        assert_eq!(PriceTier::for_price(600.0, &d), PriceTier::Competitive);
        assert_eq!(PriceTier::for_price(800.0, &d), PriceTier::Competitive);
        // Just above the median is Premium
        assert_eq!(PriceTier::for_price(800.1, &d), PriceTier::Premium);
        assert_eq!(PriceTier::for_price(1000.0, &d), PriceTier::Premium);
        assert_eq!(PriceTier::for_price(1000.1, &d), PriceTier::Luxury);
    }

    #[test]
    fn tier_for_price_outside_observed_range() {
        let d = dist();
        assert_eq!(PriceTier::for_price(100.0, &d), PriceTier::Budget);
        assert_eq!(PriceTier::for_price(5000.0, &d), PriceTier::Luxury);
    }

    #[test]
    fn unranked_recommendation_shape() {
        let rec = Recommendation::unranked();
        assert!(rec.unranked);
        assert_eq!(rec.confidence, Confidence::Low);
        assert!(rec.tier.is_none());
        assert!(rec.suggested_range.is_none());
        assert!(rec.to_string().contains("No market data"));
    }

    #[test]
    fn recommendation_display() {
        let rec = Recommendation {
            segment: Some(SegmentKey::from_parts(
                Some("Nørrebro"),
                Some("Entire home/apt"),
            )),
            generalization: Some(GeneralizationLevel::Exact),
            tier: Some(PriceTier::Competitive),
            suggested_range: Some((600.0, 800.0)),
            confidence: Confidence::High,
            sample_size: 24,
            unranked: false,
            amenity_suggestions: vec!["Wifi".into(), "Kitchen".into()],
        };
        let s = rec.to_string();
        assert!(s.contains("Nørrebro"));
        assert!(s.contains("exact segment"));
        assert!(s.contains("Competitive"));
        assert!(s.contains("600 - 800"));
        assert!(s.contains("Confidence: high"));
        assert!(s.contains("Wifi, Kitchen"));
    }
}
