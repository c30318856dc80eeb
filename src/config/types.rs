use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub analytics: AnalyticsConfig,
    #[serde(default)]
    pub data: DataConfig,
}

/// Sample-size floors and classification thresholds for the engine.
///
/// Every threshold the analyses depend on lives here with a documented
/// default, so boundary behavior can be exercised deterministically in
/// tests instead of hiding behind inline literals.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AnalyticsConfig {
    /// Segments with fewer listings are sparse and trigger the
    /// generalization ladder.
    #[serde(default = "default_min_segment_size")]
    pub min_segment_size: u32,
    /// Amenities must appear on (and be absent from) at least this many
    /// listings before their price impact is ranked.
    #[serde(default = "default_min_amenity_count")]
    pub min_amenity_count: u32,
    /// Minimum rated listings before correlation coefficients are reported.
    #[serde(default = "default_min_rated_listings")]
    pub min_rated_listings: u32,
    /// Half-width of the suggested band, as a fraction of the reference
    /// price, when a segment's quartiles collapse to a single value.
    #[serde(default = "default_degenerate_band_ratio")]
    pub degenerate_band_ratio: f64,
    /// Occupancy-rate quantile at or above which a bucket is "peak".
    #[serde(default = "default_peak_occupancy_quantile")]
    pub peak_occupancy_quantile: f64,
    /// Occupancy-rate quantile at or below which a bucket is "off-peak".
    #[serde(default = "default_off_peak_occupancy_quantile")]
    pub off_peak_occupancy_quantile: f64,
    /// Price std dev above this fraction of the mean reads as a market
    /// that rewards premium positioning.
    #[serde(default = "default_variance_posture_ratio")]
    pub variance_posture_ratio: f64,
    /// Cap on amenity suggestions attached to a recommendation.
    #[serde(default = "default_max_amenity_suggestions")]
    pub max_amenity_suggestions: usize,
    /// An amenity is suggested only if at least this share of the resolved
    /// segment's listings carry it.
    #[serde(default = "default_amenity_suggestion_share")]
    pub amenity_suggestion_share: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            min_segment_size: default_min_segment_size(),
            min_amenity_count: default_min_amenity_count(),
            min_rated_listings: default_min_rated_listings(),
            degenerate_band_ratio: default_degenerate_band_ratio(),
            peak_occupancy_quantile: default_peak_occupancy_quantile(),
            off_peak_occupancy_quantile: default_off_peak_occupancy_quantile(),
            variance_posture_ratio: default_variance_posture_ratio(),
            max_amenity_suggestions: default_max_amenity_suggestions(),
            amenity_suggestion_share: default_amenity_suggestion_share(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DataConfig {
    #[serde(default = "default_listings_file")]
    pub listings_file: String,
    #[serde(default = "default_reviews_file")]
    pub reviews_file: String,
    #[serde(default = "default_calendar_file")]
    pub calendar_file: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            listings_file: default_listings_file(),
            reviews_file: default_reviews_file(),
            calendar_file: default_calendar_file(),
        }
    }
}

fn default_min_segment_size() -> u32 {
    5
}

fn default_min_amenity_count() -> u32 {
    5
}

fn default_min_rated_listings() -> u32 {
    10
}

fn default_degenerate_band_ratio() -> f64 {
    0.10
}

fn default_peak_occupancy_quantile() -> f64 {
    0.75
}

fn default_off_peak_occupancy_quantile() -> f64 {
    0.25
}

fn default_variance_posture_ratio() -> f64 {
    0.30
}

fn default_max_amenity_suggestions() -> usize {
    3
}

fn default_amenity_suggestion_share() -> f64 {
    0.50
}

fn default_listings_file() -> String {
    "listings.csv".into()
}

fn default_reviews_file() -> String {
    "reviews.csv".into()
}

fn default_calendar_file() -> String {
    "calendar.csv".into()
}
