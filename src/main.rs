use std::path::PathBuf;

use anyhow::Result;
use tracing_subscriber::EnvFilter;

use host_advisor::config::load_config;
use host_advisor::engine::seasonal::SeasonalBucket;
use host_advisor::engine::segments::SegmentIndex;
use host_advisor::engine::{amenities, overview, ratings, seasonal};
use host_advisor::loader::load_dataset;

fn main() -> Result<()> {
    // Logging to stderr — stdout carries the report itself
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let mut data_dir = PathBuf::from(".");
    let mut as_json = false;
    for arg in std::env::args().skip(1) {
        if arg == "--json" {
            as_json = true;
        } else {
            data_dir = PathBuf::from(arg);
        }
    }

    let config = load_config(&data_dir.join("config.yaml"))?;
    let dataset = load_dataset(&data_dir, &config.data)?;

    let index = SegmentIndex::build(&dataset.listings);
    tracing::info!(
        segments = index.segment_count(),
        skipped_missing_price = index.skipped_missing_price,
        "Segment index built"
    );

    let market = overview::market_overview(&dataset.listings, &config.analytics);
    let amenity_report = amenities::amenity_impacts(&dataset.listings, &index, &config.analytics);
    let by_month =
        seasonal::seasonal_profile(&dataset.calendar, SeasonalBucket::Month, &config.analytics);
    let by_weekday =
        seasonal::seasonal_profile(&dataset.calendar, SeasonalBucket::DayOfWeek, &config.analytics);
    let calendar = seasonal::calendar_summary(&dataset.calendar);
    let reviews = seasonal::review_patterns(&dataset.reviews);
    let correlation = ratings::rating_correlation(&dataset.listings, &config.analytics);

    if as_json {
        let report = serde_json::json!({
            "overview": market,
            "amenities": amenity_report,
            "seasonal_by_month": by_month,
            "seasonal_by_day_of_week": by_weekday,
            "calendar_summary": calendar,
            "review_patterns": reviews,
            "rating_correlation": correlation,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("{market}");
    println!("{amenity_report}");
    if !by_month.periods.is_empty() {
        println!("{by_month}");
        println!("{by_weekday}");
        println!("{calendar}");
    }
    if reviews.total_reviews > 0 {
        println!("{reviews}");
    }
    println!("{correlation}");
    Ok(())
}
