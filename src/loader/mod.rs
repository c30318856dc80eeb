//! CSV ingestion. This is the data-loading collaborator the engine sits
//! behind: it turns the marketplace's published CSV exports into clean,
//! typed records and never leaks parsing concerns into the analytics.
//!
//! Listings are required; reviews and calendar files are optional, since
//! an empty market or a brand-new host is an expected condition.

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::config::types::DataConfig;
use crate::domain::calendar::CalendarEntry;
use crate::domain::listing::Listing;
use crate::domain::review::Review;
use crate::error::{AdvisorError, Result};

/// One full analysis input, loaded from a dataset directory.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    pub listings: Vec<Listing>,
    pub reviews: Vec<Review>,
    pub calendar: Vec<CalendarEntry>,
}

#[derive(Debug, Deserialize)]
struct RawListing {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    neighbourhood: Option<String>,
    #[serde(default)]
    room_type: Option<String>,
    #[serde(default)]
    price: Option<String>,
    #[serde(default)]
    minimum_nights: Option<String>,
    #[serde(default)]
    amenities: Option<String>,
    #[serde(default)]
    review_scores_rating: Option<String>,
    #[serde(default)]
    number_of_reviews: Option<String>,
    #[serde(default)]
    availability_365: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawReview {
    #[serde(default)]
    listing_id: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    rating: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawCalendar {
    #[serde(default)]
    listing_id: Option<String>,
    #[serde(default)]
    date: Option<String>,
    #[serde(default)]
    available: Option<String>,
    #[serde(default)]
    price: Option<String>,
}

/// Cleans a marketplace price string: `"$1,250.00"` → `1250.0`.
/// Unparseable, negative, or non-finite values are treated as absent.
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .trim_start_matches('$')
        .chars()
        .filter(|c| *c != ',')
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned
        .parse::<f64>()
        .ok()
        .filter(|p| p.is_finite() && *p >= 0.0)
}

/// Splits the marketplace's bracketed, quoted amenity list:
/// `["Wifi", "Kitchen"]` → `{Wifi, Kitchen}`. Tolerates missing brackets
/// and stray whitespace; empty items are dropped.
pub fn parse_amenities(raw: &str) -> BTreeSet<String> {
    raw.trim()
        .trim_start_matches(['[', '{'])
        .trim_end_matches([']', '}'])
        .split(',')
        .map(|item| item.trim().trim_matches('"').trim())
        .filter(|item| !item.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Availability flags as the marketplace encodes them: `t`/`f`, with
/// `true`/`false` accepted too.
pub fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "t" | "true" => Some(true),
        "f" | "false" => Some(false),
        _ => None,
    }
}

fn parse_rating(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|r| (0.0..=5.0).contains(r))
}

fn parse_count(raw: &str) -> Option<u32> {
    raw.trim().parse::<u32>().ok()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.map(|s| s.trim().to_string()).filter(|s| !s.is_empty())
}

pub fn load_dataset(dir: &Path, config: &DataConfig) -> Result<Dataset> {
    let listings_path = dir.join(&config.listings_file);
    if !listings_path.exists() {
        return Err(AdvisorError::DataFileNotFound(
            listings_path.display().to_string(),
        ));
    }
    let listings = load_listings(&listings_path)?;

    let reviews_path = dir.join(&config.reviews_file);
    let reviews = if reviews_path.exists() {
        load_reviews(&reviews_path)?
    } else {
        tracing::info!("No reviews file at {}, continuing without", reviews_path.display());
        Vec::new()
    };

    let calendar_path = dir.join(&config.calendar_file);
    let calendar = if calendar_path.exists() {
        let base_prices: HashMap<String, f64> = listings
            .iter()
            .filter_map(|l| l.price.map(|p| (l.id.clone(), p)))
            .collect();
        load_calendar(&calendar_path, &base_prices)?
    } else {
        tracing::info!(
            "No calendar file at {}, continuing without",
            calendar_path.display()
        );
        Vec::new()
    };

    tracing::info!(
        listings = listings.len(),
        reviews = reviews.len(),
        calendar_entries = calendar.len(),
        "Dataset loaded"
    );
    Ok(Dataset {
        listings,
        reviews,
        calendar,
    })
}

pub fn load_listings(path: &Path) -> Result<Vec<Listing>> {
    let file_name = path.display().to_string();
    let mut reader = csv::Reader::from_path(path)?;
    let mut listings = Vec::new();
    for (i, row) in reader.deserialize::<RawListing>().enumerate() {
        let raw = row?;
        let id = non_empty(raw.id).ok_or(AdvisorError::MissingRecordId {
            file: file_name.clone(),
            record: i as u64 + 1,
        })?;
        listings.push(Listing {
            id,
            neighbourhood: non_empty(raw.neighbourhood),
            room_type: non_empty(raw.room_type),
            price: raw.price.as_deref().and_then(parse_price),
            minimum_nights: raw
                .minimum_nights
                .as_deref()
                .and_then(parse_count)
                .unwrap_or(1),
            amenities: raw.amenities.as_deref().map(parse_amenities).unwrap_or_default(),
            rating: raw.review_scores_rating.as_deref().and_then(parse_rating),
            review_count: raw
                .number_of_reviews
                .as_deref()
                .and_then(parse_count)
                .unwrap_or(0),
            availability_365: raw.availability_365.as_deref().and_then(parse_count),
        });
    }
    Ok(listings)
}

pub fn load_reviews(path: &Path) -> Result<Vec<Review>> {
    let file_name = path.display().to_string();
    let mut reader = csv::Reader::from_path(path)?;
    let mut reviews = Vec::new();
    for (i, row) in reader.deserialize::<RawReview>().enumerate() {
        let raw = row?;
        let listing_id = non_empty(raw.listing_id).ok_or(AdvisorError::MissingRecordId {
            file: file_name.clone(),
            record: i as u64 + 1,
        })?;
        reviews.push(Review {
            listing_id,
            date: non_empty(raw.date).unwrap_or_default(),
            rating: raw.rating.as_deref().and_then(parse_rating),
        });
    }
    Ok(reviews)
}

pub fn load_calendar(path: &Path, base_prices: &HashMap<String, f64>) -> Result<Vec<CalendarEntry>> {
    let file_name = path.display().to_string();
    let mut reader = csv::Reader::from_path(path)?;
    let mut entries = Vec::new();
    for (i, row) in reader.deserialize::<RawCalendar>().enumerate() {
        let raw = row?;
        let listing_id = non_empty(raw.listing_id).ok_or(AdvisorError::MissingRecordId {
            file: file_name.clone(),
            record: i as u64 + 1,
        })?;
        // An unreadable flag must not inflate occupancy, so it reads as open.
        let available = raw
            .available
            .as_deref()
            .and_then(parse_flag)
            .unwrap_or(true);
        let price = raw
            .price
            .as_deref()
            .and_then(parse_price)
            .or_else(|| base_prices.get(&listing_id).copied());
        entries.push(CalendarEntry {
            listing_id,
            date: non_empty(raw.date).unwrap_or_default(),
            available,
            price,
        });
    }
    Ok(entries)
}
