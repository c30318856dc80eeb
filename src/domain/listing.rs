use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// One listing as observed at load time. Immutable for the duration of an
/// analysis run; all derived statistics are computed from snapshots like
/// this one, never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: String,
    #[serde(default)]
    pub neighbourhood: Option<String>,
    #[serde(default)]
    pub room_type: Option<String>,
    /// Nightly price, currency-agnostic. Absent when the source row had no
    /// parseable price; such listings still belong to a segment but are
    /// skipped (and tallied) by price computations.
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub minimum_nights: u32,
    #[serde(default)]
    pub amenities: BTreeSet<String>,
    /// Average guest rating in [0, 5], when the platform reports one.
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub review_count: u32,
    /// Days available over the next year, when reported.
    #[serde(default)]
    pub availability_365: Option<u32>,
}

/// A listing shape used to query the recommendation engine: either an
/// existing listing or a hypothetical one a host is considering.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListingProfile {
    pub neighbourhood: Option<String>,
    pub room_type: Option<String>,
    /// Current nightly price; `None` for a hypothetical profile, which
    /// makes the engine suggest the Competitive band.
    pub price: Option<f64>,
    pub amenities: BTreeSet<String>,
}

impl From<&Listing> for ListingProfile {
    fn from(listing: &Listing) -> Self {
        Self {
            neighbourhood: listing.neighbourhood.clone(),
            room_type: listing.room_type.clone(),
            price: listing.price,
            amenities: listing.amenities.clone(),
        }
    }
}

impl std::fmt::Display for Listing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id)?;
        if let Some(ref nb) = self.neighbourhood {
            write!(f, " - {nb}")?;
        }
        if let Some(ref rt) = self.room_type {
            write!(f, " ({rt})")?;
        }
        if let Some(price) = self.price {
            write!(f, " at {price:.0}/night")?;
        }
        if let Some(rating) = self.rating {
            write!(
                f,
                ", {rating:.1}* {reviews} reviews",
                reviews = self.review_count
            )?;
        }
        Ok(())
    }
}
