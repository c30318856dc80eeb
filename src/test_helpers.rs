use crate::domain::calendar::CalendarEntry;
use crate::domain::listing::{Listing, ListingProfile};
use crate::domain::review::Review;

// --- Factory functions ---

pub fn make_listing(
    id: &str,
    neighbourhood: &str,
    room_type: &str,
    price: Option<f64>,
) -> Listing {
    Listing {
        id: id.to_string(),
        neighbourhood: Some(neighbourhood.to_string()),
        room_type: Some(room_type.to_string()),
        price,
        minimum_nights: 2,
        amenities: std::collections::BTreeSet::new(),
        rating: Some(4.5),
        review_count: 10,
        availability_365: None,
    }
}

pub fn make_listing_with_amenities(
    id: &str,
    neighbourhood: &str,
    room_type: &str,
    price: Option<f64>,
    amenities: &[&str],
) -> Listing {
    let mut listing = make_listing(id, neighbourhood, room_type, price);
    listing.amenities = amenities.iter().map(ToString::to_string).collect();
    listing
}

pub fn make_profile(neighbourhood: &str, room_type: &str, price: Option<f64>) -> ListingProfile {
    ListingProfile {
        neighbourhood: Some(neighbourhood.to_string()),
        room_type: Some(room_type.to_string()),
        price,
        amenities: std::collections::BTreeSet::new(),
    }
}

pub fn make_entry(listing_id: &str, date: &str, available: bool, price: Option<f64>) -> CalendarEntry {
    CalendarEntry {
        listing_id: listing_id.to_string(),
        date: date.to_string(),
        available,
        price,
    }
}

pub fn make_review(listing_id: &str, date: &str, rating: Option<f64>) -> Review {
    Review {
        listing_id: listing_id.to_string(),
        date: date.to_string(),
        rating,
    }
}
