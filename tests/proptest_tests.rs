#![allow(clippy::cast_possible_truncation)]

use std::collections::BTreeSet;

use proptest::prelude::*;

use host_advisor::config::types::AnalyticsConfig;
use host_advisor::domain::calendar::CalendarEntry;
use host_advisor::domain::listing::{Listing, ListingProfile};
use host_advisor::domain::recommendation::PriceTier;
use host_advisor::engine::pricing::recommend;
use host_advisor::engine::seasonal::{SeasonalBucket, seasonal_profile};
use host_advisor::engine::segments::SegmentIndex;
use host_advisor::engine::{amenities, comparison};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn arb_listing() -> impl Strategy<Value = Listing> {
    (
        "[a-z0-9]{1,8}",
        prop::option::of(prop::sample::select(vec![
            "Indre By",
            "Nørrebro",
            "Vesterbro",
            "Østerbro",
        ])),
        prop::option::of(prop::sample::select(vec![
            "Entire home/apt",
            "Private room",
            "Shared room",
        ])),
        prop::option::of(1.0..5000.0_f64),
        prop::option::of(0.0..5.0_f64),
        prop::collection::btree_set(
            prop::sample::select(vec!["Wifi", "Kitchen", "Washer", "Balcony", "Pool"]),
            0..4,
        ),
    )
        .prop_map(|(id, neighbourhood, room_type, price, rating, amenities)| Listing {
            id,
            neighbourhood: neighbourhood.map(ToString::to_string),
            room_type: room_type.map(ToString::to_string),
            price,
            minimum_nights: 2,
            amenities: amenities.into_iter().map(ToString::to_string).collect(),
            rating,
            review_count: 5,
            availability_365: None,
        })
}

fn arb_calendar_entry() -> impl Strategy<Value = CalendarEntry> {
    (
        1u32..=12,
        1u32..=28,
        any::<bool>(),
        prop::option::of(1.0..3000.0_f64),
    )
        .prop_map(|(month, day, available, price)| CalendarEntry {
            listing_id: "x".to_string(),
            date: format!("2025-{month:02}-{day:02}"),
            available,
            price,
        })
}

fn config() -> AnalyticsConfig {
    AnalyticsConfig::default()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn prop_partition_is_complete_and_disjoint(
        listings in prop::collection::vec(arb_listing(), 0..60),
    ) {
        let index = SegmentIndex::build(&listings);
        let total: u32 = index.segments().map(|s| s.count).sum();
        prop_assert_eq!(total as usize, listings.len());
        prop_assert_eq!(index.global().count as usize, listings.len());
    }

    #[test]
    fn prop_tier_bounds_are_monotone(
        listings in prop::collection::vec(arb_listing(), 1..60),
    ) {
        let index = SegmentIndex::build(&listings);
        for segment in index.segments() {
            let Some(dist) = segment.price_stats else { continue };
            let highs = [
                PriceTier::Budget.bounds(&dist).1,
                PriceTier::Competitive.bounds(&dist).1,
                PriceTier::Premium.bounds(&dist).1,
                PriceTier::Luxury.bounds(&dist).1,
            ];
            for pair in highs.windows(2) {
                prop_assert!(pair[0] <= pair[1] + 1e-9);
            }
        }
    }

    #[test]
    fn prop_tier_assignment_contains_price(
        listings in prop::collection::vec(arb_listing(), 1..60),
    ) {
        let index = SegmentIndex::build(&listings);
        for segment in index.segments() {
            let Some(dist) = segment.price_stats else { continue };
            for price in &segment.prices {
                let tier = PriceTier::for_price(*price, &dist);
                let (low, high) = tier.bounds(&dist);
                prop_assert!(*price >= low - 1e-9);
                prop_assert!(*price <= high + 1e-9);
            }
        }
    }

    #[test]
    fn prop_recommend_never_panics_and_clips(
        listings in prop::collection::vec(arb_listing(), 0..40),
        price in prop::option::of(0.0..6000.0_f64),
    ) {
        let index = SegmentIndex::build(&listings);
        let profile = ListingProfile {
            neighbourhood: Some("Nørrebro".to_string()),
            room_type: Some("Private room".to_string()),
            price,
            amenities: BTreeSet::new(),
        };
        let rec = recommend(&profile, &index, &config());
        if let Some((low, high)) = rec.suggested_range {
            prop_assert!(low >= 0.0);
            prop_assert!(high >= low - 1e-9);
        } else {
            prop_assert!(rec.unranked);
        }
    }

    #[test]
    fn prop_amenity_report_is_deterministic(
        listings in prop::collection::vec(arb_listing(), 0..40),
    ) {
        let index = SegmentIndex::build(&listings);
        let first = amenities::amenity_impacts(&listings, &index, &config());
        let second = amenities::amenity_impacts(&listings, &index, &config());
        let ranked: Vec<_> = first
            .ranked
            .iter()
            .map(|i| (i.amenity.clone(), i.mean_delta.to_bits()))
            .collect();
        let ranked2: Vec<_> = second
            .ranked
            .iter()
            .map(|i| (i.amenity.clone(), i.mean_delta.to_bits()))
            .collect();
        prop_assert_eq!(ranked, ranked2);
    }

    #[test]
    fn prop_seasonal_buckets_never_empty_and_conserve_bookings(
        entries in prop::collection::vec(arb_calendar_entry(), 0..200),
    ) {
        let profile = seasonal_profile(&entries, SeasonalBucket::Month, &config());
        for period in &profile.periods {
            prop_assert!(period.total_entries > 0);
            prop_assert!(period.occupancy_rate >= 0.0);
            prop_assert!(period.occupancy_rate <= 1.0);
        }
        let booked_in = entries.iter().filter(|e| !e.available).count() as u32;
        let booked_out: u32 = profile.periods.iter().map(|p| p.booked).sum();
        prop_assert_eq!(booked_out, booked_in);
        prop_assert_eq!(profile.total_booked, booked_in);
    }

    #[test]
    fn prop_comparison_accounts_for_every_listing(
        market in prop::collection::vec(arb_listing(), 0..40),
        host in prop::collection::vec(arb_listing(), 0..10),
    ) {
        let index = SegmentIndex::build(&market);
        let report = comparison::compare(&host, &index, &config());
        prop_assert_eq!(report.positions.len(), host.len());
        prop_assert_eq!(
            (report.ranked_count + report.unranked_count) as usize,
            host.len()
        );
        for position in &report.positions {
            if let Some(pct) = position.percentile {
                prop_assert!((0.0..=100.0).contains(&pct));
            }
        }
    }
}
