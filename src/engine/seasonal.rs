#![allow(clippy::cast_precision_loss)]

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

use crate::config::types::AnalyticsConfig;
use crate::domain::calendar::CalendarEntry;

use super::stats;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How calendar entries are grouped into periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SeasonalBucket {
    Month,
    DayOfWeek,
}

/// Demand classification of a period relative to the other periods in the
/// same profile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandLevel {
    Peak,
    Shoulder,
    OffPeak,
}

impl std::fmt::Display for DemandLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Peak => write!(f, "peak"),
            Self::Shoulder => write!(f, "shoulder"),
            Self::OffPeak => write!(f, "off-peak"),
        }
    }
}

/// One period of a seasonal profile. Only periods with at least one entry
/// exist — "no data" is never reported as zero occupancy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalPeriod {
    /// "January".."December" or "Monday".."Sunday".
    pub label: String,
    pub total_entries: u32,
    /// Entries marked unavailable, i.e. booked nights.
    pub booked: u32,
    /// booked / total, in [0, 1].
    pub occupancy_rate: f64,
    pub mean_price: Option<f64>,
    /// Period mean price ÷ overall mean price.
    pub price_index: Option<f64>,
    pub demand: DemandLevel,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalProfile {
    pub bucket: SeasonalBucket,
    /// Chronological order (January first / Monday first).
    pub periods: Vec<SeasonalPeriod>,
    pub overall_mean_price: Option<f64>,
    pub total_booked: u32,
    /// Entries whose date failed to parse, excluded from every period.
    pub skipped_invalid_dates: u32,
}

impl std::fmt::Display for SeasonalProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = match self.bucket {
            SeasonalBucket::Month => "month",
            SeasonalBucket::DayOfWeek => "day of week",
        };
        writeln!(f, "# Seasonal profile by {title}")?;
        writeln!(
            f,
            "{:<12} {:>6} {:>8} {:>8} {:>8} {:>10}",
            "Period", "Days", "Booked", "Occ", "Index", "Demand"
        )?;
        for period in &self.periods {
            let index = period
                .price_index
                .map_or_else(|| "-".to_string(), |i| format!("{i:.2}"));
            writeln!(
                f,
                "{:<12} {:>6} {:>8} {:>7.1}% {:>8} {:>10}",
                period.label,
                period.total_entries,
                period.booked,
                period.occupancy_rate * 100.0,
                index,
                period.demand
            )?;
        }
        if self.skipped_invalid_dates > 0 {
            writeln!(f, "Skipped (bad dates): {}", self.skipped_invalid_dates)?;
        }
        Ok(())
    }
}

fn month_label(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        _ => "December",
    }
}

/// `ordinal` as produced by `Weekday::num_days_from_monday`.
fn weekday_label(ordinal: u32) -> &'static str {
    match ordinal {
        0 => "Monday",
        1 => "Tuesday",
        2 => "Wednesday",
        3 => "Thursday",
        4 => "Friday",
        5 => "Saturday",
        _ => "Sunday",
    }
}

/// Computes per-period occupancy and price indices over a calendar.
///
/// Occupancy is booked-nights over total nights in the period; the price
/// index divides the period's mean observed price by the overall mean, so
/// 1.0 means "priced like the year as a whole". Periods in the top
/// occupancy quartile are labeled peak, the bottom quartile off-peak —
/// a classification over the computed profile, recomputed per call.
pub fn seasonal_profile(
    entries: &[CalendarEntry],
    bucket: SeasonalBucket,
    config: &AnalyticsConfig,
) -> SeasonalProfile {
    #[derive(Default)]
    struct Acc {
        total: u32,
        booked: u32,
        prices: Vec<f64>,
    }

    let mut buckets: BTreeMap<u32, Acc> = BTreeMap::new();
    let mut all_prices = Vec::new();
    let mut skipped_invalid_dates = 0;
    for entry in entries {
        let Ok(date) = NaiveDate::parse_from_str(&entry.date, DATE_FORMAT) else {
            skipped_invalid_dates += 1;
            continue;
        };
        let ordinal = match bucket {
            SeasonalBucket::Month => date.month(),
            SeasonalBucket::DayOfWeek => date.weekday().num_days_from_monday(),
        };
        let acc = buckets.entry(ordinal).or_default();
        acc.total += 1;
        if !entry.available {
            acc.booked += 1;
        }
        if let Some(price) = entry.price {
            acc.prices.push(price);
            all_prices.push(price);
        }
    }

    let overall_mean_price = stats::mean(&all_prices);
    let mut periods: Vec<SeasonalPeriod> = buckets
        .into_iter()
        .map(|(ordinal, acc)| {
            let mean_price = stats::mean(&acc.prices);
            let price_index = match (mean_price, overall_mean_price) {
                (Some(m), Some(overall)) if overall > f64::EPSILON => Some(m / overall),
                _ => None,
            };
            let label = match bucket {
                SeasonalBucket::Month => month_label(ordinal),
                SeasonalBucket::DayOfWeek => weekday_label(ordinal),
            };
            SeasonalPeriod {
                label: label.to_string(),
                total_entries: acc.total,
                booked: acc.booked,
                occupancy_rate: f64::from(acc.booked) / f64::from(acc.total),
                mean_price,
                price_index,
                demand: DemandLevel::Shoulder,
            }
        })
        .collect();

    classify_demand(&mut periods, config);
    let total_booked = periods.iter().map(|p| p.booked).sum();

    SeasonalProfile {
        bucket,
        periods,
        overall_mean_price,
        total_booked,
        skipped_invalid_dates,
    }
}

fn classify_demand(periods: &mut [SeasonalPeriod], config: &AnalyticsConfig) {
    let mut rates: Vec<f64> = periods.iter().map(|p| p.occupancy_rate).collect();
    stats::sort_prices(&mut rates);
    let (Some(low), Some(high)) = (
        stats::quantile(&rates, config.off_peak_occupancy_quantile),
        stats::quantile(&rates, config.peak_occupancy_quantile),
    ) else {
        return;
    };
    // Degenerate spread: every period is equally busy, nothing stands out.
    if (high - low).abs() < f64::EPSILON {
        return;
    }
    for period in periods {
        period.demand = if period.occupancy_rate >= high {
            DemandLevel::Peak
        } else if period.occupancy_rate <= low {
            DemandLevel::OffPeak
        } else {
            DemandLevel::Shoulder
        };
    }
}

/// Whole-calendar occupancy and price comparison: booked vs available
/// nights, and weekend (Fri/Sat) vs weekday prices among available nights.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarSummary {
    pub total_days: u32,
    pub booked_days: u32,
    pub available_days: u32,
    /// booked / total, in [0, 1]; 0 for an empty calendar.
    pub occupancy_rate: f64,
    pub booked_mean_price: Option<f64>,
    pub available_mean_price: Option<f64>,
    pub weekend_mean_price: Option<f64>,
    pub weekday_mean_price: Option<f64>,
}

impl std::fmt::Display for CalendarSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(
            f,
            "Days: {} total, {} booked, {} available ({:.1}% occupancy)",
            self.total_days,
            self.booked_days,
            self.available_days,
            self.occupancy_rate * 100.0
        )?;
        if let (Some(booked), Some(available)) =
            (self.booked_mean_price, self.available_mean_price)
        {
            writeln!(
                f,
                "Avg price: {booked:.0} on booked nights vs {available:.0} on open nights"
            )?;
        }
        if let (Some(weekend), Some(weekday)) = (self.weekend_mean_price, self.weekday_mean_price)
        {
            writeln!(f, "Weekend avg: {weekend:.0} | Weekday avg: {weekday:.0}")?;
        }
        Ok(())
    }
}

/// Review volume by day of week — when guests actually leave reviews,
/// which tracks when stays end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewPatterns {
    /// Monday-first; days with no reviews are omitted.
    pub periods: Vec<ReviewDayCount>,
    pub total_reviews: u32,
    pub skipped_invalid_dates: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewDayCount {
    pub label: String,
    pub count: u32,
    /// Fraction of all dated reviews, in [0, 1].
    pub share: f64,
}

impl std::fmt::Display for ReviewPatterns {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "# Reviews by day of week ({} total)", self.total_reviews)?;
        for period in &self.periods {
            writeln!(
                f,
                "{:<12} {:>6} ({:.1}%)",
                period.label,
                period.count,
                period.share * 100.0
            )?;
        }
        Ok(())
    }
}

pub fn review_patterns(reviews: &[crate::domain::review::Review]) -> ReviewPatterns {
    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    let mut skipped_invalid_dates = 0;
    for review in reviews {
        match NaiveDate::parse_from_str(&review.date, DATE_FORMAT) {
            Ok(date) => {
                *counts.entry(date.weekday().num_days_from_monday()).or_insert(0) += 1;
            }
            Err(_) => skipped_invalid_dates += 1,
        }
    }
    let total_reviews: u32 = counts.values().sum();
    let periods = counts
        .into_iter()
        .map(|(ordinal, count)| ReviewDayCount {
            label: weekday_label(ordinal).to_string(),
            count,
            share: f64::from(count) / f64::from(total_reviews),
        })
        .collect();
    ReviewPatterns {
        periods,
        total_reviews,
        skipped_invalid_dates,
    }
}

pub fn calendar_summary(entries: &[CalendarEntry]) -> CalendarSummary {
    let total_days = entries.len() as u32;
    let booked_days = entries.iter().filter(|e| !e.available).count() as u32;
    let available_days = total_days - booked_days;

    let booked_prices: Vec<f64> = entries
        .iter()
        .filter(|e| !e.available)
        .filter_map(|e| e.price)
        .collect();
    let available_prices: Vec<f64> = entries
        .iter()
        .filter(|e| e.available)
        .filter_map(|e| e.price)
        .collect();

    let mut weekend_prices = Vec::new();
    let mut weekday_prices = Vec::new();
    for entry in entries.iter().filter(|e| e.available) {
        if let Some(price) = entry.price
            && let Ok(date) = NaiveDate::parse_from_str(&entry.date, DATE_FORMAT)
        {
            match date.weekday() {
                Weekday::Fri | Weekday::Sat => weekend_prices.push(price),
                _ => weekday_prices.push(price),
            }
        }
    }

    CalendarSummary {
        total_days,
        booked_days,
        available_days,
        occupancy_rate: if total_days > 0 {
            f64::from(booked_days) / f64::from(total_days)
        } else {
            0.0
        },
        booked_mean_price: stats::mean(&booked_prices),
        available_mean_price: stats::mean(&available_prices),
        weekend_mean_price: stats::mean(&weekend_prices),
        weekday_mean_price: stats::mean(&weekday_prices),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::make_entry;

    fn config() -> AnalyticsConfig {
        AnalyticsConfig::default()
    }

    #[test]
    fn march_scenario() {
        // 30 March entries, 12 booked: occupancy 0.40; index vs overall mean.
        let mut entries = Vec::new();
        for day in 1..=30 {
            let booked = day <= 12;
            entries.push(make_entry(
                "1",
                &format!("2025-03-{day:02}"),
                !booked,
                Some(1000.0),
            ));
        }
        for day in 1..=10 {
            entries.push(make_entry(
                "1",
                &format!("2025-06-{day:02}"),
                true,
                Some(500.0),
            ));
        }
        let profile = seasonal_profile(&entries, SeasonalBucket::Month, &config());
        let march = profile.periods.iter().find(|p| p.label == "March").unwrap();
        assert_eq!(march.total_entries, 30);
        assert_eq!(march.booked, 12);
        assert!((march.occupancy_rate - 0.40).abs() < 1e-9);
        // Overall mean = (30*1000 + 10*500) / 40 = 875
        assert!((profile.overall_mean_price.unwrap() - 875.0).abs() < 0.01);
        assert!((march.price_index.unwrap() - 1000.0 / 875.0).abs() < 1e-9);
    }

    #[test]
    fn empty_buckets_are_omitted() {
        let entries = vec![
            make_entry("1", "2025-07-01", false, Some(900.0)),
            make_entry("1", "2025-07-02", true, Some(900.0)),
        ];
        let profile = seasonal_profile(&entries, SeasonalBucket::Month, &config());
        assert_eq!(profile.periods.len(), 1);
        assert_eq!(profile.periods[0].label, "July");
    }

    #[test]
    fn empty_calendar_yields_empty_profile() {
        let profile = seasonal_profile(&[], SeasonalBucket::Month, &config());
        assert!(profile.periods.is_empty());
        assert!(profile.overall_mean_price.is_none());
        assert_eq!(profile.total_booked, 0);
    }

    #[test]
    fn invalid_dates_are_skipped_and_tallied() {
        let entries = vec![
            make_entry("1", "2025-05-01", false, Some(700.0)),
            make_entry("1", "not-a-date", false, Some(700.0)),
            make_entry("1", "2025-13-40", true, None),
        ];
        let profile = seasonal_profile(&entries, SeasonalBucket::Month, &config());
        assert_eq!(profile.skipped_invalid_dates, 2);
        assert_eq!(profile.periods.len(), 1);
        assert_eq!(profile.total_booked, 1);
    }

    #[test]
    fn booked_counts_are_conserved() {
        let mut entries = Vec::new();
        for day in 1..=28 {
            entries.push(make_entry(
                "1",
                &format!("2025-{:02}-{:02}", 1 + day % 4, day),
                day % 3 == 0,
                Some(600.0),
            ));
        }
        let profile = seasonal_profile(&entries, SeasonalBucket::Month, &config());
        let booked_in = entries.iter().filter(|e| !e.available).count() as u32;
        let booked_out: u32 = profile.periods.iter().map(|p| p.booked).sum();
        assert_eq!(booked_in, booked_out);
        assert_eq!(profile.total_booked, booked_in);
    }

    #[test]
    fn day_of_week_bucketing() {
        // 2025-06-02 is a Monday.
        let entries = vec![
            make_entry("1", "2025-06-02", false, Some(500.0)),
            make_entry("1", "2025-06-09", false, Some(500.0)),
            make_entry("1", "2025-06-07", true, Some(800.0)),
        ];
        let profile = seasonal_profile(&entries, SeasonalBucket::DayOfWeek, &config());
        assert_eq!(profile.periods.len(), 2);
        assert_eq!(profile.periods[0].label, "Monday");
        assert_eq!(profile.periods[0].booked, 2);
        assert_eq!(profile.periods[1].label, "Saturday");
        assert!((profile.periods[1].occupancy_rate - 0.0).abs() < 1e-9);
    }

    #[test]
    fn peak_and_off_peak_classification() {
        // Four months with distinct occupancy rates: top quartile is peak,
        // bottom quartile off-peak, the middle two shoulder.
        let mut entries = Vec::new();
        let months = [(1, 1), (2, 4), (3, 6), (4, 9)];
        for (month, booked) in months {
            for day in 1..=10 {
                entries.push(make_entry(
                    "1",
                    &format!("2025-{month:02}-{day:02}"),
                    day > booked,
                    Some(750.0),
                ));
            }
        }
        let profile = seasonal_profile(&entries, SeasonalBucket::Month, &config());
        let demand: Vec<DemandLevel> = profile.periods.iter().map(|p| p.demand).collect();
        assert_eq!(
            demand,
            vec![
                DemandLevel::OffPeak,
                DemandLevel::Shoulder,
                DemandLevel::Shoulder,
                DemandLevel::Peak
            ]
        );
    }

    #[test]
    fn uniform_occupancy_is_all_shoulder() {
        let mut entries = Vec::new();
        for month in 1..=3 {
            for day in 1..=4 {
                entries.push(make_entry(
                    "1",
                    &format!("2025-{month:02}-{day:02}"),
                    day > 2,
                    Some(600.0),
                ));
            }
        }
        let profile = seasonal_profile(&entries, SeasonalBucket::Month, &config());
        assert!(
            profile
                .periods
                .iter()
                .all(|p| p.demand == DemandLevel::Shoulder)
        );
    }

    #[test]
    fn summary_counts_and_price_split() {
        let entries = vec![
            make_entry("1", "2025-06-02", true, Some(100.0)), // Mon, open
            make_entry("1", "2025-06-03", false, Some(140.0)), // Tue, booked
            make_entry("1", "2025-06-06", true, Some(200.0)), // Fri, open
            make_entry("1", "2025-06-07", false, Some(260.0)), // Sat, booked
        ];
        let summary = calendar_summary(&entries);
        assert_eq!(summary.total_days, 4);
        assert_eq!(summary.booked_days, 2);
        assert_eq!(summary.available_days, 2);
        assert!((summary.occupancy_rate - 0.5).abs() < 1e-9);
        assert!((summary.booked_mean_price.unwrap() - 200.0).abs() < 0.01);
        assert!((summary.available_mean_price.unwrap() - 150.0).abs() < 0.01);
        // Weekend/weekday split runs over open nights only
        assert!((summary.weekend_mean_price.unwrap() - 200.0).abs() < 0.01);
        assert!((summary.weekday_mean_price.unwrap() - 100.0).abs() < 0.01);
    }

    #[test]
    fn summary_empty_calendar() {
        let summary = calendar_summary(&[]);
        assert_eq!(summary.total_days, 0);
        assert!((summary.occupancy_rate - 0.0).abs() < 1e-9);
        assert!(summary.booked_mean_price.is_none());
        assert!(summary.weekend_mean_price.is_none());
    }

    #[test]
    fn review_patterns_by_weekday() {
        use crate::test_helpers::make_review;
        let reviews = vec![
            make_review("1", "2025-06-02", Some(5.0)), // Monday
            make_review("2", "2025-06-09", None),      // Monday
            make_review("3", "2025-06-07", Some(4.0)), // Saturday
            make_review("4", "junk", Some(4.0)),
        ];
        let patterns = review_patterns(&reviews);
        assert_eq!(patterns.total_reviews, 3);
        assert_eq!(patterns.skipped_invalid_dates, 1);
        assert_eq!(patterns.periods.len(), 2);
        assert_eq!(patterns.periods[0].label, "Monday");
        assert_eq!(patterns.periods[0].count, 2);
        assert!((patterns.periods[0].share - 2.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn review_patterns_empty() {
        let patterns = review_patterns(&[]);
        assert!(patterns.periods.is_empty());
        assert_eq!(patterns.total_reviews, 0);
    }

    #[test]
    fn profile_display() {
        let entries = vec![
            make_entry("1", "2025-03-01", false, Some(1000.0)),
            make_entry("1", "2025-03-02", true, Some(900.0)),
        ];
        let profile = seasonal_profile(&entries, SeasonalBucket::Month, &config());
        let s = profile.to_string();
        assert!(s.contains("Seasonal profile by month"));
        assert!(s.contains("March"));
        assert!(s.contains("50.0%"));
    }
}
