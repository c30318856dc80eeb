use serde::{Deserialize, Serialize};

/// One day of one listing's availability calendar.
///
/// `available == false` means the night is booked; the occupancy analyses
/// count exactly these entries as demand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub listing_id: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    pub available: bool,
    /// Observed nightly price for that date. The loader substitutes the
    /// listing's base price when the calendar row carries none.
    #[serde(default)]
    pub price: Option<f64>,
}

impl std::fmt::Display for CalendarEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let price = self
            .price
            .map_or_else(|| "-".to_string(), |p| format!("{p:.0}"));
        write!(
            f,
            "{:<12} {:>8} {:>10}",
            self.date,
            price,
            if self.available { "Yes" } else { "No" }
        )
    }
}
