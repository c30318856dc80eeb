use serde::{Deserialize, Serialize};

/// A single guest review, used only in aggregate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub listing_id: String,
    /// ISO `YYYY-MM-DD`.
    pub date: String,
    /// Some platforms omit per-review scores.
    #[serde(default)]
    pub rating: Option<f64>,
}

impl std::fmt::Display for Review {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "listing {} ({})", self.listing_id, self.date)?;
        if let Some(rating) = self.rating {
            write!(f, " - {rating:.1}*")?;
        }
        Ok(())
    }
}
