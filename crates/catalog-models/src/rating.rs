use serde::{Deserialize, Serialize};

pub const MIN_USER_RATING: u8 = 1;
pub const MAX_USER_RATING: u8 = 5;

/// A single identity's star rating, stored under `rating:<movieId>:<identity>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RatingRecord {
    pub movie_id: i64,
    pub rating: u8,
    pub user_identifier: String,
    #[serde(default)]
    pub timestamp: i64,
}

/// Community aggregate for one movie.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct RatingSummary {
    pub average: f64, // rounded to one decimal
    pub count: u32,
}

impl RatingSummary {
    /// Arithmetic mean of `ratings`, rounded to one decimal. Empty input
    /// yields an average of 0 and a count of 0.
    pub fn from_ratings<I>(ratings: I) -> Self
    where
        I: IntoIterator<Item = u8>,
    {
        let (sum, count) = ratings
            .into_iter()
            .fold((0u64, 0u32), |(sum, count), r| (sum + u64::from(r), count + 1));

        if count == 0 {
            return Self::default();
        }

        let mean = sum as f64 / f64::from(count);
        Self {
            average: (mean * 10.0).round() / 10.0,
            count,
        }
    }
}
