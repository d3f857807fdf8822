//! Star ratings kept client-side so a summary can be recomputed when the
//! remote store cannot be reached.

use crate::error::CatalogError;
use catalog_models::{RatingRecord, RatingSummary, MAX_USER_RATING, MIN_USER_RATING};
use std::collections::HashMap;

pub fn validate_rating(value: i64) -> Result<u8, CatalogError> {
    if value < i64::from(MIN_USER_RATING) || value > i64::from(MAX_USER_RATING) {
        return Err(CatalogError::InvalidRating { value });
    }
    Ok(value as u8)
}

/// movie id -> identity -> rating
#[derive(Debug, Default, Clone)]
pub struct RatingBook {
    entries: HashMap<i64, HashMap<String, u8>>,
}

impl RatingBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces everything known about `movie_id` with `ratings`.
    pub fn seed(&mut self, movie_id: i64, ratings: &[RatingRecord]) {
        let entry = ratings
            .iter()
            .filter(|r| r.movie_id == movie_id)
            .map(|r| (r.user_identifier.clone(), r.rating))
            .collect();
        self.entries.insert(movie_id, entry);
    }

    pub fn knows(&self, movie_id: i64) -> bool {
        self.entries.contains_key(&movie_id)
    }

    /// Sets `identity`'s rating (one per identity, later overwrites earlier)
    /// and returns the recomputed summary.
    pub fn record(&mut self, movie_id: i64, identity: &str, value: i64) -> Result<RatingSummary, CatalogError> {
        let rating = validate_rating(value)?;
        let entry = self.entries.entry(movie_id).or_default();
        entry.insert(identity.to_string(), rating);
        Ok(RatingSummary::from_ratings(entry.values().copied()))
    }

    pub fn summary(&self, movie_id: i64) -> RatingSummary {
        self.entries
            .get(&movie_id)
            .map(|entry| RatingSummary::from_ratings(entry.values().copied()))
            .unwrap_or_default()
    }
}

/// Folds one identity's new rating into an aggregate whose individual
/// ratings are unknown. `previous` is that identity's earlier rating, if
/// the aggregate already counts it.
pub fn blend_into_summary(base: RatingSummary, previous: Option<u8>, rating: u8) -> RatingSummary {
    let mut sum = base.average * f64::from(base.count);
    let mut count = base.count;

    match previous {
        Some(prev) if count > 0 => sum -= f64::from(prev),
        _ => count += 1,
    }
    sum += f64::from(rating);

    RatingSummary {
        average: ((sum / f64::from(count)) * 10.0).round() / 10.0,
        count,
    }
}
