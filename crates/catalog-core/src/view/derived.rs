//! Read-only projections over a collection used to populate filter menus
//! and the detail view.

use catalog_models::MovieRecord;
use std::collections::{BTreeSet, HashSet};

/// Distinct tags in first-seen order.
pub fn all_tags(collection: &[MovieRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    collection
        .iter()
        .flat_map(|m| m.tags.iter())
        .filter(|tag| seen.insert(*tag))
        .cloned()
        .collect()
}

/// Distinct non-empty genre fields, ascending.
pub fn all_genres(collection: &[MovieRecord]) -> Vec<String> {
    collection
        .iter()
        .filter(|m| !m.genre.is_empty())
        .map(|m| m.genre.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Distinct years, newest first.
pub fn all_years(collection: &[MovieRecord]) -> Vec<i32> {
    collection
        .iter()
        .map(|m| m.year)
        .filter(|y| *y > 0)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .rev()
        .collect()
}

/// The `n` highest ids, i.e. the most recently added under the id-as-recency rule.
pub fn recent_movies(collection: &[MovieRecord], n: usize) -> Vec<MovieRecord> {
    let mut sorted: Vec<MovieRecord> = collection.to_vec();
    sorted.sort_by(|a, b| b.id.cmp(&a.id));
    sorted.truncate(n);
    sorted
}

/// Other titles sharing the first genre of `movie`, in collection order.
pub fn similar_movies(all: &[MovieRecord], movie: &MovieRecord, n: usize) -> Vec<MovieRecord> {
    let Some(first) = movie.genres().next().map(str::to_lowercase) else {
        return Vec::new();
    };

    all.iter()
        .filter(|m| m.id != movie.id)
        .filter(|m| m.genres().any(|g| g.to_lowercase() == first))
        .take(n)
        .cloned()
        .collect()
}
