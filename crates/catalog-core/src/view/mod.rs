//! The catalog view pipeline: filter, sort and paginate one collection.
//!
//! `compute_view` is pure. Resetting the page when a filter changes is the
//! caller's job; `ViewState` does that for the CLI.

pub mod derived;
pub mod runtime;
pub mod state;

#[cfg(test)]
mod tests;

pub use derived::{all_genres, all_tags, all_years, recent_movies, similar_movies};
pub use state::ViewState;

use catalog_models::MovieRecord;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;
use tracing::debug;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

pub const DEFAULT_PAGE_SIZE: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RuntimeFilter {
    #[default]
    All,
    /// Up to 90 minutes.
    Short,
    /// 91 to 150 minutes.
    Medium,
    /// Over 150 minutes.
    Long,
    OneSeason,
    MultiSeason,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SortKey {
    /// Newest first. Recency is read from the id, not from `dateAdded`.
    #[default]
    DateAdded,
    /// Oldest first, by id.
    DateAddedLatest,
    Title,
    Year,
    ImdbRating,
    UserRating,
    CommunityRating,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewParams {
    pub selected_genres: BTreeSet<String>,
    pub selected_years: BTreeSet<i32>,
    pub search_query: String,
    /// Inclusive bounds on the IMDb rating.
    pub imdb_rating_range: (f64, f64),
    pub runtime_filter: RuntimeFilter,
    pub selected_tags: BTreeSet<String>,
    pub sort_by: SortKey,
    /// 1-indexed.
    pub page: usize,
    pub page_size: usize,
}

impl Default for ViewParams {
    fn default() -> Self {
        Self {
            selected_genres: BTreeSet::new(),
            selected_years: BTreeSet::new(),
            search_query: String::new(),
            imdb_rating_range: (0.0, 10.0),
            runtime_filter: RuntimeFilter::All,
            selected_tags: BTreeSet::new(),
            sort_by: SortKey::DateAdded,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of the filtered, sorted collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct View {
    pub movies: Vec<MovieRecord>,
    pub page: usize,
    pub page_count: usize,
    /// Size of the filtered set across all pages.
    pub total: usize,
}

pub fn compute_view(collection: &[MovieRecord], params: &ViewParams) -> View {
    let sorted = filter_and_sort(collection, params);
    let total = sorted.len();
    let page_count = page_count(total, params.page_size);
    let movies = paginate(&sorted, params.page, params.page_size).to_vec();

    View {
        movies,
        page: params.page,
        page_count,
        total,
    }
}

/// The full ordered sequence before pagination.
pub fn filter_and_sort(collection: &[MovieRecord], params: &ViewParams) -> Vec<MovieRecord> {
    let mut filtered: Vec<MovieRecord> = collection
        .iter()
        .filter(|movie| matches_filters(movie, params))
        .cloned()
        .collect();
    sort_movies(&mut filtered, params.sort_by);
    filtered
}

pub fn matches_filters(movie: &MovieRecord, params: &ViewParams) -> bool {
    genre_matches(movie, &params.selected_genres)
        && year_matches(movie, &params.selected_years)
        && search_matches(movie, &params.search_query)
        && rating_matches(movie, params.imdb_rating_range)
        && runtime_matches(movie, params.runtime_filter)
        && tags_match(movie, &params.selected_tags)
}

fn genre_matches(movie: &MovieRecord, genres: &BTreeSet<String>) -> bool {
    // Whole-field equality: "Crime, Drama" only matches a selected "Crime, Drama".
    genres.is_empty() || genres.contains(&movie.genre)
}

fn year_matches(movie: &MovieRecord, years: &BTreeSet<i32>) -> bool {
    years.is_empty() || years.contains(&movie.year)
}

fn search_matches(movie: &MovieRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    movie.title.to_lowercase().contains(&query) || movie.description.to_lowercase().contains(&query)
}

fn rating_matches(movie: &MovieRecord, (lo, hi): (f64, f64)) -> bool {
    let rating = movie.effective_imdb_rating();
    rating >= lo && rating <= hi
}

pub fn runtime_matches(movie: &MovieRecord, filter: RuntimeFilter) -> bool {
    let raw = movie.runtime.as_deref();
    let minutes = runtime::runtime_minutes(raw);
    let is_season = runtime::is_season_entry(raw);

    match filter {
        RuntimeFilter::All => true,
        RuntimeFilter::Short => !is_season && minutes > 0 && minutes <= 90,
        RuntimeFilter::Medium => !is_season && minutes > 90 && minutes <= 150,
        RuntimeFilter::Long => !is_season && minutes > 150,
        // Substring check also accepts the "1 Seasons" spelling.
        RuntimeFilter::OneSeason => is_season && raw.map(|r| r.contains("1 Season")).unwrap_or(false),
        RuntimeFilter::MultiSeason => is_season && runtime::season_count(raw).map(|n| n > 1).unwrap_or(false),
    }
}

fn tags_match(movie: &MovieRecord, tags: &BTreeSet<String>) -> bool {
    tags.is_empty() || movie.tags.iter().any(|t| tags.contains(t))
}

/// Stable sort; ties keep their incoming order.
pub fn sort_movies(movies: &mut [MovieRecord], key: SortKey) {
    movies.sort_by(|a, b| compare(a, b, key));
}

fn compare(a: &MovieRecord, b: &MovieRecord, key: SortKey) -> Ordering {
    match key {
        SortKey::DateAdded => b.id.cmp(&a.id),
        SortKey::DateAddedLatest => a.id.cmp(&b.id),
        SortKey::Title => compare_titles(&a.title, &b.title),
        SortKey::Year => b.year.cmp(&a.year),
        SortKey::ImdbRating => b.effective_imdb_rating().total_cmp(&a.effective_imdb_rating()),
        SortKey::UserRating => b.user_rating.unwrap_or(0).cmp(&a.user_rating.unwrap_or(0)),
        SortKey::CommunityRating => b
            .community_rating
            .unwrap_or(0.0)
            .total_cmp(&a.community_rating.unwrap_or(0.0)),
    }
}

/// Accents and case are ignored first, so "Éclair" sorts among the E titles
/// and "alien" next to "Alien". Ties fall back to lowercase, then raw.
fn compare_titles(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.to_lowercase().cmp(&b.to_lowercase()))
        .then_with(|| a.cmp(b))
}

/// NFD with combining marks dropped, lowercased.
fn collation_key(title: &str) -> String {
    title
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}

pub fn page_count(total: usize, page_size: usize) -> usize {
    if page_size == 0 {
        debug!("page_size of 0 requested; view has no pages");
        return 0;
    }
    total.div_ceil(page_size)
}

/// 1-indexed page slice; anything out of range is empty.
pub fn paginate(movies: &[MovieRecord], page: usize, page_size: usize) -> &[MovieRecord] {
    if page == 0 || page_size == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size);
    if start >= movies.len() {
        return &[];
    }
    let end = start.saturating_add(page_size).min(movies.len());
    &movies[start..end]
}

fn normalize_name(s: &str) -> String {
    s.chars()
        .filter(|c| *c != '-' && *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl SortKey {
    pub const ALL: [SortKey; 7] = [
        SortKey::DateAdded,
        SortKey::DateAddedLatest,
        SortKey::Title,
        SortKey::Year,
        SortKey::ImdbRating,
        SortKey::UserRating,
        SortKey::CommunityRating,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortKey::DateAdded => "dateAdded",
            SortKey::DateAddedLatest => "dateAddedLatest",
            SortKey::Title => "title",
            SortKey::Year => "year",
            SortKey::ImdbRating => "imdbRating",
            SortKey::UserRating => "userRating",
            SortKey::CommunityRating => "communityRating",
        }
    }
}

impl FromStr for SortKey {
    type Err = String;

    /// Accepts the camelCase names as well as kebab/snake spellings.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        SortKey::ALL
            .into_iter()
            .find(|k| normalize_name(k.as_str()) == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = SortKey::ALL.iter().map(SortKey::as_str).collect();
                format!("Invalid sort key: {}. Use one of: {}", s, names.join(", "))
            })
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl RuntimeFilter {
    pub const ALL: [RuntimeFilter; 6] = [
        RuntimeFilter::All,
        RuntimeFilter::Short,
        RuntimeFilter::Medium,
        RuntimeFilter::Long,
        RuntimeFilter::OneSeason,
        RuntimeFilter::MultiSeason,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuntimeFilter::All => "all",
            RuntimeFilter::Short => "short",
            RuntimeFilter::Medium => "medium",
            RuntimeFilter::Long => "long",
            RuntimeFilter::OneSeason => "oneSeason",
            RuntimeFilter::MultiSeason => "multiSeason",
        }
    }
}

impl FromStr for RuntimeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        RuntimeFilter::ALL
            .into_iter()
            .find(|f| normalize_name(f.as_str()) == wanted)
            .ok_or_else(|| {
                let names: Vec<&str> = RuntimeFilter::ALL.iter().map(RuntimeFilter::as_str).collect();
                format!("Invalid runtime filter: {}. Use one of: {}", s, names.join(", "))
            })
    }
}

impl fmt::Display for RuntimeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
