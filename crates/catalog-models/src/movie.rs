use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One catalogued title as stored under `movie:<id>` or `towatch:<id>`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct MovieRecord {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plot: Option<String>,
    #[serde(default)]
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>, // "142 min" or "3 Seasons"
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_id: Option<String>,
    #[serde(default)]
    pub rating: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub imdb_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_rating: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub community_rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_count: Option<u32>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_added: Option<i64>, // epoch milliseconds, absent on legacy records
    /// Backend fields this client does not model; kept so a read-modify-write
    /// round trip never drops them.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl MovieRecord {
    pub fn new(id: i64, title: impl Into<String>, year: i32) -> Self {
        Self {
            id,
            title: title.into(),
            year,
            ..Self::default()
        }
    }

    /// The external rating used for filtering and sorting: `imdbRating`
    /// when present and non-zero, otherwise the legacy `rating` field.
    pub fn effective_imdb_rating(&self) -> f64 {
        match self.imdb_rating {
            Some(r) if r != 0.0 && !r.is_nan() => r,
            _ => self.rating,
        }
    }

    pub fn date_added_at(&self) -> Option<DateTime<Utc>> {
        self.date_added
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }

    /// Comma-separated genre list, trimmed, empty entries dropped.
    pub fn genres(&self) -> impl Iterator<Item = &str> {
        self.genre.split(',').map(str::trim).filter(|g| !g.is_empty())
    }
}
