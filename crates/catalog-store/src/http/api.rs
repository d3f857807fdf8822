//! Wire shapes of the key-value HTTP API. Every response is a JSON object
//! `{ "success": bool, <payload field>, "error"?: string }`.

use crate::error::StoreError;
use catalog_models::{CollectionKind, RatingRecord, RatingSummary};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashMap;
use tracing::debug;

#[derive(Debug, Deserialize)]
pub struct RatingsForMovie {
    #[serde(default)]
    pub ratings: Vec<RatingRecord>,
    #[serde(default)]
    pub average: f64,
    #[serde(default)]
    pub count: u32,
}

impl RatingsForMovie {
    pub fn summary(&self) -> RatingSummary {
        RatingSummary {
            average: self.average,
            count: self.count,
        }
    }
}

pub fn movies_path(kind: CollectionKind) -> String {
    format!("/{}", kind.endpoint())
}

pub fn movie_path(kind: CollectionKind, id: i64) -> String {
    format!("/{}/{}", kind.endpoint(), id)
}

pub fn poster_path(id: i64) -> String {
    format!("/movies/{}/poster", id)
}

pub fn comments_for_path(movie_id: i64) -> String {
    format!("/comments/{}", movie_id)
}

pub fn comment_path(movie_id: i64, comment_id: &str) -> String {
    format!("/comments/{}/{}", movie_id, urlencoding::encode(comment_id))
}

pub fn ratings_for_path(movie_id: i64) -> String {
    format!("/ratings/{}", movie_id)
}

pub fn user_ratings_path(identity: &str) -> String {
    format!("/user-ratings/{}", urlencoding::encode(identity))
}

/// Checks the `success` flag and returns the whole body on success.
pub fn check_envelope(endpoint: &str, body: Value) -> Result<Value, StoreError> {
    let success = body
        .get("success")
        .and_then(Value::as_bool)
        .ok_or_else(|| StoreError::malformed(endpoint, "missing boolean `success` field"))?;

    if !success {
        let message = body
            .get("error")
            .and_then(Value::as_str)
            .unwrap_or("unknown error")
            .to_string();
        return Err(StoreError::rejected(endpoint, message));
    }

    Ok(body)
}

/// Decodes a single payload field out of a successful envelope.
pub fn take_field<T: DeserializeOwned>(endpoint: &str, mut body: Value, field: &str) -> Result<T, StoreError> {
    let value = body
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| StoreError::malformed(endpoint, format!("missing `{}` field", field)))?;

    serde_json::from_value(value).map_err(|e| StoreError::malformed(endpoint, e))
}

/// JSON object keys are strings; the catalog keys movies by integer id.
pub fn parse_id_keyed<T>(endpoint: &str, map: HashMap<String, T>) -> HashMap<i64, T> {
    map.into_iter()
        .filter_map(|(key, value)| match key.parse::<i64>() {
            Ok(id) => Some((id, value)),
            Err(_) => {
                debug!("Skipping non-numeric movie key {:?} from {}", key, endpoint);
                None
            }
        })
        .collect()
}
