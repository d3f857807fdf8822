use crate::error::StoreError;
use crate::http::api;
use crate::traits::RemoteStore;
use async_trait::async_trait;
use catalog_config::RemoteConfig;
use catalog_models::{CollectionKind, CommentRecord, MovieRecord, RatingRecord, RatingSummary};
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// `RemoteStore` over the serverless function's HTTP routes.
#[derive(Clone)]
pub struct HttpStore {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

fn create_http_client(timeout: Option<Duration>) -> Result<Client, StoreError> {
    let mut builder = Client::builder().user_agent(concat!("reelshelf/", env!("CARGO_PKG_VERSION")));
    if let Some(timeout) = timeout {
        builder = builder.timeout(timeout);
    }
    builder
        .build()
        .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {}", e)))
}

impl HttpStore {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>, timeout: Option<Duration>) -> Result<Self, StoreError> {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(StoreError::Config("base URL is empty".to_string()));
        }

        Ok(Self {
            client: Arc::new(create_http_client(timeout)?),
            base_url,
            api_key: api_key.into(),
        })
    }

    pub fn from_config(remote: &RemoteConfig) -> Result<Self, StoreError> {
        let timeout = (remote.timeout_seconds > 0).then(|| Duration::from_secs(remote.timeout_seconds));
        Self::new(remote.base_url.clone(), remote.api_key.clone(), timeout)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Accept", "application/json")
    }

    /// Sends the request and returns the body of a successful envelope.
    async fn send(&self, builder: RequestBuilder, endpoint: &str) -> Result<Value, StoreError> {
        let response = builder.send().await.map_err(|source| StoreError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        let status = response.status();
        debug!("{} -> {}", endpoint, status);

        if status == StatusCode::NOT_FOUND {
            return Err(StoreError::NotFound(endpoint.to_string()));
        }

        let text = response.text().await.map_err(|source| StoreError::Transport {
            endpoint: endpoint.to_string(),
            source,
        })?;

        if !status.is_success() {
            return Err(StoreError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
                body: text,
            });
        }

        let body: Value = serde_json::from_str(&text).map_err(|e| StoreError::malformed(endpoint, e))?;
        api::check_envelope(endpoint, body)
    }

    async fn get(&self, path: &str) -> Result<Value, StoreError> {
        self.send(self.request(Method::GET, path), path).await
    }

    async fn send_json<B: Serialize + ?Sized>(&self, method: Method, path: &str, body: &B) -> Result<Value, StoreError> {
        self.send(self.request(method, path).json(body), path).await
    }

    async fn delete(&self, path: &str) -> Result<Value, StoreError> {
        self.send(self.request(Method::DELETE, path), path).await
    }
}

#[async_trait]
impl RemoteStore for HttpStore {
    async fn health(&self) -> Result<(), StoreError> {
        let path = "/health";
        let response = self
            .request(Method::GET, path)
            .send()
            .await
            .map_err(|source| StoreError::Transport {
                endpoint: path.to_string(),
                source,
            })?;

        // The health route answers `{status: "ok"}` without a success envelope.
        if !response.status().is_success() {
            return Err(StoreError::Status {
                endpoint: path.to_string(),
                status: response.status().as_u16(),
                body: response.text().await.unwrap_or_default(),
            });
        }
        Ok(())
    }

    async fn list_movies(&self, kind: CollectionKind) -> Result<Vec<MovieRecord>, StoreError> {
        let path = api::movies_path(kind);
        let body = self.get(&path).await?;
        api::take_field(&path, body, "movies")
    }

    async fn create_movie(&self, kind: CollectionKind, movie: &MovieRecord) -> Result<MovieRecord, StoreError> {
        let path = api::movies_path(kind);
        let body = self.send_json(Method::POST, &path, movie).await?;
        api::take_field(&path, body, "movie")
    }

    async fn patch_movie(&self, kind: CollectionKind, id: i64, fields: Value) -> Result<MovieRecord, StoreError> {
        let path = api::movie_path(kind, id);
        let body = self.send_json(Method::PATCH, &path, &fields).await?;
        api::take_field(&path, body, "movie")
    }

    async fn replace_movie(&self, kind: CollectionKind, movie: &MovieRecord) -> Result<(), StoreError> {
        let path = api::movie_path(kind, movie.id);
        self.send_json(Method::PUT, &path, movie).await?;
        Ok(())
    }

    async fn update_poster(&self, id: i64, image: &str) -> Result<MovieRecord, StoreError> {
        let path = api::poster_path(id);
        let body = self
            .send_json(Method::PATCH, &path, &serde_json::json!({ "image": image }))
            .await?;
        api::take_field(&path, body, "movie")
    }

    async fn delete_movie(&self, kind: CollectionKind, id: i64) -> Result<(), StoreError> {
        self.delete(&api::movie_path(kind, id)).await?;
        Ok(())
    }

    async fn list_comments(&self) -> Result<Vec<CommentRecord>, StoreError> {
        let path = "/comments";
        let body = self.get(path).await?;
        api::take_field(path, body, "comments")
    }

    async fn list_comments_for(&self, movie_id: i64) -> Result<Vec<CommentRecord>, StoreError> {
        let path = api::comments_for_path(movie_id);
        let body = self.get(&path).await?;
        api::take_field(&path, body, "comments")
    }

    async fn add_comment(&self, comment: &CommentRecord) -> Result<(), StoreError> {
        self.send_json(Method::POST, "/comments", comment).await?;
        Ok(())
    }

    async fn delete_comment(&self, movie_id: i64, comment_id: &str) -> Result<(), StoreError> {
        self.delete(&api::comment_path(movie_id, comment_id)).await?;
        Ok(())
    }

    async fn submit_rating(&self, rating: &RatingRecord) -> Result<(), StoreError> {
        let body = serde_json::json!({
            "movieId": rating.movie_id,
            "rating": rating.rating,
            "userIdentifier": rating.user_identifier,
        });
        self.send_json(Method::POST, "/ratings", &body).await?;
        Ok(())
    }

    async fn ratings_for(&self, movie_id: i64) -> Result<(Vec<RatingRecord>, RatingSummary), StoreError> {
        let path = api::ratings_for_path(movie_id);
        let body = self.get(&path).await?;
        let parsed: api::RatingsForMovie = serde_json::from_value(body).map_err(|e| StoreError::malformed(&path, e))?;
        let summary = parsed.summary();
        Ok((parsed.ratings, summary))
    }

    async fn rating_averages(&self) -> Result<HashMap<i64, RatingSummary>, StoreError> {
        let path = "/ratings";
        let body = self.get(path).await?;
        let raw: HashMap<String, RatingSummary> = api::take_field(path, body, "averages")?;
        Ok(api::parse_id_keyed(path, raw))
    }

    async fn user_ratings(&self, identity: &str) -> Result<HashMap<i64, u8>, StoreError> {
        let path = api::user_ratings_path(identity);
        let body = self.get(&path).await?;
        let raw: HashMap<String, u8> = api::take_field(&path, body, "userRatings")?;
        Ok(api::parse_id_keyed(&path, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        let store = HttpStore::new("https://abc.supabase.co/functions/v1/server/", "key", None).unwrap();
        assert_eq!(store.base_url(), "https://abc.supabase.co/functions/v1/server");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(matches!(HttpStore::new("", "key", None), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_from_config_zero_timeout() {
        let remote = RemoteConfig {
            base_url: "https://abc.supabase.co/functions/v1/server".to_string(),
            api_key: "key".to_string(),
            timeout_seconds: 0,
        };
        assert!(HttpStore::from_config(&remote).is_ok());
    }

    #[tokio::test]
    async fn test_unreachable_store_is_transport_error() {
        // Port 9 (discard) on localhost is closed in test environments.
        let store = HttpStore::new("http://127.0.0.1:9", "key", Some(Duration::from_secs(2))).unwrap();
        let err = store.list_movies(CollectionKind::Main).await.unwrap_err();
        assert!(matches!(err, StoreError::Transport { .. }));
    }
}
