use crate::error::StoreError;
use async_trait::async_trait;
use catalog_models::{CollectionKind, CommentRecord, MovieRecord, RatingRecord, RatingSummary};
use std::collections::HashMap;

/// The authoritative key-value store behind the catalog. Every method maps to
/// one HTTP call; none of them retry.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn health(&self) -> Result<(), StoreError>;

    // Movies
    async fn list_movies(&self, kind: CollectionKind) -> Result<Vec<MovieRecord>, StoreError>;
    async fn create_movie(&self, kind: CollectionKind, movie: &MovieRecord) -> Result<MovieRecord, StoreError>;
    /// Shallow-merges `fields` into the stored record.
    async fn patch_movie(
        &self,
        kind: CollectionKind,
        id: i64,
        fields: serde_json::Value,
    ) -> Result<MovieRecord, StoreError>;
    /// Overwrites the stored record.
    async fn replace_movie(&self, kind: CollectionKind, movie: &MovieRecord) -> Result<(), StoreError>;
    async fn update_poster(&self, id: i64, image: &str) -> Result<MovieRecord, StoreError>;
    async fn delete_movie(&self, kind: CollectionKind, id: i64) -> Result<(), StoreError>;

    // Comments
    async fn list_comments(&self) -> Result<Vec<CommentRecord>, StoreError>;
    async fn list_comments_for(&self, movie_id: i64) -> Result<Vec<CommentRecord>, StoreError>;
    async fn add_comment(&self, comment: &CommentRecord) -> Result<(), StoreError>;
    async fn delete_comment(&self, movie_id: i64, comment_id: &str) -> Result<(), StoreError>;

    // Ratings
    async fn submit_rating(&self, rating: &RatingRecord) -> Result<(), StoreError>;
    async fn ratings_for(&self, movie_id: i64) -> Result<(Vec<RatingRecord>, RatingSummary), StoreError>;
    async fn rating_averages(&self) -> Result<HashMap<i64, RatingSummary>, StoreError>;
    async fn user_ratings(&self, identity: &str) -> Result<HashMap<i64, u8>, StoreError>;
}
