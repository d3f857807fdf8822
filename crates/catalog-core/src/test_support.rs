//! In-memory `RemoteStore` for catalog tests.

use async_trait::async_trait;
use catalog_models::{CollectionKind, CommentRecord, MovieRecord, RatingRecord, RatingSummary};
use catalog_store::{RemoteStore, StoreError};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

#[derive(Default)]
pub struct FakeState {
    pub main: Vec<MovieRecord>,
    pub to_watch: Vec<MovieRecord>,
    pub comments: Vec<CommentRecord>,
    pub ratings: Vec<RatingRecord>,
    /// Method names in call order.
    pub calls: Vec<String>,
}

impl FakeState {
    fn movies_mut(&mut self, kind: CollectionKind) -> &mut Vec<MovieRecord> {
        match kind {
            CollectionKind::Main => &mut self.main,
            CollectionKind::ToWatch => &mut self.to_watch,
        }
    }
}

#[derive(Default)]
pub struct FakeStore {
    pub state: Mutex<FakeState>,
    offline: AtomicBool,
    failing: Mutex<HashSet<String>>,
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_movies(main: Vec<MovieRecord>, to_watch: Vec<MovieRecord>) -> Self {
        let store = Self::new();
        {
            let mut state = store.state.lock().unwrap();
            state.main = main;
            state.to_watch = to_watch;
        }
        store
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Makes only the named method fail, as if that one route were down.
    pub fn fail_route(&self, call: &str) {
        self.failing.lock().unwrap().insert(call.to_string());
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn movies(&self, kind: CollectionKind) -> Vec<MovieRecord> {
        self.state.lock().unwrap().movies_mut(kind).clone()
    }

    fn enter(&self, call: &str) -> Result<std::sync::MutexGuard<'_, FakeState>, StoreError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call.to_string());
        if self.offline.load(Ordering::SeqCst) || self.failing.lock().unwrap().contains(call) {
            return Err(StoreError::Status {
                endpoint: call.to_string(),
                status: 503,
                body: "offline".to_string(),
            });
        }
        Ok(state)
    }
}

#[async_trait]
impl RemoteStore for FakeStore {
    async fn health(&self) -> Result<(), StoreError> {
        self.enter("health").map(|_| ())
    }

    async fn list_movies(&self, kind: CollectionKind) -> Result<Vec<MovieRecord>, StoreError> {
        let mut state = self.enter("list_movies")?;
        Ok(state.movies_mut(kind).clone())
    }

    async fn create_movie(&self, kind: CollectionKind, movie: &MovieRecord) -> Result<MovieRecord, StoreError> {
        let mut state = self.enter("create_movie")?;
        state.movies_mut(kind).insert(0, movie.clone());
        Ok(movie.clone())
    }

    async fn patch_movie(&self, kind: CollectionKind, id: i64, fields: serde_json::Value) -> Result<MovieRecord, StoreError> {
        let mut state = self.enter("patch_movie")?;
        let movie = state
            .movies_mut(kind)
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("/{}/{}", kind.endpoint(), id)))?;

        let mut value = serde_json::to_value(&*movie).map_err(|e| StoreError::malformed("patch", e))?;
        if let (Some(target), Some(patch)) = (value.as_object_mut(), fields.as_object()) {
            for (k, v) in patch {
                target.insert(k.clone(), v.clone());
            }
        }
        *movie = serde_json::from_value(value).map_err(|e| StoreError::malformed("patch", e))?;
        Ok(movie.clone())
    }

    async fn replace_movie(&self, kind: CollectionKind, movie: &MovieRecord) -> Result<(), StoreError> {
        let mut state = self.enter("replace_movie")?;
        if let Some(existing) = state.movies_mut(kind).iter_mut().find(|m| m.id == movie.id) {
            *existing = movie.clone();
        }
        Ok(())
    }

    async fn update_poster(&self, id: i64, image: &str) -> Result<MovieRecord, StoreError> {
        let mut state = self.enter("update_poster")?;
        let movie = state
            .main
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| StoreError::NotFound(format!("/movies/{}/poster", id)))?;
        movie.image = image.to_string();
        Ok(movie.clone())
    }

    async fn delete_movie(&self, kind: CollectionKind, id: i64) -> Result<(), StoreError> {
        let mut state = self.enter("delete_movie")?;
        state.movies_mut(kind).retain(|m| m.id != id);
        Ok(())
    }

    async fn list_comments(&self) -> Result<Vec<CommentRecord>, StoreError> {
        let state = self.enter("list_comments")?;
        Ok(state.comments.clone())
    }

    async fn list_comments_for(&self, movie_id: i64) -> Result<Vec<CommentRecord>, StoreError> {
        let state = self.enter("list_comments_for")?;
        Ok(state.comments.iter().filter(|c| c.movie_id == movie_id).cloned().collect())
    }

    async fn add_comment(&self, comment: &CommentRecord) -> Result<(), StoreError> {
        let mut state = self.enter("add_comment")?;
        state.comments.push(comment.clone());
        Ok(())
    }

    async fn delete_comment(&self, movie_id: i64, comment_id: &str) -> Result<(), StoreError> {
        let mut state = self.enter("delete_comment")?;
        state.comments.retain(|c| !(c.movie_id == movie_id && c.id == comment_id));
        Ok(())
    }

    async fn submit_rating(&self, rating: &RatingRecord) -> Result<(), StoreError> {
        let mut state = self.enter("submit_rating")?;
        state
            .ratings
            .retain(|r| !(r.movie_id == rating.movie_id && r.user_identifier == rating.user_identifier));
        state.ratings.push(rating.clone());
        Ok(())
    }

    async fn ratings_for(&self, movie_id: i64) -> Result<(Vec<RatingRecord>, RatingSummary), StoreError> {
        let state = self.enter("ratings_for")?;
        let ratings: Vec<RatingRecord> = state.ratings.iter().filter(|r| r.movie_id == movie_id).cloned().collect();
        let summary = RatingSummary::from_ratings(ratings.iter().map(|r| r.rating));
        Ok((ratings, summary))
    }

    async fn rating_averages(&self) -> Result<HashMap<i64, RatingSummary>, StoreError> {
        let state = self.enter("rating_averages")?;
        let mut by_movie: HashMap<i64, Vec<u8>> = HashMap::new();
        for r in &state.ratings {
            by_movie.entry(r.movie_id).or_default().push(r.rating);
        }
        Ok(by_movie
            .into_iter()
            .map(|(id, ratings)| (id, RatingSummary::from_ratings(ratings)))
            .collect())
    }

    async fn user_ratings(&self, identity: &str) -> Result<HashMap<i64, u8>, StoreError> {
        let state = self.enter("user_ratings")?;
        Ok(state
            .ratings
            .iter()
            .filter(|r| r.user_identifier == identity)
            .map(|r| (r.movie_id, r.rating))
            .collect())
    }
}
