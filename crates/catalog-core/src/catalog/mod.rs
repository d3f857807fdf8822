use crate::context::AppContext;
use crate::error::CatalogError;
use crate::fallback::{load_collection_with_source, mutate_collection, LoadSource, MutationOutcome};
use crate::mirror::{save_json, LocalMirror};
use crate::ratings::{blend_into_summary, validate_rating, RatingBook};
use crate::sequencer::{RequestSequencer, Ticket};
use crate::view::{compute_view, View, ViewParams};
use catalog_models::{CollectionKind, CommentRecord, MovieRecord, RatingRecord, RatingSummary};
use catalog_store::RemoteStore;
use chrono::Utc;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const COMMENTS_KEY: &str = "comments";

/// A collection fetched but not yet applied.
pub struct Fetched<T> {
    ticket: Ticket,
    pub items: Vec<T>,
    pub source: LoadSource,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadReport {
    pub main: LoadSource,
    pub to_watch: LoadSource,
    pub comments: LoadSource,
    pub ratings_refreshed: bool,
}

impl LoadReport {
    /// True when any collection came from somewhere other than the remote.
    pub fn degraded(&self) -> bool {
        [self.main, self.to_watch, self.comments]
            .iter()
            .any(|s| *s != LoadSource::Remote)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RatingOutcome {
    pub rating: u8,
    pub summary: RatingSummary,
    pub remote_applied: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BackfillReport {
    pub updated: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// The client's working copy of both collections and all comments.
///
/// Every mutation updates the in-memory state and the mirror first, then
/// tries the remote store. Remote failures are logged and never undone.
pub struct Catalog {
    context: AppContext,
    store: Arc<dyn RemoteStore>,
    mirror: Arc<dyn LocalMirror>,
    sequencer: RequestSequencer,
    ratings: RatingBook,
    main: Vec<MovieRecord>,
    to_watch: Vec<MovieRecord>,
    comments: Vec<CommentRecord>,
}

fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

fn next_id(collection: &[MovieRecord]) -> i64 {
    collection.iter().map(|m| m.id).max().unwrap_or(0) + 1
}

/// Trimmed, non-empty, first occurrence wins.
pub fn normalize_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut out: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if !tag.is_empty() && !out.iter().any(|t| t == tag) {
            out.push(tag.to_string());
        }
    }
    out
}

impl Catalog {
    pub fn new(context: AppContext, store: Arc<dyn RemoteStore>, mirror: Arc<dyn LocalMirror>) -> Self {
        Self {
            context,
            store,
            mirror,
            sequencer: RequestSequencer::new(),
            ratings: RatingBook::new(),
            main: Vec::new(),
            to_watch: Vec::new(),
            comments: Vec::new(),
        }
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn collection(&self, kind: CollectionKind) -> &[MovieRecord] {
        match kind {
            CollectionKind::Main => &self.main,
            CollectionKind::ToWatch => &self.to_watch,
        }
    }

    fn collection_mut(&mut self, kind: CollectionKind) -> &mut Vec<MovieRecord> {
        match kind {
            CollectionKind::Main => &mut self.main,
            CollectionKind::ToWatch => &mut self.to_watch,
        }
    }

    pub fn comments(&self) -> &[CommentRecord] {
        &self.comments
    }

    fn position(&self, kind: CollectionKind, id: i64) -> Result<usize, CatalogError> {
        self.collection(kind).iter().position(|m| m.id == id).ok_or_else(|| {
            warn!(collection = %kind, movie_id = id, "Movie not found, nothing changed");
            CatalogError::not_found(kind, id)
        })
    }

    fn mirror_collection(&self, kind: CollectionKind) -> bool {
        match save_json(self.mirror.as_ref(), kind.mirror_key(), self.collection(kind)) {
            Ok(()) => true,
            Err(e) => {
                warn!(collection = %kind, "Could not mirror collection: {}", e);
                false
            }
        }
    }

    // Loading

    pub async fn fetch_collection(&self, kind: CollectionKind) -> Fetched<MovieRecord> {
        let key = kind.mirror_key();
        let ticket = self.sequencer.begin(key);
        let (items, source) = load_collection_with_source(self.store.list_movies(kind), self.mirror.as_ref(), key).await;
        Fetched { ticket, items, source }
    }

    pub async fn fetch_comments(&self) -> Fetched<CommentRecord> {
        let ticket = self.sequencer.begin(COMMENTS_KEY);
        let (items, source) =
            load_collection_with_source(self.store.list_comments(), self.mirror.as_ref(), COMMENTS_KEY).await;
        Fetched { ticket, items, source }
    }

    /// Installs a fetched collection unless a newer fetch for the same
    /// collection was started after it.
    pub fn apply_collection(&mut self, kind: CollectionKind, fetched: Fetched<MovieRecord>) -> bool {
        if !self.sequencer.is_current(&fetched.ticket) {
            debug!(collection = %kind, "Discarding stale response");
            return false;
        }
        *self.collection_mut(kind) = fetched.items;
        true
    }

    pub fn apply_comments(&mut self, fetched: Fetched<CommentRecord>) -> bool {
        if !self.sequencer.is_current(&fetched.ticket) {
            debug!(key = COMMENTS_KEY, "Discarding stale response");
            return false;
        }
        self.comments = fetched.items;
        true
    }

    pub async fn load_all(&mut self) -> LoadReport {
        let (main, to_watch, comments) = futures::join!(
            self.fetch_collection(CollectionKind::Main),
            self.fetch_collection(CollectionKind::ToWatch),
            self.fetch_comments()
        );

        let (main_source, to_watch_source, comments_source) = (main.source, to_watch.source, comments.source);
        self.apply_collection(CollectionKind::Main, main);
        self.apply_collection(CollectionKind::ToWatch, to_watch);
        self.apply_comments(comments);

        let ratings_refreshed = self.refresh_ratings().await;

        info!(
            main = self.main.len(),
            to_watch = self.to_watch.len(),
            comments = self.comments.len(),
            "Catalog loaded"
        );

        LoadReport {
            main: main_source,
            to_watch: to_watch_source,
            comments: comments_source,
            ratings_refreshed,
        }
    }

    /// Merges community averages and this identity's own ratings into both
    /// collections. If the averages cannot be fetched nothing changes.
    pub async fn refresh_ratings(&mut self) -> bool {
        let identity = self.context.rating_identity().to_string();
        let (averages, mine) = futures::join!(self.store.rating_averages(), self.store.user_ratings(&identity));

        let averages = match averages {
            Ok(averages) => averages,
            Err(e) => {
                warn!("Could not refresh ratings: {}", e);
                return false;
            }
        };
        // Without the user's own map, existing userRating values stay.
        let mine = mine.unwrap_or_else(|e| {
            warn!(identity = %identity, "Could not load own ratings: {}", e);
            HashMap::new()
        });

        for movie in self.main.iter_mut().chain(self.to_watch.iter_mut()) {
            match averages.get(&movie.id) {
                Some(summary) => {
                    movie.community_rating = Some(summary.average);
                    movie.rating_count = Some(summary.count);
                }
                None => {
                    movie.community_rating = None;
                    movie.rating_count = None;
                }
            }
            if let Some(rating) = mine.get(&movie.id) {
                movie.user_rating = Some(*rating);
            }
        }

        debug!(averages = averages.len(), own = mine.len(), "Ratings merged");
        true
    }

    // Movies

    /// Prepends `movie`. A non-positive id is replaced with the next free one
    /// and a missing `dateAdded` is stamped with now.
    pub async fn add_movie(&mut self, kind: CollectionKind, mut movie: MovieRecord) -> (MovieRecord, MutationOutcome) {
        if movie.id <= 0 {
            movie.id = next_id(self.collection(kind));
        }
        if movie.date_added.is_none() {
            movie.date_added = Some(now_millis());
        }

        self.collection_mut(kind).insert(0, movie.clone());
        info!(collection = %kind, movie_id = movie.id, "Added {}", movie.title);

        let store = Arc::clone(&self.store);
        let outcome = mutate_collection(
            store.create_movie(kind, &movie),
            self.mirror.as_ref(),
            kind.mirror_key(),
            self.collection(kind),
        )
        .await;
        (movie, outcome)
    }

    pub async fn delete_movie(&mut self, kind: CollectionKind, id: i64) -> Result<MovieRecord, CatalogError> {
        let idx = self.position(kind, id)?;
        let removed = self.collection_mut(kind).remove(idx);

        let store = Arc::clone(&self.store);
        mutate_collection(
            store.delete_movie(kind, id),
            self.mirror.as_ref(),
            kind.mirror_key(),
            self.collection(kind),
        )
        .await;
        Ok(removed)
    }

    pub async fn update_poster(&mut self, id: i64, image: &str) -> Result<MutationOutcome, CatalogError> {
        let kind = CollectionKind::Main;
        let idx = self.position(kind, id)?;
        self.main[idx].image = image.to_string();

        let store = Arc::clone(&self.store);
        Ok(mutate_collection(store.update_poster(id, image), self.mirror.as_ref(), kind.mirror_key(), &self.main).await)
    }

    pub async fn update_runtime(&mut self, kind: CollectionKind, id: i64, runtime: &str) -> Result<MutationOutcome, CatalogError> {
        let idx = self.position(kind, id)?;
        self.collection_mut(kind)[idx].runtime = Some(runtime.to_string());

        let store = Arc::clone(&self.store);
        let fields = serde_json::json!({ "runtime": runtime });
        Ok(mutate_collection(
            store.patch_movie(kind, id, fields),
            self.mirror.as_ref(),
            kind.mirror_key(),
            self.collection(kind),
        )
        .await)
    }

    pub async fn update_tags(
        &mut self,
        kind: CollectionKind,
        id: i64,
        tags: &[String],
    ) -> Result<(Vec<String>, MutationOutcome), CatalogError> {
        let idx = self.position(kind, id)?;
        let tags = normalize_tags(tags);
        self.collection_mut(kind)[idx].tags = tags.clone();

        let store = Arc::clone(&self.store);
        let fields = serde_json::json!({ "tags": tags });
        let outcome = mutate_collection(
            store.patch_movie(kind, id, fields),
            self.mirror.as_ref(),
            kind.mirror_key(),
            self.collection(kind),
        )
        .await;
        Ok((tags, outcome))
    }

    /// Records the current identity's 1-5 rating and refreshes the movie's
    /// community summary. Out-of-range values change nothing.
    pub async fn rate_movie(&mut self, kind: CollectionKind, id: i64, value: i64) -> Result<RatingOutcome, CatalogError> {
        let rating = validate_rating(value)?;
        let idx = self.position(kind, id)?;
        let identity = self.context.rating_identity().to_string();

        let movie = &mut self.collection_mut(kind)[idx];
        let previous = movie.user_rating;
        let base = RatingSummary {
            average: movie.community_rating.unwrap_or(0.0),
            count: movie.rating_count.unwrap_or(0),
        };
        movie.user_rating = Some(rating);

        let record = RatingRecord {
            movie_id: id,
            rating,
            user_identifier: identity.clone(),
            timestamp: now_millis(),
        };
        let store = Arc::clone(&self.store);
        let outcome = mutate_collection(
            store.submit_rating(&record),
            self.mirror.as_ref(),
            kind.mirror_key(),
            self.collection(kind),
        )
        .await;

        let remote_summary = if outcome.remote_applied {
            match store.ratings_for(id).await {
                Ok((ratings, summary)) => {
                    self.ratings.seed(id, &ratings);
                    Some(summary)
                }
                Err(e) => {
                    warn!(movie_id = id, "Could not re-read ratings: {}", e);
                    None
                }
            }
        } else {
            None
        };

        let summary = match remote_summary {
            Some(summary) => summary,
            None if self.ratings.knows(id) => self.ratings.record(id, &identity, value)?,
            None => blend_into_summary(base, previous, rating),
        };

        let movie = &mut self.collection_mut(kind)[idx];
        movie.community_rating = Some(summary.average);
        movie.rating_count = Some(summary.count);
        self.mirror_collection(kind);

        info!(
            movie_id = id,
            rating,
            average = summary.average,
            count = summary.count,
            "Rating recorded"
        );

        Ok(RatingOutcome {
            rating,
            summary,
            remote_applied: outcome.remote_applied,
        })
    }

    /// Moves a to-watch entry to the front of the main collection under the
    /// next free main id.
    pub async fn mark_as_watched(&mut self, id: i64) -> Result<(MovieRecord, MutationOutcome), CatalogError> {
        let idx = self.position(CollectionKind::ToWatch, id)?;

        let mut movie = self.to_watch.remove(idx);
        movie.id = next_id(&self.main);
        movie.date_added = Some(now_millis());
        self.main.insert(0, movie.clone());

        let mirrored = self.mirror_collection(CollectionKind::Main) & self.mirror_collection(CollectionKind::ToWatch);

        // Delete only after the create succeeded so a failure never loses the entry remotely.
        let remote_applied = match self.store.create_movie(CollectionKind::Main, &movie).await {
            Ok(_) => match self.store.delete_movie(CollectionKind::ToWatch, id).await {
                Ok(()) => true,
                Err(e) => {
                    warn!(movie_id = id, "Added to main but could not remove from to-watch: {}", e);
                    false
                }
            },
            Err(e) => {
                warn!(movie_id = id, "Remote write failed, keeping local state: {}", e);
                false
            }
        };

        info!(from = id, to = movie.id, "Marked {} as watched", movie.title);
        Ok((movie, MutationOutcome { mirrored, remote_applied }))
    }

    /// Stamps `now` on every record without `dateAdded` and writes each one
    /// back in full. `on_progress(done, total)` fires after each write.
    pub async fn backfill_date_added<F>(&mut self, kind: CollectionKind, now: i64, mut on_progress: F) -> BackfillReport
    where
        F: FnMut(usize, usize),
    {
        let mut pending = Vec::new();
        for movie in self.collection_mut(kind).iter_mut() {
            if movie.date_added.is_none() {
                movie.date_added = Some(now);
                pending.push(movie.clone());
            }
        }

        let mut report = BackfillReport {
            skipped: self.collection(kind).len() - pending.len(),
            ..Default::default()
        };
        if pending.is_empty() {
            return report;
        }
        self.mirror_collection(kind);

        let total = pending.len();
        for (done, movie) in pending.iter().enumerate() {
            match self.store.replace_movie(kind, movie).await {
                Ok(()) => {
                    debug!(collection = %kind, movie_id = movie.id, "dateAdded written");
                    report.updated += 1;
                }
                Err(e) => {
                    warn!(collection = %kind, movie_id = movie.id, "Could not write dateAdded: {}", e);
                    report.failed += 1;
                }
            }
            on_progress(done + 1, total);
        }

        info!(
            collection = %kind,
            updated = report.updated,
            failed = report.failed,
            skipped = report.skipped,
            "dateAdded backfill finished"
        );
        report
    }

    // Comments

    pub async fn add_comment(
        &mut self,
        movie_id: i64,
        username: &str,
        text: &str,
    ) -> Result<(CommentRecord, MutationOutcome), CatalogError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(CatalogError::EmptyComment);
        }

        let timestamp = now_millis();
        let mut id = timestamp;
        while self.comments.iter().any(|c| c.id == id.to_string()) {
            id += 1;
        }

        let comment = CommentRecord {
            id: id.to_string(),
            movie_id,
            username: username.to_string(),
            text: text.to_string(),
            timestamp,
        };
        self.comments.push(comment.clone());

        let store = Arc::clone(&self.store);
        let outcome = mutate_collection(store.add_comment(&comment), self.mirror.as_ref(), COMMENTS_KEY, &self.comments).await;
        Ok((comment, outcome))
    }

    /// `None` when no such comment exists.
    pub async fn delete_comment(&mut self, movie_id: i64, comment_id: &str) -> Option<MutationOutcome> {
        let Some(idx) = self
            .comments
            .iter()
            .position(|c| c.movie_id == movie_id && c.id == comment_id)
        else {
            warn!(movie_id, comment_id, "Comment not found, nothing changed");
            return None;
        };
        self.comments.remove(idx);

        let store = Arc::clone(&self.store);
        Some(
            mutate_collection(
                store.delete_comment(movie_id, comment_id),
                self.mirror.as_ref(),
                COMMENTS_KEY,
                &self.comments,
            )
            .await,
        )
    }

    /// Replaces the local comments of one movie with the remote ones. On
    /// failure the local comments stay and `false` is returned.
    pub async fn reload_comments_for(&mut self, movie_id: i64) -> bool {
        let fresh = match self.store.list_comments_for(movie_id).await {
            Ok(fresh) => fresh,
            Err(e) => {
                warn!(movie_id, "Could not reload comments, showing local copy: {}", e);
                return false;
            }
        };

        self.comments.retain(|c| c.movie_id != movie_id);
        self.comments
            .extend(fresh.into_iter().filter(|c| c.movie_id == movie_id));
        if let Err(e) = save_json(self.mirror.as_ref(), COMMENTS_KEY, &self.comments) {
            warn!(key = COMMENTS_KEY, "Could not mirror comments: {}", e);
        }
        true
    }

    /// Oldest first.
    pub fn comments_for(&self, movie_id: i64) -> Vec<&CommentRecord> {
        let mut comments: Vec<&CommentRecord> = self.comments.iter().filter(|c| c.movie_id == movie_id).collect();
        comments.sort_by_key(|c| c.timestamp);
        comments
    }

    // Queries

    pub fn view(&self, kind: CollectionKind, params: &ViewParams) -> View {
        compute_view(self.collection(kind), params)
    }

    /// Looks in the main collection first.
    pub fn find_movie(&self, id: i64) -> Option<(CollectionKind, &MovieRecord)> {
        CollectionKind::ALL
            .into_iter()
            .find_map(|kind| self.collection(kind).iter().find(|m| m.id == id).map(|m| (kind, m)))
    }

    pub fn find_in(&self, kind: CollectionKind, id: i64) -> Option<&MovieRecord> {
        self.collection(kind).iter().find(|m| m.id == id)
    }
}
