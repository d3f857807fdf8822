//! Remote-first reads with a local-mirror fallback, and optimistic writes.
//!
//! Neither function returns an error: reads degrade to the mirror (or to an
//! empty collection), writes keep their optimistic local state whatever the
//! remote store answers.

use crate::mirror::{load_json, save_json, LocalMirror};
use catalog_store::StoreError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::{debug, warn};

/// Where a loaded collection came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    Remote,
    Mirror,
    /// Remote failed and nothing usable was mirrored.
    Empty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MutationOutcome {
    pub mirrored: bool,
    pub remote_applied: bool,
}

pub async fn load_collection<T, F>(fetch: F, mirror: &dyn LocalMirror, key: &str) -> Vec<T>
where
    T: Serialize + DeserializeOwned,
    F: Future<Output = Result<Vec<T>, StoreError>>,
{
    load_collection_with_source(fetch, mirror, key).await.0
}

pub async fn load_collection_with_source<T, F>(fetch: F, mirror: &dyn LocalMirror, key: &str) -> (Vec<T>, LoadSource)
where
    T: Serialize + DeserializeOwned,
    F: Future<Output = Result<Vec<T>, StoreError>>,
{
    match fetch.await {
        Ok(items) => {
            if let Err(e) = save_json(mirror, key, &items) {
                warn!(key, "Loaded from remote but could not refresh mirror: {}", e);
            }
            debug!(key, count = items.len(), "Loaded from remote");
            (items, LoadSource::Remote)
        }
        Err(e) => {
            warn!(key, "Remote load failed, using local mirror: {}", e);
            match load_json::<Vec<T>>(mirror, key) {
                Some(items) => (items, LoadSource::Mirror),
                None => (Vec::new(), LoadSource::Empty),
            }
        }
    }
}

/// Mirrors `optimistic` under `key` unconditionally, then attempts the remote
/// mutation. A failed mutation is logged; the optimistic state stays.
pub async fn mutate_collection<T, R, F>(
    mutation: F,
    mirror: &dyn LocalMirror,
    key: &str,
    optimistic: &[T],
) -> MutationOutcome
where
    T: Serialize,
    F: Future<Output = Result<R, StoreError>>,
{
    let mirrored = match save_json(mirror, key, optimistic) {
        Ok(()) => true,
        Err(e) => {
            warn!(key, "Could not mirror optimistic state: {}", e);
            false
        }
    };

    let remote_applied = match mutation.await {
        Ok(_) => true,
        Err(e) => {
            warn!(key, "Remote write failed, keeping local state: {}", e);
            false
        }
    };

    MutationOutcome {
        mirrored,
        remote_applied,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mirror::FileMirror;
    use catalog_models::MovieRecord;

    fn mirror() -> (tempfile::TempDir, FileMirror) {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FileMirror::new(dir.path()).unwrap();
        (dir, mirror)
    }

    fn offline() -> StoreError {
        StoreError::Status {
            endpoint: "/movies".to_string(),
            status: 503,
            body: "unavailable".to_string(),
        }
    }

    #[tokio::test]
    async fn test_successful_load_refreshes_mirror() {
        let (_dir, mirror) = mirror();
        let remote = vec![MovieRecord::new(1, "Alien", 1979)];

        let (loaded, source) =
            load_collection_with_source(async { Ok(remote.clone()) }, &mirror, "movies").await;
        assert_eq!(source, LoadSource::Remote);
        assert_eq!(loaded, remote);

        let mirrored: Vec<MovieRecord> = load_json(&mirror, "movies").unwrap();
        assert_eq!(mirrored, remote);
    }

    #[tokio::test]
    async fn test_rejected_load_returns_last_cached() {
        let (_dir, mirror) = mirror();
        let cached = vec![MovieRecord::new(2, "Heat", 1995)];
        load_collection(async { Ok(cached.clone()) }, &mirror, "movies").await;

        let (loaded, source) = load_collection_with_source::<MovieRecord, _>(
            async { Err(StoreError::rejected("/movies", "kv unavailable")) },
            &mirror,
            "movies",
        )
        .await;
        assert_eq!(source, LoadSource::Mirror);
        assert_eq!(loaded, cached);
    }

    #[tokio::test]
    async fn test_failed_load_without_cache_is_empty() {
        let (_dir, mirror) = mirror();
        let (loaded, source) =
            load_collection_with_source::<MovieRecord, _>(async { Err(offline()) }, &mirror, "toWatchMovies").await;
        assert!(loaded.is_empty());
        assert_eq!(source, LoadSource::Empty);
    }

    #[tokio::test]
    async fn test_failed_load_with_corrupt_cache_is_empty() {
        let (_dir, mirror) = mirror();
        mirror.set("movies", "{\"oops\":").unwrap();
        let loaded = load_collection::<MovieRecord, _>(async { Err(offline()) }, &mirror, "movies").await;
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_cache_is_per_key() {
        let (_dir, mirror) = mirror();
        load_collection(async { Ok(vec![MovieRecord::new(1, "Alien", 1979)]) }, &mirror, "movies").await;

        let loaded = load_collection::<MovieRecord, _>(async { Err(offline()) }, &mirror, "toWatchMovies").await;
        assert!(loaded.is_empty());
    }

    #[tokio::test]
    async fn test_failed_mutation_keeps_optimistic_state() {
        let (_dir, mirror) = mirror();
        let optimistic = vec![MovieRecord::new(3, "Ran", 1985)];

        let outcome = mutate_collection::<_, (), _>(async { Err(offline()) }, &mirror, "movies", &optimistic).await;
        assert!(outcome.mirrored);
        assert!(!outcome.remote_applied);

        let mirrored: Vec<MovieRecord> = load_json(&mirror, "movies").unwrap();
        assert_eq!(mirrored, optimistic);
    }

    #[tokio::test]
    async fn test_successful_mutation() {
        let (_dir, mirror) = mirror();
        let outcome = mutate_collection(async { Ok::<_, StoreError>(()) }, &mirror, "movies", &Vec::<MovieRecord>::new()).await;
        assert_eq!(
            outcome,
            MutationOutcome {
                mirrored: true,
                remote_applied: true
            }
        );
    }
}
