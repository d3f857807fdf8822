use serde::{Deserialize, Serialize};
use std::fmt;

/// The two disjoint movie collections.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum CollectionKind {
    /// Watched / catalogued titles.
    Main,
    /// Titles queued for later.
    ToWatch,
}

impl CollectionKind {
    pub const ALL: [CollectionKind; 2] = [CollectionKind::Main, CollectionKind::ToWatch];

    /// Path segment of the remote endpoint.
    pub fn endpoint(&self) -> &'static str {
        match self {
            CollectionKind::Main => "movies",
            CollectionKind::ToWatch => "towatch",
        }
    }

    /// Key of the local mirror entry.
    pub fn mirror_key(&self) -> &'static str {
        match self {
            CollectionKind::Main => "movies",
            CollectionKind::ToWatch => "toWatchMovies",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CollectionKind::Main => write!(f, "main"),
            CollectionKind::ToWatch => write!(f, "to-watch"),
        }
    }
}
