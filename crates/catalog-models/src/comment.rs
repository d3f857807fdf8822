use serde::{Deserialize, Serialize};

/// Free-standing annotation keyed `comment:<movieId>:<id>`. The movie id is
/// not checked against either collection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentRecord {
    pub id: String,
    pub movie_id: i64,
    pub username: String,
    pub text: String,
    pub timestamp: i64,
}
