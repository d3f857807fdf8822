use catalog_models::{CollectionKind, MAX_USER_RATING, MIN_USER_RATING};
use thiserror::Error;

/// Rejections surfaced to the caller. Remote failures never show up here;
/// they are absorbed by the fallback layer.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    #[error("Rating must be between {} and {}, got {value}", MIN_USER_RATING, MAX_USER_RATING)]
    InvalidRating { value: i64 },

    #[error("Comment text cannot be empty")]
    EmptyComment,

    #[error("No movie with id {id} in {}", scope_name(.kind))]
    NotFound { kind: Option<CollectionKind>, id: i64 },
}

fn scope_name(kind: &Option<CollectionKind>) -> String {
    match kind {
        Some(kind) => kind.to_string(),
        None => "either collection".to_string(),
    }
}

impl CatalogError {
    pub fn not_found(kind: CollectionKind, id: i64) -> Self {
        CatalogError::NotFound { kind: Some(kind), id }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        assert_eq!(
            CatalogError::InvalidRating { value: 6 }.to_string(),
            "Rating must be between 1 and 5, got 6"
        );
        assert_eq!(
            CatalogError::not_found(CollectionKind::ToWatch, 3).to_string(),
            "No movie with id 3 in to-watch"
        );
        assert_eq!(
            CatalogError::NotFound { kind: None, id: 3 }.to_string(),
            "No movie with id 3 in either collection"
        );
    }
}
