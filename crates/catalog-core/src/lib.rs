pub mod catalog;
pub mod context;
pub mod error;
pub mod fallback;
pub mod mirror;
pub mod ratings;
pub mod sequencer;
pub mod view;

#[cfg(test)]
mod test_support;

pub use catalog::{normalize_tags, BackfillReport, Catalog, Fetched, LoadReport, RatingOutcome, COMMENTS_KEY};
pub use context::AppContext;
pub use error::CatalogError;
pub use fallback::{load_collection, load_collection_with_source, mutate_collection, LoadSource, MutationOutcome};
pub use mirror::{load_json, save_json, FileMirror, LocalMirror};
pub use ratings::{blend_into_summary, validate_rating, RatingBook};
pub use sequencer::{RequestSequencer, Ticket};
pub use view::{compute_view, RuntimeFilter, SortKey, View, ViewParams, ViewState};
