pub mod collection;
pub mod comment;
pub mod movie;
pub mod rating;
pub mod user;

pub use collection::CollectionKind;
pub use comment::CommentRecord;
pub use movie::MovieRecord;
pub use rating::{RatingRecord, RatingSummary, MAX_USER_RATING, MIN_USER_RATING};
pub use user::UserProfile;
