pub mod error;
pub mod http;
pub mod traits;

pub use error::StoreError;
pub use http::HttpStore;
pub use traits::RemoteStore;
