pub mod config;
pub mod paths;
pub mod session;

pub use config::{Config, Density, LoggingConfig, RemoteConfig, ViewConfig};
pub use paths::{PathManager, base_path_override};
pub use session::{SessionStore, generate_anonymous_id};
