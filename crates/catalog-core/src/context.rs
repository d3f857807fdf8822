use crate::view::SortKey;
use catalog_config::SessionStore;
use catalog_models::UserProfile;
use tracing::{info, warn};

/// Client state that used to be ambient: who is acting, and how they like
/// the catalog shown. Built once per run and passed to the `Catalog`.
#[derive(Debug, Clone, PartialEq)]
pub struct AppContext {
    pub current_user: Option<UserProfile>,
    pub anonymous_id: String,
    pub dark_mode: bool,
    pub sort_preference: SortKey,
}

impl AppContext {
    /// Reads the session, generating and persisting an anonymous id on first
    /// use.
    pub fn from_session(session: &mut SessionStore) -> anyhow::Result<Self> {
        let (anonymous_id, generated) = session.anonymous_id_or_generate();
        if generated {
            session.save()?;
            info!("Generated anonymous identity {}", anonymous_id);
        }

        let sort_preference = match session.sort_preference() {
            Some(raw) => raw.parse().unwrap_or_else(|e| {
                warn!("Ignoring stored sort preference: {}", e);
                SortKey::default()
            }),
            None => SortKey::default(),
        };

        Ok(Self {
            current_user: session.current_user(),
            anonymous_id,
            dark_mode: session.dark_mode(),
            sort_preference,
        })
    }

    pub fn anonymous(anonymous_id: impl Into<String>) -> Self {
        Self {
            current_user: None,
            anonymous_id: anonymous_id.into(),
            dark_mode: false,
            sort_preference: SortKey::default(),
        }
    }

    /// Identity ratings are stored under: the signed-in user, else the
    /// anonymous id.
    pub fn rating_identity(&self) -> &str {
        self.current_user
            .as_ref()
            .map(|u| u.id.as_str())
            .unwrap_or(&self.anonymous_id)
    }

    pub fn display_name(&self) -> &str {
        self.current_user
            .as_ref()
            .map(|u| u.username.as_str())
            .unwrap_or("Anonymous")
    }
}
