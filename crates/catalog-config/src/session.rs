use anyhow::Result;
use catalog_models::UserProfile;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::warn;

#[derive(Debug, Serialize, Deserialize, Default)]
struct SessionData {
    #[serde(flatten)]
    data: HashMap<String, String>,
}

/// Per-machine client state: the anonymous identity, the signed-in user and
/// display preferences. Flat string key/values in TOML.
pub struct SessionStore {
    path: PathBuf,
    values: HashMap<String, String>,
}

const ANONYMOUS_ID: &str = "anonymous_user_id";
const CURRENT_USER: &str = "current_user";
const DARK_MODE: &str = "dark_mode";
const SORT_PREFERENCE: &str = "sort_preference";

/// `anon_<epoch-ms>_<13 lowercase alphanumerics>`
pub fn generate_anonymous_id() -> String {
    let suffix: String = uuid::Uuid::new_v4().simple().to_string().chars().take(13).collect();
    format!("anon_{}_{}", Utc::now().timestamp_millis(), suffix)
}

impl SessionStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            values: HashMap::new(),
        }
    }

    pub fn load(&mut self) -> Result<()> {
        if self.path.exists() {
            let content = std::fs::read_to_string(&self.path)?;
            let session: SessionData = toml::from_str(&content)?;
            self.values = session.data;
        }
        Ok(())
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let session = SessionData {
            data: self.values.clone(),
        };
        let content = toml::to_string_pretty(&session)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<&String> {
        self.values.get(key)
    }

    pub fn set(&mut self, key: String, value: String) {
        self.values.insert(key, value);
    }

    pub fn remove(&mut self, key: &str) {
        self.values.remove(key);
    }

    /// Returns the persisted anonymous id, generating one on first use. The
    /// caller must `save()` to persist a freshly generated id.
    pub fn anonymous_id_or_generate(&mut self) -> (String, bool) {
        if let Some(id) = self.get(ANONYMOUS_ID).filter(|id| !id.is_empty()) {
            return (id.clone(), false);
        }
        let id = generate_anonymous_id();
        self.set(ANONYMOUS_ID.to_string(), id.clone());
        (id, true)
    }

    pub fn current_user(&self) -> Option<UserProfile> {
        let raw = self.get(CURRENT_USER)?;
        match serde_json::from_str(raw) {
            Ok(user) => Some(user),
            Err(e) => {
                warn!("Ignoring unreadable {} in session file: {}", CURRENT_USER, e);
                None
            }
        }
    }

    pub fn set_current_user(&mut self, user: Option<&UserProfile>) -> Result<()> {
        match user {
            Some(user) => self.set(CURRENT_USER.to_string(), serde_json::to_string(user)?),
            None => self.remove(CURRENT_USER),
        }
        Ok(())
    }

    pub fn dark_mode(&self) -> bool {
        self.get(DARK_MODE).map(|v| v == "true").unwrap_or(false)
    }

    pub fn set_dark_mode(&mut self, enabled: bool) {
        self.set(DARK_MODE.to_string(), enabled.to_string());
    }

    pub fn sort_preference(&self) -> Option<&String> {
        self.get(SORT_PREFERENCE)
    }

    pub fn set_sort_preference(&mut self, sort: &str) {
        self.set(SORT_PREFERENCE.to_string(), sort.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::NamedTempFile;

    #[test]
    fn test_anonymous_id_is_generated_once() {
        let file = NamedTempFile::new().unwrap();
        let mut store = SessionStore::new(file.path().to_path_buf());
        store.load().unwrap();

        let (first, generated) = store.anonymous_id_or_generate();
        assert!(generated);
        assert!(first.starts_with("anon_"));
        store.save().unwrap();

        let mut reloaded = SessionStore::new(file.path().to_path_buf());
        reloaded.load().unwrap();
        let (second, generated) = reloaded.anonymous_id_or_generate();
        assert!(!generated);
        assert_eq!(first, second);
    }

    #[test]
    fn test_anonymous_id_format() {
        let id = generate_anonymous_id();
        let parts: Vec<&str> = id.split('_').collect();
        assert_eq!(parts.len(), 3);
        assert_eq!(parts[0], "anon");
        assert!(parts[1].parse::<i64>().is_ok());
        assert_eq!(parts[2].len(), 13);
        assert!(parts[2].chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn test_preferences_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let mut store = SessionStore::new(file.path().to_path_buf());
        assert!(!store.dark_mode());
        assert!(store.sort_preference().is_none());

        store.set_dark_mode(true);
        store.set_sort_preference("title");
        let user = UserProfile {
            id: "user_1_x".to_string(),
            username: "mira".to_string(),
            email: None,
            created_at: None,
        };
        store.set_current_user(Some(&user)).unwrap();
        store.save().unwrap();

        let mut reloaded = SessionStore::new(file.path().to_path_buf());
        reloaded.load().unwrap();
        assert!(reloaded.dark_mode());
        assert_eq!(reloaded.sort_preference().map(String::as_str), Some("title"));
        assert_eq!(reloaded.current_user(), Some(user));

        reloaded.set_current_user(None).unwrap();
        assert!(reloaded.current_user().is_none());
    }
}
