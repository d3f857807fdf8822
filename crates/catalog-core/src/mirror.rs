use anyhow::{anyhow, Result};
use catalog_config::PathManager;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Best-effort local copy of remote collections: string keys, JSON values.
/// Never the source of truth while the remote store answers.
pub trait LocalMirror: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;
    fn clear(&self) -> Result<()>;
}

/// One `<key>.json` file per key under a single directory.
#[derive(Clone)]
pub struct FileMirror {
    dir: PathBuf,
}

impl FileMirror {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn from_paths(path_manager: &PathManager) -> Result<Self> {
        Self::new(path_manager.mirror_dir())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn key_path(&self, key: &str) -> Result<PathBuf> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(anyhow!("Invalid mirror key: {:?}", key));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl LocalMirror for FileMirror {
    fn get(&self, key: &str) -> Option<String> {
        let path = match self.key_path(key) {
            Ok(path) => path,
            Err(e) => {
                warn!("{}", e);
                return None;
            }
        };

        if !path.exists() {
            debug!("Mirror miss: {} (file does not exist)", key);
            return None;
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!("Failed to read mirror file for {}: {}", key, e);
                None
            }
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.key_path(key)?;
        std::fs::create_dir_all(&self.dir)?;

        match std::fs::write(&path, value) {
            Ok(_) => {
                debug!("Mirror saved: {} ({} bytes)", key, value.len());
                Ok(())
            }
            Err(e) => {
                warn!("Failed to write mirror file for {}: {}", key, e);
                Err(anyhow!("Failed to write mirror: {}", e))
            }
        }
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key)?;
        if path.exists() {
            std::fs::remove_file(&path)?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        if self.dir.exists() {
            std::fs::remove_dir_all(&self.dir)?;
            std::fs::create_dir_all(&self.dir)?;
            info!("Cleared mirror directory: {:?}", self.dir);
        }
        Ok(())
    }
}

/// Parses `mirror[key]`. Absent and corrupt entries both come back as `None`.
pub fn load_json<T>(mirror: &dyn LocalMirror, key: &str) -> Option<T>
where
    T: DeserializeOwned,
{
    let content = mirror.get(key)?;
    match serde_json::from_str::<T>(&content) {
        Ok(value) => {
            debug!("Mirror hit: {}", key);
            Some(value)
        }
        Err(e) => {
            warn!("Mirror corruption detected for {}: {}", key, e);
            None
        }
    }
}

pub fn save_json<T>(mirror: &dyn LocalMirror, key: &str, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let json = serde_json::to_string(value).map_err(|e| {
        warn!("Failed to serialize mirror data for {}: {}", key, e);
        anyhow!("Failed to serialize mirror data: {}", e)
    })?;
    mirror.set(key, &json)
}
