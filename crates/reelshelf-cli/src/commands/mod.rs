pub mod backfill;
pub mod clear;
pub mod comment;
pub mod config;
pub mod list;
pub mod movie;
pub mod prompts;
pub mod render;
pub mod show;

use crate::output::Output;
use catalog_config::{Config, PathManager, SessionStore};
use catalog_core::{AppContext, Catalog, FileMirror};
use catalog_models::CollectionKind;
use catalog_store::HttpStore;
use color_eyre::Result;
use std::sync::Arc;

pub fn kind(to_watch: bool) -> CollectionKind {
    if to_watch {
        CollectionKind::ToWatch
    } else {
        CollectionKind::Main
    }
}

pub fn load_config(path_manager: &PathManager) -> Result<Config> {
    let config_file = path_manager.config_file();
    if !config_file.exists() {
        return Err(color_eyre::eyre::eyre!(
            "Configuration file not found at {}. Run 'reelshelf config init' to create one.",
            config_file.display()
        ));
    }

    let config = Config::load_from_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    config
        .validate()
        .map_err(|e| color_eyre::eyre::eyre!("Invalid configuration in {}: {}", config_file.display(), e))?;
    Ok(config)
}

pub fn load_session(path_manager: &PathManager) -> Result<SessionStore> {
    let session_file = path_manager.session_file();
    let mut session = SessionStore::new(session_file.clone());
    session
        .load()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load session from {}: {}", session_file.display(), e))?;
    Ok(session)
}

/// Builds the catalog from config and session and loads everything. Falls
/// back to the mirror (with a warning) when the remote store is unreachable.
pub async fn open_catalog(output: &Output) -> Result<(Config, Catalog)> {
    let path_manager = PathManager::default();
    let config = load_config(&path_manager)?;

    let mut session = load_session(&path_manager)?;
    let context = AppContext::from_session(&mut session)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to prepare session: {}", e))?;

    let store = HttpStore::from_config(&config.remote)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create remote store client: {}", e))?;
    let mirror = FileMirror::from_paths(&path_manager)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to open local mirror: {}", e))?;

    let mut catalog = Catalog::new(context, Arc::new(store), Arc::new(mirror));
    let report = catalog.load_all().await;
    tracing::debug!(?report, "Catalog ready");

    if report.degraded() {
        output.warn("Remote store unreachable; working from the local mirror");
    }

    Ok((config, catalog))
}
