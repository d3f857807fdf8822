use super::prompts;
use crate::output::Output;
use crate::{ConfigCommands, Toggle};
use catalog_config::{Config, PathManager};
use catalog_core::{AppContext, SortKey};
use catalog_store::{HttpStore, RemoteStore};
use color_eyre::Result;
use comfy_table::{Attribute, Cell, Color, Table};
use owo_colors::OwoColorize;
use serde_json::json;
use std::io::IsTerminal;

pub async fn run_config(cmd: ConfigCommands, output: &Output) -> Result<()> {
    match cmd {
        ConfigCommands::Show { full, check } => show_config(full, check, output).await,
        ConfigCommands::Init {
            base_url,
            api_key,
            force,
        } => init_config(base_url, api_key, force, output),
        ConfigCommands::SetSort { sort } => set_sort(sort, output),
        ConfigCommands::DarkMode { state } => set_dark_mode(state == Toggle::On, output),
        ConfigCommands::Whoami => whoami(output),
    }
}

fn mask_string(s: &str) -> String {
    if s.is_empty() || s == "YOUR_ANON_KEY" {
        return "<not set>".to_string();
    }
    if s.len() <= 4 {
        return "*".repeat(s.len());
    }
    format!("{}***{}", &s[..2], &s[s.len() - 2..])
}

fn section(title: &str) -> Table {
    let mut table = Table::new();
    table.set_header(vec![
        Cell::new(title).fg(Color::Cyan).add_attribute(Attribute::Bold),
        Cell::new(""),
    ]);
    table.load_preset(comfy_table::presets::UTF8_FULL);
    table.apply_modifier(comfy_table::modifiers::UTF8_ROUND_CORNERS);
    table
}

async fn show_config(full: bool, check: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let config_file = path_manager.config_file();

    if !config_file.exists() {
        output.warn(format!("Configuration file not found at: {}", config_file.display()));
        output.info("Run 'reelshelf config init' to create one.");
        return Ok(());
    }

    let config = Config::load_from_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load config from {}: {}", config_file.display(), e))?;
    let session = super::load_session(&path_manager)?;
    let api_key = if full {
        config.remote.api_key.clone()
    } else {
        mask_string(&config.remote.api_key)
    };
    let log_file = config
        .logging
        .file
        .as_ref()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "stderr".to_string());

    if output.is_human() && !output.is_quiet() {
        let mut files = section("Files");
        files.add_row(vec![Cell::new("Config"), Cell::new(config_file.display())]);
        files.add_row(vec![Cell::new("Session"), Cell::new(path_manager.session_file().display())]);
        files.add_row(vec![Cell::new("Mirror"), Cell::new(path_manager.mirror_dir().display())]);
        files.add_row(vec![Cell::new("Log"), Cell::new(&log_file)]);
        output.block(files.to_string());

        let mut remote = section("Remote Store");
        remote.add_row(vec![Cell::new("Base URL"), Cell::new(&config.remote.base_url)]);
        remote.add_row(vec![Cell::new("API Key"), Cell::new(&api_key)]);
        let timeout = match config.remote.timeout_seconds {
            0 => "transport default".to_string(),
            n => format!("{} seconds", n),
        };
        remote.add_row(vec![Cell::new("Timeout"), Cell::new(timeout)]);
        let configured = if config.remote.is_configured() {
            "✓".green().to_string()
        } else {
            "✗".red().to_string()
        };
        remote.add_row(vec![Cell::new("Configured"), Cell::new(configured)]);
        output.block(remote.to_string());

        let mut view = section("View");
        view.add_row(vec![Cell::new("Density"), Cell::new(format!("{:?}", config.view.density))]);
        view.add_row(vec![Cell::new("Page size (compact)"), Cell::new(config.view.page_size_compact)]);
        view.add_row(vec![Cell::new("Page size (wide)"), Cell::new(config.view.page_size_wide)]);
        view.add_row(vec![
            Cell::new("Sort"),
            Cell::new(session.sort_preference().map(String::as_str).unwrap_or("dateAdded")),
        ]);
        view.add_row(vec![Cell::new("Dark mode"), Cell::new(session.dark_mode())]);
        output.block(view.to_string());
    } else {
        output.data(&json!({
            "configFile": config_file.display().to_string(),
            "remote": {
                "baseUrl": config.remote.base_url,
                "apiKey": api_key,
                "timeoutSeconds": config.remote.timeout_seconds,
                "configured": config.remote.is_configured(),
            },
            "view": {
                "density": format!("{:?}", config.view.density).to_lowercase(),
                "pageSizeCompact": config.view.page_size_compact,
                "pageSizeWide": config.view.page_size_wide,
                "sort": session.sort_preference(),
                "darkMode": session.dark_mode(),
            },
            "logFile": log_file,
        }));
    }

    if let Err(e) = config.validate() {
        output.warn(format!("Configuration is incomplete: {}", e));
        return Ok(());
    }

    if check {
        let store = HttpStore::from_config(&config.remote)
            .map_err(|e| color_eyre::eyre::eyre!("Failed to create remote store client: {}", e))?;
        match store.health().await {
            Ok(()) => output.success(format!("Remote store at {} is healthy", store.base_url())),
            Err(e) => output.warn(format!("Remote store check failed: {}", e)),
        }
    }
    Ok(())
}

fn init_config(base_url: Option<String>, api_key: Option<String>, force: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    path_manager
        .ensure_directories()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to create configuration directories: {}", e))?;

    let config_file = path_manager.config_file();
    if config_file.exists() && !force {
        return Err(color_eyre::eyre::eyre!(
            "Configuration already exists at {}. Use --force to overwrite it.",
            config_file.display()
        ));
    }

    let mut config = Config::template();
    let interactive = std::io::stdin().is_terminal();

    config.remote.base_url = match base_url {
        Some(url) => url,
        None if interactive => prompts::prompt_string("Remote store base URL", Some(&config.remote.base_url))?,
        None => config.remote.base_url,
    };
    config.remote.api_key = match api_key {
        Some(key) => key,
        None if interactive => prompts::prompt_string("API key", Some(&config.remote.api_key))?,
        None => config.remote.api_key,
    };
    config.remote.base_url = config.remote.base_url.trim().trim_end_matches('/').to_string();
    config.remote.api_key = config.remote.api_key.trim().to_string();

    config
        .save_to_file(&config_file)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save config to {}: {}", config_file.display(), e))?;
    output.success(format!("Configuration written to {}", config_file.display()));

    if let Err(e) = config.validate() {
        output.warn(format!("Edit the file before use: {}", e));
    }
    Ok(())
}

fn set_sort(sort: SortKey, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let mut session = super::load_session(&path_manager)?;
    session.set_sort_preference(sort.as_str());
    session
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save session: {}", e))?;
    output.success(format!("Default sort set to {}", sort));
    Ok(())
}

fn set_dark_mode(enabled: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let mut session = super::load_session(&path_manager)?;
    session.set_dark_mode(enabled);
    session
        .save()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to save session: {}", e))?;
    output.success(format!("Dark mode {}", if enabled { "on" } else { "off" }));
    Ok(())
}

fn whoami(output: &Output) -> Result<()> {
    let path_manager = PathManager::default();
    let mut session = super::load_session(&path_manager)?;
    let context = AppContext::from_session(&mut session)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to prepare session: {}", e))?;

    if output.is_human() {
        match &context.current_user {
            Some(user) => output.info(format!("Signed in as {} ({})", user.username.bold(), user.id)),
            None => output.info(format!("Anonymous ({})", context.anonymous_id)),
        }
        output.info(format!("Ratings are recorded as {}", context.rating_identity()));
    } else {
        output.data(&json!({
            "user": context.current_user,
            "anonymousId": context.anonymous_id,
            "ratingIdentity": context.rating_identity(),
        }));
    }
    Ok(())
}
