use crate::output::Output;
use catalog_config::PathManager;
use catalog_core::{FileMirror, LocalMirror};
use color_eyre::Result;
use std::fs;

pub fn run_clear(all: bool, mirror: bool, session: bool, output: &Output) -> Result<()> {
    let path_manager = PathManager::default();

    if all {
        clear_mirror(&path_manager, output)?;
        clear_session(&path_manager, output)?;
        output.success("Local mirror and session cleared");
        return Ok(());
    }

    if mirror {
        clear_mirror(&path_manager, output)?;
    }
    if session {
        clear_session(&path_manager, output)?;
    }

    if !mirror && !session {
        output.warn("No clear option specified. Use --mirror, --session, or --all");
        output.info("\nExample: reelshelf clear --mirror");
    }
    Ok(())
}

fn clear_mirror(path_manager: &PathManager, output: &Output) -> Result<()> {
    let mirror_dir = path_manager.mirror_dir();
    if !mirror_dir.exists() {
        output.info("No local mirror found to clear");
        return Ok(());
    }

    let mirror = FileMirror::new(&mirror_dir)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to open mirror at {}: {}", mirror_dir.display(), e))?;
    mirror
        .clear()
        .map_err(|e| color_eyre::eyre::eyre!("Failed to clear mirror at {}: {}", mirror_dir.display(), e))?;
    output.success(format!("Cleared local mirror: {}", mirror_dir.display()));
    Ok(())
}

fn clear_session(path_manager: &PathManager, output: &Output) -> Result<()> {
    let session_file = path_manager.session_file();
    if !session_file.exists() {
        output.info("No session file found to clear");
        return Ok(());
    }

    fs::remove_file(&session_file).map_err(|e| {
        color_eyre::eyre::eyre!("Failed to remove session file at {}: {}", session_file.display(), e)
    })?;
    output.success(format!("Cleared session (anonymous id and preferences): {}", session_file.display()));
    Ok(())
}
