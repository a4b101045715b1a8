use anyhow::{Context, Result};
use std::path::Path;

use deckhand::backup::BackupStore;
use deckhand::config::DeckhandConfig;
use deckhand::output;

pub fn list(config: DeckhandConfig, project_root: &Path) -> Result<()> {
    let store = BackupStore::new(project_root.join(&config.deploy.backup_dir));

    output::header(&format!("Backups for {}", config.app.name));

    let ids = store.list().context("Failed to list backups")?;
    if ids.is_empty() {
        output::warning("No backups found");
        return Ok(());
    }

    for (i, id) in ids.iter().enumerate() {
        if i == 0 {
            println!("  {} ← newest", id);
        } else {
            println!("  {}", id);
        }
    }

    Ok(())
}

pub fn prune(config: DeckhandConfig, project_root: &Path, retain: Option<usize>) -> Result<()> {
    let retain = retain.unwrap_or(config.deploy.keep_backups);
    let store = BackupStore::new(project_root.join(&config.deploy.backup_dir));

    let removed = store.prune(retain).context("Failed to prune backups")?;
    if removed.is_empty() {
        output::success("Nothing to prune");
    } else {
        for id in &removed {
            output::info(&format!("Removed {}", id));
        }
        output::success(&format!("Removed {} backup(s), kept {}", removed.len(), retain));
    }

    Ok(())
}
