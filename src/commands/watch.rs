//! Watch content directories and reload on change

use anyhow::Result;
use notify::RecursiveMode;
use notify_debouncer_mini::{new_debouncer, DebounceEventResult};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;

use crate::content::ContentKind;
use crate::Folio;

const KINDS: [ContentKind; 2] = [ContentKind::Post, ContentKind::Book];

/// Content kinds whose directory contains one of `paths`
pub fn affected_kinds(folio: &Folio, paths: &[PathBuf]) -> Vec<ContentKind> {
    KINDS
        .into_iter()
        .filter(|&kind| {
            let dir = folio.dir_for(kind);
            paths.iter().any(|p| p.starts_with(dir))
        })
        .collect()
}

// Matches whole path components, so a `<user>.github.io` checkout still counts
fn is_relevant(path: &Path) -> bool {
    let in_git = path.components().any(|c| c.as_os_str() == ".git");
    let finder_junk = path.file_name().is_some_and(|n| n == ".DS_Store");
    !in_git && !finder_junk && !path.to_string_lossy().ends_with('~')
}

/// Reload `kind` and report how many entries came back
async fn reload(folio: &Folio, kind: ContentKind, changed: &[PathBuf]) {
    let cache = folio.cache_for(kind);
    for path in changed.iter().filter(|p| p.starts_with(folio.dir_for(kind))) {
        cache.invalidate_path(path);
    }

    let entries = folio.loader(kind).load_all().await;
    tracing::info!("Reloaded {} {}(s)", entries.len(), kind);
}

/// Watch for file changes until interrupted
pub async fn run(folio: &Folio) -> Result<()> {
    let (tx, mut rx) = mpsc::unbounded_channel::<DebounceEventResult>();

    // Create debouncer to avoid multiple rapid reloads
    let mut debouncer = new_debouncer(Duration::from_millis(500), move |res: DebounceEventResult| {
        let _ = tx.send(res);
    })?;

    let mut watched = 0;
    for kind in KINDS {
        let dir = folio.dir_for(kind);
        if dir.exists() {
            debouncer.watcher().watch(dir, RecursiveMode::Recursive)?;
            tracing::debug!("Watching: {:?}", dir);
            watched += 1;
        } else {
            tracing::warn!("Not watching missing directory {:?}", dir);
        }
    }
    if watched == 0 {
        anyhow::bail!("No content directories to watch");
    }

    for kind in KINDS {
        reload(folio, kind, &[]).await;
    }
    tracing::info!("Watching for changes. Press Ctrl+C to stop.");

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            message = rx.recv() => match message {
                Some(Ok(events)) => {
                    let changed: Vec<PathBuf> = events
                        .into_iter()
                        .map(|e| e.path)
                        .filter(|p| is_relevant(p))
                        .collect();
                    if changed.is_empty() {
                        continue;
                    }

                    for path in &changed {
                        tracing::info!("File changed: {}", path.display());
                    }
                    for kind in affected_kinds(folio, &changed) {
                        reload(folio, kind, &changed).await;
                    }
                }
                Some(Err(e)) => tracing::error!("Watch error: {:?}", e),
                None => break,
            },
        }
    }

    Ok(())
}
