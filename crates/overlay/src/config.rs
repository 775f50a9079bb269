use crate::events::AppEvent;
use async_channel::Sender;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use pager::config as settings;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WatchError {
    #[error("Config error: {0}")]
    Config(#[from] settings::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Files whose change triggers a reload. Favorites are written by the overlay itself.
pub fn watched_files() -> Result<Vec<PathBuf>, WatchError> {
    Ok(vec![settings::settings_path()?, settings::loadout_path()?])
}

fn is_reload_trigger(kind: &EventKind, paths: &[PathBuf], watched: &[PathBuf]) -> bool {
    matches!(
        kind,
        EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
    ) && paths.iter().any(|p| watched.contains(p))
}

fn create_watcher(
    dir: &Path,
    bridge_tx: Sender<notify::Result<notify::Event>>,
) -> Result<RecommendedWatcher, WatchError> {
    fs_err::create_dir_all(dir)?;
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok(watcher)
}

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let (dir, watched) = match settings::config_dir()
        .map_err(WatchError::from)
        .and_then(|dir| Ok((dir, watched_files()?)))
    {
        Ok(paths) => paths,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    // dropping the watcher stops the notifications
    let _watcher = match create_watcher(&dir, bridge_tx) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to watch config directory: {}", e);
            return;
        }
    };

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                if is_reload_trigger(&event.kind, &event.paths, &watched)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use notify::event::{AccessKind, CreateKind};

    #[test]
    fn test_reload_trigger_filters_kind_and_path() {
        let watched = vec![PathBuf::from("/cfg/config.toml")];
        let hit = vec![PathBuf::from("/cfg/config.toml")];
        let other = vec![PathBuf::from("/cfg/favorites.json")];

        assert!(is_reload_trigger(&EventKind::Create(CreateKind::File), &hit, &watched));
        assert!(!is_reload_trigger(&EventKind::Create(CreateKind::File), &other, &watched));
        assert!(!is_reload_trigger(&EventKind::Access(AccessKind::Any), &hit, &watched));
    }
}
