//! Configuration file watcher for hot reload.

use std::path::{Path, PathBuf};
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::load_config;
use crate::config::schema::LogwareConfig;

/// Monitors the configuration file and emits validated reloads.
///
/// A file that fails to load or validate keeps the current configuration in
/// effect; the failure is reported on the error channel.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<LogwareConfig>,
}

impl ConfigWatcher {
    /// Create a new watcher for `path`.
    ///
    /// Returns the watcher and a receiver for configuration updates; apply
    /// each update with [`config::apply`](crate::config::apply).
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<LogwareConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();

        (
            Self {
                path: path.to_path_buf(),
                update_tx,
            },
            update_rx,
        )
    }

    /// Start watching. The returned handle must be kept alive for events to
    /// keep flowing.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let tx = self.update_tx.clone();
        let path = self.path.clone();

        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| match res {
                Ok(event) if event.kind.is_modify() || event.kind.is_create() => {
                    match load_config(&path) {
                        Ok(new_config) => {
                            let _ = tx.send(new_config);
                        }
                        Err(error) => crate::err!(
                            "config reload failed, keeping current configuration: {error}"
                        ),
                    }
                }
                Ok(_) => {}
                Err(error) => crate::err!("config watch error: {error}"),
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&self.path, RecursiveMode::NonRecursive)?;

        crate::info!("config watcher started on {}", self.path.display());
        Ok(watcher)
    }
}
