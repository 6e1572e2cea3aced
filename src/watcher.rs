// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Watches the catalog file so the web UI can pick up edits

use notify::{Config, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver};
use tracing::{debug, info, warn};

use crate::{GalleryError, Result};

/// Events emitted by the watcher
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogEvent {
    /// The catalog was written or replaced
    Changed,
    /// The catalog was deleted
    Removed,
    /// Watcher error
    Error(String),
}

/// Watches one catalog file.
///
/// The parent directory is watched rather than the file itself, since
/// editors usually save by replacing the file.
pub struct CatalogWatcher {
    _watcher: RecommendedWatcher,
    file_name: OsString,
    event_rx: UnboundedReceiver<notify::Result<Event>>,
}

impl CatalogWatcher {
    pub fn new(catalog: &Path) -> Result<Self> {
        let file_name = catalog
            .file_name()
            .ok_or_else(|| GalleryError::Config(format!("Catalog path has no file name: {:?}", catalog)))?
            .to_os_string();
        let dir = match catalog.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        let (tx, rx) = unbounded_channel::<notify::Result<Event>>();
        let config = Config::default().with_poll_interval(Duration::from_secs(2));
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let _ = tx.send(res);
            },
            config,
        )?;
        watcher.watch(&dir, RecursiveMode::NonRecursive)?;
        info!("Watching catalog: {:?}", catalog);

        Ok(Self {
            _watcher: watcher,
            file_name,
            event_rx: rx,
        })
    }

    /// Next event touching the catalog; `None` once the watcher is gone
    pub async fn next_event(&mut self) -> Option<CatalogEvent> {
        loop {
            let event = match self.event_rx.recv().await? {
                Ok(event) => event,
                Err(e) => return Some(CatalogEvent::Error(e.to_string())),
            };
            if let Some(converted) = self.convert_event(&event) {
                return Some(converted);
            }
        }
    }

    /// Discard events already queued; returns how many touched the catalog
    pub fn drain_pending(&mut self) -> usize {
        let mut drained = 0;
        while let Ok(res) = self.event_rx.try_recv() {
            if let Ok(event) = res {
                if self.convert_event(&event).is_some() {
                    drained += 1;
                }
            }
        }
        drained
    }

    fn convert_event(&self, event: &Event) -> Option<CatalogEvent> {
        let touches_catalog = event
            .paths
            .iter()
            .any(|p| p.file_name() == Some(self.file_name.as_os_str()));
        if !touches_catalog {
            return None;
        }

        match event.kind {
            EventKind::Create(_) | EventKind::Modify(_) => Some(CatalogEvent::Changed),
            EventKind::Remove(_) => Some(CatalogEvent::Removed),
            _ => None,
        }
    }
}

/// Wait for a file to stop growing before reading it
pub async fn wait_for_stable(path: &Path, max_wait: Duration) -> bool {
    let check_interval = Duration::from_millis(250);
    let start = std::time::Instant::now();

    let mut last_size = match tokio::fs::metadata(path).await {
        Ok(m) => m.len(),
        Err(_) => return false,
    };

    loop {
        tokio::time::sleep(check_interval).await;

        if start.elapsed() > max_wait {
            warn!("Catalog stability check timed out for {:?}", path);
            return true;
        }

        let current_size = match tokio::fs::metadata(path).await {
            Ok(m) => m.len(),
            Err(_) => return false,
        };

        if current_size == last_size {
            return true;
        }

        last_size = current_size;
        debug!("Catalog {:?} still being written, size: {}", path, current_size);
    }
}
