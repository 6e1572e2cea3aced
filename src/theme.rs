// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Persisted dark/light display preference

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::Result;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    pub fn is_dark(&self) -> bool {
        matches!(self, Theme::Dark)
    }

    pub fn toggled(&self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// Icon on the toggle button
    pub fn icon(&self) -> &'static str {
        match self {
            Theme::Dark => "🌙",
            Theme::Light => "☀️",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim() {
            "dark" => Some(Theme::Dark),
            "light" => Some(Theme::Light),
            _ => None,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Preferences {
    theme: Theme,
}

/// Reads and writes the preference file.
///
/// Clones share one lock, so toggles through any clone are serialised.
#[derive(Debug, Clone)]
pub struct ThemeStore {
    path: PathBuf,
    lock: Arc<Mutex<()>>,
}

impl ThemeStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            lock: Arc::new(Mutex::new(())),
        }
    }

    fn guard(&self) -> MutexGuard<'_, ()> {
        self.lock.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Saved theme; light when nothing usable is on disk
    pub fn load(&self) -> Theme {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(_) => return Theme::default(),
        };

        match serde_json::from_str::<Preferences>(&content) {
            Ok(prefs) => prefs.theme,
            Err(e) => {
                tracing::warn!("Ignoring unreadable preferences at {:?}: {}", self.path, e);
                Theme::default()
            }
        }
    }

    pub fn save(&self, theme: Theme) -> Result<()> {
        let _guard = self.guard();
        self.write(theme)
    }

    /// Replace the file in one rename so readers never see it half written
    fn write(&self, theme: Theme) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&Preferences { theme })?;

        let mut tmp_name = self.path.file_name().unwrap_or_default().to_os_string();
        tmp_name.push(".tmp");
        let tmp = self.path.with_file_name(tmp_name);
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }

    /// Flip the saved theme and return the new one
    pub fn toggle(&self) -> Result<Theme> {
        let _guard = self.guard();
        let theme = self.load().toggled();
        self.write(theme)?;
        tracing::debug!("Theme set to {}", theme.as_str());
        Ok(theme)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
