// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Photo catalog loading and image stores

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::{GalleryError, Result};

/// URL prefix under which the web UI serves a local photo directory
pub const LOCAL_ASSET_PREFIX: &str = "/assets/photos";

/// How a photo is framed, derived from the EXIF orientation tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    Landscape,
}

impl Orientation {
    /// EXIF values 6 and 8 mean the camera was rotated a quarter turn
    pub fn from_exif(tag: u32) -> Self {
        match tag {
            6 | 8 => Orientation::Portrait,
            _ => Orientation::Landscape,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Portrait => "portrait",
            Orientation::Landscape => "landscape",
        }
    }
}

/// A single catalog entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Photo {
    pub filename: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_taken: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orientation: Option<Orientation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
}

impl Photo {
    /// Minimal entry, mostly useful for tests and `init`
    pub fn new(filename: &str, title: &str, description: &str) -> Self {
        Self {
            filename: filename.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            location: None,
            tags: None,
            device: None,
            date_taken: None,
            orientation: None,
            width: None,
            height: None,
        }
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = Some(tags.iter().map(|t| t.to_string()).collect());
        self
    }

    pub fn tags(&self) -> &[String] {
        self.tags.as_deref().unwrap_or(&[])
    }
}

/// Where the catalog JSON comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogSource {
    File(PathBuf),
    Remote(String),
}

impl CatalogSource {
    pub fn parse(source: &str) -> Self {
        if is_remote(source) {
            CatalogSource::Remote(source.to_string())
        } else {
            CatalogSource::File(PathBuf::from(source))
        }
    }

    /// Local path of the catalog, if it lives on disk
    pub fn local_path(&self) -> Option<&Path> {
        match self {
            CatalogSource::File(path) => Some(path),
            CatalogSource::Remote(_) => None,
        }
    }
}

impl std::fmt::Display for CatalogSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogSource::File(path) => write!(f, "{}", path.display()),
            CatalogSource::Remote(url) => write!(f, "{}", url),
        }
    }
}

fn is_remote(location: &str) -> bool {
    location.starts_with("http://") || location.starts_with("https://")
}

/// Load and parse the catalog
pub async fn load_catalog(source: &CatalogSource) -> Result<Vec<Photo>> {
    let body = match source {
        CatalogSource::File(path) => tokio::fs::read_to_string(path).await?,
        CatalogSource::Remote(url) => {
            let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
            client.get(url).send().await?.error_for_status()?.text().await?
        }
    };

    let photos = parse_catalog(&body)?;
    info!("Loaded {} photos from {}", photos.len(), source);
    Ok(photos)
}

/// Parse catalog JSON (an array of photo entries)
pub fn parse_catalog(body: &str) -> Result<Vec<Photo>> {
    let photos: Vec<Photo> = serde_json::from_str(body)
        .map_err(|e| GalleryError::Catalog(format!("Invalid catalog: {}", e)))?;

    if let Some(bad) = photos.iter().position(|p| p.filename.trim().is_empty()) {
        return Err(GalleryError::Catalog(format!("Entry {} has an empty filename", bad)));
    }
    Ok(photos)
}

/// Source of image bytes and links
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Name of this store, for logs
    fn name(&self) -> &'static str;

    /// Read the raw bytes of an image
    async fn fetch(&self, filename: &str) -> Result<Vec<u8>>;

    /// Link used for display and download
    fn url_for(&self, filename: &str) -> String;

    /// Directory to serve statically, if the images are local
    fn local_root(&self) -> Option<&Path> {
        None
    }
}

/// Images in a directory on disk
pub struct LocalStore {
    root: PathBuf,
}

impl LocalStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn resolve(&self, filename: &str) -> Result<PathBuf> {
        let relative = Path::new(filename);
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if escapes {
            return Err(GalleryError::Catalog(format!("Refusing photo path outside the store: {}", filename)));
        }
        Ok(self.root.join(relative))
    }
}

#[async_trait]
impl PhotoStore for LocalStore {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn fetch(&self, filename: &str) -> Result<Vec<u8>> {
        let path = self.resolve(filename)?;
        debug!("Reading {:?}", path);
        Ok(tokio::fs::read(path).await?)
    }

    fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", LOCAL_ASSET_PREFIX, filename)
    }

    fn local_root(&self) -> Option<&Path> {
        Some(&self.root)
    }
}

/// Images behind an HTTP base URL
pub struct RemoteStore {
    client: Client,
    base_url: String,
}

impl RemoteStore {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PhotoStore for RemoteStore {
    fn name(&self) -> &'static str {
        "remote"
    }

    async fn fetch(&self, filename: &str) -> Result<Vec<u8>> {
        let url = self.url_for(filename);
        debug!("Fetching {}", url);
        let response = self.client.get(&url).send().await?.error_for_status()?;
        Ok(response.bytes().await?.to_vec())
    }

    fn url_for(&self, filename: &str) -> String {
        format!("{}/{}", self.base_url, filename.trim_start_matches('/'))
    }
}

/// Pick the store matching a configured photo root
pub fn open_store(photo_root: &str, timeout: Duration) -> Result<Arc<dyn PhotoStore>> {
    if is_remote(photo_root) {
        Ok(Arc::new(RemoteStore::new(photo_root, timeout)?))
    } else {
        Ok(Arc::new(LocalStore::new(photo_root)))
    }
}
