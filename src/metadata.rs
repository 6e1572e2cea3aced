// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Embedded image metadata (EXIF) and catalog enrichment

use exif::{In, Reader, Tag, Value as ExifValue};
use futures_util::future::join_all;
use image::ImageReader;
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

use crate::catalog::{load_catalog, CatalogSource, Orientation, Photo, PhotoStore};
use crate::config::{AppConfig, MetadataConfig};
use crate::{GalleryError, Result};

pub const UNKNOWN_DEVICE: &str = "Unknown Device";
pub const UNKNOWN_DATE: &str = "Unknown Date";

/// What could be read out of an image file
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedMetadata {
    pub make: Option<String>,
    pub model: Option<String>,
    pub date_time_original: Option<String>,
    pub date_time: Option<String>,
    pub orientation: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl ExtractedMetadata {
    /// "Make Model", trimmed; `None` when both are missing
    pub fn device(&self) -> Option<String> {
        let joined = format!(
            "{} {}",
            self.make.as_deref().unwrap_or(""),
            self.model.as_deref().unwrap_or("")
        );
        let joined = joined.trim();
        (!joined.is_empty()).then(|| joined.to_string())
    }

    /// Capture time, preferring the original over the last-modified stamp
    pub fn capture_date(&self) -> Option<&str> {
        self.date_time_original
            .as_deref()
            .or(self.date_time.as_deref())
    }
}

/// Read pixel size and EXIF tags from raw image bytes.
///
/// Bytes that are not a decodable image are an error. A decodable image
/// without an EXIF block yields metadata with only the dimensions set.
pub fn read_metadata(bytes: &[u8]) -> Result<ExtractedMetadata> {
    let (width, height) = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()?
        .into_dimensions()?;

    let mut metadata = ExtractedMetadata {
        width: Some(width),
        height: Some(height),
        ..Default::default()
    };
    read_exif_tags(bytes, &mut metadata);
    Ok(metadata)
}

fn read_exif_tags(bytes: &[u8], metadata: &mut ExtractedMetadata) {
    let exif = match Reader::new().read_from_container(&mut Cursor::new(bytes)) {
        Ok(exif) => exif,
        Err(e) => {
            debug!("No EXIF data: {}", e);
            return;
        }
    };

    let text = |tag| exif.get_field(tag, In::PRIMARY).and_then(|f| exif_string(&f.value));

    metadata.make = text(Tag::Make);
    metadata.model = text(Tag::Model);
    metadata.date_time_original = text(Tag::DateTimeOriginal);
    metadata.date_time = text(Tag::DateTime);
    metadata.orientation = exif
        .get_field(Tag::Orientation, In::PRIMARY)
        .and_then(|f| f.value.get_uint(0));
}

fn exif_string(value: &ExifValue) -> Option<String> {
    match value {
        ExifValue::Ascii(values) => values
            .first()
            .and_then(|raw| std::str::from_utf8(raw).ok())
            .map(|s| s.trim_matches('\u{0}').trim().to_string())
            .filter(|s| !s.is_empty()),
        _ => None,
    }
}

/// Fold extracted metadata into a catalog entry.
///
/// Embedded device and date win; otherwise the catalog value is kept;
/// otherwise a placeholder is used. Orientation always comes from the image,
/// an absent tag reading as 1 (landscape).
pub fn apply_metadata(photo: &mut Photo, metadata: &ExtractedMetadata) {
    let existing_device = photo.device.take().filter(|d| !d.trim().is_empty());
    photo.device = Some(
        metadata
            .device()
            .or(existing_device)
            .unwrap_or_else(|| UNKNOWN_DEVICE.to_string()),
    );

    let existing_date = photo.date_taken.take().filter(|d| !d.trim().is_empty());
    photo.date_taken = Some(
        metadata
            .capture_date()
            .map(String::from)
            .or(existing_date)
            .unwrap_or_else(|| UNKNOWN_DATE.to_string()),
    );

    photo.orientation = Some(Orientation::from_exif(metadata.orientation.unwrap_or(1)));

    if metadata.width.is_some() {
        photo.width = metadata.width;
        photo.height = metadata.height;
    }
}

/// Enrich one photo. Every failure leaves the entry as it was.
pub async fn enrich_photo(mut photo: Photo, store: &dyn PhotoStore, timeout: Duration) -> Photo {
    let bytes = match tokio::time::timeout(timeout, store.fetch(&photo.filename)).await {
        Ok(Ok(bytes)) => bytes,
        Ok(Err(e)) => {
            debug!("Could not fetch {} from {} store: {}", photo.filename, store.name(), e);
            return photo;
        }
        Err(_) => {
            debug!("Timed out fetching {}", photo.filename);
            return photo;
        }
    };

    let parsed = tokio::task::spawn_blocking(move || read_metadata(&bytes))
        .await
        .map_err(|e| GalleryError::Metadata(e.to_string()))
        .and_then(|r| r);

    match parsed {
        Ok(metadata) => apply_metadata(&mut photo, &metadata),
        Err(e) => debug!("Could not read metadata for {}: {}", photo.filename, e),
    }
    photo
}

/// Enrich every photo concurrently, keeping catalog order
pub async fn enrich_catalog(
    photos: Vec<Photo>,
    store: Arc<dyn PhotoStore>,
    config: &MetadataConfig,
) -> Vec<Photo> {
    if !config.enabled {
        debug!("Metadata extraction disabled");
        return photos;
    }

    let timeout = Duration::from_secs(config.timeout_secs);
    let total = photos.len();
    let enriched = join_all(
        photos
            .into_iter()
            .map(|photo| enrich_photo(photo, store.as_ref(), timeout)),
    )
    .await;

    let with_size = enriched.iter().filter(|p| p.width.is_some()).count();
    info!("Read embedded metadata for {}/{} photos", with_size, total);
    enriched
}

/// Load the configured catalog and enrich it from the store
pub async fn load_and_enrich(config: &AppConfig, store: Arc<dyn PhotoStore>) -> Result<Vec<Photo>> {
    let source = CatalogSource::parse(&config.catalog.source);
    let photos = load_catalog(&source).await?;
    Ok(enrich_catalog(photos, store, &config.metadata).await)
}
