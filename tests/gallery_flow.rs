// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Catalog on disk through enrichment, search, paging and the lightbox

use std::sync::Arc;

use photofolio::catalog::{open_store, Orientation};
use photofolio::config::AppConfig;
use photofolio::gallery::GalleryState;
use photofolio::lightbox::{ClickTarget, LightboxEvent, LightboxKey};
use photofolio::metadata::{load_and_enrich, UNKNOWN_DATE, UNKNOWN_DEVICE};
use photofolio::theme::ThemeStore;

fn write_png(path: &std::path::Path, width: u32, height: u32) {
    image::RgbImage::new(width, height).save(path).unwrap();
}

fn setup(n: usize) -> (tempfile::TempDir, AppConfig) {
    let dir = tempfile::tempdir().unwrap();
    let photo_dir = dir.path().join("photos");
    std::fs::create_dir_all(&photo_dir).unwrap();

    let mut entries = Vec::new();
    for i in 0..n {
        let filename = format!("{:02}.png", i);
        // every third image is missing on disk
        if i % 3 != 2 {
            write_png(&photo_dir.join(&filename), 4, 3);
        }
        let tags = if i == 7 { vec!["lighthouse"] } else { vec!["street"] };
        entries.push(serde_json::json!({
            "filename": filename,
            "title": format!("Frame {}", i),
            "description": "Walking around town",
            "tags": tags,
            "device": if i == 0 { Some("Pixel 7") } else { None },
        }));
    }
    let catalog = dir.path().join("photos.json");
    std::fs::write(&catalog, serde_json::to_string(&entries).unwrap()).unwrap();

    let mut config = AppConfig::default();
    config.catalog.source = catalog.to_string_lossy().to_string();
    config.catalog.photo_root = photo_dir.to_string_lossy().to_string();
    config.preferences.path = dir.path().join("prefs.json").to_string_lossy().to_string();
    (dir, config)
}

async fn load(config: &AppConfig) -> GalleryState {
    let store = open_store(&config.catalog.photo_root, std::time::Duration::from_secs(5)).unwrap();
    let photos = load_and_enrich(config, store).await.unwrap();
    GalleryState::new(Arc::new(photos), config.gallery.page_size)
}

#[tokio::test]
async fn enrichment_fills_placeholders_and_skips_missing_files() {
    let (_dir, config) = setup(4);
    let gallery = load(&config).await;
    let photos = gallery.photos();

    assert_eq!(photos[0].device.as_deref(), Some("Pixel 7"));
    assert_eq!(photos[0].date_taken.as_deref(), Some(UNKNOWN_DATE));
    assert_eq!(photos[0].orientation, Some(Orientation::Landscape));
    assert_eq!(photos[0].width, Some(4));

    assert_eq!(photos[1].device.as_deref(), Some(UNKNOWN_DEVICE));

    // 02.png is missing: untouched
    assert_eq!(photos[2].device, None);
    assert_eq!(photos[2].orientation, None);
}

#[tokio::test]
async fn tag_search_pagination_and_lightbox() {
    let (_dir, config) = setup(14);
    let mut gallery = load(&config).await;

    assert_eq!(gallery.total_pages(), 3);
    assert_eq!(gallery.pagination().len(), 3 + 2);

    gallery.search("LIGHTHOUSE");
    let found: Vec<_> = gallery.filtered_photos().map(|p| p.title.clone()).collect();
    assert_eq!(found, vec!["Frame 7".to_string()]);
    assert_eq!(gallery.pagination().len(), 1 + 2);

    gallery.search("");
    assert_eq!(gallery.filtered_len(), 14);
    assert_eq!(gallery.filtered_photo(0).unwrap().title, "Frame 0");
    assert_eq!(gallery.filtered_photo(13).unwrap().title, "Frame 13");

    gallery.open_lightbox(13).unwrap();
    gallery.handle_lightbox_event(LightboxEvent::Key(LightboxKey::ArrowRight));
    assert_eq!(gallery.lightbox_photo().unwrap().1.title, "Frame 13");

    gallery.handle_lightbox_event(LightboxEvent::Click(ClickTarget::Backdrop));
    assert!(gallery.lightbox_photo().is_none());
}

#[tokio::test]
async fn missing_catalog_is_an_error() {
    let (_dir, mut config) = setup(1);
    config.catalog.source = "/no/such/catalog.json".to_string();
    let store = open_store(&config.catalog.photo_root, std::time::Duration::from_secs(5)).unwrap();
    assert!(load_and_enrich(&config, store).await.is_err());
}

#[test]
fn theme_toggle_round_trip() {
    let (_dir, config) = setup(0);
    let store = ThemeStore::new(config.preferences.path.clone().into());
    let original = store.load();
    store.toggle().unwrap();
    assert_ne!(store.load(), original);
    store.toggle().unwrap();
    assert_eq!(store.load(), original);
}
