// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Web UI: gallery grid, lightbox pages and a JSON API

pub mod templates;

use axum::{
    extract::{Form, Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Json, Redirect, Response},
    routing::{get, post},
    Router,
};
use chrono::Datelike;
use minijinja::Environment;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::signal;
use tokio::sync::RwLock;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::{debug, error, info, warn};

use crate::catalog::{open_store, CatalogSource, Photo, PhotoStore, LOCAL_ASSET_PREFIX};
use crate::config::AppConfig;
use crate::gallery::GalleryState;
use crate::lightbox::{LightboxEvent, LightboxKey, LightboxView};
use crate::metadata::load_and_enrich;
use crate::pagination::PageButton;
use crate::theme::{Theme, ThemeStore};
use crate::watcher::{wait_for_stable, CatalogEvent, CatalogWatcher};
use crate::{GalleryError, Result};
use templates::{Chrome, GalleryPage, LightboxPage, PhotoCard};

/// Cookie holding each browser's theme
pub const THEME_COOKIE: &str = "theme";

/// Shared application state
pub struct AppState {
    pub config: AppConfig,
    pub store: Arc<dyn PhotoStore>,
    /// Theme for browsers without a cookie, read from the preference file at startup
    pub default_theme: Theme,
    photos: RwLock<Arc<Vec<Photo>>>,
    templates: Environment<'static>,
}

impl AppState {
    pub fn new(config: AppConfig, store: Arc<dyn PhotoStore>, photos: Vec<Photo>) -> Result<Self> {
        let default_theme = ThemeStore::new(PathBuf::from(&config.preferences.path)).load();
        Ok(Self {
            config,
            store,
            default_theme,
            photos: RwLock::new(Arc::new(photos)),
            templates: templates::environment()?,
        })
    }

    /// Current enriched catalog
    pub async fn photos(&self) -> Arc<Vec<Photo>> {
        self.photos.read().await.clone()
    }

    pub async fn replace_photos(&self, photos: Vec<Photo>) {
        let count = photos.len();
        *self.photos.write().await = Arc::new(photos);
        info!("Catalog reloaded: {} photos", count);
    }

    async fn gallery(&self, query: &str) -> GalleryState {
        let mut gallery = GalleryState::new(self.photos().await, self.config.gallery.page_size);
        if !query.is_empty() {
            gallery.search(query);
        }
        gallery
    }

    /// The requesting browser's theme
    fn theme_for(&self, headers: &HeaderMap) -> Theme {
        theme_from_cookies(headers).unwrap_or(self.default_theme)
    }

    fn chrome(&self, query: &str, theme: Theme) -> Chrome {
        Chrome {
            query: query.to_string(),
            theme,
            theme_icon: theme.icon(),
            year: chrono::Local::now().year(),
        }
    }
}

impl IntoResponse for GalleryError {
    fn into_response(self) -> Response {
        let status = match self {
            GalleryError::OutOfRange { .. } => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            error!("Request failed: {}", self);
        }
        (status, self.to_string()).into_response()
    }
}

/// Create the web application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        // Pages
        .route("/", get(gallery_page))
        .route("/photos/:index", get(photo_page))
        .route("/theme", post(toggle_theme_form))
        // API endpoints
        .route("/api/photos", get(api_get_photos))
        .route("/api/photos/:index", get(api_get_photo))
        .route("/api/theme", get(api_get_theme).post(api_toggle_theme));

    if let Some(root) = state.store.local_root() {
        router = router.nest_service(LOCAL_ASSET_PREFIX, ServeDir::new(root));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

fn theme_from_cookies(headers: &HeaderMap) -> Option<Theme> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == THEME_COOKIE)
        .and_then(|(_, value)| Theme::parse(value))
}

fn theme_cookie(theme: Theme) -> [(header::HeaderName, String); 1] {
    [(
        header::SET_COOKIE,
        format!("{}={}; Path=/; Max-Age=31536000; SameSite=Lax", THEME_COOKIE, theme.as_str()),
    )]
}

/// A path on this site that no browser will read as another host
fn is_same_site_path(target: &str) -> bool {
    let mut chars = target.chars();
    chars.next() == Some('/')
        && !matches!(chars.next(), Some('/') | Some('\\'))
        && !target.chars().any(char::is_control)
}

#[derive(Deserialize, Default)]
struct GalleryQuery {
    q: Option<String>,
    page: Option<usize>,
}

#[derive(Deserialize, Default)]
struct PhotoQuery {
    q: Option<String>,
}

// === Page Handlers ===

async fn gallery_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(params): Query<GalleryQuery>,
) -> Result<Html<String>> {
    let query = params.q.unwrap_or_default();
    let mut gallery = state.gallery(&query).await;
    gallery.set_page(params.page.unwrap_or(1));

    let cards = gallery
        .page_photos()
        .into_iter()
        .map(|(index, photo)| PhotoCard::new(index, photo, state.store.as_ref()))
        .collect();

    let page = GalleryPage {
        chrome: state.chrome(&query, state.theme_for(&headers)),
        cards,
        pagination: gallery.pagination(),
        page: gallery.current_page(),
        total: gallery.filtered_len(),
    };
    Ok(Html(templates::render_gallery(&state.templates, &page)?))
}

async fn photo_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Path(index): Path<usize>,
    Query(params): Query<PhotoQuery>,
) -> Result<Html<String>> {
    let query = params.q.unwrap_or_default();
    let mut gallery = state.gallery(&query).await;
    gallery.open_lightbox(index)?;

    let view = lightbox_view(&state, &gallery)?;
    let page = LightboxPage {
        chrome: state.chrome(&query, state.theme_for(&headers)),
        prev: neighbour(&gallery, LightboxKey::ArrowLeft),
        next: neighbour(&gallery, LightboxKey::ArrowRight),
        close_page: gallery.paginator().page_of(index),
        view,
    };
    Ok(Html(templates::render_lightbox(&state.templates, &page)?))
}

#[derive(Deserialize)]
struct ThemeForm {
    return_to: Option<String>,
}

async fn toggle_theme_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<ThemeForm>,
) -> impl IntoResponse {
    let theme = state.theme_for(&headers).toggled();
    let target = form
        .return_to
        .filter(|t| is_same_site_path(t))
        .unwrap_or_else(|| "/".to_string());
    (theme_cookie(theme), Redirect::to(&target))
}

/// Where a key press would move the viewer, if anywhere
fn neighbour(gallery: &GalleryState, key: LightboxKey) -> Option<usize> {
    let current = gallery.lightbox().index();
    let mut moved = gallery.clone();
    moved.handle_lightbox_event(LightboxEvent::Key(key));
    moved.lightbox().index().filter(|&i| Some(i) != current)
}

fn lightbox_view(state: &AppState, gallery: &GalleryState) -> Result<LightboxView> {
    let (index, photo) = gallery.lightbox_photo().ok_or(GalleryError::OutOfRange {
        index: gallery.lightbox().index().unwrap_or_default(),
        len: gallery.filtered_len(),
    })?;
    Ok(LightboxView::new(
        photo,
        index,
        gallery.filtered_len(),
        state.store.url_for(&photo.filename),
    ))
}

// === API Handlers ===

#[derive(Serialize)]
struct PhotoEntry {
    index: usize,
    url: String,
    #[serde(flatten)]
    photo: Photo,
}

#[derive(Serialize)]
struct PageResponse {
    query: String,
    page: usize,
    total_pages: usize,
    total: usize,
    photos: Vec<PhotoEntry>,
    pagination: Vec<PageButton>,
}

async fn api_get_photos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<GalleryQuery>,
) -> Json<PageResponse> {
    let query = params.q.unwrap_or_default();
    let mut gallery = state.gallery(&query).await;
    gallery.set_page(params.page.unwrap_or(1));

    let photos = gallery
        .page_photos()
        .into_iter()
        .map(|(index, photo)| PhotoEntry {
            index,
            url: state.store.url_for(&photo.filename),
            photo: photo.clone(),
        })
        .collect();

    Json(PageResponse {
        page: gallery.current_page(),
        total_pages: gallery.total_pages(),
        total: gallery.filtered_len(),
        pagination: gallery.pagination(),
        photos,
        query,
    })
}

async fn api_get_photo(
    State(state): State<Arc<AppState>>,
    Path(index): Path<usize>,
    Query(params): Query<PhotoQuery>,
) -> Result<Json<LightboxView>> {
    let query = params.q.unwrap_or_default();
    let mut gallery = state.gallery(&query).await;
    gallery.open_lightbox(index)?;
    Ok(Json(lightbox_view(&state, &gallery)?))
}

#[derive(Serialize)]
struct ThemeResponse {
    theme: Theme,
    icon: &'static str,
}

impl From<Theme> for ThemeResponse {
    fn from(theme: Theme) -> Self {
        Self { theme, icon: theme.icon() }
    }
}

async fn api_get_theme(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Json<ThemeResponse> {
    Json(state.theme_for(&headers).into())
}

async fn api_toggle_theme(State(state): State<Arc<AppState>>, headers: HeaderMap) -> impl IntoResponse {
    let theme = state.theme_for(&headers).toggled();
    (theme_cookie(theme), Json(ThemeResponse::from(theme)))
}

// === Server ===

/// Reload the catalog whenever the file on disk changes
fn spawn_catalog_reloader(state: Arc<AppState>, path: PathBuf) -> Result<()> {
    let mut watcher = CatalogWatcher::new(&path)?;

    tokio::spawn(async move {
        while let Some(event) = watcher.next_event().await {
            match event {
                CatalogEvent::Changed => {
                    if !wait_for_stable(&path, Duration::from_secs(5)).await {
                        continue;
                    }
                    let coalesced = watcher.drain_pending();
                    if coalesced > 0 {
                        debug!("Coalesced {} queued catalog events", coalesced);
                    }
                    match load_and_enrich(&state.config, state.store.clone()).await {
                        Ok(photos) => state.replace_photos(photos).await,
                        Err(e) => warn!("Keeping previous catalog, reload failed: {}", e),
                    }
                }
                CatalogEvent::Removed => {
                    warn!("Catalog {:?} was removed, keeping the photos already loaded", path);
                }
                CatalogEvent::Error(e) => warn!("Watch error: {}", e),
            }
        }
    });

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down..."),
        _ = terminate => info!("Received SIGTERM, shutting down..."),
    }
}

/// Load the catalog and serve the gallery until shut down
pub async fn start_server(config: AppConfig) -> Result<()> {
    let store = open_store(
        &config.catalog.photo_root,
        Duration::from_secs(config.metadata.timeout_secs),
    )?;
    info!("Photo store: {} ({})", config.catalog.photo_root, store.name());

    // A broken catalog leaves the gallery empty rather than stopping the server
    let photos = match load_and_enrich(&config, store.clone()).await {
        Ok(photos) => photos,
        Err(e) => {
            error!("Error loading photos: {}", e);
            Vec::new()
        }
    };

    let state = Arc::new(AppState::new(config.clone(), store, photos)?);

    if config.web.watch_catalog {
        if let Some(path) = CatalogSource::parse(&config.catalog.source).local_path() {
            if let Err(e) = spawn_catalog_reloader(state.clone(), path.to_path_buf()) {
                warn!("Catalog hot reload unavailable: {}", e);
            }
        }
    }

    let addr = format!("{}:{}", config.web.host, config.web.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Gallery available at http://{}", addr);

    let router = create_router(state);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::LocalStore;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Method, Request};
    use tower::ServiceExt;

    struct Fixture {
        _dir: tempfile::TempDir,
        state: Arc<AppState>,
    }

    fn fixture(n: usize) -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.preferences.path = dir.path().join("prefs.json").to_string_lossy().to_string();

        let photos = (0..n)
            .map(|i| {
                let tag = if i % 4 == 0 { "coast" } else { "inland" };
                Photo::new(&format!("{}.jpg", i), &format!("Photo {}", i), "").with_tags(&[tag])
            })
            .collect();
        let store: Arc<dyn PhotoStore> = Arc::new(LocalStore::new(dir.path()));
        let state = Arc::new(AppState::new(config, store, photos).unwrap());
        Fixture { _dir: dir, state }
    }

    async fn get(state: &Arc<AppState>, uri: &str) -> (StatusCode, String) {
        let response = create_router(state.clone())
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_gallery_page_shows_first_page() {
        let fx = fixture(8);
        let (status, html) = get(&fx.state, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Photo 5"));
        assert!(!html.contains("Photo 6"));
    }

    #[tokio::test]
    async fn test_gallery_page_search() {
        let fx = fixture(8);
        let (_, html) = get(&fx.state, "/?q=COAST").await;
        assert!(html.contains("Photo 0"));
        assert!(html.contains("Photo 4"));
        assert!(!html.contains("Photo 1<"));
    }

    #[tokio::test]
    async fn test_photo_page_out_of_range() {
        let fx = fixture(3);
        let (status, _) = get(&fx.state, "/photos/3").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_photo_page_last_has_no_next() {
        let fx = fixture(3);
        let (status, html) = get(&fx.state, "/photos/2").await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("id=\"lightbox-prev\""));
        assert!(!html.contains("id=\"lightbox-next\""));
    }

    #[tokio::test]
    async fn test_api_photos_pages() {
        let fx = fixture(13);
        let (status, body) = get(&fx.state, "/api/photos?page=3").await;
        assert_eq!(status, StatusCode::OK);

        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["page"], 3);
        assert_eq!(json["total_pages"], 3);
        assert_eq!(json["photos"].as_array().unwrap().len(), 1);
        assert_eq!(json["photos"][0]["filename"], "12.jpg");
        assert_eq!(json["pagination"].as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_api_photo_filtered_index() {
        let fx = fixture(9);
        let (_, body) = get(&fx.state, "/api/photos/2?q=coast").await;
        let json: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(json["title"], "Photo 8");
        assert_eq!(json["has_next"], false);
    }

    async fn post(state: &Arc<AppState>, uri: &str, cookie: Option<&str>, form: &str) -> Response {
        let mut request = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(cookie) = cookie {
            request = request.header(header::COOKIE, cookie);
        }
        create_router(state.clone())
            .oneshot(request.body(Body::from(form.to_string())).unwrap())
            .await
            .unwrap()
    }

    /// `name=value` part of the Set-Cookie header
    fn set_cookie(response: &Response) -> String {
        let value = response.headers()[header::SET_COOKIE].to_str().unwrap();
        value.split(';').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_api_theme_toggle_twice() {
        let fx = fixture(1);
        let (_, before) = get(&fx.state, "/api/theme").await;
        assert!(before.contains("\"light\""));

        let first = post(&fx.state, "/api/theme", None, "").await;
        assert_eq!(first.status(), StatusCode::OK);
        let cookie = set_cookie(&first);
        assert_eq!(cookie, "theme=dark");

        let second = post(&fx.state, "/api/theme", Some(&cookie), "").await;
        assert_eq!(set_cookie(&second), "theme=light");
    }

    #[tokio::test]
    async fn test_theme_is_per_browser() {
        let fx = fixture(1);
        let response = post(&fx.state, "/theme", None, "return_to=%2F").await;
        let cookie = set_cookie(&response);

        let dark = create_router(fx.state.clone())
            .oneshot(Request::builder().uri("/").header(header::COOKIE, &cookie).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = to_bytes(dark.into_body(), usize::MAX).await.unwrap();
        assert!(String::from_utf8(body.to_vec()).unwrap().contains("class=\"dark-mode\""));

        // a browser without the cookie still gets the saved default
        let (_, html) = get(&fx.state, "/").await;
        assert!(!html.contains("class=\"dark-mode\""));
    }

    #[tokio::test]
    async fn test_default_theme_from_preferences() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = AppConfig::default();
        config.preferences.path = dir.path().join("prefs.json").to_string_lossy().to_string();
        ThemeStore::new(PathBuf::from(&config.preferences.path)).save(Theme::Dark).unwrap();

        let store: Arc<dyn PhotoStore> = Arc::new(LocalStore::new(dir.path()));
        let state = Arc::new(AppState::new(config, store, Vec::new()).unwrap());
        let (_, body) = get(&state, "/api/theme").await;
        assert!(body.contains("\"dark\""));
    }

    #[test]
    fn test_theme_from_cookies() {
        let mut headers = HeaderMap::new();
        assert_eq!(theme_from_cookies(&headers), None);
        headers.insert(header::COOKIE, "session=abc; theme=dark".parse().unwrap());
        assert_eq!(theme_from_cookies(&headers), Some(Theme::Dark));
        headers.insert(header::COOKIE, "theme=purple".parse().unwrap());
        assert_eq!(theme_from_cookies(&headers), None);
    }

    #[tokio::test]
    async fn test_theme_form_redirects_back() {
        let fx = fixture(1);
        let response = post(&fx.state, "/theme", None, "return_to=%2F%3Fpage%3D2").await;

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/?page=2");
        assert_eq!(set_cookie(&response), "theme=dark");
    }

    #[tokio::test]
    async fn test_theme_form_rejects_offsite_redirect() {
        let fx = fixture(1);
        for target in ["%2F%2Fevil.example", "%2F%5Cevil.example", "%2F%09%2Fevil.example", "https%3A%2F%2Fevil.example"] {
            let response = post(&fx.state, "/theme", None, &format!("return_to={}", target)).await;
            assert_eq!(response.headers()[header::LOCATION], "/", "return_to={}", target);
        }
    }

    #[test]
    fn test_is_same_site_path() {
        assert!(is_same_site_path("/"));
        assert!(is_same_site_path("/photos/3?q=sea"));
        assert!(!is_same_site_path("//evil.example"));
        assert!(!is_same_site_path("/\\evil.example"));
        assert!(!is_same_site_path("/\t/evil.example"));
        assert!(!is_same_site_path("evil.example"));
        assert!(!is_same_site_path(""));
    }

    #[tokio::test]
    async fn test_replace_photos() {
        let fx = fixture(2);
        fx.state.replace_photos(vec![Photo::new("new.jpg", "Fresh", "")]).await;
        let (_, html) = get(&fx.state, "/").await;
        assert!(html.contains("Fresh"));
        assert!(!html.contains("Photo 0"));
    }
}
