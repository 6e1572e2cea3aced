// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Photofolio Web Gallery
//!
//! Standalone web server for the gallery, lightbox and JSON API.

use clap::Parser;
use std::path::PathBuf;
use tracing::info;

use photofolio::config::AppConfig;
use photofolio::Result;

#[derive(Parser, Debug)]
#[command(name = "photofolio-web")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Photofolio Web Gallery Server")]
struct Args {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.json")]
    config: PathBuf,

    /// Host to bind to
    #[arg(short = 'H', long)]
    host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    port: Option<u16>,

    /// Catalog file or URL (overrides config)
    #[arg(long)]
    catalog: Option<String>,

    /// Photo directory or base URL (overrides config)
    #[arg(long)]
    photos: Option<String>,

    /// Photos per gallery page (overrides config)
    #[arg(long)]
    page_size: Option<usize>,

    /// Do not reload the catalog when it changes on disk
    #[arg(long)]
    no_watch: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Args {
    /// Layer the command-line overrides onto a loaded config
    fn apply(self, config: &mut AppConfig) {
        if let Some(host) = self.host {
            config.web.host = host;
        }
        if let Some(port) = self.port {
            config.web.port = port;
        }
        if let Some(catalog) = self.catalog {
            config.catalog.source = catalog;
        }
        if let Some(photos) = self.photos {
            config.catalog.photo_root = photos;
        }
        if let Some(page_size) = self.page_size {
            config.gallery.page_size = page_size;
        }
        if self.no_watch {
            config.web.watch_catalog = false;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let mut config = AppConfig::load(&args.config)?;
    args.apply(&mut config);
    config.validate()?;

    info!(
        "Serving catalog {} with photos from {}",
        config.catalog.source, config.catalog.photo_root
    );
    photofolio::web::start_server(config).await
}
