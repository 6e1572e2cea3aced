// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Photofolio: searchable photo gallery
//!
//! Browse, search and export the enriched catalog from the terminal, or
//! serve the web gallery.

use clap::{Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use photofolio::catalog::{open_store, Photo, PhotoStore};
use photofolio::config::AppConfig;
use photofolio::gallery::GalleryState;
use photofolio::lightbox::{meta_line, LightboxView};
use photofolio::metadata::load_and_enrich;
use photofolio::pagination::PageButton;
use photofolio::theme::ThemeStore;
use photofolio::{GalleryError, Result};

/// Photofolio CLI - searchable photo gallery
#[derive(Parser, Debug)]
#[command(name = "photofolio")]
#[command(author = "Jonathan D. A. Jewell <hyperpolymath>")]
#[command(version = "1.0.0")]
#[command(about = "Searchable photo gallery with EXIF enrichment", long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file (JSON format)
    #[arg(short, long, default_value = "config.json", global = true)]
    config: PathBuf,

    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Enable trace logging (most verbose)
    #[arg(long, global = true)]
    trace: bool,

    /// Output format for results
    #[arg(long, global = true, default_value = "text", value_parser = ["text", "json", "jsonl"])]
    format: String,

    /// Suppress non-essential output (quiet mode)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List one page of the gallery
    List {
        /// Only photos whose title, description or tags contain this text
        #[arg(short, long)]
        search: Option<String>,

        /// Page number (1-based)
        #[arg(short, long, default_value = "1")]
        page: usize,
    },

    /// Show a single photo as the lightbox would
    Show {
        /// Index into the (filtered) list, as printed by `list`
        index: usize,

        /// Search term the index refers to
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Write the enriched catalog to a JSON file
    Export {
        /// Output file
        output: PathBuf,
    },

    /// Display preference
    Theme {
        #[command(subcommand)]
        action: ThemeCommands,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },

    /// Initialize a new gallery directory
    Init {
        /// Directory to initialize (default: current)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Force overwrite existing configuration
        #[arg(long)]
        force: bool,
    },

    /// Serve the web gallery
    Serve {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },
}

#[derive(Subcommand, Debug)]
enum ThemeCommands {
    /// Print the saved theme
    Show,

    /// Switch between dark and light
    Toggle,
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Generate default configuration file
    Generate {
        /// Output file path
        #[arg(short, long, default_value = "config.json")]
        output: PathBuf,
    },

    /// Validate configuration file
    Validate,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.trace {
        "trace"
    } else if cli.verbose {
        "debug"
    } else if cli.quiet {
        "warn"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Load configuration
    let config = AppConfig::load(&cli.config)?;

    match cli.command {
        Some(Commands::List { search, page }) => run_list(config, search, page, &cli.format).await,
        Some(Commands::Show { index, search }) => run_show(config, index, search, &cli.format).await,
        Some(Commands::Export { output }) => run_export(config, output).await,
        Some(Commands::Theme { action }) => run_theme(config, action),
        Some(Commands::Config { action }) => run_config_command(config, action, &cli.config),
        Some(Commands::Init { dir, force }) => run_init(dir, force),
        Some(Commands::Serve { host, port }) => run_serve(config, host, port).await,
        None => run_list(config, None, 1, &cli.format).await,
    }
}

/// Load the catalog and enrich it
async fn load_gallery(config: &AppConfig) -> Result<(Arc<dyn PhotoStore>, GalleryState)> {
    let store = open_store(
        &config.catalog.photo_root,
        Duration::from_secs(config.metadata.timeout_secs),
    )?;
    let photos = load_and_enrich(config, store.clone()).await?;
    let gallery = GalleryState::new(Arc::new(photos), config.gallery.page_size);
    Ok((store, gallery))
}

#[derive(Serialize)]
struct ListedPhoto<'a> {
    index: usize,
    url: String,
    #[serde(flatten)]
    photo: &'a Photo,
}

/// Print one page of the (filtered) gallery
async fn run_list(config: AppConfig, search: Option<String>, page: usize, format: &str) -> Result<()> {
    let (store, mut gallery) = load_gallery(&config).await?;
    if let Some(term) = search {
        gallery.search(&term);
    }
    gallery.set_page(page);

    let listed: Vec<ListedPhoto> = gallery
        .page_photos()
        .into_iter()
        .map(|(index, photo)| ListedPhoto {
            index,
            url: store.url_for(&photo.filename),
            photo,
        })
        .collect();

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&listed)?),
        "jsonl" => {
            for entry in &listed {
                println!("{}", serde_json::to_string(entry)?);
            }
        }
        _ => {
            if listed.is_empty() {
                println!("No photos match.");
            }
            for entry in &listed {
                println!("[{}] {}", entry.index, entry.photo.title);
                if !entry.photo.description.is_empty() {
                    println!("    {}", entry.photo.description);
                }
                println!("    {}", meta_line(entry.photo));
                if !entry.photo.tags().is_empty() {
                    println!("    Tags: {}", entry.photo.tags().join(", "));
                }
            }
            println!();
            println!("{}", pagination_bar(&gallery.pagination()));
            println!(
                "Page {} of {} ({} photos)",
                gallery.current_page(),
                gallery.total_pages().max(1),
                gallery.filtered_len()
            );
        }
    }

    Ok(())
}

/// `(Prev) [1] 2 3 Next`: active in brackets, disabled in parentheses
fn pagination_bar(buttons: &[PageButton]) -> String {
    buttons
        .iter()
        .map(|b| {
            if b.active {
                format!("[{}]", b.label)
            } else if b.disabled {
                format!("({})", b.label)
            } else {
                b.label.clone()
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Print a single photo with its full caption
async fn run_show(config: AppConfig, index: usize, search: Option<String>, format: &str) -> Result<()> {
    let (store, mut gallery) = load_gallery(&config).await?;
    if let Some(term) = search {
        gallery.search(&term);
    }
    gallery.open_lightbox(index)?;

    let (index, photo) = gallery.lightbox_photo().ok_or(GalleryError::OutOfRange {
        index,
        len: gallery.filtered_len(),
    })?;
    let view = LightboxView::new(photo, index, gallery.filtered_len(), store.url_for(&photo.filename));

    match format {
        "json" => println!("{}", serde_json::to_string_pretty(&view)?),
        "jsonl" => println!("{}", serde_json::to_string(&view)?),
        _ => {
            println!("{} ({}/{})", view.title, view.index + 1, view.total);
            if !view.description.is_empty() {
                println!("{}", view.description);
            }
            println!("{}", view.meta);
            println!("Tags: {}", view.tags);
            println!("Download: {}", view.image_url);
        }
    }

    Ok(())
}

async fn run_export(config: AppConfig, output: PathBuf) -> Result<()> {
    let (_, gallery) = load_gallery(&config).await?;
    let json = serde_json::to_string_pretty(gallery.photos())?;
    std::fs::write(&output, json)?;
    println!("Exported {} photos to {:?}", gallery.photos().len(), output);
    Ok(())
}

fn run_theme(config: AppConfig, action: ThemeCommands) -> Result<()> {
    let store = ThemeStore::new(PathBuf::from(&config.preferences.path));
    let theme = match action {
        ThemeCommands::Show => store.load(),
        ThemeCommands::Toggle => store.toggle()?,
    };
    println!("{} {}", theme.icon(), theme.as_str());
    Ok(())
}

fn run_config_command(config: AppConfig, action: ConfigCommands, config_path: &Path) -> Result<()> {
    match action {
        ConfigCommands::Show => {
            let json = serde_json::to_string_pretty(&config)?;
            println!("{}", json);
        }
        ConfigCommands::Generate { output } => {
            AppConfig::default().save(&output)?;
            println!("Generated config at {:?}", output);
        }
        ConfigCommands::Validate => {
            config.validate()?;
            println!("Configuration at {:?} is valid", config_path);
            println!("  Catalog: {}", config.catalog.source);
            println!("  Photos: {}", config.catalog.photo_root);
            println!("  Page size: {}", config.gallery.page_size);
        }
    }

    Ok(())
}

/// Initialize a new gallery directory
fn run_init(dir: Option<PathBuf>, force: bool) -> Result<()> {
    let target = dir.unwrap_or_else(|| PathBuf::from("."));
    let config_path = target.join("config.json");

    if config_path.exists() && !force {
        return Err(GalleryError::Config(
            "config.json already exists. Use --force to overwrite".to_string(),
        ));
    }

    let data_dir = target.join("data");
    let photo_dir = target.join("assets").join("photos");
    std::fs::create_dir_all(&data_dir)?;
    std::fs::create_dir_all(&photo_dir)?;

    let catalog_path = data_dir.join("photos.json");
    if !catalog_path.exists() {
        let sample = vec![Photo::new("example.jpg", "Example", "Replace me with your own photos")
            .with_tags(&["example"])];
        std::fs::write(&catalog_path, serde_json::to_string_pretty(&sample)?)?;
    }

    let mut config = AppConfig::default();
    config.catalog.source = catalog_path.to_string_lossy().to_string();
    config.catalog.photo_root = photo_dir.to_string_lossy().to_string();
    config.preferences.path = target.join("preferences.json").to_string_lossy().to_string();
    config.save(&config_path)?;

    println!("Gallery initialized in {:?}", target);
    println!("\nCreated:");
    println!("  - config.json");
    println!("  - data/photos.json");
    println!("  - assets/photos/");
    println!("\nNext steps:");
    println!("  1. Copy images into assets/photos and describe them in data/photos.json");
    println!("  2. Start the gallery: photofolio serve");

    Ok(())
}

async fn run_serve(mut config: AppConfig, host: Option<String>, port: Option<u16>) -> Result<()> {
    // Apply CLI overrides
    if let Some(host) = host {
        config.web.host = host;
    }
    if let Some(port) = port {
        config.web.port = port;
    }

    info!("Photofolio v1.0.0");
    photofolio::web::start_server(config).await
}
