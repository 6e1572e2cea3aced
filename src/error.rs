// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for Photofolio

use thiserror::Error;

/// Result type alias for Photofolio operations
pub type Result<T> = std::result::Result<T, GalleryError>;

/// Photofolio error types
#[derive(Error, Debug)]
pub enum GalleryError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Metadata error: {0}")]
    Metadata(String),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    #[error("Photo index {index} out of range (gallery holds {len})")]
    OutOfRange { index: usize, len: usize },
}
