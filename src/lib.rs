// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Photofolio: searchable photo gallery
//!
//! Loads a photo catalog, enriches each entry with EXIF data read from the
//! image itself, and presents it as a paginated, searchable grid with a
//! lightbox viewer, from the terminal or through the web UI.

pub mod catalog;
pub mod config;
pub mod datetime;
pub mod error;
pub mod filter;
pub mod gallery;
pub mod lightbox;
pub mod metadata;
pub mod pagination;
pub mod theme;
pub mod watcher;
pub mod web;

pub use config::AppConfig;
pub use error::{GalleryError, Result};
