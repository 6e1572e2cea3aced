// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Case-insensitive search over title, description and tags

use crate::catalog::Photo;

/// Does the photo contain `term`? `term` must already be lowercase.
pub fn matches(photo: &Photo, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    photo.title.to_lowercase().contains(term)
        || photo.description.to_lowercase().contains(term)
        || photo.tags().iter().any(|tag| tag.to_lowercase().contains(term))
}

/// Indices of matching photos, in catalog order. An empty term matches all.
pub fn filter_photos(photos: &[Photo], term: &str) -> Vec<usize> {
    let term = term.to_lowercase();
    photos
        .iter()
        .enumerate()
        .filter(|(_, photo)| matches(photo, &term))
        .map(|(i, _)| i)
        .collect()
}
