// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Gallery state: search term, filtered list, current page and lightbox

use std::sync::Arc;

use crate::catalog::Photo;
use crate::filter::filter_photos;
use crate::lightbox::{Lightbox, LightboxEvent};
use crate::pagination::{PageButton, Paginator};
use crate::Result;

#[derive(Debug, Clone)]
pub struct GalleryState {
    photos: Arc<Vec<Photo>>,
    /// Indices into `photos`, catalog order
    filtered: Vec<usize>,
    search_term: String,
    current_page: usize,
    paginator: Paginator,
    lightbox: Lightbox,
}

impl GalleryState {
    pub fn new(photos: Arc<Vec<Photo>>, page_size: usize) -> Self {
        let filtered = (0..photos.len()).collect();
        Self {
            photos,
            filtered,
            search_term: String::new(),
            current_page: 1,
            paginator: Paginator::new(page_size),
            lightbox: Lightbox::new(),
        }
    }

    /// Re-filter on a new term. Resets to page 1 and closes the lightbox.
    pub fn search(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.filtered = filter_photos(&self.photos, term);
        self.current_page = 1;
        self.lightbox.close();
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn photos(&self) -> &[Photo] {
        &self.photos
    }

    /// Number of photos matching the current search
    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    /// The filtered list, in catalog order
    pub fn filtered_photos(&self) -> impl Iterator<Item = &Photo> + '_ {
        self.filtered.iter().map(move |&i| &self.photos[i])
    }

    /// Photo at a position of the filtered list
    pub fn filtered_photo(&self, index: usize) -> Option<&Photo> {
        self.filtered.get(index).map(|&i| &self.photos[i])
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        self.paginator.total_pages(self.filtered.len())
    }

    pub fn paginator(&self) -> &Paginator {
        &self.paginator
    }

    /// Jump to a page, clamped to the pages that exist
    pub fn set_page(&mut self, page: usize) {
        self.current_page = self.paginator.clamp_page(page, self.filtered.len());
    }

    pub fn next_page(&mut self) {
        self.set_page(self.current_page + 1);
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.current_page.saturating_sub(1));
    }

    /// Photos on the current page with their filtered index
    pub fn page_photos(&self) -> Vec<(usize, &Photo)> {
        self.paginator
            .page_range(self.current_page, self.filtered.len())
            .map(|i| (i, &self.photos[self.filtered[i]]))
            .collect()
    }

    pub fn pagination(&self) -> Vec<PageButton> {
        self.paginator.buttons(self.current_page, self.filtered.len())
    }

    /// Open the viewer on a filtered index
    pub fn open_lightbox(&mut self, index: usize) -> Result<()> {
        self.lightbox.open(index, self.filtered.len())
    }

    pub fn handle_lightbox_event(&mut self, event: LightboxEvent) {
        self.lightbox.handle(event, self.filtered.len());
    }

    pub fn lightbox(&self) -> &Lightbox {
        &self.lightbox
    }

    /// Photo on display, if the viewer is open
    pub fn lightbox_photo(&self) -> Option<(usize, &Photo)> {
        let index = self.lightbox.index()?;
        self.filtered_photo(index).map(|photo| (index, photo))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lightbox::{ClickTarget, LightboxKey};

    fn gallery(n: usize) -> GalleryState {
        let photos = (0..n)
            .map(|i| {
                let tag = if i % 5 == 0 { "five" } else { "other" };
                Photo::new(&format!("{}.jpg", i), &format!("Photo {}", i), "").with_tags(&[tag])
            })
            .collect();
        GalleryState::new(Arc::new(photos), 6)
    }

    fn titles(state: &GalleryState) -> Vec<String> {
        state.filtered_photos().map(|p| p.title.clone()).collect()
    }

    #[test]
    fn test_clearing_search_restores_original_order() {
        let mut state = gallery(13);
        let before = titles(&state);
        state.search("five");
        assert_eq!(state.filtered_len(), 3);
        state.search("");
        assert_eq!(titles(&state), before);
    }

    #[test]
    fn test_search_resets_page() {
        let mut state = gallery(13);
        state.set_page(3);
        assert_eq!(state.current_page(), 3);
        state.search("photo");
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_paging() {
        let mut state = gallery(13);
        assert_eq!(state.total_pages(), 3);
        assert_eq!(state.pagination().len(), 5);

        state.next_page();
        let page: Vec<usize> = state.page_photos().iter().map(|(i, _)| *i).collect();
        assert_eq!(page, vec![6, 7, 8, 9, 10, 11]);

        state.next_page();
        state.next_page();
        assert_eq!(state.current_page(), 3);
        assert_eq!(state.page_photos().len(), 1);

        state.set_page(1);
        state.prev_page();
        assert_eq!(state.current_page(), 1);
    }

    #[test]
    fn test_lightbox_indexes_filtered_list() {
        let mut state = gallery(13);
        state.search("five");
        state.open_lightbox(1).unwrap();
        assert_eq!(state.lightbox_photo().unwrap().1.title, "Photo 5");

        state.handle_lightbox_event(LightboxEvent::Key(LightboxKey::ArrowRight));
        assert_eq!(state.lightbox_photo().unwrap().1.title, "Photo 10");

        // last filtered photo: next does nothing
        state.handle_lightbox_event(LightboxEvent::Click(ClickTarget::NextButton));
        assert_eq!(state.lightbox_photo().unwrap().1.title, "Photo 10");

        assert!(state.open_lightbox(3).is_err());
    }

    #[test]
    fn test_search_closes_lightbox() {
        let mut state = gallery(4);
        state.open_lightbox(2).unwrap();
        state.search("photo 1");
        assert!(state.lightbox_photo().is_none());
    }
}
