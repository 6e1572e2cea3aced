// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Full-screen single photo viewer
//!
//! The lightbox holds an index into the *filtered* list. Stepping is linear
//! and stops at either end; there is no wraparound.

use serde::Serialize;

use crate::catalog::Photo;
use crate::datetime::{format_date_time, UNKNOWN};
use crate::{GalleryError, Result};

/// Keys the viewer reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxKey {
    ArrowLeft,
    ArrowRight,
    Escape,
    Other,
}

impl LightboxKey {
    /// Map a DOM-style key name (`"ArrowLeft"`, `"Escape"`, ...)
    pub fn from_name(name: &str) -> Self {
        match name {
            "ArrowLeft" => LightboxKey::ArrowLeft,
            "ArrowRight" => LightboxKey::ArrowRight,
            "Escape" | "Esc" => LightboxKey::Escape,
            _ => LightboxKey::Other,
        }
    }
}

/// Where a click landed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The dimmed area around the photo
    Backdrop,
    CloseButton,
    NextButton,
    PrevButton,
    /// The photo or caption itself
    Content,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightboxEvent {
    Key(LightboxKey),
    Click(ClickTarget),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Lightbox {
    index: Option<usize>,
}

impl Lightbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.index.is_some()
    }

    pub fn index(&self) -> Option<usize> {
        self.index
    }

    /// Show the photo at `index` of a list of `len`
    pub fn open(&mut self, index: usize, len: usize) -> Result<()> {
        if index >= len {
            return Err(GalleryError::OutOfRange { index, len });
        }
        self.index = Some(index);
        Ok(())
    }

    pub fn close(&mut self) {
        self.index = None;
    }

    /// Step forward; returns whether the photo changed
    pub fn next(&mut self, len: usize) -> bool {
        match self.index {
            Some(i) if i + 1 < len => {
                self.index = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    /// Step back; returns whether the photo changed
    pub fn prev(&mut self) -> bool {
        match self.index {
            Some(i) if i > 0 => {
                self.index = Some(i - 1);
                true
            }
            _ => false,
        }
    }

    /// Apply a UI event. Everything is ignored while closed.
    pub fn handle(&mut self, event: LightboxEvent, len: usize) {
        if !self.is_open() {
            return;
        }
        match event {
            LightboxEvent::Key(LightboxKey::ArrowRight) | LightboxEvent::Click(ClickTarget::NextButton) => {
                self.next(len);
            }
            LightboxEvent::Key(LightboxKey::ArrowLeft) | LightboxEvent::Click(ClickTarget::PrevButton) => {
                self.prev();
            }
            LightboxEvent::Key(LightboxKey::Escape)
            | LightboxEvent::Click(ClickTarget::Backdrop)
            | LightboxEvent::Click(ClickTarget::CloseButton) => self.close(),
            LightboxEvent::Key(LightboxKey::Other) | LightboxEvent::Click(ClickTarget::Content) => {}
        }
    }
}

/// `📍 location • 📅 date • 📷 device`
pub fn meta_line(photo: &Photo) -> String {
    format!(
        "📍 {} • 📅 {} • 📷 {}",
        photo.location.as_deref().unwrap_or(UNKNOWN),
        format_date_time(photo.date_taken.as_deref()),
        photo.device.as_deref().unwrap_or(UNKNOWN),
    )
}

/// Everything the viewer displays for one photo
#[derive(Debug, Clone, Serialize)]
pub struct LightboxView {
    pub index: usize,
    pub total: usize,
    pub filename: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub date: String,
    pub device: String,
    pub tags: String,
    pub meta: String,
    pub image_url: String,
    pub orientation: Option<&'static str>,
    pub has_prev: bool,
    pub has_next: bool,
}

impl LightboxView {
    pub fn new(photo: &Photo, index: usize, total: usize, image_url: String) -> Self {
        let tags = if photo.tags().is_empty() {
            "None".to_string()
        } else {
            photo.tags().join(", ")
        };

        Self {
            index,
            total,
            filename: photo.filename.clone(),
            title: photo.title.clone(),
            description: photo.description.clone(),
            location: photo.location.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            date: format_date_time(photo.date_taken.as_deref()),
            device: photo.device.clone().unwrap_or_else(|| UNKNOWN.to_string()),
            tags,
            meta: meta_line(photo),
            image_url,
            orientation: photo.orientation.map(|o| o.as_str()),
            has_prev: index > 0,
            has_next: index + 1 < total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_out_of_range() {
        let mut lightbox = Lightbox::new();
        assert!(matches!(lightbox.open(3, 3), Err(GalleryError::OutOfRange { index: 3, len: 3 })));
        assert!(!lightbox.is_open());
    }

    #[test]
    fn test_next_on_last_is_noop() {
        let mut lightbox = Lightbox::new();
        lightbox.open(4, 5).unwrap();
        assert!(!lightbox.next(5));
        lightbox.handle(LightboxEvent::Key(LightboxKey::ArrowRight), 5);
        assert_eq!(lightbox.index(), Some(4));
    }

    #[test]
    fn test_prev_on_first_is_noop() {
        let mut lightbox = Lightbox::new();
        lightbox.open(0, 5).unwrap();
        lightbox.handle(LightboxEvent::Click(ClickTarget::PrevButton), 5);
        assert_eq!(lightbox.index(), Some(0));
    }

    #[test]
    fn test_keys_navigate_and_escape_closes() {
        let mut lightbox = Lightbox::new();
        lightbox.open(1, 5).unwrap();
        lightbox.handle(LightboxEvent::Key(LightboxKey::from_name("ArrowRight")), 5);
        lightbox.handle(LightboxEvent::Key(LightboxKey::from_name("ArrowRight")), 5);
        assert_eq!(lightbox.index(), Some(3));
        lightbox.handle(LightboxEvent::Key(LightboxKey::from_name("ArrowLeft")), 5);
        assert_eq!(lightbox.index(), Some(2));
        lightbox.handle(LightboxEvent::Key(LightboxKey::from_name("a")), 5);
        assert_eq!(lightbox.index(), Some(2));
        lightbox.handle(LightboxEvent::Key(LightboxKey::from_name("Escape")), 5);
        assert!(!lightbox.is_open());
    }

    #[test]
    fn test_clicks() {
        let mut lightbox = Lightbox::new();
        lightbox.open(2, 5).unwrap();
        lightbox.handle(LightboxEvent::Click(ClickTarget::Content), 5);
        assert!(lightbox.is_open());
        lightbox.handle(LightboxEvent::Click(ClickTarget::Backdrop), 5);
        assert!(!lightbox.is_open());

        lightbox.open(2, 5).unwrap();
        lightbox.handle(LightboxEvent::Click(ClickTarget::CloseButton), 5);
        assert!(!lightbox.is_open());
    }

    #[test]
    fn test_keys_ignored_while_closed() {
        let mut lightbox = Lightbox::new();
        lightbox.handle(LightboxEvent::Key(LightboxKey::ArrowRight), 5);
        assert_eq!(lightbox.index(), None);
    }

    #[test]
    fn test_view_placeholders() {
        let photo = Photo::new("a.jpg", "A", "desc");
        let view = LightboxView::new(&photo, 0, 1, "/assets/photos/a.jpg".to_string());
        assert_eq!(view.tags, "None");
        assert_eq!(view.location, "Unknown");
        assert_eq!(view.meta, "📍 Unknown • 📅 Unknown • 📷 Unknown");
        assert!(!view.has_prev);
        assert!(!view.has_next);
    }

    #[test]
    fn test_view_with_metadata() {
        let mut photo = Photo::new("a.jpg", "A", "desc").with_tags(&["sea", "boats"]);
        photo.location = Some("Whitby".to_string());
        photo.date_taken = Some("2023:03:05 14:30:00".to_string());
        photo.device = Some("Canon EOS R5".to_string());

        let view = LightboxView::new(&photo, 1, 3, "/x".to_string());
        assert_eq!(view.tags, "sea, boats");
        assert_eq!(view.date, "5 Mar 2023, 2:30 pm");
        assert_eq!(view.meta, "📍 Whitby • 📅 5 Mar 2023, 2:30 pm • 📷 Canon EOS R5");
        assert!(view.has_prev && view.has_next);
    }
}
