// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Fixed-size pages over the filtered photo list

use serde::Serialize;
use std::ops::Range;

/// What a pagination button does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "page", rename_all = "lowercase")]
pub enum ButtonKind {
    Prev,
    Page(usize),
    Next,
}

/// One button in the pagination bar
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageButton {
    pub kind: ButtonKind,
    pub label: String,
    /// Page this button leads to
    pub target: usize,
    pub disabled: bool,
    pub active: bool,
}

/// Splits a list into 1-based pages of `page_size`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Paginator {
    page_size: usize,
}

impl Paginator {
    /// `page_size` of 0 is treated as 1
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn total_pages(&self, count: usize) -> usize {
        count.div_ceil(self.page_size)
    }

    /// Keep `page` inside `1..=max(total_pages, 1)`
    pub fn clamp_page(&self, page: usize, count: usize) -> usize {
        page.clamp(1, self.total_pages(count).max(1))
    }

    /// Slice bounds for a page; empty past the end
    pub fn page_range(&self, page: usize, count: usize) -> Range<usize> {
        let start = page.saturating_sub(1).saturating_mul(self.page_size).min(count);
        let end = start.saturating_add(self.page_size).min(count);
        start..end
    }

    /// Page (1-based) that holds the item at `index`
    pub fn page_of(&self, index: usize) -> usize {
        index / self.page_size + 1
    }

    /// Prev, one button per page, Next
    pub fn buttons(&self, current: usize, count: usize) -> Vec<PageButton> {
        let total = self.total_pages(count);
        let mut buttons = Vec::with_capacity(total + 2);

        buttons.push(PageButton {
            kind: ButtonKind::Prev,
            label: "Prev".to_string(),
            target: current.saturating_sub(1).max(1),
            disabled: current <= 1,
            active: false,
        });

        for page in 1..=total {
            buttons.push(PageButton {
                kind: ButtonKind::Page(page),
                label: page.to_string(),
                target: page,
                disabled: false,
                active: page == current,
            });
        }

        buttons.push(PageButton {
            kind: ButtonKind::Next,
            label: "Next".to_string(),
            target: (current + 1).min(total.max(1)),
            disabled: current >= total,
            active: false,
        });

        buttons
    }
}

impl Default for Paginator {
    fn default() -> Self {
        Self::new(6)
    }
}
