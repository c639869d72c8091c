//! Shared page bookkeeping between the page decorator and the flowables.
//!
//! `genpdf` does not tell elements which page they are rendered on.  The page decorator runs first
//! on every new page, so it advances a [`PageTracker`] that headings read when they land, which in
//! turn feeds the [`Outline`] used for PDF bookmarks.

use std::cell::RefCell;
use std::rc::Rc;

/// Counts decorated pages.  Clones share the same counter.
#[derive(Clone, Debug, Default)]
pub struct PageTracker {
    pages: Rc<RefCell<Vec<usize>>>,
}

impl PageTracker {
    /// Creates a tracker that has not seen any page yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the next page and returns its 1-based number.
    pub fn advance(&self) -> usize {
        let mut pages = self.pages.borrow_mut();
        let next = pages.last().copied().unwrap_or(0) + 1;
        pages.push(next);
        next
    }

    /// Number of the page currently being rendered, or 0 before the first page.
    pub fn current(&self) -> usize {
        self.pages.borrow().last().copied().unwrap_or(0)
    }

    /// Every page number handed to the decorator, in call order.
    pub fn history(&self) -> Vec<usize> {
        self.pages.borrow().clone()
    }
}

/// A heading recorded at the page where it was rendered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutlineEntry {
    /// Heading text.
    pub title: String,
    /// 1-based page number.
    pub page: usize,
}

/// Collects section headings as they are rendered.  Clones share the same list.
#[derive(Clone, Debug, Default)]
pub struct Outline {
    entries: Rc<RefCell<Vec<OutlineEntry>>>,
}

impl Outline {
    /// Creates an empty outline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `title` on `page`.
    pub fn record(&self, title: impl Into<String>, page: usize) {
        self.entries.borrow_mut().push(OutlineEntry {
            title: title.into(),
            page,
        });
    }

    /// Snapshot of the recorded entries.
    pub fn entries(&self) -> Vec<OutlineEntry> {
        self.entries.borrow().clone()
    }
}
