//! Page boundary bookkeeping: which pages are loaded and where each one ends.

use std::collections::HashMap;

use crate::source::{Record, RecordId};

/// Records fetched for one page index
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// 1-based page index
    pub index: usize,

    /// Records in server order
    pub records: Vec<Record>,
}

impl Page {
    /// Id of the last record, used to request the following page
    pub fn cursor(&self) -> Option<RecordId> {
        self.records.last().map(|r| r.id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Cache of fetched pages plus the keyset cursor for each of them.
///
/// A cursor exists for page `i` exactly when page `i` is cached and non-empty.
/// Pages are never evicted; the whole tracker is cleared when the page size
/// changes.
#[derive(Debug, Default)]
pub struct PageBoundaryTracker {
    pages: HashMap<usize, Page>,
    cursors: HashMap<usize, RecordId>,
}

impl PageBoundaryTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a freshly fetched page, replacing any earlier entry for `index`
    pub fn record(&mut self, index: usize, records: Vec<Record>) {
        let page = Page { index, records };
        match page.cursor() {
            Some(cursor) => {
                self.cursors.insert(index, cursor);
            }
            None => {
                self.cursors.remove(&index);
            }
        }
        self.pages.insert(index, page);
    }

    pub fn is_cached(&self, index: usize) -> bool {
        self.pages.contains_key(&index)
    }

    pub fn cursor(&self, index: usize) -> Option<RecordId> {
        self.cursors.get(&index).copied()
    }

    pub fn page(&self, index: usize) -> Option<&Page> {
        self.pages.get(&index)
    }

    /// Number of cached pages
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn cursor_count(&self) -> usize {
        self.cursors.len()
    }

    pub fn clear(&mut self) {
        self.pages.clear();
        self.cursors.clear();
    }

    #[cfg(test)]
    pub(crate) fn forget(&mut self, index: usize) {
        self.pages.remove(&index);
        self.cursors.remove(&index);
    }
}
