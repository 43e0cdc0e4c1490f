//! Page transitions over a keyset-paged source.
//!
//! The navigator is the only thing that moves the current page. It serves
//! pages it has already seen from the tracker and fetches forward one page at
//! a time with the cursor of the page being left. Jumps of more than one page
//! are not possible with a forward cursor and are refused.
//!
//! Fetching is split in two halves so an event loop can run the request
//! elsewhere and feed the result back: [`Navigator::begin_go_to`] hands out a
//! [`FetchTicket`], [`fetch_page`] runs it, and [`Navigator::complete`]
//! applies the result. Tickets issued before a page size change, or for a page
//! that is no longer the next one, are discarded on completion.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::{
    errors::{PagerError, PagerResult},
    page_size::{validate_page_size, PageSizeChange},
    reveal::{RevealController, RevealSettings, ViewportMetrics},
    tracker::{Page, PageBoundaryTracker},
};
use crate::config::Config;
use crate::source::{PageSource, Record, RecordId, SourceResult};

/// Navigator tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PagerSettings {
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub reveal: RevealSettings,
}

impl PagerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_page_size: config.default_page_size,
            max_page_size: config.max_page_size,
            reveal: RevealSettings {
                chunk_size: config.reveal_chunk_size,
                cap: config.reveal_cap,
                threshold: config.scroll_threshold,
            },
        }
    }
}

impl Default for PagerSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

/// State of one list view activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationState {
    pub page_size: usize,
    pub current_page: usize,
    /// `None` until a count request has succeeded
    pub total_items: Option<u64>,
}

impl PaginationState {
    pub fn total_pages(&self) -> Option<usize> {
        self.total_items
            .map(|total| (total as usize).div_ceil(self.page_size))
    }
}

/// Why a navigation request was ignored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Refusal {
    /// Target lies outside `1..=total_pages`
    OutOfRange,
    /// Target is more than one page away
    NonAdjacent,
    /// Previous page is not in the cache
    NotCached,
    /// Current page has no cursor to continue from
    NoCursor,
}

/// Outcome of a navigation request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Current page changed; the UI should scroll to the top
    Moved { page: usize, from_cache: bool },
    /// Target was the current page
    Unchanged,
    Refused(Refusal),
    /// Next page came back empty; stays on the current page
    EndOfData,
    /// Result arrived for a request that no longer matches the state
    Stale,
}

impl Navigation {
    pub fn moved(&self) -> bool {
        matches!(self, Navigation::Moved { .. })
    }
}

/// Which page to ask the source for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    First,
    After(RecordId),
}

/// An outstanding page fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchTicket {
    pub generation: u64,
    pub target_page: usize,
    pub page_size: usize,
    pub request: PageRequest,
}

/// First half of a navigation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Done(Navigation),
    Fetch(FetchTicket),
}

/// Run a ticket against the source
pub async fn fetch_page(source: &dyn PageSource, ticket: &FetchTicket) -> SourceResult<Vec<Record>> {
    match ticket.request {
        PageRequest::First => source.first_page(ticket.page_size).await,
        PageRequest::After(cursor) => source.next_page(cursor, ticket.page_size).await,
    }
}

pub struct Navigator {
    source: Arc<dyn PageSource>,
    settings: PagerSettings,
    state: PaginationState,
    tracker: PageBoundaryTracker,
    reveal: RevealController,
    generation: u64,
}

impl Navigator {
    pub fn new(source: Arc<dyn PageSource>, settings: PagerSettings) -> Self {
        let max_page_size = settings.max_page_size.max(1);
        let page_size = settings.default_page_size.clamp(1, max_page_size);

        Self {
            source,
            settings,
            state: PaginationState {
                page_size,
                current_page: 1,
                total_items: None,
            },
            tracker: PageBoundaryTracker::new(),
            reveal: RevealController::new(settings.reveal),
            generation: 0,
        }
    }

    pub fn state(&self) -> PaginationState {
        self.state
    }

    pub fn settings(&self) -> PagerSettings {
        self.settings
    }

    pub fn tracker(&self) -> &PageBoundaryTracker {
        &self.tracker
    }

    pub fn reveal(&self) -> &RevealController {
        &self.reveal
    }

    pub fn source(&self) -> Arc<dyn PageSource> {
        Arc::clone(&self.source)
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn current_page(&self) -> Option<&Page> {
        self.tracker.page(self.state.current_page)
    }

    pub fn total_pages(&self) -> Option<usize> {
        self.state.total_pages()
    }

    /// Fetch the total item count. Failures keep the previous total.
    pub async fn request_count(&mut self) -> PagerResult<u64> {
        let result = self.source.count().await;
        self.apply_count(result)
    }

    pub fn apply_count(&mut self, result: SourceResult<u64>) -> PagerResult<u64> {
        match result {
            Ok(total) => {
                self.state.total_items = Some(total);
                info!(
                    "List has {} items over {:?} pages",
                    total,
                    self.state.total_pages()
                );
                Ok(total)
            }
            Err(e) => {
                warn!("Failed to fetch item count from {}: {}", self.source.name(), e);
                Err(PagerError::Fetch(e))
            }
        }
    }

    /// Ticket for page 1
    pub fn first_page_ticket(&self) -> FetchTicket {
        FetchTicket {
            generation: self.generation,
            target_page: 1,
            page_size: self.state.page_size,
            request: PageRequest::First,
        }
    }

    /// Fetch page 1 and show it. A successful load drops every other cached
    /// page, since their cursors were derived from the previous page 1.
    pub async fn load_first(&mut self) -> PagerResult<Navigation> {
        let ticket = self.first_page_ticket();
        let result = fetch_page(self.source.as_ref(), &ticket).await;
        self.complete(ticket, result)
    }

    /// Navigate to `target`, fetching if needed
    pub async fn go_to(&mut self, target: usize) -> PagerResult<Navigation> {
        match self.begin_go_to(target) {
            Step::Done(navigation) => Ok(navigation),
            Step::Fetch(ticket) => {
                let result = fetch_page(self.source.as_ref(), &ticket).await;
                self.complete(ticket, result)
            }
        }
    }

    /// Resolve a navigation from the cache, or describe the fetch it needs
    pub fn begin_go_to(&mut self, target: usize) -> Step {
        let current = self.state.current_page;

        if target == current {
            return Step::Done(Navigation::Unchanged);
        }

        let out_of_range = match self.state.total_pages() {
            Some(total_pages) if total_pages > 0 => target < 1 || target > total_pages,
            _ => target < 1,
        };
        if out_of_range {
            debug!("Refusing navigation to page {}: out of range", target);
            return Step::Done(Navigation::Refused(Refusal::OutOfRange));
        }

        if current.checked_sub(1) == Some(target) {
            if !self.tracker.is_cached(target) {
                debug!("Refusing navigation to page {}: not cached", target);
                return Step::Done(Navigation::Refused(Refusal::NotCached));
            }
            return Step::Done(self.show_cached(target));
        }

        if target == current + 1 {
            if self.tracker.is_cached(target) {
                return Step::Done(self.show_cached(target));
            }

            return match self.tracker.cursor(current) {
                Some(cursor) => Step::Fetch(FetchTicket {
                    generation: self.generation,
                    target_page: target,
                    page_size: self.state.page_size,
                    request: PageRequest::After(cursor),
                }),
                None => {
                    debug!("Refusing navigation to page {}: no cursor for page {}", target, current);
                    Step::Done(Navigation::Refused(Refusal::NoCursor))
                }
            };
        }

        debug!("Refusing navigation from page {} to {}: not adjacent", current, target);
        Step::Done(Navigation::Refused(Refusal::NonAdjacent))
    }

    /// Apply the result of a ticket
    pub fn complete(
        &mut self,
        ticket: FetchTicket,
        result: SourceResult<Vec<Record>>,
    ) -> PagerResult<Navigation> {
        if ticket.generation != self.generation || ticket.page_size != self.state.page_size {
            debug!(
                "Discarding page {} response from generation {} (now {})",
                ticket.target_page, ticket.generation, self.generation
            );
            return Ok(Navigation::Stale);
        }

        if let PageRequest::After(cursor) = ticket.request {
            let Some(from) = ticket.target_page.checked_sub(1) else {
                debug!("Discarding response for page 0");
                return Ok(Navigation::Stale);
            };
            if self.state.current_page != from || self.tracker.cursor(from) != Some(cursor) {
                debug!("Discarding page {} response: no longer the next page", ticket.target_page);
                return Ok(Navigation::Stale);
            }
        }

        let records = match result {
            Ok(records) => records,
            Err(e) => {
                warn!("Failed to fetch page {}: {}", ticket.target_page, e);
                return Err(PagerError::Fetch(e));
            }
        };

        match ticket.request {
            PageRequest::After(_) if records.is_empty() => {
                info!("No records after page {}", ticket.target_page.saturating_sub(1));
                return Ok(Navigation::EndOfData);
            }
            PageRequest::After(_) => {}
            PageRequest::First => {
                // Later pages were chained off the old page 1
                self.generation += 1;
                self.tracker.clear();
            }
        }

        debug!("Fetched {} records for page {}", records.len(), ticket.target_page);
        self.tracker.record(ticket.target_page, records);
        Ok(self.show(ticket.target_page, false))
    }

    /// Validate and adopt a new page size, dropping every cached page.
    ///
    /// Does not fetch; see [`apply_page_size`](Self::apply_page_size).
    pub fn reset_page_size(&mut self, requested: i64) -> PagerResult<PageSizeChange> {
        let change = validate_page_size(requested, self.settings.max_page_size)?;

        self.generation += 1;
        self.tracker.clear();
        self.state.page_size = change.applied;
        self.state.current_page = 1;
        self.reveal.reset(change.applied, 0);

        info!(
            "Page size set to {} ({:?} pages)",
            change.applied,
            self.state.total_pages()
        );
        Ok(change)
    }

    /// Adopt a new page size and reload page 1.
    ///
    /// A failed reload is logged and leaves an empty page 1; the caller may
    /// retry with [`load_first`](Self::load_first).
    pub async fn apply_page_size(&mut self, requested: i64) -> PagerResult<PageSizeChange> {
        let change = self.reset_page_size(requested)?;
        if let Err(e) = self.load_first().await {
            debug!("Reload after page size change failed: {}", e);
        }
        Ok(change)
    }

    pub fn on_scroll(&mut self, metrics: ViewportMetrics) {
        self.reveal.on_scroll(metrics);
    }

    /// Evaluate buffered scroll input; true if more rows became visible
    pub fn tick(&mut self) -> bool {
        self.reveal.tick()
    }

    pub fn visible_count(&self) -> usize {
        self.reveal.visible_count()
    }

    /// Records currently rendered
    pub fn visible_records(&self) -> &[Record] {
        match self.current_page() {
            Some(page) => &page.records[..self.reveal.visible_count().min(page.len())],
            None => &[],
        }
    }

    /// Whether a "next" control should be enabled
    pub fn can_go_next(&self) -> bool {
        if !self.reveal.is_fully_revealed() {
            return false;
        }
        match self.state.total_pages() {
            Some(total_pages) if total_pages > 0 => self.state.current_page < total_pages,
            _ => self.tracker.cursor(self.state.current_page).is_some(),
        }
    }

    pub fn can_go_previous(&self) -> bool {
        self.state.current_page > 1 && self.tracker.is_cached(self.state.current_page - 1)
    }

    /// Descending global row label for display index `index` of the current page
    pub fn row_number(&self, index: usize) -> Option<i64> {
        let total = i64::try_from(self.state.total_items?).ok()?;
        let page_size = i64::try_from(self.state.page_size).ok()?;
        let index = i64::try_from(index).ok()?;
        let before = (self.state.current_page as i64 - 1) * page_size;
        Some(total - before - index)
    }

    fn show_cached(&mut self, target: usize) -> Navigation {
        debug!("Serving page {} from cache", target);
        self.show(target, true)
    }

    fn show(&mut self, target: usize, from_cache: bool) -> Navigation {
        let (index, record_count) = self
            .tracker
            .page(target)
            .map(|page| (page.index, page.len()))
            .unwrap_or((target, 0));
        let from = self.state.current_page;
        self.state.current_page = index;
        self.reveal.reset(self.state.page_size, record_count);

        info!("Showing page {} (was {}, {} records)", index, from, record_count);
        Navigation::Moved {
            page: target,
            from_cache,
        }
    }
}
