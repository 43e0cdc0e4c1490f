//! UI-facing list view.
//!
//! The UI never mutates pager state directly. It sends an [`Intent`], gets
//! back the [`ViewSignal`]s it has to act on, and redraws from a
//! [`ListSnapshot`].

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info};

use super::{
    errors::PagerResult,
    navigator::{Navigation, Navigator, PagerSettings},
    page_size::PageSizeChange,
    reveal::ViewportMetrics,
};
use crate::source::{PageSource, Record};

/// Something the user asked the list to do
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intent {
    GoTo(usize),
    Next,
    Previous,
    ApplyPageSize(i64),
    Scroll(ViewportMetrics),
    /// Next turn of the event loop
    Tick,
    Reload,
}

/// Side effects the UI layer has to perform
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewSignal {
    ScrollToTop,
    Render,
    /// Message to show the user, e.g. a page size validation hint
    Notice(String),
}

/// One rendered row
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row {
    /// Descending global ordinal, blank while the total is unknown
    pub number: Option<i64>,
    pub record: Record,
}

/// Everything needed to draw the list
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ListSnapshot {
    pub page: usize,
    pub page_size: usize,
    pub total_items: Option<u64>,
    pub total_pages: Option<usize>,
    pub rows: Vec<Row>,
    pub loaded_count: usize,
    pub can_go_next: bool,
    pub can_go_previous: bool,
}

/// A list view activation. Dropping it discards all pagination state.
pub struct ListView {
    navigator: Navigator,
}

impl ListView {
    pub fn new(source: Arc<dyn PageSource>, settings: PagerSettings) -> Self {
        Self {
            navigator: Navigator::new(source, settings),
        }
    }

    /// Create a view and run the activation requests: count, then page 1.
    ///
    /// Failures are logged and leave the view usable; an unknown total shows
    /// as a blank count and `Reload` retries page 1.
    pub async fn activate(source: Arc<dyn PageSource>, settings: PagerSettings) -> Self {
        let mut view = Self::new(source, settings);
        info!("Activating list view (page size {})", view.navigator.state().page_size);

        let _ = view.navigator.request_count().await;
        let _ = view.navigator.load_first().await;
        view
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub async fn go_to(&mut self, page: usize) -> PagerResult<Navigation> {
        self.navigator.go_to(page).await
    }

    pub async fn apply_page_size(&mut self, size: i64) -> PagerResult<PageSizeChange> {
        self.navigator.apply_page_size(size).await
    }

    pub fn on_scroll(&mut self, metrics: ViewportMetrics) {
        self.navigator.on_scroll(metrics);
    }

    pub fn tick(&mut self) -> bool {
        self.navigator.tick()
    }

    pub fn can_go_next(&self) -> bool {
        self.navigator.can_go_next()
    }

    pub fn row_number(&self, index: usize) -> Option<i64> {
        self.navigator.row_number(index)
    }

    /// Handle one intent and report what the UI should do about it
    pub async fn dispatch(&mut self, intent: Intent) -> Vec<ViewSignal> {
        debug!("Dispatching {:?}", intent);
        let current = self.navigator.state().current_page;

        match intent {
            Intent::GoTo(page) => Self::navigation_signals(self.navigator.go_to(page).await),
            Intent::Next => Self::navigation_signals(self.navigator.go_to(current + 1).await),
            Intent::Previous => match current.checked_sub(1) {
                Some(page) => Self::navigation_signals(self.navigator.go_to(page).await),
                None => Vec::new(),
            },
            Intent::Reload => Self::navigation_signals(self.navigator.load_first().await),
            Intent::ApplyPageSize(size) => match self.navigator.apply_page_size(size).await {
                Ok(change) => {
                    let mut signals = vec![ViewSignal::ScrollToTop, ViewSignal::Render];
                    if let Some(message) = change.message {
                        signals.push(ViewSignal::Notice(message));
                    }
                    signals
                }
                Err(e) => vec![ViewSignal::Notice(e.to_string())],
            },
            Intent::Scroll(metrics) => {
                self.navigator.on_scroll(metrics);
                Vec::new()
            }
            Intent::Tick => {
                if self.navigator.tick() {
                    vec![ViewSignal::Render]
                } else {
                    Vec::new()
                }
            }
        }
    }

    fn navigation_signals(result: PagerResult<Navigation>) -> Vec<ViewSignal> {
        match result {
            Ok(Navigation::Moved { .. }) => vec![ViewSignal::ScrollToTop, ViewSignal::Render],
            Ok(_) => Vec::new(),
            // Already logged by the navigator
            Err(_) => Vec::new(),
        }
    }

    pub fn snapshot(&self) -> ListSnapshot {
        let state = self.navigator.state();
        let rows = self
            .navigator
            .visible_records()
            .iter()
            .enumerate()
            .map(|(index, record)| Row {
                number: self.navigator.row_number(index),
                record: record.clone(),
            })
            .collect();

        ListSnapshot {
            page: state.current_page,
            page_size: state.page_size,
            total_items: state.total_items,
            total_pages: state.total_pages(),
            rows,
            loaded_count: self.navigator.current_page().map(|p| p.len()).unwrap_or(0),
            can_go_next: self.navigator.can_go_next(),
            can_go_previous: self.navigator.can_go_previous(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pager::reveal::RevealSettings;
    use crate::source::memory::{Call, MemorySource};

    fn settings() -> PagerSettings {
        PagerSettings {
            default_page_size: 10,
            max_page_size: 100,
            reveal: RevealSettings {
                chunk_size: 4,
                cap: 8,
                threshold: 50.0,
            },
        }
    }

    async fn view(source: &Arc<MemorySource>) -> ListView {
        let source: Arc<dyn PageSource> = source.clone();
        ListView::activate(source, settings()).await
    }

    fn bottom() -> ViewportMetrics {
        ViewportMetrics::at_bottom(2000.0, 600.0)
    }

    #[tokio::test]
    async fn test_activation_requests_count_then_first_page() {
        let source = Arc::new(MemorySource::descending(25));
        let view = view(&source).await;

        assert_eq!(source.calls(), vec![Call::Count, Call::First { size: 10 }]);

        let snapshot = view.snapshot();
        assert_eq!(snapshot.page, 1);
        assert_eq!(snapshot.total_items, Some(25));
        assert_eq!(snapshot.total_pages, Some(3));
        assert_eq!(snapshot.loaded_count, 10);
        assert_eq!(snapshot.rows.len(), 4);
        assert_eq!(snapshot.rows[0].number, Some(25));
        assert_eq!(snapshot.rows[3].number, Some(22));
        assert!(!snapshot.can_go_next);
        assert!(!snapshot.can_go_previous);
    }

    #[tokio::test]
    async fn test_activation_survives_failures() {
        let source = Arc::new(MemorySource::descending(25));
        source.set_fail_count(true);
        source.set_fail_pages(true);
        let mut view = view(&source).await;

        let snapshot = view.snapshot();
        assert_eq!(snapshot.total_items, None);
        assert!(snapshot.rows.is_empty());

        source.set_fail_pages(false);
        let signals = view.dispatch(Intent::Reload).await;
        assert_eq!(signals, vec![ViewSignal::ScrollToTop, ViewSignal::Render]);
        assert_eq!(view.snapshot().rows[0].number, None);
        assert_eq!(view.snapshot().rows[0].record.id, 25);
    }

    #[tokio::test]
    async fn test_scroll_then_tick_reveals_and_enables_next() {
        let source = Arc::new(MemorySource::descending(25));
        let mut view = view(&source).await;

        for _ in 0..10 {
            assert!(view.dispatch(Intent::Scroll(bottom())).await.is_empty());
        }
        assert_eq!(view.dispatch(Intent::Tick).await, vec![ViewSignal::Render]);
        assert_eq!(view.snapshot().rows.len(), 8);
        assert!(view.can_go_next());

        // Reveal cap reached
        view.dispatch(Intent::Scroll(bottom())).await;
        assert!(view.dispatch(Intent::Tick).await.is_empty());
    }

    #[tokio::test]
    async fn test_next_and_previous() {
        let source = Arc::new(MemorySource::descending(25));
        let mut view = view(&source).await;

        let signals = view.dispatch(Intent::Next).await;
        assert_eq!(signals, vec![ViewSignal::ScrollToTop, ViewSignal::Render]);
        let snapshot = view.snapshot();
        assert_eq!(snapshot.page, 2);
        assert_eq!(snapshot.rows[0].number, Some(15));
        assert_eq!(snapshot.rows[0].record.id, 15);
        assert!(snapshot.can_go_previous);

        view.dispatch(Intent::Previous).await;
        assert_eq!(view.snapshot().page, 1);

        // Nothing before page 1
        assert!(view.dispatch(Intent::Previous).await.is_empty());
        assert_eq!(view.snapshot().page, 1);
    }

    #[tokio::test]
    async fn test_refused_jump_is_silent() {
        let source = Arc::new(MemorySource::descending(50));
        let mut view = view(&source).await;

        assert!(view.dispatch(Intent::GoTo(4)).await.is_empty());
        assert_eq!(view.snapshot().page, 1);
    }

    #[tokio::test]
    async fn test_page_size_notice() {
        let source = Arc::new(MemorySource::descending(250));
        let mut view = view(&source).await;

        let signals = view.dispatch(Intent::ApplyPageSize(500)).await;
        assert_eq!(signals[..2], [ViewSignal::ScrollToTop, ViewSignal::Render]);
        assert!(matches!(signals.get(2), Some(ViewSignal::Notice(_))));
        assert_eq!(view.snapshot().page_size, 100);
        assert_eq!(view.snapshot().total_pages, Some(3));

        let signals = view.dispatch(Intent::ApplyPageSize(-1)).await;
        assert!(matches!(signals.as_slice(), [ViewSignal::Notice(_)]));
        assert_eq!(view.snapshot().page_size, 100);
    }

    #[tokio::test]
    async fn test_snapshot_serializes() {
        let source = Arc::new(MemorySource::descending(3));
        let view = view(&source).await;

        let json = serde_json::to_value(view.snapshot()).unwrap();
        assert_eq!(json["page"], 1);
        assert_eq!(json["rows"][0]["number"], 3);
        assert_eq!(json["rows"][0]["record"]["title"], "post 3");
    }
}
