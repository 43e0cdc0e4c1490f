//! Incremental reveal of an already loaded page.
//!
//! All records of the current page are in memory; this only decides how many
//! of them are rendered. Scroll events are buffered and evaluated once per
//! loop tick, so a burst of events in one tick grows the visible window by at
//! most one chunk.

/// Scroll position of the list viewport, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMetrics {
    pub scroll_top: f64,
    pub viewport_height: f64,
    pub content_height: f64,
}

impl ViewportMetrics {
    pub fn new(scroll_top: f64, viewport_height: f64, content_height: f64) -> Self {
        Self {
            scroll_top,
            viewport_height,
            content_height,
        }
    }

    /// Metrics for a viewport scrolled all the way down
    pub fn at_bottom(content_height: f64, viewport_height: f64) -> Self {
        Self::new((content_height - viewport_height).max(0.0), viewport_height, content_height)
    }

    pub fn distance_to_bottom(&self) -> f64 {
        self.content_height - (self.scroll_top + self.viewport_height)
    }

    pub fn is_near_bottom(&self, threshold: f64) -> bool {
        self.distance_to_bottom() <= threshold
    }
}

/// Reveal tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealSettings {
    /// Rows added per step
    pub chunk_size: usize,

    /// Hard limit of rendered rows per page
    pub cap: usize,

    /// Distance from the bottom that triggers a step
    pub threshold: f64,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            chunk_size: 50,
            cap: 500,
            threshold: 100.0,
        }
    }
}

#[derive(Debug)]
pub struct RevealController {
    settings: RevealSettings,
    visible: usize,
    limit: usize,
    pending: Option<ViewportMetrics>,
}

impl RevealController {
    pub fn new(settings: RevealSettings) -> Self {
        Self {
            settings,
            visible: 0,
            limit: 0,
            pending: None,
        }
    }

    /// Start over for a newly shown page
    pub fn reset(&mut self, page_size: usize, record_count: usize) {
        self.limit = self.settings.cap.min(page_size).min(record_count);
        self.visible = self.settings.chunk_size.min(self.limit);
        self.pending = None;
    }

    /// Buffer the latest scroll position; evaluated on the next [`tick`](Self::tick)
    pub fn on_scroll(&mut self, metrics: ViewportMetrics) {
        self.pending = Some(metrics);
    }

    /// Apply buffered scroll input. Returns true if more rows became visible.
    pub fn tick(&mut self) -> bool {
        let Some(metrics) = self.pending.take() else {
            return false;
        };

        if self.visible >= self.limit || !metrics.is_near_bottom(self.settings.threshold) {
            return false;
        }

        let next = self.visible.saturating_add(self.settings.chunk_size).min(self.limit);
        if next == self.visible {
            return false;
        }
        self.visible = next;
        true
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    /// Most rows this page will ever show
    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn is_fully_revealed(&self) -> bool {
        self.visible >= self.limit
    }

    pub fn has_pending_scroll(&self) -> bool {
        self.pending.is_some()
    }

    pub fn settings(&self) -> RevealSettings {
        self.settings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn controller(chunk_size: usize, cap: usize) -> RevealController {
        RevealController::new(RevealSettings {
            chunk_size,
            cap,
            threshold: 100.0,
        })
    }

    fn bottom() -> ViewportMetrics {
        ViewportMetrics::at_bottom(5000.0, 800.0)
    }

    #[test]
    fn test_near_bottom() {
        assert!(ViewportMetrics::new(4150.0, 800.0, 5000.0).is_near_bottom(100.0));
        assert!(!ViewportMetrics::new(3000.0, 800.0, 5000.0).is_near_bottom(100.0));
        assert!(ViewportMetrics::at_bottom(300.0, 800.0).is_near_bottom(0.0));
    }

    #[test]
    fn test_reset_takes_smallest_bound() {
        let mut reveal = controller(50, 500);

        reveal.reset(100, 1000);
        assert_eq!(reveal.limit(), 100);
        assert_eq!(reveal.visible_count(), 50);

        reveal.reset(1000, 30);
        assert_eq!(reveal.limit(), 30);
        assert_eq!(reveal.visible_count(), 30);
        assert!(reveal.is_fully_revealed());
    }

    #[test]
    fn test_empty_page() {
        let mut reveal = controller(50, 500);
        reveal.reset(100, 0);
        assert_eq!(reveal.visible_count(), 0);

        reveal.on_scroll(bottom());
        assert!(!reveal.tick());
        assert_eq!(reveal.visible_count(), 0);
    }

    #[test]
    fn test_scroll_grows_until_cap() {
        let mut reveal = controller(50, 120);
        reveal.reset(1000, 1000);

        let mut steps = Vec::new();
        for _ in 0..5 {
            reveal.on_scroll(bottom());
            reveal.tick();
            steps.push(reveal.visible_count());
        }
        assert_eq!(steps, vec![100, 120, 120, 120, 120]);
    }

    #[test]
    fn test_scroll_far_from_bottom_does_nothing() {
        let mut reveal = controller(50, 500);
        reveal.reset(1000, 1000);

        reveal.on_scroll(ViewportMetrics::new(0.0, 800.0, 5000.0));
        assert!(!reveal.tick());
        assert_eq!(reveal.visible_count(), 50);
    }

    #[test]
    fn test_burst_coalesces_to_one_step() {
        let mut reveal = controller(50, 500);
        reveal.reset(1000, 1000);

        for _ in 0..20 {
            reveal.on_scroll(bottom());
        }
        assert!(reveal.tick());
        assert_eq!(reveal.visible_count(), 100);

        // Nothing buffered since the last tick
        assert!(!reveal.tick());
        assert_eq!(reveal.visible_count(), 100);
    }

    #[test]
    fn test_last_metrics_in_tick_win() {
        let mut reveal = controller(50, 500);
        reveal.reset(1000, 1000);

        reveal.on_scroll(bottom());
        reveal.on_scroll(ViewportMetrics::new(0.0, 800.0, 5000.0));
        assert!(!reveal.tick());
        assert_eq!(reveal.visible_count(), 50);
    }

    #[test]
    fn test_reset_drops_pending_scroll() {
        let mut reveal = controller(50, 500);
        reveal.reset(1000, 1000);
        reveal.on_scroll(bottom());
        reveal.reset(1000, 1000);

        assert!(!reveal.has_pending_scroll());
        assert!(!reveal.tick());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(200))]

        #[test]
        fn visible_count_never_exceeds_bound(
            chunk in 1usize..=200,
            cap in 1usize..=1000,
            page_size in 1usize..=1000,
            records in 0usize..=1500,
            scrolls in proptest::collection::vec((0.0f64..6000.0, any::<bool>()), 0..60),
        ) {
            let mut reveal = controller(chunk, cap);
            reveal.reset(page_size, records);

            let bound = cap.min(page_size).min(records);
            prop_assert_eq!(reveal.visible_count(), chunk.min(bound));

            for (scroll_top, tick) in scrolls {
                reveal.on_scroll(ViewportMetrics::new(scroll_top, 800.0, 6000.0));
                if tick {
                    reveal.tick();
                }
                prop_assert!(reveal.visible_count() <= bound);
            }
        }
    }
}
