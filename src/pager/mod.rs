//! Keyset-paginated list cache with incremental reveal.
//!
//! Pages are fetched forward with the id of the last record of the previous
//! page, kept for the lifetime of the view, and revealed to the viewport a
//! chunk at a time as the user scrolls.

pub mod errors;
pub mod navigator;
pub mod page_size;
pub mod reveal;
pub mod tracker;
pub mod view;

pub use errors::{PagerError, PagerResult};
pub use navigator::{
    fetch_page, FetchTicket, Navigation, Navigator, PageRequest, PagerSettings, PaginationState,
    Refusal, Step,
};
pub use page_size::{parse_page_size, validate_page_size, PageSizeChange};
pub use reveal::{RevealController, RevealSettings, ViewportMetrics};
pub use tracker::{Page, PageBoundaryTracker};
pub use view::{Intent, ListSnapshot, ListView, Row, ViewSignal};
