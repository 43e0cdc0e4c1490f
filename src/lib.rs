//! Keyset-paginated bulletin board list client.
//!
//! [`pager`] holds the list cache: forward cursor navigation, per-page
//! caching and incremental reveal. [`source`] is the remote side it pulls
//! pages from, and [`session`] wires both to a configured board.

pub mod config;
pub mod pager;
pub mod session;
pub mod source;

pub use config::Config;
pub use pager::{Intent, ListSnapshot, ListView, Navigation, ViewSignal};
pub use session::AppSession;
pub use source::{HttpPageSource, PageSource, Record};
