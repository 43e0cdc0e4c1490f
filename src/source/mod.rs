//! Remote paged data source
//!
//! The list view never talks HTTP directly. It goes through [`PageSource`],
//! which the REST client implements and tests replace with a scripted
//! in-memory source.

pub mod errors;
pub mod http;
#[cfg(test)]
pub mod memory;
pub mod provider;
pub mod types;

pub use errors::{SourceError, SourceResult};
pub use http::HttpPageSource;
pub use provider::PageSource;
pub use types::{Record, RecordId};
