//! Page source trait

use async_trait::async_trait;

use super::{
    errors::SourceResult,
    types::{Record, RecordId},
};

/// Remote, keyset-paged collection of records.
///
/// Implementations never page by offset: page 1 is fetched directly and every
/// later page is requested relative to the last id of the page before it.
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Total number of items in the collection
    async fn count(&self) -> SourceResult<u64>;

    /// Fetch the first `size` records
    async fn first_page(&self, size: usize) -> SourceResult<Vec<Record>>;

    /// Fetch up to `size` records following `last_id`. An empty result means
    /// there is no further data.
    async fn next_page(&self, last_id: RecordId, size: usize) -> SourceResult<Vec<Record>>;

    /// Source name for logging
    fn name(&self) -> &str;
}
