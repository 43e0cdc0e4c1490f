//! Scripted in-memory source for tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    errors::{SourceError, SourceResult},
    provider::PageSource,
    types::{Record, RecordId},
};

/// A request the source received, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Count,
    First { size: usize },
    Next { last_id: RecordId, size: usize },
}

/// Serves records in descending id order, newest first, like the board does.
#[derive(Debug)]
pub struct MemorySource {
    records: Mutex<Vec<Record>>,
    total_override: Option<u64>,
    calls: Mutex<Vec<Call>>,
    fail_count: Mutex<bool>,
    fail_pages: Mutex<bool>,
}

impl MemorySource {
    /// Records with ids `total..=1`
    pub fn descending(total: i64) -> Self {
        let records = (1..=total)
            .rev()
            .map(|id| Record::new(id, format!("post {}", id)))
            .collect();
        Self::with_records(records)
    }

    /// Records with ids `1..=total`
    pub fn ascending(total: i64) -> Self {
        let records = (1..=total)
            .map(|id| Record::new(id, format!("post {}", id)))
            .collect();
        Self::with_records(records)
    }

    pub fn with_records(records: Vec<Record>) -> Self {
        Self {
            records: Mutex::new(records),
            total_override: None,
            calls: Mutex::new(Vec::new()),
            fail_count: Mutex::new(false),
            fail_pages: Mutex::new(false),
        }
    }

    /// Report a count that disagrees with the data actually served
    pub fn with_reported_total(mut self, total: u64) -> Self {
        self.total_override = Some(total);
        self
    }

    /// Publish `count` new posts ahead of the existing ones
    pub fn publish_newer(&self, count: i64) {
        let mut records = self.records.lock().unwrap();
        let newest = records.iter().map(|r| r.id).max().unwrap_or(0);
        let fresh: Vec<Record> = (newest + 1..=newest + count)
            .rev()
            .map(|id| Record::new(id, format!("post {}", id)))
            .collect();
        records.splice(0..0, fresh);
    }

    pub fn set_fail_count(&self, fail: bool) {
        *self.fail_count.lock().unwrap() = fail;
    }

    pub fn set_fail_pages(&self, fail: bool) {
        *self.fail_pages.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap().clear();
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn unavailable() -> SourceError {
        SourceError::Api {
            status: 503,
            message: "service unavailable".to_string(),
        }
    }
}

#[async_trait]
impl PageSource for MemorySource {
    async fn count(&self) -> SourceResult<u64> {
        self.record(Call::Count);
        if *self.fail_count.lock().unwrap() {
            return Err(Self::unavailable());
        }
        Ok(self
            .total_override
            .unwrap_or(self.records.lock().unwrap().len() as u64))
    }

    async fn first_page(&self, size: usize) -> SourceResult<Vec<Record>> {
        self.record(Call::First { size });
        if *self.fail_pages.lock().unwrap() {
            return Err(Self::unavailable());
        }
        Ok(self.records.lock().unwrap().iter().take(size).cloned().collect())
    }

    async fn next_page(&self, last_id: RecordId, size: usize) -> SourceResult<Vec<Record>> {
        self.record(Call::Next { last_id, size });
        if *self.fail_pages.lock().unwrap() {
            return Err(Self::unavailable());
        }
        let records = self.records.lock().unwrap();
        let start = match records.iter().position(|r| r.id == last_id) {
            Some(pos) => pos + 1,
            None => return Ok(Vec::new()),
        };
        Ok(records.iter().skip(start).take(size).cloned().collect())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
