//! Error types for the list pager

use thiserror::Error;

use crate::source::SourceError;

#[derive(Error, Debug)]
pub enum PagerError {
    #[error("Failed to fetch page data: {0}")]
    Fetch(#[from] SourceError),

    #[error("{0}")]
    InvalidPageSize(String),
}

pub type PagerResult<T> = Result<T, PagerError>;
