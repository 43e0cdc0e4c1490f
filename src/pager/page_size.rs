//! Validation of user-entered page sizes.

use super::errors::{PagerError, PagerResult};

/// Accepted page size, possibly clamped to the ceiling
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSizeChange {
    /// Page size now in effect
    pub applied: usize,

    /// What the user asked for, when it was over the ceiling
    pub clamped_from: Option<i64>,

    /// Message to show next to the input, if any
    pub message: Option<String>,
}

/// Check a requested page size against `ceiling`.
///
/// Zero and negative sizes are rejected. Sizes above the ceiling are clamped
/// and come back with a message explaining the adjustment.
pub fn validate_page_size(requested: i64, ceiling: usize) -> PagerResult<PageSizeChange> {
    if requested <= 0 {
        return Err(PagerError::InvalidPageSize(
            "Page size must be a positive integer".to_string(),
        ));
    }

    match usize::try_from(requested) {
        Ok(size) if size <= ceiling => Ok(PageSizeChange {
            applied: size,
            clamped_from: None,
            message: None,
        }),
        _ => Ok(PageSizeChange {
            applied: ceiling,
            clamped_from: Some(requested),
            message: Some(format!(
                "Page size cannot exceed {}; showing {} per page",
                ceiling, ceiling
            )),
        }),
    }
}

/// Parse and validate raw text from a page size input
pub fn parse_page_size(input: &str, ceiling: usize) -> PagerResult<PageSizeChange> {
    let requested: i64 = input.trim().parse().map_err(|_| {
        PagerError::InvalidPageSize(format!("'{}' is not a valid page size", input.trim()))
    })?;
    validate_page_size(requested, ceiling)
}
