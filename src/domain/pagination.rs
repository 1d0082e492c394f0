//! Offset pagination over an ordered result set.
//!
//! Page numbers are 1-indexed everywhere a caller can see them (HTTP query
//! strings, CLI flags, [`Page::page`]). Internally a page is addressed by a
//! 0-indexed `index`, which is what the `OFFSET` computation uses.
//! [`PageRequest::new`] is the only place that translates between the two.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PaginationError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// A validated request for one page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    index: u64,
    size: u64,
}

impl PageRequest {
    /// Builds a request from a 1-indexed page number and a page size.
    ///
    /// # Errors
    ///
    /// Returns [`PaginationError::InvalidArgument`] if `page < 1`,
    /// `per_page < 1`, or the row offset of the page does not fit in an
    /// `i64`. Values are never clamped.
    pub fn new(page: i64, per_page: i64) -> Result<Self, PaginationError> {
        if page < 1 {
            return Err(PaginationError::InvalidArgument(format!(
                "page must be >= 1, got {page}"
            )));
        }
        if per_page < 1 {
            return Err(PaginationError::InvalidArgument(format!(
                "page size must be >= 1, got {per_page}"
            )));
        }

        // page >= 1 was checked above, so page - 1 cannot underflow.
        let index = page.unsigned_abs() - 1;
        let size = per_page.unsigned_abs();

        // SQLite binds OFFSET as a signed 64-bit integer.
        let offset = index.checked_mul(size).filter(|&o| i64::try_from(o).is_ok());
        if offset.is_none() {
            return Err(PaginationError::InvalidArgument(format!(
                "page {page} with page size {per_page} is out of range"
            )));
        }

        Ok(Self { index, size })
    }

    /// 1-indexed page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.index + 1
    }

    /// 0-indexed page number.
    #[must_use]
    pub const fn index(&self) -> u64 {
        self.index
    }

    #[must_use]
    pub const fn size(&self) -> u64 {
        self.size
    }

    /// Number of rows to skip: `index * size`. Always fits in an `i64`.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        self.index * self.size
    }
}

/// Navigation metadata for one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageInfo {
    pub has_next: bool,
    pub has_prev: bool,
    pub page_count: u64,
}

/// Maps `(total, page, page_size)` to navigation metadata. `page` is 1-indexed.
///
/// # Errors
///
/// Returns [`PaginationError::InvalidArgument`] for `page < 1` or `page_size < 1`.
pub fn page_info(total: u64, page: i64, page_size: i64) -> Result<PageInfo, PaginationError> {
    let request = PageRequest::new(page, page_size)?;
    Ok(info_for(total, &request))
}

fn info_for(total: u64, request: &PageRequest) -> PageInfo {
    let end = request.page().saturating_mul(request.size());
    PageInfo {
        has_next: end < total,
        has_prev: request.page() > 1,
        page_count: total.div_ceil(request.size()),
    }
}

/// One page of items plus the metadata needed to navigate around it.
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub per_page: u64,
    pub total: u64,
    pub pages: u64,
    pub has_next: bool,
    pub has_prev: bool,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
}

impl<T> Page<T> {
    #[must_use]
    pub fn new(items: Vec<T>, total: u64, request: &PageRequest) -> Self {
        let info = info_for(total, request);
        let page = request.page();

        Self {
            items,
            page,
            per_page: request.size(),
            total,
            pages: info.page_count,
            has_next: info.has_next,
            has_prev: info.has_prev,
            next_page: info.has_next.then_some(page + 1),
            prev_page: info.has_prev.then(|| page - 1),
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            page: self.page,
            per_page: self.per_page,
            total: self.total,
            pages: self.pages,
            has_next: self.has_next,
            has_prev: self.has_prev,
            next_page: self.next_page,
            prev_page: self.prev_page,
        }
    }
}
