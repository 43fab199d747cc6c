//! Storage primitives shared by the platform stores
//!
//! The tenancy and org-unit crates define their own storage traits; this
//! module provides the pieces both share: the storage error type with its
//! classification helpers, and the pagination request/result envelopes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Page size applied when a request does not specify one.
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Upper bound a requested page size is clamped to.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Errors surfaced by storage implementations.
///
/// Uniqueness rules live in the store, not in application logic, so
/// services classify failures with [`StoreError::is_conflict`] and
/// [`StoreError::is_not_found`] and map them to their own typed sentinels.
#[derive(Debug, Clone, Error)]
pub enum StoreError {
    /// The addressed row does not exist.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// A uniqueness constraint rejected the write.
    #[error("{entity} violates a uniqueness constraint")]
    Conflict { entity: &'static str },

    /// The backend itself failed.
    #[error("storage backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Builds a not-found error for the given entity tag.
    pub fn not_found(entity: &'static str) -> Self {
        StoreError::NotFound { entity }
    }

    /// Builds a conflict error for the given entity tag.
    pub fn conflict(entity: &'static str) -> Self {
        StoreError::Conflict { entity }
    }

    /// Builds a backend error from any displayable cause.
    pub fn backend(cause: impl Into<String>) -> Self {
        StoreError::Backend(cause.into())
    }

    /// Whether this error reports an absent row.
    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }

    /// Whether this error reports a uniqueness violation.
    pub fn is_conflict(&self) -> bool {
        matches!(self, StoreError::Conflict { .. })
    }
}

/// Result alias for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// A page request as received from the caller.
///
/// Values are taken as-is; call [`PageRequest::normalize`] before querying
/// to apply the platform paging rules (page ≥ 1, default size, size clamp).
///
/// # Examples
///
/// ```
/// use atrium_core::PageRequest;
///
/// let page = PageRequest::new(0, 0).normalize();
/// assert_eq!(page.page, 1);
/// assert_eq!(page.page_size, 20);
///
/// let page = PageRequest::new(3, 1000).normalize();
/// assert_eq!(page.page_size, 100);
/// assert_eq!(page.offset(), 200);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// 1-based page number
    pub page: u32,

    /// Rows per page
    pub page_size: u32,
}

impl PageRequest {
    /// Creates a page request with the given raw values.
    pub fn new(page: u32, page_size: u32) -> Self {
        Self { page, page_size }
    }

    /// Applies the platform paging rules: page floors at 1, a zero size
    /// becomes [`DEFAULT_PAGE_SIZE`], and the size is clamped to
    /// [`MAX_PAGE_SIZE`].
    pub fn normalize(self) -> Self {
        let page = self.page.max(1);
        let page_size = match self.page_size {
            0 => DEFAULT_PAGE_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };
        Self { page, page_size }
    }

    /// Number of rows preceding this page. Assumes a normalized request.
    pub fn offset(&self) -> usize {
        (self.page.saturating_sub(1) as usize) * (self.page_size as usize)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

/// One page of results plus the totals needed to render pagination.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageResult<T> {
    /// Rows on this page
    pub items: Vec<T>,

    /// Total rows matching the query across all pages
    pub total: u64,

    /// 1-based page number this result covers
    pub page: u32,

    /// Rows per page the query used
    pub page_size: u32,

    /// Total number of pages
    pub total_pages: u32,
}

impl<T> PageResult<T> {
    /// Assembles a page result, deriving `total_pages` from the total and
    /// the (normalized) request.
    pub fn new(items: Vec<T>, total: u64, page: PageRequest) -> Self {
        let size = page.page_size.max(1) as u64;
        let total_pages = total.div_ceil(size).min(u32::MAX as u64) as u32;
        Self {
            items,
            total,
            page: page.page,
            page_size: page.page_size,
            total_pages,
        }
    }

    /// Maps the items of this page, keeping the paging envelope.
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> PageResult<U> {
        PageResult {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            page_size: self.page_size,
            total_pages: self.total_pages,
        }
    }
}
