// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Sentinel over-fetch paging.
//!
//! A page of `n` items is read by asking storage for `n + 1` rows. If the
//! extra row comes back there is at least one more page and the extra row
//! is dropped. No count query is ever issued.

use crate::error::CoreError;
use num_traits::ToPrimitive;

/// The page size used when none is configured.
pub const DEFAULT_PAGE_SIZE: usize = 25;

/// A validated, non-zero page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageSize(usize);

impl PageSize {
    /// Creates a page size.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::InvalidPageSize` for zero.
    pub const fn new(size: usize) -> Result<Self, CoreError> {
        if size == 0 {
            return Err(CoreError::InvalidPageSize(size));
        }
        Ok(Self(size))
    }

    #[must_use]
    pub const fn get(&self) -> usize {
        self.0
    }

    /// Number of rows to request from storage: one more than the page holds.
    #[must_use]
    pub const fn fetch_size(&self) -> usize {
        self.0.saturating_add(1)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self(DEFAULT_PAGE_SIZE)
    }
}

/// One page of results in storage order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    items: Vec<T>,
    has_more: bool,
}

impl<T> Page<T> {
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Whether at least one further row exists past this page.
    #[must_use]
    pub const fn has_more(&self) -> bool {
        self.has_more
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Offset of the following page, or `None` on the last page.
    #[must_use]
    pub fn next_offset(&self, current: u64) -> Option<u64> {
        if !self.has_more {
            return None;
        }
        let returned: u64 = self.items.len().to_u64().unwrap_or(u64::MAX);
        Some(current.saturating_add(returned))
    }

    #[must_use]
    pub fn into_parts(self) -> (Vec<T>, bool) {
        (self.items, self.has_more)
    }
}

/// Trims an over-fetched result set to one page.
///
/// `rows` should have been fetched with [`PageSize::fetch_size`]. When more
/// than `page_size` rows are present the surplus is dropped and the page is
/// marked as having more; otherwise every row is kept.
#[must_use]
pub fn paginate<T>(mut rows: Vec<T>, page_size: PageSize) -> Page<T> {
    let has_more: bool = rows.len() > page_size.get();
    rows.truncate(page_size.get());
    Page {
        items: rows,
        has_more,
    }
}
