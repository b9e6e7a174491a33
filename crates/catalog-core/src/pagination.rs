//! Pagination types for list operations.
//!
//! Pages are 1-indexed to match the public query parameters.

use serde::{Deserialize, Serialize};

/// A request for a page of results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// The page number (1-indexed).
    pub page: u32,
    /// The number of items per page.
    pub size: u32,
}

impl PageRequest {
    /// The default page size.
    pub const DEFAULT_SIZE: u32 = 10;
    /// The maximum allowed page size.
    pub const MAX_SIZE: u32 = 100;

    /// Creates a new page request.
    ///
    /// Bounds are not enforced here; callers validate the raw parameters
    /// and report out-of-range values instead of clamping them.
    #[must_use]
    pub const fn new(page: u32, size: u32) -> Self {
        Self { page, size }
    }

    /// Creates a page request for the first page with default size.
    #[must_use]
    pub const fn first() -> Self {
        Self::new(1, Self::DEFAULT_SIZE)
    }

    /// Returns the offset for database queries.
    #[must_use]
    pub const fn offset(&self) -> u64 {
        (self.page.saturating_sub(1) as u64) * self.size as u64
    }

    /// Returns the limit for database queries.
    #[must_use]
    pub const fn limit(&self) -> u64 {
        self.size as u64
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first()
    }
}

/// Number of pages needed for `count` items, never less than one.
#[must_use]
pub const fn total_pages(count: u64, size: u32) -> u64 {
    if size == 0 || count == 0 {
        return 1;
    }
    count.div_ceil(size as u64)
}

/// A page of results together with the size of the whole filtered set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    /// The items on this page.
    pub content: Vec<T>,
    /// The page that was requested.
    pub request: PageRequest,
    /// The total number of items across all pages.
    pub count: u64,
}

impl<T> Page<T> {
    /// Creates a new page.
    #[must_use]
    pub fn new(content: Vec<T>, request: PageRequest, count: u64) -> Self {
        Self {
            content,
            request,
            count,
        }
    }

    /// Creates an empty page.
    #[must_use]
    pub fn empty(request: PageRequest) -> Self {
        Self::new(Vec::new(), request, 0)
    }

    /// Maps the page content to a different type.
    #[must_use]
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            request: self.request,
            count: self.count,
        }
    }

    /// Returns true if the page is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Returns the number of items on this page.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns the total number of pages.
    #[must_use]
    pub const fn total_pages(&self) -> u64 {
        total_pages(self.count, self.request.size)
    }

    /// Returns true if the requested page lies beyond the last page.
    #[must_use]
    pub const fn is_out_of_range(&self) -> bool {
        self.request.page as u64 > self.total_pages()
    }
}

impl<T> IntoIterator for Page<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.content.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request() {
        let req = PageRequest::new(3, 10);
        assert_eq!(req.offset(), 20);
        assert_eq!(req.limit(), 10);
    }

    #[test]
    fn test_page_request_first() {
        let req = PageRequest::first();
        assert_eq!(req.page, 1);
        assert_eq!(req.size, PageRequest::DEFAULT_SIZE);
        assert_eq!(req.offset(), 0);
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(11, 5), 3);
    }

    #[test]
    fn test_page_out_of_range() {
        let page: Page<i32> = Page::new(vec![], PageRequest::new(3, 10), 15);
        assert_eq!(page.total_pages(), 2);
        assert!(page.is_out_of_range());

        let page: Page<i32> = Page::empty(PageRequest::first());
        assert!(!page.is_out_of_range());
    }

    #[test]
    fn test_page_map() {
        let page = Page::new(vec![1, 2, 3], PageRequest::first(), 3);
        let mapped = page.map(|x| x * 2);
        assert_eq!(mapped.content, vec![2, 4, 6]);
        assert_eq!(mapped.count, 3);
    }

    #[test]
    fn test_page_len() {
        let page = Page::new(vec![1, 2, 3], PageRequest::first(), 30);
        assert!(!page.is_empty());
        assert_eq!(page.len(), 3);
        assert_eq!(page.total_pages(), 3);
    }
}
