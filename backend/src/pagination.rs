//! Page-number pagination for list endpoints.
//!
//! Lists answer with the `{count, next, previous, results}` envelope. Links
//! keep every other query parameter of the incoming request.

use axum::http::Uri;
use maintdesk_shared::Page;

/// Default page size if not specified
pub const DEFAULT_PAGE_SIZE: u32 = 25;
/// Maximum allowed page size
pub const MAX_PAGE_SIZE: u32 = 1000;
/// Default page number (1-indexed for API consumers)
pub const DEFAULT_PAGE: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationParams {
    pub page: u32,
    pub page_size: u32,
}

impl PaginationParams {
    pub fn new(page: Option<u32>, page_size: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(DEFAULT_PAGE).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    pub fn offset(&self) -> usize {
        (self.page as usize - 1) * self.page_size as usize
    }

    pub fn limit(&self) -> usize {
        self.page_size as usize
    }
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// Slice `items` down to the requested page and build the envelope.
pub fn paginate<T>(items: Vec<T>, params: PaginationParams, uri: &Uri) -> Page<T> {
    let count = items.len();
    let results: Vec<T> = items
        .into_iter()
        .skip(params.offset())
        .take(params.limit())
        .collect();
    let has_next = params.offset() + params.limit() < count;
    let has_prev = params.page > 1;
    Page {
        count: count as u64,
        next: has_next.then(|| page_link(uri, params.page + 1)),
        previous: has_prev.then(|| page_link(uri, params.page - 1)),
        results,
    }
}

/// `uri` with its `page` parameter replaced.
pub fn page_link(uri: &Uri, page: u32) -> String {
    let mut pairs: Vec<String> = uri
        .query()
        .unwrap_or("")
        .split('&')
        .filter(|pair| !pair.is_empty() && pair.split('=').next() != Some("page"))
        .map(str::to_string)
        .collect();
    pairs.push(format!("page={page}"));
    format!("{}?{}", uri.path(), pairs.join("&"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_clamped() {
        let params = PaginationParams::new(Some(0), Some(5000));
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, MAX_PAGE_SIZE);
        assert_eq!(PaginationParams::default().page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn test_paginate_middle_page() {
        let uri: Uri = "/api/tickets/?status=open&page=2&page_size=3".parse().unwrap();
        let page = paginate((1..=10).collect(), PaginationParams::new(Some(2), Some(3)), &uri);
        assert_eq!(page.count, 10);
        assert_eq!(page.results, vec![4, 5, 6]);
        assert_eq!(page.next.as_deref(), Some("/api/tickets/?status=open&page_size=3&page=3"));
        assert_eq!(page.previous.as_deref(), Some("/api/tickets/?status=open&page_size=3&page=1"));
    }

    #[test]
    fn test_last_page_has_no_next() {
        let uri: Uri = "/api/users/".parse().unwrap();
        let page = paginate(vec!["a", "b"], PaginationParams::default(), &uri);
        assert_eq!(page.next, None);
        assert_eq!(page.previous, None);
        assert_eq!(page.results.len(), 2);
    }
}
