use rocket::FromForm;
use serde::{Deserialize, Serialize};

/// Query parameters for walking an ordered log: start at sequence number
/// `since` and return at most `page_size` entries.
#[derive(Debug, Clone, Copy, Default, FromForm)]
pub struct PaginationRequest {
    since: Option<u64>,
    page_size: Option<usize>,
}

impl PaginationRequest {
    pub fn new(since: u64, page_size: usize) -> Self {
        Self {
            since: Some(since),
            page_size: Some(page_size),
        }
    }

    pub fn since(&self) -> u64 {
        self.since.unwrap_or(0)
    }

    /// The requested page size, defaulting to and capped at `max`, never zero.
    pub fn page_size(&self, max: usize) -> usize {
        self.page_size.unwrap_or(max).clamp(1, max.max(1))
    }

    /// Wrap one page of items taken from a log of `total` entries.
    pub fn to_paginated<T>(self, max: usize, total: usize, items: Vec<T>) -> Paginated<T> {
        let since = self.since();
        let end = since.saturating_add(items.len() as u64);
        Paginated {
            since,
            page_size: self.page_size(max),
            total,
            next: (end < total as u64).then_some(end),
            items,
        }
    }
}

/// One page of an ordered log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paginated<T> {
    pub since: u64,
    pub page_size: usize,
    pub total: usize,
    /// Where the next page starts, if there is one.
    pub next: Option<u64>,
    pub items: Vec<T>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_size_is_clamped() {
        assert_eq!(PaginationRequest::default().page_size(50), 50);
        assert_eq!(PaginationRequest::new(0, 0).page_size(50), 1);
        assert_eq!(PaginationRequest::new(0, 500).page_size(50), 50);
        assert_eq!(PaginationRequest::new(0, 7).page_size(50), 7);
    }

    #[test]
    fn next_points_past_the_page() {
        let page = PaginationRequest::new(2, 2).to_paginated(50, 5, vec!['c', 'd']);
        assert_eq!(page.next, Some(4));

        let last = PaginationRequest::new(4, 2).to_paginated(50, 5, vec!['e']);
        assert_eq!(last.next, None);
    }
}
