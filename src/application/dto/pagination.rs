use serde::{Deserialize, Serialize};

/// Page request, 1-based.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(page: u64, page_size: u64) -> Self {
        Self { page, page_size }
    }

    /// Clamps into `1..=max_page_size`; a zero size falls back to the default.
    pub fn normalized(self, default_page_size: u64, max_page_size: u64) -> Self {
        let page_size = if self.page_size == 0 {
            default_page_size
        } else {
            self.page_size
        };
        Self {
            page: self.page.max(1),
            page_size: page_size.clamp(1, max_page_size.max(1)),
        }
    }

    pub fn offset(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.page_size)
    }

    pub fn limit(&self) -> u64 {
        self.page_size
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: u64,
    pub page_size: u64,
    pub total_items: u64,
    pub total_pages: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, request: PageRequest, total_items: u64) -> Self {
        let total_pages = if total_items == 0 || request.page_size == 0 {
            1
        } else {
            total_items.div_ceil(request.page_size)
        };
        Self {
            items,
            page: request.page,
            page_size: request.page_size,
            total_items,
            total_pages,
        }
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_out_of_range_requests() {
        let req = PageRequest::new(0, 500).normalized(20, 100);
        assert_eq!(req.page, 1);
        assert_eq!(req.page_size, 100);
        assert_eq!(req.offset(), 0);

        let req = PageRequest::new(3, 0).normalized(20, 100);
        assert_eq!(req.page_size, 20);
        assert_eq!(req.offset(), 40);
    }

    #[test]
    fn offset_saturates_on_huge_pages() {
        let req = PageRequest::new(u64::MAX, 10).normalized(20, 100);
        assert_eq!(req.page, u64::MAX);
        assert_eq!(req.offset(), u64::MAX);
    }

    #[test]
    fn computes_total_pages() {
        let req = PageRequest::new(1, 10);
        assert_eq!(Page::<u8>::new(vec![], req, 0).total_pages, 1);
        assert_eq!(Page::<u8>::new(vec![], req, 10).total_pages, 1);
        let page = Page::<u8>::new(vec![], req, 11);
        assert_eq!(page.total_pages, 2);
        assert!(page.has_next());
    }
}
