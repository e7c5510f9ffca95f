//! Common types used across the system

use serde::{Deserialize, Serialize};

/// Pagination parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub page: u32,
    pub per_page: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 50,
        }
    }
}

impl Pagination {
    /// Row offset for the current page
    pub fn offset(&self) -> i64 {
        (self.page.saturating_sub(1) as i64) * self.per_page as i64
    }

    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Paginated response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub per_page: u32,
    pub total_items: u64,
    pub total_pages: u32,
}

impl PaginationMeta {
    pub fn new(pagination: &Pagination, total_items: u64) -> Self {
        let per_page = pagination.per_page.max(1);
        let total_pages = ((total_items + per_page as u64 - 1) / per_page as u64) as u32;
        Self {
            page: pagination.page,
            per_page: pagination.per_page,
            total_items,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_based() {
        let p = Pagination { page: 1, per_page: 50 };
        assert_eq!(p.offset(), 0);
        let p = Pagination { page: 3, per_page: 20 };
        assert_eq!(p.offset(), 40);
    }

    #[test]
    fn total_pages_rounds_up() {
        let p = Pagination { page: 1, per_page: 10 };
        assert_eq!(PaginationMeta::new(&p, 0).total_pages, 0);
        assert_eq!(PaginationMeta::new(&p, 10).total_pages, 1);
        assert_eq!(PaginationMeta::new(&p, 11).total_pages, 2);
    }
}
