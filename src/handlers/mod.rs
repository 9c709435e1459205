use serde::{Deserialize, Serialize};

pub mod admins;
pub mod auth;
pub mod content;
pub mod leagues;
pub mod notifications;
pub mod players;
pub mod reels;
pub mod roles;
pub mod subscribers;
pub mod teams;
pub mod user_auth;
pub mod users;

/// Page/per_page query parameters with the console's defaults
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct PageParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_per_page")]
    pub per_page: i64,
}

fn default_page() -> i64 {
    1
}

fn default_per_page() -> i64 {
    10
}

impl PageParams {
    pub fn limit(&self) -> i64 {
        self.per_page.max(1)
    }

    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }
}

impl Default for PageParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

/// Pagination block echoed alongside paginated listings
#[derive(Debug, Serialize)]
pub struct Pagination {
    pub total: i64,
    pub pages: i64,
    pub page: i64,
    pub per_page: i64,
    pub has_next: bool,
    pub has_prev: bool,
}

impl Pagination {
    pub fn new(total: i64, params: PageParams) -> Self {
        let per_page = params.limit();
        let page = params.page.max(1);
        let pages = if total == 0 { 0 } else { (total + per_page - 1) / per_page };

        Self {
            total,
            pages,
            page,
            per_page,
            has_next: page < pages,
            has_prev: page > 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination_arithmetic() {
        let params = PageParams { page: 2, per_page: 10 };
        let pagination = Pagination::new(25, params);

        assert_eq!(pagination.pages, 3);
        assert!(pagination.has_next);
        assert!(pagination.has_prev);
    }

    #[test]
    fn test_pagination_empty() {
        let pagination = Pagination::new(0, PageParams::default());

        assert_eq!(pagination.pages, 0);
        assert!(!pagination.has_next);
        assert!(!pagination.has_prev);
    }

    #[test]
    fn test_offset_clamps_bad_input() {
        let params = PageParams { page: 0, per_page: 0 };
        assert_eq!(params.limit(), 1);
        assert_eq!(params.offset(), 0);
    }
}
