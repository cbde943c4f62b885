// src/common/pagination.rs

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

pub const DEFAULT_PAGE_SIZE: i64 = 20;
pub const MAX_PAGE_SIZE: i64 = 100;

/// `?page=0&size=20` (página começa em zero)
#[derive(Debug, Clone, Copy, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageRequest {
    pub page: Option<i64>,
    pub size: Option<i64>,
}

impl PageRequest {
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(0).max(0)
    }

    pub fn size(&self) -> i64 {
        self.size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE)
    }

    pub fn offset(&self) -> i64 {
        self.page().saturating_mul(self.size())
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub page: i64,
    pub size: i64,
    pub total_elements: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(request: &PageRequest, total_elements: i64) -> Self {
        let size = request.size();
        Self {
            page: request.page(),
            size,
            total_elements,
            total_pages: (total_elements + size - 1) / size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None, 0, 20, 0)]
    #[case(Some(2), Some(10), 2, 10, 20)]
    #[case(Some(-3), Some(0), 0, 1, 0)]
    #[case(Some(1), Some(500), 1, 100, 100)]
    fn clamps_page_and_size(
        #[case] page: Option<i64>,
        #[case] size: Option<i64>,
        #[case] expected_page: i64,
        #[case] expected_size: i64,
        #[case] expected_offset: i64,
    ) {
        let request = PageRequest { page, size };

        assert_eq!(request.page(), expected_page);
        assert_eq!(request.size(), expected_size);
        assert_eq!(request.offset(), expected_offset);
    }

    #[rstest]
    #[case(0, 0)]
    #[case(20, 1)]
    #[case(21, 2)]
    fn counts_total_pages(#[case] total: i64, #[case] pages: i64) {
        let request = PageRequest { page: None, size: Some(20) };
        assert_eq!(PageInfo::new(&request, total).total_pages, pages);
    }
}
