//! Shared query types
//!
//! Pagination and language-selection types used across all content resources.

use serde::{Deserialize, Serialize};

/// Content language selector for bilingual fields.
///
/// Every content entity stores paired `*_en` / `*_fr` columns; routes that
/// look up by slug or search by text take a `lang` query parameter to pick
/// which column to match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lang {
    /// English (default)
    #[default]
    En,
    /// French
    Fr,
}

impl Lang {
    /// Short language code as stored in query strings
    pub fn as_str(&self) -> &'static str {
        match self {
            Lang::En => "en",
            Lang::Fr => "fr",
        }
    }
}

impl std::fmt::Display for Lang {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Pagination parameters for list queries
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListParams {
    /// Page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 10,
        }
    }
}

impl ListParams {
    /// Create new pagination parameters, clamping to sane bounds
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 100),
        }
    }

    /// Calculate the offset for database queries
    pub fn offset(&self) -> i64 {
        ((self.page.saturating_sub(1)) * self.per_page) as i64
    }

    /// Get the limit for database queries
    pub fn limit(&self) -> i64 {
        self.per_page as i64
    }
}

/// Paginated result container
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PagedResult<T> {
    /// Items in the current page
    pub items: Vec<T>,
    /// Total number of items across all pages
    pub total: i64,
    /// Current page number (1-indexed)
    pub page: u32,
    /// Number of items per page
    pub per_page: u32,
}

impl<T> PagedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, total: i64, params: &ListParams) -> Self {
        Self {
            items,
            total,
            page: params.page,
            per_page: params.per_page,
        }
    }

    /// Calculate the total number of pages
    pub fn total_pages(&self) -> u32 {
        if self.per_page == 0 {
            return 0;
        }
        ((self.total as u32) + self.per_page - 1) / self.per_page
    }

    /// Check if there is a next page
    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }

    /// Check if there is a previous page
    pub fn has_prev(&self) -> bool {
        self.page > 1
    }

    /// Check if the result is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of items in the current page
    pub fn len(&self) -> usize {
        self.items.len()
    }
}

impl<T> Default for PagedResult<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total: 0,
            page: 1,
            per_page: 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_clamping() {
        let params = ListParams::new(0, 0);
        assert_eq!(params.page, 1);
        assert_eq!(params.per_page, 1);

        let params = ListParams::new(3, 500);
        assert_eq!(params.page, 3);
        assert_eq!(params.per_page, 100);
    }

    #[test]
    fn test_list_params_offset() {
        assert_eq!(ListParams::new(1, 10).offset(), 0);
        assert_eq!(ListParams::new(2, 10).offset(), 10);
        assert_eq!(ListParams::new(5, 20).offset(), 80);
    }

    #[test]
    fn test_paged_result_total_pages() {
        let params = ListParams::new(1, 10);
        let result: PagedResult<i32> = PagedResult::new(vec![], 25, &params);
        assert_eq!(result.total_pages(), 3);

        let result: PagedResult<i32> = PagedResult::new(vec![], 30, &params);
        assert_eq!(result.total_pages(), 3);

        let result: PagedResult<i32> = PagedResult::new(vec![], 0, &params);
        assert_eq!(result.total_pages(), 0);
    }

    #[test]
    fn test_paged_result_navigation() {
        let params = ListParams::new(2, 10);
        let result: PagedResult<i32> = PagedResult::new(vec![], 25, &params);
        assert!(result.has_next());
        assert!(result.has_prev());

        let params = ListParams::new(3, 10);
        let result: PagedResult<i32> = PagedResult::new(vec![], 25, &params);
        assert!(!result.has_next());
    }

    #[test]
    fn test_lang_default_and_display() {
        assert_eq!(Lang::default(), Lang::En);
        assert_eq!(Lang::Fr.to_string(), "fr");
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(20))]

        #[test]
        fn pagination_offset_never_negative(page in 0u32..1000, per_page in 0u32..200) {
            let params = ListParams::new(page, per_page);
            prop_assert!(params.offset() >= 0);
        }

        #[test]
        fn pagination_pages_cover_total(total in 0i64..10_000, per_page in 1u32..100) {
            let params = ListParams::new(1, per_page);
            let result: PagedResult<i32> = PagedResult::new(vec![], total, &params);
            let pages = result.total_pages() as i64;
            prop_assert!(pages * params.per_page as i64 >= total);
            if total > 0 {
                prop_assert!((pages - 1) * (params.per_page as i64) < total);
            }
        }
    }
}
