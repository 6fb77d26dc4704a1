//! Shared API response types
//!
//! Common envelope pieces used across resource endpoints: the plain
//! success/message response and the pagination metadata block that list
//! endpoints flatten into their payloads.

use serde::Serialize;

use crate::models::PagedResult;

/// Simple `{success, message}` response
#[derive(Debug, Serialize)]
pub struct StatusMessage {
    pub success: bool,
    pub message: String,
}

impl StatusMessage {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
        }
    }
}

/// Pagination metadata flattened into list responses
#[derive(Debug, Serialize)]
pub struct ListMeta {
    pub success: bool,
    /// Number of items in this page
    pub count: usize,
    /// Total matching items across all pages
    pub total_items: i64,
    /// Total number of pages
    pub total_pages: u32,
    /// Current page (1-indexed)
    pub current_page: u32,
}

impl ListMeta {
    pub fn from_result<T>(result: &PagedResult<T>) -> Self {
        Self {
            success: true,
            count: result.len(),
            total_items: result.total,
            total_pages: result.total_pages(),
            current_page: result.page,
        }
    }

    /// Metadata for an unpaginated full listing
    pub fn from_full_list(len: usize) -> Self {
        Self {
            success: true,
            count: len,
            total_items: len as i64,
            total_pages: 1,
            current_page: 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ListParams;

    #[test]
    fn test_list_meta_from_result() {
        let params = ListParams::new(2, 10);
        let result = PagedResult::new(vec![1, 2, 3], 23, &params);
        let meta = ListMeta::from_result(&result);

        assert!(meta.success);
        assert_eq!(meta.count, 3);
        assert_eq!(meta.total_items, 23);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.current_page, 2);
    }

    #[test]
    fn test_status_message_serialization() {
        let json = serde_json::to_value(StatusMessage::ok("done")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "done");
    }
}
