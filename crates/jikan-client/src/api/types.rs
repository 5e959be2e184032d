//! Generic Jikan API v4 response envelopes.
//!
//! Optional targets for [`Request::send_as`](super::Request::send_as). The
//! transport itself never looks inside a payload.

use serde::{Deserialize, Serialize};

/// Generic pagination wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: Pagination,
}

/// Simple data wrapper (without pagination)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataResponse<T> {
    pub data: T,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    pub last_visible_page: u32,
    pub has_next_page: bool,
    #[serde(default)]
    pub current_page: Option<u32>,
    #[serde(default)]
    pub items: Option<PaginationItems>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginationItems {
    pub count: u32,
    pub total: u32,
    pub per_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_paginated_response() {
        let response: PaginatedResponse<serde_json::Value> = serde_json::from_value(json!({
            "pagination": {
                "last_visible_page": 3,
                "has_next_page": true,
                "current_page": 1,
                "items": {"count": 25, "total": 61, "per_page": 25}
            },
            "data": [{"mal_id": 1}, {"mal_id": 5}]
        }))
        .unwrap();

        assert_eq!(response.data.len(), 2);
        assert!(response.pagination.has_next_page);
        assert_eq!(response.pagination.items.unwrap().total, 61);
    }

    #[test]
    fn test_pagination_without_items() {
        // Some list endpoints omit current_page and items
        let pagination: Pagination = serde_json::from_value(json!({
            "last_visible_page": 1,
            "has_next_page": false
        }))
        .unwrap();

        assert_eq!(pagination.current_page, None);
        assert!(pagination.items.is_none());
    }
}
