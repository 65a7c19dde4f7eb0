use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

const DEFAULT_PAGE: i64 = 1;
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Success envelope returned by every JSON endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default = "Option::default", skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn data(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            pagination: None,
            message: None,
        }
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::data(data)
        }
    }

    pub fn paginated(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::data(data)
        }
    }

    pub fn paginated_with_message(
        data: T,
        pagination: Pagination,
        message: impl Into<String>,
    ) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::paginated(data, pagination)
        }
    }
}

impl ApiResponse<()> {
    /// Envelope with a message and no payload (e.g. delete confirmations).
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: None,
            pagination: None,
            message: Some(message.into()),
        }
    }
}

/// Raw `page`/`limit` query values. Unparseable values fall back to defaults.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number (1-based)
    pub page: Option<String>,
    /// Items per page
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn is_paginated(&self) -> bool {
        self.page.is_some() || self.limit.is_some()
    }

    pub fn page_request(&self) -> PageRequest {
        PageRequest::new(
            self.page.as_deref().and_then(|p| p.trim().parse().ok()),
            self.limit.as_deref().and_then(|l| l.trim().parse().ok()),
        )
    }
}

/// Normalized page window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        let page = page.filter(|p| *p >= 1).unwrap_or(DEFAULT_PAGE);
        let limit = limit
            .filter(|l| *l >= 1)
            .unwrap_or(DEFAULT_LIMIT)
            .min(MAX_LIMIT);
        Self { page, limit }
    }

    /// Rows to skip. Saturates for absurd page numbers so the window is simply empty.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(request: PageRequest, total: i64) -> Self {
        let pages = if total <= 0 {
            0
        } else {
            (total + request.limit - 1) / request.limit
        };
        Self {
            page: request.page,
            limit: request.limit,
            total,
            pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_request_defaults_and_clamps() {
        assert_eq!(PageRequest::new(None, None), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(0), Some(0)), PageRequest { page: 1, limit: 10 });
        assert_eq!(PageRequest::new(Some(3), Some(500)).limit, 100);
        assert_eq!(PageRequest::new(Some(3), Some(20)).offset(), 40);
    }

    #[test]
    fn huge_page_number_saturates_offset() {
        let query = ListQuery {
            page: Some(i64::MAX.to_string()),
            limit: Some("100".into()),
        };
        let request = query.page_request();
        assert_eq!(request.page, i64::MAX);
        assert_eq!(request.offset(), i64::MAX);
        assert_eq!(Pagination::new(request, 3).pages, 1);
    }

    #[test]
    fn query_parsing_falls_back_on_garbage() {
        let query = ListQuery {
            page: Some("two".into()),
            limit: Some(" 5 ".into()),
        };
        assert!(query.is_paginated());
        assert_eq!(query.page_request(), PageRequest { page: 1, limit: 5 });
        assert!(!ListQuery::default().is_paginated());
    }

    #[test]
    fn pages_round_up() {
        let request = PageRequest::new(Some(1), Some(10));
        assert_eq!(Pagination::new(request, 0).pages, 0);
        assert_eq!(Pagination::new(request, 10).pages, 1);
        assert_eq!(Pagination::new(request, 11).pages, 2);
    }

    #[test]
    fn paginated_envelope_carries_message() {
        let request = PageRequest::new(Some(1), Some(10));
        let json = serde_json::to_value(ApiResponse::paginated_with_message(
            vec![1, 2],
            Pagination::new(request, 2),
            "Projects retrieved successfully",
        ))
        .unwrap();
        assert_eq!(json["message"], "Projects retrieved successfully");
        assert_eq!(json["pagination"]["total"], 2);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn envelope_omits_absent_parts() {
        let json = serde_json::to_value(ApiResponse::message("Project deleted successfully")).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["message"], "Project deleted successfully");
        assert!(json.get("data").is_none());
        assert!(json.get("pagination").is_none());
    }
}
