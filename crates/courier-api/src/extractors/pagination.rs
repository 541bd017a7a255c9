//! Pagination extractor
//!
//! Extracts offset-based pagination parameters from query strings. The
//! values pass through raw; the service layer fills the configured default
//! page size, validates the page number, and clamps against the cap.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::Deserialize;

use crate::response::ApiError;

/// Raw pagination query parameters
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub page_size: Option<i64>,
}

/// Pagination parameters as requested by the caller
#[derive(Debug, Clone, Copy)]
pub struct Pagination {
    /// 1-based page number
    pub page: i64,
    /// Requested page size; None defers to the configured default
    pub page_size: Option<i64>,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: None,
        }
    }
}

impl From<PaginationParams> for Pagination {
    fn from(params: PaginationParams) -> Self {
        Self {
            page: params.page.unwrap_or(1),
            page_size: params.page_size,
        }
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Pagination
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(params) = Query::<PaginationParams>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::invalid_query(e.to_string()))?;

        Ok(Pagination::from(params))
    }
}
