//! List-query extractor: the raw query string as [`ListQuery`].

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;

use klink_core::error::AppError;
use klink_core::types::ListQuery;

use crate::error::ApiError;

/// Filters, sort, projection, populate and page window from the query string.
#[derive(Debug, Clone)]
pub struct ListParams(pub ListQuery);

impl<S: Send + Sync> FromRequestParts<S> for ListParams {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Query(pairs) = Query::<Vec<(String, String)>>::try_from_uri(&parts.uri)
            .map_err(|e| AppError::validation(e.body_text()))?;
        Ok(Self(ListQuery::from_pairs(pairs)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;
    use klink_core::types::FilterOp;

    async fn extract(uri: &str) -> Result<ListQuery, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        ListParams::from_request_parts(&mut parts, &()).await.map(|p| p.0)
    }

    #[tokio::test]
    async fn test_bracket_operators_are_decoded() {
        let query = extract("/products?price%5Bgte%5D=10&page=2&limit=5").await.unwrap();
        assert_eq!(query.filters.len(), 1);
        assert_eq!(query.filters[0].field, "price");
        assert_eq!(query.filters[0].op, FilterOp::Gte);
        assert_eq!(query.page.page, 2);
        assert_eq!(query.page.limit, 5);
    }

    #[tokio::test]
    async fn test_empty_query_uses_defaults() {
        let query = extract("/products").await.unwrap();
        assert!(query.filters.is_empty());
        assert_eq!(query.page.page, 1);
    }

    #[tokio::test]
    async fn test_unknown_operator_is_rejected() {
        let err = extract("/products?price[like]=1").await.unwrap_err();
        assert_eq!(err.0.kind, klink_core::error::ErrorKind::Validation);
    }
}
