use crate::application::{catalog::SearchError, list::ListApplicationError};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};

use super::types::ErrorResponse;

/// API層のエラー型
///
/// アプリケーション層のエラーをラップし、HTTPレスポンスへのマッピングを提供する。
#[derive(Debug)]
pub enum ApiError {
    List(ListApplicationError),
    Search(SearchError),
    NotFound(String),
}

impl From<ListApplicationError> for ApiError {
    fn from(err: ListApplicationError) -> Self {
        ApiError::List(err)
    }
}

impl From<SearchError> for ApiError {
    fn from(err: SearchError) -> Self {
        ApiError::Search(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_type, message) = match self {
            // 404 Not Found - リクエストされたリソースが存在しない
            ApiError::List(ListApplicationError::ListNotFound) => (
                StatusCode::NOT_FOUND,
                "LIST_NOT_FOUND",
                "List not found".to_string(),
            ),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg),

            // 422 Unprocessable Entity - 入力値の不備
            ApiError::List(ListApplicationError::ValidationFailed(msg)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "VALIDATION_FAILED", msg)
            }

            // 403 Forbidden - 編集トークン・所有者の不一致
            ApiError::List(ListApplicationError::Unauthorized(e)) => {
                (StatusCode::FORBIDDEN, "UNAUTHORIZED", e.to_string())
            }

            // 500 Internal Server Error - システム障害
            // 内部エラーの詳細はログに記録し、クライアントには一般的なメッセージのみを返す
            ApiError::List(ListApplicationError::StoreError(e)) => {
                tracing::error!("List store error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "STORE_ERROR",
                    "Failed to access list storage".to_string(),
                )
            }

            // 502 Bad Gateway - 外部カタログの障害（0件ヒットとは区別する）
            ApiError::Search(SearchError::CatalogUnavailable(e)) => {
                tracing::error!("Catalog error: {:?}", e);
                (
                    StatusCode::BAD_GATEWAY,
                    "CATALOG_UNAVAILABLE",
                    "Book catalog is unavailable".to_string(),
                )
            }
        };

        let body = Json(ErrorResponse::new(error_type, message));
        (status, body).into_response()
    }
}
