use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Book, BookList};
use crate::ports::SearchResults;

/// 編集トークンを渡すリクエストヘッダー
pub const EDIT_TOKEN_HEADER: &str = "x-edit-token";
/// 所有者IDを渡すリクエストヘッダー
pub const OWNER_ID_HEADER: &str = "x-owner-id";

/// リスト作成リクエスト（POST /lists）
#[derive(Debug, Serialize, Deserialize)]
pub struct CreateListRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// リスト更新リクエスト（PUT /lists/:id）
#[derive(Debug, Serialize, Deserialize)]
pub struct UpdateListRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// 書籍追加リクエスト（POST /lists/:id/books）
#[derive(Debug, Serialize, Deserialize)]
pub struct AddBookRequest {
    pub book: Book,
}

/// 検索のクエリパラメータ（GET /search）
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: Option<String>,
    #[serde(default)]
    pub start_index: Option<u32>,
}

/// リストレスポンス
///
/// 公開される表現のため、編集トークンは含めない。
#[derive(Debug, Serialize, Deserialize)]
pub struct ListResponse {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub books: Vec<Book>,
    pub owner_id: Option<String>,
    pub share_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ListResponse {
    pub fn new(list: BookList, share_url: String) -> Self {
        Self {
            id: list.id.value(),
            name: list.name.into(),
            description: list.description,
            books: list.books,
            owner_id: list.owner_id.map(|o| o.as_str().to_string()),
            share_url,
            created_at: list.created_at,
            updated_at: list.updated_at,
        }
    }
}

/// リスト作成レスポンス
///
/// 編集トークンを作成者に渡す唯一のレスポンス。
#[derive(Debug, Serialize, Deserialize)]
pub struct ListCreatedResponse {
    #[serde(flatten)]
    pub list: ListResponse,
    pub edit_token: Option<String>,
}

/// 共有URLレスポンス（GET /lists/:id/share）
#[derive(Debug, Serialize, Deserialize)]
pub struct ShareUrlResponse {
    pub list_id: Uuid,
    pub url: String,
}

/// 検索レスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct SearchResponse {
    pub items: Vec<Book>,
    pub total_items: u64,
}

impl From<SearchResults> for SearchResponse {
    fn from(results: SearchResults) -> Self {
        Self {
            items: results.items,
            total_items: results.total_items,
        }
    }
}

/// エラーレスポンス
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
        }
    }
}
