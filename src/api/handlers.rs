use crate::application::{ServiceDependencies, catalog, list};
use crate::domain::{Book, BookId, BookList, Caller, EditToken, ListId, OwnerId, commands::*};
use axum::{
    Json,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    error::ApiError,
    types::{
        AddBookRequest, CreateListRequest, EDIT_TOKEN_HEADER, ListCreatedResponse, ListResponse,
        OWNER_ID_HEADER, SearchParams, SearchResponse, ShareUrlResponse, UpdateListRequest,
    },
};

// ============================================================================
// State
// ============================================================================

/// ハンドラー間で共有されるアプリケーション状態
#[derive(Clone)]
pub struct AppState {
    pub service_deps: ServiceDependencies,
}

// ============================================================================
// Helpers
// ============================================================================

fn header_value<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

/// リクエストヘッダーから呼び出し元の資格情報を取り出す
fn caller_from_headers(headers: &HeaderMap) -> Caller {
    Caller {
        owner_id: header_value(headers, OWNER_ID_HEADER).and_then(OwnerId::parse),
        edit_token: header_value(headers, EDIT_TOKEN_HEADER)
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(EditToken::from_string),
    }
}

fn to_response(deps: &ServiceDependencies, book_list: BookList) -> ListResponse {
    let share_url = list::get_shareable_url(deps, book_list.id);
    ListResponse::new(book_list, share_url)
}

// ============================================================================
// Command handlers
// ============================================================================

/// POST /lists - 新しいリストを作成
///
/// 強制されるビジネスルール:
/// - リスト名が空でないこと
///
/// 編集トークンはこのレスポンスでのみ返される。
pub async fn create_list(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<CreateListRequest>,
) -> Result<(StatusCode, Json<ListCreatedResponse>), ApiError> {
    let caller = caller_from_headers(&headers);

    let cmd = CreateList {
        name: req.name,
        description: req.description,
        owner_id: caller.owner_id,
        created_at: chrono::Utc::now(),
    };

    let created = list::create_list(&state.service_deps, cmd).await?;
    let edit_token = created.edit_token.as_ref().map(|t| t.as_str().to_string());

    let response = ListCreatedResponse {
        list: to_response(&state.service_deps, created),
        edit_token,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// PUT /lists/:id - リストの名前と説明文を更新
///
/// 強制されるビジネスルール:
/// - リストが存在すること
/// - 編集トークン（と所有者）が一致すること
/// - リスト名が空でないこと
pub async fn update_list(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<UpdateListRequest>,
) -> Result<Json<ListResponse>, ApiError> {
    let cmd = UpdateListDetails {
        list_id: ListId::from_uuid(list_id),
        name: req.name,
        description: req.description,
        caller: caller_from_headers(&headers),
        updated_at: chrono::Utc::now(),
    };

    let updated = list::rename_or_describe(&state.service_deps, cmd).await?;
    Ok(Json(to_response(&state.service_deps, updated)))
}

/// DELETE /lists/:id - リストを削除
pub async fn delete_list(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<Uuid>,
    headers: HeaderMap,
) -> Result<StatusCode, ApiError> {
    let cmd = DeleteList {
        list_id: ListId::from_uuid(list_id),
        caller: caller_from_headers(&headers),
    };

    list::delete_list(&state.service_deps, cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /lists/:id/books - リストに書籍を追加
///
/// 既に含まれている書籍の追加は何もせず、現在のリストを返す。
pub async fn add_book(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<Uuid>,
    headers: HeaderMap,
    Json(req): Json<AddBookRequest>,
) -> Result<Json<ListResponse>, ApiError> {
    let cmd = AddBook {
        list_id: ListId::from_uuid(list_id),
        book: req.book,
        caller: caller_from_headers(&headers),
        added_at: chrono::Utc::now(),
    };

    let updated = list::add_book(&state.service_deps, cmd).await?;
    Ok(Json(to_response(&state.service_deps, updated)))
}

/// DELETE /lists/:id/books/:book_id - リストから書籍を取り除く
pub async fn remove_book(
    State(state): State<Arc<AppState>>,
    Path((list_id, book_id)): Path<(Uuid, String)>,
    headers: HeaderMap,
) -> Result<Json<ListResponse>, ApiError> {
    let book_id = BookId::parse(&book_id)
        .ok_or_else(|| ApiError::NotFound("Book id must not be empty".to_string()))?;

    let cmd = RemoveBook {
        list_id: ListId::from_uuid(list_id),
        book_id,
        caller: caller_from_headers(&headers),
        removed_at: chrono::Utc::now(),
    };

    let updated = list::remove_book(&state.service_deps, cmd).await?;
    Ok(Json(to_response(&state.service_deps, updated)))
}

// ============================================================================
// Query handlers
// ============================================================================

/// GET /lists - 呼び出し元のリスト一覧
///
/// `x-owner-id`ヘッダーがある場合はその所有者のリストのみ返す。
pub async fn get_lists(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<Vec<ListResponse>>, ApiError> {
    let caller = caller_from_headers(&headers);

    let lists = list::get_lists(&state.service_deps, caller.owner_id.as_ref()).await?;

    Ok(Json(
        lists
            .into_iter()
            .map(|l| to_response(&state.service_deps, l))
            .collect(),
    ))
}

/// GET /lists/:id - リスト詳細（共有リンクから閲覧される）
pub async fn get_list(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<Uuid>,
) -> Result<Json<ListResponse>, ApiError> {
    let found = list::get_list(&state.service_deps, ListId::from_uuid(list_id)).await?;
    Ok(Json(to_response(&state.service_deps, found)))
}

/// GET /lists/:id/share - 共有URLを取得
///
/// リストの存在確認は行わない。
pub async fn get_share_url(
    State(state): State<Arc<AppState>>,
    Path(list_id): Path<Uuid>,
) -> Json<ShareUrlResponse> {
    let url = list::get_shareable_url(&state.service_deps, ListId::from_uuid(list_id));
    Json(ShareUrlResponse { list_id, url })
}

/// GET /search?q=...&start_index=... - カタログ検索
///
/// 空のクエリは外部呼び出しをせずに空の結果を返す。
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let query = params.q.unwrap_or_default();
    let results = catalog::search_books(
        &state.service_deps,
        &query,
        params.start_index.unwrap_or(0),
    )
    .await?;

    Ok(Json(SearchResponse::from(results)))
}

/// GET /books/:book_id - カタログから1冊取得
pub async fn get_book(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<String>,
) -> Result<Json<Book>, ApiError> {
    let book_id = BookId::parse(&book_id)
        .ok_or_else(|| ApiError::NotFound("Book id must not be empty".to_string()))?;

    catalog::get_book(&state.service_deps, &book_id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Book {} not found", book_id)))
}
