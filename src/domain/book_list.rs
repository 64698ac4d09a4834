use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{
    AddBookError, AuthorizationError, Book, BookId, Caller, EditToken, ListId, ListName, OwnerId,
};

/// 共有URLのパス部分
pub const SHARE_PATH: &str = "/list/";

// ============================================================================
// 集約
// ============================================================================

/// BookList集約 - 名前付きの、順序付き・重複なしの書籍コレクション
///
/// 不変条件：
/// - `id`は作成後に変更されない
/// - `books`に同じ書籍IDが2つ以上含まれない
/// - `updated_at`は変更のたびに更新され、減少しない
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookList {
    pub id: ListId,
    pub name: ListName,
    #[serde(default)]
    pub description: Option<String>,
    /// 追加順（表示順）
    #[serde(default)]
    pub books: Vec<Book>,
    #[serde(default)]
    pub owner_id: Option<OwnerId>,
    #[serde(default)]
    pub edit_token: Option<EditToken>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookList {
    /// 指定IDの書籍を含むか
    pub fn contains(&self, book_id: &BookId) -> bool {
        self.books.iter().any(|b| &b.id == book_id)
    }
}

/// 書籍追加の結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AddBookOutcome {
    /// 末尾に追加された
    Added(BookList),
    /// 既に含まれていた（リストは変更されない）
    AlreadyPresent(BookList),
}

impl AddBookOutcome {
    pub fn into_list(self) -> BookList {
        match self {
            AddBookOutcome::Added(list) | AddBookOutcome::AlreadyPresent(list) => list,
        }
    }
}

// ============================================================================
// 純粋関数（状態遷移）
// ============================================================================

/// 説明文を正規化する。空白のみの場合は`None`
pub fn normalize_description(description: Option<String>) -> Option<String> {
    description
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

/// 更新日時を進める（減少させない）
fn touch(updated_at: DateTime<Utc>, at: DateTime<Utc>) -> DateTime<Utc> {
    updated_at.max(at)
}

/// リストを作成する
///
/// 書籍は空、作成日時と更新日時は同じ値になる。
/// `issue_edit_token`が真の場合は新しい編集トークンを発行する。
pub fn create_list(
    name: ListName,
    description: Option<String>,
    owner_id: Option<OwnerId>,
    issue_edit_token: bool,
    created_at: DateTime<Utc>,
) -> BookList {
    BookList {
        id: ListId::new(),
        name,
        description: normalize_description(description),
        books: Vec::new(),
        owner_id,
        edit_token: issue_edit_token.then(EditToken::generate),
        created_at,
        updated_at: created_at,
    }
}

/// 名前と説明文を更新する
pub fn update_details(
    list: BookList,
    name: ListName,
    description: Option<String>,
    updated_at: DateTime<Utc>,
) -> BookList {
    BookList {
        name,
        description: normalize_description(description),
        updated_at: touch(list.updated_at, updated_at),
        ..list
    }
}

/// 書籍を末尾に追加する
///
/// 同じIDの書籍が既にある場合は何もしない（更新日時も変えない）。
/// IDはデシリアライズ時に検証済みのため、ここではタイトルのみ確認する。
pub fn add_book(
    mut list: BookList,
    book: Book,
    added_at: DateTime<Utc>,
) -> Result<AddBookOutcome, AddBookError> {
    if book.title.trim().is_empty() {
        return Err(AddBookError::MissingTitle);
    }

    if list.contains(&book.id) {
        return Ok(AddBookOutcome::AlreadyPresent(list));
    }

    list.books.push(book);
    list.updated_at = touch(list.updated_at, added_at);
    Ok(AddBookOutcome::Added(list))
}

/// 書籍を取り除く
///
/// 該当する書籍がなくても更新日時は進める。
pub fn remove_book(mut list: BookList, book_id: &BookId, removed_at: DateTime<Utc>) -> BookList {
    list.books.retain(|b| &b.id != book_id);
    list.updated_at = touch(list.updated_at, removed_at);
    list
}

/// 変更操作の認可
///
/// - 編集トークンを持つリストは、一致するトークンの提示が必要
/// - 所有者を持つリストは、同じ所有者からの操作のみ許可
pub fn authorize(list: &BookList, caller: &Caller) -> Result<(), AuthorizationError> {
    if let Some(expected) = &list.edit_token {
        if caller.edit_token.as_ref() != Some(expected) {
            return Err(AuthorizationError::EditTokenMismatch);
        }
    }

    if let Some(owner) = &list.owner_id {
        if caller.owner_id.as_ref() != Some(owner) {
            return Err(AuthorizationError::NotOwner);
        }
    }

    Ok(())
}

/// 共有URLを組み立てる
///
/// リストの存在確認は行わない。
pub fn share_url(origin: &str, list_id: ListId) -> String {
    format!("{}{}{}", origin.trim_end_matches('/'), SHARE_PATH, list_id)
}
