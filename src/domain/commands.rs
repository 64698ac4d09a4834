use chrono::{DateTime, Utc};

use super::{Book, BookId, Caller, ListId, OwnerId};

/// コマンド：リストを作成する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateList {
    /// 未検証のリスト名
    pub name: String,
    pub description: Option<String>,
    pub owner_id: Option<OwnerId>,
    pub created_at: DateTime<Utc>,
}

/// コマンド：リストの名前と説明文を更新する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateListDetails {
    pub list_id: ListId,
    pub name: String,
    pub description: Option<String>,
    pub caller: Caller,
    pub updated_at: DateTime<Utc>,
}

/// コマンド：リストに書籍を追加する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddBook {
    pub list_id: ListId,
    pub book: Book,
    pub caller: Caller,
    pub added_at: DateTime<Utc>,
}

/// コマンド：リストから書籍を取り除く
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveBook {
    pub list_id: ListId,
    pub book_id: BookId,
    pub caller: Caller,
    pub removed_at: DateTime<Utc>,
}

/// コマンド：リストを削除する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteList {
    pub list_id: ListId,
    pub caller: Caller,
}
