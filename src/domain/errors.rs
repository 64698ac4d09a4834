use thiserror::Error;

/// リスト作成・更新時の入力エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CreateListError {
    /// リスト名が空
    #[error("List name must not be empty")]
    EmptyName,
}

/// 書籍追加時の入力エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AddBookError {
    /// 書籍IDが空
    #[error("Book id must not be empty")]
    MissingBookId,

    /// タイトルが空
    #[error("Book title must not be empty")]
    MissingTitle,
}

/// 変更操作の認可エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthorizationError {
    /// 編集トークンが未提示または不一致
    #[error("Edit token missing or does not match")]
    EditTokenMismatch,

    /// 所有者が一致しない
    #[error("Caller does not own this list")]
    NotOwner,
}
