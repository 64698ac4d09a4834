use crate::domain::{AddBookError, AuthorizationError, CreateListError};
use crate::ports::ListStoreError;
use thiserror::Error;

/// リスト管理アプリケーション層のエラー
#[derive(Debug, Error)]
pub enum ListApplicationError {
    /// リストが見つからない
    #[error("List not found")]
    ListNotFound,

    /// 入力値が不正（空のリスト名など）
    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    /// 編集トークン・所有者の不一致
    #[error("Unauthorized: {0}")]
    Unauthorized(#[from] AuthorizationError),

    /// ListStoreのエラー
    #[error("List store error")]
    StoreError(#[source] ListStoreError),
}

impl From<CreateListError> for ListApplicationError {
    fn from(err: CreateListError) -> Self {
        ListApplicationError::ValidationFailed(err.to_string())
    }
}

impl From<AddBookError> for ListApplicationError {
    fn from(err: AddBookError) -> Self {
        ListApplicationError::ValidationFailed(err.to_string())
    }
}

impl From<ListStoreError> for ListApplicationError {
    /// 読み込みと書き込みの間にリストが消えた場合はNotFoundとして扱う
    fn from(err: ListStoreError) -> Self {
        match err {
            ListStoreError::NotFound(_) => ListApplicationError::ListNotFound,
            other => ListApplicationError::StoreError(other),
        }
    }
}

/// アプリケーション層の Result型
pub type Result<T> = std::result::Result<T, ListApplicationError>;
