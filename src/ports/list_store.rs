use crate::domain::{BookList, ListId, OwnerId};
use async_trait::async_trait;
use thiserror::Error;

/// リストストアのエラー
#[derive(Debug, Error)]
pub enum ListStoreError {
    /// insert時、同じIDのリストが既に存在する
    #[error("List {0} already exists")]
    AlreadyExists(ListId),

    /// replace/delete時、リストが存在しない
    #[error("List {0} not found")]
    NotFound(ListId),

    /// バックエンド（DB・ファイル）の障害
    #[error("List store backend error")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl ListStoreError {
    pub fn backend(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        ListStoreError::Backend(Box::new(err))
    }
}

pub type Result<T> = std::result::Result<T, ListStoreError>;

/// リストストアポート
///
/// リストIDからリスト（書籍メンバーシップ込み）への永続的な対応付け。
/// 変更操作はすべて即座に書き込まれる。複数リストにまたがるトランザクションはない。
#[async_trait]
pub trait ListStore: Send + Sync {
    /// 呼び出し元から見えるすべてのリストを取得する
    ///
    /// `owner_id`が指定された場合はその所有者のリストのみ。
    /// 更新日時の新しい順に返す。
    async fn get_all(&self, owner_id: Option<&OwnerId>) -> Result<Vec<BookList>>;

    /// IDでリストを取得する
    async fn get_by_id(&self, list_id: ListId) -> Result<Option<BookList>>;

    /// 新しいリストを保存する
    ///
    /// 同じIDが既に存在する場合は`AlreadyExists`。
    async fn insert(&self, list: BookList) -> Result<()>;

    /// 既存のリストを丸ごと置き換える
    ///
    /// 存在しない場合は`NotFound`。
    async fn replace(&self, list: BookList) -> Result<()>;

    /// リストと書籍メンバーシップを削除する
    ///
    /// 存在しない場合は`NotFound`。
    async fn delete(&self, list_id: ListId) -> Result<()>;
}
