use crate::domain::{Book, BookId};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;

/// カタログ検索のエラー
///
/// 「0件ヒット」とは区別される失敗。
#[derive(Debug, Error)]
pub enum CatalogError {
    /// 通信エラー（接続失敗・タイムアウト）
    #[error("Catalog request failed")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// 成功以外のHTTPステータス
    #[error("Catalog returned status {0}")]
    Status(u16),

    /// レスポンスボディが想定の形でない
    #[error("Malformed catalog response")]
    Malformed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T> = std::result::Result<T, CatalogError>;

/// 検索クエリ
///
/// 不変条件：前後の空白を除いて空でない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    text: String,
    start_index: u32,
}

impl SearchQuery {
    /// 空・空白のみの場合は`None`
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            text: trimmed.to_string(),
            start_index: 0,
        })
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn start_index(&self) -> u32 {
        self.start_index
    }
}

/// 検索結果の1ページ
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchResults {
    pub items: Vec<Book>,
    pub total_items: u64,
}

impl SearchResults {
    pub fn empty() -> Self {
        Self::default()
    }
}

/// 書籍カタログポート
///
/// 外部の書籍検索サービス（読み取り専用）を抽象化する。
/// キャッシュ・リトライは行わない。呼び出しごとに独立したリクエストになる。
#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// フリーテキストで検索する
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults>;

    /// IDで1冊取得する。存在しない場合は`None`
    async fn get_book(&self, book_id: &BookId) -> Result<Option<Book>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_query_rejects_blank() {
        assert!(SearchQuery::parse("").is_none());
        assert!(SearchQuery::parse("   \t").is_none());
    }

    #[test]
    fn test_search_query_trims() {
        let q = SearchQuery::parse("  dune ").unwrap().with_start_index(20);
        assert_eq!(q.text(), "dune");
        assert_eq!(q.start_index(), 20);
    }
}
