use crate::application::ServiceDependencies;
use crate::domain::{Book, BookId};
use crate::ports::{CatalogError, SearchQuery, SearchResults};
use thiserror::Error;

/// カタログ検索のエラー
///
/// 「0件ヒット」（空の結果）とは区別される。
#[derive(Debug, Error)]
pub enum SearchError {
    /// カタログへの問い合わせが失敗した
    #[error("Catalog unavailable")]
    CatalogUnavailable(#[source] CatalogError),
}

pub type Result<T> = std::result::Result<T, SearchError>;

/// 書籍を検索する
///
/// ビジネスルール：
/// - 空・空白のみのクエリは外部呼び出しをせずに空の結果を返す
/// - 外部呼び出しの失敗は空の結果ではなく`CatalogUnavailable`として返す
/// - キャッシュ・リトライはしない（同じクエリでも毎回問い合わせる）
pub async fn search_books(
    deps: &ServiceDependencies,
    raw_query: &str,
    start_index: u32,
) -> Result<SearchResults> {
    let Some(query) = SearchQuery::parse(raw_query) else {
        return Ok(SearchResults::empty());
    };
    let query = query.with_start_index(start_index);

    deps.book_catalog.search(&query).await.map_err(|e| {
        tracing::warn!(query = query.text(), error = %e, "Catalog search failed");
        SearchError::CatalogUnavailable(e)
    })
}

/// カタログから1冊取得する
pub async fn get_book(deps: &ServiceDependencies, book_id: &BookId) -> Result<Option<Book>> {
    deps.book_catalog.get_book(book_id).await.map_err(|e| {
        tracing::warn!(book_id = %book_id, error = %e, "Catalog lookup failed");
        SearchError::CatalogUnavailable(e)
    })
}
