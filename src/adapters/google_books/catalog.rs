//! 書籍カタログのGoogle Books実装
//!
//! 呼び出しごとに公開volumesエンドポイントへGETを1回送る。
//! レスポンスはこのアダプター内で`Book`に変換し、生のJSONを外へ出さない。

use crate::domain::{Book, BookId, UNTITLED};
use crate::ports::book_catalog::{
    BookCatalog, CatalogError, Result, SearchQuery, SearchResults,
};
use async_trait::async_trait;
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://www.googleapis.com/books/v1";
pub const DEFAULT_MAX_RESULTS: u32 = 20;

/// Google Booksクライアントの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoogleBooksConfig {
    pub base_url: String,
    pub max_results: u32,
    pub timeout_secs: u64,
    pub api_key: Option<String>,
}

impl Default for GoogleBooksConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_results: DEFAULT_MAX_RESULTS,
            timeout_secs: 10,
            api_key: None,
        }
    }
}

/// Google Books APIクライアント
pub struct GoogleBooksCatalog {
    client: reqwest::Client,
    volumes_url: Url,
    max_results: u32,
    api_key: Option<String>,
}

impl GoogleBooksCatalog {
    pub fn new(config: GoogleBooksConfig) -> Result<Self> {
        let base = Url::parse(config.base_url.trim_end_matches('/'))
            .map_err(|e| CatalogError::Transport(Box::new(e)))?;
        if base.cannot_be_a_base() {
            return Err(CatalogError::Transport(
                format!("catalog base url {} cannot hold a path", base).into(),
            ));
        }

        let volumes_url = Url::parse(&format!("{}/volumes", base.as_str().trim_end_matches('/')))
            .map_err(|e| CatalogError::Transport(Box::new(e)))?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs.max(1)))
            .build()
            .map_err(|e| CatalogError::Transport(Box::new(e)))?;

        Ok(Self {
            client,
            volumes_url,
            max_results: config.max_results.clamp(1, 40),
            api_key: config.api_key,
        })
    }

    /// GETを送り、ステータスと本文を返す
    async fn fetch(&self, request: reqwest::RequestBuilder) -> Result<(StatusCode, Vec<u8>)> {
        let request = match &self.api_key {
            Some(key) => request.query(&[("key", key.as_str())]),
            None => request,
        };

        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Transport(Box::new(e)))?;
        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| CatalogError::Transport(Box::new(e)))?;

        Ok((status, body.to_vec()))
    }
}

/// Google Booksの検索レスポンス
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumesResponse {
    #[serde(default)]
    total_items: u64,
    #[serde(default)]
    items: Vec<Volume>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Volume {
    id: Option<String>,
    #[serde(default)]
    volume_info: VolumeInfo,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VolumeInfo {
    title: Option<String>,
    authors: Option<Vec<String>>,
    description: Option<String>,
    image_links: Option<ImageLinks>,
    published_date: Option<String>,
    preview_link: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageLinks {
    thumbnail: Option<String>,
    small_thumbnail: Option<String>,
}

impl Volume {
    /// IDのない項目はリストから参照できないため捨てる
    fn into_book(self) -> Option<Book> {
        let id = BookId::parse(self.id.as_deref()?)?;
        let info = self.volume_info;

        Some(Book {
            id,
            title: info
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| UNTITLED.to_string()),
            authors: info.authors,
            description: info.description,
            thumbnail: info
                .image_links
                .and_then(|links| links.thumbnail.or(links.small_thumbnail)),
            published_date: info.published_date,
            preview_link: info.preview_link,
        })
    }
}

#[async_trait]
impl BookCatalog for GoogleBooksCatalog {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        debug!(
            "Searching catalog for {:?} (start_index={})",
            query.text(),
            query.start_index()
        );

        let request = self.client.get(self.volumes_url.clone()).query(&[
            ("q", query.text().to_string()),
            ("startIndex", query.start_index().to_string()),
            ("maxResults", self.max_results.to_string()),
        ]);

        let (status, body) = self.fetch(request).await?;
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let parsed: VolumesResponse =
            serde_json::from_slice(&body).map_err(|e| CatalogError::Malformed(Box::new(e)))?;

        let items: Vec<Book> = parsed
            .items
            .into_iter()
            .filter_map(Volume::into_book)
            .collect();

        debug!(
            "Catalog returned {} items ({} total)",
            items.len(),
            parsed.total_items
        );

        Ok(SearchResults {
            items,
            total_items: parsed.total_items,
        })
    }

    async fn get_book(&self, book_id: &BookId) -> Result<Option<Book>> {
        let mut url = self.volumes_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::Transport("catalog url cannot hold a path".into()))?
            .push(book_id.as_str());

        let (status, body) = self.fetch(self.client.get(url)).await?;
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(CatalogError::Status(status.as_u16()));
        }

        let volume: Volume =
            serde_json::from_slice(&body).map_err(|e| CatalogError::Malformed(Box::new(e)))?;
        Ok(volume.into_book())
    }
}
