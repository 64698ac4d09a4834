use serde::{Deserialize, Serialize};

use super::BookId;

/// タイトルがないカタログ項目に使うタイトル
pub const UNTITLED: &str = "Untitled";

fn default_title() -> String {
    UNTITLED.to_string()
}

/// 書籍 - カタログから取得した値オブジェクト
///
/// 独自のライフサイクルを持たない。リストへの追加時に値としてコピーされる。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub published_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preview_link: Option<String>,
}

impl Book {
    /// IDとタイトルだけを持つ書籍を作成する
    pub fn new(id: BookId, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            authors: None,
            description: None,
            thumbnail: None,
            published_date: None,
            preview_link: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_book_title_defaults_when_missing() {
        let book: Book = serde_json::from_str(r#"{"id":"B1"}"#).unwrap();
        assert_eq!(book.id.as_str(), "B1");
        assert_eq!(book.title, UNTITLED);
        assert!(book.authors.is_none());
    }

    #[test]
    fn test_book_skips_absent_optional_fields() {
        let book = Book::new(BookId::parse("B2").unwrap(), "Hyperion");
        let json = serde_json::to_value(&book).unwrap();
        assert_eq!(json, serde_json::json!({"id": "B2", "title": "Hyperion"}));
    }
}
