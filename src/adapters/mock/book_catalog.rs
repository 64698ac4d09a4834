use crate::domain::{Book, BookId};
use crate::ports::book_catalog::{
    BookCatalog as BookCatalogTrait, CatalogError, Result, SearchQuery, SearchResults,
};
use async_trait::async_trait;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

/// BookCatalogのモック実装
///
/// 登録した書籍のうち、タイトルにクエリを含むもの（大文字小文字を区別しない）を返す。
/// 呼び出し回数を記録し、失敗モードに切り替えることもできる。
pub struct BookCatalog {
    books: Mutex<Vec<Book>>,
    calls: AtomicUsize,
    failing: AtomicBool,
}

impl BookCatalog {
    pub fn new() -> Self {
        Self {
            books: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    /// テスト用に書籍を登録
    pub fn add_book(&self, book: Book) {
        self.books.lock().unwrap().push(book);
    }

    /// 以降の呼び出しをすべて503で失敗させる
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// カタログに届いた呼び出し回数
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn record_call(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            return Err(CatalogError::Status(503));
        }
        Ok(())
    }
}

impl Default for BookCatalog {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BookCatalogTrait for BookCatalog {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResults> {
        self.record_call()?;

        let needle = query.text().to_lowercase();
        let matches: Vec<Book> = self
            .books
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.title.to_lowercase().contains(&needle))
            .cloned()
            .collect();

        let total_items = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(query.start_index() as usize)
            .collect();

        Ok(SearchResults { items, total_items })
    }

    async fn get_book(&self, book_id: &BookId) -> Result<Option<Book>> {
        self.record_call()?;

        Ok(self
            .books
            .lock()
            .unwrap()
            .iter()
            .find(|b| &b.id == book_id)
            .cloned())
    }
}
