mod search_service;

pub use search_service::{Result, SearchError, get_book, search_books};
