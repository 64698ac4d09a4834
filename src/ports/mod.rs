pub mod book_catalog;
pub mod list_store;

pub use book_catalog::{BookCatalog, CatalogError, SearchQuery, SearchResults};
pub use list_store::{ListStore, ListStoreError};
