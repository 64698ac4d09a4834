pub mod list_store;

pub use list_store::ListStore as InMemoryListStore;
