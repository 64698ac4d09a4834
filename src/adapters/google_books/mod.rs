pub mod catalog;

pub use catalog::{GoogleBooksCatalog, GoogleBooksConfig};
