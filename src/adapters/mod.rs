pub mod file;
pub mod google_books;
pub mod memory;
pub mod mock;
pub mod postgres;
