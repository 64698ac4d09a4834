pub mod book;
pub mod book_list;
pub mod commands;
pub mod errors;
pub mod value_objects;

pub use book::*;
pub use book_list::{AddBookOutcome, BookList};
pub use errors::*;
pub use value_objects::*;
