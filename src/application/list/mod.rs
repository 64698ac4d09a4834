mod errors;
mod list_service;

pub use errors::{ListApplicationError, Result};
pub use list_service::{
    add_book, create_list, delete_list, get_list, get_lists, get_shareable_url, remove_book,
    rename_or_describe,
};
