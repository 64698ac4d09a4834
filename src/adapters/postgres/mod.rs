pub mod list_store;

// パブリックに型を再エクスポート
pub use list_store::ListStore as PostgresListStore;

/// `lists`と`list_books`テーブルの組み込みマイグレーション
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
