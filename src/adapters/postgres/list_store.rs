use crate::domain::{Book, BookList, EditToken, ListId, ListName, OwnerId};
use crate::ports::list_store::{ListStore as ListStoreTrait, ListStoreError, Result};
use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Row, Transaction, postgres::PgRow};
use std::collections::HashMap;
use uuid::Uuid;

type BoxResult<T> = std::result::Result<T, Box<dyn std::error::Error + Send + Sync>>;

fn invalid_data(message: String) -> Box<dyn std::error::Error + Send + Sync> {
    Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message))
}

/// `lists`の行と並び順どおりの書籍をBookListに変換する
fn map_row_to_list(row: &PgRow, books: Vec<Book>) -> BoxResult<BookList> {
    let name: String = row.get("name");
    let name = ListName::parse(&name)
        .map_err(|e| invalid_data(format!("invalid list name {:?}: {}", name, e)))?;

    let owner_id: Option<String> = row.get("owner_id");
    let edit_token: Option<String> = row.get("edit_token");

    Ok(BookList {
        id: ListId::from_uuid(row.get("id")),
        name,
        description: row.get("description"),
        books,
        owner_id: owner_id.as_deref().and_then(OwnerId::parse),
        edit_token: edit_token.map(EditToken::from_string),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}

/// ListStoreのPostgreSQL実装
///
/// リスト本体は`lists`、所属書籍は`list_books`に保存する。
/// 書籍データはJSONBで丸ごと持ち、表示順は`position`列で保持する。
/// リストを削除すると所属書籍も連鎖削除される。
pub struct ListStore {
    pool: PgPool,
}

impl ListStore {
    /// PostgreSQL接続プールで新しいListStoreを作成
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 指定リストの書籍を読み込み、リストごとに並び順で束ねる
    async fn load_books(&self, list_ids: &[Uuid]) -> BoxResult<HashMap<Uuid, Vec<Book>>> {
        let rows = sqlx::query(
            r#"
            SELECT list_id, book_data
            FROM list_books
            WHERE list_id = ANY($1)
            ORDER BY list_id, position ASC
            "#,
        )
        .bind(list_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut books: HashMap<Uuid, Vec<Book>> = HashMap::new();
        for row in rows {
            let list_id: Uuid = row.get("list_id");
            let book_data: serde_json::Value = row.get("book_data");
            books
                .entry(list_id)
                .or_default()
                .push(serde_json::from_value(book_data)?);
        }
        Ok(books)
    }

    /// トランザクション内でリストの所属書籍を全件書き直す
    ///
    /// UNNESTを使った1回のINSERTで一括登録する。
    async fn write_books(tx: &mut Transaction<'_, Postgres>, list: &BookList) -> BoxResult<()> {
        sqlx::query("DELETE FROM list_books WHERE list_id = $1")
            .bind(list.id.value())
            .execute(&mut **tx)
            .await?;

        if list.books.is_empty() {
            return Ok(());
        }

        let mut book_ids = Vec::with_capacity(list.books.len());
        let mut positions = Vec::with_capacity(list.books.len());
        let mut book_data = Vec::with_capacity(list.books.len());

        for (i, book) in list.books.iter().enumerate() {
            book_ids.push(book.id.as_str().to_string());
            positions.push(i as i32);
            book_data.push(serde_json::to_value(book)?);
        }

        sqlx::query(
            r#"
            INSERT INTO list_books (list_id, book_id, position, book_data)
            SELECT $1, * FROM UNNEST($2::text[], $3::int[], $4::jsonb[])
            "#,
        )
        .bind(list.id.value())
        .bind(&book_ids)
        .bind(&positions)
        .bind(&book_data)
        .execute(&mut **tx)
        .await?;

        Ok(())
    }

    async fn fetch_all(&self, owner_id: Option<&OwnerId>) -> BoxResult<Vec<BookList>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, owner_id, edit_token, created_at, updated_at
            FROM lists
            WHERE $1::text IS NULL OR owner_id = $1
            ORDER BY updated_at DESC
            "#,
        )
        .bind(owner_id.map(|o| o.as_str().to_string()))
        .fetch_all(&self.pool)
        .await?;

        let ids: Vec<Uuid> = rows.iter().map(|r| r.get("id")).collect();
        let mut books = self.load_books(&ids).await?;

        rows.iter()
            .map(|row| {
                let id: Uuid = row.get("id");
                map_row_to_list(row, books.remove(&id).unwrap_or_default())
            })
            .collect()
    }

    async fn fetch_one(&self, list_id: ListId) -> BoxResult<Option<BookList>> {
        let row = sqlx::query(
            r#"
            SELECT id, name, description, owner_id, edit_token, created_at, updated_at
            FROM lists
            WHERE id = $1
            "#,
        )
        .bind(list_id.value())
        .fetch_optional(&self.pool)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut books = self.load_books(&[list_id.value()]).await?;
        let books = books.remove(&list_id.value()).unwrap_or_default();
        map_row_to_list(&row, books).map(Some)
    }

    /// IDが既に使われている場合はfalse
    async fn insert_list(&self, list: &BookList) -> BoxResult<bool> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            r#"
            INSERT INTO lists (id, name, description, owner_id, edit_token, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(list.id.value())
        .bind(list.name.as_str())
        .bind(list.description.as_deref())
        .bind(list.owner_id.as_ref().map(|o| o.as_str()))
        .bind(list.edit_token.as_ref().map(|t| t.as_str()))
        .bind(list.created_at)
        .bind(list.updated_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if inserted == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        Self::write_books(&mut tx, list).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// リストが存在しない場合はfalse
    async fn replace_list(&self, list: &BookList) -> BoxResult<bool> {
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE lists
            SET name = $2,
                description = $3,
                owner_id = $4,
                edit_token = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(list.id.value())
        .bind(list.name.as_str())
        .bind(list.description.as_deref())
        .bind(list.owner_id.as_ref().map(|o| o.as_str()))
        .bind(list.edit_token.as_ref().map(|t| t.as_str()))
        .bind(list.updated_at)
        .execute(&mut *tx)
        .await?
        .rows_affected();

        if updated == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        Self::write_books(&mut tx, list).await?;
        tx.commit().await?;
        Ok(true)
    }

    /// リストが存在しない場合はfalse
    async fn delete_list(&self, list_id: ListId) -> BoxResult<bool> {
        let deleted = sqlx::query("DELETE FROM lists WHERE id = $1")
            .bind(list_id.value())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

#[async_trait]
impl ListStoreTrait for ListStore {
    async fn get_all(&self, owner_id: Option<&OwnerId>) -> Result<Vec<BookList>> {
        self.fetch_all(owner_id)
            .await
            .map_err(ListStoreError::Backend)
    }

    async fn get_by_id(&self, list_id: ListId) -> Result<Option<BookList>> {
        self.fetch_one(list_id)
            .await
            .map_err(ListStoreError::Backend)
    }

    async fn insert(&self, list: BookList) -> Result<()> {
        match self.insert_list(&list).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ListStoreError::AlreadyExists(list.id)),
            Err(e) => Err(ListStoreError::Backend(e)),
        }
    }

    async fn replace(&self, list: BookList) -> Result<()> {
        match self.replace_list(&list).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ListStoreError::NotFound(list.id)),
            Err(e) => Err(ListStoreError::Backend(e)),
        }
    }

    async fn delete(&self, list_id: ListId) -> Result<()> {
        match self.delete_list(list_id).await {
            Ok(true) => Ok(()),
            Ok(false) => Err(ListStoreError::NotFound(list_id)),
            Err(e) => Err(ListStoreError::Backend(e)),
        }
    }
}
