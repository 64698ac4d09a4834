use crate::adapters::memory::list_store::sort_by_recency;
use crate::domain::{BookList, ListId, OwnerId};
use crate::ports::list_store::{ListStore as ListStoreTrait, ListStoreError, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

/// リスト配列を保存する固定キー
pub const STORAGE_KEY: &str = "sharereads-lists";

/// ListStoreのファイル実装
///
/// `STORAGE_KEY`名の単一JSONファイルに全リストの配列を保存する。
/// 変更操作のたびにファイル全体を書き直してから返る（即時書き込み）。
pub struct ListStore {
    path: PathBuf,
    // プロセス内の読み込み・変更・書き込みを直列化する
    write_lock: Mutex<()>,
}

impl ListStore {
    /// `dir`配下にファイルを置くストアを作成
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            path: dir.as_ref().join(format!("{}.json", STORAGE_KEY)),
            write_lock: Mutex::new(()),
        }
    }

    /// 保存先ファイルのパス
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 配列全体を読み込む。ファイルがなければ空のストア
    async fn read_all(&self) -> Result<Vec<BookList>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(ListStoreError::backend(e)),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::error!(path = %self.path.display(), error = %e, "Corrupt list storage file");
            ListStoreError::backend(e)
        })
    }

    /// 一時ファイルへの書き込みとリネームで配列全体を置き換える
    async fn write_all(&self, lists: &[BookList]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(ListStoreError::backend)?;
        }

        let json = serde_json::to_vec_pretty(lists).map_err(ListStoreError::backend)?;
        let tmp_path = self.path.with_extension("json.tmp");

        tokio::fs::write(&tmp_path, json)
            .await
            .map_err(ListStoreError::backend)?;
        tokio::fs::rename(&tmp_path, &self.path)
            .await
            .map_err(ListStoreError::backend)?;

        tracing::debug!(path = %self.path.display(), count = lists.len(), "List storage written");
        Ok(())
    }
}

#[async_trait]
impl ListStoreTrait for ListStore {
    async fn get_all(&self, owner_id: Option<&OwnerId>) -> Result<Vec<BookList>> {
        let mut lists: Vec<BookList> = self
            .read_all()
            .await?
            .into_iter()
            .filter(|l| owner_id.is_none() || l.owner_id.as_ref() == owner_id)
            .collect();
        sort_by_recency(&mut lists);
        Ok(lists)
    }

    async fn get_by_id(&self, list_id: ListId) -> Result<Option<BookList>> {
        Ok(self
            .read_all()
            .await?
            .into_iter()
            .find(|l| l.id == list_id))
    }

    async fn insert(&self, list: BookList) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut lists = self.read_all().await?;

        if lists.iter().any(|l| l.id == list.id) {
            return Err(ListStoreError::AlreadyExists(list.id));
        }

        lists.push(list);
        self.write_all(&lists).await
    }

    async fn replace(&self, list: BookList) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut lists = self.read_all().await?;

        let slot = lists
            .iter_mut()
            .find(|l| l.id == list.id)
            .ok_or(ListStoreError::NotFound(list.id))?;
        *slot = list;

        self.write_all(&lists).await
    }

    async fn delete(&self, list_id: ListId) -> Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut lists = self.read_all().await?;

        let before = lists.len();
        lists.retain(|l| l.id != list_id);
        if lists.len() == before {
            return Err(ListStoreError::NotFound(list_id));
        }

        self.write_all(&lists).await
    }
}
