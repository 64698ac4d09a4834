use crate::domain::{BookList, ListId, OwnerId};
use crate::ports::list_store::{ListStore as ListStoreTrait, ListStoreError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// ListStoreのインメモリ実装
///
/// 全リストをMutexで保護したマップに保持する。
/// プロセス終了で内容は失われる。
pub struct ListStore {
    lists: Mutex<HashMap<ListId, BookList>>,
}

impl ListStore {
    pub fn new() -> Self {
        Self {
            lists: Mutex::new(HashMap::new()),
        }
    }

    /// 保存されているリスト数
    pub fn len(&self) -> usize {
        self.lists.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for ListStore {
    fn default() -> Self {
        Self::new()
    }
}

/// 更新日時の新しい順に並べる（インメモリとファイル実装で共用）
pub(crate) fn sort_by_recency(lists: &mut [BookList]) {
    lists.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

#[async_trait]
impl ListStoreTrait for ListStore {
    async fn get_all(&self, owner_id: Option<&OwnerId>) -> Result<Vec<BookList>> {
        let mut lists: Vec<BookList> = self
            .lists
            .lock()
            .unwrap()
            .values()
            .filter(|l| owner_id.is_none() || l.owner_id.as_ref() == owner_id)
            .cloned()
            .collect();
        sort_by_recency(&mut lists);
        Ok(lists)
    }

    async fn get_by_id(&self, list_id: ListId) -> Result<Option<BookList>> {
        Ok(self.lists.lock().unwrap().get(&list_id).cloned())
    }

    async fn insert(&self, list: BookList) -> Result<()> {
        let mut lists = self.lists.lock().unwrap();
        if lists.contains_key(&list.id) {
            return Err(ListStoreError::AlreadyExists(list.id));
        }
        lists.insert(list.id, list);
        Ok(())
    }

    async fn replace(&self, list: BookList) -> Result<()> {
        let mut lists = self.lists.lock().unwrap();
        match lists.get_mut(&list.id) {
            Some(existing) => {
                *existing = list;
                Ok(())
            }
            None => Err(ListStoreError::NotFound(list.id)),
        }
    }

    async fn delete(&self, list_id: ListId) -> Result<()> {
        self.lists
            .lock()
            .unwrap()
            .remove(&list_id)
            .map(|_| ())
            .ok_or(ListStoreError::NotFound(list_id))
    }
}
