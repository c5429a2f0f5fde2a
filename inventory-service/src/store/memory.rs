//! In-memory item store

use async_trait::async_trait;
use std::collections::BTreeMap;
use tokio::sync::RwLock;

use super::{contains_ignore_case, ItemStore, StoreError, StoreOperation, StoreResult};
use crate::models::Item;
use crate::pagination::{Page, PageRequest};

#[derive(Debug, Default)]
struct Inner {
    items: BTreeMap<i64, Item>,
    last_id: i64,
}

/// Item store backed by a process-local ordered map
///
/// Ids start at 1 and are never reused, even after the item is deleted.
#[derive(Debug, Default)]
pub struct MemoryItemStore {
    inner: RwLock<Inner>,
}

impl MemoryItemStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ItemStore for MemoryItemStore {
    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        let inner = self.inner.read().await;
        Ok(inner.items.values().cloned().collect())
    }

    async fn find_page(&self, request: &PageRequest) -> StoreResult<Page<Item>> {
        let inner = self.inner.read().await;
        let mut items: Vec<Item> = inner.items.values().cloned().collect();
        drop(inner);

        if let Some(sort) = &request.sort {
            items.sort_by(|a, b| sort.compare(a, b));
        }

        let total = items.len() as u64;
        let offset = usize::try_from(request.offset()).unwrap_or(usize::MAX);
        let content = items
            .into_iter()
            .skip(offset)
            .take(request.size as usize)
            .collect();

        Ok(Page::new(content, request, total))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Item>> {
        let inner = self.inner.read().await;
        Ok(inner.items.get(&id).cloned())
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        fragment: &str,
    ) -> StoreResult<Vec<Item>> {
        let inner = self.inner.read().await;
        Ok(inner
            .items
            .values()
            .filter(|item| contains_ignore_case(&item.name, fragment))
            .cloned()
            .collect())
    }

    async fn save(&self, mut item: Item) -> StoreResult<Item> {
        let mut inner = self.inner.write().await;
        match item.id {
            None => {
                inner.last_id += 1;
                let id = inner.last_id;
                item.id = Some(id);
                inner.items.insert(id, item.clone());
            }
            Some(id) => match inner.items.get_mut(&id) {
                Some(existing) => *existing = item.clone(),
                None => return Err(StoreError::not_found(StoreOperation::Save, id)),
            },
        }
        Ok(item)
    }

    async fn delete(&self, item: &Item) -> StoreResult<()> {
        let Some(id) = item.id else {
            return Err(StoreError::query_failed(
                StoreOperation::Delete,
                "cannot delete an unsaved item",
            ));
        };

        let mut inner = self.inner.write().await;
        match inner.items.remove(&id) {
            Some(_) => Ok(()),
            None => Err(StoreError::not_found(StoreOperation::Delete, id)),
        }
    }

    async fn health_check(&self) -> StoreResult<()> {
        Ok(())
    }
}
