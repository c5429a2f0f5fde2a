//! Item business operations
//!
//! Wraps an [`ItemStore`] and enforces that an item exists before it is
//! updated or deleted.

use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::instrument;

use crate::error::{Error, Result};
use crate::models::Item;
use crate::pagination::{Page, PageRequest};
use crate::store::ItemStore;

/// Filters for the search endpoint
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchCriteria {
    /// Case-insensitive substring of the item name
    pub name: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

/// Item operations over a shared store
#[derive(Clone)]
pub struct ItemService {
    store: Arc<dyn ItemStore>,
}

impl ItemService {
    pub fn new(store: Arc<dyn ItemStore>) -> Self {
        Self { store }
    }

    /// Underlying store, for health probes
    pub fn store(&self) -> &Arc<dyn ItemStore> {
        &self.store
    }

    /// Persist a new item; any id on the input is ignored
    #[instrument(skip(self, item), fields(name = %item.name))]
    pub async fn create(&self, mut item: Item) -> Result<Item> {
        item.id = None;
        let saved = self.store.save(item).await?;
        tracing::info!(id = ?saved.id, "Item created");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn find_all(&self, request: &PageRequest) -> Result<Page<Item>> {
        Ok(self.store.find_page(request).await?)
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<Item> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or(Error::NotFound { id })
    }

    /// Replace every mutable field of an existing item
    #[instrument(skip(self, values))]
    pub async fn update(&self, id: i64, values: Item) -> Result<Item> {
        let mut existing = self.find_by_id(id).await?;
        existing.replace_fields(values);
        let saved = self.store.save(existing).await?;
        tracing::info!(id, "Item updated");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<()> {
        let existing = self.find_by_id(id).await?;
        self.store.delete(&existing).await?;
        tracing::info!(id, "Item deleted");
        Ok(())
    }

    /// Name filter when given, then an inclusive price range only when both
    /// bounds are given
    #[instrument(skip(self))]
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<Vec<Item>> {
        let items = match criteria.name.as_deref() {
            Some(name) => self.store.find_by_name_containing_ignore_case(name).await?,
            None => self.store.find_all().await?,
        };

        let items = match (criteria.min_price, criteria.max_price) {
            (Some(min), Some(max)) => items
                .into_iter()
                .filter(|item| item.price >= min && item.price <= max)
                .collect(),
            _ => items,
        };

        tracing::debug!(count = items.len(), "Search complete");
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryItemStore;
    use std::str::FromStr;

    fn service() -> ItemService {
        ItemService::new(Arc::new(MemoryItemStore::new()))
    }

    fn item(name: &str, price: &str) -> Item {
        Item::new(name, None, 1, Decimal::from_str(price).unwrap())
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[tokio::test]
    async fn test_create_ignores_supplied_id() {
        let svc = service();
        let mut input = item("Widget", "1.00");
        input.id = Some(99);
        let created = svc.create(input).await.unwrap();
        assert_eq!(created.id, Some(1));
        assert!(matches!(
            svc.find_by_id(99).await,
            Err(Error::NotFound { id: 99 })
        ));
    }

    #[tokio::test]
    async fn test_update_replaces_fields_and_keeps_id() {
        let svc = service();
        let created = svc
            .create(Item::new("Old", Some("desc".into()), 1, dec("1.00")))
            .await
            .unwrap();
        let id = created.id.unwrap();

        let mut values = Item::new("New", None, 7, dec("2.50"));
        values.id = Some(12345);
        let updated = svc.update(id, values).await.unwrap();

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.name, "New");
        assert_eq!(updated.description, None);
        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.price, dec("2.50"));
        assert_eq!(svc.find_by_id(id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let err = service().update(5, item("x", "1")).await.unwrap_err();
        assert!(matches!(err, Error::NotFound { id: 5 }));
        assert_eq!(err.to_string(), "Item not found with id 5");
    }

    #[tokio::test]
    async fn test_delete_then_find_is_not_found() {
        let svc = service();
        let id = svc.create(item("Gone", "1")).await.unwrap().id.unwrap();
        svc.delete(id).await.unwrap();
        assert!(matches!(svc.find_by_id(id).await, Err(Error::NotFound { .. })));
        assert!(matches!(svc.delete(id).await, Err(Error::NotFound { .. })));
    }

    #[tokio::test]
    async fn test_search_by_name() {
        let svc = service();
        svc.create(item("Updated Widget", "5")).await.unwrap();
        svc.create(item("Plain Widget", "5")).await.unwrap();
        svc.create(item("updated gadget", "5")).await.unwrap();

        let found = svc
            .search(&SearchCriteria {
                name: Some("Updated".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        let names: Vec<_> = found.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, vec!["Updated Widget", "updated gadget"]);
    }

    #[tokio::test]
    async fn test_search_price_range_inclusive() {
        let svc = service();
        for price in ["5.00", "10.00", "15.00", "20.00"] {
            svc.create(item("Thing", price)).await.unwrap();
        }

        let found = svc
            .search(&SearchCriteria {
                name: None,
                min_price: Some(dec("10.00")),
                max_price: Some(dec("15.00")),
            })
            .await
            .unwrap();
        let prices: Vec<_> = found.iter().map(|i| i.price).collect();
        assert_eq!(prices, vec![dec("10.00"), dec("15.00")]);
    }

    #[tokio::test]
    async fn test_search_single_bound_applies_no_price_filter() {
        let svc = service();
        for price in ["5.00", "10.00", "15.00"] {
            svc.create(item("Thing", price)).await.unwrap();
        }

        let min_only = svc
            .search(&SearchCriteria {
                min_price: Some(dec("12.00")),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(min_only.len(), 3);

        let max_only = svc
            .search(&SearchCriteria {
                max_price: Some(dec("1.00")),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(max_only.len(), 3);
    }

    #[tokio::test]
    async fn test_find_all_pages() {
        let svc = service();
        for i in 0..15 {
            svc.create(item(&format!("Item {i}"), "1")).await.unwrap();
        }
        let page = svc.find_all(&PageRequest::new(2, 5)).await.unwrap();
        assert_eq!(page.content.len(), 5);
        assert_eq!(page.number, 2);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.content[0].name, "Item 10");
    }
}
