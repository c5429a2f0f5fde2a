//! Item persistence
//!
//! [`ItemStore`] is the seam between the service and the database. Two
//! backends implement it:
//!
//! - [`PgItemStore`]: PostgreSQL through sqlx, used when `[database]` is configured
//! - [`MemoryItemStore`]: process-local map, used otherwise and in tests

use async_trait::async_trait;

use crate::models::Item;
use crate::pagination::{Page, PageRequest};

mod error;
pub mod memory;
pub mod pg;

pub use error::{StoreError, StoreErrorKind, StoreOperation};
pub use memory::MemoryItemStore;
pub use pg::PgItemStore;

/// Result type for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Trait for item persistence backends
#[async_trait]
pub trait ItemStore: Send + Sync {
    /// Every item, ordered by id
    async fn find_all(&self) -> StoreResult<Vec<Item>>;

    /// One page of items plus the total count
    ///
    /// Rows are ordered by the requested sort, then by id ascending.
    async fn find_page(&self, request: &PageRequest) -> StoreResult<Page<Item>>;

    /// The item with the given id, if any
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Item>>;

    /// Items whose name contains `fragment`, ignoring case, ordered by id
    ///
    /// The fragment is matched literally; `%` and `_` carry no meaning.
    async fn find_by_name_containing_ignore_case(&self, fragment: &str)
        -> StoreResult<Vec<Item>>;

    /// Insert when `item.id` is `None`, otherwise overwrite the matching row
    ///
    /// Returns the stored item with its id set. Overwriting an id with no row
    /// fails with [`StoreErrorKind::NotFound`].
    async fn save(&self, item: Item) -> StoreResult<Item>;

    /// Remove the row for `item.id`
    async fn delete(&self, item: &Item) -> StoreResult<()>;

    /// Cheap probe that the backend is reachable
    async fn health_check(&self) -> StoreResult<()>;
}

/// Case-insensitive literal substring test shared by in-process filtering
pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_ignore_case() {
        assert!(contains_ignore_case("Updated Widget", "updated"));
        assert!(contains_ignore_case("Updated Widget", "WIDGET"));
        assert!(contains_ignore_case("anything", ""));
        assert!(!contains_ignore_case("100% cotton", "_"));
        assert!(contains_ignore_case("100% cotton", "%"));
    }
}
