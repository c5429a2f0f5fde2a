//! PostgreSQL item store
//!
//! Writes run in their own transaction; reads go straight to the pool.

use async_trait::async_trait;
use sqlx::PgPool;

use super::{ItemStore, StoreError, StoreOperation, StoreResult};
use crate::models::Item;
use crate::pagination::{Page, PageRequest, SortDirection};

const SELECT_ITEMS: &str = "SELECT id, name, description, quantity, price FROM items";

/// `price` is unbounded `NUMERIC`: every `Decimal` is stored exactly.
const CREATE_ITEMS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS items (
        id BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        name TEXT NOT NULL CHECK (length(btrim(name)) > 0),
        description VARCHAR(255),
        quantity INTEGER NOT NULL CHECK (quantity >= 0),
        price NUMERIC NOT NULL CHECK (price >= 0)
    )
"#;

/// PostgreSQL-backed item store
#[derive(Debug, Clone)]
pub struct PgItemStore {
    pool: PgPool,
}

impl PgItemStore {
    /// Create a new PostgreSQL item store
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create the `items` table if it does not exist
    ///
    /// Should be called once during application startup. The CHECK
    /// constraints mirror the request validation rules.
    pub async fn initialize(&self) -> StoreResult<()> {
        sqlx::query(CREATE_ITEMS_TABLE)
        .execute(&self.pool)
        .await
        .map_err(|e| StoreError::from(e).during(StoreOperation::Initialize))?;

        tracing::info!("items table ready");
        Ok(())
    }
}

/// `ORDER BY` clause for a page request; id ascending breaks ties
fn order_clause(request: &PageRequest) -> String {
    match &request.sort {
        Some(sort) if sort.field.column() != "id" => {
            format!(
                "ORDER BY {} {}, id ASC",
                sort.field.column(),
                sort.direction
            )
        }
        Some(sort) if sort.direction == SortDirection::Desc => "ORDER BY id DESC".to_string(),
        _ => "ORDER BY id ASC".to_string(),
    }
}

#[async_trait]
impl ItemStore for PgItemStore {
    async fn find_all(&self) -> StoreResult<Vec<Item>> {
        sqlx::query_as::<_, Item>(&format!("{} ORDER BY id", SELECT_ITEMS))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::from(e).during(StoreOperation::FindAll))
    }

    async fn find_page(&self, request: &PageRequest) -> StoreResult<Page<Item>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::from(e).during(StoreOperation::FindPage))?;

        let sql = format!(
            "{} {} LIMIT $1 OFFSET $2",
            SELECT_ITEMS,
            order_clause(request)
        );
        let offset = i64::try_from(request.offset()).unwrap_or(i64::MAX);
        let content = sqlx::query_as::<_, Item>(&sql)
            .bind(i64::from(request.size))
            .bind(offset)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::from(e).during(StoreOperation::FindPage))?;

        Ok(Page::new(content, request, total.max(0) as u64))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Item>> {
        sqlx::query_as::<_, Item>(&format!("{} WHERE id = $1", SELECT_ITEMS))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::from(e).during(StoreOperation::FindById))
    }

    async fn find_by_name_containing_ignore_case(
        &self,
        fragment: &str,
    ) -> StoreResult<Vec<Item>> {
        // strpos keeps `%` and `_` literal, unlike ILIKE
        sqlx::query_as::<_, Item>(&format!(
            "{} WHERE strpos(lower(name), lower($1)) > 0 ORDER BY id",
            SELECT_ITEMS
        ))
        .bind(fragment)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| StoreError::from(e).during(StoreOperation::FindByName))
    }

    async fn save(&self, item: Item) -> StoreResult<Item> {
        let op = StoreOperation::Save;
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::from(e).during(op))?;

        let saved = match item.id {
            None => sqlx::query_as::<_, Item>(
                r#"
                INSERT INTO items (name, description, quantity, price)
                VALUES ($1, $2, $3, $4)
                RETURNING id, name, description, quantity, price
                "#,
            )
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.price)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| StoreError::from(e).during(op))?,

            Some(id) => sqlx::query_as::<_, Item>(
                r#"
                UPDATE items
                SET name = $1, description = $2, quantity = $3, price = $4
                WHERE id = $5
                RETURNING id, name, description, quantity, price
                "#,
            )
            .bind(&item.name)
            .bind(&item.description)
            .bind(item.quantity)
            .bind(item.price)
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| StoreError::from(e).during(op))?
            .ok_or_else(|| StoreError::not_found(op, id))?,
        };

        tx.commit()
            .await
            .map_err(|e| StoreError::from(e).during(op))?;
        Ok(saved)
    }

    async fn delete(&self, item: &Item) -> StoreResult<()> {
        let op = StoreOperation::Delete;
        let Some(id) = item.id else {
            return Err(StoreError::query_failed(op, "cannot delete an unsaved item"));
        };

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::from(e).during(op))?;

        let result = sqlx::query("DELETE FROM items WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StoreError::from(e).during(op))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::not_found(op, id));
        }

        tx.commit()
            .await
            .map_err(|e| StoreError::from(e).during(op))?;
        Ok(())
    }

    async fn health_check(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::from(e).during(StoreOperation::HealthCheck))?;
        Ok(())
    }
}
