//! `/api/items` routes

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use tracing::instrument;

use super::extract::{ApiJson, ApiPath, ApiQuery};
use crate::{
    error::{Error, FieldViolation, Result},
    models::ItemDto,
    pagination::{Page, PageQuery, PageRequest},
    service::SearchCriteria,
    state::AppState,
};

/// Item routes; the `/test/*` diagnostics are mounted only when enabled
pub fn routes(diagnostic_routes: bool) -> Router<AppState> {
    let router = Router::new()
        .route("/api/items", get(list_items).post(create_item))
        .route("/api/items/search", get(search_items))
        .route(
            "/api/items/{id}",
            get(get_item).put(update_item).delete(delete_item),
        );

    if diagnostic_routes {
        router
            .route("/api/items/test/constraint", get(test_constraint))
            .route("/api/items/test/error", get(test_error))
    } else {
        router
    }
}

#[instrument(skip(state))]
async fn list_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<PageQuery>,
) -> Result<Json<Page<ItemDto>>> {
    let request = PageRequest::from_query(&query, &state.config().api)?;
    let page = state.items().find_all(&request).await?;
    Ok(Json(page.map(ItemDto::from)))
}

#[instrument(skip(state))]
async fn get_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<ItemDto>> {
    let item = state.items().find_by_id(id).await?;
    Ok(Json(item.into()))
}

#[instrument(skip(state, dto))]
async fn create_item(
    State(state): State<AppState>,
    ApiJson(dto): ApiJson<ItemDto>,
) -> Result<Json<ItemDto>> {
    let item = state.items().create(dto.into_item()?).await?;
    Ok(Json(item.into()))
}

#[instrument(skip(state, dto))]
async fn update_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(dto): ApiJson<ItemDto>,
) -> Result<Json<ItemDto>> {
    let item = state.items().update(id, dto.into_item()?).await?;
    Ok(Json(item.into()))
}

#[instrument(skip(state))]
async fn delete_item(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<StatusCode> {
    state.items().delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Raw search parameters
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchQuery {
    name: Option<String>,
    min_price: Option<String>,
    max_price: Option<String>,
}

impl SearchQuery {
    fn into_criteria(self) -> Result<SearchCriteria> {
        let mut violations = Vec::new();
        let min_price = parse_price("minPrice", self.min_price.as_deref(), &mut violations);
        let max_price = parse_price("maxPrice", self.max_price.as_deref(), &mut violations);

        if !violations.is_empty() {
            return Err(Error::ConstraintViolation(violations));
        }

        Ok(SearchCriteria {
            name: self.name,
            min_price,
            max_price,
        })
    }
}

fn parse_price(
    field: &str,
    raw: Option<&str>,
    violations: &mut Vec<FieldViolation>,
) -> Option<Decimal> {
    let raw = raw.map(str::trim).filter(|s| !s.is_empty())?;
    match Decimal::from_str(raw) {
        Ok(value) => Some(value),
        Err(_) => {
            violations.push(FieldViolation::new(
                field,
                format!("'{}' is not a valid decimal", raw),
            ));
            None
        }
    }
}

#[instrument(skip(state))]
async fn search_items(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> Result<Json<Vec<ItemDto>>> {
    let criteria = query.into_criteria()?;
    let items = state.items().search(&criteria).await?;
    Ok(Json(items.into_iter().map(ItemDto::from).collect()))
}

#[derive(Debug, Deserialize)]
struct ConstraintQuery {
    value: Option<String>,
}

async fn test_constraint(ApiQuery(query): ApiQuery<ConstraintQuery>) -> Result<impl IntoResponse> {
    let raw = query.value.as_deref().map(str::trim).unwrap_or_default();
    if raw.is_empty() {
        return Err(Error::ConstraintViolation(vec![FieldViolation::new(
            "value",
            "must not be null",
        )]));
    }

    match raw.parse::<i32>() {
        Ok(value) if value >= 1 => Ok(format!("Received valid value: {}", value)),
        Ok(_) => Err(Error::ConstraintViolation(vec![FieldViolation::new(
            "value",
            "must be greater than or equal to 1",
        )])),
        Err(_) => Err(Error::ConstraintViolation(vec![FieldViolation::new(
            "value",
            format!("'{}' is not a valid integer", raw),
        )])),
    }
}

async fn test_error() -> Result<()> {
    Err(Error::Internal("Unexpected test failure".to_string()))
}
