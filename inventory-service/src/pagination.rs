//! Page requests, sort orders and paged results
//!
//! Query parameters arrive as raw strings so that every unparsable value can
//! be reported as a constraint violation alongside the others instead of
//! failing extraction on the first bad parameter.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::config::ApiConfig;
use crate::error::{Error, FieldViolation, Result};
use crate::models::Item;

/// Column an item listing can be ordered by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Description,
    Quantity,
    Price,
}

impl SortField {
    /// Column name in the `items` table
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Quantity => "quantity",
            Self::Price => "price",
        }
    }

    /// Ascending comparison of two items on this field
    ///
    /// A missing description sorts after every present one, the same place
    /// PostgreSQL puts NULLs in ascending order.
    pub fn compare(self, a: &Item, b: &Item) -> Ordering {
        match self {
            Self::Id => a.id.cmp(&b.id),
            Self::Name => a.name.cmp(&b.name),
            Self::Description => match (&a.description, &b.description) {
                (Some(x), Some(y)) => x.cmp(y),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::Quantity => a.quantity.cmp(&b.quantity),
            Self::Price => a.price.cmp(&b.price),
        }
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "id" => Ok(Self::Id),
            "name" => Ok(Self::Name),
            "description" => Ok(Self::Description),
            "quantity" => Ok(Self::Quantity),
            "price" => Ok(Self::Price),
            other => Err(format!(
                "unknown sort property '{}' (expected one of id, name, description, quantity, price)",
                other
            )),
        }
    }
}

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Asc => write!(f, "ASC"),
            Self::Desc => write!(f, "DESC"),
        }
    }
}

/// Requested ordering, parsed from `field[,asc|desc]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub field: SortField,
    pub direction: SortDirection,
}

impl Sort {
    /// Compare two items honoring direction, breaking ties by id ascending
    pub fn compare(&self, a: &Item, b: &Item) -> Ordering {
        let primary = match self.direction {
            SortDirection::Asc => self.field.compare(a, b),
            SortDirection::Desc => self.field.compare(b, a),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }
}

impl FromStr for Sort {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.splitn(2, ',');
        let field = parts.next().unwrap_or_default().parse()?;
        let direction = match parts.next().map(|d| d.trim().to_ascii_lowercase()) {
            None => SortDirection::Asc,
            Some(d) if d == "asc" => SortDirection::Asc,
            Some(d) if d == "desc" => SortDirection::Desc,
            Some(d) => return Err(format!("unknown sort direction '{}' (expected asc or desc)", d)),
        };
        Ok(Self { field, direction })
    }
}

/// Raw pagination query parameters
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub size: Option<String>,
    pub sort: Option<String>,
}

/// Validated request for one page of items
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Zero-based page number
    pub page: u32,
    /// Items per page, at least 1
    pub size: u32,
    pub sort: Option<Sort>,
}

impl PageRequest {
    /// Create an unsorted page request
    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: None,
        }
    }

    /// Set the sort order
    pub fn with_sort(mut self, sort: Sort) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Number of rows to skip
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// Validate raw query parameters
    ///
    /// Missing values take defaults from `api`; sizes above the configured
    /// maximum are clamped. Every offending parameter yields one violation.
    pub fn from_query(query: &PageQuery, api: &ApiConfig) -> Result<Self> {
        let mut violations = Vec::new();

        let page = match query.page.as_deref().map(str::trim) {
            None | Some("") => 0,
            Some(raw) => match raw.parse::<i64>() {
                Ok(p) if p < 0 => {
                    violations.push(FieldViolation::new(
                        "page",
                        "must be greater than or equal to 0",
                    ));
                    0
                }
                Ok(p) => u32::try_from(p).unwrap_or(u32::MAX),
                Err(_) => {
                    violations.push(FieldViolation::new(
                        "page",
                        format!("'{}' is not a valid integer", raw),
                    ));
                    0
                }
            },
        };

        let size = match query.size.as_deref().map(str::trim) {
            None | Some("") => api.default_page_size,
            Some(raw) => match raw.parse::<i64>() {
                Ok(s) if s < 1 => {
                    violations.push(FieldViolation::new(
                        "size",
                        "must be greater than or equal to 1",
                    ));
                    1
                }
                Ok(s) => u32::try_from(s).unwrap_or(u32::MAX),
                Err(_) => {
                    violations.push(FieldViolation::new(
                        "size",
                        format!("'{}' is not a valid integer", raw),
                    ));
                    1
                }
            },
        };

        let sort = match query.sort.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => match raw.parse::<Sort>() {
                Ok(sort) => Some(sort),
                Err(message) => {
                    violations.push(FieldViolation::new("sort", message));
                    None
                }
            },
        };

        if !violations.is_empty() {
            return Err(Error::ConstraintViolation(violations));
        }

        Ok(Self {
            page,
            size: size.clamp(1, api.max_page_size.max(1)),
            sort,
        })
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, 20)
    }
}

/// One page of results plus totals
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub total_elements: u64,
    pub total_pages: u64,
    /// Zero-based page number
    pub number: u32,
    pub size: u32,
    pub number_of_elements: usize,
    pub first: bool,
    pub last: bool,
}

impl<T> Page<T> {
    /// Assemble a page from its slice and the total element count
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        let size = request.size.max(1);
        let total_pages = total_elements.div_ceil(u64::from(size));
        Self {
            number_of_elements: content.len(),
            content,
            total_elements,
            total_pages,
            number: request.page,
            size,
            first: request.page == 0,
            last: u64::from(request.page) + 1 >= total_pages,
        }
    }

    /// Convert the content, keeping the totals
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            content: self.content.into_iter().map(f).collect(),
            total_elements: self.total_elements,
            total_pages: self.total_pages,
            number: self.number,
            size: self.size,
            number_of_elements: self.number_of_elements,
            first: self.first,
            last: self.last,
        }
    }
}
