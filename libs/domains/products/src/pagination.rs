//! Paging and sorting for product listings.
//!
//! [`ListProductsQuery`] is the wire form (`?page=2&limit=20&sort=price:asc`),
//! [`PaginationQuery`] the validated form handed to the repository, and
//! [`PaginatedResult`] the envelope returned to clients.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::error::{ProductError, ProductResult};
use crate::models::Product;

pub const DEFAULT_PAGE: u64 = 1;
pub const DEFAULT_LIMIT: u64 = 10;
pub const MAX_LIMIT: u64 = 100;

/// Fields a listing may be sorted by
pub const SORTABLE_FIELDS: &[&str] = &["name", "price", "category", "stock", "created_at", "updated_at"];

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Storage sort order: `1` ascending, `-1` descending
    pub fn as_order(self) -> i32 {
        match self {
            SortDirection::Asc => 1,
            SortDirection::Desc => -1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortField {
    pub field: String,
    pub direction: SortDirection,
}

impl SortField {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// A page request. `page` is 1-based; keys in `sort` apply in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationQuery {
    pub page: u64,
    pub limit: u64,
    pub sort: Vec<SortField>,
}

impl PaginationQuery {
    pub fn new(page: u64, limit: u64) -> Self {
        Self {
            page,
            limit,
            sort: Vec::new(),
        }
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(SortField::new(field, direction));
        self
    }

    /// Number of documents before this page
    pub fn skip(&self) -> u64 {
        self.page.saturating_sub(1).saturating_mul(self.limit)
    }
}

impl Default for PaginationQuery {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE, DEFAULT_LIMIT)
    }
}

/// One page of products plus the totals needed to page through the rest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedResult {
    pub data: Vec<Product>,
    /// Matching documents across all pages
    pub total_item: u64,
    pub total_page: u64,
    pub current_page: u64,
    pub limit: u64,
    pub skip: u64,
}

impl PaginatedResult {
    pub fn new(data: Vec<Product>, total_item: u64, query: &PaginationQuery) -> Self {
        Self {
            data,
            total_item,
            total_page: total_pages(total_item, query.limit),
            current_page: query.page,
            limit: query.limit,
            skip: query.skip(),
        }
    }
}

/// `ceil(total_item / limit)`; zero when `limit` is zero.
pub fn total_pages(total_item: u64, limit: u64) -> u64 {
    if limit == 0 {
        0
    } else {
        total_item.div_ceil(limit)
    }
}

/// Query string accepted by the list endpoint
#[derive(Debug, Clone, Deserialize, Validate, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListProductsQuery {
    /// 1-based page number
    #[serde(default = "default_page")]
    #[validate(range(min = 1))]
    #[param(minimum = 1, default = 1)]
    pub page: u64,

    /// Page size
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100))]
    #[param(minimum = 1, maximum = 100, default = 10)]
    pub limit: u64,

    /// Comma-separated `field:dir` pairs, e.g. `price:asc,name:desc`
    #[serde(default)]
    #[param(example = "price:asc")]
    pub sort: Option<String>,
}

fn default_page() -> u64 {
    DEFAULT_PAGE
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl TryFrom<ListProductsQuery> for PaginationQuery {
    type Error = ProductError;

    fn try_from(params: ListProductsQuery) -> ProductResult<Self> {
        let sort = match params.sort.as_deref() {
            Some(raw) => parse_sort(raw)?,
            None => Vec::new(),
        };

        Ok(Self {
            page: params.page,
            limit: params.limit,
            sort,
        })
    }
}

/// Parse `field[:dir][,field[:dir]...]`. Direction defaults to ascending;
/// blank segments are skipped.
pub fn parse_sort(raw: &str) -> ProductResult<Vec<SortField>> {
    let mut fields: Vec<SortField> = Vec::new();

    for segment in raw.split(',').map(str::trim).filter(|s| !s.is_empty()) {
        let (field, direction) = match segment.split_once(':') {
            Some((field, dir)) => {
                let direction = dir.trim().parse::<SortDirection>().map_err(|_| {
                    ProductError::Validation(format!(
                        "sort direction \"{}\" must be asc or desc",
                        dir.trim()
                    ))
                })?;
                (field.trim(), direction)
            }
            None => (segment, SortDirection::Asc),
        };

        if !SORTABLE_FIELDS.contains(&field) {
            return Err(ProductError::Validation(format!(
                "sort field \"{}\" is not sortable",
                field
            )));
        }
        if fields.iter().any(|f| f.field == field) {
            return Err(ProductError::Validation(format!(
                "sort field \"{}\" given more than once",
                field
            )));
        }

        fields.push(SortField::new(field, direction));
    }

    Ok(fields)
}
