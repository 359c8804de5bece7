//! Translation of a raw query string into list options.
//!
//! The reserved keys `page`, `limit`, `sort`, `fields` and `populate` drive
//! pagination, ordering, projection and relation embedding. Every other key
//! is a filter: `price=10` compares for equality, `price[gte]=10` uses the
//! bracketed operator.

use serde::{Deserialize, Serialize};

use super::filter::{FilterField, FilterOp};
use super::pagination::{DEFAULT_LIMIT, PageRequest};
use super::projection::Projection;
use super::sorting::SortField;
use crate::error::AppError;
use crate::result::AppResult;

/// Query keys that never become filters.
pub const RESERVED_KEYS: &[&str] = &["page", "sort", "limit", "fields", "populate"];

/// Parsed list options for a generic list or detail request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Filter conditions, combined with `AND`.
    pub filters: Vec<FilterField>,
    /// Sort order. Never empty; defaults to `-created_at`.
    pub sort: Vec<SortField>,
    /// Column projection.
    pub projection: Projection,
    /// Relation names to embed.
    pub populate: Vec<String>,
    /// Page window.
    pub page: PageRequest,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            filters: Vec::new(),
            sort: default_sort(),
            projection: Projection::All,
            populate: Vec::new(),
            page: PageRequest::default(),
        }
    }
}

impl ListQuery {
    /// Build list options from decoded `key=value` pairs.
    ///
    /// Unparsable `page`/`limit` values fall back to their defaults. Unknown
    /// bracket operators are rejected.
    pub fn from_pairs<I, K, V>(pairs: I) -> AppResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut query = Self::default();
        let mut page = 1;
        let mut limit = DEFAULT_LIMIT;

        for (key, value) in pairs {
            let (key, value) = (key.as_ref().trim(), value.as_ref().trim());
            match key {
                "page" => page = value.parse().unwrap_or(1),
                "limit" => limit = value.parse().unwrap_or(DEFAULT_LIMIT),
                "sort" => {
                    let sort = SortField::parse_list(value);
                    query.sort = if sort.is_empty() { default_sort() } else { sort };
                }
                "fields" => query.projection = Projection::parse(value)?,
                "populate" => {
                    query.populate = value
                        .split(',')
                        .map(str::trim)
                        .filter(|s| !s.is_empty())
                        .map(str::to_string)
                        .collect();
                }
                "" => {}
                _ => query.filters.push(parse_filter(key, value)?),
            }
        }

        query.page = PageRequest::new(page, limit);
        Ok(query)
    }

    /// Add a filter that the caller cannot override, such as an owner scope.
    pub fn with_filter(mut self, filter: FilterField) -> Self {
        self.filters.retain(|f| f.field != filter.field);
        self.filters.push(filter);
        self
    }
}

fn default_sort() -> Vec<SortField> {
    vec![SortField::desc("created_at")]
}

fn parse_filter(key: &str, value: &str) -> AppResult<FilterField> {
    let Some(open) = key.find('[') else {
        return Ok(FilterField::eq(key, value));
    };

    let field = &key[..open];
    let op_name = key[open + 1..]
        .strip_suffix(']')
        .ok_or_else(|| AppError::validation(format!("Malformed filter key: {key}")))?;
    let op = FilterOp::parse(op_name)
        .ok_or_else(|| AppError::validation(format!("Unsupported filter operator: {op_name}")))?;

    if field.is_empty() {
        return Err(AppError::validation(format!("Malformed filter key: {key}")));
    }
    Ok(FilterField::new(field, op, value))
}
