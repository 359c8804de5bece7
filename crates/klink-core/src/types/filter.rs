//! Filter types for dynamic query building.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Filter comparison operator, written as `field[op]=value` in a query string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterOp {
    /// Exact equality (`field=value`).
    Eq,
    /// Not equal.
    Ne,
    /// Greater than.
    Gt,
    /// Greater than or equal.
    Gte,
    /// Less than.
    Lt,
    /// Less than or equal.
    Lte,
    /// Membership in a comma-separated list.
    In,
}

impl FilterOp {
    /// Parse the bracketed operator name of a filter key.
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "eq" => Some(Self::Eq),
            "ne" => Some(Self::Ne),
            "gt" => Some(Self::Gt),
            "gte" => Some(Self::Gte),
            "lt" => Some(Self::Lt),
            "lte" => Some(Self::Lte),
            "in" => Some(Self::In),
            _ => None,
        }
    }

    /// Return the SQL comparison operator. `In` is rendered as `= ANY(...)`.
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq | Self::In => "=",
            Self::Ne => "<>",
            Self::Gt => ">",
            Self::Gte => ">=",
            Self::Lt => "<",
            Self::Lte => "<=",
        }
    }
}

/// A filter value after it has been typed against its column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// A UUID value.
    Uuid(Uuid),
    /// A string value.
    Text(String),
    /// An integer value.
    Integer(i64),
    /// A floating-point value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
    /// A timestamp value.
    Timestamp(DateTime<Utc>),
    /// A list of values (for `in`).
    List(Vec<FilterValue>),
}

/// A single filter condition on a named field, as written by the client.
///
/// The value is kept raw here; the repository types it using the
/// resource's column kinds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterField {
    /// The column or field name to filter on.
    pub field: String,
    /// The comparison operator.
    pub op: FilterOp,
    /// The raw value from the query string.
    pub value: String,
}

impl FilterField {
    /// Create a new filter field.
    pub fn new(field: impl Into<String>, op: FilterOp, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            op,
            value: value.into(),
        }
    }

    /// Shorthand for an equality filter.
    pub fn eq(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    /// The raw values this filter compares against. Only `in` splits on commas.
    pub fn raw_values(&self) -> Vec<&str> {
        match self.op {
            FilterOp::In => self
                .value
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .collect(),
            _ => vec![self.value.as_str()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_operators() {
        assert_eq!(FilterOp::parse("gte"), Some(FilterOp::Gte));
        assert_eq!(FilterOp::parse("in"), Some(FilterOp::In));
        assert_eq!(FilterOp::parse("regex"), None);
    }

    #[test]
    fn test_in_splits_values() {
        let f = FilterField::new("name", FilterOp::In, "a, b,,c");
        assert_eq!(f.raw_values(), vec!["a", "b", "c"]);
        let g = FilterField::eq("name", "a,b");
        assert_eq!(g.raw_values(), vec!["a,b"]);
    }
}
