//! Field projection (`fields=a,b` or `fields=-a`).

use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::result::AppResult;

/// Which columns a list or detail response carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Projection {
    /// Every selectable column.
    #[default]
    All,
    /// Only these columns (plus `id`).
    Include(Vec<String>),
    /// Every selectable column except these.
    Exclude(Vec<String>),
}

impl Projection {
    /// Parse a comma-separated projection expression.
    ///
    /// Mixing included and excluded names is rejected.
    pub fn parse(expr: &str) -> AppResult<Self> {
        let mut include = Vec::new();
        let mut exclude = Vec::new();
        for part in expr.split(',').map(str::trim).filter(|s| !s.is_empty()) {
            match part.strip_prefix('-') {
                Some(name) if !name.is_empty() => exclude.push(name.to_string()),
                Some(_) => {}
                None => include.push(part.to_string()),
            }
        }

        match (include.is_empty(), exclude.is_empty()) {
            (true, true) => Ok(Self::All),
            (false, true) => Ok(Self::Include(include)),
            (true, false) => Ok(Self::Exclude(exclude)),
            (false, false) => Err(AppError::validation(
                "Cannot mix included and excluded fields in projection",
            )),
        }
    }

    /// Whether a column is part of the projection. `id` always is.
    pub fn keeps(&self, column: &str) -> bool {
        if column == "id" {
            return true;
        }
        match self {
            Self::All => true,
            Self::Include(names) => names.iter().any(|n| n == column),
            Self::Exclude(names) => !names.iter().any(|n| n == column),
        }
    }

    /// Names mentioned by the projection, for validation against a schema.
    pub fn names(&self) -> &[String] {
        match self {
            Self::All => &[],
            Self::Include(names) | Self::Exclude(names) => names,
        }
    }
}
