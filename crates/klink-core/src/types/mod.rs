//! List-query types shared by the repository and HTTP layers.

pub mod filter;
pub mod pagination;
pub mod projection;
pub mod query;
pub mod sorting;

pub use filter::{FilterField, FilterOp, FilterValue};
pub use pagination::{PageLink, PageRequest, Pagination};
pub use projection::Projection;
pub use query::ListQuery;
pub use sorting::{SortDirection, SortField};
