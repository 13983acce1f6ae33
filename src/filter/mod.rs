pub mod types;
pub mod filter;
pub mod filter_where;
pub mod pagination;
pub mod query;

pub use types::*;
pub use filter::Filter;
pub use pagination::{Paginated, Pagination, PaginationMeta};
pub use query::ListQuery;
