mod query;
mod repository;

pub use query::{filter_where, sql_for_partial_update, QueryPart, COLUMN_ALIASES};
pub use repository::PostgresImageStore;
