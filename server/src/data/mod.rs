//! Data layer
//!
//! - `query` - Compiles search filters into parameterized SQL
//! - `error` - Error type for query compilation

pub mod error;
pub mod query;

pub use error::QueryError;
pub use query::{ParameterizedStatement, SearchSqlBuilder, SqlParam};
