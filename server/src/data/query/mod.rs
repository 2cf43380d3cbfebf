//! Search query compiler
//!
//! Compiles the search page's filters into parameterized SQL for the product
//! catalog (shops, products, product attributes). The compiler never touches a
//! connection: the resulting statement is handed to the database layer.
//!
//! Pipeline: parse → normalize (resolve, check mandatory filters, order by
//! priority) → plan joins → compile predicates → assemble statement.
//!
//! ## Usage
//!
//! ```
//! use fmak_server::data::query::{SearchSqlBuilder, parse_filters};
//!
//! let json = r#"{
//!     "category": [{"op": "eq", "value": "KITES"}],
//!     "country": [{"op": "eq", "value": "UK"}]
//! }"#;
//! let filters = parse_filters(json).unwrap();
//! let stmt = SearchSqlBuilder::new(20)
//!     .build_search_sql_for_web_filters(&filters, 2)
//!     .unwrap();
//! assert!(stmt.sql.ends_with("order by a.price limit ? offset ?"));
//! assert_eq!(stmt.params.len(), 4);
//! ```

pub mod builder;
pub mod catalog;
pub mod criteria;
pub mod forbidden;
pub mod fragment;
pub mod joins;
mod parser;
pub mod statement;
pub mod types;

pub use catalog::{Column, ColumnDescriptor, SqlType, Table};
pub use criteria::normalize;
pub use parser::parse_filters;
pub use statement::SearchSqlBuilder;
pub use types::{
    FilterCriterion, Operator, ParameterizedStatement, RawFilters, SearchValAndOp, SqlParam,
    ValueOp,
};
