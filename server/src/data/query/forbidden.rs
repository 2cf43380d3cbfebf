//! Legacy forbidden-value exclusions
//!
//! Historical scrapes stored placeholders such as `unknown` or `-1` instead of
//! real values. Distinct-values queries hide them with literal predicates.
//! Every filterable column must be classified here explicitly.

use super::catalog::{Column, ColumnDescriptor};
use crate::data::error::QueryError;

/// Literal exclusion appended after the WHERE predicates of a distinct-values query
pub fn exclusion_for(column: &ColumnDescriptor) -> Result<&'static str, QueryError> {
    match column.column {
        Column::Brand => Ok(" and brand <> 'unknown'"),
        Column::Year => Ok(" and year <> -1 and year <> -2"),
        Column::Version => Ok(" and version <> 'not needed' and version <> 'unknown'"),
        Column::Size => Ok(" and size <> 'unknown'"),
        Column::ProductName | Column::Condition | Column::SubprodName | Column::Price => Ok(""),
        Column::Category | Column::Country => Err(QueryError::NoForbiddenValueRule {
            column: column.name,
        }),
    }
}
