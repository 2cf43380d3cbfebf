//! Statement assembly
//!
//! Builds the two statements the search page needs:
//! - distinct values of one column under the current filters (filter dropdowns)
//! - one page of matching products, ordered by price
//!
//! Convention: the generated SQL is lower case and single-spaced.

use super::builder::where_clause;
use super::catalog::{self, ColumnDescriptor};
use super::criteria::{normalize, order};
use super::forbidden::exclusion_for;
use super::fragment::FragmentBuilder;
use super::joins::{self, BASE_TABLE, JoinClause};
use super::types::{FilterCriterion, ParameterizedStatement, RawFilters, SqlParam};
use crate::data::error::QueryError;

/// Columns returned by the paged search query
pub const SEARCH_PROJECTION: &str =
    "p.brand_name_version, p.link, a.price, a.size, p.condition, p.visible_to_public";

/// Compiles search filters into parameterized statements
#[derive(Debug, Clone, Copy)]
pub struct SearchSqlBuilder {
    rows_per_page: u32,
}

impl SearchSqlBuilder {
    /// `rows_per_page` is assumed positive; configuration validates it
    pub fn new(rows_per_page: u32) -> Self {
        Self { rows_per_page }
    }

    pub fn rows_per_page(&self) -> u32 {
        self.rows_per_page
    }

    /// Distinct values of `column` for raw web filters
    pub fn build_distinct_values_sql(
        &self,
        filters: &RawFilters,
        column: &str,
    ) -> Result<ParameterizedStatement, QueryError> {
        let criteria = normalize(filters)?;
        let column = catalog::resolve(column)?;
        self.build_distinct_values_sql_for(criteria, column)
    }

    /// Distinct values of `column` for already resolved criteria
    pub fn build_distinct_values_sql_for(
        &self,
        criteria: Vec<FilterCriterion>,
        column: &ColumnDescriptor,
    ) -> Result<ParameterizedStatement, QueryError> {
        let criteria = order(criteria)?;
        let exclusion = exclusion_for(column)?;
        let col = column.prefixed_name();
        let joins = joins::plan(&criteria, Some(column));

        let statement = FragmentBuilder::new()
            .append("select distinct ")
            .append(&col)
            .append(&from_clause(&joins))
            .append_fragment(where_clause(&criteria)?)
            .append(exclusion)
            .append(" order by ")
            .append(&col)
            .build();

        tracing::debug!(
            column = column.name,
            params = statement.params.len(),
            "Distinct values statement built"
        );
        debug_assert!(statement.is_consistent());
        Ok(statement)
    }

    /// One page of search results for raw web filters
    pub fn build_search_sql_for_web_filters(
        &self,
        filters: &RawFilters,
        page: u32,
    ) -> Result<ParameterizedStatement, QueryError> {
        let criteria = normalize(filters)?;
        self.build_search_sql(criteria, page)
    }

    /// One page of search results for already resolved criteria
    pub fn build_search_sql(
        &self,
        criteria: Vec<FilterCriterion>,
        page: u32,
    ) -> Result<ParameterizedStatement, QueryError> {
        let criteria = order(criteria)?;
        let rows = i64::from(self.rows_per_page);
        // one extra row tells the caller whether a next page exists
        let limit = rows + 1;
        let offset = i64::from(page)
            .checked_mul(rows)
            .ok_or(QueryError::PageOutOfRange {
                page,
                rows_per_page: self.rows_per_page,
            })?;

        let statement = FragmentBuilder::new()
            .append("select ")
            .append(SEARCH_PROJECTION)
            .append(&from_clause(&joins::plan_search()))
            .append_fragment(where_clause(&criteria)?)
            .append_param(" order by a.price limit ?", SqlParam::Integer(limit))
            .append_param(" offset ?", SqlParam::Integer(offset))
            .build();

        tracing::debug!(
            page,
            limit,
            offset,
            params = statement.params.len(),
            "Search statement built"
        );
        debug_assert!(statement.is_consistent());
        Ok(statement)
    }
}

fn from_clause(joins: &[JoinClause]) -> String {
    let mut sql = format!(" from {} {}", BASE_TABLE.name(), BASE_TABLE.prefix());
    for join in joins {
        sql.push(' ');
        sql.push_str(&join.to_sql());
    }
    sql
}
