//! Join planning
//!
//! The schema has one join path per table, so planning is a membership test:
//! shops is always joined to products, product_attributes only when one of
//! its columns is referenced.

use super::catalog::{self, ColumnDescriptor, Table};
use super::types::FilterCriterion;

/// Table every statement selects from
pub const BASE_TABLE: Table = Table::Products;

/// `inner join <table> <alias> on <condition>`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinClause {
    pub table: Table,
    pub on: &'static str,
}

pub const SHOPS_JOIN: JoinClause = JoinClause {
    table: Table::Shops,
    on: "s.id = p.shop_id",
};

pub const ATTRIBUTES_JOIN: JoinClause = JoinClause {
    table: Table::ProductAttributes,
    on: "p.id = a.product_id",
};

impl JoinClause {
    pub fn to_sql(&self) -> String {
        format!(
            "inner join {} {} on {}",
            self.table.name(),
            self.table.prefix(),
            self.on
        )
    }
}

/// Joins needed by the criteria and the optional projected column
pub fn plan(criteria: &[FilterCriterion], projected: Option<&ColumnDescriptor>) -> Vec<JoinClause> {
    let attribute_columns = catalog::columns_of_table(Table::ProductAttributes);
    let needs_attributes = criteria
        .iter()
        .map(|c| c.column.name)
        .chain(projected.map(|p| p.name))
        .any(|name| attribute_columns.contains(name));

    let mut joins = vec![SHOPS_JOIN];
    if needs_attributes {
        joins.push(ATTRIBUTES_JOIN);
    }
    tracing::trace!(
        tables = ?joins.iter().map(|j| j.table.name()).collect::<Vec<_>>(),
        "Joins planned"
    );
    joins
}

/// Joins of the paged search query, which always projects price and size
pub fn plan_search() -> Vec<JoinClause> {
    vec![SHOPS_JOIN, ATTRIBUTES_JOIN]
}
