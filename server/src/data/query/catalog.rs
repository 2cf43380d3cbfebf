//! Column catalog
//!
//! Static registry of the filterable columns of the product catalog schema.
//! The registry is built once on first use and never mutated afterwards.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::LazyLock;

use serde::Serialize;

use crate::data::error::QueryError;

/// Tables of the product catalog schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Table {
    Shops,
    Products,
    ProductAttributes,
}

impl Table {
    /// Table name in SQL
    pub fn name(&self) -> &'static str {
        match self {
            Table::Shops => "shops",
            Table::Products => "products",
            Table::ProductAttributes => "product_attributes",
        }
    }

    /// Alias used for the table in generated SQL
    pub fn prefix(&self) -> &'static str {
        match self {
            Table::Shops => "s",
            Table::Products => "p",
            Table::ProductAttributes => "a",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// SQL scalar type a column's raw values are cast to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlType {
    Text,
    Integer,
    Float,
}

impl fmt::Display for SqlType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlType::Text => write!(f, "text"),
            SqlType::Integer => write!(f, "integer"),
            SqlType::Float => write!(f, "floating-point"),
        }
    }
}

/// Identity of a filterable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Category,
    Country,
    Condition,
    Year,
    Brand,
    ProductName,
    Size,
    Price,
    SubprodName,
    Version,
}

/// Filters every query must carry, in emission order
pub const MANDATORY: [Column; 2] = [Column::Category, Column::Country];

/// Descriptor of a filterable/projectable column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ColumnDescriptor {
    #[serde(skip)]
    pub column: Column,
    pub name: &'static str,
    pub table: Table,
    pub sql_type: SqlType,
    /// Only used to order WHERE-clause predicates (higher first)
    pub priority: i32,
}

impl ColumnDescriptor {
    const fn new(
        column: Column,
        name: &'static str,
        table: Table,
        sql_type: SqlType,
        priority: i32,
    ) -> Self {
        Self {
            column,
            name,
            table,
            sql_type,
            priority,
        }
    }

    /// Column name qualified with its table alias (e.g. `p.brand`)
    pub fn prefixed_name(&self) -> String {
        format!("{}.{}", self.table.prefix(), self.name)
    }
}

// Ordered by descending priority. category and country must stay on top.
// Row i describes the `Column` variant with discriminant i.
const DESCRIPTOR_ROWS: [ColumnDescriptor; 10] = [
    ColumnDescriptor::new(Column::Category, "category", Table::Products, SqlType::Text, 100),
    ColumnDescriptor::new(Column::Country, "country", Table::Shops, SqlType::Text, 90),
    ColumnDescriptor::new(Column::Condition, "condition", Table::Products, SqlType::Text, 80),
    ColumnDescriptor::new(Column::Year, "year", Table::Products, SqlType::Integer, 70),
    ColumnDescriptor::new(Column::Brand, "brand", Table::Products, SqlType::Text, 60),
    ColumnDescriptor::new(Column::ProductName, "product_name", Table::Products, SqlType::Text, 50),
    ColumnDescriptor::new(Column::Size, "size", Table::ProductAttributes, SqlType::Text, 40),
    ColumnDescriptor::new(Column::Price, "price", Table::ProductAttributes, SqlType::Float, 30),
    ColumnDescriptor::new(Column::SubprodName, "subprod_name", Table::Products, SqlType::Text, 20),
    ColumnDescriptor::new(Column::Version, "version", Table::Products, SqlType::Text, 10),
];

const _: () = {
    assert!(DESCRIPTOR_ROWS.len() == Column::Version as usize + 1);
    let mut i = 0;
    while i < DESCRIPTOR_ROWS.len() {
        assert!(
            DESCRIPTOR_ROWS[i].column as usize == i,
            "descriptor rows must follow the Column declaration order"
        );
        i += 1;
    }
};

static DESCRIPTORS: [ColumnDescriptor; 10] = DESCRIPTOR_ROWS;

static CATALOG: LazyLock<HashMap<&'static str, &'static ColumnDescriptor>> = LazyLock::new(|| {
    let catalog: HashMap<_, _> = DESCRIPTORS.iter().map(|d| (d.name, d)).collect();
    tracing::trace!(columns = catalog.len(), "Column catalog initialized");
    catalog
});

/// Resolve a public filter name to its column descriptor
pub fn resolve(name: &str) -> Result<&'static ColumnDescriptor, QueryError> {
    CATALOG
        .get(name)
        .copied()
        .ok_or_else(|| QueryError::unknown_column(name))
}

/// Descriptor of a known column identity
pub fn descriptor(column: Column) -> &'static ColumnDescriptor {
    &DESCRIPTORS[column as usize]
}

/// Names of the registered columns owned by `table`
pub fn columns_of_table(table: Table) -> BTreeSet<&'static str> {
    DESCRIPTORS
        .iter()
        .filter(|d| d.table == table)
        .map(|d| d.name)
        .collect()
}

/// All registered columns, highest priority first
pub fn all() -> &'static [ColumnDescriptor] {
    &DESCRIPTORS
}
