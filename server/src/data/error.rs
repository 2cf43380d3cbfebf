//! Error type for query compilation
//!
//! Every failure the compiler can report is a caller or programmer error found
//! synchronously while building a statement. None of them is transient.

use thiserror::Error;

use super::query::catalog::SqlType;

/// Errors raised while turning search filters into a parameterized statement
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QueryError {
    /// Filter or projected column is not registered in the catalog
    #[error("Unknown column: {name}")]
    UnknownColumn { name: String },

    /// One of the filters every query must carry is absent
    #[error("Missing mandatory filter: {name}")]
    MissingMandatoryFilter { name: &'static str },

    /// Operator code is not one of eq, ne, gt, gte, lt, lte, anyOf
    #[error("Unsupported operator: {op}")]
    UnsupportedOperator { op: String },

    /// Raw value cannot be cast to the column's SQL type
    #[error("Invalid value '{value}' for column {column}: expected {expected}")]
    InvalidValueFormat {
        column: &'static str,
        value: String,
        expected: SqlType,
    },

    /// Distinct-values query requested on a column the legacy rule never classified
    #[error("No forbidden value rule for column {column}")]
    NoForbiddenValueRule { column: &'static str },

    /// Filter without any (value, operator) pair, or anyOf without values
    #[error("Filter {column} has no values")]
    EmptyFilter { column: String },

    /// Comparison operator given more than one value
    #[error("Operator {op} on column {column} takes exactly one value, got {count}")]
    ValueCount {
        column: &'static str,
        op: &'static str,
        count: usize,
    },

    /// Filter payload exceeds the accepted size
    #[error("Filter JSON exceeds maximum size of {max} bytes")]
    FilterJsonTooLarge { max: usize },

    /// Filter payload is not valid JSON of the expected shape
    #[error("Invalid filter JSON: {0}")]
    InvalidFilterJson(String),

    /// Filter payload names more filters than accepted
    #[error("Maximum {max} filters allowed")]
    TooManyFilters { max: usize },

    /// Page offset does not fit a signed 64-bit SQL integer
    #[error("Page {page} with {rows_per_page} rows per page is out of range")]
    PageOutOfRange { page: u32, rows_per_page: u32 },
}

impl QueryError {
    pub fn unknown_column(name: impl Into<String>) -> Self {
        Self::UnknownColumn { name: name.into() }
    }

    pub fn unsupported_operator(op: impl Into<String>) -> Self {
        Self::UnsupportedOperator { op: op.into() }
    }

    pub fn invalid_value(
        column: &'static str,
        value: impl Into<String>,
        expected: SqlType,
    ) -> Self {
        Self::InvalidValueFormat {
            column,
            value: value.into(),
            expected,
        }
    }

    /// Stable error code for callers translating errors into responses
    pub fn code(&self) -> &'static str {
        match self {
            Self::UnknownColumn { .. } => "UNKNOWN_COLUMN",
            Self::MissingMandatoryFilter { .. } => "MISSING_MANDATORY_FILTER",
            Self::UnsupportedOperator { .. } => "UNSUPPORTED_OPERATOR",
            Self::InvalidValueFormat { .. } => "INVALID_VALUE_FORMAT",
            Self::NoForbiddenValueRule { .. } => "NO_FORBIDDEN_VALUE_RULE",
            Self::EmptyFilter { .. } => "EMPTY_FILTER",
            Self::ValueCount { .. } => "INVALID_VALUE_COUNT",
            Self::FilterJsonTooLarge { .. } => "FILTER_JSON_TOO_LARGE",
            Self::InvalidFilterJson(_) => "INVALID_FILTER_JSON",
            Self::TooManyFilters { .. } => "TOO_MANY_FILTERS",
            Self::PageOutOfRange { .. } => "PAGE_OUT_OF_RANGE",
        }
    }

    /// Compilation errors never go away on retry
    pub fn is_transient(&self) -> bool {
        false
    }
}
