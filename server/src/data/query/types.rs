//! Filter and statement type definitions

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::catalog::ColumnDescriptor;
use crate::data::error::QueryError;
use crate::utils::sql::count_placeholders;

/// Comparison operator of a single filter entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
    Eq,
    Ne,
    Gt,
    Gte,
    Lt,
    Lte,
    /// Membership test, expanded to a disjunction of equalities
    AnyOf,
}

impl Operator {
    /// Parse the operator code sent by the web client
    pub fn from_code(code: &str) -> Result<Self, QueryError> {
        match code {
            "eq" => Ok(Self::Eq),
            "ne" => Ok(Self::Ne),
            "gt" => Ok(Self::Gt),
            "gte" => Ok(Self::Gte),
            "lt" => Ok(Self::Lt),
            "lte" => Ok(Self::Lte),
            // older web clients send "any"
            "anyOf" | "any" => Ok(Self::AnyOf),
            other => Err(QueryError::unsupported_operator(other)),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Eq => "eq",
            Self::Ne => "ne",
            Self::Gt => "gt",
            Self::Gte => "gte",
            Self::Lt => "lt",
            Self::Lte => "lte",
            Self::AnyOf => "anyOf",
        }
    }

    /// SQL comparison symbol. `AnyOf` has none: it expands to `=` tests.
    pub fn sql_symbol(&self) -> Option<&'static str> {
        match self {
            Self::Eq => Some("="),
            Self::Ne => Some("!="),
            Self::Gt => Some(">"),
            Self::Gte => Some(">="),
            Self::Lt => Some("<"),
            Self::Lte => Some("<="),
            Self::AnyOf => None,
        }
    }
}

impl FromStr for Operator {
    type Err = QueryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s)
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// One (value, operator) entry of a web filter, as received from the caller
///
/// Accepts either `"value": "x"` or `"values": ["x", "y"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
pub struct SearchValAndOp {
    #[serde(alias = "value", deserialize_with = "one_or_many")]
    pub values: Vec<String>,
    pub op: String,
}

impl SearchValAndOp {
    pub fn new(value: impl Into<String>, op: impl Into<String>) -> Self {
        Self {
            values: vec![value.into()],
            op: op.into(),
        }
    }

    pub fn with_values<I, S>(values: I, op: impl Into<String>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
            op: op.into(),
        }
    }
}

fn one_or_many<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(match OneOrMany::deserialize(deserializer)? {
        OneOrMany::One(value) => vec![value],
        OneOrMany::Many(values) => values,
    })
}

/// Web filters: filter name to its ordered entries. Map order carries no meaning.
pub type RawFilters = HashMap<String, Vec<SearchValAndOp>>;

/// A resolved (values, operator) entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValueOp {
    pub values: Vec<String>,
    pub op: Operator,
}

/// One user filter resolved against the catalog
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterCriterion {
    pub column: &'static ColumnDescriptor,
    /// Never empty; order is the predicate emission order
    pub entries: Vec<ValueOp>,
}

/// Typed value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SqlParam {
    Text(String),
    Integer(i64),
    Float(f64),
}

impl SqlParam {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }
}

impl fmt::Display for SqlParam {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{:?}", s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(x) => write!(f, "{:?}", x),
        }
    }
}

/// Compiled SQL text plus the parameters for its placeholders, in order
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterizedStatement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl ParameterizedStatement {
    pub fn placeholder_count(&self) -> usize {
        count_placeholders(&self.sql)
    }

    /// Whether every placeholder has exactly one parameter
    pub fn is_consistent(&self) -> bool {
        self.placeholder_count() == self.params.len()
    }
}

impl fmt::Display for ParameterizedStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let params: Vec<String> = self.params.iter().map(ToString::to_string).collect();
        write!(f, "{} [{}]", self.sql, params.join(", "))
    }
}
