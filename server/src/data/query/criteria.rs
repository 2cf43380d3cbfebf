//! Criteria normalization
//!
//! Resolves web filters against the column catalog and orders them so the
//! compiled SQL does not depend on the caller's map iteration order.

use super::catalog::{self, MANDATORY};
use super::types::{FilterCriterion, Operator, RawFilters, SearchValAndOp, ValueOp};
use crate::data::error::QueryError;

/// Resolve, validate and order raw web filters
pub fn normalize(raw: &RawFilters) -> Result<Vec<FilterCriterion>, QueryError> {
    // Resolve in name order so the reported error is deterministic too
    let mut names: Vec<&String> = raw.keys().collect();
    names.sort();

    let criteria = names
        .into_iter()
        .map(|name| resolve_filter(name, &raw[name]))
        .collect::<Result<Vec<_>, _>>()?;

    order(criteria)
}

/// Check the mandatory filters and sort by descending priority, then by name
pub fn order(mut criteria: Vec<FilterCriterion>) -> Result<Vec<FilterCriterion>, QueryError> {
    for mandatory in MANDATORY {
        if !criteria.iter().any(|c| c.column.column == mandatory) {
            return Err(QueryError::MissingMandatoryFilter {
                name: catalog::descriptor(mandatory).name,
            });
        }
    }

    // Stable sort: repeated criteria on one column keep their relative order
    criteria.sort_by(|a, b| {
        b.column
            .priority
            .cmp(&a.column.priority)
            .then_with(|| a.column.name.cmp(b.column.name))
    });

    tracing::trace!(
        order = ?criteria.iter().map(|c| c.column.name).collect::<Vec<_>>(),
        "Criteria normalized"
    );
    Ok(criteria)
}

fn resolve_filter(name: &str, entries: &[SearchValAndOp]) -> Result<FilterCriterion, QueryError> {
    let column = catalog::resolve(name)?;
    if entries.is_empty() {
        return Err(QueryError::EmptyFilter {
            column: name.to_string(),
        });
    }

    let mut resolved: Vec<ValueOp> = Vec::with_capacity(entries.len());
    for entry in entries {
        let op = Operator::from_code(&entry.op)?;
        if entry.values.is_empty() {
            return Err(QueryError::EmptyFilter {
                column: name.to_string(),
            });
        }
        if op != Operator::AnyOf && entry.values.len() != 1 {
            return Err(QueryError::ValueCount {
                column: column.name,
                op: op.code(),
                count: entry.values.len(),
            });
        }

        let value_op = ValueOp {
            values: entry.values.clone(),
            op,
        };
        // entries form an ordered set: a repeated entry adds nothing
        if !resolved.contains(&value_op) {
            resolved.push(value_op);
        }
    }

    Ok(FilterCriterion {
        column,
        entries: resolved,
    })
}
