//! WHERE clause compilation
//!
//! Turns ordered criteria into predicate text with `?` placeholders and the
//! typed parameters for them. Raw values are cast according to the column's
//! SQL type here and nowhere else.

use super::catalog::{ColumnDescriptor, SqlType};
use super::fragment::SqlFragment;
use super::types::{FilterCriterion, SqlParam, ValueOp};
use crate::data::error::QueryError;

/// Compile criteria into and-joined predicates, in criteria then entry order
pub fn compile(criteria: &[FilterCriterion]) -> Result<SqlFragment, QueryError> {
    let predicates = criteria
        .iter()
        .flat_map(|criterion| {
            criterion
                .entries
                .iter()
                .map(move |entry| compile_entry(criterion.column, entry))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let compiled = SqlFragment::join(predicates, " and ");
    tracing::trace!(
        sql = compiled.sql(),
        params = compiled.params().len(),
        "Predicates compiled"
    );
    Ok(compiled)
}

/// ` where <predicates>`
pub fn where_clause(criteria: &[FilterCriterion]) -> Result<SqlFragment, QueryError> {
    Ok(SqlFragment::raw(" where ").then(compile(criteria)?))
}

fn compile_entry(column: &ColumnDescriptor, entry: &ValueOp) -> Result<SqlFragment, QueryError> {
    match entry.op.sql_symbol() {
        Some(symbol) => {
            let value = single_value(column, entry)?;
            let predicate = format!("{} {} ?", column.prefixed_name(), symbol);
            Ok(SqlFragment::bound(predicate, cast_value(column, value)?))
        }
        None => any_of(column, &entry.values),
    }
}

/// `( <col> = ? or <col> = ? ... )`, one placeholder per value
fn any_of(column: &ColumnDescriptor, values: &[String]) -> Result<SqlFragment, QueryError> {
    if values.is_empty() {
        return Err(QueryError::EmptyFilter {
            column: column.name.to_string(),
        });
    }

    let col = column.prefixed_name();
    let equalities = values
        .iter()
        .map(|value| {
            cast_value(column, value).map(|param| SqlFragment::bound(format!("{col} = ?"), param))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SqlFragment::join(equalities, " or ").parenthesized())
}

fn single_value<'a>(column: &ColumnDescriptor, entry: &'a ValueOp) -> Result<&'a str, QueryError> {
    match entry.values.as_slice() {
        [value] => Ok(value.as_str()),
        [] => Err(QueryError::EmptyFilter {
            column: column.name.to_string(),
        }),
        values => Err(QueryError::ValueCount {
            column: column.name,
            op: entry.op.code(),
            count: values.len(),
        }),
    }
}

/// Cast a raw filter value to the column's SQL type
pub fn cast_value(column: &ColumnDescriptor, raw: &str) -> Result<SqlParam, QueryError> {
    match column.sql_type {
        SqlType::Text => Ok(SqlParam::text(raw)),
        SqlType::Integer => raw
            .parse::<i64>()
            .map(SqlParam::Integer)
            .map_err(|_| QueryError::invalid_value(column.name, raw, column.sql_type)),
        SqlType::Float => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(SqlParam::Float(value)),
            _ => Err(QueryError::invalid_value(column.name, raw, column.sql_type)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::query::catalog;
    use crate::data::query::types::Operator;
    use crate::utils::sql::count_placeholders;

    fn entry(op: Operator, values: &[&str]) -> ValueOp {
        ValueOp {
            values: values.iter().map(|v| v.to_string()).collect(),
            op,
        }
    }

    fn criterion(name: &str, entries: Vec<ValueOp>) -> FilterCriterion {
        FilterCriterion {
            column: catalog::resolve(name).unwrap(),
            entries,
        }
    }

    fn mandatory() -> Vec<FilterCriterion> {
        vec![
            criterion("category", vec![entry(Operator::Eq, &["KITES"])]),
            criterion("country", vec![entry(Operator::Eq, &["EU"])]),
        ]
    }

    #[test]
    fn compile_mandatory_only() {
        let compiled = compile(&mandatory()).unwrap();
        assert_eq!(compiled.sql(), "p.category = ? and s.country = ?");
        assert_eq!(
            compiled.params(),
            &[SqlParam::text("KITES"), SqlParam::text("EU")]
        );
    }

    #[test]
    fn compile_all_comparison_operators() {
        let operators = [
            (Operator::Eq, "="),
            (Operator::Ne, "!="),
            (Operator::Gt, ">"),
            (Operator::Gte, ">="),
            (Operator::Lt, "<"),
            (Operator::Lte, "<="),
        ];

        for (op, symbol) in operators {
            let compiled = compile(&[criterion("year", vec![entry(op, &["2021"])])]).unwrap();
            assert_eq!(compiled.sql(), format!("p.year {} ?", symbol));
            assert_eq!(compiled.params(), &[SqlParam::Integer(2021)]);
        }
    }

    #[test]
    fn compile_range_on_one_column() {
        let mut criteria = mandatory();
        criteria.push(criterion(
            "price",
            vec![entry(Operator::Gte, &["100"]), entry(Operator::Lt, &["250.5"])],
        ));

        let compiled = compile(&criteria).unwrap();
        assert_eq!(
            compiled.sql(),
            "p.category = ? and s.country = ? and a.price >= ? and a.price < ?"
        );
        assert_eq!(
            compiled.params(),
            &[
                SqlParam::text("KITES"),
                SqlParam::text("EU"),
                SqlParam::Float(100.0),
                SqlParam::Float(250.5)
            ]
        );
    }

    #[test]
    fn compile_any_of_expands_to_disjunction() {
        let mut criteria = mandatory();
        criteria.push(criterion(
            "brand",
            vec![entry(Operator::AnyOf, &["duotone", "north", "core"])],
        ));

        let compiled = compile(&criteria).unwrap();
        assert_eq!(
            compiled.sql(),
            "p.category = ? and s.country = ? and ( p.brand = ? or p.brand = ? or p.brand = ? )"
        );
        assert_eq!(
            &compiled.params()[2..],
            &[
                SqlParam::text("duotone"),
                SqlParam::text("north"),
                SqlParam::text("core")
            ]
        );
        assert_eq!(count_placeholders(compiled.sql()), compiled.params().len());
    }

    #[test]
    fn compile_any_of_single_value() {
        let compiled =
            compile(&[criterion("size", vec![entry(Operator::AnyOf, &["12"])])]).unwrap();
        assert_eq!(compiled.sql(), "( a.size = ? )");
        assert_eq!(compiled.params(), &[SqlParam::text("12")]);
    }

    #[test]
    fn compile_any_of_casts_each_value() {
        let compiled = compile(&[criterion(
            "year",
            vec![entry(Operator::AnyOf, &["2020", "2021"])],
        )])
        .unwrap();
        assert_eq!(
            compiled.params(),
            &[SqlParam::Integer(2020), SqlParam::Integer(2021)]
        );

        let err = compile(&[criterion(
            "year",
            vec![entry(Operator::AnyOf, &["2020", "last"])],
        )])
        .unwrap_err();
        assert_eq!(
            err,
            QueryError::invalid_value("year", "last", SqlType::Integer)
        );
    }

    #[test]
    fn compile_any_of_next_to_comparison_keeps_both() {
        let compiled = compile(&[criterion(
            "size",
            vec![
                entry(Operator::AnyOf, &["9", "10"]),
                entry(Operator::Ne, &["unknown"]),
            ],
        )])
        .unwrap();
        assert_eq!(
            compiled.sql(),
            "( a.size = ? or a.size = ? ) and a.size != ?"
        );
        assert_eq!(compiled.params().len(), 3);
    }

    #[test]
    fn compile_rejects_empty_any_of() {
        let err = compile(&[criterion("brand", vec![entry(Operator::AnyOf, &[])])]).unwrap_err();
        assert!(matches!(err, QueryError::EmptyFilter { .. }));
    }

    #[test]
    fn compile_rejects_multi_value_comparison() {
        let err = compile(&[criterion("brand", vec![entry(Operator::Eq, &["a", "b"])])])
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::ValueCount {
                column: "brand",
                op: "eq",
                count: 2
            }
        );
    }

    #[test]
    fn where_clause_prefix() {
        let clause = where_clause(&mandatory()).unwrap();
        assert_eq!(clause.sql(), " where p.category = ? and s.country = ?");
    }

    #[test]
    fn cast_text_passes_through() {
        let size = catalog::resolve("size").unwrap();
        assert_eq!(cast_value(size, " 15.0 ").unwrap(), SqlParam::text(" 15.0 "));
    }

    #[test]
    fn cast_integer() {
        let year = catalog::resolve("year").unwrap();
        assert_eq!(cast_value(year, "2022").unwrap(), SqlParam::Integer(2022));
        assert_eq!(cast_value(year, "-1").unwrap(), SqlParam::Integer(-1));
        assert!(cast_value(year, "2022.5").is_err());
        assert!(cast_value(year, "").is_err());
        assert!(cast_value(year, " 2022").is_err());
    }

    #[test]
    fn cast_float() {
        let price = catalog::resolve("price").unwrap();
        assert_eq!(cast_value(price, "1000").unwrap(), SqlParam::Float(1000.0));
        assert_eq!(cast_value(price, "99.95").unwrap(), SqlParam::Float(99.95));
        assert_eq!(
            cast_value(price, "cheap").unwrap_err(),
            QueryError::invalid_value("price", "cheap", SqlType::Float)
        );
        assert!(cast_value(price, "NaN").is_err());
        assert!(cast_value(price, "inf").is_err());
    }
}
