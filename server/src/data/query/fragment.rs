//! SQL fragments
//!
//! A fragment is a piece of SQL text together with the parameters for the
//! placeholders it contains. Fragments are values: combining two of them
//! returns a new fragment and leaves the inputs untouched.

use super::types::{ParameterizedStatement, SqlParam};

/// Piece of SQL text with the parameters of its placeholders
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SqlFragment {
    sql: String,
    params: Vec<SqlParam>,
}

impl SqlFragment {
    /// Fragment without placeholders
    pub fn raw(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            params: Vec::new(),
        }
    }

    /// Fragment containing exactly one placeholder bound to `param`
    pub fn bound(sql: impl Into<String>, param: SqlParam) -> Self {
        Self {
            sql: sql.into(),
            params: vec![param],
        }
    }

    pub fn sql(&self) -> &str {
        &self.sql
    }

    pub fn params(&self) -> &[SqlParam] {
        &self.params
    }

    pub fn is_empty(&self) -> bool {
        self.sql.is_empty()
    }

    /// This fragment followed by `other`
    pub fn then(self, other: SqlFragment) -> Self {
        let mut sql = self.sql;
        sql.push_str(&other.sql);
        let mut params = self.params;
        params.extend(other.params);
        Self { sql, params }
    }

    /// Join fragments with `separator`, keeping parameter order
    pub fn join<I>(fragments: I, separator: &str) -> Self
    where
        I: IntoIterator<Item = SqlFragment>,
    {
        fragments
            .into_iter()
            .enumerate()
            .fold(Self::default(), |acc, (i, fragment)| {
                if i == 0 {
                    acc.then(fragment)
                } else {
                    acc.then(Self::raw(separator)).then(fragment)
                }
            })
    }

    /// Wrap in parentheses: `( <sql> )`
    pub fn parenthesized(self) -> Self {
        Self::raw("( ").then(self).then(Self::raw(" )"))
    }

    pub fn into_statement(self) -> ParameterizedStatement {
        ParameterizedStatement {
            sql: self.sql,
            params: self.params,
        }
    }
}

/// Mutable convenience wrapper over [`SqlFragment::then`]
#[derive(Debug, Default)]
pub struct FragmentBuilder {
    inner: SqlFragment,
}

impl FragmentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(mut self, sql: &str) -> Self {
        self.inner = std::mem::take(&mut self.inner).then(SqlFragment::raw(sql));
        self
    }

    pub fn append_param(mut self, sql: &str, param: SqlParam) -> Self {
        self.inner = std::mem::take(&mut self.inner).then(SqlFragment::bound(sql, param));
        self
    }

    pub fn append_fragment(mut self, fragment: SqlFragment) -> Self {
        self.inner = std::mem::take(&mut self.inner).then(fragment);
        self
    }

    pub fn build(self) -> ParameterizedStatement {
        self.inner.into_statement()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn then_concatenates_text_and_params() {
        let left = SqlFragment::bound("p.brand = ?", SqlParam::text("duotone"));
        let right = SqlFragment::bound(" and p.year = ?", SqlParam::Integer(2022));
        let combined = left.clone().then(right);

        assert_eq!(combined.sql(), "p.brand = ? and p.year = ?");
        assert_eq!(
            combined.params(),
            &[SqlParam::text("duotone"), SqlParam::Integer(2022)]
        );
        // inputs are values, the receiver is left unchanged
        assert_eq!(left.sql(), "p.brand = ?");
    }

    #[test]
    fn join_with_separator() {
        let parts = vec![
            SqlFragment::bound("a.size = ?", SqlParam::text("9")),
            SqlFragment::bound("a.size = ?", SqlParam::text("10")),
            SqlFragment::bound("a.size = ?", SqlParam::text("12")),
        ];
        let joined = SqlFragment::join(parts, " or ");

        assert_eq!(joined.sql(), "a.size = ? or a.size = ? or a.size = ?");
        assert_eq!(
            joined.params(),
            &[
                SqlParam::text("9"),
                SqlParam::text("10"),
                SqlParam::text("12")
            ]
        );
    }

    #[test]
    fn join_empty() {
        let joined = SqlFragment::join(Vec::new(), " and ");
        assert!(joined.is_empty());
        assert!(joined.params().is_empty());
    }

    #[test]
    fn parenthesized() {
        let group = SqlFragment::bound("p.brand = ?", SqlParam::text("north")).parenthesized();
        assert_eq!(group.sql(), "( p.brand = ? )");
    }

    #[test]
    fn builder_wraps_fold() {
        let stmt = FragmentBuilder::new()
            .append("select")
            .append(" p.link")
            .append_fragment(SqlFragment::bound(" where p.year = ?", SqlParam::Integer(2020)))
            .append_param(" limit ?", SqlParam::Integer(21))
            .build();

        assert_eq!(stmt.sql, "select p.link where p.year = ? limit ?");
        assert_eq!(stmt.params, vec![SqlParam::Integer(2020), SqlParam::Integer(21)]);
        assert!(stmt.is_consistent());
    }
}
