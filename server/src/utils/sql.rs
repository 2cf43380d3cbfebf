//! SQL utility functions

/// Count `?` placeholders in SQL text, ignoring those inside single-quoted literals
///
/// # Example
///
/// ```
/// use fmak_server::utils::sql::count_placeholders;
///
/// assert_eq!(count_placeholders("p.brand = ? and size <> '?'"), 1);
/// ```
pub fn count_placeholders(sql: &str) -> usize {
    let mut in_literal = false;
    let mut count = 0;
    for c in sql.chars() {
        match c {
            // '' inside a literal toggles twice, which leaves the state unchanged
            '\'' => in_literal = !in_literal,
            '?' if !in_literal => count += 1,
            _ => {}
        }
    }
    count
}
