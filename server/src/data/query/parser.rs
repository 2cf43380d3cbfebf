//! Web filter parsing
//!
//! Parses the JSON filter map sent by the search page into raw filters.
//! Column and operator validation happens later, during normalization.

use super::types::RawFilters;
use crate::data::error::QueryError;

/// Maximum size of filter JSON in bytes (64KB)
const MAX_FILTER_JSON_SIZE: usize = 64 * 1024;

/// Maximum number of filters allowed
const MAX_FILTERS: usize = 50;

/// Parse filters from JSON
///
/// Expected shape: `{"<filter>": [{"op": "<code>", "value": "<v>"}, ...], ...}`.
/// `values` (a list) may be used instead of `value`.
pub fn parse_filters(json_str: &str) -> Result<RawFilters, QueryError> {
    if json_str.len() > MAX_FILTER_JSON_SIZE {
        return Err(QueryError::FilterJsonTooLarge {
            max: MAX_FILTER_JSON_SIZE,
        });
    }

    let filters: RawFilters = serde_json::from_str(json_str)
        .map_err(|e| QueryError::InvalidFilterJson(e.to_string()))?;

    if filters.len() > MAX_FILTERS {
        return Err(QueryError::TooManyFilters { max: MAX_FILTERS });
    }

    tracing::trace!(filters = filters.len(), "Parsed web filters");
    Ok(filters)
}
