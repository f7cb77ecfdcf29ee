//! Query-parameter projection of a filter map.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use super::FilterValue;
use super::Filters;

/// A flat query-string value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum QueryValue {
    /// Boolean, written as `true` or `false`.
    Bool(bool),
    /// Integer.
    Int(i64),
    /// Float, written in its shortest round-trip form.
    Float(f64),
    /// Text, including joined lists and JSON-encoded objects.
    String(String),
}

impl fmt::Display for QueryValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryValue::Bool(b) => write!(f, "{b}"),
            QueryValue::Int(n) => write!(f, "{n}"),
            QueryValue::Float(n) => write!(f, "{n}"),
            QueryValue::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(v: &str) -> Self {
        QueryValue::String(v.to_string())
    }
}

impl From<i64> for QueryValue {
    fn from(v: i64) -> Self {
        QueryValue::Int(v)
    }
}

impl From<bool> for QueryValue {
    fn from(v: bool) -> Self {
        QueryValue::Bool(v)
    }
}

/// Flat parameter map, ordered by key.
pub type QueryParams = BTreeMap<String, QueryValue>;

/// Projects filters to flat query parameters.
///
/// - null and `""` values are dropped, as are empty lists
/// - lists are joined with `,`
/// - objects are JSON-encoded
/// - scalars pass through unchanged
///
/// The projection is pure: the same filters always give the same map.
pub fn query_params(filters: &Filters) -> QueryParams {
    filters
        .iter()
        .filter_map(|(key, value)| project(value).map(|v| (key.clone(), v)))
        .collect()
}

fn project(value: &FilterValue) -> Option<QueryValue> {
    if value.is_blank() {
        return None;
    }
    match value {
        FilterValue::Null => None,
        FilterValue::String(s) => Some(QueryValue::String(s.clone())),
        FilterValue::Bool(b) => Some(QueryValue::Bool(*b)),
        FilterValue::Int(n) => Some(QueryValue::Int(*n)),
        FilterValue::Float(n) => Some(QueryValue::Float(*n)),
        // Display joins list items with ',' and JSON-encodes objects.
        FilterValue::List(_) | FilterValue::Object(_) => Some(QueryValue::String(value.to_string())),
    }
}

/// Encodes parameters as a URL query string (without the leading `?`).
pub fn to_query_string(params: &QueryParams) -> String {
    params
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                urlencoding::encode(key),
                urlencoding::encode(&value.to_string())
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product_filters() -> Filters {
        Filters::new()
            .with("search", "")
            .with("category", "All")
            .with("minPrice", 0)
            .with("maxPrice", 1000)
    }

    #[test]
    fn test_empty_string_dropped() {
        let params = query_params(&product_filters());
        assert_eq!(params.len(), 3);
        assert!(!params.contains_key("search"));
        assert_eq!(params["category"], QueryValue::from("All"));
        assert_eq!(params["minPrice"], QueryValue::Int(0));
        assert_eq!(params["maxPrice"], QueryValue::Int(1000));
    }

    #[test]
    fn test_null_dropped() {
        let filters = Filters::new().with("status", FilterValue::Null);
        assert!(query_params(&filters).is_empty());
    }

    #[test]
    fn test_list_joined() {
        let filters = Filters::new()
            .with("tags", vec!["a", "b"])
            .with("none", Vec::<String>::new());
        let params = query_params(&filters);
        assert_eq!(params["tags"], QueryValue::from("a,b"));
        assert!(!params.contains_key("none"));
    }

    #[test]
    fn test_object_json_encoded() {
        let mut range = BTreeMap::new();
        range.insert("max".to_string(), FilterValue::from(10));
        range.insert("min".to_string(), FilterValue::from(1));
        let filters = Filters::new().with("price", range);
        let params = query_params(&filters);
        assert_eq!(params["price"], QueryValue::from(r#"{"max":10,"min":1}"#));
    }

    #[test]
    fn test_projection_is_idempotent() {
        let filters = product_filters().with("tags", vec!["x", "y"]);
        assert_eq!(query_params(&filters), query_params(&filters));
    }

    #[test]
    fn test_query_string_encoding() {
        let filters = Filters::new()
            .with("search", "coffee maker")
            .with("active", true);
        let query = to_query_string(&query_params(&filters));
        assert_eq!(query, "active=true&search=coffee%20maker");
    }

    #[test]
    fn test_blank_values_are_the_dropped_ones() {
        let values = [
            FilterValue::Null,
            FilterValue::from(""),
            FilterValue::from(Vec::<String>::new()),
            FilterValue::from("x"),
            FilterValue::from(0),
            FilterValue::from(false),
            FilterValue::from(vec!["a"]),
        ];
        for value in values {
            assert_eq!(value.is_blank(), project(&value).is_none(), "{value:?}");
        }
    }
}
