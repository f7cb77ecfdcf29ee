//! Value enum for filter criteria

use std::collections::BTreeMap;
use std::fmt;

use serde::Deserialize;
use serde::Serialize;

/// A dynamic filter value.
///
/// Filter shapes are defined by the caller, so the store keeps values in
/// this JSON-like form. Typed filter structs convert in and out through
/// [`Filters::from_typed`](super::Filters::from_typed) and
/// [`Filters::decode`](super::Filters::decode).
///
/// # Example
///
/// ```
/// use datagrid_lib::FilterValue;
///
/// let search = FilterValue::from("laptop");
/// let max_price = FilterValue::from(1000);
/// let tags = FilterValue::from(vec!["a", "b"]);
/// let unset = FilterValue::Null;
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// No value.
    #[default]
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Floating point value.
    Float(f64),
    /// String value.
    String(String),
    /// List of values (multi-select filters).
    List(Vec<FilterValue>),
    /// Nested object (range or compound filters).
    Object(BTreeMap<String, FilterValue>),
}

impl FilterValue {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, FilterValue::Null)
    }

    /// Returns `true` for values a query leaves out: null, the empty string
    /// and the empty list.
    pub fn is_blank(&self) -> bool {
        match self {
            FilterValue::Null => true,
            FilterValue::String(s) => s.is_empty(),
            FilterValue::List(items) => items.is_empty(),
            _ => false,
        }
    }

    /// Returns the string value, if this is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FilterValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the value as a float, widening integers.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FilterValue::Int(n) => Some(*n as f64),
            FilterValue::Float(n) => Some(*n),
            _ => None,
        }
    }
}

/// Plain text form: strings unquoted, lists comma-joined, objects as JSON.
impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Null => Ok(()),
            FilterValue::Bool(b) => write!(f, "{b}"),
            FilterValue::Int(n) => write!(f, "{n}"),
            FilterValue::Float(n) => write!(f, "{n}"),
            FilterValue::String(s) => f.write_str(s),
            FilterValue::List(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
            FilterValue::Object(_) => {
                let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
                f.write_str(&json)
            }
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        FilterValue::Bool(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        FilterValue::Int(v.into())
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        FilterValue::Int(v)
    }
}

impl From<u32> for FilterValue {
    fn from(v: u32) -> Self {
        FilterValue::Int(v.into())
    }
}

impl From<usize> for FilterValue {
    fn from(v: usize) -> Self {
        i64::try_from(v)
            .map(FilterValue::Int)
            .unwrap_or(FilterValue::Float(v as f64))
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        FilterValue::Float(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        FilterValue::String(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        FilterValue::String(v.to_string())
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(v: Vec<T>) -> Self {
        FilterValue::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(FilterValue::Null)
    }
}

impl From<BTreeMap<String, FilterValue>> for FilterValue {
    fn from(v: BTreeMap<String, FilterValue>) -> Self {
        FilterValue::Object(v)
    }
}
