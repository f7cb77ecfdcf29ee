//! Row trait and cell values.

use std::cmp::Ordering;
use std::fmt;
use std::hash::Hash;

/// Trait for records that can be displayed in a [`DataTable`](super::DataTable).
///
/// The table never inspects a row beyond these two methods: `key` identifies
/// the row on the current page, and `field` exposes the raw value a column
/// displays (and sorts by) when it has no custom renderer.
///
/// # Example
///
/// ```
/// use datagrid_lib::{CellValue, TableRow};
///
/// #[derive(Clone)]
/// struct Product {
///     id: String,
///     name: String,
///     price: f64,
/// }
///
/// impl TableRow for Product {
///     type Key = String;
///
///     fn key(&self) -> String {
///         self.id.clone()
///     }
///
///     fn field(&self, key: &str) -> CellValue {
///         match key {
///             "name" => self.name.as_str().into(),
///             "price" => self.price.into(),
///             _ => CellValue::Empty,
///         }
///     }
/// }
/// ```
pub trait TableRow: Clone + Send + Sync + 'static {
    /// The key type used to identify this row.
    type Key: Clone + Eq + Hash + fmt::Debug + fmt::Display + Send + Sync + 'static;

    /// Return a key unique within the current page.
    fn key(&self) -> Self::Key;

    /// Return the raw value of the field named `key`.
    fn field(&self, key: &str) -> CellValue;
}

/// A raw field value.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl CellValue {
    /// Total order used for client-side sorting.
    ///
    /// Empty sorts first, then booleans, then numbers (integers and floats
    /// compared numerically), then text.
    pub fn compare(&self, other: &CellValue) -> Ordering {
        use CellValue::*;
        match (self, other) {
            (Empty, Empty) => Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Int(a), Int(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (Int(a), Float(b)) => (*a as f64).total_cmp(b),
            (Float(a), Int(b)) => a.total_cmp(&(*b as f64)),
            (Text(a), Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            CellValue::Empty => 0,
            CellValue::Bool(_) => 1,
            CellValue::Int(_) | CellValue::Float(_) => 2,
            CellValue::Text(_) => 3,
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Int(n) => write!(f, "{n}"),
            CellValue::Float(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<bool> for CellValue {
    fn from(v: bool) -> Self {
        CellValue::Bool(v)
    }
}

impl From<i32> for CellValue {
    fn from(v: i32) -> Self {
        CellValue::Int(v.into())
    }
}

impl From<i64> for CellValue {
    fn from(v: i64) -> Self {
        CellValue::Int(v)
    }
}

impl From<u32> for CellValue {
    fn from(v: u32) -> Self {
        CellValue::Int(v.into())
    }
}

impl From<f64> for CellValue {
    fn from(v: f64) -> Self {
        CellValue::Float(v)
    }
}

impl From<String> for CellValue {
    fn from(v: String) -> Self {
        CellValue::Text(v)
    }
}

impl From<&str> for CellValue {
    fn from(v: &str) -> Self {
        CellValue::Text(v.to_string())
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(CellValue::Empty)
    }
}
