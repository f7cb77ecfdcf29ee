//! Filter criteria for table queries.
//!
//! [`Filters`] is the key/value map a data source receives; [`FilterStore`]
//! owns the current map, the map it was constructed with, and an optional
//! change callback.

mod query;
mod store;
mod value;

pub use query::*;
pub use store::*;
pub use value::*;

use std::collections::BTreeMap;

use serde::Deserialize;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// A map from filter name to current value.
///
/// # Example
///
/// ```
/// use datagrid_lib::Filters;
///
/// let filters = Filters::new()
///     .with("category", "Books")
///     .with("maxPrice", 50);
///
/// assert_eq!(filters.get("category").and_then(|v| v.as_str()), Some("Books"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Filters(BTreeMap<String, FilterValue>);

impl Filters {
    /// Creates an empty filter map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a value, builder style.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Converts a typed filter struct into a filter map.
    ///
    /// The struct must serialize to a JSON object.
    pub fn from_typed<F: Serialize>(filters: &F) -> Result<Self, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(filters)?)
    }

    /// Decodes this map into a typed filter struct.
    pub fn decode<F: DeserializeOwned>(&self) -> Result<F, serde_json::Error> {
        serde_json::from_value(serde_json::to_value(self)?)
    }

    /// Returns the value for a key.
    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.0.get(key)
    }

    /// Returns the string value for a key, if it is a string.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(FilterValue::as_str)
    }

    /// Returns the numeric value for a key, widening integers.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(FilterValue::as_f64)
    }

    /// Returns `true` if the key is present (even with a null value).
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Sets a value, returning the previous one.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> Option<FilterValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes a key entirely.
    pub fn remove(&mut self, key: &str) -> Option<FilterValue> {
        self.0.remove(key)
    }

    /// Shallow-merges `partial` into this map; keys in `partial` win.
    pub fn merge(&mut self, partial: Filters) {
        self.0.extend(partial.0);
    }

    /// Returns the number of keys.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if no keys are set.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over entries in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FilterValue)> {
        self.0.iter()
    }

    /// Flat query parameters for this map. See [`query_params`].
    pub fn query_params(&self) -> QueryParams {
        query_params(self)
    }
}

impl<K: Into<String>, V: Into<FilterValue>> FromIterator<(K, V)> for Filters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

impl From<BTreeMap<String, FilterValue>> for Filters {
    fn from(map: BTreeMap<String, FilterValue>) -> Self {
        Self(map)
    }
}

impl<'a> IntoIterator for &'a Filters {
    type Item = (&'a String, &'a FilterValue);
    type IntoIter = std::collections::btree_map::Iter<'a, String, FilterValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use serde::Serialize;

    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct ProductFilters {
        search: String,
        category: String,
        min_price: f64,
        max_price: f64,
        tags: Vec<String>,
    }

    #[test]
    fn test_typed_round_trip() {
        let typed = ProductFilters {
            search: "lap".into(),
            category: "Electronics".into(),
            min_price: 0.0,
            max_price: 999.5,
            tags: vec!["new".into()],
        };
        let filters = Filters::from_typed(&typed).unwrap();
        assert_eq!(filters.get_str("category"), Some("Electronics"));
        assert_eq!(filters.get_f64("maxPrice"), Some(999.5));
        assert_eq!(filters.decode::<ProductFilters>().unwrap(), typed);
    }

    #[test]
    fn test_integer_filters_decode_into_floats() {
        let filters = Filters::new()
            .with("search", "")
            .with("category", "All")
            .with("minPrice", 0)
            .with("maxPrice", 1000)
            .with("tags", Vec::<String>::new());
        let typed: ProductFilters = filters.decode().unwrap();
        assert_eq!(typed.max_price, 1000.0);
    }

    #[test]
    fn test_non_object_is_rejected() {
        assert!(Filters::from_typed(&vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_merge_keeps_other_keys() {
        let mut filters = Filters::new().with("a", 1).with("b", 2);
        filters.merge(Filters::new().with("b", 3).with("c", 4));
        assert_eq!(filters.get("a"), Some(&FilterValue::Int(1)));
        assert_eq!(filters.get("b"), Some(&FilterValue::Int(3)));
        assert_eq!(filters.get("c"), Some(&FilterValue::Int(4)));
    }
}
