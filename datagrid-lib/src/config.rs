//! Table configuration

use std::path::Path;

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// Initial pagination settings for a [`DataTable`](crate::table::DataTable).
///
/// # Example
///
/// ```
/// use datagrid_lib::TableConfig;
///
/// let config = TableConfig::default()
///     .with_page_size(5)
///     .with_page_size_options(vec![5, 10, 20]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TableConfig {
    /// Page shown after mount.
    ///
    /// Default: 1
    pub initial_page: usize,

    /// Rows requested per page.
    ///
    /// Default: 10
    pub page_size: usize,

    /// Page sizes offered by the page size selector.
    ///
    /// Default: 5, 10, 25, 50
    pub page_size_options: Vec<usize>,
}

impl Default for TableConfig {
    fn default() -> Self {
        Self {
            initial_page: 1,
            page_size: 10,
            page_size_options: vec![5, 10, 25, 50],
        }
    }
}

impl TableConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the initial page.
    pub fn with_initial_page(mut self, page: usize) -> Self {
        self.initial_page = page;
        self
    }

    /// Sets the page size.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the page size options.
    pub fn with_page_size_options(mut self, options: Vec<usize>) -> Self {
        self.page_size_options = options;
        self
    }

    /// Loads and validates a config from a JSON file.
    ///
    /// Missing fields take their default values.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    /// Parses and validates a config from a JSON string.
    pub fn from_json_str(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.initial_page == 0 {
            return Err(ConfigError::Invalid("initialPage must be at least 1".into()));
        }
        if self.page_size == 0 {
            return Err(ConfigError::Invalid("pageSize must be greater than 0".into()));
        }
        if self.page_size_options.is_empty() {
            return Err(ConfigError::Invalid("pageSizeOptions must not be empty".into()));
        }
        if self.page_size_options.contains(&0) {
            return Err(ConfigError::Invalid(
                "pageSizeOptions must only hold positive sizes".into(),
            ));
        }
        Ok(())
    }

    /// Page size options, sorted and deduplicated, always including the
    /// configured page size.
    pub fn resolved_page_size_options(&self) -> Vec<usize> {
        let mut options: Vec<usize> = self
            .page_size_options
            .iter()
            .copied()
            .filter(|size| *size > 0)
            .collect();
        if self.page_size > 0 {
            options.push(self.page_size);
        }
        options.sort_unstable();
        options.dedup();
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_use_defaults() {
        let config = TableConfig::from_json_str(r#"{"pageSize": 5}"#).unwrap();
        assert_eq!(config.initial_page, 1);
        assert_eq!(config.page_size, 5);
        assert_eq!(config.page_size_options, vec![5, 10, 25, 50]);
    }

    #[test]
    fn test_zero_page_size_is_invalid() {
        let err = TableConfig::from_json_str(r#"{"pageSize": 0}"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_malformed_json() {
        let err = TableConfig::from_json_str("{pageSize").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_resolved_options_include_page_size() {
        let config = TableConfig::default()
            .with_page_size(20)
            .with_page_size_options(vec![50, 10, 10]);
        assert_eq!(config.resolved_page_size_options(), vec![10, 20, 50]);
    }
}
