//! Filter store with change notification.

use std::fmt;
use std::sync::Arc;

use log::trace;

use super::FilterValue;
use super::Filters;
use super::QueryParams;

/// Callback invoked with the full filter map after every change.
pub type FilterChangeHandler = Arc<dyn Fn(&Filters) + Send + Sync>;

/// Holds the current filters and the filters it was constructed with.
///
/// Every mutation notifies the change handler exactly once, so multi-field
/// updates through [`update_filters`](Self::update_filters) are seen as a
/// single change.
#[derive(Clone)]
pub struct FilterStore {
    initial: Filters,
    current: Filters,
    on_change: Option<FilterChangeHandler>,
}

impl FilterStore {
    /// Creates a store whose current and initial filters are `initial`.
    pub fn new(initial: Filters) -> Self {
        Self {
            current: initial.clone(),
            initial,
            on_change: None,
        }
    }

    /// Sets the change handler.
    pub fn with_on_change(mut self, handler: impl Fn(&Filters) + Send + Sync + 'static) -> Self {
        self.on_change = Some(Arc::new(handler));
        self
    }

    /// Current filters.
    pub fn filters(&self) -> &Filters {
        &self.current
    }

    /// Filters supplied at construction.
    pub fn initial(&self) -> &Filters {
        &self.initial
    }

    /// Replaces the value for `key`, keeping all other keys.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        let key = key.into();
        trace!("[filters] set {}", key);
        self.current.insert(key, value);
        self.notify();
    }

    /// Shallow-merges `partial` into the current filters in one change.
    pub fn update_filters(&mut self, partial: Filters) {
        trace!("[filters] update {} key(s)", partial.len());
        self.current.merge(partial);
        self.notify();
    }

    /// Restores the filters supplied at construction.
    pub fn reset_filters(&mut self) {
        trace!("[filters] reset");
        self.current = self.initial.clone();
        self.notify();
    }

    /// Deletes `key` entirely, returning its value.
    pub fn remove_filter(&mut self, key: &str) -> Option<FilterValue> {
        trace!("[filters] remove {}", key);
        let removed = self.current.remove(key);
        self.notify();
        removed
    }

    /// Flat query parameters for the current filters.
    pub fn query_params(&self) -> QueryParams {
        self.current.query_params()
    }

    fn notify(&self) {
        if let Some(handler) = &self.on_change {
            handler(&self.current);
        }
    }
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(Filters::new())
    }
}

impl fmt::Debug for FilterStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterStore")
            .field("initial", &self.initial)
            .field("current", &self.current)
            .field("on_change", &self.on_change.is_some())
            .finish()
    }
}
