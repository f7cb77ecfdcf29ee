//! Row actions, bulk actions and CRUD hook handlers.
//!
//! The table only invokes these; it never mutates its own rows in response.
//! A handler that changes the backing store is expected to refresh the table.

use std::fmt;
use std::sync::Arc;

use crate::error::FetchError;
use crate::filter::FilterChangeHandler;

pub type Handler = Arc<dyn Fn() + Send + Sync>;
pub type RowHandler<T> = Arc<dyn Fn(&T) + Send + Sync>;
pub type RowPredicate<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
pub type BulkHandler<T> = Arc<dyn Fn(&[T]) + Send + Sync>;
pub type ErrorHandler = Arc<dyn Fn(&FetchError) + Send + Sync>;

/// A labelled per-row action, optionally shown only for some rows.
pub struct RowAction<T> {
    label: String,
    on_click: RowHandler<T>,
    condition: Option<RowPredicate<T>>,
}

impl<T> RowAction<T> {
    pub fn new(label: impl Into<String>, on_click: impl Fn(&T) + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            on_click: Arc::new(on_click),
            condition: None,
        }
    }

    /// Only offer the action for rows where `condition` returns `true`.
    pub fn when(mut self, condition: impl Fn(&T) -> bool + Send + Sync + 'static) -> Self {
        self.condition = Some(Arc::new(condition));
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// `true` if the action has no condition or the condition accepts `row`.
    pub fn is_available(&self, row: &T) -> bool {
        self.condition.as_ref().is_none_or(|condition| condition(row))
    }

    pub(crate) fn invoke(&self, row: &T) {
        (self.on_click)(row)
    }
}

impl<T> Clone for RowAction<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            on_click: Arc::clone(&self.on_click),
            condition: self.condition.clone(),
        }
    }
}

impl<T> fmt::Debug for RowAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowAction")
            .field("label", &self.label)
            .field("conditional", &self.condition.is_some())
            .finish()
    }
}

/// A labelled action over the selected rows.
pub struct BulkAction<T> {
    label: String,
    on_click: BulkHandler<T>,
}

impl<T> BulkAction<T> {
    pub fn new(label: impl Into<String>, on_click: impl Fn(&[T]) + Send + Sync + 'static) -> Self {
        Self {
            label: label.into(),
            on_click: Arc::new(on_click),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub(crate) fn invoke(&self, rows: &[T]) {
        (self.on_click)(rows)
    }
}

impl<T> Clone for BulkAction<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            on_click: Arc::clone(&self.on_click),
        }
    }
}

impl<T> fmt::Debug for BulkAction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BulkAction")
            .field("label", &self.label)
            .finish()
    }
}

/// Every caller-supplied callback of a table. Immutable once built.
pub(crate) struct Handlers<T> {
    pub on_create: Option<Handler>,
    pub on_edit: Option<RowHandler<T>>,
    pub on_delete: Option<RowHandler<T>>,
    pub on_view: Option<RowHandler<T>>,
    pub on_row_click: Option<RowHandler<T>>,
    pub on_export: Option<Handler>,
    pub on_import: Option<Handler>,
    pub on_error: Option<ErrorHandler>,
    pub on_filter_change: Option<FilterChangeHandler>,
    pub actions: Vec<RowAction<T>>,
    pub bulk_actions: Vec<BulkAction<T>>,
}

impl<T> Default for Handlers<T> {
    fn default() -> Self {
        Self {
            on_create: None,
            on_edit: None,
            on_delete: None,
            on_view: None,
            on_row_click: None,
            on_export: None,
            on_import: None,
            on_error: None,
            on_filter_change: None,
            actions: Vec::new(),
            bulk_actions: Vec::new(),
        }
    }
}

impl<T> Handlers<T> {
    /// `true` if rows get an actions column.
    pub fn has_row_actions(&self) -> bool {
        self.on_view.is_some()
            || self.on_edit.is_some()
            || self.on_delete.is_some()
            || !self.actions.is_empty()
    }

    /// Labels of the actions offered for `row`, in display order.
    pub fn row_action_labels(&self, row: &T) -> Vec<String> {
        let mut labels = Vec::new();
        if self.on_view.is_some() {
            labels.push("View".to_string());
        }
        if self.on_edit.is_some() {
            labels.push("Edit".to_string());
        }
        if self.on_delete.is_some() {
            labels.push("Delete".to_string());
        }
        labels.extend(
            self.actions
                .iter()
                .filter(|action| action.is_available(row))
                .map(|action| action.label.clone()),
        );
        labels
    }

    pub fn action(&self, label: &str) -> Option<&RowAction<T>> {
        self.actions.iter().find(|action| action.label == label)
    }

    pub fn bulk_action(&self, label: &str) -> Option<&BulkAction<T>> {
        self.bulk_actions.iter().find(|action| action.label == label)
    }
}
