//! Table error types

/// Errors from building a table or invoking one of its hook points.
///
/// Out-of-range pagination input is not an error; it is clamped or ignored
/// by [`PaginationController`](crate::pagination::PaginationController).
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    /// Two columns share the same key.
    #[error("Duplicate column key: {0}")]
    DuplicateColumn(String),

    /// No row with this key is in the current row array.
    #[error("No row with key {0} on the current page")]
    UnknownRow(String),

    /// No row or bulk action is registered under this label.
    #[error("Unknown action: {0}")]
    UnknownAction(String),

    /// The action's condition rejects the row.
    #[error("Action {label} is not available for row {row}")]
    ActionUnavailable {
        /// Action label.
        label: String,
        /// Row key.
        row: String,
    },

    /// The hook was invoked but no handler was registered for it.
    #[error("No {0} handler registered")]
    MissingHandler(&'static str),

    /// A bulk action was invoked with nothing selected on the current page.
    #[error("Bulk action {0} needs a non-empty selection")]
    EmptySelection(String),

    /// Typed filters could not be converted.
    #[error("Filter conversion failed: {0}")]
    Filters(#[from] serde_json::Error),
}
