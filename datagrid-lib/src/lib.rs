//! Generic paginated data table
//!
//! A headless table controller: a pagination state machine, a filter store
//! with a query-parameter projection, and a generic table over caller rows
//! that fetches pages through an injected async [`source::DataSource`].

pub mod config;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod source;
pub mod table;

pub use config::TableConfig;
pub use error::{ConfigError, FetchError, TableError};
pub use filter::{FilterStore, FilterValue, Filters};
pub use pagination::{PaginationController, PaginationParams};
pub use source::{DataSource, MemorySource, Page};
pub use table::{
    BulkAction, CellValue, Column, DataTable, LoadOutcome, RowAction, TableRow, TableStatus,
    TableView,
};
