//! The data table: columns, rows, sorting, selection, hooks and the view.

mod actions;
mod builder;
mod column;
mod row;
mod selection;
mod sort;
mod state;
mod view;

pub use actions::{
    BulkAction, BulkHandler, ErrorHandler, Handler, RowAction, RowHandler, RowPredicate,
};
pub use builder::DataTableBuilder;
pub use column::{CellRenderer, Column, ColumnWidth};
pub use row::{CellValue, TableRow};
pub use selection::Selection;
pub use sort::{SortDirection, SortState, sort_rows};
pub use state::{DataTable, LoadOutcome, TableId, TableStatus};
pub use view::{
    BodyView, EMPTY_MESSAGE, FooterView, HeaderCell, RowView, TableView, ToolbarView,
};
