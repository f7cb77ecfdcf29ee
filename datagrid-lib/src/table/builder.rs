//! DataTable builder.

use std::sync::Arc;

use log::debug;

use crate::config::TableConfig;
use crate::error::{FetchError, TableError};
use crate::filter::{FilterStore, Filters};
use crate::pagination::PaginationController;
use crate::source::DataSource;

use super::actions::{BulkAction, Handlers, RowAction};
use super::column::{Column, check_unique_keys};
use super::row::TableRow;
use super::state::{DataTable, TableInner};

/// Builder for [`DataTable`].
///
/// # Example
///
/// ```ignore
/// let table = DataTable::builder(source)
///     .column(Column::new("name", "Name").sortable())
///     .column(Column::new("price", "Price").render(|p: &Product, _| format!("${:.2}", p.price)))
///     .page_size(10)
///     .filters(Filters::new().with("category", ""))
///     .on_delete(|product: &Product| println!("delete {}", product.id))
///     .build()?;
///
/// table.load().await;
/// ```
pub struct DataTableBuilder<T: TableRow> {
    source: Arc<dyn DataSource<T>>,
    columns: Vec<Column<T>>,
    config: TableConfig,
    filters: Filters,
    handlers: Handlers<T>,
}

impl<T: TableRow> DataTable<T> {
    /// Start building a table that fetches through `source`.
    pub fn builder(source: impl DataSource<T> + 'static) -> DataTableBuilder<T> {
        DataTableBuilder::new(Arc::new(source))
    }
}

impl<T: TableRow> DataTableBuilder<T> {
    /// Start from an already shared source.
    pub fn new(source: Arc<dyn DataSource<T>>) -> Self {
        Self {
            source,
            columns: Vec::new(),
            config: TableConfig::default(),
            filters: Filters::new(),
            handlers: Handlers::default(),
        }
    }

    /// Append a column.
    pub fn column(mut self, column: Column<T>) -> Self {
        self.columns.push(column);
        self
    }

    /// Append several columns.
    pub fn columns(mut self, columns: impl IntoIterator<Item = Column<T>>) -> Self {
        self.columns.extend(columns);
        self
    }

    /// Replace the pagination defaults.
    pub fn config(mut self, config: TableConfig) -> Self {
        self.config = config;
        self
    }

    /// 1-based page fetched by the first `load`.
    pub fn initial_page(mut self, page: usize) -> Self {
        self.config.initial_page = page;
        self
    }

    /// Rows requested per page.
    pub fn page_size(mut self, size: usize) -> Self {
        self.config.page_size = size;
        self
    }

    /// Page sizes offered by the footer.
    pub fn page_size_options(mut self, options: Vec<usize>) -> Self {
        self.config.page_size_options = options;
        self
    }

    /// Initial filters, restored by `reset_filters`.
    pub fn filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Called with the new filters after every filter change, before the
    /// resulting load is polled. The table is unlocked by then, so the
    /// handler may read it.
    pub fn on_filter_change(
        mut self,
        handler: impl Fn(&Filters) + Send + Sync + 'static,
    ) -> Self {
        self.handlers.on_filter_change = Some(Arc::new(handler));
        self
    }

    /// Enables the create button.
    pub fn on_create(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.handlers.on_create = Some(Arc::new(handler));
        self
    }

    /// Adds an Edit action to every row.
    pub fn on_edit(mut self, handler: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.handlers.on_edit = Some(Arc::new(handler));
        self
    }

    /// Adds a Delete action to every row.
    pub fn on_delete(mut self, handler: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.handlers.on_delete = Some(Arc::new(handler));
        self
    }

    /// Adds a View action to every row.
    pub fn on_view(mut self, handler: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.handlers.on_view = Some(Arc::new(handler));
        self
    }

    /// Called with the row when a row is clicked.
    pub fn on_row_click(mut self, handler: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.handlers.on_row_click = Some(Arc::new(handler));
        self
    }

    /// Enables the export button.
    pub fn on_export(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.handlers.on_export = Some(Arc::new(handler));
        self
    }

    /// Enables the import button.
    pub fn on_import(mut self, handler: impl Fn() + Send + Sync + 'static) -> Self {
        self.handlers.on_import = Some(Arc::new(handler));
        self
    }

    /// Called with the error of every failed load that was not superseded.
    pub fn on_error(mut self, handler: impl Fn(&FetchError) + Send + Sync + 'static) -> Self {
        self.handlers.on_error = Some(Arc::new(handler));
        self
    }

    /// Add a custom per-row action.
    pub fn action(mut self, action: RowAction<T>) -> Self {
        self.handlers.actions.push(action);
        self
    }

    /// Add a bulk action over the selected rows. Enables the selection
    /// column.
    pub fn bulk_action(mut self, action: BulkAction<T>) -> Self {
        self.handlers.bulk_actions.push(action);
        self
    }

    /// Validate and build. Nothing is fetched until `load` is called.
    pub fn build(self) -> Result<DataTable<T>, TableError> {
        check_unique_keys(&self.columns)?;
        let pagination =
            PaginationController::new(self.config.initial_page, self.config.page_size, 0);
        let inner = TableInner::new(
            self.columns,
            FilterStore::new(self.filters),
            pagination,
            self.config.resolved_page_size_options(),
        );
        let table = DataTable::from_parts(self.source, self.handlers, inner);
        debug!(
            "[{}] built: page {}, page size {}",
            table.id(),
            pagination.page(),
            pagination.page_size()
        );
        Ok(table)
    }
}
