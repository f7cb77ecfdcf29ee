//! Table controller state.

use std::sync::Arc;
use std::sync::RwLock;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use futures::FutureExt;
use futures::future::{self, BoxFuture};
use log::{debug, trace, warn};

use crate::error::{FetchError, TableError};
use crate::filter::{FilterStore, FilterValue, Filters, QueryParams, to_query_string};
use crate::pagination::{PaginationController, PaginationParams};
use crate::source::{DataSource, Page};

use super::actions::{Handlers, RowHandler};
use super::column::Column;
use super::row::TableRow;
use super::selection::Selection;
use super::sort::{SortState, sort_rows};

/// Unique identifier for a DataTable instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TableId(usize);

impl TableId {
    fn new() -> Self {
        static COUNTER: AtomicUsize = AtomicUsize::new(0);
        Self(COUNTER.fetch_add(1, Ordering::SeqCst))
    }
}

impl std::fmt::Display for TableId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "table-{}", self.0)
    }
}

/// Where the table is in its fetch cycle.
///
/// `Idle` only before the first load. Every query-changing mutation moves
/// to `Loading`; the latest response moves to `Success` or `Error`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TableStatus {
    /// Built but never loaded.
    #[default]
    Idle,
    /// A load was issued and has not committed yet.
    Loading,
    /// The latest load replaced the rows.
    Success,
    /// The latest load failed; the previous rows are kept.
    Error,
}

/// Result of one issued load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response was the latest issued and replaced the rows.
    Applied {
        /// Rows on the fetched page.
        rows: usize,
        /// Total matching rows reported by the source.
        total: usize,
    },
    /// The latest request failed; the message is now the table's error.
    Failed(String),
    /// A newer request was issued before this one completed; the response
    /// was discarded.
    Superseded,
    /// The mutation was ignored (e.g. an out-of-range page), so nothing was
    /// fetched.
    Skipped,
}

/// Internal state for the DataTable.
pub(super) struct TableInner<T: TableRow> {
    pub columns: Vec<Column<T>>,
    /// Rows of the last successful fetch, in source order.
    pub rows: Vec<T>,
    pub filters: FilterStore,
    pub pagination: PaginationController,
    pub page_size_options: Vec<usize>,
    pub sort: SortState,
    pub selection: Selection<T::Key>,
    pub status: TableStatus,
    pub error: Option<Arc<FetchError>>,
    /// Id of the most recently issued request.
    pub latest_request: u64,
    /// Status and pagination as of the last commit; restored when the
    /// latest load is dropped before it commits.
    pub settled: TableStatus,
    pub committed: PaginationController,
}

impl<T: TableRow> TableInner<T> {
    pub fn new(
        columns: Vec<Column<T>>,
        filters: FilterStore,
        pagination: PaginationController,
        page_size_options: Vec<usize>,
    ) -> Self {
        Self {
            columns,
            rows: Vec::new(),
            filters,
            pagination,
            page_size_options,
            sort: SortState::default(),
            selection: Selection::new(),
            status: TableStatus::Idle,
            error: None,
            latest_request: 0,
            settled: TableStatus::Idle,
            committed: pagination,
        }
    }

    pub fn column(&self, key: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|column| column.key() == key)
    }

    pub fn visible_keys(&self) -> Vec<T::Key> {
        self.rows.iter().map(TableRow::key).collect()
    }

    pub fn find_row(&self, key: &T::Key) -> Option<&T> {
        self.rows.iter().find(|row| &row.key() == key)
    }

    /// Rows in display order: sorted by the active sort column, if any.
    pub fn display_rows(&self) -> Vec<T> {
        let mut rows = self.rows.clone();
        if let Some(column) = self.sort.key().and_then(|key| self.column(key)) {
            sort_rows(&mut rows, column, self.sort.direction());
        }
        rows
    }

    /// Selected rows still present in the current row array.
    pub fn selected_rows(&self) -> Vec<T> {
        self.rows
            .iter()
            .filter(|row| self.selection.is_selected(&row.key()))
            .cloned()
            .collect()
    }
}

/// Snapshot of the query a load was issued for.
struct Request {
    id: u64,
    filters: Filters,
    page: usize,
    page_size: usize,
}

/// Owned by a load future. If the future is dropped before its request
/// commits while it is still the latest, the table leaves `Loading` and
/// returns to the last committed page.
struct PendingLoad<T: TableRow> {
    table: DataTable<T>,
    request: u64,
}

impl<T: TableRow> Drop for PendingLoad<T> {
    fn drop(&mut self) {
        if let Ok(mut guard) = self.table.inner.write()
            && guard.latest_request == self.request
            && guard.status == TableStatus::Loading
        {
            guard.status = guard.settled;
            guard.pagination = guard.committed;
            self.table.dirty.store(true, Ordering::SeqCst);
            debug!(
                "[{}] request #{} abandoned, back to {:?} on page {}",
                self.table.id,
                self.request,
                guard.status,
                guard.pagination.page()
            );
        }
    }
}

/// A generic paginated table over rows of type `T`.
///
/// `DataTable<T>` owns a [`FilterStore`], a [`PaginationController`], the
/// sort state and the row selection, and fetches pages through a
/// [`DataSource`]. It is a handle: clones share state.
///
/// Query-changing mutators (`load`, `refresh`, filter and page changes)
/// apply their change synchronously, move the table to
/// [`TableStatus::Loading`] and return a future that performs the fetch and
/// commits the result. Await it, or hand it to `tokio::spawn`: nothing is
/// fetched until the future is polled. Dropping the most recent load before
/// it completes returns the table to its last committed status and page.
/// Only the most recently issued load may commit; older responses are
/// discarded, so the last request wins regardless of completion order.
///
/// Sorting and selection are client-side and never fetch. Sorting applies
/// to the rows of the current page only.
pub struct DataTable<T: TableRow> {
    id: TableId,
    source: Arc<dyn DataSource<T>>,
    pub(super) handlers: Arc<Handlers<T>>,
    pub(super) inner: Arc<RwLock<TableInner<T>>>,
    dirty: Arc<AtomicBool>,
}

impl<T: TableRow> DataTable<T> {
    pub(super) fn from_parts(
        source: Arc<dyn DataSource<T>>,
        handlers: Handlers<T>,
        inner: TableInner<T>,
    ) -> Self {
        Self {
            id: TableId::new(),
            source,
            handlers: Arc::new(handlers),
            inner: Arc::new(RwLock::new(inner)),
            dirty: Arc::new(AtomicBool::new(true)),
        }
    }

    /// Get the unique ID.
    pub fn id(&self) -> TableId {
        self.id
    }

    // -------------------------------------------------------------------------
    // Loading
    // -------------------------------------------------------------------------

    /// Fetches the current query. Call once after building (mount).
    #[must_use = "the load only runs when awaited or spawned"]
    pub fn load(&self) -> BoxFuture<'static, LoadOutcome> {
        self.issue("load", |_| true)
    }

    /// Re-fetches the current query, e.g. after a CRUD handler changed the
    /// backing store.
    #[must_use = "the load only runs when awaited or spawned"]
    pub fn refresh(&self) -> BoxFuture<'static, LoadOutcome> {
        self.issue("refresh", |_| true)
    }

    /// Replaces one filter value and returns to page 1.
    #[must_use = "the load only runs when awaited or spawned"]
    pub fn set_filter(
        &self,
        key: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> BoxFuture<'static, LoadOutcome> {
        let key = key.into();
        let value = value.into();
        self.issue_filter_change("set_filter", move |filters| {
            filters.set_filter(key, value);
        })
    }

    /// Merges several filter values in one change and returns to page 1.
    #[must_use = "the load only runs when awaited or spawned"]
    pub fn update_filters(&self, partial: Filters) -> BoxFuture<'static, LoadOutcome> {
        self.issue_filter_change("update_filters", move |filters| {
            filters.update_filters(partial);
        })
    }

    /// Deletes one filter key and returns to page 1.
    #[must_use = "the load only runs when awaited or spawned"]
    pub fn remove_filter(&self, key: &str) -> BoxFuture<'static, LoadOutcome> {
        let key = key.to_string();
        self.issue_filter_change("remove_filter", move |filters| {
            filters.remove_filter(&key);
        })
    }

    /// Restores the initial filters and returns to page 1.
    #[must_use = "the load only runs when awaited or spawned"]
    pub fn reset_filters(&self) -> BoxFuture<'static, LoadOutcome> {
        self.issue_filter_change("reset_filters", FilterStore::reset_filters)
    }

    /// Jumps to `page`. Out-of-range pages are ignored and not fetched.
    #[must_use = "the load only runs when awaited or spawned"]
    pub fn change_page(&self, page: usize) -> BoxFuture<'static, LoadOutcome> {
        self.issue("change_page", move |inner| inner.pagination.go_to_page(page))
    }

    /// Moves to the next page, if there is one.
    #[must_use = "the load only runs when awaited or spawned"]
    pub fn next_page(&self) -> BoxFuture<'static, LoadOutcome> {
        self.issue("next_page", |inner| inner.pagination.next_page())
    }

    /// Moves to the previous page, if there is one.
    #[must_use = "the load only runs when awaited or spawned"]
    pub fn prev_page(&self) -> BoxFuture<'static, LoadOutcome> {
        self.issue("prev_page", |inner| inner.pagination.prev_page())
    }

    /// Changes the page size, clamping the page to the new page count.
    /// A size of 0 is ignored and not fetched.
    #[must_use = "the load only runs when awaited or spawned"]
    pub fn change_page_size(&self, size: usize) -> BoxFuture<'static, LoadOutcome> {
        self.issue("change_page_size", move |inner| {
            inner.pagination.change_page_size(size)
        })
    }

    fn issue(
        &self,
        reason: &'static str,
        mutate: impl FnOnce(&mut TableInner<T>) -> bool,
    ) -> BoxFuture<'static, LoadOutcome> {
        match self.begin(reason, mutate) {
            Some(request) => self.start(request),
            None => future::ready(LoadOutcome::Skipped).boxed(),
        }
    }

    /// Like `issue`, for changes to the filters. The change handler sees the
    /// new filters once the table is unlocked.
    fn issue_filter_change(
        &self,
        reason: &'static str,
        change: impl FnOnce(&mut FilterStore),
    ) -> BoxFuture<'static, LoadOutcome> {
        let Some(request) = self.begin(reason, |inner| {
            change(&mut inner.filters);
            inner.pagination.reset_page();
            true
        }) else {
            return future::ready(LoadOutcome::Skipped).boxed();
        };
        if let Some(on_filter_change) = &self.handlers.on_filter_change {
            on_filter_change(&request.filters);
        }
        self.start(request)
    }

    /// Applies `mutate` under the write lock and, if it reports a change,
    /// snapshots a new request for the resulting query.
    fn begin(
        &self,
        reason: &'static str,
        mutate: impl FnOnce(&mut TableInner<T>) -> bool,
    ) -> Option<Request> {
        let Ok(mut guard) = self.inner.write() else {
            return None;
        };
        if !mutate(&mut *guard) {
            trace!("[{}] {} ignored", self.id, reason);
            return None;
        }
        guard.latest_request += 1;
        guard.status = TableStatus::Loading;
        self.dirty.store(true, Ordering::SeqCst);
        let request = Request {
            id: guard.latest_request,
            filters: guard.filters.filters().clone(),
            page: guard.pagination.page(),
            page_size: guard.pagination.page_size(),
        };
        debug!(
            "[{}] {}: request #{} for page {} (size {})",
            self.id, reason, request.id, request.page, request.page_size
        );
        Some(request)
    }

    fn start(&self, request: Request) -> BoxFuture<'static, LoadOutcome> {
        let pending = PendingLoad {
            table: self.clone(),
            request: request.id,
        };
        async move {
            let outcome = pending.table.run(request).await;
            drop(pending);
            outcome
        }
        .boxed()
    }

    async fn run(&self, request: Request) -> LoadOutcome {
        let result = self
            .source
            .fetch(&request.filters, request.page, request.page_size)
            .await;
        self.commit(request, result)
    }

    fn commit(&self, request: Request, result: Result<Page<T>, FetchError>) -> LoadOutcome {
        let error = {
            let Ok(mut guard) = self.inner.write() else {
                return LoadOutcome::Superseded;
            };
            if request.id != guard.latest_request {
                warn!(
                    "[{}] discarding response #{} (latest is #{})",
                    self.id, request.id, guard.latest_request
                );
                return LoadOutcome::Superseded;
            }
            match result {
                Ok(page) => {
                    if page.len() > request.page_size {
                        warn!(
                            "[{}] source returned {} rows for page size {}",
                            self.id,
                            page.len(),
                            request.page_size
                        );
                    }
                    let (rows, total) = page.into_parts();
                    let count = rows.len();
                    guard.rows = rows;
                    guard.pagination.set_total(total);
                    guard.selection.clear();
                    guard.status = TableStatus::Success;
                    guard.settled = TableStatus::Success;
                    guard.committed = guard.pagination;
                    guard.error = None;
                    self.dirty.store(true, Ordering::SeqCst);
                    debug!(
                        "[{}] request #{} applied: {} row(s), total {}",
                        self.id, request.id, count, total
                    );
                    return LoadOutcome::Applied { rows: count, total };
                }
                Err(error) => {
                    let error = Arc::new(error);
                    guard.status = TableStatus::Error;
                    guard.settled = TableStatus::Error;
                    guard.committed = guard.pagination;
                    guard.error = Some(Arc::clone(&error));
                    self.dirty.store(true, Ordering::SeqCst);
                    debug!("[{}] request #{} failed: {}", self.id, request.id, error);
                    error
                }
            }
        };
        if let Some(on_error) = &self.handlers.on_error {
            on_error(&error);
        }
        LoadOutcome::Failed(error.to_string())
    }

    // -------------------------------------------------------------------------
    // Data access
    // -------------------------------------------------------------------------

    /// Rows of the last successful fetch, in source order.
    ///
    /// Kept through a failed fetch; the view shows the error instead.
    pub fn rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| g.rows.clone())
            .unwrap_or_default()
    }

    /// Rows in display order (sorted within the current page).
    pub fn display_rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| g.display_rows())
            .unwrap_or_default()
    }

    /// Total matching rows across all pages, as last reported.
    pub fn total(&self) -> usize {
        self.inner.read().map(|g| g.pagination.total()).unwrap_or(0)
    }

    /// Where the table is in its fetch cycle.
    pub fn status(&self) -> TableStatus {
        self.inner.read().map(|g| g.status).unwrap_or_default()
    }

    /// `true` while a load is outstanding.
    pub fn is_loading(&self) -> bool {
        self.status() == TableStatus::Loading
    }

    /// Error of the latest load, if it failed.
    pub fn error(&self) -> Option<Arc<FetchError>> {
        self.inner.read().ok().and_then(|g| g.error.clone())
    }

    // -------------------------------------------------------------------------
    // Filters and pagination
    // -------------------------------------------------------------------------

    /// Current filters, including blank ones.
    pub fn filters(&self) -> Filters {
        self.inner
            .read()
            .map(|g| g.filters.filters().clone())
            .unwrap_or_default()
    }

    /// Filters the table was built with.
    pub fn initial_filters(&self) -> Filters {
        self.inner
            .read()
            .map(|g| g.filters.initial().clone())
            .unwrap_or_default()
    }

    /// Current filters projected to flat query parameters; blank values
    /// are dropped.
    pub fn query_params(&self) -> QueryParams {
        self.inner
            .read()
            .map(|g| g.filters.query_params())
            .unwrap_or_default()
    }

    /// Filters as a URL query string.
    pub fn query_string(&self) -> String {
        to_query_string(&self.query_params())
    }

    /// Snapshot of the pagination state.
    pub fn pagination(&self) -> PaginationController {
        self.inner.read().map(|g| g.pagination).unwrap_or_default()
    }

    /// Current 1-based page.
    pub fn page(&self) -> usize {
        self.pagination().page()
    }

    /// Rows requested per page.
    pub fn page_size(&self) -> usize {
        self.pagination().page_size()
    }

    /// Page count for the last reported total. 0 while the total is
    /// unknown or empty.
    pub fn total_pages(&self) -> usize {
        self.pagination().total_pages()
    }

    /// Offset-style parameters for the current page.
    pub fn pagination_params(&self) -> PaginationParams {
        self.pagination().params()
    }

    /// Page sizes offered by the footer.
    pub fn page_size_options(&self) -> Vec<usize> {
        self.inner
            .read()
            .map(|g| g.page_size_options.clone())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Sorting
    // -------------------------------------------------------------------------

    /// Active sort column and direction.
    pub fn sort(&self) -> SortState {
        self.inner.read().map(|g| g.sort.clone()).unwrap_or_default()
    }

    /// Toggle sort for a column.
    ///
    /// If the column is already sorted, toggles the direction; otherwise
    /// sorts it ascending. Unknown and non-sortable columns are ignored.
    /// Does not fetch. Returns the new sort state.
    pub fn toggle_sort(&self, key: &str) -> Option<SortState> {
        if let Ok(mut guard) = self.inner.write()
            && guard.column(key).is_some_and(Column::is_sortable)
        {
            guard.sort.toggle(key);
            self.dirty.store(true, Ordering::SeqCst);
            trace!("[{}] sort {:?}", self.id, guard.sort);
            return Some(guard.sort.clone());
        }
        None
    }

    /// Clear sort state.
    pub fn clear_sort(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.sort.clear();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    // -------------------------------------------------------------------------
    // Selection
    // -------------------------------------------------------------------------

    /// Toggle selection of a row on the current page.
    ///
    /// Returns the new selected state, or `None` if no such row is shown.
    pub fn toggle_row(&self, key: &T::Key) -> Option<bool> {
        if let Ok(mut guard) = self.inner.write()
            && guard.find_row(key).is_some()
        {
            let selected = guard.selection.toggle(key.clone());
            self.dirty.store(true, Ordering::SeqCst);
            trace!("[{}] row {} selected: {}", self.id, key, selected);
            return Some(selected);
        }
        None
    }

    /// Select every row on the current page, or clear the selection if they
    /// already all are. Returns the number of selected rows.
    pub fn toggle_select_all(&self) -> usize {
        if let Ok(mut guard) = self.inner.write() {
            let visible = guard.visible_keys();
            guard.selection.toggle_all(&visible);
            self.dirty.store(true, Ordering::SeqCst);
            return guard.selection.len();
        }
        0
    }

    /// Clear all selection.
    pub fn clear_selection(&self) {
        if let Ok(mut guard) = self.inner.write() {
            guard.selection.clear();
            self.dirty.store(true, Ordering::SeqCst);
        }
    }

    /// `true` if the row for `key` is selected.
    pub fn is_selected(&self, key: &T::Key) -> bool {
        self.inner
            .read()
            .map(|g| g.selection.is_selected(key))
            .unwrap_or(false)
    }

    /// Keys of the selected rows, in no particular order.
    pub fn selected_keys(&self) -> Vec<T::Key> {
        self.inner
            .read()
            .map(|g| g.selection.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// Selected rows resolved against the current row array.
    pub fn selected_rows(&self) -> Vec<T> {
        self.inner
            .read()
            .map(|g| g.selected_rows())
            .unwrap_or_default()
    }

    // -------------------------------------------------------------------------
    // Hook points
    // -------------------------------------------------------------------------

    fn find(&self, key: &T::Key) -> Result<T, TableError> {
        self.inner
            .read()
            .ok()
            .and_then(|g| g.find_row(key).cloned())
            .ok_or_else(|| TableError::UnknownRow(key.to_string()))
    }

    fn row_hook(
        &self,
        handler: Option<&RowHandler<T>>,
        name: &'static str,
        key: &T::Key,
    ) -> Result<(), TableError> {
        let handler = handler.ok_or(TableError::MissingHandler(name))?;
        let row = self.find(key)?;
        handler(&row);
        Ok(())
    }

    /// Invokes the create handler.
    pub fn create(&self) -> Result<(), TableError> {
        let handler = self
            .handlers
            .on_create
            .as_ref()
            .ok_or(TableError::MissingHandler("create"))?;
        handler();
        Ok(())
    }

    /// Invokes the edit handler with the row for `key`.
    pub fn edit(&self, key: &T::Key) -> Result<(), TableError> {
        self.row_hook(self.handlers.on_edit.as_ref(), "edit", key)
    }

    /// Invokes the delete handler with the row for `key`.
    pub fn delete(&self, key: &T::Key) -> Result<(), TableError> {
        self.row_hook(self.handlers.on_delete.as_ref(), "delete", key)
    }

    /// Invokes the view handler with the row for `key`.
    pub fn view_row(&self, key: &T::Key) -> Result<(), TableError> {
        self.row_hook(self.handlers.on_view.as_ref(), "view", key)
    }

    /// Invokes the row click handler with the row for `key`.
    pub fn click_row(&self, key: &T::Key) -> Result<(), TableError> {
        self.row_hook(self.handlers.on_row_click.as_ref(), "row click", key)
    }

    /// Invokes the row action labelled `label` on the row for `key`.
    pub fn run_action(&self, label: &str, key: &T::Key) -> Result<(), TableError> {
        let action = self
            .handlers
            .action(label)
            .ok_or_else(|| TableError::UnknownAction(label.to_string()))?;
        let row = self.find(key)?;
        if !action.is_available(&row) {
            return Err(TableError::ActionUnavailable {
                label: label.to_string(),
                row: key.to_string(),
            });
        }
        action.invoke(&row);
        Ok(())
    }

    /// Invokes the bulk action labelled `label` with the selected rows that
    /// are on the current page.
    pub fn run_bulk_action(&self, label: &str) -> Result<(), TableError> {
        let action = self
            .handlers
            .bulk_action(label)
            .ok_or_else(|| TableError::UnknownAction(label.to_string()))?;
        let rows = self.selected_rows();
        if rows.is_empty() {
            return Err(TableError::EmptySelection(label.to_string()));
        }
        action.invoke(&rows);
        Ok(())
    }

    /// Invokes the export handler.
    pub fn export(&self) -> Result<(), TableError> {
        let handler = self
            .handlers
            .on_export
            .as_ref()
            .ok_or(TableError::MissingHandler("export"))?;
        handler();
        Ok(())
    }

    /// Invokes the import handler.
    pub fn import(&self) -> Result<(), TableError> {
        let handler = self
            .handlers
            .on_import
            .as_ref()
            .ok_or(TableError::MissingHandler("import"))?;
        handler();
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Dirty tracking
    // -------------------------------------------------------------------------

    /// Check if the table has changed since the last `clear_dirty`.
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Clear the dirty flag.
    pub fn clear_dirty(&self) {
        self.dirty.store(false, Ordering::SeqCst);
    }
}

impl<T: TableRow> Clone for DataTable<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            source: Arc::clone(&self.source),
            handlers: Arc::clone(&self.handlers),
            inner: Arc::clone(&self.inner),
            dirty: Arc::clone(&self.dirty),
        }
    }
}

impl<T: TableRow> std::fmt::Debug for DataTable<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataTable")
            .field("id", &self.id)
            .field("status", &self.status())
            .field("pagination", &self.pagination())
            .finish_non_exhaustive()
    }
}
