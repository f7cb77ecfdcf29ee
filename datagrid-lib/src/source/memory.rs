//! In-memory data source over a mock array.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::RwLock;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use super::DataSource;
use super::Page;
use crate::error::FetchError;
use crate::filter::Filters;
use crate::table::TableRow;

type Predicate<T> = Arc<dyn Fn(&T, &Filters) -> bool + Send + Sync>;

/// A data source serving rows from an in-memory array.
///
/// Rows are filtered with a caller predicate, then sliced to the requested
/// page. Rows can be added, replaced and removed, which makes it usable as
/// a mock CRUD service: mutate it, then refresh the table.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use datagrid_lib::{CellValue, MemorySource, TableRow};
///
/// #[derive(Clone)]
/// struct User {
///     id: u32,
///     name: String,
/// }
///
/// impl TableRow for User {
///     type Key = u32;
///
///     fn key(&self) -> u32 {
///         self.id
///     }
///
///     fn field(&self, key: &str) -> CellValue {
///         match key {
///             "name" => self.name.as_str().into(),
///             _ => CellValue::Empty,
///         }
///     }
/// }
///
/// let source = MemorySource::new(vec![User { id: 1, name: "Ada".into() }])
///     .with_filter(|user, filters| match filters.get_str("search") {
///         Some(search) => user.name.contains(search),
///         None => true,
///     })
///     .with_latency(Duration::from_millis(500));
/// ```
pub struct MemorySource<T: TableRow> {
    rows: RwLock<Vec<T>>,
    predicate: Predicate<T>,
    latency: Option<Duration>,
    pending_failure: Mutex<Option<FetchError>>,
}

impl<T: TableRow> MemorySource<T> {
    /// Creates a source over `rows` that matches every row.
    pub fn new(rows: Vec<T>) -> Self {
        Self {
            rows: RwLock::new(rows),
            predicate: Arc::new(|_, _| true),
            latency: None,
            pending_failure: Mutex::new(None),
        }
    }

    /// Sets the predicate deciding whether a row matches the filters.
    pub fn with_filter(
        mut self,
        predicate: impl Fn(&T, &Filters) -> bool + Send + Sync + 'static,
    ) -> Self {
        self.predicate = Arc::new(predicate);
        self
    }

    /// Delays every fetch, simulating a network round trip.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Makes the next fetch fail with `error`.
    pub fn fail_next(&self, error: FetchError) {
        if let Ok(mut guard) = self.pending_failure.lock() {
            *guard = Some(error);
        }
    }

    /// Returns the number of stored rows (unfiltered).
    pub fn len(&self) -> usize {
        self.rows.read().map(|g| g.len()).unwrap_or(0)
    }

    /// Returns `true` if no rows are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns all stored rows.
    pub fn rows(&self) -> Vec<T> {
        self.rows.read().map(|g| g.clone()).unwrap_or_default()
    }

    /// Finds a row by key.
    pub fn get(&self, key: &T::Key) -> Option<T> {
        self.rows
            .read()
            .ok()
            .and_then(|g| g.iter().find(|row| &row.key() == key).cloned())
    }

    /// Appends a row.
    pub fn insert(&self, row: T) {
        if let Ok(mut guard) = self.rows.write() {
            guard.push(row);
        }
    }

    /// Replaces the row with the same key. Returns `false` if none exists.
    pub fn update(&self, row: T) -> bool {
        if let Ok(mut guard) = self.rows.write() {
            let key = row.key();
            if let Some(slot) = guard.iter_mut().find(|r| r.key() == key) {
                *slot = row;
                return true;
            }
        }
        false
    }

    /// Removes the row with this key.
    pub fn remove(&self, key: &T::Key) -> Option<T> {
        let mut guard = self.rows.write().ok()?;
        let index = guard.iter().position(|row| &row.key() == key)?;
        Some(guard.remove(index))
    }

    fn take_failure(&self) -> Option<FetchError> {
        self.pending_failure.lock().ok().and_then(|mut g| g.take())
    }

    fn query(&self, filters: &Filters, page: usize, page_size: usize) -> Page<T> {
        let guard = match self.rows.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        let matching: Vec<&T> = guard
            .iter()
            .filter(|row| (self.predicate)(row, filters))
            .collect();
        let total = matching.len();
        let start = page.saturating_sub(1).saturating_mul(page_size);
        let data = matching
            .into_iter()
            .skip(start)
            .take(page_size)
            .cloned()
            .collect();
        Page::new(data, total)
    }
}

#[async_trait]
impl<T: TableRow> DataSource<T> for MemorySource<T> {
    async fn fetch(
        &self,
        filters: &Filters,
        page: usize,
        page_size: usize,
    ) -> Result<Page<T>, FetchError> {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        if let Some(error) = self.take_failure() {
            debug!("[memory] failing fetch for page {}: {}", page, error);
            return Err(error);
        }
        let result = self.query(filters, page, page_size);
        debug!(
            "[memory] page {} (size {}): {} of {} row(s)",
            page,
            page_size,
            result.len(),
            result.total()
        );
        Ok(result)
    }
}
