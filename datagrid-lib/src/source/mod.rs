//! Data source adapters.
//!
//! A table never reads its backing store directly. It asks a
//! [`DataSource`] for one page of rows matching the current filters and the
//! total across all pages. [`MemorySource`] serves mock arrays; anything
//! async (an HTTP client, a database) implements the trait or wraps a
//! closure with [`from_fn`].

mod memory;

pub use memory::*;

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::FetchError;
use crate::filter::Filters;

/// One page of rows plus the total matching the filters across all pages.
///
/// The table renders exactly the rows it is given; slicing to the page size
/// is the source's job.
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    data: Vec<T>,
    total: usize,
}

impl<T> Page<T> {
    /// Creates a new page.
    pub fn new(data: Vec<T>, total: usize) -> Self {
        Self { data, total }
    }

    /// Returns a reference to the rows in this page.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns the total row count across all pages.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Returns the number of rows in this page.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if this page has no rows.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Consumes the page and returns the rows and total.
    pub fn into_parts(self) -> (Vec<T>, usize) {
        (self.data, self.total)
    }
}

/// Async adapter the table fetches pages through.
///
/// Contract:
/// - `data.len()` should not exceed `page_size`
/// - `total` counts every row matching `filters`, across all pages
/// - transport failures are returned as errors; the table surfaces them
///   without retrying
#[async_trait]
pub trait DataSource<T>: Send + Sync {
    /// Fetches page `page` (1-based) of size `page_size`.
    async fn fetch(
        &self,
        filters: &Filters,
        page: usize,
        page_size: usize,
    ) -> Result<Page<T>, FetchError>;
}

#[async_trait]
impl<T, S> DataSource<T> for Arc<S>
where
    T: Send + 'static,
    S: DataSource<T> + ?Sized,
{
    async fn fetch(
        &self,
        filters: &Filters,
        page: usize,
        page_size: usize,
    ) -> Result<Page<T>, FetchError> {
        (**self).fetch(filters, page, page_size).await
    }
}

/// A [`DataSource`] backed by an async closure.
///
/// Created with [`from_fn`].
pub struct FnSource<F> {
    fetch: F,
}

/// Wraps `fetch(filters, page, page_size)` as a [`DataSource`].
///
/// # Example
///
/// ```
/// use datagrid_lib::FetchError;
/// use datagrid_lib::source::{self, Page};
///
/// let source = source::from_fn(|_filters, page, page_size| async move {
///     let rows: Vec<u32> = (1..=page_size as u32).map(|n| n + page as u32).collect();
///     Ok::<_, FetchError>(Page::new(rows, 100))
/// });
/// ```
pub fn from_fn<T, F, Fut>(fetch: F) -> FnSource<F>
where
    F: Fn(Filters, usize, usize) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>, FetchError>> + Send + 'static,
{
    FnSource { fetch }
}

#[async_trait]
impl<T, F, Fut> DataSource<T> for FnSource<F>
where
    T: Send + 'static,
    F: Fn(Filters, usize, usize) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Page<T>, FetchError>> + Send + 'static,
{
    async fn fetch(
        &self,
        filters: &Filters,
        page: usize,
        page_size: usize,
    ) -> Result<Page<T>, FetchError> {
        (self.fetch)(filters.clone(), page, page_size).await
    }
}
