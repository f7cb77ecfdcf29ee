//! Column descriptors.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::row::CellValue;
use super::row::TableRow;
use crate::error::TableError;

/// Custom cell renderer: `(row, index on page) -> text`.
pub type CellRenderer<T> = Arc<dyn Fn(&T, usize) -> String + Send + Sync>;

/// How wide a column is drawn.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnWidth {
    /// Size to content.
    #[default]
    Auto,
    /// Fixed width in characters; longer content is truncated.
    Fixed(u16),
}

/// A table column definition.
///
/// # Example
///
/// ```ignore
/// let price = Column::new("price", "Price")
///     .render(|product: &Product, _| format!("${:.2}", product.price))
///     .sortable();
/// ```
pub struct Column<T> {
    key: String,
    title: String,
    render: Option<CellRenderer<T>>,
    sortable: bool,
    width: ColumnWidth,
}

impl<T: TableRow> Column<T> {
    /// Create a new column showing the raw field `key` under `title`.
    pub fn new(key: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            title: title.into(),
            render: None,
            sortable: false,
            width: ColumnWidth::Auto,
        }
    }

    /// Render cells with a custom function instead of the raw field.
    pub fn render(mut self, render: impl Fn(&T, usize) -> String + Send + Sync + 'static) -> Self {
        self.render = Some(Arc::new(render));
        self
    }

    /// Allow sorting by this column.
    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Set a fixed width for this column.
    pub fn fixed(mut self, width: u16) -> Self {
        self.width = ColumnWidth::Fixed(width);
        self
    }

    /// Set how wide the column is drawn.
    pub fn width(mut self, width: ColumnWidth) -> Self {
        self.width = width;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    pub fn column_width(&self) -> ColumnWidth {
        self.width
    }

    /// Text shown for `row` at `index` on the current page.
    pub fn cell(&self, row: &T, index: usize) -> String {
        match &self.render {
            Some(render) => render(row, index),
            None => row.field(&self.key).to_string(),
        }
    }

    /// Raw value this column sorts by.
    pub fn sort_value(&self, row: &T) -> CellValue {
        row.field(&self.key)
    }
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            title: self.title.clone(),
            render: self.render.clone(),
            sortable: self.sortable,
            width: self.width,
        }
    }
}

impl<T> fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("title", &self.title)
            .field("render", &self.render.is_some())
            .field("sortable", &self.sortable)
            .field("width", &self.width)
            .finish()
    }
}

/// Rejects column sets with a repeated key.
pub(crate) fn check_unique_keys<T>(columns: &[Column<T>]) -> Result<(), TableError> {
    let mut seen = HashSet::with_capacity(columns.len());
    for column in columns {
        if !seen.insert(column.key.as_str()) {
            return Err(TableError::DuplicateColumn(column.key.clone()));
        }
    }
    Ok(())
}
