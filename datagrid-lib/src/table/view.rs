//! Headless view of a table.
//!
//! [`TableView`] is a snapshot of everything a front end draws: toolbar,
//! header, body and footer. Its `Display` impl draws a plain-text grid.

use std::fmt;

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::column::ColumnWidth;
use super::row::TableRow;
use super::sort::SortDirection;
use super::state::{DataTable, TableStatus};

/// Message shown when a load succeeded with no rows.
pub const EMPTY_MESSAGE: &str = "No data found";

/// Toolbar buttons and the bulk action bar.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ToolbarView {
    pub can_create: bool,
    pub can_export: bool,
    pub can_import: bool,
    /// Number of selected rows on the current page.
    pub selected: usize,
    /// Bulk action labels. Empty while nothing is selected.
    pub bulk_actions: Vec<String>,
}

/// One column header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderCell {
    pub key: String,
    pub title: String,
    pub sortable: bool,
    /// Direction if this is the active sort column.
    pub sort: Option<SortDirection>,
    pub width: ColumnWidth,
}

impl HeaderCell {
    /// Title with the sort indicator appended when active.
    pub fn label(&self) -> String {
        match self.sort {
            Some(direction) => format!("{} {}", self.title, direction.indicator()),
            None => self.title.clone(),
        }
    }
}

/// One rendered row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowView {
    /// Row key, formatted.
    pub key: String,
    pub selected: bool,
    /// One rendered string per column.
    pub cells: Vec<String>,
    /// Labels of the actions offered for this row.
    pub actions: Vec<String>,
}

/// The table body. Exactly one of these is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BodyView {
    Loading,
    Error(String),
    Empty,
    Rows(Vec<RowView>),
}

/// Pagination footer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FooterView {
    /// Rows on the current page.
    pub showing: usize,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
    pub page_size: usize,
    pub page_size_options: Vec<usize>,
    pub has_prev: bool,
    pub has_next: bool,
}

impl FooterView {
    /// "Showing X of Y items".
    pub fn summary(&self) -> String {
        format!("Showing {} of {} items", self.showing, self.total)
    }
}

/// Snapshot of a table for drawing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableView {
    pub toolbar: ToolbarView,
    /// `Some(all selected)` when the table has a selection column.
    pub select_all: Option<bool>,
    pub header: Vec<HeaderCell>,
    /// `true` when rows get an actions column.
    pub has_actions: bool,
    pub body: BodyView,
    /// Present only when there is more than one page.
    pub footer: Option<FooterView>,
}

impl TableView {
    /// Rows of the body, or an empty slice for the other states.
    pub fn rows(&self) -> &[RowView] {
        match &self.body {
            BodyView::Rows(rows) => rows,
            _ => &[],
        }
    }
}

impl<T: TableRow> DataTable<T> {
    /// Build a view of the current state.
    pub fn view(&self) -> TableView {
        let Ok(guard) = self.inner.read() else {
            return TableView {
                toolbar: ToolbarView::default(),
                select_all: None,
                header: Vec::new(),
                has_actions: false,
                body: BodyView::Empty,
                footer: None,
            };
        };
        let handlers = &self.handlers;
        let selectable = !handlers.bulk_actions.is_empty();

        let selected = guard.selected_rows().len();
        let toolbar = ToolbarView {
            can_create: handlers.on_create.is_some(),
            can_export: handlers.on_export.is_some(),
            can_import: handlers.on_import.is_some(),
            selected,
            bulk_actions: if selected > 0 {
                handlers
                    .bulk_actions
                    .iter()
                    .map(|action| action.label().to_string())
                    .collect()
            } else {
                Vec::new()
            },
        };

        let header = guard
            .columns
            .iter()
            .map(|column| HeaderCell {
                key: column.key().to_string(),
                title: column.title().to_string(),
                sortable: column.is_sortable(),
                sort: guard.sort.direction_for(column.key()),
                width: column.column_width(),
            })
            .collect();

        let body = match guard.status {
            TableStatus::Loading => BodyView::Loading,
            TableStatus::Error => BodyView::Error(
                guard
                    .error
                    .as_ref()
                    .map(|error| error.to_string())
                    .unwrap_or_default(),
            ),
            TableStatus::Idle | TableStatus::Success if guard.rows.is_empty() => BodyView::Empty,
            TableStatus::Idle | TableStatus::Success => BodyView::Rows(
                guard
                    .display_rows()
                    .iter()
                    .enumerate()
                    .map(|(index, row)| {
                        let key = row.key();
                        RowView {
                            key: key.to_string(),
                            selected: guard.selection.is_selected(&key),
                            cells: guard
                                .columns
                                .iter()
                                .map(|column| column.cell(row, index))
                                .collect(),
                            actions: handlers.row_action_labels(row),
                        }
                    })
                    .collect(),
            ),
        };

        let pagination = guard.pagination;
        let footer = (pagination.total_pages() > 1).then(|| FooterView {
            showing: guard.rows.len(),
            total: if pagination.total() > 0 {
                pagination.total()
            } else {
                guard.rows.len()
            },
            page: pagination.page(),
            total_pages: pagination.total_pages(),
            page_size: pagination.page_size(),
            page_size_options: guard.page_size_options.clone(),
            has_prev: pagination.has_prev(),
            has_next: pagination.has_next(),
        });

        let visible = guard.visible_keys();
        TableView {
            toolbar,
            select_all: selectable.then(|| guard.selection.is_all_selected(&visible)),
            header,
            has_actions: handlers.has_row_actions(),
            body,
            footer,
        }
    }
}

// -----------------------------------------------------------------------------
// Text rendering
// -----------------------------------------------------------------------------

const CHECKBOX_WIDTH: usize = 3;

fn checkbox(checked: bool) -> &'static str {
    if checked { "[x]" } else { "[ ]" }
}

/// Cut `s` to `max_width` columns, ending with an ellipsis when shortened.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let target = max_width - 1;
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > target {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result.push('…');
    result
}

/// Left-align `s` in `width` columns.
fn pad(s: &str, width: usize) -> String {
    let cell = truncate_to_width(s, width);
    let fill = width.saturating_sub(cell.width());
    format!("{cell}{}", " ".repeat(fill))
}

impl TableView {
    /// Display width of every column, actions column last.
    fn column_widths(&self) -> Vec<usize> {
        let rows = self.rows();
        let mut widths: Vec<usize> = self
            .header
            .iter()
            .enumerate()
            .map(|(i, cell)| match cell.width {
                ColumnWidth::Fixed(width) => usize::from(width),
                ColumnWidth::Auto => rows
                    .iter()
                    .filter_map(|row| row.cells.get(i))
                    .map(|text| text.width())
                    .chain([cell.label().width()])
                    .max()
                    .unwrap_or(0),
            })
            .collect();
        if self.has_actions {
            let actions = rows
                .iter()
                .map(|row| row.actions.join(", ").width())
                .chain(["Actions".width()])
                .max()
                .unwrap_or(0);
            widths.push(actions);
        }
        widths
    }

    fn write_line(
        &self,
        f: &mut fmt::Formatter<'_>,
        widths: &[usize],
        checked: Option<bool>,
        cells: &[String],
    ) -> fmt::Result {
        let mut parts = Vec::with_capacity(widths.len() + 1);
        if let Some(checked) = checked {
            parts.push(checkbox(checked).to_string());
        }
        parts.extend(
            widths
                .iter()
                .zip(cells)
                .map(|(width, text)| pad(text, *width)),
        );
        writeln!(f, "| {} |", parts.join(" | "))
    }
}

impl fmt::Display for TableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buttons = Vec::new();
        if self.toolbar.can_create {
            buttons.push("[+ Create]".to_string());
        }
        if self.toolbar.can_export {
            buttons.push("[Export]".to_string());
        }
        if self.toolbar.can_import {
            buttons.push("[Import]".to_string());
        }
        if !self.toolbar.bulk_actions.is_empty() {
            buttons.push(format!("{} selected:", self.toolbar.selected));
            buttons.extend(
                self.toolbar
                    .bulk_actions
                    .iter()
                    .map(|label| format!("[{label}]")),
            );
        }
        if !buttons.is_empty() {
            writeln!(f, "{}", buttons.join(" "))?;
        }

        let widths = self.column_widths();
        let mut titles: Vec<String> = self.header.iter().map(HeaderCell::label).collect();
        if self.has_actions {
            titles.push("Actions".to_string());
        }
        self.write_line(f, &widths, self.select_all, &titles)?;

        let mut rule: Vec<String> = Vec::with_capacity(widths.len() + 1);
        if self.select_all.is_some() {
            rule.push("-".repeat(CHECKBOX_WIDTH));
        }
        rule.extend(widths.iter().map(|width| "-".repeat(*width)));
        writeln!(f, "|-{}-|", rule.join("-|-"))?;

        match &self.body {
            BodyView::Loading => writeln!(f, "Loading...")?,
            BodyView::Error(message) => writeln!(f, "Error: {message}")?,
            BodyView::Empty => writeln!(f, "{EMPTY_MESSAGE}")?,
            BodyView::Rows(rows) => {
                for row in rows {
                    let mut cells = row.cells.clone();
                    if self.has_actions {
                        cells.push(row.actions.join(", "));
                    }
                    let checked = self.select_all.map(|_| row.selected);
                    self.write_line(f, &widths, checked, &cells)?;
                }
            }
        }

        if let Some(footer) = &self.footer {
            let sizes: Vec<String> = footer
                .page_size_options
                .iter()
                .map(|size| {
                    if *size == footer.page_size {
                        format!("[{size}]")
                    } else {
                        size.to_string()
                    }
                })
                .collect();
            writeln!(
                f,
                "{} | {} Page {} of {} {} | Per page: {}",
                footer.summary(),
                if footer.has_prev { "<" } else { " " },
                footer.page,
                footer.total_pages,
                if footer.has_next { ">" } else { " " },
                sizes.join(" ")
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_to_width_adds_ellipsis() {
        assert_eq!(truncate_to_width("Wireless Mouse", 8), "Wireles…");
        assert_eq!(truncate_to_width("Mouse", 8), "Mouse");
        assert_eq!(truncate_to_width("Mouse", 0), "");
    }

    #[test]
    fn test_pad_uses_display_width() {
        // Each CJK character is two columns wide.
        assert_eq!(pad("日本", 6), "日本  ");
        assert_eq!(pad("ab", 4), "ab  ");
    }

    #[test]
    fn test_header_label_shows_sort_indicator() {
        let mut cell = HeaderCell {
            key: "price".into(),
            title: "Price".into(),
            sortable: true,
            sort: None,
            width: ColumnWidth::Auto,
        };
        assert_eq!(cell.label(), "Price");
        cell.sort = Some(SortDirection::Desc);
        assert_eq!(cell.label(), "Price ↓");
    }
}
