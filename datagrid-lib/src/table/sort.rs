//! Client-side sorting.
//!
//! Sorting reorders the rows of the page currently displayed. It never
//! triggers a fetch, so a sorted server-paginated table is sorted within
//! each page, not across pages.

use super::column::Column;
use super::row::TableRow;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn flip(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Header indicator.
    pub fn indicator(self) -> &'static str {
        match self {
            SortDirection::Asc => "↑",
            SortDirection::Desc => "↓",
        }
    }
}

/// Active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SortState {
    key: Option<String>,
    direction: SortDirection,
}

impl SortState {
    /// Key of the active sort column, if any.
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Direction for `key` if it is the active sort column.
    pub fn direction_for(&self, key: &str) -> Option<SortDirection> {
        (self.key.as_deref() == Some(key)).then_some(self.direction)
    }

    /// Flip the direction if `key` is already active, else activate it
    /// ascending.
    pub fn toggle(&mut self, key: &str) {
        if self.key.as_deref() == Some(key) {
            self.direction = self.direction.flip();
        } else {
            self.key = Some(key.to_string());
            self.direction = SortDirection::Asc;
        }
    }

    pub fn clear(&mut self) {
        self.key = None;
        self.direction = SortDirection::Asc;
    }
}

/// Stable-sorts `rows` by the raw field of `column`.
pub fn sort_rows<T: TableRow>(rows: &mut [T], column: &Column<T>, direction: SortDirection) {
    rows.sort_by(|a, b| {
        let ordering = column.sort_value(a).compare(&column.sort_value(b));
        match direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_same_key_flips() {
        let mut sort = SortState::default();
        sort.toggle("price");
        assert_eq!(sort.direction_for("price"), Some(SortDirection::Asc));
        sort.toggle("price");
        assert_eq!(sort.direction_for("price"), Some(SortDirection::Desc));
    }

    #[test]
    fn test_toggle_new_key_resets_to_ascending() {
        let mut sort = SortState::default();
        sort.toggle("price");
        sort.toggle("price");
        sort.toggle("name");
        assert_eq!(sort.key(), Some("name"));
        assert_eq!(sort.direction(), SortDirection::Asc);
        assert_eq!(sort.direction_for("price"), None);
    }
}
