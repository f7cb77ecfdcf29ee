//! Row selection.

use std::collections::HashSet;
use std::hash::Hash;

/// Tracks selected rows by their keys.
///
/// Owned by one table and cleared whenever a new row array arrives, so it
/// only ever refers to rows of the page being displayed.
#[derive(Debug, Clone)]
pub struct Selection<K: Clone + Eq + Hash> {
    selected: HashSet<K>,
}

impl<K: Clone + Eq + Hash> Default for Selection<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Clone + Eq + Hash> Selection<K> {
    pub fn new() -> Self {
        Self {
            selected: HashSet::new(),
        }
    }

    /// Toggle selection for a key. Returns `true` if it is now selected.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.selected.remove(&key) {
            false
        } else {
            self.selected.insert(key);
            true
        }
    }

    /// Check if a key is selected.
    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    /// `true` if `visible` is non-empty and every key in it is selected.
    pub fn is_all_selected(&self, visible: &[K]) -> bool {
        !visible.is_empty() && visible.iter().all(|key| self.selected.contains(key))
    }

    /// Select every visible key, or clear if they already all are.
    pub fn toggle_all(&mut self, visible: &[K]) {
        if self.is_all_selected(visible) {
            self.selected.clear();
        } else {
            self.selected = visible.iter().cloned().collect();
        }
    }

    /// Clear all selections.
    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Get all selected keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> {
        self.selected.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_all_flips_between_empty_and_all() {
        let visible = vec![1, 2, 3];
        let mut selection = Selection::new();
        selection.toggle(2);
        selection.toggle_all(&visible);
        assert!(selection.is_all_selected(&visible));
        selection.toggle_all(&visible);
        assert!(selection.is_empty());
    }

    #[test]
    fn test_toggle_all_on_empty_page_selects_nothing() {
        let mut selection: Selection<u32> = Selection::new();
        selection.toggle_all(&[]);
        assert!(selection.is_empty());
    }
}
