use std::collections::{HashMap, HashSet};

/// Transient per-contact checkbox state backing the bulk actions.
///
/// Never persisted. Entries for contacts that have since been deleted may
/// linger; they are never displayed.
#[derive(Debug, Default, Clone)]
pub struct Selection {
    checked: HashMap<String, bool>,
}

impl Selection {
    /// Set or clear the checkbox for one contact.
    pub fn toggle(&mut self, id: &str, checked: bool) {
        self.checked.insert(id.to_string(), checked);
    }

    /// Replace the selection with every id in `ids` when checking, or
    /// clear it entirely when unchecking. Ids outside `ids` are dropped
    /// either way.
    pub fn toggle_all<'a, I>(&mut self, checked: bool, ids: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        self.checked.clear();
        if checked {
            for id in ids {
                self.checked.insert(id.to_string(), true);
            }
        }
    }

    pub fn is_checked(&self, id: &str) -> bool {
        self.checked.get(id).copied().unwrap_or(false)
    }

    /// True iff `ids` is non-empty and every id in it is checked.
    pub fn all_checked<'a, I>(&self, ids: I) -> bool
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut any = false;
        for id in ids {
            any = true;
            if !self.is_checked(id) {
                return false;
            }
        }
        any
    }

    pub fn any_checked(&self) -> bool {
        self.checked.values().any(|checked| *checked)
    }

    pub fn checked_ids(&self) -> HashSet<String> {
        self.checked
            .iter()
            .filter(|(_, checked)| **checked)
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn clear(&mut self) {
        self.checked.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_sets_and_clears() {
        let mut selection = Selection::default();
        selection.toggle("a", true);
        assert!(selection.is_checked("a"));
        selection.toggle("a", false);
        assert!(!selection.is_checked("a"));
        assert!(!selection.is_checked("never-seen"));
    }

    #[test]
    fn test_toggle_all_replaces_the_map() {
        let mut selection = Selection::default();
        selection.toggle("stale", true);
        selection.toggle_all(true, ["a", "b"]);
        assert!(selection.is_checked("a"));
        assert!(selection.is_checked("b"));
        assert!(!selection.is_checked("stale"));
    }

    #[test]
    fn test_toggle_all_unchecked_clears() {
        let mut selection = Selection::default();
        selection.toggle_all(true, ["a", "b"]);
        selection.toggle_all(false, ["a", "b"]);
        assert!(!selection.any_checked());
    }

    #[test]
    fn test_all_checked_requires_nonempty_view() {
        let selection = Selection::default();
        assert!(!selection.all_checked([]));

        let mut selection = Selection::default();
        selection.toggle("a", true);
        assert!(selection.all_checked(["a"]));
        assert!(!selection.all_checked(["a", "b"]));
    }

    #[test]
    fn test_checked_ids_skips_unchecked_entries() {
        let mut selection = Selection::default();
        selection.toggle("a", true);
        selection.toggle("b", false);
        let ids = selection.checked_ids();
        assert!(ids.contains("a"));
        assert!(!ids.contains("b"));
    }
}
