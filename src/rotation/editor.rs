use super::Sequence;
use crate::error::EditError;

/// Last saved rotation plus the operator's unsaved edits.
#[derive(Debug, Clone, Default)]
pub struct ListEditor {
    canonical: Sequence,
    working: Sequence,
}

impl ListEditor {
    /// Start editing from a freshly loaded rotation
    pub fn new(canonical: Sequence) -> Self {
        Self {
            working: canonical.clone(),
            canonical,
        }
    }

    pub fn canonical(&self) -> &Sequence {
        &self.canonical
    }

    pub fn working(&self) -> &Sequence {
        &self.working
    }

    /// True when the working rotation differs from the last saved one
    pub fn is_dirty(&self) -> bool {
        self.working != self.canonical
    }

    /// Replace both views with a rotation confirmed by the remote
    pub fn load(&mut self, fetched: Sequence) {
        self.working = fetched.clone();
        self.canonical = fetched;
    }

    pub fn reorder(&mut self, from: usize, to: usize) -> Result<&Sequence, EditError> {
        self.working = self.working.reordered(from, to)?;
        Ok(&self.working)
    }

    pub fn append(&mut self, items: &Sequence) -> &Sequence {
        self.working = self.working.appended(items);
        &self.working
    }

    pub fn remove_at(&mut self, index: usize) -> Result<&Sequence, EditError> {
        self.working = self.working.removed(index)?;
        Ok(&self.working)
    }

    pub fn reset(&mut self, to: &Sequence) -> &Sequence {
        self.working = to.clone();
        &self.working
    }

    /// Throw away unsaved edits
    pub fn discard(&mut self) -> &Sequence {
        self.working = self.canonical.clone();
        &self.working
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::Item;

    fn seq(ids: &[&str]) -> Sequence {
        ids.iter().map(|id| Item::bare(*id)).collect()
    }

    #[test]
    fn test_fresh_editor_is_clean() {
        let editor = ListEditor::new(seq(&["a", "b", "c"]));
        assert!(!editor.is_dirty());
        assert_eq!(editor.working(), editor.canonical());
    }

    #[test]
    fn test_reorder_marks_dirty() {
        let mut editor = ListEditor::new(seq(&["a", "b", "c"]));
        editor.reorder(0, 2).unwrap();
        assert_eq!(editor.working().ids(), vec!["b", "c", "a"]);
        assert_eq!(editor.canonical().ids(), vec!["a", "b", "c"]);
        assert!(editor.is_dirty());
    }

    #[test]
    fn test_reorder_back_is_clean_again() {
        let mut editor = ListEditor::new(seq(&["a", "b", "c"]));
        editor.reorder(0, 2).unwrap();
        editor.reorder(2, 0).unwrap();
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_rejected_edit_leaves_working_untouched() {
        let mut editor = ListEditor::new(seq(&["a", "b"]));
        assert!(editor.remove_at(7).is_err());
        assert!(editor.reorder(0, 2).is_err());
        assert_eq!(editor.working().ids(), vec!["a", "b"]);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_append_then_remove_appended() {
        let mut editor = ListEditor::new(seq(&["a", "b"]));
        editor.append(&seq(&["c"]));
        assert!(editor.is_dirty());
        editor.remove_at(2).unwrap();
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_reset_to_canonical_clears_dirty() {
        let mut editor = ListEditor::new(seq(&["a", "b"]));
        editor.append(&seq(&["a"]));
        let canonical = editor.canonical().clone();
        editor.reset(&canonical);
        assert!(!editor.is_dirty());

        editor.remove_at(0).unwrap();
        editor.discard();
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_load_replaces_both_views() {
        let mut editor = ListEditor::new(seq(&["a"]));
        editor.append(&seq(&["b"]));
        editor.load(seq(&["x", "y"]));
        assert_eq!(editor.canonical().ids(), vec!["x", "y"]);
        assert_eq!(editor.working().ids(), vec!["x", "y"]);
        assert!(!editor.is_dirty());
    }

    #[test]
    fn test_dirty_is_order_sensitive() {
        let mut editor = ListEditor::new(seq(&["a", "b"]));
        editor.reset(&seq(&["b", "a"]));
        assert!(editor.is_dirty());
    }
}
