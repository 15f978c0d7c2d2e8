use crate::model::{FunctionsTree, TreeNode};

impl FunctionsTree {
    /// Mark node visibility for `term`. Returns whether anything matched.
    pub fn filter(&mut self, term: &str) -> bool {
        self.root.filter(term)
    }
}

impl TreeNode {
    /// Set `visible` on this node and every descendant.
    ///
    /// With an empty `term` everything is visible. Otherwise a node is visible
    /// when its function name or file contains `term` (ignoring case) or when
    /// any descendant is visible, so the path down to a match is never hidden.
    pub fn filter(&mut self, term: &str) -> bool {
        self.mark_visible(&term.to_lowercase())
    }

    fn mark_visible(&mut self, needle: &str) -> bool {
        let mut visible = needle.is_empty()
            || self.function.as_ref().is_some_and(|f| {
                f.name.to_lowercase().contains(needle) || f.file.to_lowercase().contains(needle)
            });
        // Every child is visited, even once `visible` is settled.
        for child in &mut self.children {
            visible |= child.mark_visible(needle);
        }
        self.visible = visible;
        visible
    }
}
