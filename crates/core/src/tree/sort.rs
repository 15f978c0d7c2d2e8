use crate::model::{FunctionsTree, TreeNode};

impl FunctionsTree {
    pub fn sort(&mut self) {
        self.root.sort();
    }
}

impl TreeNode {
    /// Order children heaviest first at every level. Equal values fall back
    /// to key order so the result does not depend on insertion order.
    pub fn sort(&mut self) {
        self.children.sort_by(|a, b| {
            b.cumulative_value
                .cmp(&a.cumulative_value)
                .then_with(|| a.key.cmp(&b.key))
        });
        self.reindex();
        for child in &mut self.children {
            child.sort();
        }
    }
}
