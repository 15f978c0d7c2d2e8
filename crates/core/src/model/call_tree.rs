use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::{Function, FunctionKey, Granularity};

/// Aggregated call tree: every sample's stack merged into one tree, with
/// identical call paths collapsed into a single weighted node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunctionsTree {
    pub name: String,
    pub granularity: Granularity,
    pub root: TreeNode,
}

impl FunctionsTree {
    pub fn new(name: impl Into<String>, granularity: Granularity) -> Self {
        Self {
            name: name.into(),
            granularity,
            root: TreeNode::default(),
        }
    }

    /// Number of nodes below the root.
    pub fn node_count(&self) -> usize {
        self.root.descendant_count()
    }
}

/// A node of a [`FunctionsTree`]. The root carries no function.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredNode")]
pub struct TreeNode {
    pub function: Option<Function>,
    /// Merge identity under the tree's granularity; `None` for the root.
    pub key: Option<FunctionKey>,
    /// Value of every sample whose stack passes through this node.
    pub cumulative_value: i64,
    /// Value of samples whose stack ends at this node.
    pub self_value: i64,
    /// Sum of the percentages of the contributing samples.
    pub percent_of_total: f64,
    pub visible: bool,
    /// Insertion order until sorted, then heaviest first.
    pub children: Vec<TreeNode>,
    /// Position of each child in `children`, by key.
    #[serde(skip)]
    pub(crate) index: HashMap<FunctionKey, usize>,
}

/// Deserialized shape of a [`TreeNode`]; the child index is rebuilt from it.
#[derive(Deserialize)]
struct StoredNode {
    function: Option<Function>,
    key: Option<FunctionKey>,
    cumulative_value: i64,
    self_value: i64,
    percent_of_total: f64,
    visible: bool,
    children: Vec<TreeNode>,
}

impl From<StoredNode> for TreeNode {
    fn from(stored: StoredNode) -> Self {
        let mut node = Self {
            function: stored.function,
            key: stored.key,
            cumulative_value: stored.cumulative_value,
            self_value: stored.self_value,
            percent_of_total: stored.percent_of_total,
            visible: stored.visible,
            children: stored.children,
            index: HashMap::new(),
        };
        node.reindex();
        node
    }
}

impl TreeNode {
    pub(crate) fn for_function(function: Function, key: FunctionKey) -> Self {
        Self {
            function: Some(function),
            key: Some(key),
            ..Default::default()
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Display name; `"Root"` for the root.
    pub fn name(&self) -> &str {
        self.function.as_ref().map_or("Root", |f| f.name.as_str())
    }

    pub fn file(&self) -> &str {
        self.function.as_ref().map_or("", |f| f.file.as_str())
    }

    pub fn line_number(&self) -> u64 {
        self.function.as_ref().map_or(0, |f| f.line_number)
    }

    pub fn child(&self, key: &FunctionKey) -> Option<&TreeNode> {
        self.index.get(key).and_then(|&i| self.children.get(i))
    }

    pub fn visible_children(&self) -> impl Iterator<Item = &TreeNode> {
        self.children.iter().filter(|c| c.visible)
    }

    pub fn descendant_count(&self) -> usize {
        self.children.iter().map(|c| 1 + c.descendant_count()).sum()
    }

    /// Recompute the key → position index after `children` was reordered.
    pub(crate) fn reindex(&mut self) {
        self.index = self
            .children
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.key.clone().map(|k| (k, i)))
            .collect();
    }
}
