use std::collections::HashSet;

use pprof_tree_core::model::{FunctionKey, Granularity, MeasurementMode, TreeNode};
use pprof_tree_core::{CallTreeView, EngineError, TreeOptions, build_call_tree};
use pprof_tree_protocol::pprof::Profile;

/// One visible line of the tree browser.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub depth: usize,
    pub path: Vec<FunctionKey>,
    pub label: String,
    pub value: i64,
    pub percent: f64,
    pub is_leaf: bool,
    pub expanded: bool,
}

/// Interactive state: the decoded profile, the current options and the tree
/// they produced. Every option change rebuilds the tree from the profile.
pub struct App {
    profile: Profile,
    options: TreeOptions,
    view: CallTreeView,
    expanded: HashSet<Vec<FunctionKey>>,
    selected: usize,
    pub editing_filter: bool,
    pub status: Option<String>,
}

impl App {
    pub fn new(profile: Profile, options: TreeOptions) -> Result<Self, EngineError> {
        let view = build_call_tree(&profile, &options)?;
        let mut app = Self {
            profile,
            options,
            view,
            expanded: HashSet::new(),
            selected: 0,
            editing_filter: false,
            status: None,
        };
        app.expand_top_level();
        Ok(app)
    }

    pub fn view(&self) -> &CallTreeView {
        &self.view
    }

    pub fn options(&self) -> &TreeOptions {
        &self.options
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    /// Swap in new options; on failure the previous tree stays and the error
    /// goes to the status line.
    fn apply(&mut self, options: TreeOptions) -> bool {
        match build_call_tree(&self.profile, &options) {
            Ok(view) => {
                self.options = options;
                self.view = view;
                self.status = None;
                self.clamp_selection();
                true
            }
            Err(err) => {
                log::warn!("rebuild failed: {err}");
                self.status = Some(err.to_string());
                false
            }
        }
    }

    pub fn toggle_granularity(&mut self) {
        let options = TreeOptions {
            granularity: self.options.granularity.toggled(),
            ..self.options.clone()
        };
        // Keys change with granularity, so old expansion state is useless.
        if self.apply(options) {
            self.expanded.clear();
            self.expand_top_level();
        }
    }

    /// Move to the next mode this profile supports.
    pub fn cycle_mode(&mut self) {
        let modes = self.view.kind.modes();
        let next = match modes.iter().position(|m| *m == self.options.mode) {
            Some(i) => modes[(i + 1) % modes.len()],
            None => modes[0],
        };
        if next == self.options.mode {
            self.status = Some(format!(
                "{} profiles only support `{next}` mode",
                self.view.kind
            ));
            return;
        }
        self.set_mode(next);
    }

    pub fn set_mode(&mut self, mode: MeasurementMode) {
        let options = TreeOptions {
            mode,
            ..self.options.clone()
        };
        self.apply(options);
    }

    pub fn push_filter(&mut self, c: char) {
        let mut options = self.options.clone();
        options.filter.push(c);
        self.apply(options);
    }

    pub fn pop_filter(&mut self) {
        let mut options = self.options.clone();
        if options.filter.pop().is_some() {
            self.apply(options);
        }
    }

    pub fn clear_filter(&mut self) {
        if !self.options.filter.is_empty() {
            let options = TreeOptions {
                filter: String::new(),
                ..self.options.clone()
            };
            self.apply(options);
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.rows().len();
        if len == 0 {
            self.selected = 0;
            return;
        }
        self.selected = self.selected.saturating_add_signed(delta).min(len - 1);
    }

    pub fn expand_selected(&mut self) {
        if let Some(row) = self.rows().into_iter().nth(self.selected)
            && !row.is_leaf
        {
            self.expanded.insert(row.path);
        }
    }

    /// Collapse the selected row, or jump to its parent when it is already
    /// collapsed.
    pub fn collapse_selected(&mut self) {
        let rows = self.rows();
        let Some(row) = rows.get(self.selected) else {
            return;
        };
        if row.expanded {
            self.expanded.remove(&row.path);
            return;
        }
        let parent = &row.path[..row.path.len().saturating_sub(1)];
        if let Some(i) = rows.iter().position(|r| r.path == parent) {
            self.selected = i;
        }
    }

    /// While filtering every visible node is shown expanded.
    fn is_expanded(&self, path: &[FunctionKey]) -> bool {
        !self.options.filter.is_empty() || self.expanded.contains(path)
    }

    fn expand_top_level(&mut self) {
        for child in &self.view.tree.root.children {
            if let Some(key) = &child.key {
                self.expanded.insert(vec![key.clone()]);
            }
        }
    }

    fn clamp_selection(&mut self) {
        let len = self.rows().len();
        self.selected = self.selected.min(len.saturating_sub(1));
    }

    /// Flatten the visible, expanded part of the tree.
    pub fn rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut path = Vec::new();
        self.collect_rows(&self.view.tree.root, &mut path, &mut rows);
        rows
    }

    fn collect_rows(&self, node: &TreeNode, path: &mut Vec<FunctionKey>, rows: &mut Vec<Row>) {
        for child in node.visible_children() {
            let Some(key) = &child.key else {
                continue;
            };
            path.push(key.clone());
            let expanded = !child.is_leaf() && self.is_expanded(path);
            rows.push(Row {
                depth: path.len() - 1,
                path: path.clone(),
                label: node_label(child, self.options.granularity),
                value: child.cumulative_value,
                percent: child.percent_of_total,
                is_leaf: child.is_leaf(),
                expanded,
            });
            if expanded {
                self.collect_rows(child, path, rows);
            }
            path.pop();
        }
    }
}

/// `name file.go:line`, or `name file.go` when lines are merged.
pub fn node_label(node: &TreeNode, granularity: Granularity) -> String {
    let file = node.file().rsplit('/').next().unwrap_or_default();
    match granularity {
        Granularity::Line => format!("{} {file}:{}", node.name(), node.line_number()),
        Granularity::Function => format!("{} {file}", node.name()),
    }
}
