use crate::model::{Function, FunctionsTree, Granularity, ProfileSamples, Sample, TreeNode};

impl ProfileSamples {
    /// Merge every non-zero sample into a fresh call tree, mark visibility
    /// for `filter` and sort it heaviest first.
    ///
    /// The samples are not modified; building twice from the same inputs
    /// gives identical trees.
    pub fn build_tree(
        &self,
        name: impl Into<String>,
        granularity: Granularity,
        filter: &str,
    ) -> FunctionsTree {
        let mut tree = FunctionsTree::new(name, granularity);
        for sample in &self.samples {
            tree.insert(sample);
        }
        tree.filter(filter);
        tree.sort();
        tree
    }
}

impl FunctionsTree {
    /// Add one sample's stack below the root, merging with existing nodes
    /// that have the same key. Zero-value samples are ignored.
    pub fn insert(&mut self, sample: &Sample) {
        if sample.value == 0 {
            return;
        }
        let granularity = self.granularity;

        let mut node = &mut self.root;
        node.cumulative_value = node.cumulative_value.saturating_add(sample.value);
        node.percent_of_total += sample.percent_of_total;
        if sample.functions.is_empty() {
            node.self_value = node.self_value.saturating_add(sample.value);
        }

        for function in &sample.functions {
            node = node.merge_child(function, granularity, sample.value, sample.percent_of_total);
        }
    }
}

impl TreeNode {
    /// Find or create the child for `function` and add a sample's
    /// contribution to it.
    fn merge_child(
        &mut self,
        function: &Function,
        granularity: Granularity,
        value: i64,
        percent: f64,
    ) -> &mut TreeNode {
        let key = function.key(granularity);
        let i = match self.index.get(&key) {
            Some(&i) => i,
            None => {
                let i = self.children.len();
                let seed = Function {
                    self_value: 0,
                    ..function.clone()
                };
                self.index.insert(key.clone(), i);
                self.children.push(TreeNode::for_function(seed, key));
                i
            }
        };

        let child = &mut self.children[i];
        child.cumulative_value = child.cumulative_value.saturating_add(value);
        child.percent_of_total += percent;
        child.self_value = child.self_value.saturating_add(function.self_value);
        if let Some(f) = child.function.as_mut() {
            f.self_value = child.self_value;
        }
        child
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::FunctionKey;
    use crate::testing::{ProfileBuilder, extract_default};

    fn names(node: &TreeNode) -> Vec<&str> {
        node.children.iter().map(TreeNode::name).collect()
    }

    fn find<'a>(node: &'a TreeNode, name: &str) -> &'a TreeNode {
        match node.children.iter().find(|c| c.name() == name) {
            Some(child) => child,
            None => panic!("no child named {name} under {}", node.name()),
        }
    }

    #[test]
    fn shared_prefix_merges() {
        let samples = extract_default(
            &ProfileBuilder::cpu()
                .sample(&["A", "B"], &[1, 10])
                .sample(&["A", "C"], &[1, 20])
                .build(),
        );
        let tree = samples.build_tree("cpu.pprof", Granularity::Function, "");

        assert_eq!(names(&tree.root), ["A"]);
        let a = find(&tree.root, "A");
        assert_eq!(a.cumulative_value, 30);
        assert_eq!(a.self_value, 0);
        assert_eq!(names(a), ["C", "B"]);

        let b = find(a, "B");
        let c = find(a, "C");
        assert_eq!((b.cumulative_value, b.self_value), (10, 10));
        assert_eq!((c.cumulative_value, c.self_value), (20, 20));
        assert!((b.percent_of_total - 100.0 / 3.0).abs() < 1e-9);
        assert!((c.percent_of_total - 200.0 / 3.0).abs() < 1e-9);
        assert_eq!(c.function.as_ref().map(|f| f.self_value), Some(20));
        assert!((tree.root.percent_of_total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn zero_value_sample_adds_no_nodes() {
        let samples = extract_default(
            &ProfileBuilder::cpu()
                .sample(&["A", "B"], &[1, 0])
                .sample(&["X"], &[1, 5])
                .build(),
        );
        let tree = samples.build_tree("cpu.pprof", Granularity::Function, "");
        assert_eq!(names(&tree.root), ["X"]);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn repeated_paths_accumulate_self_value() {
        let samples = extract_default(
            &ProfileBuilder::cpu()
                .sample(&["main", "work"], &[1, 4])
                .sample(&["main", "work"], &[1, 6])
                .sample(&["main"], &[1, 5])
                .build(),
        );
        let tree = samples.build_tree("cpu.pprof", Granularity::Function, "");
        let main = find(&tree.root, "main");
        assert_eq!((main.cumulative_value, main.self_value), (15, 5));
        let work = find(main, "work");
        assert_eq!((work.cumulative_value, work.self_value), (10, 10));
        assert!(work.is_leaf());
    }

    #[test]
    fn line_granularity_splits_call_sites() {
        let profile = ProfileBuilder::cpu()
            .sample_at(&[("main", 10), ("parse", 3)], &[1, 7])
            .sample_at(&[("main", 12), ("parse", 3)], &[1, 9])
            .build();
        let samples = extract_default(&profile);

        let by_function = samples.build_tree("t", Granularity::Function, "");
        assert_eq!(names(&by_function.root), ["main"]);
        assert_eq!(find(&by_function.root, "main").cumulative_value, 16);

        let by_line = samples.build_tree("t", Granularity::Line, "");
        let lines: Vec<u64> = by_line.root.children.iter().map(TreeNode::line_number).collect();
        assert_eq!(lines, [12, 10]);
    }

    #[test]
    fn siblings_never_share_a_key() {
        fn check(node: &TreeNode) {
            let keys: HashSet<&FunctionKey> =
                node.children.iter().filter_map(|c| c.key.as_ref()).collect();
            assert_eq!(keys.len(), node.children.len());
            node.children.iter().for_each(check);
        }
        let profile = ProfileBuilder::cpu()
            .sample_at(&[("main", 1), ("a", 1), ("b", 1)], &[1, 1])
            .sample_at(&[("main", 2), ("a", 2), ("b", 1)], &[1, 2])
            .sample_at(&[("main", 1), ("b", 4)], &[1, 3])
            .sample_at(&[("main", 1), ("a", 1), ("b", 9)], &[1, 4])
            .build();
        let samples = extract_default(&profile);
        for granularity in [Granularity::Function, Granularity::Line] {
            check(&samples.build_tree("t", granularity, "").root);
        }
    }

    #[test]
    fn building_twice_is_identical() {
        let profile = ProfileBuilder::cpu()
            .sample(&["main", "a", "b"], &[1, 3])
            .sample(&["main", "b"], &[1, 3])
            .sample(&["main", "a", "c"], &[1, 8])
            .sample(&["init"], &[1, 1])
            .build();
        let samples = extract_default(&profile);
        let first = samples.build_tree("t", Granularity::Line, "a");
        let second = samples.build_tree("t", Granularity::Line, "a");
        assert_eq!(first, second);
        assert_eq!(first.node_count(), 6);
    }

    #[test]
    fn values_saturate_instead_of_overflowing() {
        let big = Sample {
            functions: vec![Function {
                self_value: i64::MAX,
                ..Function::new("hot", "hot.go", 1)
            }],
            value: i64::MAX,
            percent_of_total: 50.0,
        };
        let mut tree = FunctionsTree::new("t", Granularity::Function);
        tree.insert(&big);
        tree.insert(&big);
        let hot = find(&tree.root, "hot");
        assert_eq!(tree.root.cumulative_value, i64::MAX);
        assert_eq!((hot.cumulative_value, hot.self_value), (i64::MAX, i64::MAX));
    }
}
