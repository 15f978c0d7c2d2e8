use std::io::{self, Write};

use pprof_tree_core::CallTreeView;
use pprof_tree_core::model::{MeasurementMode, ProfileKind, TreeNode};

use crate::app::node_label;

/// Write the visible part of the tree as indented text, one node per line.
pub fn write_tree(out: &mut impl Write, view: &CallTreeView) -> io::Result<()> {
    writeln!(out, "{}", header(view))?;
    write_children(out, view, &view.tree.root, 0)
}

fn write_children(
    out: &mut impl Write,
    view: &CallTreeView,
    node: &TreeNode,
    depth: usize,
) -> io::Result<()> {
    let unit = view.value_unit();
    for child in node.visible_children() {
        writeln!(
            out,
            "{}[{:7.3}%] {} - {}",
            "  ".repeat(depth),
            child.percent_of_total,
            node_label(child, view.tree.granularity),
            unit.format_value(child.cumulative_value),
        )?;
        write_children(out, view, child, depth + 1)?;
    }
    Ok(())
}

/// Summary line shown above the tree.
pub fn header(view: &CallTreeView) -> String {
    let unit = view.value_unit();
    match view.kind {
        ProfileKind::Cpu => format!(
            "{} - total sampling duration: {} - total capture duration: {}",
            view.tree.name,
            unit.format_value(view.total),
            unit.format_value(view.capture_duration_nanos),
        ),
        ProfileKind::Heap => format!(
            "{} - {} memory: {}",
            view.tree.name,
            match view.mode {
                MeasurementMode::HeapInuse => "in-use",
                _ => "total allocated",
            },
            unit.format_value(view.total),
        ),
    }
}
