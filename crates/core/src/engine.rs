use serde::{Deserialize, Serialize};

use pprof_tree_protocol::{ValueUnit, pprof};

use crate::error::EngineError;
use crate::extract::extract_samples;
use crate::model::{FunctionsTree, Granularity, MeasurementMode, ProfileKind};
use crate::symbols::SymbolTable;

/// Everything that shapes a call tree besides the profile itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Name given to the tree, usually the profile's path.
    pub name: String,
    pub mode: MeasurementMode,
    pub granularity: Granularity,
    /// Case-insensitive substring; empty shows everything.
    pub filter: String,
}

/// A call tree together with the profile facts needed to present it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallTreeView {
    pub kind: ProfileKind,
    pub mode: MeasurementMode,
    /// Sum of all sample values in the selected column.
    pub total: i64,
    pub capture_duration_nanos: i64,
    pub tree: FunctionsTree,
}

impl CallTreeView {
    pub fn value_unit(&self) -> ValueUnit {
        self.kind.value_unit()
    }
}

/// Derive a call tree from a decoded profile.
///
/// Every call starts from scratch: symbols are resolved, samples extracted
/// for `options.mode`, merged, filtered and sorted. Nothing is cached or
/// shared between calls.
pub fn build_call_tree(
    profile: &pprof::Profile,
    options: &TreeOptions,
) -> Result<CallTreeView, EngineError> {
    let symbols = SymbolTable::resolve(profile);
    let samples = extract_samples(profile, &symbols, options.mode)?;
    let tree = samples.build_tree(options.name.as_str(), options.granularity, &options.filter);
    log::debug!(
        "built {:?}-granularity tree {:?} with {} nodes",
        options.granularity,
        options.name,
        tree.node_count()
    );
    Ok(CallTreeView {
        kind: samples.kind,
        mode: samples.mode,
        total: samples.total,
        capture_duration_nanos: samples.capture_duration_nanos,
        tree,
    })
}
