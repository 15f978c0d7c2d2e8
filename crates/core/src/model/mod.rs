pub mod call_tree;
pub mod mode;
pub mod profile;

pub use call_tree::{FunctionsTree, TreeNode};
pub use mode::{MeasurementMode, ProfileKind};
pub use profile::{
    Function, FunctionKey, Granularity, INLINED_PREFIX, ProfileSamples, Sample,
};
