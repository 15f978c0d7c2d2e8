use serde::{Deserialize, Serialize};

use pprof_tree_protocol::SharedStr;

use super::{MeasurementMode, ProfileKind};

/// Prefix given to the display name of a frame that was inlined into its
/// caller.
pub const INLINED_PREFIX: &str = "(inlined) ";

/// How finely call sites are told apart when stacks are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Granularity {
    /// One node per (name, file): call sites on different lines merge.
    #[default]
    Function,
    /// One node per (name, file, line).
    Line,
}

impl Granularity {
    pub fn toggled(self) -> Self {
        match self {
            Self::Function => Self::Line,
            Self::Line => Self::Function,
        }
    }
}

/// One resolved stack frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Function {
    /// Display name, prefixed with [`INLINED_PREFIX`] for inlined frames.
    pub name: SharedStr,
    pub file: SharedStr,
    pub line_number: u64,
    /// Value of samples whose stack ends at this frame.
    pub self_value: i64,
    pub inlined: bool,
}

impl Function {
    pub fn new(name: impl Into<SharedStr>, file: impl Into<SharedStr>, line_number: u64) -> Self {
        Self {
            name: name.into(),
            file: file.into(),
            line_number,
            self_value: 0,
            inlined: false,
        }
    }

    /// Identity of this frame for merging under `granularity`.
    pub fn key(&self, granularity: Granularity) -> FunctionKey {
        FunctionKey {
            name: self.name.clone(),
            file: self.file.clone(),
            line: match granularity {
                Granularity::Function => None,
                Granularity::Line => Some(self.line_number),
            },
        }
    }
}

/// Merge identity of a [`Function`]. Ordered so it can double as a stable
/// tie-breaker when sorting siblings.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FunctionKey {
    pub name: SharedStr,
    pub file: SharedStr,
    pub line: Option<u64>,
}

impl std::fmt::Display for FunctionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{} {}:{line}", self.name, self.file),
            None => write!(f, "{} {}", self.name, self.file),
        }
    }
}

/// A resolved call stack and the value measured for it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// Root first, leaf last.
    pub functions: Vec<Function>,
    pub value: i64,
    /// Share of the profile total, in percent. 0 when the total is 0.
    pub percent_of_total: f64,
}

/// Every sample of a profile, resolved for one measurement mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileSamples {
    pub kind: ProfileKind,
    /// The mode the caller asked for.
    pub mode: MeasurementMode,
    /// Index into each raw sample's value array that `mode` resolved to.
    pub column: usize,
    pub samples: Vec<Sample>,
    /// Sum of all sample values.
    pub total: i64,
    /// Wall duration of the capture in nanoseconds (informational).
    pub capture_duration_nanos: i64,
}
