use serde::{Deserialize, Serialize};

use pprof_tree_protocol::ValueUnit;

/// Which quantity of the profile the call tree measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MeasurementMode {
    /// The profile's primary value column, whatever it is.
    #[default]
    Default,
    /// CPU time (CPU profiles only).
    Cpu,
    /// Bytes allocated over the profile's lifetime (heap profiles only).
    HeapAlloc,
    /// Bytes still in use when the profile was taken (heap profiles only).
    HeapInuse,
}

impl MeasurementMode {
    pub const ALL: [MeasurementMode; 4] = [
        MeasurementMode::Default,
        MeasurementMode::Cpu,
        MeasurementMode::HeapAlloc,
        MeasurementMode::HeapInuse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::Cpu => "cpu",
            Self::HeapAlloc => "heap-alloc",
            Self::HeapInuse => "heap-inuse",
        }
    }
}

impl std::fmt::Display for MeasurementMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MeasurementMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!("unknown measurement mode {s:?} (expected default, cpu, heap-alloc or heap-inuse)")
            })
    }
}

/// The profile's own type, as declared by its period type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProfileKind {
    Cpu,
    Heap,
}

impl ProfileKind {
    /// Map a period type name to a kind. Only `"cpu"` and `"space"` are known.
    pub fn from_period_type(name: &str) -> Option<Self> {
        match name {
            "cpu" => Some(Self::Cpu),
            "space" => Some(Self::Heap),
            _ => None,
        }
    }

    /// The mode a fresh view of this kind of profile starts in.
    pub fn default_mode(&self) -> MeasurementMode {
        match self {
            Self::Cpu => MeasurementMode::Cpu,
            Self::Heap => MeasurementMode::HeapAlloc,
        }
    }

    /// Every explicit mode this kind of profile supports.
    pub fn modes(&self) -> &'static [MeasurementMode] {
        match self {
            Self::Cpu => &[MeasurementMode::Cpu],
            Self::Heap => &[MeasurementMode::HeapAlloc, MeasurementMode::HeapInuse],
        }
    }

    pub fn value_unit(&self) -> ValueUnit {
        match self {
            Self::Cpu => ValueUnit::Nanoseconds,
            Self::Heap => ValueUnit::Bytes,
        }
    }
}

impl std::fmt::Display for ProfileKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cpu => write!(f, "cpu"),
            Self::Heap => write!(f, "heap"),
        }
    }
}
