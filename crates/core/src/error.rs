use thiserror::Error;

use crate::model::{MeasurementMode, ProfileKind};

/// Coarse classification of an [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller asked for something the profile cannot provide.
    Configuration,
    /// The profile itself is of a type the engine does not handle.
    UnsupportedProfile,
}

/// Fatal failures of the call-tree engine. All of them are raised before any
/// sample is processed, so a caller never sees a partially built tree.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("measurement mode `{mode}` is not available for {kind} profiles")]
    IncompatibleMode {
        mode: MeasurementMode,
        kind: ProfileKind,
    },
    #[error("unsupported profile type {0:?} (expected \"cpu\" or \"space\")")]
    UnsupportedProfileType(String),
    #[error("value column {column} requested but the profile declares {declared} sample types")]
    MissingValueColumn { column: usize, declared: usize },
}

impl EngineError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::IncompatibleMode { .. } | Self::MissingValueColumn { .. } => {
                ErrorKind::Configuration
            }
            Self::UnsupportedProfileType(_) => ErrorKind::UnsupportedProfile,
        }
    }
}
