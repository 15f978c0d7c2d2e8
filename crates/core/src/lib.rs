//! Turns a decoded pprof profile into an aggregated, percentage-annotated
//! call tree.
//!
//! ```text
//!   bytes ─▶ parsers ─▶ pprof::Profile ─▶ SymbolTable ─▶ extract_samples
//!                                                            │
//!   FunctionsTree ◀── sort ◀── filter ◀── build_tree ◀───────┘
//! ```
//!
//! [`engine::build_call_tree`] runs the whole pipeline for one set of
//! [`engine::TreeOptions`].

pub mod engine;
pub mod error;
pub mod extract;
pub mod model;
pub mod parsers;
pub mod symbols;
mod tree;

#[cfg(test)]
mod testing;

pub use engine::{CallTreeView, TreeOptions, build_call_tree};
pub use error::{EngineError, ErrorKind};
