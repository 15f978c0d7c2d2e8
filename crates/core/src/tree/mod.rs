//! Operations on [`FunctionsTree`](crate::model::FunctionsTree): building it
//! from extracted samples, filtering and sorting.

mod build;
mod filter;
mod sort;
