//! Mesh edge topology for shadow volume extraction.
//!
//! The topology is built once per mesh (see [`EdgeListBuilder`]) and is
//! immutable afterwards, except for the per-triangle light-facing flags that
//! are rewritten once per light per frame.

mod edge_builder;
mod edge_data;

pub use edge_builder::*;
pub use edge_data::*;
