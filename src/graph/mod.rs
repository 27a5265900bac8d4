//! The graph a user edits and the projections algorithms run on.
//!
//! # `GraphModel` and `AdjacencyView`
//!
//! [GraphModel] is the single source of truth.
//! It is mutated only through edits by the host
//! and keeps its invariants on every edit:
//! no edge ever points to a removed node,
//! and no two edges occupy the same pair of nodes.
//!
//! Algorithms never see the model directly.
//! Each run takes an [AdjacencyView] first,
//! a plain snapshot of neighbor lists in insertion order,
//! and works on that until it is done.
//!
//! # Snapshots
//!
//! [Snapshot] is the logical import/export format.
//! It keeps every id, so exporting and importing a graph gives back the same graph.

mod node;
pub use self::node::*;
mod edge;
pub use self::edge::*;
mod model;
pub use self::model::*;
mod adjacency;
pub use self::adjacency::*;
mod snapshot;
pub use self::snapshot::*;
mod demo;
