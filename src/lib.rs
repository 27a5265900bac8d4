//! An algorithm engine for interactive graph sandboxes.
//!
//! A host (usually some canvas-based UI) edits a [graph::GraphModel] and asks for
//! classical algorithms to be run against it:
//! traversals, shortest paths, bipartiteness, minimum spanning forests,
//! maximum flows and Eulerian trails.
//!
//! # Steps instead of timers
//!
//! Every algorithm is a lazy iterator of [algorithm::Step]s over an immutable
//! [graph::AdjacencyView] snapshot.
//! The host drains it on its own schedule, one step per animation frame or
//! all at once in tests, and the last step always carries the final outcome.
//! Per-run state such as visited flags, distances and colors lives in
//! [algorithm::Annotations], never on the graph itself.
//! The only exception is max flow, whose per-edge flow is committed onto the
//! graph when, and only when, a run completes.
//!
//! ```rust
//! use graph_sandbox::{algorithm::*, graph::*};
//!
//! let mut g = GraphModel::new();
//! let a = g.add_node(Position::new(0.0, 0.0));
//! let b = g.add_node(Position::new(1.0, 0.0));
//! let c = g.add_node(Position::new(0.0, 1.0));
//! g.add_or_update_edge(a, b, 5.0, false).unwrap();
//! g.add_or_update_edge(a, c, 3.0, false).unwrap();
//! g.add_or_update_edge(c, b, 1.0, false).unwrap();
//!
//! let sp = dijkstra(&g, a, b).unwrap();
//! assert_eq!(sp.distance, Some(4.0));
//! assert_eq!(sp.path, vec![a, c, b]);
//! ```

pub mod algorithm;
mod error;
pub use self::error::*;
pub mod graph;
mod run;
pub use self::run::*;
mod sandbox;
pub use self::sandbox::*;

#[cfg(test)]
mod testing;
