//! Graph algorithms
//!
//! Every algorithm comes in two flavors:
//!
//! *   `*_steps` takes a shared [AdjacencyView] and returns a lazy [Steps] iterator,
//!     for hosts which animate runs;
//! *   a plain function taking a [GraphModel] which runs to completion and returns the result.
//!
//! Both validate their arguments before anything runs,
//! so an invalid request never produces a partial animation.
mod step;
pub use self::step::*;
mod traversal;
pub use self::traversal::*;
mod dijkstra;
pub use self::dijkstra::*;
mod bipartite;
pub use self::bipartite::*;
mod mst;
pub use self::mst::*;
mod max_flow;
pub use self::max_flow::*;
mod euler;
pub use self::euler::*;
mod representation;
pub use self::representation::*;
pub mod graphviz;

use crate::graph::*;
use serde::Serialize;

/// The final result of a run, carried by its `Done` step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "algorithm", content = "result", rename_all = "camelCase")]
pub enum Outcome {
    Traversal(Traversal),
    ShortestPath(ShortestPath),
    Bipartite(Bipartition),
    SpanningForest(SpanningForest),
    MaxFlow(MaxFlow),
    Euler(EulerTrail),
}

/// A weight or a distance, totally ordered so it can go into priority queues.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Cost(pub f64);

impl Eq for Cost {}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Cost {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
}
