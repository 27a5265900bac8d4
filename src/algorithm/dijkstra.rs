use super::*;
use crate::{graph::*, Error, Result};
use ahash::RandomState;
use keyed_priority_queue::KeyedPriorityQueue;
use log::debug;
use std::cmp::Reverse;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

/// Result of a single-pair shortest path search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ShortestPath {
    pub start: NodeId,
    pub target: NodeId,
    /// `None` if `target` cannot be reached.
    pub distance: Option<f64>,
    /// `start` to `target`, empty if unreachable.
    pub path: Vec<NodeId>,
    /// Edges along `path`.
    pub edges: Vec<EdgeId>,
    /// Final distances of every node settled before the search stopped.
    pub settled: BTreeMap<NodeId, f64>,
}

impl ShortestPath {
    pub fn is_reachable(&self) -> bool {
        self.distance.is_some()
    }
}

/// Dijkstra's label-setting algorithm, one settled node per [Algorithm::advance].
///
/// Weights are non-negative by construction of [GraphModel].
/// Among nodes with equal tentative distances, the one reached first is settled first.
pub struct DijkstraState {
    view: Rc<AdjacencyView>,
    start: usize,
    target: usize,
    dist: Vec<Option<f64>>,
    prev: Vec<Option<(usize, EdgeId)>>,
    settled: Vec<bool>,
    queue: KeyedPriorityQueue<usize, Reverse<(Cost, u64)>, RandomState>,
    pushes: u64,
    reached_target: bool,
}

pub type DijkstraSteps = Steps<DijkstraState>;

impl DijkstraState {
    pub fn new(view: Rc<AdjacencyView>, start: NodeId, target: NodeId) -> Result<Self> {
        let s = view.require("start node", start)?;
        let t = view.require("target node", target)?;
        if s == t {
            return Err(Error::InvalidArgument(format!(
                "start and target are both {}",
                start
            )));
        }
        let n = view.node_count();
        let mut queue = KeyedPriorityQueue::with_capacity_and_hasher(n, RandomState::new());
        queue.push(s, Reverse((Cost(0.0), 0)));
        let mut dist = vec![None; n];
        dist[s] = Some(0.0);
        Ok(Self {
            view,
            start: s,
            target: t,
            dist,
            prev: vec![None; n],
            settled: vec![false; n],
            queue,
            pushes: 1,
            reached_target: false,
        })
    }
}

impl Algorithm for DijkstraState {
    type Output = ShortestPath;

    fn advance(&mut self, out: &mut VecDeque<Step>) -> bool {
        if self.reached_target {
            return false;
        }
        let (u, Reverse((Cost(d), _))) = match self.queue.pop() {
            Some(x) => x,
            None => {
                debug!(
                    "dijkstra: {} unreachable from {}",
                    self.view.node_at(self.target),
                    self.view.node_at(self.start)
                );
                return false;
            }
        };
        self.settled[u] = true;
        out.push_back(Step::settle(self.view.node_at(u), d));
        if u == self.target {
            self.reached_target = true;
            debug!("dijkstra: target settled at distance {}", d);
            return true;
        }
        let view = self.view.clone();
        for n in view.neighbors_at(u) {
            let v = match view.index_of(n.node) {
                Some(v) => v,
                None => continue,
            };
            if self.settled[v] {
                continue;
            }
            let alt = d + n.weight;
            if self.dist[v].map_or(true, |dv| alt < dv) {
                self.dist[v] = Some(alt);
                self.prev[v] = Some((u, n.edge));
                self.queue.push(v, Reverse((Cost(alt), self.pushes)));
                self.pushes += 1;
                out.push_back(Step::edge_used(n.edge, n.node, Some(Payload::Distance(alt))));
            }
        }
        true
    }

    fn output(&self) -> ShortestPath {
        let mut path = vec![];
        let mut edges = vec![];
        let distance = if self.settled[self.target] {
            self.dist[self.target]
        } else {
            None
        };
        if distance.is_some() {
            let mut cur = self.target;
            path.push(self.view.node_at(cur));
            while let Some((p, e)) = self.prev[cur] {
                path.push(self.view.node_at(p));
                edges.push(e);
                cur = p;
            }
            path.reverse();
            edges.reverse();
        }
        let settled = self
            .settled
            .iter()
            .enumerate()
            .filter(|(_, s)| **s)
            .filter_map(|(i, _)| self.dist[i].map(|d| (self.view.node_at(i), d)))
            .collect();
        ShortestPath {
            start: self.view.node_at(self.start),
            target: self.view.node_at(self.target),
            distance,
            path,
            edges,
            settled,
        }
    }

    fn into_outcome(output: ShortestPath) -> Outcome {
        Outcome::ShortestPath(output)
    }
}

pub fn dijkstra_steps(
    view: Rc<AdjacencyView>,
    start: NodeId,
    target: NodeId,
) -> Result<DijkstraSteps> {
    DijkstraState::new(view, start, target).map(Steps::new)
}

/// Shortest path from `start` to `target`.
///
/// An unreachable target is an ordinary result with `distance == None`.
pub fn dijkstra(graph: &GraphModel, start: NodeId, target: NodeId) -> Result<ShortestPath> {
    Ok(dijkstra_steps(Rc::new(AdjacencyView::build(graph)), start, target)?.finish())
}
