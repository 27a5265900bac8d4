use super::*;
use crate::{graph::*, Result};
use log::debug;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TraversalKind {
    BreadthFirst,
    DepthFirst,
}

/// What a traversal found.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Traversal {
    pub kind: TraversalKind,
    pub start: NodeId,
    /// Nodes reachable from `start`, in visiting order.
    pub order: Vec<NodeId>,
    /// For every visited node but `start`: the node it was reached from and the edge used.
    pub parents: BTreeMap<NodeId, (NodeId, EdgeId)>,
}

impl Traversal {
    /// Follows parents back from `target`. For a BFS this is a fewest-hops path.
    pub fn path_to(&self, target: NodeId) -> Option<Vec<NodeId>> {
        if !self.order.contains(&target) {
            return None;
        }
        let mut path = vec![target];
        let mut cur = target;
        while let Some((parent, _)) = self.parents.get(&cur) {
            path.push(*parent);
            cur = *parent;
        }
        path.reverse();
        Some(path)
    }
}

/// BFS or DFS, one visited node per [Algorithm::advance].
pub struct TraversalState {
    view: Rc<AdjacencyView>,
    kind: TraversalKind,
    start: NodeId,
    /// `(node, reached from)`. A queue for BFS, a stack (its back) for DFS.
    frontier: VecDeque<(usize, Option<(NodeId, EdgeId)>)>,
    visited: Vec<bool>,
    order: Vec<NodeId>,
    parents: BTreeMap<NodeId, (NodeId, EdgeId)>,
}

pub type TraversalSteps = Steps<TraversalState>;

impl TraversalState {
    pub fn new(view: Rc<AdjacencyView>, kind: TraversalKind, start: NodeId) -> Result<Self> {
        let s = view.require("start node", start)?;
        let mut visited = vec![false; view.node_count()];
        if kind == TraversalKind::BreadthFirst {
            visited[s] = true;
        }
        let mut frontier = VecDeque::new();
        frontier.push_back((s, None));
        Ok(Self {
            view,
            kind,
            start,
            frontier,
            visited,
            order: vec![],
            parents: BTreeMap::new(),
        })
    }

    fn visit(&mut self, i: usize, from: Option<(NodeId, EdgeId)>, out: &mut VecDeque<Step>) {
        let id = self.view.node_at(i);
        if let Some(parent) = from {
            self.parents.insert(id, parent);
        }
        out.push_back(Step::visit(id, Payload::Order(self.order.len())));
        self.order.push(id);
    }

    fn advance_bfs(&mut self, out: &mut VecDeque<Step>) -> bool {
        let (u, from) = match self.frontier.pop_front() {
            Some(x) => x,
            None => return false,
        };
        self.visit(u, from, out);
        let view = self.view.clone();
        let uid = view.node_at(u);
        for n in view.neighbors_at(u) {
            let v = match view.index_of(n.node) {
                Some(v) => v,
                None => continue,
            };
            // marked on enqueue, so nothing is ever queued twice
            if !self.visited[v] {
                self.visited[v] = true;
                self.frontier.push_back((v, Some((uid, n.edge))));
                out.push_back(Step::edge_used(n.edge, n.node, None));
            }
        }
        true
    }

    fn advance_dfs(&mut self, out: &mut VecDeque<Step>) -> bool {
        loop {
            let (u, from) = match self.frontier.pop_back() {
                Some(x) => x,
                None => return false,
            };
            if self.visited[u] {
                continue;
            }
            self.visited[u] = true;
            if let Some((_, e)) = from {
                out.push_back(Step::edge_used(e, self.view.node_at(u), None));
            }
            self.visit(u, from, out);
            let view = self.view.clone();
            let uid = view.node_at(u);
            // reversed, so the first neighbor is popped first
            for n in view.neighbors_at(u).iter().rev() {
                if let Some(v) = view.index_of(n.node) {
                    if !self.visited[v] {
                        self.frontier.push_back((v, Some((uid, n.edge))));
                    }
                }
            }
            return true;
        }
    }
}

impl Algorithm for TraversalState {
    type Output = Traversal;

    fn advance(&mut self, out: &mut VecDeque<Step>) -> bool {
        let progressed = match self.kind {
            TraversalKind::BreadthFirst => self.advance_bfs(out),
            TraversalKind::DepthFirst => self.advance_dfs(out),
        };
        if !progressed {
            debug!(
                "{:?} from {} visited {} of {} node(s)",
                self.kind,
                self.start,
                self.order.len(),
                self.view.node_count()
            );
        }
        progressed
    }

    fn output(&self) -> Traversal {
        Traversal {
            kind: self.kind,
            start: self.start,
            order: self.order.clone(),
            parents: self.parents.clone(),
        }
    }

    fn into_outcome(output: Traversal) -> Outcome {
        Outcome::Traversal(output)
    }
}

pub fn bfs_steps(view: Rc<AdjacencyView>, start: NodeId) -> Result<TraversalSteps> {
    TraversalState::new(view, TraversalKind::BreadthFirst, start).map(Steps::new)
}

pub fn dfs_steps(view: Rc<AdjacencyView>, start: NodeId) -> Result<TraversalSteps> {
    TraversalState::new(view, TraversalKind::DepthFirst, start).map(Steps::new)
}

/// Breadth-first traversal from `start`.
///
/// ```rust
/// use graph_sandbox::{algorithm::*, graph::*};
///
/// let mut g = GraphModel::new();
/// let ids: Vec<_> = (0..4).map(|_| g.add_node(Position::default())).collect();
/// for w in ids.windows(2) {
///     g.add_or_update_edge(w[0], w[1], 1.0, false).unwrap();
/// }
/// assert_eq!(bfs(&g, ids[0]).unwrap().order, ids);
/// ```
pub fn bfs(graph: &GraphModel, start: NodeId) -> Result<Traversal> {
    Ok(bfs_steps(Rc::new(AdjacencyView::build(graph)), start)?.finish())
}

/// Depth-first traversal from `start`, trying neighbors in insertion order.
pub fn dfs(graph: &GraphModel, start: NodeId) -> Result<Traversal> {
    Ok(dfs_steps(Rc::new(AdjacencyView::build(graph)), start)?.finish())
}
