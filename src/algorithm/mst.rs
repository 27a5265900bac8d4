use super::*;
use crate::{graph::*, Error, Result};
use ahash::RandomState;
use keyed_priority_queue::KeyedPriorityQueue;
use log::{debug, trace};
use petgraph::unionfind::UnionFind;
use std::cmp::Reverse;
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MstMethod {
    Prim,
    Kruskal,
}

/// A minimum spanning tree of every connected component.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SpanningForest {
    pub method: MstMethod,
    /// In the order they were accepted.
    pub edges: Vec<EdgeId>,
    pub total_weight: f64,
    /// Number of trees, i.e. of connected components.
    pub trees: usize,
}

impl SpanningForest {
    pub fn is_spanning_tree(&self) -> bool {
        self.trees <= 1
    }
}

fn reject_directed(view: &AdjacencyView) -> Result<()> {
    match view.edges().iter().find(|e| e.directed) {
        Some(e) => Err(Error::InvalidState(format!(
            "spanning trees need undirected edges, but {} is directed",
            e.id
        ))),
        None => Ok(()),
    }
}

/// Prim's algorithm, one node added per [Algorithm::advance].
///
/// Whenever the frontier runs dry it restarts from the first uncovered node,
/// so disconnected graphs get a spanning forest.
pub struct PrimState {
    view: Rc<AdjacencyView>,
    root: usize,
    next_root: usize,
    in_tree: Vec<bool>,
    covered: usize,
    /// For every node outside the tree, the cheapest edge reaching it.
    /// Equal weights are broken by edge id, i.e. insertion order.
    queue: KeyedPriorityQueue<usize, Reverse<(Cost, EdgeId)>, RandomState>,
    edges: Vec<EdgeId>,
    total_weight: f64,
    trees: usize,
}

pub type PrimSteps = Steps<PrimState>;

impl PrimState {
    pub fn new(view: Rc<AdjacencyView>, root: Option<NodeId>) -> Result<Self> {
        reject_directed(&view)?;
        let root = match root {
            Some(id) => view.require("root node", id)?,
            None => 0,
        };
        let n = view.node_count();
        Ok(Self {
            view,
            root,
            next_root: 0,
            in_tree: vec![false; n],
            covered: 0,
            queue: KeyedPriorityQueue::with_capacity_and_hasher(n, RandomState::new()),
            edges: vec![],
            total_weight: 0.0,
            trees: 0,
        })
    }

    fn cover(&mut self, u: usize, out: &mut VecDeque<Step>) {
        self.in_tree[u] = true;
        out.push_back(Step::visit(self.view.node_at(u), Payload::Order(self.covered)));
        self.covered += 1;
        let view = self.view.clone();
        for n in view.neighbors_at(u) {
            let v = match view.index_of(n.node) {
                Some(v) => v,
                None => continue,
            };
            if self.in_tree[v] {
                continue;
            }
            let candidate = Reverse((Cost(n.weight), n.edge));
            let better = match self.queue.get_priority(&v) {
                Some(best) => candidate > *best,
                None => true,
            };
            if better {
                self.queue.push(v, candidate);
            }
        }
    }

    fn next_uncovered(&mut self) -> Option<usize> {
        if self.root < self.in_tree.len() && !self.in_tree[self.root] {
            return Some(self.root);
        }
        while self.next_root < self.in_tree.len() && self.in_tree[self.next_root] {
            self.next_root += 1;
        }
        if self.next_root < self.in_tree.len() {
            Some(self.next_root)
        } else {
            None
        }
    }
}

impl Algorithm for PrimState {
    type Output = SpanningForest;

    fn advance(&mut self, out: &mut VecDeque<Step>) -> bool {
        match self.queue.pop() {
            Some((v, Reverse((Cost(w), e)))) => {
                self.edges.push(e);
                self.total_weight += w;
                out.push_back(Step::edge_used(e, self.view.node_at(v), Some(Payload::Weight(w))));
                self.cover(v, out);
                true
            }
            None => match self.next_uncovered() {
                Some(root) => {
                    self.trees += 1;
                    debug!("prim: tree #{} grows from {}", self.trees, self.view.node_at(root));
                    self.cover(root, out);
                    true
                }
                None => false,
            },
        }
    }

    fn output(&self) -> SpanningForest {
        SpanningForest {
            method: MstMethod::Prim,
            edges: self.edges.clone(),
            total_weight: self.total_weight,
            trees: self.trees,
        }
    }

    fn into_outcome(output: SpanningForest) -> Outcome {
        Outcome::SpanningForest(output)
    }
}

/// Kruskal's algorithm, one accepted edge per [Algorithm::advance].
pub struct KruskalState {
    view: Rc<AdjacencyView>,
    /// Positions into `view.edges()`, cheapest first, ties by insertion order.
    sorted: Vec<usize>,
    cursor: usize,
    components: UnionFind<usize>,
    edges: Vec<EdgeId>,
    total_weight: f64,
}

pub type KruskalSteps = Steps<KruskalState>;

impl KruskalState {
    pub fn new(view: Rc<AdjacencyView>) -> Result<Self> {
        reject_directed(&view)?;
        let mut sorted: Vec<usize> = (0..view.edge_count()).collect();
        // the sort is stable and view edges are in id order
        sorted.sort_by_key(|i| Cost(view.edges()[*i].weight));
        let components = UnionFind::new(view.node_count());
        Ok(Self {
            view,
            sorted,
            cursor: 0,
            components,
            edges: vec![],
            total_weight: 0.0,
        })
    }

    fn is_complete(&self) -> bool {
        self.edges.len() + 1 >= self.view.node_count()
    }
}

impl Algorithm for KruskalState {
    type Output = SpanningForest;

    fn advance(&mut self, out: &mut VecDeque<Step>) -> bool {
        while !self.is_complete() && self.cursor < self.sorted.len() {
            let e = self.view.edges()[self.sorted[self.cursor]];
            self.cursor += 1;
            let (u, v) = match (self.view.index_of(e.from), self.view.index_of(e.to)) {
                (Some(u), Some(v)) => (u, v),
                _ => continue,
            };
            if self.components.union(u, v) {
                self.edges.push(e.id);
                self.total_weight += e.weight;
                out.push_back(Step::edge_used(e.id, e.to, Some(Payload::Weight(e.weight))));
                return true;
            }
            trace!("kruskal: {} would close a cycle", e.id);
        }
        false
    }

    fn output(&self) -> SpanningForest {
        SpanningForest {
            method: MstMethod::Kruskal,
            edges: self.edges.clone(),
            total_weight: self.total_weight,
            trees: self.view.node_count() - self.edges.len(),
        }
    }

    fn into_outcome(output: SpanningForest) -> Outcome {
        Outcome::SpanningForest(output)
    }
}

pub fn prim_steps(view: Rc<AdjacencyView>, root: Option<NodeId>) -> Result<PrimSteps> {
    PrimState::new(view, root).map(Steps::new)
}

pub fn kruskal_steps(view: Rc<AdjacencyView>) -> Result<KruskalSteps> {
    KruskalState::new(view).map(Steps::new)
}

/// Minimum spanning forest by Prim's algorithm, growing the first tree from `root`
/// (the first node if `None`).
///
/// Fails with [Error::InvalidState] if any edge is directed.
pub fn prim(graph: &GraphModel, root: Option<NodeId>) -> Result<SpanningForest> {
    Ok(prim_steps(Rc::new(AdjacencyView::build(graph)), root)?.finish())
}

/// Minimum spanning forest by Kruskal's algorithm.
///
/// Fails with [Error::InvalidState] if any edge is directed.
pub fn kruskal(graph: &GraphModel) -> Result<SpanningForest> {
    Ok(kruskal_steps(Rc::new(AdjacencyView::build(graph)))?.finish())
}
