use super::*;
use crate::graph::*;
use log::debug;
use std::collections::{BTreeMap, VecDeque};
use std::rc::Rc;

/// Either a 2-coloring of all nodes, or the edge that makes one impossible.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Bipartition {
    /// Every node colored 0 or 1, no edge joining two nodes of the same color.
    Bipartite { coloring: BTreeMap<NodeId, u8> },
    /// `edge` joins `nodes`, both colored alike when coloring stopped.
    Conflict {
        edge: EdgeId,
        nodes: (NodeId, NodeId),
        coloring: BTreeMap<NodeId, u8>,
    },
}

impl Bipartition {
    pub fn is_bipartite(&self) -> bool {
        matches!(self, Bipartition::Bipartite { .. })
    }

    /// The total coloring, if the graph is bipartite.
    pub fn coloring(&self) -> Option<&BTreeMap<NodeId, u8>> {
        match self {
            Bipartition::Bipartite { coloring } => Some(coloring),
            Bipartition::Conflict { .. } => None,
        }
    }
}

/// Component-by-component BFS 2-coloring, one dequeued node per [Algorithm::advance].
///
/// Edge directions are ignored. Stops at the first conflict.
pub struct BipartiteState {
    view: Rc<AdjacencyView>,
    color: Vec<Option<u8>>,
    queue: VecDeque<usize>,
    next_root: usize,
    conflict: Option<(EdgeId, usize, usize)>,
}

pub type BipartiteSteps = Steps<BipartiteState>;

impl BipartiteState {
    /// `view` should be an undirected projection, see [AdjacencyView::build_undirected].
    pub fn new(view: Rc<AdjacencyView>) -> Self {
        let n = view.node_count();
        Self {
            view,
            color: vec![None; n],
            queue: VecDeque::new(),
            next_root: 0,
            conflict: None,
        }
    }

    fn coloring(&self) -> BTreeMap<NodeId, u8> {
        self.color
            .iter()
            .enumerate()
            .filter_map(|(i, c)| c.map(|c| (self.view.node_at(i), c)))
            .collect()
    }
}

impl Algorithm for BipartiteState {
    type Output = Bipartition;

    fn advance(&mut self, out: &mut VecDeque<Step>) -> bool {
        if self.conflict.is_some() {
            return false;
        }
        let u = match self.queue.pop_front() {
            Some(u) => u,
            None => {
                while self.next_root < self.color.len() && self.color[self.next_root].is_some() {
                    self.next_root += 1;
                }
                if self.next_root == self.color.len() {
                    return false;
                }
                let root = self.next_root;
                self.color[root] = Some(0);
                self.queue.push_back(root);
                out.push_back(Step::visit(self.view.node_at(root), Payload::Color(0)));
                return true;
            }
        };
        let cu = self.color[u].unwrap_or(0);
        let view = self.view.clone();
        for n in view.neighbors_at(u) {
            let v = match view.index_of(n.node) {
                Some(v) => v,
                None => continue,
            };
            match self.color[v] {
                None => {
                    self.color[v] = Some(1 - cu);
                    self.queue.push_back(v);
                    out.push_back(Step::edge_used(n.edge, n.node, None));
                    out.push_back(Step::visit(n.node, Payload::Color(1 - cu)));
                }
                Some(cv) if cv == cu => {
                    debug!(
                        "not bipartite: {} joins {} and {}, both colored {}",
                        n.edge,
                        view.node_at(u),
                        n.node,
                        cu
                    );
                    self.conflict = Some((n.edge, u, v));
                    out.push_back(Step::edge_used(n.edge, n.node, Some(Payload::Color(cu))));
                    return true;
                }
                Some(_) => {}
            }
        }
        true
    }

    fn output(&self) -> Bipartition {
        match self.conflict {
            Some((edge, u, v)) => Bipartition::Conflict {
                edge,
                nodes: (self.view.node_at(u), self.view.node_at(v)),
                coloring: self.coloring(),
            },
            None => Bipartition::Bipartite {
                coloring: self.coloring(),
            },
        }
    }

    fn into_outcome(output: Bipartition) -> Outcome {
        Outcome::Bipartite(output)
    }
}

pub fn bipartite_steps(view: Rc<AdjacencyView>) -> BipartiteSteps {
    Steps::new(BipartiteState::new(view))
}

/// 2-colors the graph, treating every edge as undirected.
pub fn bipartition(graph: &GraphModel) -> Bipartition {
    bipartite_steps(Rc::new(AdjacencyView::build_undirected(graph))).finish()
}
