use crate::{graph::*, Error, Result};
use ahash::RandomState;
use bimap::BiHashMap;

/// One entry of a neighbor list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub node: NodeId,
    /// Effective weight, i.e. 1 on unweighted graphs.
    pub weight: f64,
    pub edge: EdgeId,
}

/// An edge as seen by the algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewEdge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
    pub directed: bool,
}

/// An immutable adjacency projection of a [GraphModel], taken at the start of a run.
///
/// Besides neighbor lists, it numbers nodes densely in `0..node_count()`
/// for algorithms working on vectors and matrices.
/// Both the numbering and every neighbor list follow insertion order,
/// which is what makes traversal orders reproducible.
#[derive(Clone)]
pub struct AdjacencyView {
    revision: u64,
    directed: bool,
    index: BiHashMap<NodeId, usize, RandomState, RandomState>,
    lists: Vec<Vec<Neighbor>>,
    edges: Vec<ViewEdge>,
}

impl std::fmt::Debug for AdjacencyView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "AdjacencyView (revision {}) {{", self.revision)?;
        for (i, list) in self.lists.iter().enumerate() {
            writeln!(f, "{}:", self.node_at(i))?;
            for n in list.iter() {
                writeln!(f, "  -> {} by {} ({})", n.node, n.edge, n.weight)?;
            }
        }
        writeln!(f, "}}")?;
        Ok(())
    }
}

impl AdjacencyView {
    /// Directed edges contribute to their source's list only,
    /// undirected ones to both endpoints' lists.
    pub fn build(graph: &GraphModel) -> Self {
        Self::project(graph, false)
    }

    /// Treats every edge as undirected.
    pub fn build_undirected(graph: &GraphModel) -> Self {
        Self::project(graph, true)
    }

    fn project(graph: &GraphModel, force_undirected: bool) -> Self {
        let n = graph.node_count();
        let mut index = BiHashMap::with_capacity_and_hashers(n, RandomState::new(), RandomState::new());
        for (i, node) in graph.nodes().enumerate() {
            index.insert(node.id, i);
        }
        let mut lists = vec![vec![]; n];
        let mut edges = Vec::with_capacity(graph.edge_count());
        for e in graph.edges() {
            let directed = e.directed && !force_undirected;
            let weight = graph.effective_weight(e);
            let (from, to) = match (index.get_by_left(&e.from), index.get_by_left(&e.to)) {
                (Some(from), Some(to)) => (*from, *to),
                _ => continue,
            };
            lists[from].push(Neighbor {
                node: e.to,
                weight,
                edge: e.id,
            });
            if !directed {
                lists[to].push(Neighbor {
                    node: e.from,
                    weight,
                    edge: e.id,
                });
            }
            edges.push(ViewEdge {
                id: e.id,
                from: e.from,
                to: e.to,
                weight,
                directed,
            });
        }
        Self {
            revision: graph.revision(),
            directed: graph.is_directed() && !force_undirected,
            index,
            lists,
            edges,
        }
    }

    /// Revision of the graph this view was taken from.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The graph-level kind at the time of the snapshot.
    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn node_count(&self) -> usize {
        self.lists.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.node_count()).map(move |i| self.node_at(i))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_left(&id)
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.index.get_by_left(&id).copied()
    }

    /// The node numbered `i`.
    ///
    /// Panics if `i` is not in `0..node_count()`.
    pub fn node_at(&self, i: usize) -> NodeId {
        *self
            .index
            .get_by_right(&i)
            .unwrap_or_else(|| panic!("node index {} out of range", i))
    }

    /// Dense index of `id`, or [Error::InvalidArgument] naming the role it was supposed to play.
    pub fn require(&self, role: &str, id: NodeId) -> Result<usize> {
        self.index_of(id).ok_or_else(|| Error::unknown_node(role, id))
    }

    pub fn neighbors(&self, id: NodeId) -> &[Neighbor] {
        match self.index_of(id) {
            Some(i) => &self.lists[i],
            None => &[],
        }
    }

    pub fn neighbors_at(&self, i: usize) -> &[Neighbor] {
        &self.lists[i]
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> &[ViewEdge] {
        &self.edges
    }

    pub fn edge(&self, id: EdgeId) -> Option<&ViewEdge> {
        self.edges
            .binary_search_by_key(&id, |e| e.id)
            .ok()
            .map(|i| &self.edges[i])
    }

    pub fn has_directed_edges(&self) -> bool {
        self.edges.iter().any(|e| e.directed)
    }

    pub fn has_undirected_edges(&self) -> bool {
        self.edges.iter().any(|e| !e.directed)
    }
}
