use crate::{graph::*, Error, Missing, Result};
use log::{debug, trace};
use std::collections::{BTreeMap, BTreeSet};

/// The graph a user builds in the sandbox.
///
/// Nodes and edges live in trees keyed by their ids,
/// so iterations are always in insertion order.
/// An incidence index `(node, other end, edge)` holds every edge under both of its endpoints,
/// which gives cascading node removal and pair lookups without scanning all edges.
///
/// |                      | Complexity                                                             |
/// | -------------------- | ---------------------------------------------------------------------- |
/// | `add_node`           | $O(\log \|V\|)$                                                        |
/// | `add_or_update_edge` | $O(\log \|V\| + \log \|E\|)$                                           |
/// | `remove_edge`        | $O(\log \|E\|)$                                                        |
/// | `remove_node`        | $O(\log \|V\| + \|E'\| \log \|E\|)$, $E'$ the edges incident to the node |
/// | `incident_edges`     | returns in $O(\log \|E\|)$, amortized $O(1)$ per `.next`               |
/// | `set_global_directed`| $O(\|E\| \log \|E\|)$                                                  |
///
/// Every structural edit bumps [GraphModel::revision].
/// Runs remember the revision they were built from and refuse to commit
/// anything onto a graph that moved on in the meantime.
#[derive(Clone)]
pub struct GraphModel {
    nid_factory: NodeIdFactory,
    eid_factory: EdgeIdFactory,
    nodes: BTreeMap<NodeId, Node>,
    edges: BTreeMap<EdgeId, Edge>,
    incidence: BTreeSet<(NodeId, NodeId, EdgeId)>,
    directed: bool,
    weighted: bool,
    revision: u64,
}

impl Default for GraphModel {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for GraphModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let kind = if self.directed { "directed" } else { "undirected" };
        writeln!(f, "GraphModel ({}, revision {}) {{", kind, self.revision)?;
        for n in self.nodes.values() {
            writeln!(f, "{}:", n.id)?;
            for e in self.incident_edges(n.id).filter(|e| e.from == n.id) {
                let arrow = if e.directed { "->" } else { "--" };
                writeln!(f, "  {} {} by {} ({})", arrow, e.to, e.id, e.weight)?;
            }
        }
        writeln!(f, "}}")?;
        Ok(())
    }
}

impl GraphModel {
    /// An empty, undirected and weighted graph.
    pub fn new() -> Self {
        Self::with_kind(false, true)
    }

    pub fn with_kind(directed: bool, weighted: bool) -> Self {
        Self {
            nid_factory: NodeIdFactory::new(),
            eid_factory: EdgeIdFactory::new(),
            nodes: BTreeMap::new(),
            edges: BTreeMap::new(),
            incidence: BTreeSet::new(),
            directed,
            weighted,
            revision: 0,
        }
    }

    pub(crate) fn from_parts(
        directed: bool,
        weighted: bool,
        nodes: BTreeMap<NodeId, Node>,
        edges: BTreeMap<EdgeId, Edge>,
    ) -> Self {
        let nid_factory = nodes
            .keys()
            .next_back()
            .map(|last| NodeIdFactory::resume_after(*last))
            .unwrap_or_default();
        let eid_factory = edges
            .keys()
            .next_back()
            .map(|last| EdgeIdFactory::resume_after(*last))
            .unwrap_or_default();
        let mut incidence = BTreeSet::new();
        for e in edges.values() {
            incidence.insert((e.from, e.to, e.id));
            incidence.insert((e.to, e.from, e.id));
        }
        Self {
            nid_factory,
            eid_factory,
            nodes,
            edges,
            incidence,
            directed,
            weighted,
            revision: 0,
        }
    }

    fn touch(&mut self) {
        self.revision += 1;
    }

    pub fn add_node(&mut self, position: Position) -> NodeId {
        let id = self.nid_factory.one_more();
        self.nodes.insert(
            id,
            Node {
                id,
                position,
                label: None,
            },
        );
        self.touch();
        trace!("added node {} at ({}, {})", id, position.x, position.y);
        id
    }

    pub fn add_labeled_node(&mut self, position: Position, label: impl Into<String>) -> NodeId {
        let id = self.add_node(position);
        if let Some(n) = self.nodes.get_mut(&id) {
            n.label = Some(label.into());
        }
        id
    }

    /// Moves a node. Positions are presentation state and do not bump the revision.
    pub fn set_position(&mut self, id: NodeId, position: Position) -> Result<()> {
        let n = self
            .nodes
            .get_mut(&id)
            .ok_or(Error::NotFound(Missing::Node(id)))?;
        n.position = position;
        Ok(())
    }

    pub fn set_label(&mut self, id: NodeId, label: Option<String>) -> Result<()> {
        let n = self
            .nodes
            .get_mut(&id)
            .ok_or(Error::NotFound(Missing::Node(id)))?;
        n.label = label;
        Ok(())
    }

    /// Removes a node together with all edges incident to it, and returns those edges.
    pub fn remove_node(&mut self, id: NodeId) -> Result<Vec<Edge>> {
        if !self.nodes.contains_key(&id) {
            return Err(Error::NotFound(Missing::Node(id)));
        }
        let start = (id, NodeId::MIN, EdgeId::MIN);
        let end = (id.next(), NodeId::MIN, EdgeId::MIN);
        let incident: BTreeSet<EdgeId> = self
            .incidence
            .range(start..end)
            .map(|(_, _, e)| *e)
            .collect();
        let removed: Vec<Edge> = incident
            .into_iter()
            .filter_map(|e| self.detach_edge(e))
            .collect();
        self.nodes.remove(&id);
        self.touch();
        debug!(
            "removed node {} and {} incident edge(s)",
            id,
            removed.len()
        );
        Ok(removed)
    }

    /// Adds an edge, or updates the one already occupying the same pair.
    ///
    /// Two directed edges share a pair only if they share the ordered pair;
    /// otherwise pairs are compared unordered.
    /// An update keeps the id (and thus the insertion position) of the oldest colliding edge,
    /// takes the new endpoints, weight and directedness, and resets its flow.
    /// Any further colliding edge is removed.
    /// Self-loops are accepted.
    pub fn add_or_update_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        weight: f64,
        directed: bool,
    ) -> Result<EdgeId> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(Error::InvalidArgument(format!(
                "edge weight must be a finite non-negative number, got {}",
                weight
            )));
        }
        for end in [from, to] {
            if !self.nodes.contains_key(&end) {
                return Err(Error::NotFound(Missing::Node(end)));
            }
        }
        let colliding: BTreeSet<EdgeId> = self
            .incidence
            .range((from, to, EdgeId::MIN)..=(from, to, EdgeId::MAX))
            .filter_map(|(_, _, e)| self.edges.get(e))
            .filter(|e| e.collides_with(from, to, directed))
            .map(|e| e.id)
            .collect();
        let mut colliding = colliding.into_iter();
        let id = match colliding.next() {
            Some(keep) => {
                for dup in colliding {
                    self.detach_edge(dup);
                }
                if let Some(e) = self.edges.get_mut(&keep) {
                    e.from = from;
                    e.to = to;
                    e.weight = weight;
                    e.directed = directed;
                    e.flow = 0.0;
                }
                trace!("updated edge {}: {} -> {} ({})", keep, from, to, weight);
                keep
            }
            None => {
                let id = self.eid_factory.one_more();
                self.edges.insert(
                    id,
                    Edge {
                        id,
                        from,
                        to,
                        weight,
                        directed,
                        flow: 0.0,
                    },
                );
                self.incidence.insert((from, to, id));
                self.incidence.insert((to, from, id));
                trace!("added edge {}: {} -> {} ({})", id, from, to, weight);
                id
            }
        };
        self.touch();
        Ok(id)
    }

    pub fn remove_edge(&mut self, id: EdgeId) -> Result<Edge> {
        let e = self
            .detach_edge(id)
            .ok_or(Error::NotFound(Missing::Edge(id)))?;
        self.touch();
        Ok(e)
    }

    fn detach_edge(&mut self, id: EdgeId) -> Option<Edge> {
        let e = self.edges.remove(&id)?;
        self.incidence.remove(&(e.from, e.to, id));
        self.incidence.remove(&(e.to, e.from, id));
        Some(e)
    }

    /// Removes every node and edge. Ids handed out so far are still never reused.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
        self.incidence.clear();
        self.touch();
        debug!("cleared graph");
    }

    /// Switches the graph kind and retroactively every edge along with it.
    ///
    /// Going undirected may turn `u -> v` and `v -> u` into two edges on the same
    /// unordered pair; the older one survives.
    pub fn set_global_directed(&mut self, directed: bool) {
        self.directed = directed;
        let mut seen = BTreeSet::new();
        let mut dups = vec![];
        for e in self.edges.values_mut() {
            e.directed = directed;
            if !directed {
                let pair = (e.from.min(e.to), e.from.max(e.to));
                if !seen.insert(pair) {
                    dups.push(e.id);
                }
            }
        }
        for e in dups.iter() {
            self.detach_edge(*e);
        }
        self.touch();
        debug!(
            "graph is now {}, {} parallel edge(s) collapsed",
            if directed { "directed" } else { "undirected" },
            dups.len()
        );
    }

    /// An unweighted graph keeps its weights but every algorithm sees them as 1.
    pub fn set_weighted(&mut self, weighted: bool) {
        self.weighted = weighted;
        self.touch();
    }

    /// Writes the per-edge flow of a completed max-flow run.
    ///
    /// Every edge not listed is reset to zero.
    /// Fails with [Error::ConcurrentModification] if the graph changed since
    /// `revision`, the revision the run's snapshot was taken at.
    pub fn commit_flows<I>(&mut self, revision: u64, flows: I) -> Result<()>
    where
        I: IntoIterator<Item = (EdgeId, f64)>,
    {
        if revision != self.revision {
            return Err(Error::ConcurrentModification {
                expected: revision,
                found: self.revision,
            });
        }
        self.clear_flows();
        for (id, flow) in flows {
            if let Some(e) = self.edges.get_mut(&id) {
                e.flow = flow;
            }
        }
        Ok(())
    }

    pub fn clear_flows(&mut self) {
        for e in self.edges.values_mut() {
            e.flow = 0.0;
        }
    }

    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn is_directed(&self) -> bool {
        self.directed
    }

    pub fn is_weighted(&self) -> bool {
        self.weighted
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains_key(&id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> + '_ {
        self.nodes.values()
    }

    /// Edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = &Edge> + '_ {
        self.edges.values()
    }

    /// Edges touching `id`, in either direction. A self-loop shows up once.
    pub fn incident_edges(&self, id: NodeId) -> impl Iterator<Item = &Edge> + '_ {
        let start = (id, NodeId::MIN, EdgeId::MIN);
        let end = (id.next(), NodeId::MIN, EdgeId::MIN);
        let ids: BTreeSet<EdgeId> = self.incidence.range(start..end).map(|(_, _, e)| *e).collect();
        ids.into_iter().filter_map(move |e| self.edges.get(&e))
    }

    /// The edge that can carry something from `from` to `to`, if any.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> Option<&Edge> {
        self.incidence
            .range((from, to, EdgeId::MIN)..=(from, to, EdgeId::MAX))
            .filter_map(|(_, _, e)| self.edges.get(e))
            .find(|e| e.collides_with(from, to, true))
    }

    /// Weight as the algorithms see it.
    pub fn effective_weight(&self, e: &Edge) -> f64 {
        if self.weighted {
            e.weight
        } else {
            1.0
        }
    }
}
