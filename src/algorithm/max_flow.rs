use super::*;
use crate::{graph::*, Error, Result};
use ahash::RandomState;
use log::{debug, trace};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

/// Residual capacities below this are treated as exhausted.
const EPSILON: f64 = 1e-9;

/// Flow through one edge, in the direction it actually runs.
///
/// For a directed edge `from`/`to` are the edge's own.
/// An undirected edge may carry its flow either way.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeFlow {
    pub edge: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub flow: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MinCut {
    /// Nodes still reachable from the source in the final residual graph.
    pub source_side: Vec<NodeId>,
    /// Edges leaving `source_side`, all saturated.
    pub edges: Vec<EdgeId>,
    pub capacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaxFlow {
    pub source: NodeId,
    pub sink: NodeId,
    pub value: f64,
    /// One entry per edge, in insertion order. Self-loops carry nothing.
    pub flows: Vec<EdgeFlow>,
    /// Number of augmenting paths found.
    pub augmentations: usize,
    pub cut: MinCut,
    /// Revision of the graph the flow was computed on.
    pub revision: u64,
}

impl MaxFlow {
    pub fn flow_of(&self, edge: EdgeId) -> Option<&EdgeFlow> {
        self.flows.iter().find(|f| f.edge == edge)
    }

    /// Writes the per-edge flow onto the graph's edges.
    ///
    /// Fails with [Error::ConcurrentModification] if the graph was edited
    /// after the flow was computed.
    pub fn commit(&self, graph: &mut GraphModel) -> Result<()> {
        graph.commit_flows(self.revision, self.flows.iter().map(|f| (f.edge, f.flow)))?;
        debug!(
            "committed a flow of {} over {} edge(s)",
            self.value,
            self.flows.len()
        );
        Ok(())
    }
}

/// Edmonds–Karp: shortest augmenting paths, one path per [Algorithm::advance].
///
/// Works on a capacity matrix over the view's dense node numbering.
/// An undirected edge of weight `w` gives capacity `w` both ways.
pub struct MaxFlowState {
    view: Rc<AdjacencyView>,
    source: usize,
    sink: usize,
    capacity: Vec<Vec<f64>>,
    residual: Vec<Vec<f64>>,
    /// The undirected edge between a pair, and `1.0` if the arc runs along
    /// the edge's `from -> to` or `-1.0` if against it.
    undirected: HashMap<(usize, usize), (EdgeId, f64), RandomState>,
    /// The directed edge running `u -> v`, if any.
    directed: HashMap<(usize, usize), EdgeId, RandomState>,
    /// Flow currently carried by each directed edge.
    carried: HashMap<EdgeId, f64, RandomState>,
    value: f64,
    augmentations: usize,
}

pub type MaxFlowSteps = Steps<MaxFlowState>;

impl MaxFlowState {
    pub fn new(view: Rc<AdjacencyView>, source: NodeId, sink: NodeId) -> Result<Self> {
        let s = view.require("source", source)?;
        let t = view.require("sink", sink)?;
        if s == t {
            return Err(Error::InvalidArgument(format!(
                "source and sink are both {}",
                source
            )));
        }
        let n = view.node_count();
        let mut capacity = vec![vec![0.0; n]; n];
        let mut undirected = HashMap::with_hasher(RandomState::new());
        let mut directed = HashMap::with_hasher(RandomState::new());
        for e in view.edges() {
            let (u, v) = match (view.index_of(e.from), view.index_of(e.to)) {
                (Some(u), Some(v)) if u != v => (u, v),
                _ => continue,
            };
            capacity[u][v] += e.weight;
            if e.directed {
                directed.insert((u, v), e.id);
            } else {
                capacity[v][u] += e.weight;
                undirected.insert((u, v), (e.id, 1.0));
                undirected.insert((v, u), (e.id, -1.0));
            }
        }
        let residual = capacity.clone();
        Ok(Self {
            view,
            source: s,
            sink: t,
            capacity,
            residual,
            undirected,
            directed,
            carried: HashMap::with_hasher(RandomState::new()),
            value: 0.0,
            augmentations: 0,
        })
    }

    /// Pushes `amount` along the arc `u -> v`, one step per edge whose flow changes.
    ///
    /// Flow on a directed edge `v -> u` is cancelled first; only the rest
    /// goes onto the edge running `u -> v`.
    fn push(&mut self, u: usize, v: usize, amount: f64, out: &mut VecDeque<Step>) {
        let to = self.view.node_at(v);
        if let Some((edge, sign)) = self.undirected.get(&(u, v)) {
            out.push_back(Step::edge_used(*edge, to, Some(Payload::Flow(sign * amount))));
            return;
        }
        let mut rest = amount;
        if let Some(back) = self.directed.get(&(v, u)) {
            let carried = self.carried.entry(*back).or_insert(0.0);
            let cancelled = rest.min(*carried);
            if cancelled > EPSILON {
                *carried -= cancelled;
                rest -= cancelled;
                out.push_back(Step::edge_used(*back, to, Some(Payload::Flow(-cancelled))));
            }
        }
        if rest > EPSILON {
            if let Some(edge) = self.directed.get(&(u, v)) {
                *self.carried.entry(*edge).or_insert(0.0) += rest;
                out.push_back(Step::edge_used(*edge, to, Some(Payload::Flow(rest))));
            }
        }
    }

    /// BFS over arcs with residual capacity left. Returns the parent of every reached node.
    fn search(&self) -> Vec<Option<usize>> {
        let n = self.residual.len();
        let mut parent = vec![None; n];
        let mut seen = vec![false; n];
        let mut queue = VecDeque::new();
        seen[self.source] = true;
        queue.push_back(self.source);
        while let Some(u) = queue.pop_front() {
            for v in 0..n {
                if !seen[v] && self.residual[u][v] > EPSILON {
                    seen[v] = true;
                    parent[v] = Some(u);
                    queue.push_back(v);
                }
            }
        }
        parent
    }

    fn source_side(&self) -> Vec<bool> {
        let parent = self.search();
        (0..parent.len())
            .map(|i| i == self.source || parent[i].is_some())
            .collect()
    }

    fn flows(&self) -> Vec<EdgeFlow> {
        self.view
            .edges()
            .iter()
            .filter_map(|e| {
                let u = self.view.index_of(e.from)?;
                let v = self.view.index_of(e.to)?;
                let net = if u == v {
                    0.0
                } else {
                    self.capacity[u][v] - self.residual[u][v]
                };
                let (from, to, flow) = if net >= 0.0 || e.directed {
                    (e.from, e.to, net.max(0.0))
                } else {
                    (e.to, e.from, -net)
                };
                Some(EdgeFlow {
                    edge: e.id,
                    from,
                    to,
                    flow: flow.min(e.weight),
                })
            })
            .collect()
    }

    fn cut(&self) -> MinCut {
        let side = self.source_side();
        let inside = |id: NodeId| self.view.index_of(id).map(|i| side[i]).unwrap_or(false);
        let mut edges = vec![];
        let mut capacity = 0.0;
        for e in self.view.edges() {
            let (a, b) = (inside(e.from), inside(e.to));
            let crossing = if e.directed { a && !b } else { a != b };
            if crossing {
                edges.push(e.id);
                capacity += e.weight;
            }
        }
        MinCut {
            source_side: self.view.nodes().filter(|id| inside(*id)).collect(),
            edges,
            capacity,
        }
    }
}

impl Algorithm for MaxFlowState {
    type Output = MaxFlow;

    fn advance(&mut self, out: &mut VecDeque<Step>) -> bool {
        let parent = self.search();
        if parent[self.sink].is_none() {
            debug!(
                "max flow {} after {} augmenting path(s)",
                self.value, self.augmentations
            );
            return false;
        }
        let mut path = vec![];
        let mut v = self.sink;
        while let Some(u) = parent[v] {
            path.push((u, v));
            v = u;
        }
        path.reverse();
        let bottleneck = path
            .iter()
            .map(|(u, v)| self.residual[*u][*v])
            .fold(f64::INFINITY, f64::min);
        for (u, v) in path.iter() {
            self.residual[*u][*v] -= bottleneck;
            self.residual[*v][*u] += bottleneck;
            self.push(*u, *v, bottleneck, out);
        }
        self.value += bottleneck;
        self.augmentations += 1;
        trace!(
            "augmenting path #{} of {} arc(s) carries {}",
            self.augmentations,
            path.len(),
            bottleneck
        );
        true
    }

    fn output(&self) -> MaxFlow {
        MaxFlow {
            source: self.view.node_at(self.source),
            sink: self.view.node_at(self.sink),
            value: self.value,
            flows: self.flows(),
            augmentations: self.augmentations,
            cut: self.cut(),
            revision: self.view.revision(),
        }
    }

    fn into_outcome(output: MaxFlow) -> Outcome {
        Outcome::MaxFlow(output)
    }
}

pub fn max_flow_steps(
    view: Rc<AdjacencyView>,
    source: NodeId,
    sink: NodeId,
) -> Result<MaxFlowSteps> {
    MaxFlowState::new(view, source, sink).map(Steps::new)
}

/// Maximum flow from `source` to `sink`, edge weights being capacities.
///
/// The graph is left untouched; see [MaxFlow::commit].
pub fn max_flow(graph: &GraphModel, source: NodeId, sink: NodeId) -> Result<MaxFlow> {
    Ok(max_flow_steps(Rc::new(AdjacencyView::build(graph)), source, sink)?.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use quickcheck_macros::quickcheck;
    use std::collections::BTreeMap;

    fn textbook() -> (GraphModel, Vec<NodeId>, Vec<EdgeId>) {
        // s, v1, v2, v3, v4, t
        graph_of(
            true,
            6,
            &[
                (0, 1, 16.0),
                (0, 2, 13.0),
                (2, 1, 4.0),
                (1, 3, 12.0),
                (3, 2, 9.0),
                (2, 4, 14.0),
                (4, 3, 7.0),
                (3, 5, 20.0),
                (4, 5, 4.0),
            ],
        )
    }

    fn assert_is_a_flow(g: &GraphModel, f: &MaxFlow) {
        let mut balance: BTreeMap<NodeId, f64> = g.nodes().map(|n| (n.id, 0.0)).collect();
        for ef in f.flows.iter() {
            let e = g.edge(ef.edge).unwrap();
            assert!(ef.flow >= 0.0);
            assert!(ef.flow <= g.effective_weight(e));
            assert!(e.collides_with(ef.from, ef.to, e.directed));
            *balance.get_mut(&ef.from).unwrap() -= ef.flow;
            *balance.get_mut(&ef.to).unwrap() += ef.flow;
        }
        for (id, b) in balance.iter() {
            if *id == f.source {
                assert_eq!(-*b, f.value);
            } else if *id == f.sink {
                assert_eq!(*b, f.value);
            } else {
                assert_eq!(*b, 0.0);
            }
        }
    }

    #[test]
    fn textbook_network() {
        let (g, n, e) = textbook();
        let f = max_flow(&g, n[0], n[5]).unwrap();
        assert_eq!(f.value, 23.0);
        assert_is_a_flow(&g, &f);
        assert_eq!(f.cut.capacity, 23.0);
        assert!(f.cut.source_side.contains(&n[0]));
        assert!(!f.cut.source_side.contains(&n[5]));
        // v3 -> t is never saturated
        assert!(f.flow_of(e[7]).unwrap().flow < 20.0);
    }

    #[test]
    fn undirected_edges_carry_flow_either_way() {
        // t - a, a - s: added against the direction flow will take
        let (g, n, e) = graph_of(false, 3, &[(2, 1, 2.0), (1, 0, 3.0)]);
        let f = max_flow(&g, n[0], n[2]).unwrap();
        assert_eq!(f.value, 2.0);
        let ef = f.flow_of(e[1]).unwrap();
        assert_eq!((ef.from, ef.to, ef.flow), (n[0], n[1], 2.0));
        assert_is_a_flow(&g, &f);
    }

    #[test]
    fn steps_carry_signed_bottlenecks() {
        let (g, n, e) = graph_of(false, 3, &[(1, 0, 3.0), (1, 2, 2.0)]);
        let steps: Vec<_> = max_flow_steps(Rc::new(AdjacencyView::build(&g)), n[0], n[2])
            .unwrap()
            .filter(|s| s.kind == StepKind::EdgeUsed)
            .map(|s| (s.edge, s.payload))
            .collect();
        assert_eq!(
            steps,
            vec![
                (Some(e[0]), Some(Payload::Flow(-2.0))),
                (Some(e[1]), Some(Payload::Flow(2.0))),
            ]
        );
    }

    #[test]
    fn cancelled_flow_is_taken_back_from_its_own_edge() {
        // s, a, b, t, c, d; the second path cancels a -> b through b -> a
        let (g, n, e) = graph_of(
            true,
            6,
            &[
                (0, 1, 1.0),
                (1, 2, 1.0),
                (2, 3, 1.0),
                (0, 4, 1.0),
                (4, 2, 1.0),
                (1, 5, 1.0),
                (5, 3, 1.0),
                (2, 1, 0.0),
            ],
        );
        let mut marks = Annotations::default();
        let mut outcome = None;
        for step in max_flow_steps(Rc::new(AdjacencyView::build(&g)), n[0], n[3]).unwrap() {
            marks.record(&step);
            if let Some(Outcome::MaxFlow(f)) = step.outcome() {
                outcome = Some(f.clone());
            }
        }
        let f = outcome.unwrap();
        assert_eq!(f.value, 2.0);
        assert_eq!(f.augmentations, 2);
        for ef in f.flows.iter() {
            let painted = marks.edges.get(&ef.edge).and_then(|m| m.flow).unwrap_or(0.0);
            assert_eq!(painted, ef.flow, "{}", ef.edge);
        }
        assert_eq!(marks.edges[&e[1]].flow, Some(0.0));
        assert_eq!(marks.edges.get(&e[7]).and_then(|m| m.flow), None);
    }

    #[test]
    fn no_path_means_zero_flow() {
        let (g, n, _) = graph_of(true, 3, &[(1, 0, 3.0), (1, 2, 2.0)]);
        let f = max_flow(&g, n[0], n[2]).unwrap();
        assert_eq!(f.value, 0.0);
        assert_eq!(f.augmentations, 0);
        assert_eq!(f.cut.source_side, vec![n[0]]);
    }

    #[test]
    fn bad_terminals() {
        let (g, n, _) = textbook();
        assert!(matches!(
            max_flow(&g, n[0], n[0]),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            max_flow(&g, n[0], NodeId(99)),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn commit_writes_flows_unless_stale() {
        let (mut g, n, e) = textbook();
        let f = max_flow(&g, n[0], n[5]).unwrap();
        f.commit(&mut g).unwrap();
        assert_eq!(g.edge(e[7]).unwrap().flow, f.flow_of(e[7]).unwrap().flow);

        g.add_node(Position::default());
        assert!(matches!(
            f.commit(&mut g),
            Err(Error::ConcurrentModification { .. })
        ));
    }

    #[quickcheck]
    fn value_is_feasible_and_equals_the_cut(ops: Ops) {
        let g = ops.replay();
        let ids: Vec<_> = g.nodes().map(|n| n.id).collect();
        if ids.len() < 2 {
            return;
        }
        let f = max_flow(&g, ids[0], ids[ids.len() - 1]).unwrap();
        assert_is_a_flow(&g, &f);
        assert_eq!(f.value, f.cut.capacity);
    }
}
