use super::*;
use crate::{graph::*, Error, Result};
use ahash::RandomState;
use log::debug;
use petgraph::unionfind::UnionFind;
use std::collections::{HashSet, VecDeque};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum EulerKind {
    /// Every edge once, ending where it started.
    Circuit,
    /// Every edge once, between two different nodes.
    Path,
    /// No trail uses every edge exactly once.
    None,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EulerTrail {
    pub kind: EulerKind,
    /// Nodes in walking order, one more than `edges` unless there is no trail.
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
}

/// Which trail the degrees allow, and where it may start.
struct Classification {
    kind: EulerKind,
    /// Candidate starts in node order. Empty if any node will do.
    starts: Vec<usize>,
}

fn classify(view: &AdjacencyView) -> Classification {
    let n = view.node_count();
    let none = Classification {
        kind: EulerKind::None,
        starts: vec![],
    };
    let mut out_degree = vec![0i64; n];
    let mut in_degree = vec![0i64; n];
    let mut components = UnionFind::new(n);
    for e in view.edges() {
        let (u, v) = match (view.index_of(e.from), view.index_of(e.to)) {
            (Some(u), Some(v)) => (u, v),
            _ => continue,
        };
        out_degree[u] += 1;
        in_degree[v] += 1;
        components.union(u, v);
    }
    let touched: Vec<usize> = (0..n)
        .filter(|i| out_degree[*i] + in_degree[*i] > 0)
        .collect();
    if let Some(first) = touched.first() {
        let root = components.find(*first);
        if touched.iter().any(|i| components.find(*i) != root) {
            debug!("euler: edges span more than one component");
            return none;
        }
    }
    if view.has_directed_edges() {
        let surplus: Vec<usize> = (0..n)
            .filter(|i| out_degree[*i] - in_degree[*i] == 1)
            .collect();
        let deficit: Vec<usize> = (0..n)
            .filter(|i| in_degree[*i] - out_degree[*i] == 1)
            .collect();
        let balanced = (0..n).filter(|i| out_degree[*i] == in_degree[*i]).count();
        if balanced == n {
            Classification {
                kind: EulerKind::Circuit,
                starts: touched,
            }
        } else if surplus.len() == 1 && deficit.len() == 1 && balanced + 2 == n {
            Classification {
                kind: EulerKind::Path,
                starts: surplus,
            }
        } else {
            none
        }
    } else {
        // a self-loop adds one to both, hence two to the degree
        let odd: Vec<usize> = (0..n)
            .filter(|i| (out_degree[*i] + in_degree[*i]) % 2 == 1)
            .collect();
        match odd.len() {
            0 => Classification {
                kind: EulerKind::Circuit,
                starts: touched,
            },
            2 => Classification {
                kind: EulerKind::Path,
                starts: odd,
            },
            _ => none,
        }
    }
}

/// Hierholzer's algorithm, one traversed edge per [Algorithm::advance].
///
/// The working stack holds the walk not yet committed to the trail;
/// a node is committed once all its edges are used up.
pub struct EulerState {
    view: Rc<AdjacencyView>,
    kind: EulerKind,
    /// `(node, edge it was reached by)`.
    stack: Vec<(usize, Option<EdgeId>)>,
    /// Next position to try in every node's neighbor list.
    cursor: Vec<usize>,
    used: HashSet<EdgeId, RandomState>,
    /// The trail, back to front.
    trail: Vec<(usize, Option<EdgeId>)>,
}

pub type EulerSteps = Steps<EulerState>;

impl EulerState {
    /// Fails with [Error::InvalidState] on a mix of directed and undirected edges,
    /// and with [Error::InvalidArgument] if `start` is unknown or no trail can start there.
    pub fn new(view: Rc<AdjacencyView>, start: Option<NodeId>) -> Result<Self> {
        if view.has_directed_edges() && view.has_undirected_edges() {
            return Err(Error::InvalidState(
                "eulerian trails need all edges directed or all undirected".to_string(),
            ));
        }
        let requested = match start {
            Some(id) => Some(view.require("start node", id)?),
            None => None,
        };
        let Classification { kind, starts } = classify(&view);
        let start = match (kind, requested) {
            (EulerKind::None, _) => None,
            (_, Some(s)) if starts.is_empty() || starts.contains(&s) => Some(s),
            (_, Some(s)) => {
                return Err(Error::InvalidArgument(format!(
                    "no eulerian {:?} starts at {}",
                    kind,
                    view.node_at(s)
                )))
            }
            (_, None) => starts
                .first()
                .copied()
                .or(if view.node_count() > 0 { Some(0) } else { None }),
        };
        debug!(
            "euler: {:?} over {} edge(s), starting at {:?}",
            kind,
            view.edge_count(),
            start.map(|s| view.node_at(s))
        );
        let n = view.node_count();
        Ok(Self {
            view,
            kind,
            stack: start.map(|s| vec![(s, None)]).unwrap_or_default(),
            cursor: vec![0; n],
            used: HashSet::with_hasher(RandomState::new()),
            trail: vec![],
        })
    }
}

impl Algorithm for EulerState {
    type Output = EulerTrail;

    fn advance(&mut self, out: &mut VecDeque<Step>) -> bool {
        let view = self.view.clone();
        while let Some(&(u, _)) = self.stack.last() {
            let neighbors = view.neighbors_at(u);
            while self.cursor[u] < neighbors.len()
                && self.used.contains(&neighbors[self.cursor[u]].edge)
            {
                self.cursor[u] += 1;
            }
            match neighbors.get(self.cursor[u]) {
                Some(n) => {
                    self.used.insert(n.edge);
                    if let Some(v) = view.index_of(n.node) {
                        self.stack.push((v, Some(n.edge)));
                        out.push_back(Step::edge_used(n.edge, n.node, None));
                        return true;
                    }
                }
                None => {
                    if let Some(done) = self.stack.pop() {
                        self.trail.push(done);
                    }
                }
            }
        }
        false
    }

    fn output(&self) -> EulerTrail {
        if self.kind == EulerKind::None {
            return EulerTrail {
                kind: EulerKind::None,
                nodes: vec![],
                edges: vec![],
            };
        }
        let nodes = self
            .trail
            .iter()
            .rev()
            .map(|(u, _)| self.view.node_at(*u))
            .collect();
        let edges = self.trail.iter().rev().filter_map(|(_, e)| *e).collect();
        EulerTrail {
            kind: self.kind,
            nodes,
            edges,
        }
    }

    fn into_outcome(output: EulerTrail) -> Outcome {
        Outcome::Euler(output)
    }
}

pub fn euler_steps(view: Rc<AdjacencyView>, start: Option<NodeId>) -> Result<EulerSteps> {
    EulerState::new(view, start).map(Steps::new)
}

/// Eulerian circuit or path, whichever the degrees allow.
///
/// A graph without a trail is an ordinary result of kind [EulerKind::None].
pub fn euler(graph: &GraphModel, start: Option<NodeId>) -> Result<EulerTrail> {
    Ok(euler_steps(Rc::new(AdjacencyView::build(graph)), start)?.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use quickcheck_macros::quickcheck;

    fn assert_is_a_trail(g: &GraphModel, t: &EulerTrail) {
        assert_eq!(t.nodes.len(), t.edges.len() + 1);
        let mut seen: Vec<_> = t.edges.clone();
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), g.edge_count());
        for (i, id) in t.edges.iter().enumerate() {
            let e = g.edge(*id).unwrap();
            assert!(e.collides_with(t.nodes[i], t.nodes[i + 1], e.directed));
        }
    }

    #[test]
    fn square_is_a_circuit() {
        let (g, n, _) = graph_of(
            false,
            4,
            &[(0, 1, 1.0), (1, 2, 1.0), (2, 3, 1.0), (3, 0, 1.0)],
        );
        let t = euler(&g, None).unwrap();
        assert_eq!(t.kind, EulerKind::Circuit);
        assert_eq!(t.nodes.first(), Some(&n[0]));
        assert_eq!(t.nodes.last(), Some(&n[0]));
        assert_is_a_trail(&g, &t);
    }

    #[test]
    fn two_odd_nodes_make_a_path() {
        let (g, n, e) = graph_of(false, 3, &[(0, 1, 1.0), (1, 2, 1.0)]);
        let t = euler(&g, None).unwrap();
        assert_eq!(t.kind, EulerKind::Path);
        assert_eq!(t.nodes, n);
        assert_eq!(t.edges, e);
        let back = euler(&g, Some(n[2])).unwrap();
        assert_eq!(back.nodes, vec![n[2], n[1], n[0]]);
        assert!(matches!(
            euler(&g, Some(n[1])),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn four_odd_nodes_make_nothing() {
        let (g, _, _) = graph_of(false, 4, &[(0, 1, 1.0), (0, 2, 1.0), (0, 3, 1.0)]);
        let t = euler(&g, None).unwrap();
        assert_eq!(t.kind, EulerKind::None);
        assert!(t.nodes.is_empty());
    }

    #[test]
    fn campus_demo_has_a_path_from_b_to_d() {
        let g = GraphModel::campus_demo();
        let t = euler(&g, None).unwrap();
        assert_eq!(t.kind, EulerKind::Path);
        assert_eq!(t.nodes.first(), Some(&NodeId(1)));
        assert_eq!(t.nodes.last(), Some(&NodeId(3)));
        assert_is_a_trail(&g, &t);
    }

    #[test]
    fn self_loops_are_walked() {
        let (g, n, _) = graph_of(false, 2, &[(0, 1, 1.0), (1, 1, 1.0), (1, 0, 1.0)]);
        // (1, 0) updated the first edge in place, so this is a path
        assert_eq!(g.edge_count(), 2);
        let t = euler(&g, Some(n[0])).unwrap();
        assert_eq!(t.kind, EulerKind::Path);
        assert_eq!(t.nodes, vec![n[0], n[1], n[1]]);
        assert_is_a_trail(&g, &t);
    }

    #[test]
    fn directed_degrees() {
        let (g, n, _) = graph_of(true, 3, &[(0, 1, 1.0), (1, 2, 1.0), (2, 0, 1.0)]);
        let t = euler(&g, Some(n[1])).unwrap();
        assert_eq!(t.kind, EulerKind::Circuit);
        assert_eq!(t.nodes, vec![n[1], n[2], n[0], n[1]]);

        let (g, n, _) = graph_of(true, 3, &[(1, 0, 1.0), (1, 2, 1.0), (2, 1, 1.0)]);
        let t = euler(&g, None).unwrap();
        assert_eq!(t.kind, EulerKind::Path);
        assert_eq!(t.nodes.first(), Some(&n[1]));
        assert_eq!(t.nodes.last(), Some(&n[0]));
        assert_is_a_trail(&g, &t);

        let (g, _, _) = graph_of(true, 3, &[(0, 1, 1.0), (0, 2, 1.0)]);
        assert_eq!(euler(&g, None).unwrap().kind, EulerKind::None);
    }

    #[test]
    fn edges_must_be_connected() {
        let (g, _, _) = graph_of(
            false,
            6,
            &[
                (0, 1, 1.0),
                (1, 2, 1.0),
                (2, 0, 1.0),
                (3, 4, 1.0),
                (4, 5, 1.0),
                (5, 3, 1.0),
            ],
        );
        assert_eq!(euler(&g, None).unwrap().kind, EulerKind::None);

        // isolated nodes do not matter
        let (g, n, _) = graph_of(false, 4, &[(1, 2, 1.0), (2, 3, 1.0), (3, 1, 1.0)]);
        let t = euler(&g, None).unwrap();
        assert_eq!(t.kind, EulerKind::Circuit);
        assert_eq!(t.nodes.first(), Some(&n[1]));
        assert!(matches!(
            euler(&g, Some(n[0])),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn edgeless_graphs() {
        let t = euler(&GraphModel::new(), None).unwrap();
        assert_eq!(t.kind, EulerKind::Circuit);
        assert!(t.nodes.is_empty());

        let (g, n, _) = graph_of(false, 2, &[]);
        let t = euler(&g, Some(n[1])).unwrap();
        assert_eq!(t.kind, EulerKind::Circuit);
        assert_eq!(t.nodes, vec![n[1]]);
    }

    #[test]
    fn mixed_edges_are_rejected() {
        let (mut g, n, _) = graph_of(false, 3, &[(0, 1, 1.0)]);
        g.add_or_update_edge(n[1], n[2], 1.0, true).unwrap();
        assert!(matches!(euler(&g, None), Err(Error::InvalidState(_))));
        assert!(matches!(
            euler(&g, Some(NodeId(99))),
            Err(Error::InvalidState(_))
        ));
    }

    #[test]
    fn one_step_per_edge() {
        let g = GraphModel::campus_demo();
        let steps: Vec<_> = euler_steps(Rc::new(AdjacencyView::build(&g)), None)
            .unwrap()
            .collect();
        assert_eq!(steps.len(), g.edge_count() + 1);
        assert!(steps[..g.edge_count()]
            .iter()
            .all(|s| s.kind == StepKind::EdgeUsed));
    }

    #[quickcheck]
    fn trails_use_every_edge_once(ops: Ops) {
        let g = ops.replay();
        if g.node_count() == 0 {
            return;
        }
        let t = euler(&g, None).unwrap();
        match t.kind {
            EulerKind::Circuit => {
                assert_is_a_trail(&g, &t);
                assert_eq!(t.nodes.first(), t.nodes.last());
            }
            EulerKind::Path => {
                assert_is_a_trail(&g, &t);
                assert_ne!(t.nodes.first(), t.nodes.last());
            }
            EulerKind::None => assert!(g.edge_count() > 0),
        }
    }
}
