//! Arbitrary edit sequences and small fixtures shared by the tests.
use crate::graph::*;
use quickcheck::{Arbitrary, Gen};
use rs_quickcheck_util::*;

/// One edit. Node and edge operands are picks among whatever is alive
/// when the edit is replayed, taken modulo the live count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    AddNode,
    RemoveNode(usize),
    AddEdge((usize, usize, u8)),
    RemoveEdge(usize),
}

#[derive(Clone)]
pub struct Ops {
    pub directed: bool,
    pub ops: Vec<Op>,
}

impl std::fmt::Debug for Ops {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "directed={} {:?}", self.directed, self.ops)
    }
}

impl Ops {
    pub fn iter(&self) -> impl Iterator<Item = &Op> + '_ {
        self.ops.iter()
    }

    /// Applies every edit onto a fresh graph.
    pub fn replay(&self) -> GraphModel {
        let mut g = GraphModel::with_kind(self.directed, true);
        let mut x = 0.0;
        for op in self.iter() {
            match op {
                Op::AddNode => {
                    x += 1.0;
                    g.add_node(Position::new(x, -x));
                }
                Op::RemoveNode(pick) => {
                    if let Some(id) = nth_node(&g, *pick) {
                        g.remove_node(id).unwrap();
                    }
                }
                Op::AddEdge((from, to, weight)) => {
                    if let (Some(from), Some(to)) = (nth_node(&g, *from), nth_node(&g, *to)) {
                        let weight = f64::from(*weight % 10);
                        g.add_or_update_edge(from, to, weight, self.directed)
                            .unwrap();
                    }
                }
                Op::RemoveEdge(pick) => {
                    let n = g.edge_count();
                    if n > 0 {
                        let id = g.edges().nth(pick % n).unwrap().id;
                        g.remove_edge(id).unwrap();
                    }
                }
            }
        }
        g
    }
}

fn nth_node(g: &GraphModel, pick: usize) -> Option<NodeId> {
    let n = g.node_count();
    if n == 0 {
        None
    } else {
        g.nodes().nth(pick % n).map(|n| n.id)
    }
}

impl Arbitrary for Ops {
    fn arbitrary(g: &mut Gen) -> Self {
        let directed = bool::arbitrary(g);
        let ops = gen_bytes(g, b"abcd.", b'.', 0..)
            .iter()
            .map(|_| match u8::arbitrary(g) % 8 {
                0..=2 => Op::AddNode,
                3 => Op::RemoveNode(usize::arbitrary(g)),
                4..=6 => Op::AddEdge((
                    usize::arbitrary(g),
                    usize::arbitrary(g),
                    u8::arbitrary(g),
                )),
                7 => Op::RemoveEdge(usize::arbitrary(g)),
                _ => unreachable!(),
            })
            .collect();
        Self { directed, ops }
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let l = self.ops.len();
        let me = self.clone();
        let it = std::iter::successors(Some(l / 2), move |n| {
            let nxt = (n + l) / 2 + 1;
            if nxt >= l {
                None
            } else {
                Some(nxt)
            }
        })
        .map(move |n| {
            let mut res = me.clone();
            res.ops = me.ops[0..n].to_vec();
            res
        });
        Box::new(it)
    }
}

/// A graph with `n` fresh nodes and the given edges between them, by index.
pub fn graph_of(
    directed: bool,
    n: usize,
    edges: &[(usize, usize, f64)],
) -> (GraphModel, Vec<NodeId>, Vec<EdgeId>) {
    let mut g = GraphModel::with_kind(directed, true);
    let ids: Vec<_> = (0..n)
        .map(|i| g.add_node(Position::new(i as f64, 0.0)))
        .collect();
    let eids = edges
        .iter()
        .map(|(u, v, w)| g.add_or_update_edge(ids[*u], ids[*v], *w, directed).unwrap())
        .collect();
    (g, ids, eids)
}
