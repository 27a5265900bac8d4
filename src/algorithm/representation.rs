//! Textual representations of a graph, as taught alongside the algorithms.
use crate::graph::*;
use std::fmt;

/// Dense weight matrix, rows and columns in node insertion order.
///
/// Absent edges are 0. An undirected edge fills both of its cells.
#[derive(Debug, Clone, PartialEq)]
pub struct AdjacencyMatrix {
    pub nodes: Vec<NodeId>,
    pub weights: Vec<Vec<f64>>,
}

impl AdjacencyMatrix {
    pub fn of(graph: &GraphModel) -> Self {
        let view = AdjacencyView::build(graph);
        let n = view.node_count();
        let mut weights = vec![vec![0.0; n]; n];
        for e in view.edges() {
            if let (Some(u), Some(v)) = (view.index_of(e.from), view.index_of(e.to)) {
                weights[u][v] = e.weight;
                if !e.directed {
                    weights[v][u] = e.weight;
                }
            }
        }
        Self {
            nodes: view.nodes().collect(),
            weights,
        }
    }

    /// Weight of the edge running `from -> to`, 0 if none or if either node is unknown.
    pub fn weight(&self, from: NodeId, to: NodeId) -> f64 {
        let at = |id: NodeId| self.nodes.iter().position(|x| *x == id);
        match (at(from), at(to)) {
            (Some(u), Some(v)) => self.weights[u][v],
            _ => 0.0,
        }
    }
}

impl fmt::Display for AdjacencyMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, " ")?;
        for id in self.nodes.iter() {
            write!(f, " {}", id)?;
        }
        writeln!(f)?;
        for (id, row) in self.nodes.iter().zip(self.weights.iter()) {
            write!(f, "{}", id)?;
            for w in row.iter() {
                write!(f, " {}", w)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One line per node: `u: v(w), ...`, neighbors in insertion order.
impl fmt::Display for AdjacencyView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for id in self.nodes() {
            write!(f, "{}:", id)?;
            for (i, n) in self.neighbors(id).iter().enumerate() {
                let sep = if i == 0 { " " } else { ", " };
                write!(f, "{}{}({})", sep, n.node, n.weight)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// The edges of a graph as a `U | V | weight` table, in insertion order.
///
/// Directed edges run from `U` to `V`.
pub struct EdgeList<'a>(pub &'a GraphModel);

impl<'a> fmt::Display for EdgeList<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "U | V | weight")?;
        writeln!(f, "--|---|-------")?;
        for e in self.0.edges() {
            writeln!(f, "{} | {} | {}", e.from, e.to, self.0.effective_weight(e))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn matrix_mirrors_undirected_edges() {
        let (mut g, n, _) = graph_of(false, 3, &[(0, 1, 5.0), (2, 0, 3.0)]);
        g.add_or_update_edge(n[1], n[2], 2.0, true).unwrap();
        let m = AdjacencyMatrix::of(&g);
        assert_eq!(m.weight(n[1], n[0]), 5.0);
        assert_eq!(m.weight(n[0], n[2]), 3.0);
        assert_eq!(m.weight(n[1], n[2]), 2.0);
        assert_eq!(m.weight(n[2], n[1]), 0.0);
        assert_eq!(
            m.to_string(),
            "  n0 n1 n2\nn0 0 5 3\nn1 5 0 2\nn2 3 0 0\n"
        );
    }

    #[test]
    fn adjacency_list() {
        let (g, _, _) = graph_of(false, 3, &[(0, 1, 5.0), (0, 2, 3.0)]);
        assert_eq!(
            AdjacencyView::build(&g).to_string(),
            "n0: n1(5), n2(3)\nn1: n0(5)\nn2: n0(3)\n"
        );
    }

    #[test]
    fn edge_list() {
        let (mut g, n, _) = graph_of(false, 3, &[(0, 1, 5.0)]);
        g.add_or_update_edge(n[2], n[1], 1.5, true).unwrap();
        assert_eq!(
            EdgeList(&g).to_string(),
            "U | V | weight\n--|---|-------\nn0 | n1 | 5\nn2 | n1 | 1.5\n"
        );
        g.set_weighted(false);
        assert!(EdgeList(&g).to_string().ends_with("n2 | n1 | 1\n"));
    }
}
