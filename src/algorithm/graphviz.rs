//! Visualize graphs, and what a run revealed about them, in the graphviz format.
use super::Annotations;
use crate::graph::*;

/**
 * Dumps a graph into graphviz format.
 *
 * Nodes are named after their ids and labeled with their labels, if any.
 * Edges are labeled with their weights on weighted graphs, as `flow/weight`
 * once a flow has been committed.
 * With [Annotations] of a run, visited nodes are filled and used edges drawn red.
 *
 * A graph holding any directed edge is dumped as a `digraph`,
 * with `dir=none` on its undirected edges.
 *
 * # Examples
 *
 * ```rust
 * use graph_sandbox::{algorithm::graphviz::*, graph::*};
 *
 * let mut g = GraphModel::new();
 * let a = g.add_labeled_node(Position::default(), "A");
 * let b = g.add_node(Position::default());
 * g.add_or_update_edge(a, b, 2.5, false).unwrap();
 * g.add_or_update_edge(b, b, 1.0, false).unwrap();
 * let trial = {
 *     let mut buf = vec![];
 *     g.dump_in_graphviz(None, &mut buf, "trial").unwrap();
 *     String::from_utf8(buf).unwrap()
 * };
 * assert_eq!(
 *     trial,
 *     r#"graph trial {
 *   n0 [label="A"] ;
 *   n1 ;
 *   n0 -- n1 [label="2.5"] ;
 *   n1 -- n1 [label="1"] ;
 * }
 * "#
 * );
 * ```
 */
pub trait DumpInGraphviz {
    /**
     * Dumps to a `std::io::Write` object in the graphviz format.
     */
    fn dump_in_graphviz<W>(
        &self,
        annotations: Option<&Annotations>,
        out: &mut W,
        graph_name: &str,
    ) -> std::io::Result<()>
    where
        W: std::io::Write;
}

impl DumpInGraphviz for GraphModel {
    fn dump_in_graphviz<W>(
        &self,
        annotations: Option<&Annotations>,
        out: &mut W,
        graph_name: &str,
    ) -> std::io::Result<()>
    where
        W: std::io::Write,
    {
        let directed = self.is_directed() || self.edges().any(|e| e.directed);
        if directed {
            writeln!(out, "digraph {} {{", graph_name)?;
        } else {
            writeln!(out, "graph {} {{", graph_name)?;
        }
        for node in self.nodes() {
            let mut attrs = vec![];
            if let Some(label) = node.label.as_ref() {
                attrs.push(format!("label={:?}", label));
            }
            if annotations.map_or(false, |a| a.is_visited(node.id)) {
                attrs.push("style=filled".to_owned());
            }
            write_statement(out, &node.id.to_string(), &attrs)?;
        }
        let dir = if directed { "->" } else { "--" };
        for e in self.edges() {
            let mut attrs = vec![];
            if self.is_weighted() {
                if e.flow > 0.0 {
                    attrs.push(format!("label=\"{}/{}\"", e.flow, e.weight));
                } else {
                    attrs.push(format!("label=\"{}\"", e.weight));
                }
            }
            if directed && !e.directed {
                attrs.push("dir=none".to_owned());
            }
            if annotations.map_or(false, |a| a.is_used(e.id)) {
                attrs.push("color=red".to_owned());
            }
            write_statement(out, &format!("{} {} {}", e.from, dir, e.to), &attrs)?;
        }
        writeln!(out, "}}")?;
        Ok(())
    }
}

fn write_statement<W>(out: &mut W, statement: &str, attrs: &[String]) -> std::io::Result<()>
where
    W: std::io::Write,
{
    if attrs.is_empty() {
        writeln!(out, "  {} ;", statement)
    } else {
        writeln!(out, "  {} [{}] ;", statement, attrs.join(", "))
    }
}
