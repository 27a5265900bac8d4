use super::Outcome;
use crate::graph::*;
use serde::Serialize;
use std::collections::{BTreeMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StepKind {
    /// A node is being visited (traversals, coloring, spanning trees).
    Visit,
    /// A node's distance became final (shortest paths).
    Settle,
    /// An edge was taken: a tree edge, a relaxation, an augmenting-path arc, a trail edge.
    EdgeUsed,
    /// The last step of every run, carrying the outcome.
    Done,
}

/// Algorithm-specific scratch attached to a step.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Payload {
    /// Position of the node in the visiting order.
    Order(usize),
    Distance(f64),
    Color(u8),
    Weight(f64),
    /// Flow pushed along the edge, negative if pushed from its `to` towards its `from`.
    Flow(f64),
    Outcome(Box<Outcome>),
}

/// One incremental event of a run, for the presentation layer to render.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Step {
    pub kind: StepKind,
    #[serde(rename = "nodeId", skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
    #[serde(rename = "edgeId", skip_serializing_if = "Option::is_none")]
    pub edge: Option<EdgeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payload: Option<Payload>,
}

impl Step {
    pub fn visit(node: NodeId, payload: Payload) -> Self {
        Self {
            kind: StepKind::Visit,
            node: Some(node),
            edge: None,
            payload: Some(payload),
        }
    }

    pub fn settle(node: NodeId, distance: f64) -> Self {
        Self {
            kind: StepKind::Settle,
            node: Some(node),
            edge: None,
            payload: Some(Payload::Distance(distance)),
        }
    }

    /// `node` is the end the edge led to.
    pub fn edge_used(edge: EdgeId, node: NodeId, payload: Option<Payload>) -> Self {
        Self {
            kind: StepKind::EdgeUsed,
            node: Some(node),
            edge: Some(edge),
            payload,
        }
    }

    pub fn done(outcome: Outcome) -> Self {
        Self {
            kind: StepKind::Done,
            node: None,
            edge: None,
            payload: Some(Payload::Outcome(Box::new(outcome))),
        }
    }

    pub fn is_done(&self) -> bool {
        self.kind == StepKind::Done
    }

    /// The outcome carried by a `Done` step.
    pub fn outcome(&self) -> Option<&Outcome> {
        match &self.payload {
            Some(Payload::Outcome(o)) => Some(o),
            _ => None,
        }
    }
}

/// An algorithm that can be advanced a bit at a time.
///
/// [Steps] drives implementations: it calls `advance` until it returns `false`,
/// forwarding whatever steps it queued, then emits a single `Done`.
pub trait Algorithm {
    type Output;

    /// Makes progress, queueing the steps taken into `out`.
    /// Returns `false` once there is nothing left to do.
    fn advance(&mut self, out: &mut VecDeque<Step>) -> bool;

    /// The result so far. Complete once `advance` returned `false`.
    fn output(&self) -> Self::Output;

    fn into_outcome(output: Self::Output) -> Outcome;
}

/// Lazy step sequence of an algorithm, terminated by exactly one `Done` step.
pub struct Steps<A> {
    algorithm: A,
    pending: VecDeque<Step>,
    exhausted: bool,
    finished: bool,
}

impl<A> Steps<A>
where
    A: Algorithm,
{
    pub fn new(algorithm: A) -> Self {
        Self {
            algorithm,
            pending: VecDeque::new(),
            exhausted: false,
            finished: false,
        }
    }

    /// Runs to completion synchronously, dropping the steps.
    pub fn finish(mut self) -> A::Output {
        while !self.exhausted {
            self.exhausted = !self.algorithm.advance(&mut self.pending);
        }
        self.algorithm.output()
    }
}

impl<A> Iterator for Steps<A>
where
    A: Algorithm,
{
    type Item = Step;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(step) = self.pending.pop_front() {
                return Some(step);
            }
            if self.finished {
                return None;
            }
            if self.exhausted {
                self.finished = true;
                let outcome = A::into_outcome(self.algorithm.output());
                return Some(Step::done(outcome));
            }
            self.exhausted = !self.algorithm.advance(&mut self.pending);
        }
    }
}

/// What a run has revealed so far about a node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NodeMark {
    pub visited: bool,
    pub settled: bool,
    pub order: Option<usize>,
    pub distance: Option<f64>,
    pub color: Option<u8>,
}

/// What a run has revealed so far about an edge.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct EdgeMark {
    pub used: bool,
    /// Net flow pushed from `from` to `to` so far.
    pub flow: Option<f64>,
}

/// Per-run scratch state, rebuilt from the steps delivered so far.
///
/// This is what the presentation layer paints; the graph itself is never annotated.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Annotations {
    pub nodes: BTreeMap<NodeId, NodeMark>,
    pub edges: BTreeMap<EdgeId, EdgeMark>,
    /// The node the last step was about.
    pub current: Option<NodeId>,
    pub steps: usize,
}

impl Annotations {
    pub fn record(&mut self, step: &Step) {
        self.steps += 1;
        match step.kind {
            StepKind::Visit => {
                if let Some(id) = step.node {
                    let mark = self.nodes.entry(id).or_default();
                    mark.visited = true;
                    match step.payload {
                        Some(Payload::Order(i)) => mark.order = Some(i),
                        Some(Payload::Color(c)) => mark.color = Some(c),
                        Some(Payload::Distance(d)) => mark.distance = Some(d),
                        _ => {}
                    }
                }
                self.current = step.node;
            }
            StepKind::Settle => {
                if let Some(id) = step.node {
                    let mark = self.nodes.entry(id).or_default();
                    mark.visited = true;
                    mark.settled = true;
                    if let Some(Payload::Distance(d)) = step.payload {
                        mark.distance = Some(d);
                    }
                }
                self.current = step.node;
            }
            StepKind::EdgeUsed => {
                if let Some(id) = step.edge {
                    let mark = self.edges.entry(id).or_default();
                    mark.used = true;
                    if let Some(Payload::Flow(f)) = step.payload {
                        mark.flow = Some(mark.flow.unwrap_or(0.0) + f);
                    }
                }
                if let (Some(id), Some(Payload::Distance(d))) = (step.node, &step.payload) {
                    self.nodes.entry(id).or_default().distance = Some(*d);
                }
            }
            StepKind::Done => self.current = None,
        }
    }

    pub fn is_visited(&self, id: NodeId) -> bool {
        self.nodes.get(&id).map(|m| m.visited).unwrap_or(false)
    }

    pub fn is_used(&self, id: EdgeId) -> bool {
        self.edges.get(&id).map(|m| m.used).unwrap_or(false)
    }

    /// Visited nodes in id order.
    pub fn visited(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes
            .iter()
            .filter(|(_, m)| m.visited)
            .map(|(id, _)| *id)
    }

    pub fn used_edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges
            .iter()
            .filter(|(_, m)| m.used)
            .map(|(id, _)| *id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::{Traversal, TraversalKind};

    struct Countdown(usize);

    impl Algorithm for Countdown {
        type Output = usize;

        fn advance(&mut self, out: &mut VecDeque<Step>) -> bool {
            if self.0 == 0 {
                return false;
            }
            self.0 -= 1;
            // two steps at once, one call, to exercise the buffer
            out.push_back(Step::visit(NodeId(self.0), Payload::Order(self.0)));
            out.push_back(Step::settle(NodeId(self.0), self.0 as f64));
            true
        }

        fn output(&self) -> usize {
            self.0
        }

        fn into_outcome(_: usize) -> Outcome {
            Outcome::Traversal(Traversal {
                kind: TraversalKind::BreadthFirst,
                start: NodeId(0),
                order: vec![],
                parents: BTreeMap::new(),
            })
        }
    }

    #[test]
    fn exactly_one_done_at_the_end() {
        let steps: Vec<_> = Steps::new(Countdown(3)).collect();
        assert_eq!(steps.len(), 7);
        assert!(steps[..6].iter().all(|s| !s.is_done()));
        assert!(steps[6].is_done());
        assert_eq!(Steps::new(Countdown(3)).finish(), 0);
    }

    #[test]
    fn annotations_follow_steps() {
        let mut marks = Annotations::default();
        for step in Steps::new(Countdown(2)) {
            marks.record(&step);
        }
        assert_eq!(marks.steps, 5);
        assert_eq!(marks.visited().collect::<Vec<_>>(), vec![NodeId(0), NodeId(1)]);
        assert_eq!(marks.nodes[&NodeId(1)].distance, Some(1.0));
        assert!(marks.nodes[&NodeId(0)].settled);
        assert_eq!(marks.current, None);
    }

    #[test]
    fn flows_accumulate() {
        let mut marks = Annotations::default();
        marks.record(&Step::edge_used(EdgeId(0), NodeId(1), Some(Payload::Flow(3.0))));
        marks.record(&Step::edge_used(EdgeId(0), NodeId(0), Some(Payload::Flow(-1.0))));
        assert_eq!(marks.edges[&EdgeId(0)].flow, Some(2.0));
        assert!(marks.is_used(EdgeId(0)));
    }

    #[test]
    fn steps_serialize_for_the_host() {
        let step = Step::edge_used(EdgeId(4), NodeId(2), Some(Payload::Distance(1.5)));
        let json = serde_json::to_string(&step).unwrap();
        assert_eq!(
            json,
            r#"{"kind":"edgeUsed","nodeId":2,"edgeId":4,"payload":{"distance":1.5}}"#
        );
    }
}
