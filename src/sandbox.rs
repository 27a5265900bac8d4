use crate::{algorithm::*, graph::*, Error, Result, Request, Run};
use log::debug;

/// The engine behind one sandbox window: a graph, and at most one run over it.
///
/// ```rust
/// use graph_sandbox::{graph::*, Request, Sandbox};
///
/// let mut sandbox = Sandbox::campus();
/// sandbox.start(Request::Bfs { start: NodeId(0) }).unwrap();
/// // edits wait until the run is over
/// assert!(sandbox.graph_mut().is_err());
/// while let Some(step) = sandbox.step().unwrap() {
///     println!("{}", serde_json::to_string(&step).unwrap());
/// }
/// assert!(sandbox.graph_mut().is_ok());
/// ```
#[derive(Debug, Default)]
pub struct Sandbox {
    graph: GraphModel,
    run: Option<Run>,
}

impl Sandbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sandbox opened on [GraphModel::campus_demo].
    pub fn campus() -> Self {
        Self::with_graph(GraphModel::campus_demo())
    }

    pub fn with_graph(graph: GraphModel) -> Self {
        Self { graph, run: None }
    }

    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self> {
        GraphModel::from_snapshot(snapshot).map(Self::with_graph)
    }

    pub fn graph(&self) -> &GraphModel {
        &self.graph
    }

    /// The graph, for editing.
    ///
    /// Refused with [Error::InvalidState] while a run is in progress.
    /// A finished or cancelled run is dropped, its annotations no longer matching the graph.
    pub fn graph_mut(&mut self) -> Result<&mut GraphModel> {
        if self.is_running() {
            return Err(Error::InvalidState(
                "the graph cannot be edited while an algorithm runs".to_string(),
            ));
        }
        self.run = None;
        Ok(&mut self.graph)
    }

    /// Starts a run, cancelling the one in progress if any.
    ///
    /// On error the previous run is left untouched.
    pub fn start(&mut self, request: Request) -> Result<()> {
        let run = Run::start(&self.graph, request)?;
        if let Some(old) = self.run.as_mut() {
            old.cancel();
        }
        self.run = Some(run);
        Ok(())
    }

    /// Delivers the next step of the current run, if any.
    ///
    /// When a max-flow run completes, its flow is written onto the graph's edges.
    pub fn step(&mut self) -> Result<Option<Step>> {
        let run = match self.run.as_mut() {
            Some(run) => run,
            None => return Ok(None),
        };
        let step = run.next_step(&self.graph)?;
        if let Some(Outcome::MaxFlow(flow)) = step.as_ref().and_then(|s| s.outcome()) {
            flow.commit(&mut self.graph)?;
        }
        Ok(step)
    }

    /// Runs `request` synchronously, with all the side effects of stepping through it.
    pub fn run_to_completion(&mut self, request: Request) -> Result<Outcome> {
        self.start(request)?;
        while let Some(step) = self.step()? {
            if let Some(outcome) = step.outcome() {
                return Ok(outcome.clone());
            }
        }
        Err(Error::InvalidState(format!(
            "run {:?} ended without an outcome",
            request
        )))
    }

    pub fn restart(&mut self) -> Result<()> {
        match self.run.as_mut() {
            Some(run) => {
                debug!("restarting {:?}", run.request());
                run.restart()
            }
            None => Err(Error::InvalidState("nothing to restart".to_string())),
        }
    }

    pub fn cancel(&mut self) {
        if let Some(run) = self.run.as_mut() {
            run.cancel();
        }
    }

    pub fn is_running(&self) -> bool {
        self.run.as_ref().map_or(false, |r| r.is_running())
    }

    /// The current or last run, until the next edit.
    pub fn run(&self) -> Option<&Run> {
        self.run.as_ref()
    }

    pub fn annotations(&self) -> Option<&Annotations> {
        self.run.as_ref().map(|r| r.annotations())
    }

    pub fn into_graph(self) -> GraphModel {
        self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;

    #[test]
    fn no_edits_mid_run() {
        let mut sandbox = Sandbox::campus();
        sandbox.start(Request::Dfs { start: NodeId(2) }).unwrap();
        sandbox.step().unwrap();
        assert!(matches!(sandbox.graph_mut(), Err(Error::InvalidState(_))));
        sandbox.cancel();
        assert!(sandbox.annotations().is_some());
        sandbox.graph_mut().unwrap().add_node(Position::default());
        assert!(sandbox.run().is_none());
    }

    #[test]
    fn a_new_run_replaces_the_old_one() {
        let mut sandbox = Sandbox::campus();
        sandbox.start(Request::Bfs { start: NodeId(0) }).unwrap();
        sandbox.step().unwrap();
        sandbox.start(Request::Kruskal).unwrap();
        assert_eq!(sandbox.annotations().unwrap().steps, 0);
        assert_eq!(sandbox.run().unwrap().request(), &Request::Kruskal);

        // a failing start leaves the current run alone
        assert!(sandbox.start(Request::Bfs { start: NodeId(99) }).is_err());
        assert!(sandbox.is_running());
    }

    #[test]
    fn max_flow_is_committed_on_completion() {
        let (g, n, e) = graph_of(true, 3, &[(0, 1, 3.0), (1, 2, 2.0), (0, 2, 1.0)]);
        let mut sandbox = Sandbox::with_graph(g);
        sandbox
            .start(Request::MaxFlow {
                source: n[0],
                sink: n[2],
            })
            .unwrap();
        sandbox.step().unwrap();
        // nothing is written until the run completes
        assert!(sandbox.graph().edges().all(|e| e.flow == 0.0));
        while sandbox.step().unwrap().is_some() {}
        assert_eq!(sandbox.graph().edge(e[0]).unwrap().flow, 2.0);
        assert_eq!(sandbox.graph().edge(e[2]).unwrap().flow, 1.0);
        assert_eq!(sandbox.annotations().unwrap().edges[&e[1]].flow, Some(2.0));
    }

    #[test]
    fn run_to_completion() {
        let mut sandbox = Sandbox::campus();
        match sandbox.run_to_completion(Request::Prim { root: None }).unwrap() {
            Outcome::SpanningForest(f) => assert_eq!(f.total_weight, 15.0),
            x => panic!("unexpected outcome {:?}", x),
        }
        assert!(!sandbox.is_running());
        assert!(sandbox.run().unwrap().outcome().is_some());
        assert!(sandbox.restart().is_ok());
        assert!(sandbox.is_running());
    }

    #[test]
    fn snapshots_open_sandboxes() {
        let json = GraphModel::campus_demo().to_json().unwrap();
        let snapshot: Snapshot = serde_json::from_str(&json).unwrap();
        let mut sandbox = Sandbox::from_snapshot(&snapshot).unwrap();
        match sandbox
            .run_to_completion(Request::Euler { start: None })
            .unwrap()
        {
            Outcome::Euler(t) => assert_eq!(t.kind, EulerKind::Path),
            x => panic!("unexpected outcome {:?}", x),
        }
    }
}
