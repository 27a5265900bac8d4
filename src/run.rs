use crate::{algorithm::*, graph::*, Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::rc::Rc;

/// An algorithm and its parameters, as picked by the user.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "camelCase")]
pub enum Request {
    Bfs {
        start: NodeId,
    },
    Dfs {
        start: NodeId,
    },
    /// `target` is optional so that a host can forward a half-filled form;
    /// starting without one fails with [Error::MissingInput].
    ShortestPath {
        start: NodeId,
        target: Option<NodeId>,
    },
    Bipartite,
    Prim {
        root: Option<NodeId>,
    },
    Kruskal,
    MaxFlow {
        source: NodeId,
        sink: NodeId,
    },
    Euler {
        start: Option<NodeId>,
    },
}

impl Request {
    /// The projection of `graph` this algorithm runs on.
    fn view(&self, graph: &GraphModel) -> AdjacencyView {
        match self {
            Request::Bipartite => AdjacencyView::build_undirected(graph),
            _ => AdjacencyView::build(graph),
        }
    }

    /// Validates the request against `view` and prepares its steps.
    fn steps(&self, view: Rc<AdjacencyView>) -> Result<Box<dyn Iterator<Item = Step>>> {
        let steps: Box<dyn Iterator<Item = Step>> = match *self {
            Request::Bfs { start } => Box::new(bfs_steps(view, start)?),
            Request::Dfs { start } => Box::new(dfs_steps(view, start)?),
            Request::ShortestPath { start, target } => {
                let target = target.ok_or(Error::MissingInput("target node"))?;
                Box::new(dijkstra_steps(view, start, target)?)
            }
            Request::Bipartite => Box::new(bipartite_steps(view)),
            Request::Prim { root } => Box::new(prim_steps(view, root)?),
            Request::Kruskal => Box::new(kruskal_steps(view)?),
            Request::MaxFlow { source, sink } => Box::new(max_flow_steps(view, source, sink)?),
            Request::Euler { start } => Box::new(euler_steps(view, start)?),
        };
        Ok(steps)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum RunStatus {
    Running,
    Finished,
    Cancelled,
}

/// One algorithm run over a snapshot of a graph.
///
/// The host pulls steps at its own pace with [Run::next_step];
/// every step delivered is also folded into the run's [Annotations].
/// The graph must stay unchanged until the run is over.
pub struct Run {
    request: Request,
    view: Rc<AdjacencyView>,
    steps: Box<dyn Iterator<Item = Step>>,
    annotations: Annotations,
    status: RunStatus,
    outcome: Option<Outcome>,
}

impl std::fmt::Debug for Run {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Run")
            .field("request", &self.request)
            .field("revision", &self.view.revision())
            .field("status", &self.status)
            .field("steps", &self.annotations.steps)
            .finish()
    }
}

impl Run {
    /// Fails before any step if the request does not fit the graph.
    pub fn start(graph: &GraphModel, request: Request) -> Result<Self> {
        let view = Rc::new(request.view(graph));
        let steps = request.steps(view.clone())?;
        debug!(
            "run {:?} started at revision {}",
            request,
            view.revision()
        );
        Ok(Self {
            request,
            view,
            steps,
            annotations: Annotations::default(),
            status: RunStatus::Running,
            outcome: None,
        })
    }

    /// The next step, or `None` once the run is over.
    ///
    /// Fails with [Error::ConcurrentModification], cancelling the run,
    /// if `graph` changed since the run started.
    pub fn next_step(&mut self, graph: &GraphModel) -> Result<Option<Step>> {
        if self.status != RunStatus::Running {
            return Ok(None);
        }
        if graph.revision() != self.view.revision() {
            self.status = RunStatus::Cancelled;
            return Err(Error::ConcurrentModification {
                expected: self.view.revision(),
                found: graph.revision(),
            });
        }
        let step = match self.steps.next() {
            Some(step) => step,
            None => {
                self.status = RunStatus::Finished;
                return Ok(None);
            }
        };
        self.annotations.record(&step);
        if step.is_done() {
            self.outcome = step.outcome().cloned();
            self.status = RunStatus::Finished;
            debug!(
                "run {:?} finished after {} step(s)",
                self.request, self.annotations.steps
            );
        }
        Ok(Some(step))
    }

    /// Stops delivering steps. What was revealed so far stays in the annotations.
    pub fn cancel(&mut self) {
        if self.status == RunStatus::Running {
            debug!("run {:?} cancelled", self.request);
            self.status = RunStatus::Cancelled;
        }
    }

    /// Replays the run from its first step over the same snapshot.
    pub fn restart(&mut self) -> Result<()> {
        self.steps = self.request.steps(self.view.clone())?;
        self.annotations = Annotations::default();
        self.status = RunStatus::Running;
        self.outcome = None;
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.status == RunStatus::Running
    }

    pub fn status(&self) -> RunStatus {
        self.status
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// Revision of the graph snapshot the run works on.
    pub fn revision(&self) -> u64 {
        self.view.revision()
    }

    /// The result, once the run finished. Always `None` for a cancelled run.
    pub fn outcome(&self) -> Option<&Outcome> {
        match self.status {
            RunStatus::Finished => self.outcome.as_ref(),
            _ => None,
        }
    }

    pub fn annotations(&self) -> &Annotations {
        &self.annotations
    }
}
