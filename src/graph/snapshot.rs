use crate::{graph::*, Error, Result};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The logical content of a [GraphModel], as imported and exported by the host.
///
/// ```json
/// { "directed": false, "weighted": true,
///   "nodes": [{"id": 0, "x": 100.0, "y": 100.0, "label": "A"}],
///   "edges": [{"id": 0, "from": 0, "to": 1, "weight": 5.0, "directed": false, "flow": 0.0}] }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(default)]
    pub directed: bool,
    #[serde(default = "weighted_by_default")]
    pub weighted: bool,
    #[serde(default)]
    pub nodes: Vec<NodeRecord>,
    #[serde(default)]
    pub edges: Vec<EdgeRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub x: f64,
    pub y: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeRecord {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub weight: f64,
    #[serde(default)]
    pub directed: bool,
    /// Derived state. Exported for display, ignored on import.
    #[serde(default)]
    pub flow: f64,
}

/// Largest integer a JSON host holds exactly. Ids above it are refused on import,
/// which also leaves the id factories room to grow.
const MAX_IMPORTED_ID: u64 = (1 << 53) - 1;

fn weighted_by_default() -> bool {
    true
}

impl GraphModel {
    pub fn to_snapshot(&self) -> Snapshot {
        Snapshot {
            directed: self.is_directed(),
            weighted: self.is_weighted(),
            nodes: self
                .nodes()
                .map(|n| NodeRecord {
                    id: n.id,
                    x: n.position.x,
                    y: n.position.y,
                    label: n.label.clone(),
                })
                .collect(),
            edges: self
                .edges()
                .map(|e| EdgeRecord {
                    id: e.id,
                    from: e.from,
                    to: e.to,
                    weight: e.weight,
                    directed: e.directed,
                    flow: e.flow,
                })
                .collect(),
        }
    }

    /// Rebuilds a graph with the very same ids.
    ///
    /// Flows are reset to zero. Duplicated ids, dangling endpoints, bad weights and
    /// edges colliding on the same pair are rejected as [Error::InvalidArgument],
    /// and so are ids beyond 2^53 - 1.
    pub fn from_snapshot(snapshot: &Snapshot) -> Result<Self> {
        let mut nodes = BTreeMap::new();
        for n in snapshot.nodes.iter() {
            if n.id.0 as u64 > MAX_IMPORTED_ID {
                return Err(Error::InvalidArgument(format!(
                    "node id {} is out of range",
                    n.id
                )));
            }
            let node = Node {
                id: n.id,
                position: Position::new(n.x, n.y),
                label: n.label.clone(),
            };
            if nodes.insert(n.id, node).is_some() {
                return Err(Error::InvalidArgument(format!(
                    "node {} appears twice in the snapshot",
                    n.id
                )));
            }
        }
        let mut edges: BTreeMap<EdgeId, Edge> = BTreeMap::new();
        for e in snapshot.edges.iter() {
            if e.id.0 as u64 > MAX_IMPORTED_ID {
                return Err(Error::InvalidArgument(format!(
                    "edge id {} is out of range",
                    e.id
                )));
            }
            for end in [e.from, e.to] {
                if !nodes.contains_key(&end) {
                    return Err(Error::InvalidArgument(format!(
                        "edge {} references unknown node {}",
                        e.id, end
                    )));
                }
            }
            if !e.weight.is_finite() || e.weight < 0.0 {
                return Err(Error::InvalidArgument(format!(
                    "edge {} has weight {}",
                    e.id, e.weight
                )));
            }
            if let Some(other) = edges
                .values()
                .find(|o| o.collides_with(e.from, e.to, e.directed))
            {
                return Err(Error::InvalidArgument(format!(
                    "edges {} and {} connect the same pair",
                    other.id, e.id
                )));
            }
            let edge = Edge {
                id: e.id,
                from: e.from,
                to: e.to,
                weight: e.weight,
                directed: e.directed,
                flow: 0.0,
            };
            if edges.insert(e.id, edge).is_some() {
                return Err(Error::InvalidArgument(format!(
                    "edge {} appears twice in the snapshot",
                    e.id
                )));
            }
        }
        debug!(
            "loaded snapshot with {} node(s) and {} edge(s)",
            nodes.len(),
            edges.len()
        );
        Ok(Self::from_parts(
            snapshot.directed,
            snapshot.weighted,
            nodes,
            edges,
        ))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.to_snapshot())?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: Snapshot = serde_json::from_str(json)?;
        Self::from_snapshot(&snapshot)
    }
}
