use super::NodeId;
use serde::{Deserialize, Serialize};

/// ID for edges, which are essentially `usize`.
///
/// Ids grow with insertion, so ordering edges by id is ordering them by insertion.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EdgeId(pub usize);

/// A factory to generate `EdgeId` uniquely.
#[derive(Debug, Clone)]
pub struct EdgeIdFactory(usize);

/// An edge as stored in [super::GraphModel].
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    /// Distance for shortest paths and spanning trees, capacity for flows.
    pub weight: f64,
    pub directed: bool,
    /// Written only by a completed max-flow run.
    pub flow: f64,
}

impl Default for EdgeIdFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl EdgeIdFactory {
    pub fn new() -> Self {
        Self(0)
    }

    pub fn resume_after(last: EdgeId) -> Self {
        Self(last.0 + 1)
    }

    pub fn one_more(&mut self) -> EdgeId {
        let cur = self.0;
        self.0 += 1;
        EdgeId(cur)
    }
}

impl EdgeId {
    pub const MIN: EdgeId = EdgeId(0);
    pub const MAX: EdgeId = EdgeId(usize::MAX);

    pub fn new(x: usize) -> Self {
        Self(x)
    }

    pub fn to_raw(&self) -> usize {
        self.0
    }

    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

impl Edge {
    /// The endpoint opposite to `end`.
    pub fn other(&self, end: NodeId) -> NodeId {
        if self.from == end {
            self.to
        } else {
            self.from
        }
    }

    pub fn is_self_loop(&self) -> bool {
        self.from == self.to
    }

    /// Whether this edge occupies the slot of a would-be edge `from -> to`.
    ///
    /// Two directed edges collide only on the same ordered pair;
    /// as soon as one side is undirected the pair is compared unordered.
    pub fn collides_with(&self, from: NodeId, to: NodeId, directed: bool) -> bool {
        if self.directed && directed {
            self.from == from && self.to == to
        } else {
            (self.from == from && self.to == to) || (self.from == to && self.to == from)
        }
    }
}
