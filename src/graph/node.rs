use serde::{Deserialize, Serialize};

/// ID for nodes, which are essentially `usize`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub usize);

/// A factory to generate `NodeId` uniquely.
///
/// Ids are never handed out twice, even after the node they named was removed.
#[derive(Debug, Clone)]
pub struct NodeIdFactory(usize);

/// Where the presentation layer draws a node. Engines never look at it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// A node as stored in [super::GraphModel].
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub id: NodeId,
    pub position: Position,
    pub label: Option<String>,
}

impl Default for NodeIdFactory {
    fn default() -> Self {
        Self::new()
    }
}

impl NodeIdFactory {
    pub fn new() -> Self {
        Self(0)
    }

    /// Continues right after `last`, e.g. when resuming from a snapshot.
    pub fn resume_after(last: NodeId) -> Self {
        Self(last.0 + 1)
    }

    pub fn one_more(&mut self) -> NodeId {
        let cur = self.0;
        self.0 += 1;
        NodeId(cur)
    }
}

impl NodeId {
    pub const MIN: NodeId = NodeId(0);
    pub const MAX: NodeId = NodeId(usize::MAX);

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

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

impl Position {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl Node {
    /// The label if there is one, otherwise the id.
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.id.to_string(),
        }
    }
}
