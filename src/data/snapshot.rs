//! Telemetry snapshot model.
//!
//! These types match the JSON emitted by the node-health server once per
//! telemetry cycle:
//!
//! ```json
//! {
//!   "snapshots": [
//!     { "name": "alice",
//!       "link": { "status": "connected",
//!                 "statistics": { "events": 42, "round_trip_latency": 2.0, "pps": 16500 } } }
//!   ],
//!   "tree": { "nodes": ["hub", "alice", "bob", "carol"], "edges": [[0, 1], [1, 2]] }
//! }
//! ```

use serde::{Deserialize, Serialize};

use super::status::LinkStatus;
use super::topology::{classify_hub, classify_leaf, EdgeSet, HUB};
use super::StateIndex;

/// One telemetry cycle: per-link state plus the optional topology graph.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Link entries; the index is the display column.
    #[serde(rename = "snapshots", default)]
    pub links: Vec<LinkEntry>,

    #[serde(rename = "tree", default, skip_serializing_if = "Option::is_none")]
    pub topology: Option<TopologyGraph>,
}

impl Snapshot {
    pub fn new(links: Vec<LinkEntry>) -> Self {
        Self {
            links,
            topology: None,
        }
    }

    pub fn with_topology(mut self, topology: TopologyGraph) -> Self {
        self.topology = Some(topology);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.topology.is_none()
    }
}

/// A named peer link.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkEntry {
    pub name: String,
    pub link: Link,
}

impl LinkEntry {
    pub fn new(name: impl Into<String>, link: Link) -> Self {
        Self {
            name: name.into(),
            link,
        }
    }

    /// Statistics, but only when the link is connected.
    pub fn metrics(&self) -> Option<&Statistics> {
        if self.link.status.is_connected() {
            self.link.statistics.as_ref()
        } else {
            None
        }
    }
}

/// Status of a link and, when connected, its traffic statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub status: LinkStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
}

impl Link {
    pub fn new(status: LinkStatus) -> Self {
        Self {
            status,
            statistics: None,
        }
    }

    pub fn connected(statistics: Statistics) -> Self {
        Self {
            status: LinkStatus::Connected,
            statistics: Some(statistics),
        }
    }
}

/// Traffic statistics for a connected link.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub events: u64,

    #[serde(rename = "round_trip_latency")]
    pub round_trip_latency_ms: f64,

    #[serde(rename = "pps")]
    pub packets_per_second: f64,
}

/// Directed graph over the hub (index 0) and up to three leaves.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TopologyGraph {
    #[serde(default)]
    pub nodes: Vec<String>,

    #[serde(default)]
    pub edges: EdgeSet,
}

impl TopologyGraph {
    pub fn new<S: Into<String>>(
        nodes: impl IntoIterator<Item = S>,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        Self {
            nodes: nodes.into_iter().map(Into::into).collect(),
            edges: edges.into_iter().collect(),
        }
    }

    pub fn hub_state(&self) -> StateIndex {
        classify_hub(&self.edges)
    }

    pub fn leaf_state(&self, node: usize) -> StateIndex {
        classify_leaf(node, &self.edges)
    }

    /// Indicator label for `node`: the upper-cased first character of its name.
    ///
    /// Empty when the node is absent or unnamed.
    pub fn label(&self, node: usize) -> String {
        self.nodes
            .get(node)
            .and_then(|name| name.chars().next())
            .map(|c| c.to_uppercase().collect())
            .unwrap_or_default()
    }

    pub fn hub_label(&self) -> String {
        self.label(HUB)
    }

    pub fn has_node(&self, node: usize) -> bool {
        node < self.nodes.len()
    }
}
