//! Topology classification for the hub-and-leaves clique.
//!
//! The topology graph always has the same four identities: a hub (node 0) and
//! three leaves (nodes 1, 2 and 3). Every node's indicator shows one state
//! that encodes which of the other nodes it is linked to, and in which
//! direction.
//!
//! ## Hub
//!
//! The hub state is a bitmask over its outgoing edges. The weights are not in
//! leaf order: leaf 1 is worth 1, leaf 3 is worth 2 and leaf 2 is worth 4,
//! which matches the artwork of the hub indicator.
//!
//! ## Leaves
//!
//! A leaf is classified by its total degree (incoming plus outgoing edges).
//! Each degree band has an ordered list of [`LeafRule`]s that are all
//! evaluated in order; a later matching rule overrides an earlier one. Rules
//! name nodes by [`Role`] rather than by id, and every leaf has a
//! [`LeafProfile`] that binds the roles to concrete node ids, so the same
//! table serves all three leaves.
//!
//! | degree | rule                                         | state |
//! |--------|----------------------------------------------|-------|
//! | 0      | -                                            | 0     |
//! | 1      | in: hub                                      | 1     |
//! | 1      | in: peer A                                   | 2     |
//! | 1      | in: peer B                                   | 3     |
//! | 2      | in: hub, out: peer A                         | 4     |
//! | 2      | in: hub, out: peer B                         | 5     |
//! | 2      | in: peer A, out: peer B                      | 6     |
//! | 2      | in: peer B, out: peer A                      | 7     |
//! | 2      | in: hub + peer A                             | 8     |
//! | 2      | in: hub + peer B                             | 9     |
//! | 2      | in: peer A + peer B                          | 10    |
//! | 3      | in: hub, out: peer A + peer B                | 11    |
//! | 3      | in: peer A + peer B, out: hub                | 11    |
//! | 3      | in: hub + back, out: forward                 | 12    |
//! | 3      | in: hub + forward, out: back                 | 13    |
//! | 3      | in: hub + peer A + peer B                    | 14    |
//!
//! Any adjacency that no rule describes leaves the state at 0.

use std::collections::BTreeSet;

use super::StateIndex;
use Role::{Back, Forward, Hub, PeerA, PeerB};

/// Node id of the hub.
pub const HUB: usize = 0;

/// Node ids of the leaves, in display order.
pub const LEAVES: [usize; 3] = [1, 2, 3];

/// A directed edge `(source, destination)`.
pub type Edge = (usize, usize);

/// Set of directed edges. Duplicate edges collapse.
pub type EdgeSet = BTreeSet<Edge>;

/// Weight each hub→leaf edge adds to the hub state.
const HUB_WEIGHTS: [(usize, StateIndex); 3] = [(1, 1), (3, 2), (2, 4)];

/// Classify the hub from its outgoing edges. Result is in `0..=7`.
pub fn classify_hub(edges: &EdgeSet) -> StateIndex {
    HUB_WEIGHTS
        .iter()
        .filter(|(leaf, _)| edges.contains(&(HUB, *leaf)))
        .map(|(_, weight)| weight)
        .sum()
}

/// Classify leaf `node` (1, 2 or 3) from the edges touching it.
///
/// Returns 0 for any other node id.
pub fn classify_leaf(node: usize, edges: &EdgeSet) -> StateIndex {
    match LeafProfile::for_node(node) {
        Some(profile) => evaluate(LEAF_RULES, &profile, &Adjacency::of(node, edges)),
        None => 0,
    }
}

/// A node's position relative to the leaf being classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Hub,
    /// First peer in the leaf's fixed peer order.
    PeerA,
    /// Second peer in the leaf's fixed peer order.
    PeerB,
    /// The peer a degree-3 leaf points at in state 12.
    Forward,
    /// The peer that is not `Forward`.
    Back,
}

/// Binds [`Role`]s to node ids for one leaf.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafProfile {
    pub node: usize,
    pub peers: [usize; 2],
    pub forward: usize,
}

const LEAF_PROFILES: [LeafProfile; 3] = [
    LeafProfile {
        node: 1,
        peers: [2, 3],
        forward: 2,
    },
    LeafProfile {
        node: 2,
        peers: [1, 3],
        forward: 3,
    },
    LeafProfile {
        node: 3,
        peers: [1, 2],
        forward: 2,
    },
];

impl LeafProfile {
    pub fn for_node(node: usize) -> Option<Self> {
        LEAF_PROFILES.iter().copied().find(|p| p.node == node)
    }

    pub fn resolve(&self, role: Role) -> usize {
        match role {
            Role::Hub => HUB,
            Role::PeerA => self.peers[0],
            Role::PeerB => self.peers[1],
            Role::Forward => self.forward,
            Role::Back => {
                if self.peers[0] == self.forward {
                    self.peers[1]
                } else {
                    self.peers[0]
                }
            }
        }
    }

    fn resolve_all(&self, roles: &[Role]) -> BTreeSet<usize> {
        roles.iter().map(|&role| self.resolve(role)).collect()
    }
}

/// Incoming and outgoing neighbours of one node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Adjacency {
    /// Sources of edges ending at the node.
    pub inbound: BTreeSet<usize>,
    /// Destinations of edges starting at the node.
    pub outbound: BTreeSet<usize>,
}

impl Adjacency {
    pub fn of(node: usize, edges: &EdgeSet) -> Self {
        let mut adjacency = Self::default();
        for &(source, destination) in edges {
            if source == node {
                adjacency.outbound.insert(destination);
            }
            if destination == node {
                adjacency.inbound.insert(source);
            }
        }
        adjacency
    }

    pub fn degree(&self) -> usize {
        self.inbound.len() + self.outbound.len()
    }
}

/// One row of the leaf state table.
#[derive(Debug, Clone, Copy)]
pub struct LeafRule {
    pub inbound: &'static [Role],
    pub outbound: &'static [Role],
    pub state: StateIndex,
}

impl LeafRule {
    const fn new(inbound: &'static [Role], outbound: &'static [Role], state: StateIndex) -> Self {
        Self {
            inbound,
            outbound,
            state,
        }
    }

    pub const fn degree(&self) -> usize {
        self.inbound.len() + self.outbound.len()
    }

    fn matches(&self, profile: &LeafProfile, adjacency: &Adjacency) -> bool {
        profile.resolve_all(self.inbound) == adjacency.inbound
            && profile.resolve_all(self.outbound) == adjacency.outbound
    }
}

/// Leaf state table. Order matters: later matches override earlier ones.
pub const LEAF_RULES: &[LeafRule] = &[
    LeafRule::new(&[Hub], &[], 1),
    LeafRule::new(&[PeerA], &[], 2),
    LeafRule::new(&[PeerB], &[], 3),
    LeafRule::new(&[Hub], &[PeerA], 4),
    LeafRule::new(&[Hub], &[PeerB], 5),
    LeafRule::new(&[PeerA], &[PeerB], 6),
    LeafRule::new(&[PeerB], &[PeerA], 7),
    LeafRule::new(&[Hub, PeerA], &[], 8),
    LeafRule::new(&[Hub, PeerB], &[], 9),
    LeafRule::new(&[PeerA, PeerB], &[], 10),
    LeafRule::new(&[Hub], &[PeerA, PeerB], 11),
    LeafRule::new(&[PeerA, PeerB], &[Hub], 11),
    LeafRule::new(&[Hub, Back], &[Forward], 12),
    LeafRule::new(&[Hub, Forward], &[Back], 13),
    LeafRule::new(&[Hub, PeerA, PeerB], &[], 14),
];

/// Run every rule in the adjacency's degree band, in order, keeping the last
/// match. Starts from 0.
pub fn evaluate(rules: &[LeafRule], profile: &LeafProfile, adjacency: &Adjacency) -> StateIndex {
    let degree = adjacency.degree();
    rules
        .iter()
        .filter(|rule| rule.degree() == degree)
        .fold(0, |state, rule| {
            if rule.matches(profile, adjacency) {
                rule.state
            } else {
                state
            }
        })
}
