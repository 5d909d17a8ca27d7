//! Fixed indicator positions for the topology nodes.

use serde::{Deserialize, Serialize};

use super::registry::Position;
use crate::data::{HUB, LEAVES};

/// Rows used by each link column.
pub const STATUS_ROW: u16 = 0;
pub const EVENTS_ROW: u16 = 1;
pub const LATENCY_ROW: u16 = 2;
pub const RATE_ROW: u16 = 3;

/// Number of indicator rows per link column.
pub const LINK_ROWS: u16 = 4;

/// Where the hub and leaf indicators sit on the grid.
///
/// The nodes form a square: hub top-left, then leaves clockwise.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopologyLayout {
    /// Beside four link columns: hub at (4,2).
    #[default]
    Standard,
    /// Topology-only deck: a 2x2 block at the origin and no link columns.
    Mini,
}

impl TopologyLayout {
    /// Top-left corner of the 2x2 block.
    fn origin(self) -> Position {
        match self {
            TopologyLayout::Standard => Position::new(4, 2),
            TopologyLayout::Mini => Position::new(0, 0),
        }
    }

    /// Grid position of topology node `node`, if it has one.
    pub fn position(self, node: usize) -> Option<Position> {
        let Position { column, row } = self.origin();
        match node {
            0 => Some(Position::new(column, row)),
            1 => Some(Position::new(column + 1, row)),
            2 => Some(Position::new(column + 1, row + 1)),
            3 => Some(Position::new(column, row + 1)),
            _ => None,
        }
    }

    pub fn hub(self) -> Position {
        self.origin()
    }

    /// Positions of all four nodes, hub first.
    pub fn positions(self) -> Vec<Position> {
        std::iter::once(HUB)
            .chain(LEAVES)
            .filter_map(|node| self.position(node))
            .collect()
    }

    /// Whether `position` belongs to the topology block.
    pub fn contains(self, position: Position) -> bool {
        let origin = self.origin();
        (origin.column..origin.column + 2).contains(&position.column)
            && (origin.row..origin.row + 2).contains(&position.row)
    }

    /// Whether link columns are shown alongside the topology block.
    pub fn has_link_columns(self) -> bool {
        matches!(self, TopologyLayout::Standard)
    }

    pub fn label(&self) -> &'static str {
        match self {
            TopologyLayout::Standard => "standard",
            TopologyLayout::Mini => "mini",
        }
    }
}

impl std::str::FromStr for TopologyLayout {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(TopologyLayout::Standard),
            "mini" => Ok(TopologyLayout::Mini),
            other => Err(format!("unknown topology layout: {}", other)),
        }
    }
}
