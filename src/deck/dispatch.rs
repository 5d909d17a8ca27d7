//! Per-cycle orchestration: snapshot in, indicator writes out.

use tracing::debug;

use super::layout::{TopologyLayout, EVENTS_ROW, LATENCY_ROW, RATE_ROW, STATUS_ROW};
use super::registry::{IndicatorRegistry, Position};
use super::renderer::Renderer;
use crate::data::{
    classify, group_thousands, LinkEntry, RangeTable, Snapshot, StateIndex, TopologyGraph, LEAVES,
};

/// Drives one telemetry cycle onto the indicators.
///
/// For each link column it writes the status, event count, latency and packet
/// rate indicators; then, once per snapshot, the topology indicators. Link
/// indicators that fall inside the topology block are left to the topology.
/// Positions the registry does not know are skipped. Each indicator receives
/// at most one state write and one label write per call, and every write
/// depends only on the snapshot, so applying the same snapshot again leaves
/// the indicators unchanged.
#[derive(Debug, Clone)]
pub struct SnapshotDispatcher {
    latency_table: RangeTable,
    pps_table: RangeTable,
    layout: TopologyLayout,
}

impl Default for SnapshotDispatcher {
    fn default() -> Self {
        Self::new(
            RangeTable::default_latency(),
            RangeTable::default_pps(),
            TopologyLayout::default(),
        )
    }
}

impl SnapshotDispatcher {
    pub fn new(latency_table: RangeTable, pps_table: RangeTable, layout: TopologyLayout) -> Self {
        Self {
            latency_table,
            pps_table,
            layout,
        }
    }

    pub fn layout(&self) -> TopologyLayout {
        self.layout
    }

    pub fn latency_table(&self) -> &RangeTable {
        &self.latency_table
    }

    pub fn pps_table(&self) -> &RangeTable {
        &self.pps_table
    }

    /// Apply `snapshot` to every registered indicator it addresses.
    pub fn apply<Reg, Ren>(&self, snapshot: &Snapshot, registry: &Reg, renderer: &mut Ren)
    where
        Reg: IndicatorRegistry,
        Ren: Renderer<Reg::Handle>,
    {
        // Positions inside the topology block belong to the topology when it is present.
        let topology_owns_block = snapshot.topology.is_some();
        for (column, entry) in snapshot.links.iter().enumerate() {
            // Columns beyond the grid cannot be addressed.
            let Ok(column) = u16::try_from(column) else {
                break;
            };
            self.apply_link(column, entry, topology_owns_block, registry, renderer);
        }

        if let Some(ref topology) = snapshot.topology {
            self.apply_topology(topology, registry, renderer);
        }
    }

    fn apply_link<Reg, Ren>(
        &self,
        column: u16,
        entry: &LinkEntry,
        topology_owns_block: bool,
        registry: &Reg,
        renderer: &mut Ren,
    ) where
        Reg: IndicatorRegistry,
        Ren: Renderer<Reg::Handle>,
    {
        let status = entry.link.status.state_index();
        debug!(
            "link {} (column {}): status={}, state={}",
            entry.name, column, entry.link.status, status
        );
        let mut write = |row: u16, state: Option<StateIndex>, label: &str| {
            let position = Position::new(column, row);
            if !(topology_owns_block && self.layout.contains(position)) {
                write_at(registry, renderer, position, state, label);
            }
        };

        write(STATUS_ROW, Some(status), "");

        match entry.metrics() {
            Some(stats) => {
                write(EVENTS_ROW, None, &stats.events.to_string());

                let latency = classify(stats.round_trip_latency_ms, &self.latency_table);
                write(LATENCY_ROW, Some(latency), "");

                let rate = classify(stats.packets_per_second, &self.pps_table);
                write(RATE_ROW, Some(rate), &group_thousands(stats.packets_per_second));
            }
            None => {
                for row in [EVENTS_ROW, LATENCY_ROW, RATE_ROW] {
                    write(row, Some(0), "");
                }
            }
        }
    }

    fn apply_topology<Reg, Ren>(
        &self,
        topology: &TopologyGraph,
        registry: &Reg,
        renderer: &mut Ren,
    ) where
        Reg: IndicatorRegistry,
        Ren: Renderer<Reg::Handle>,
    {
        debug!(
            "Processing tree data: nodes = {:?}, edges = {:?}",
            topology.nodes, topology.edges
        );

        let hub = self.layout.hub();
        let hub_state = topology.hub_state();
        write_at(registry, renderer, hub, Some(hub_state), &topology.hub_label());

        for node in LEAVES.into_iter().filter(|&node| topology.has_node(node)) {
            let Some(position) = self.layout.position(node) else {
                continue;
            };
            let state = topology.leaf_state(node);
            if write_at(registry, renderer, position, Some(state), &topology.label(node)) {
                debug!(
                    "Updated node {} (index {}) to state {}",
                    topology.nodes[node], node, state
                );
            }
        }
    }
}

/// Write to the indicator at `position`; `state: None` leaves the state as is.
///
/// Returns false when the position is not registered.
fn write_at<Reg, Ren>(
    registry: &Reg,
    renderer: &mut Ren,
    position: Position,
    state: Option<StateIndex>,
    label: &str,
) -> bool
where
    Reg: IndicatorRegistry,
    Ren: Renderer<Reg::Handle>,
{
    let Some(handle) = registry.resolve(position.column, position.row) else {
        return false;
    };
    if let Some(state) = state {
        renderer.set_state(&handle, state);
    }
    renderer.set_label(&handle, label);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{Link, LinkStatus, Statistics, OUT_OF_RANGE};
    use crate::deck::{Board, Indicator, KeyRegistry, LINK_ROWS};
    use std::collections::HashMap;

    fn full_registry(columns: u16, layout: TopologyLayout) -> KeyRegistry {
        let mut registry = KeyRegistry::new();
        for column in 0..columns {
            for row in 0..LINK_ROWS {
                registry.register(column, row);
            }
        }
        for position in layout.positions() {
            registry.register(position.column, position.row);
        }
        registry
    }

    fn at<'a>(registry: &KeyRegistry, board: &'a Board, column: u16, row: u16) -> &'a Indicator {
        let handle = registry.resolve(column, row).unwrap();
        board.get(&handle).unwrap()
    }

    fn connected(events: u64, latency: f64, pps: f64) -> Link {
        Link::connected(Statistics {
            events,
            round_trip_latency_ms: latency,
            packets_per_second: pps,
        })
    }

    /// Records every call so write counts can be checked.
    #[derive(Default)]
    struct Recorder {
        states: HashMap<u32, Vec<StateIndex>>,
        labels: HashMap<u32, Vec<String>>,
    }

    struct MapRegistry(HashMap<(u16, u16), u32>);

    impl IndicatorRegistry for MapRegistry {
        type Handle = u32;

        fn resolve(&self, column: u16, row: u16) -> Option<u32> {
            self.0.get(&(column, row)).copied()
        }
    }

    impl Renderer<u32> for Recorder {
        fn set_state(&mut self, handle: &u32, state: StateIndex) {
            self.states.entry(*handle).or_default().push(state);
        }

        fn set_label(&mut self, handle: &u32, text: &str) {
            self.labels.entry(*handle).or_default().push(text.to_string());
        }
    }

    #[test]
    fn test_connected_link_end_to_end() {
        let registry = full_registry(1, TopologyLayout::Standard);
        let mut board = Board::new();
        let snapshot = Snapshot::new(vec![LinkEntry::new("alice", connected(42, 2.0, 16500.0))]);

        SnapshotDispatcher::default().apply(&snapshot, &registry, &mut board);

        assert_eq!(at(&registry, &board, 0, 0).state, 1);
        assert_eq!(at(&registry, &board, 0, 0).label, "");
        assert_eq!(at(&registry, &board, 0, 1).label, "42");
        assert_eq!(at(&registry, &board, 0, 1).state, 0);
        assert_eq!(at(&registry, &board, 0, 2).state, 2);
        assert_eq!(at(&registry, &board, 0, 2).label, "");
        assert_eq!(at(&registry, &board, 0, 3).state, 3);
        assert_eq!(at(&registry, &board, 0, 3).label, "16,500");
    }

    #[test]
    fn test_out_of_range_metrics() {
        let registry = full_registry(1, TopologyLayout::Standard);
        let mut board = Board::new();
        let snapshot = Snapshot::new(vec![LinkEntry::new("a", connected(0, 250.0, 28500.0))]);

        SnapshotDispatcher::default().apply(&snapshot, &registry, &mut board);

        assert_eq!(at(&registry, &board, 0, 2).state, OUT_OF_RANGE);
        assert_eq!(at(&registry, &board, 0, 3).state, OUT_OF_RANGE);
        assert_eq!(at(&registry, &board, 0, 3).label, "28,500");
    }

    #[test]
    fn test_disconnect_resets_metric_indicators() {
        let registry = full_registry(2, TopologyLayout::Standard);
        let mut board = Board::new();
        let dispatcher = SnapshotDispatcher::default();

        let up = Snapshot::new(vec![
            LinkEntry::new("alice", connected(7, 5.0, 18000.0)),
            LinkEntry::new("bob", connected(9, 1.0, 100.0)),
        ]);
        dispatcher.apply(&up, &registry, &mut board);
        assert_eq!(at(&registry, &board, 1, 1).label, "9");

        let down = Snapshot::new(vec![
            LinkEntry::new("alice", connected(7, 5.0, 18000.0)),
            LinkEntry::new("bob", Link::new(LinkStatus::Disconnected)),
        ]);
        dispatcher.apply(&down, &registry, &mut board);

        assert_eq!(at(&registry, &board, 1, 0).state, 2);
        for row in 1..LINK_ROWS {
            assert_eq!(at(&registry, &board, 1, row), &Indicator::default());
        }
        assert_eq!(at(&registry, &board, 0, 1).label, "7");
    }

    #[test]
    fn test_connected_without_statistics_is_treated_as_no_metrics() {
        let registry = full_registry(1, TopologyLayout::Standard);
        let mut board = Board::new();
        let snapshot = Snapshot::new(vec![LinkEntry::new("a", Link::new(LinkStatus::Connected))]);

        SnapshotDispatcher::default().apply(&snapshot, &registry, &mut board);

        assert_eq!(at(&registry, &board, 0, 0).state, 1);
        assert_eq!(at(&registry, &board, 0, 2).state, 0);
        assert_eq!(at(&registry, &board, 0, 3).label, "");
    }

    #[test]
    fn test_unregistered_positions_are_skipped() {
        let mut registry = KeyRegistry::new();
        let status = registry.register(0, 0);
        let mut board = Board::new();
        let snapshot = Snapshot::new(vec![
            LinkEntry::new("alice", connected(1, 1.0, 1.0)),
            LinkEntry::new("bob", Link::new(LinkStatus::Linked)),
        ])
        .with_topology(TopologyGraph::new(["h", "a"], [(0, 1)]));

        SnapshotDispatcher::default().apply(&snapshot, &registry, &mut board);

        assert_eq!(board.len(), 1);
        assert_eq!(board.get(&status).unwrap().state, 1);
    }

    #[test]
    fn test_topology_indicators() {
        let registry = full_registry(4, TopologyLayout::Standard);
        let mut board = Board::new();
        let topology = TopologyGraph::new(
            ["hub", "alice", "bob", "charlie"],
            [(0, 1), (0, 2), (1, 2), (3, 1)],
        );
        let snapshot = Snapshot::default().with_topology(topology);

        SnapshotDispatcher::default().apply(&snapshot, &registry, &mut board);

        let hub = at(&registry, &board, 4, 2);
        assert_eq!((hub.state, hub.label.as_str()), (5, "H"));
        let leaf1 = at(&registry, &board, 5, 2);
        assert_eq!((leaf1.state, leaf1.label.as_str()), (12, "A"));
        let leaf2 = at(&registry, &board, 5, 3);
        assert_eq!((leaf2.state, leaf2.label.as_str()), (8, "B"));
        let leaf3 = at(&registry, &board, 4, 3);
        assert_eq!((leaf3.state, leaf3.label.as_str()), (0, "C"));
    }

    #[test]
    fn test_missing_leaves_are_not_rendered() {
        let registry = full_registry(0, TopologyLayout::Mini);
        let mut board = Board::new();
        let snapshot =
            Snapshot::default().with_topology(TopologyGraph::new(["hub", "alice"], [(0, 1)]));
        let dispatcher = SnapshotDispatcher::new(
            RangeTable::default_latency(),
            RangeTable::default_pps(),
            TopologyLayout::Mini,
        );

        dispatcher.apply(&snapshot, &registry, &mut board);

        assert_eq!(at(&registry, &board, 0, 0).state, 1);
        assert_eq!(at(&registry, &board, 1, 0).state, 1);
        assert_eq!(board.len(), 2);
    }

    #[test]
    fn test_mini_layout_topology_wins_over_links() {
        let mut map = HashMap::new();
        let cells = [(0, 0), (1, 0), (1, 1), (0, 1), (0, 2)];
        for (id, cell) in cells.into_iter().enumerate() {
            map.insert(cell, id as u32);
        }
        let registry = MapRegistry(map);
        let snapshot = Snapshot::new(vec![
            LinkEntry::new("alice", connected(5, 1.0, 1.0)),
            LinkEntry::new("bob", Link::new(LinkStatus::Disconnected)),
        ])
        .with_topology(TopologyGraph::new(["hub", "a", "b", "c"], [(0, 3)]));
        let dispatcher = SnapshotDispatcher::new(
            RangeTable::default_latency(),
            RangeTable::default_pps(),
            TopologyLayout::Mini,
        );

        let mut recorder = Recorder::default();
        dispatcher.apply(&snapshot, &registry, &mut recorder);

        assert!(recorder.states.values().all(|writes| writes.len() == 1));
        assert_eq!(recorder.states[&0], vec![2]);
        assert_eq!(recorder.labels[&0], vec!["H".to_string()]);
        // Column 0's latency row lies outside the block and is still written.
        assert_eq!(recorder.states[&4], vec![1]);
    }

    #[test]
    fn test_mini_layout_links_written_without_topology() {
        let mut registry = KeyRegistry::new();
        registry.register(0, 0);
        registry.register(0, 1);
        let mut board = Board::new();
        let snapshot = Snapshot::new(vec![LinkEntry::new("alice", connected(42, 2.0, 16500.0))]);
        let dispatcher = SnapshotDispatcher::new(
            RangeTable::default_latency(),
            RangeTable::default_pps(),
            TopologyLayout::Mini,
        );

        dispatcher.apply(&snapshot, &registry, &mut board);

        assert_eq!(at(&registry, &board, 0, 0).state, 1);
        assert_eq!(at(&registry, &board, 0, 1).label, "42");
    }

    #[test]
    fn test_extra_links_reach_topology_block_without_topology() {
        let mut registry = KeyRegistry::new();
        registry.register(4, 2);
        let mut board = Board::new();
        let links = (0..6)
            .map(|i| LinkEntry::new(format!("peer{}", i), connected(42, 2.0, 16500.0)))
            .collect();

        SnapshotDispatcher::default().apply(&Snapshot::new(links), &registry, &mut board);

        let latency = at(&registry, &board, 4, 2);
        assert_eq!((latency.state, latency.label.as_str()), (2, ""));
    }

    #[test]
    fn test_empty_topology_renders_hub_only() {
        let registry = full_registry(0, TopologyLayout::Standard);
        let mut board = Board::new();
        let snapshot = Snapshot::default().with_topology(TopologyGraph::default());

        SnapshotDispatcher::default().apply(&snapshot, &registry, &mut board);

        assert_eq!(at(&registry, &board, 4, 2), &Indicator::default());
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_apply_is_idempotent() {
        let registry = full_registry(4, TopologyLayout::Standard);
        let snapshot = Snapshot::new(vec![
            LinkEntry::new("alice", connected(42, 2.0, 16500.0)),
            LinkEntry::new("bob", Link::new(LinkStatus::Disconnected)),
            LinkEntry::new("charlie", Link::new(LinkStatus::Other("weird".into()))),
        ])
        .with_topology(TopologyGraph::new(["h", "a", "b", "c"], [(0, 1), (1, 2), (3, 1)]));
        let dispatcher = SnapshotDispatcher::default();

        let mut once = Board::new();
        dispatcher.apply(&snapshot, &registry, &mut once);

        let mut twice = Board::new();
        dispatcher.apply(&snapshot, &registry, &mut twice);
        dispatcher.apply(&snapshot, &registry, &mut twice);

        for position in registry.positions() {
            let handle = registry.resolve(position.column, position.row).unwrap();
            assert_eq!(once.get(&handle), twice.get(&handle), "mismatch at {}", position);
        }
    }

    #[test]
    fn test_at_most_one_write_per_indicator() {
        let mut map = HashMap::new();
        let mut next = 0;
        for column in 0..6 {
            for row in 0..4 {
                map.insert((column, row), next);
                next += 1;
            }
        }
        let registry = MapRegistry(map);
        let snapshot = Snapshot::new(vec![
            LinkEntry::new("alice", connected(1, 1.0, 1.0)),
            LinkEntry::new("bob", Link::new(LinkStatus::Linked)),
        ])
        .with_topology(TopologyGraph::new(["h", "a", "b", "c"], [(0, 1)]));

        let mut recorder = Recorder::default();
        SnapshotDispatcher::default().apply(&snapshot, &registry, &mut recorder);

        assert!(recorder.states.values().all(|writes| writes.len() == 1));
        assert!(recorder.labels.values().all(|writes| writes.len() == 1));
        // The events indicator of a connected link keeps its state.
        let events = registry.resolve(0, 1).unwrap();
        assert!(!recorder.states.contains_key(&events));
        assert_eq!(recorder.labels[&events], vec!["1".to_string()]);
    }
}
