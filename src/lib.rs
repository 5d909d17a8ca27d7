//! # linkdeck
//!
//! Turns periodic network-health telemetry into states for a fixed grid of
//! indicators, and shows that grid in a terminal UI.
//!
//! Each telemetry cycle delivers a [`Snapshot`]: up to four peer links with
//! their status and traffic statistics, plus a small directed topology graph
//! over a hub and three leaves. The classification engine maps every part of
//! it to a [`StateIndex`]:
//!
//! - link status to 0, 1 or 2 ([`classify_status`])
//! - latency and packet rate to a band of a [`RangeTable`] ([`classify`])
//! - the hub's outgoing edges to a bitmask ([`classify_hub`])
//! - each leaf's adjacency pattern to one of 15 states ([`classify_leaf`])
//!
//! [`SnapshotDispatcher`] then writes those states to whatever implements
//! [`IndicatorRegistry`] and [`Renderer`].
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  source ──▶ app ──▶ deck::SnapshotDispatcher ──▶ deck::Board │
//! │    ▲         │              │                        │       │
//! │    │         ▼              ▼                        ▼       │
//! │  TCP ◀── control          data (classifiers)        ui       │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`data`]**: Snapshot model and the pure classifiers
//! - **[`deck`]**: Indicator registry, renderer surface, layout and dispatcher
//! - **[`source`]**: [`DataSource`] implementations for files, channels and streams
//! - **[`control`]**: Requests and link-drop commands sent back to the server
//! - **[`settings`]**, **[`logging`]**: Configuration and log setup
//! - **[`app`]**, **[`events`]**, **[`ui`]**: The terminal dashboard
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Watch a JSON file rewritten by the health server
//! linkdeck --file health.json
//!
//! # Connect to the health server
//! linkdeck --connect localhost:8765 --request-interval 1500
//! ```
//!
//! ### Driving the engine directly
//!
//! ```
//! use linkdeck::{Board, KeyRegistry, Snapshot, SnapshotDispatcher};
//!
//! let mut registry = KeyRegistry::new();
//! let status = registry.register(0, 0);
//!
//! let snapshot: Snapshot = serde_json::from_str(
//!     r#"{"snapshots": [{"name": "alice", "link": {"status": "connected"}}]}"#,
//! )
//! .unwrap();
//!
//! let mut board = Board::new();
//! SnapshotDispatcher::default().apply(&snapshot, &registry, &mut board);
//! assert_eq!(board.get(&status).unwrap().state, 1);
//! ```
//!
//! ### With a channel source
//!
//! ```
//! use linkdeck::{App, ChannelSource};
//! use linkdeck::settings::Settings;
//!
//! let (tx, source) = ChannelSource::create("simulator");
//! let app = App::new(Box::new(source), &Settings::default());
//! ```

pub mod app;
pub mod control;
pub mod data;
pub mod deck;
pub mod events;
pub mod logging;
pub mod settings;
pub mod source;
pub mod ui;

pub use app::App;
pub use data::{
    classify, classify_hub, classify_leaf, classify_status, CycleCounter, LinkStatus, RangeTable,
    Snapshot, StateIndex, TopologyGraph,
};
pub use deck::{
    Board, IndicatorHandle, IndicatorRegistry, KeyRegistry, Renderer, SnapshotDispatcher,
    TopologyLayout,
};
pub use source::{ChannelSource, DataSource, FileSource, StreamSource};
