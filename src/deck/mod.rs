//! The indicator side of the engine.
//!
//! [`KeyRegistry`] maps grid positions to indicator handles, a [`Renderer`]
//! applies states and labels to those handles, and [`SnapshotDispatcher`]
//! ties a decoded snapshot to both.

pub mod dispatch;
pub mod layout;
pub mod registry;
pub mod renderer;

pub use dispatch::SnapshotDispatcher;
pub use layout::{TopologyLayout, EVENTS_ROW, LATENCY_ROW, LINK_ROWS, RATE_ROW, STATUS_ROW};
pub use registry::{IndicatorHandle, IndicatorRegistry, KeyRegistry, Position};
pub use renderer::{Board, Indicator, Renderer};
