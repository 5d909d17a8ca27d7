//! Telemetry data model and the pure classifiers that turn it into
//! indicator states.
//!
//! Nothing in this module has side effects. Every classifier is a plain
//! function of its inputs, so the same snapshot always yields the same states.
//!
//! ## Submodules
//!
//! - [`snapshot`]: Decoded telemetry ([`Snapshot`], [`LinkEntry`], [`TopologyGraph`])
//! - [`buckets`]: Inclusive range tables for latency and packet rate
//! - [`status`]: Link status to state mapping
//! - [`topology`]: Hub bitmask and leaf adjacency states for the clique
//! - [`format`]: Label formatting helpers
//! - [`counter`]: Owned telemetry cycle counter
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot (decoded JSON)
//!        │
//!        ├──▶ LinkEntry ──▶ classify_status / buckets::classify ──▶ StateIndex
//!        │
//!        └──▶ TopologyGraph ──▶ classify_hub / classify_leaf ──▶ StateIndex
//! ```

pub mod buckets;
pub mod counter;
pub mod format;
pub mod snapshot;
pub mod status;
pub mod topology;

/// Ordinal identifying one visual presentation of an indicator.
///
/// Negative only for [`buckets::OUT_OF_RANGE`].
pub type StateIndex = i32;

pub use buckets::{classify, BucketRange, RangeTable, OUT_OF_RANGE};
pub use counter::CycleCounter;
pub use format::group_thousands;
pub use snapshot::{Link, LinkEntry, Snapshot, Statistics, TopologyGraph};
pub use status::{classify_status, LinkStatus};
pub use topology::{classify_hub, classify_leaf, Edge, EdgeSet, HUB, LEAVES};
