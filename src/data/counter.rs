//! Telemetry cycle counter.

/// Counts applied telemetry cycles.
///
/// Owned by whoever drives the dispatcher; there is no process-wide instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CycleCounter {
    count: u64,
}

impl CycleCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one cycle and return the new count.
    pub fn increment(&mut self) -> u64 {
        self.count = self.count.saturating_add(1);
        self.count
    }

    pub fn reset(&mut self) {
        self.count = 0;
    }

    pub fn get(&self) -> u64 {
        self.count
    }
}
