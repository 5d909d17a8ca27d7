//! Position → indicator handle lookup.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Logical grid coordinate of an indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub column: u16,
    pub row: u16,
}

impl Position {
    pub const fn new(column: u16, row: u16) -> Self {
        Self { column, row }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.column, self.row)
    }
}

/// Resolves grid positions to indicator handles.
///
/// Implemented by whatever owns the physical or virtual indicators. A position
/// that has not been registered resolves to `None`, and callers skip it.
pub trait IndicatorRegistry {
    type Handle;

    fn resolve(&self, column: u16, row: u16) -> Option<Self::Handle>;
}

/// Opaque identifier of a registered indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IndicatorHandle(u32);

impl fmt::Display for IndicatorHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "key-{}", self.0)
    }
}

/// Hash-map backed [`IndicatorRegistry`].
#[derive(Debug, Clone, Default)]
pub struct KeyRegistry {
    keys: HashMap<Position, IndicatorHandle>,
    next_id: u32,
}

impl KeyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an indicator at `(column, row)` and return its handle.
    ///
    /// Registering an occupied position returns the existing handle.
    pub fn register(&mut self, column: u16, row: u16) -> IndicatorHandle {
        let position = Position::new(column, row);
        if let Some(handle) = self.keys.get(&position) {
            return *handle;
        }

        let handle = IndicatorHandle(self.next_id);
        self.next_id += 1;
        self.keys.insert(position, handle);
        debug!("Set context for key {}: {}", position, handle);
        handle
    }

    /// Remove the indicator at `(column, row)`, returning its handle if any.
    pub fn unregister(&mut self, column: u16, row: u16) -> Option<IndicatorHandle> {
        let position = Position::new(column, row);
        let removed = self.keys.remove(&position);
        if let Some(handle) = removed {
            debug!("Cleared context for key {}: {}", position, handle);
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Registered positions in column-major order.
    pub fn positions(&self) -> Vec<Position> {
        let mut positions: Vec<Position> = self.keys.keys().copied().collect();
        positions.sort();
        positions
    }
}

impl IndicatorRegistry for KeyRegistry {
    type Handle = IndicatorHandle;

    fn resolve(&self, column: u16, row: u16) -> Option<IndicatorHandle> {
        self.keys.get(&Position::new(column, row)).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_resolve() {
        let mut registry = KeyRegistry::new();
        let a = registry.register(0, 0);
        let b = registry.register(0, 1);
        assert_ne!(a, b);
        assert_eq!(registry.resolve(0, 0), Some(a));
        assert_eq!(registry.resolve(0, 1), Some(b));
        assert_eq!(registry.resolve(1, 0), None);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = KeyRegistry::new();
        let first = registry.register(4, 2);
        let second = registry.register(4, 2);
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_unregister() {
        let mut registry = KeyRegistry::new();
        let handle = registry.register(2, 3);
        assert_eq!(registry.unregister(2, 3), Some(handle));
        assert_eq!(registry.unregister(2, 3), None);
        assert_eq!(registry.resolve(2, 3), None);
        assert!(registry.is_empty());

        // A fresh registration gets a fresh handle.
        assert_ne!(registry.register(2, 3), handle);
    }

    #[test]
    fn test_positions_sorted() {
        let mut registry = KeyRegistry::new();
        registry.register(1, 0);
        registry.register(0, 3);
        registry.register(0, 1);
        assert_eq!(
            registry.positions(),
            vec![Position::new(0, 1), Position::new(0, 3), Position::new(1, 0)]
        );
    }
}
