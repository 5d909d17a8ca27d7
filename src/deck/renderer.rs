//! Indicator rendering surface.

use std::collections::HashMap;

use serde::Serialize;
use tracing::trace;

use super::registry::IndicatorHandle;
use crate::data::StateIndex;

/// Applies display updates to indicators.
///
/// Implementations are expected to be synchronous and non-blocking.
pub trait Renderer<H> {
    fn set_state(&mut self, handle: &H, state: StateIndex);

    fn set_label(&mut self, handle: &H, text: &str);
}

/// What one indicator currently shows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Indicator {
    pub state: StateIndex,
    pub label: String,
}

/// In-memory [`Renderer`] holding the visible state of every indicator.
///
/// The terminal UI draws from a `Board`; it is also the surface used by
/// `--export`.
#[derive(Debug, Clone, Default)]
pub struct Board {
    indicators: HashMap<IndicatorHandle, Indicator>,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a freshly registered indicator into its default appearance.
    pub fn reset(&mut self, handle: IndicatorHandle, label: &str) {
        self.indicators.insert(
            handle,
            Indicator {
                state: 0,
                label: label.to_string(),
            },
        );
    }

    pub fn remove(&mut self, handle: &IndicatorHandle) -> Option<Indicator> {
        self.indicators.remove(handle)
    }

    pub fn get(&self, handle: &IndicatorHandle) -> Option<&Indicator> {
        self.indicators.get(handle)
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}

impl Renderer<IndicatorHandle> for Board {
    fn set_state(&mut self, handle: &IndicatorHandle, state: StateIndex) {
        trace!("Updated key state, context: {}, state: {}", handle, state);
        self.indicators.entry(*handle).or_default().state = state;
    }

    fn set_label(&mut self, handle: &IndicatorHandle, text: &str) {
        let indicator = self.indicators.entry(*handle).or_default();
        indicator.label.clear();
        indicator.label.push_str(text);
    }
}
