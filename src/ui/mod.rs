//! Terminal UI rendering using ratatui.
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ Header (common::render_header)       │
//! ├──────────────────────────────────────┤
//! │                                      │
//! │ Indicator grid (grid::render)        │
//! │                                      │
//! ├──────────────────────────────────────┤
//! │ Status Bar (common::render_status)   │
//! └──────────────────────────────────────┘
//! ```
//!
//! The help overlay (`common::render_help`) is drawn on top when active.

pub mod common;
pub mod grid;
pub mod theme;

pub use theme::{Theme, Tone};
