//! Where telemetry snapshots come from.
//!
//! A [`DataSource`] hands the app at most one new [`Snapshot`] per poll. The
//! app never blocks on a source: file sources compare modification times,
//! channel and stream sources drain a queue filled by a background task.

mod channel;
mod file;
mod stream;

pub use channel::ChannelSource;
pub use file::FileSource;
pub use stream::StreamSource;

use std::fmt::Debug;

use crate::data::Snapshot;

/// A non-blocking producer of telemetry snapshots.
///
/// # Example
///
/// ```
/// use linkdeck::{DataSource, FileSource};
///
/// let mut source = FileSource::new("health.json");
/// if let Some(snapshot) = source.poll() {
///     println!("Got {} links", snapshot.links.len());
/// }
/// ```
pub trait DataSource: Send + Debug {
    /// Returns `Some(snapshot)` if new data arrived since the last poll.
    fn poll(&mut self) -> Option<Snapshot>;

    /// Human-readable origin, shown in the status bar.
    fn description(&self) -> &str;

    /// Error from the most recent poll, if any.
    fn error(&self) -> Option<&str>;
}
