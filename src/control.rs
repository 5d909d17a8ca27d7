//! Messages sent back to the health server.
//!
//! The server understands two things: a bare `request_health_data` line asking
//! for a fresh health message, and a JSON command telling it to drop one of
//! its peer links.

use serde::Serialize;
use thiserror::Error;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tokio::sync::mpsc;
use tracing::{debug, info};

/// Port names of the peer links, indexed by display column.
pub const PORT_NAMES: [&str; 4] = ["alice", "bob", "charlie", "dugen"];

const REQUEST_HEALTH_DATA: &str = "request_health_data";

/// Errors raised while sending control messages.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The message could not be encoded.
    #[error("Failed to encode control message: {0}")]
    Encode(#[from] serde_json::Error),

    /// The column has no peer link to drop.
    #[error("No link port for column {0}")]
    NoPort(u16),

    /// The writer side of the connection is gone.
    #[error("Control channel closed")]
    Closed,

    #[error("Failed to write control message: {0}")]
    Io(#[from] std::io::Error),
}

/// A command for the health server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlMessage {
    RequestHealthData,
    DropLink { column: u16 },
}

#[derive(Serialize)]
struct DropPayload<'a> {
    port: &'a str,
    action: &'a str,
}

/// Port name of the link shown in `column`, if any.
pub fn port_name(column: u16) -> Option<&'static str> {
    PORT_NAMES.get(usize::from(column)).copied()
}

impl ControlMessage {
    /// Encode as a single line (without the trailing newline).
    pub fn to_wire(&self) -> Result<String, ControlError> {
        match *self {
            ControlMessage::RequestHealthData => Ok(REQUEST_HEALTH_DATA.to_string()),
            ControlMessage::DropLink { column } => {
                let port = port_name(column).ok_or(ControlError::NoPort(column))?;
                let payload = DropPayload {
                    port,
                    action: "DROP",
                };
                Ok(serde_json::to_string(&payload)?)
            }
        }
    }
}

/// Cloneable handle for queueing control messages.
#[derive(Debug, Clone)]
pub struct ControlSender {
    tx: mpsc::UnboundedSender<ControlMessage>,
}

impl ControlSender {
    /// Create a sender and the receiving end to hand to [`write_control`].
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<ControlMessage>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    pub fn send(&self, message: ControlMessage) -> Result<(), ControlError> {
        // Reject unencodable messages here rather than in the writer task.
        if let ControlMessage::DropLink { column } = message {
            port_name(column).ok_or(ControlError::NoPort(column))?;
        }
        self.tx.send(message).map_err(|_| ControlError::Closed)
    }
}

/// Write queued control messages to `writer`, one per line.
///
/// Returns when every sender has been dropped or a write fails.
pub async fn write_control<W>(
    mut rx: mpsc::UnboundedReceiver<ControlMessage>,
    mut writer: W,
) -> Result<(), ControlError>
where
    W: AsyncWrite + Unpin,
{
    while let Some(message) = rx.recv().await {
        let line = message.to_wire()?;
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        match message {
            ControlMessage::RequestHealthData => debug!("Sent health data request"),
            ControlMessage::DropLink { .. } => info!("DROP LINK action sent, payload: {}", line),
        }
    }
    Ok(())
}
