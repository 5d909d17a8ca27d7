//! Newline-delimited JSON snapshots from an async byte stream.
//!
//! Used for the TCP connection to the health server, but any `AsyncRead`
//! works.

use std::sync::{Arc, Mutex};

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use super::DataSource;
use crate::data::Snapshot;

type SharedError = Arc<Mutex<Option<String>>>;

fn set_error(shared: &SharedError, error: Option<String>) {
    if let Ok(mut guard) = shared.lock() {
        *guard = error;
    }
}

/// Reads one [`Snapshot`] per line on a background task.
///
/// Lines that do not parse are logged and skipped; the stream keeps going.
///
/// ```
/// use std::io::Cursor;
/// use linkdeck::StreamSource;
///
/// # tokio_test::block_on(async {
/// let stream = Cursor::new(b"{\"snapshots\": []}\n".to_vec());
/// let source = StreamSource::spawn(stream, "example");
/// # });
/// ```
#[derive(Debug)]
pub struct StreamSource {
    receiver: mpsc::Receiver<Snapshot>,
    description: String,
    shared_error: SharedError,
    /// Copy of `shared_error` taken at the last poll.
    error: Option<String>,
}

impl StreamSource {
    /// Spawn a reader task over `reader`.
    ///
    /// Must be called from within a tokio runtime.
    pub fn spawn<R>(reader: R, description: &str) -> Self
    where
        R: AsyncRead + Unpin + Send + 'static,
    {
        let (tx, rx) = mpsc::channel(16);
        let shared_error = SharedError::default();
        let error_handle = shared_error.clone();

        tokio::spawn(async move {
            let mut reader = BufReader::new(reader);
            let mut line = String::new();

            loop {
                line.clear();
                match reader.read_line(&mut line).await {
                    Ok(0) => {
                        set_error(&error_handle, Some("Connection closed".to_string()));
                        break;
                    }
                    Ok(_) => {
                        let trimmed = line.trim();
                        if trimmed.is_empty() {
                            continue;
                        }
                        match serde_json::from_str::<Snapshot>(trimmed) {
                            Ok(snapshot) => {
                                set_error(&error_handle, None);
                                if tx.send(snapshot).await.is_err() {
                                    debug!("Snapshot receiver dropped, stopping reader");
                                    break;
                                }
                            }
                            Err(e) => {
                                warn!("Discarding unparseable health message: {}", e);
                                set_error(&error_handle, Some(format!("Parse error: {}", e)));
                            }
                        }
                    }
                    Err(e) => {
                        warn!("Read error on health stream: {}", e);
                        set_error(&error_handle, Some(format!("Read error: {}", e)));
                        break;
                    }
                }
            }
        });

        Self {
            receiver: rx,
            description: format!("stream: {}", description),
            shared_error,
            error: None,
        }
    }

    fn refresh_error(&mut self) {
        if let Ok(guard) = self.shared_error.lock() {
            self.error.clone_from(&*guard);
        }
    }
}

impl DataSource for StreamSource {
    fn poll(&mut self) -> Option<Snapshot> {
        let result = match self.receiver.try_recv() {
            Ok(snapshot) => Some(snapshot),
            Err(mpsc::error::TryRecvError::Empty) => None,
            Err(mpsc::error::TryRecvError::Disconnected) => {
                if let Ok(mut guard) = self.shared_error.lock() {
                    guard.get_or_insert_with(|| "Stream disconnected".to_string());
                }
                None
            }
        };
        self.refresh_error();
        result
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}
