//! Link status classification.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StateIndex;

/// Reported status of a peer link.
///
/// Unknown status strings are preserved in [`LinkStatus::Other`] so they can
/// be logged and round-tripped, but they display the same as `Linked`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum LinkStatus {
    Linked,
    Connected,
    Disconnected,
    Other(String),
}

impl LinkStatus {
    pub fn parse(status: &str) -> Self {
        match status {
            "linked" => LinkStatus::Linked,
            "connected" => LinkStatus::Connected,
            "disconnected" => LinkStatus::Disconnected,
            other => LinkStatus::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            LinkStatus::Linked => "linked",
            LinkStatus::Connected => "connected",
            LinkStatus::Disconnected => "disconnected",
            LinkStatus::Other(other) => other,
        }
    }

    pub fn is_connected(&self) -> bool {
        matches!(self, LinkStatus::Connected)
    }

    /// State index shown on the status indicator.
    pub fn state_index(&self) -> StateIndex {
        match self {
            LinkStatus::Linked => 0,
            LinkStatus::Connected => 1,
            LinkStatus::Disconnected => 2,
            LinkStatus::Other(_) => 0,
        }
    }
}

impl From<String> for LinkStatus {
    fn from(status: String) -> Self {
        Self::parse(&status)
    }
}

impl From<LinkStatus> for String {
    fn from(status: LinkStatus) -> Self {
        match status {
            LinkStatus::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Map a raw status string to its state index.
///
/// `linked` is 0, `connected` is 1, `disconnected` is 2, anything else is 0.
pub fn classify_status(status: &str) -> StateIndex {
    LinkStatus::parse(status).state_index()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_statuses() {
        assert_eq!(classify_status("linked"), 0);
        assert_eq!(classify_status("connected"), 1);
        assert_eq!(classify_status("disconnected"), 2);
    }

    #[test]
    fn test_unknown_status_defaults_to_linked() {
        assert_eq!(classify_status("bogus"), 0);
        assert_eq!(classify_status(""), 0);
        // Matching is case-sensitive.
        assert_eq!(classify_status("Connected"), 0);
    }

    #[test]
    fn test_serde_round_trip_keeps_unknown_text() {
        let status: LinkStatus = serde_json::from_str(r#""flapping""#).unwrap();
        assert_eq!(status, LinkStatus::Other("flapping".to_string()));
        assert_eq!(serde_json::to_string(&status).unwrap(), r#""flapping""#);

        let status: LinkStatus = serde_json::from_str(r#""connected""#).unwrap();
        assert!(status.is_connected());
        assert_eq!(status.to_string(), "connected");
    }
}
