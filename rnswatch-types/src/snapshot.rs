//! Status snapshot - the redacted, point-in-time view of all interfaces.

use core::fmt;

use chrono::{DateTime, Utc};

/// Up/down state of an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LinkState {
    Up,
    Down,
}

impl LinkState {
    pub fn is_up(&self) -> bool {
        matches!(self, LinkState::Up)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkState::Up => "up",
            LinkState::Down => "down",
        }
    }
}

impl From<bool> for LinkState {
    fn from(online: bool) -> Self {
        if online {
            LinkState::Up
        } else {
            LinkState::Down
        }
    }
}

impl fmt::Display for LinkState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte counters for an interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Traffic {
    pub rx: u64,
    pub tx: u64,
}

/// Announce frequencies observed on an interface.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Announces {
    pub incoming: f64,
    pub outgoing: f64,
}

/// Display form of one interface in a snapshot.
///
/// Optional fields are only present when the source record carried them;
/// they are omitted from JSON rather than serialized as `null`.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceStatus {
    /// Display identifier, already redacted.
    pub name: String,
    pub status: LinkState,
    /// Mode label, e.g. `"Point-to-Point"`.
    pub mode: String,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub bitrate: Option<f64>,
    pub traffic: Traffic,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub peers: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub clients: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub announces: Option<Announces>,
}

/// All visible interfaces at the moment of one poll.
///
/// Interfaces keep the order the stats source enumerated them in.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatusSnapshot {
    /// Capture time of the poll, serialized as RFC 3339.
    pub timestamp: DateTime<Utc>,
    pub interfaces: Vec<InterfaceStatus>,
}

impl StatusSnapshot {
    pub fn new(timestamp: DateTime<Utc>, interfaces: Vec<InterfaceStatus>) -> Self {
        Self {
            timestamp,
            interfaces,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }

    /// Find an interface by display identifier.
    pub fn get(&self, name: &str) -> Option<&InterfaceStatus> {
        self.interfaces.iter().find(|i| i.name == name)
    }

    pub fn iter(&self) -> impl Iterator<Item = &InterfaceStatus> {
        self.interfaces.iter()
    }

    /// Number of interfaces currently up.
    pub fn up_count(&self) -> usize {
        self.interfaces.iter().filter(|i| i.status.is_up()).count()
    }
}
