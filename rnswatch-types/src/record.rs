//! Raw interface statistics as reported by the network stack.

use crate::Announces;

/// Statistics for every interface, as returned by one stats query.
///
/// Only the `interfaces` list is used; any other top-level fields in the
/// source document (transport id, totals, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterfaceStats {
    pub interfaces: Vec<RawInterfaceRecord>,
}

impl InterfaceStats {
    pub fn new(interfaces: Vec<RawInterfaceRecord>) -> Self {
        Self { interfaces }
    }

    pub fn is_empty(&self) -> bool {
        self.interfaces.is_empty()
    }

    pub fn len(&self) -> usize {
        self.interfaces.len()
    }
}

/// One interface's statistics exactly as the stack reported them.
///
/// Field names follow the stats document so the struct deserializes
/// directly from `rnstatus -j` output. `rxb`, `txb`, `name`, `status` and
/// `mode` are required; a document without them fails to parse.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RawInterfaceRecord {
    /// Interface identifier, e.g. `TCPInterface[Client on 10.0.0.5:4242]`.
    pub name: String,
    /// Whether the interface is online.
    pub status: bool,
    /// Numeric mode code; see [`crate::InterfaceMode`].
    pub mode: u32,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub bitrate: Option<f64>,
    /// Bytes received.
    pub rxb: u64,
    /// Bytes transmitted.
    pub txb: u64,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub peers: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub clients: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub incoming_announce_frequency: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default, skip_serializing_if = "Option::is_none"))]
    pub outgoing_announce_frequency: Option<f64>,
}

/// Only one of the two announce frequencies was present on a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("announce frequencies must be reported as a pair")]
pub struct UnpairedAnnounceFrequency;

impl RawInterfaceRecord {
    /// Create a builder for a record with the given identifier.
    pub fn builder(name: impl Into<String>) -> RawInterfaceRecordBuilder {
        RawInterfaceRecordBuilder::new(name)
    }

    /// The incoming/outgoing announce frequency pair, if reported.
    ///
    /// The stack always reports both or neither; a lone value means the
    /// record is malformed.
    pub fn announces(&self) -> Result<Option<Announces>, UnpairedAnnounceFrequency> {
        match (
            self.incoming_announce_frequency,
            self.outgoing_announce_frequency,
        ) {
            (Some(incoming), Some(outgoing)) => Ok(Some(Announces { incoming, outgoing })),
            (None, None) => Ok(None),
            _ => Err(UnpairedAnnounceFrequency),
        }
    }
}

/// Builder for [`RawInterfaceRecord`].
#[derive(Debug)]
pub struct RawInterfaceRecordBuilder {
    record: RawInterfaceRecord,
}

impl RawInterfaceRecordBuilder {
    /// Create a builder for a down interface in `Full` mode with no traffic.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            record: RawInterfaceRecord {
                name: name.into(),
                status: false,
                mode: crate::InterfaceMode::FULL,
                bitrate: None,
                rxb: 0,
                txb: 0,
                peers: None,
                clients: None,
                incoming_announce_frequency: None,
                outgoing_announce_frequency: None,
            },
        }
    }

    /// Mark the interface as online.
    pub fn up(mut self) -> Self {
        self.record.status = true;
        self
    }

    /// Set the online flag.
    pub fn status(mut self, status: bool) -> Self {
        self.record.status = status;
        self
    }

    pub fn mode(mut self, code: u32) -> Self {
        self.record.mode = code;
        self
    }

    pub fn bitrate(mut self, bitrate: f64) -> Self {
        self.record.bitrate = Some(bitrate);
        self
    }

    /// Set the received/transmitted byte counters.
    pub fn traffic(mut self, rxb: u64, txb: u64) -> Self {
        self.record.rxb = rxb;
        self.record.txb = txb;
        self
    }

    pub fn peers(mut self, peers: u64) -> Self {
        self.record.peers = Some(peers);
        self
    }

    pub fn clients(mut self, clients: u64) -> Self {
        self.record.clients = Some(clients);
        self
    }

    /// Set both announce frequencies.
    pub fn announces(mut self, incoming: f64, outgoing: f64) -> Self {
        self.record.incoming_announce_frequency = Some(incoming);
        self.record.outgoing_announce_frequency = Some(outgoing);
        self
    }

    pub fn build(self) -> RawInterfaceRecord {
        self.record
    }
}
