//! Privacy redaction for interface identifiers.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

/// Token that replaces every redacted address.
pub const REDACTION_TOKEN: &str = "[hidden]";

/// Identifier prefix of the per-client interfaces a TCP server spawns.
pub const CLIENT_INTERFACE_PREFIX: &str = "TCPInterface[Client";

/// IPv4 dotted quad with an optional `:port`. ASCII digits only.
static ADDRESS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}(?::[0-9]+)?")
        .expect("address pattern is valid")
});

/// Decides which interfaces are visible and how their identifiers read.
///
/// Both switches are fixed when the filter is built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrivacyFilter {
    hide_addresses: bool,
    hide_client_interfaces: bool,
}

impl PrivacyFilter {
    pub fn new(hide_addresses: bool, hide_client_interfaces: bool) -> Self {
        Self {
            hide_addresses,
            hide_client_interfaces,
        }
    }

    /// A filter that neither drops nor redacts anything.
    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn hides_addresses(&self) -> bool {
        self.hide_addresses
    }

    pub fn hides_client_interfaces(&self) -> bool {
        self.hide_client_interfaces
    }

    /// Whether an interface must be left out of snapshots and history.
    ///
    /// Takes the raw identifier, before any redaction.
    pub fn should_drop(&self, name: &str) -> bool {
        self.hide_client_interfaces && name.starts_with(CLIENT_INTERFACE_PREFIX)
    }

    /// Replace every IPv4 address (and port, if present) with [`REDACTION_TOKEN`].
    ///
    /// Idempotent: the token contains no digits, so redacting twice is a no-op.
    pub fn redact<'a>(&self, name: &'a str) -> Cow<'a, str> {
        if self.hide_addresses {
            ADDRESS_PATTERN.replace_all(name, REDACTION_TOKEN)
        } else {
            Cow::Borrowed(name)
        }
    }
}
