//! Interface mode classification.

use core::fmt;

/// Operating role of a Reticulum interface.
///
/// Reticulum reports the mode as a single numeric code. Only a closed set of
/// codes carry a specific role; everything else is shown as [`InterfaceMode::Full`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum InterfaceMode {
    /// Default mode, also used for any code outside the known set.
    #[default]
    Full,
    PointToPoint,
    AccessPoint,
    Roaming,
    Boundary,
    Gateway,
}

impl InterfaceMode {
    pub const FULL: u32 = 0x01;
    pub const POINT_TO_POINT: u32 = 0x04;
    pub const ACCESS_POINT: u32 = 0x08;
    pub const ROAMING: u32 = 0x10;
    pub const BOUNDARY: u32 = 0x20;
    pub const GATEWAY: u32 = 0x40;

    /// Classify a raw mode code. Total: unknown codes map to `Full`.
    pub const fn from_code(code: u32) -> Self {
        match code {
            Self::POINT_TO_POINT => InterfaceMode::PointToPoint,
            Self::ACCESS_POINT => InterfaceMode::AccessPoint,
            Self::ROAMING => InterfaceMode::Roaming,
            Self::BOUNDARY => InterfaceMode::Boundary,
            Self::GATEWAY => InterfaceMode::Gateway,
            _ => InterfaceMode::Full,
        }
    }

    /// The wire code for this mode.
    pub const fn code(&self) -> u32 {
        match self {
            InterfaceMode::Full => Self::FULL,
            InterfaceMode::PointToPoint => Self::POINT_TO_POINT,
            InterfaceMode::AccessPoint => Self::ACCESS_POINT,
            InterfaceMode::Roaming => Self::ROAMING,
            InterfaceMode::Boundary => Self::BOUNDARY,
            InterfaceMode::Gateway => Self::GATEWAY,
        }
    }

    /// Human-readable label used in status snapshots.
    pub const fn label(&self) -> &'static str {
        match self {
            InterfaceMode::Full => "Full",
            InterfaceMode::PointToPoint => "Point-to-Point",
            InterfaceMode::AccessPoint => "Access Point",
            InterfaceMode::Roaming => "Roaming",
            InterfaceMode::Boundary => "Boundary",
            InterfaceMode::Gateway => "Gateway",
        }
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a raw mode code straight to its display label.
pub const fn classify(code: u32) -> &'static str {
    InterfaceMode::from_code(code).label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_codes_classify_to_their_labels() {
        assert_eq!(classify(InterfaceMode::ACCESS_POINT), "Access Point");
        assert_eq!(classify(InterfaceMode::POINT_TO_POINT), "Point-to-Point");
        assert_eq!(classify(InterfaceMode::ROAMING), "Roaming");
        assert_eq!(classify(InterfaceMode::BOUNDARY), "Boundary");
        assert_eq!(classify(InterfaceMode::GATEWAY), "Gateway");
    }

    #[test]
    fn unknown_codes_fall_back_to_full() {
        assert_eq!(classify(255), "Full");
        assert_eq!(classify(0), "Full");
        assert_eq!(classify(InterfaceMode::FULL), "Full");
    }

    #[test]
    fn code_survives_classification() {
        for mode in [
            InterfaceMode::Full,
            InterfaceMode::PointToPoint,
            InterfaceMode::AccessPoint,
            InterfaceMode::Roaming,
            InterfaceMode::Boundary,
            InterfaceMode::Gateway,
        ] {
            assert_eq!(InterfaceMode::from_code(mode.code()), mode);
        }
    }

    #[test]
    fn display_uses_label() {
        assert_eq!(InterfaceMode::PointToPoint.to_string(), "Point-to-Point");
        assert_eq!(InterfaceMode::default(), InterfaceMode::Full);
    }
}
