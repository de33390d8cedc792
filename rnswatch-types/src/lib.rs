//! # rnswatch-types
//!
//! Core types for monitoring the interfaces of a Reticulum network stack.
//! This crate defines both sides of a polling cycle: the raw per-interface
//! records a stats source reports, and the redacted status snapshot that is
//! handed to API consumers.
//!
//! ## Features
//!
//! - `serde`: JSON (de)serialization of every type. Raw records accept the
//!   document `rnstatus -j` prints; snapshots serialize to the
//!   `/api/status` schema.
//!
//! ## Example
//!
//! ```rust
//! use rnswatch_types::{InterfaceMode, RawInterfaceRecord};
//!
//! let record = RawInterfaceRecord::builder("RNode LoRa Interface")
//!     .up()
//!     .mode(InterfaceMode::ROAMING)
//!     .traffic(1_024, 512)
//!     .peers(4)
//!     .build();
//!
//! assert!(record.status);
//! assert_eq!(InterfaceMode::from_code(record.mode).label(), "Roaming");
//! ```

mod history;
mod mode;
mod record;
mod snapshot;

pub use history::*;
pub use mode::*;
pub use record::*;
pub use snapshot::*;
