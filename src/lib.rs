//! Multi-vendor switch connectors over SNMP and SSH.
//!
//! [`dispatch::connect`] probes a device and hands back a [`Connector`]
//! whose loading phases fill a [`models::DeviceSnapshot`].

pub mod connector;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod poller;
pub mod settings;
pub mod snmp;
pub mod transport;

pub use connector::{Capabilities, Connector, ConnectorKind, Phase, WriteOp};
pub use error::{Error, ErrorKind, Result};
pub use settings::ConnectorSettings;
