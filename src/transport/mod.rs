//! Protocol clients used by connectors.
//!
//! Connectors only ever see the two traits below, so every connector can be
//! driven by the in-memory fixtures as easily as by a real device.

mod memory;
mod snmp;
mod ssh;

pub use memory::{MemoryAgent, ScriptedShell};
pub use snmp::SnmpClient;
pub use ssh::SshClient;

use async_trait::async_trait;

use crate::error::Result;
use crate::snmp::SnmpValue;

/// SNMP get / walk / set. OIDs are dotted strings without a leading dot.
#[async_trait]
pub trait SnmpTransport: Send {
    /// Single GET. `Ok(None)` when the agent has no such object/instance.
    async fn get(&mut self, oid: &str) -> Result<Option<SnmpValue>>;

    /// Every (oid, value) below `branch`, in agent order.
    async fn walk(&mut self, branch: &str) -> Result<Vec<(String, SnmpValue)>>;

    /// One SET request carrying all varbinds.
    async fn set(&mut self, varbinds: &[(String, SnmpValue)]) -> Result<()>;

    /// A transport scoped to one VLAN's bridge instance
    /// (`community@vid` on v1/v2c).
    async fn for_vlan(&self, vlan_id: u16) -> Result<Box<dyn SnmpTransport>>;
}

/// CLI command execution over SSH.
#[async_trait]
pub trait CommandTransport: Send {
    async fn run(&mut self, command: &str) -> Result<String>;
}
