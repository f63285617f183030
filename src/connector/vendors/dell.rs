use async_trait::async_trait;

use super::generic;
use super::VendorDialect;
use crate::connector::{Capabilities, ConnectorKind, WalkContext};
use crate::error::{Error, Result};
use crate::snmp::mibs::vendors::fastpath;
use crate::snmp::SnmpValue;
use crate::transport::SnmpTransport;

/// Dell EdgeSwitch / PowerConnect (FASTPATH based).
pub struct Dell;

#[async_trait]
impl VendorDialect for Dell {
    fn kind(&self) -> ConnectorKind {
        ConnectorKind::Dell
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::writable(true)
    }

    /// PoE port numbers are ifIndexes.
    fn map_poe_port_entries_to_interface(&self, ctx: &mut WalkContext) {
        generic::map_poe_ports(ctx, |_, _pse, port| Some(port));
    }

    async fn save_running_config(&self, t: &mut dyn SnmpTransport) -> Result<()> {
        t.set(&[(fastpath::DELL_SAVE_CONFIG.to_string(), SnmpValue::Integer(1))])
            .await
            .map_err(|err| Error::save("Saving the running config failed").with_details(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{DeviceSnapshot, Interface};
    use crate::transport::MemoryAgent;
    use tokio_test::assert_ok;

    #[test]
    fn test_poe_by_if_index() {
        let mut device = DeviceSnapshot::default();
        device.insert_interface(Interface::with_index(12));
        device.bridge_ports.insert(12, 40);
        let mut ctx = WalkContext::new("dell", device);
        ctx.poe_port(1, 12).power_consumed = 2500;
        Dell.map_poe_port_entries_to_interface(&mut ctx);
        assert_eq!(
            ctx.device.interface("12").unwrap().poe_entry.as_ref().unwrap().power_consumed,
            2500
        );
        assert!(ctx.events.is_empty());
    }

    #[tokio::test]
    async fn test_save() {
        let mut agent = MemoryAgent::new();
        assert_ok!(Dell.save_running_config(&mut agent).await);
        assert_eq!(agent.value(fastpath::DELL_SAVE_CONFIG), Some(SnmpValue::Integer(1)));
    }
}
