//! Smaller vendor MIBs: HP Procurve, H3C/Comware, Juniper, FASTPATH
//! (Dell/Netgear) and the IEEE 802.1Q bridge MIB used by AOS-CX.

pub mod hp {
    /// hpicfPoePethPsePortPower (mW), index pse.port.
    pub const POE_PORT_POWER: &str = "1.3.6.1.4.1.11.2.14.11.1.9.1.1.1.3";
    /// Older hpEntPowerPortPower table on pre-K firmware, same index.
    pub const POE_PORT_POWER_LEGACY: &str = "1.3.6.1.4.1.11.2.14.11.1.9.2.1.1.3";
}

pub mod h3c {
    /// hh3cifVLANType, index ifIndex.
    pub const IF_VLAN_TYPE: &str = "1.3.6.1.4.1.25506.8.35.1.1.1.5";
    /// hh3cCfgOperateType, index is the operation row.
    pub const CFG_OPERATE_TYPE: &str = "1.3.6.1.4.1.25506.2.4.1.2.4.1.2";
    pub const CFG_OPERATE_ROW_STATUS: &str = "1.3.6.1.4.1.25506.2.4.1.2.4.1.9";
    /// hh3cCfgOptIndex: operation row a result row belongs to.
    pub const CFG_RESULT_OPT_INDEX: &str = "1.3.6.1.4.1.25506.2.4.1.2.5.1.2";
    /// hh3cCfgOpState, index is the result row.
    pub const CFG_RESULT_STATE: &str = "1.3.6.1.4.1.25506.2.4.1.2.5.1.5";

    pub const LINK_TRUNK: i64 = 2;
    pub const LINK_HYBRID: i64 = 3;
    pub const OPERATE_RUNNING_TO_STARTUP: i64 = 1;
    pub const OP_IN_PROGRESS: i64 = 1;
    pub const OP_SUCCESS: i64 = 2;
}

pub mod juniper {
    /// jnxL2aldVlanEntry, index is the internal VLAN index.
    pub const L2ALD_VLAN_TABLE: &str = "1.3.6.1.4.1.2636.3.48.1.3.1.1";
    pub const L2ALD_VLAN_NAME: &str = "1.3.6.1.4.1.2636.3.48.1.3.1.1.2";
    pub const L2ALD_VLAN_TAG: &str = "1.3.6.1.4.1.2636.3.48.1.3.1.1.3";
    pub const L2ALD_VLAN_TYPE: &str = "1.3.6.1.4.1.2636.3.48.1.3.1.1.4";
    pub const L2ALD_VLAN_FDB_ID: &str = "1.3.6.1.4.1.2636.3.48.1.3.1.1.5";
}

pub mod fastpath {
    /// Dell EdgeSwitch agentSaveConfig, set to 1 to save.
    pub const DELL_SAVE_CONFIG: &str = "1.3.6.1.4.1.674.10895.5000.2.6132.1.1.1.2.11.1.0";
    /// Netgear agentSaveConfig.
    pub const NETGEAR_SAVE_CONFIG: &str = "1.3.6.1.4.1.4526.10.1.1.1.2.11.1.0";
    /// Netgear agentSwitchportMode (1 general, 2 access, 3 trunk), index ifIndex.
    pub const NETGEAR_SWITCHPORT_MODE: &str = "1.3.6.1.4.1.4526.11.13.1.1.1.1.5";
    /// Same column on older FastPath firmware.
    pub const NETGEAR_SWITCHPORT_MODE_LEGACY: &str = "1.3.6.1.4.1.4526.10.13.1.1.1.1.5";

    pub const MODE_GENERAL: i64 = 1;
    pub const MODE_TRUNK: i64 = 3;
}

pub mod ieee8021 {
    /// ieee8021QBridgeVlanStaticName, index componentId.vlanId.
    pub const VLAN_STATIC_NAME: &str = "1.3.111.2.802.1.1.4.1.4.3.1.3";
    pub const VLAN_STATIC_EGRESS_PORTS: &str = "1.3.111.2.802.1.1.4.1.4.3.1.4";
    pub const VLAN_STATIC_UNTAGGED_PORTS: &str = "1.3.111.2.802.1.1.4.1.4.3.1.6";
    /// ieee8021QBridgePvid, index componentId.bridgePort.
    pub const PVID: &str = "1.3.111.2.802.1.1.4.1.4.5.1.1";
}

pub const TABLE: &[(&str, &str)] = &[
    ("hpicfPoePethPsePortPower", hp::POE_PORT_POWER),
    ("hpEntPowerPortPower", hp::POE_PORT_POWER_LEGACY),
    ("hh3cifVLANType", h3c::IF_VLAN_TYPE),
    ("hh3cCfgOperateType", h3c::CFG_OPERATE_TYPE),
    ("hh3cCfgOperateRowStatus", h3c::CFG_OPERATE_ROW_STATUS),
    ("hh3cCfgOptIndex", h3c::CFG_RESULT_OPT_INDEX),
    ("hh3cCfgOpState", h3c::CFG_RESULT_STATE),
    ("jnxL2aldVlanEntry", juniper::L2ALD_VLAN_TABLE),
    ("jnxL2aldVlanName", juniper::L2ALD_VLAN_NAME),
    ("jnxL2aldVlanTag", juniper::L2ALD_VLAN_TAG),
    ("jnxL2aldVlanType", juniper::L2ALD_VLAN_TYPE),
    ("jnxL2aldVlanFdbId", juniper::L2ALD_VLAN_FDB_ID),
    ("dellAgentSaveConfig", fastpath::DELL_SAVE_CONFIG),
    ("ngAgentSaveConfig", fastpath::NETGEAR_SAVE_CONFIG),
    ("ngAgentSwitchportMode", fastpath::NETGEAR_SWITCHPORT_MODE),
    ("ngAgentSwitchportModeLegacy", fastpath::NETGEAR_SWITCHPORT_MODE_LEGACY),
    ("ieee8021QBridgeVlanStaticName", ieee8021::VLAN_STATIC_NAME),
    ("ieee8021QBridgeVlanStaticEgressPorts", ieee8021::VLAN_STATIC_EGRESS_PORTS),
    ("ieee8021QBridgeVlanStaticUntaggedPorts", ieee8021::VLAN_STATIC_UNTAGGED_PORTS),
    ("ieee8021QBridgePvid", ieee8021::PVID),
];
