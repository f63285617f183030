//! CISCO-VTP-MIB, CISCO-VLAN-MEMBERSHIP-MIB, CISCO-POWER-ETHERNET-EXT-MIB
//! and CISCO-CONFIG-COPY-MIB.

// vtpVlanTable, index managementDomain.vlanId
pub const VTP_VLAN_STATE: &str = "1.3.6.1.4.1.9.9.46.1.3.1.1.2";
pub const VTP_VLAN_TYPE: &str = "1.3.6.1.4.1.9.9.46.1.3.1.1.3";
pub const VTP_VLAN_NAME: &str = "1.3.6.1.4.1.9.9.46.1.3.1.1.4";

// vlanTrunkPortTable, index ifIndex
pub const VLAN_TRUNK_PORT_VLANS_ENABLED: &str = "1.3.6.1.4.1.9.9.46.1.6.1.1.4";
pub const VLAN_TRUNK_PORT_NATIVE_VLAN: &str = "1.3.6.1.4.1.9.9.46.1.6.1.1.5";
pub const VLAN_TRUNK_PORT_DYNAMIC_STATE: &str = "1.3.6.1.4.1.9.9.46.1.6.1.1.13";
pub const VLAN_TRUNK_PORT_DYNAMIC_STATUS: &str = "1.3.6.1.4.1.9.9.46.1.6.1.1.14";
pub const VLAN_TRUNK_PORT_VLANS_ENABLED_2K: &str = "1.3.6.1.4.1.9.9.46.1.6.1.1.17";
pub const VLAN_TRUNK_PORT_VLANS_ENABLED_3K: &str = "1.3.6.1.4.1.9.9.46.1.6.1.1.18";
pub const VLAN_TRUNK_PORT_VLANS_ENABLED_4K: &str = "1.3.6.1.4.1.9.9.46.1.6.1.1.19";

/// vmVlan, access VLAN per ifIndex.
pub const VM_VLAN: &str = "1.3.6.1.4.1.9.9.68.1.2.2.1.2";

// cpeExtPsePortTable, index pse.port
pub const CPE_EXT_PSE_PORT_PWR_ALLOCATED: &str = "1.3.6.1.4.1.9.9.402.1.2.1.7";
pub const CPE_EXT_PSE_PORT_PWR_AVAILABLE: &str = "1.3.6.1.4.1.9.9.402.1.2.1.8";
pub const CPE_EXT_PSE_PORT_PWR_CONSUMPTION: &str = "1.3.6.1.4.1.9.9.402.1.2.1.9";
pub const CPE_EXT_PSE_PORT_MAX_PWR_DRAWN: &str = "1.3.6.1.4.1.9.9.402.1.2.1.10";

// ccCopyTable, index is a caller-chosen row number
pub const CC_COPY_PROTOCOL: &str = "1.3.6.1.4.1.9.9.96.1.1.1.1.2";
pub const CC_COPY_SOURCE_FILE_TYPE: &str = "1.3.6.1.4.1.9.9.96.1.1.1.1.3";
pub const CC_COPY_DEST_FILE_TYPE: &str = "1.3.6.1.4.1.9.9.96.1.1.1.1.4";
pub const CC_COPY_STATE: &str = "1.3.6.1.4.1.9.9.96.1.1.1.1.10";
pub const CC_COPY_ENTRY_ROW_STATUS: &str = "1.3.6.1.4.1.9.9.96.1.1.1.1.14";

/// OLD-CISCO-SYSTEM-MIB writeMem, set to 1 to save.
pub const WRITE_MEM: &str = "1.3.6.1.4.1.9.2.1.54.0";

pub mod copy {
    pub const FILE_STARTUP_CONFIG: i64 = 3;
    pub const FILE_RUNNING_CONFIG: i64 = 4;
    pub const STATE_WAITING: i64 = 1;
    pub const STATE_RUNNING: i64 = 2;
    pub const STATE_SUCCESSFUL: i64 = 3;
    pub const STATE_FAILED: i64 = 4;
    pub const ROW_CREATE_AND_GO: i64 = 4;
    pub const ROW_DESTROY: i64 = 6;
}

pub const TABLE: &[(&str, &str)] = &[
    ("vtpVlanState", VTP_VLAN_STATE),
    ("vtpVlanType", VTP_VLAN_TYPE),
    ("vtpVlanName", VTP_VLAN_NAME),
    ("vlanTrunkPortVlansEnabled", VLAN_TRUNK_PORT_VLANS_ENABLED),
    ("vlanTrunkPortNativeVlan", VLAN_TRUNK_PORT_NATIVE_VLAN),
    ("vlanTrunkPortDynamicState", VLAN_TRUNK_PORT_DYNAMIC_STATE),
    ("vlanTrunkPortDynamicStatus", VLAN_TRUNK_PORT_DYNAMIC_STATUS),
    ("vlanTrunkPortVlansEnabled2k", VLAN_TRUNK_PORT_VLANS_ENABLED_2K),
    ("vlanTrunkPortVlansEnabled3k", VLAN_TRUNK_PORT_VLANS_ENABLED_3K),
    ("vlanTrunkPortVlansEnabled4k", VLAN_TRUNK_PORT_VLANS_ENABLED_4K),
    ("vmVlan", VM_VLAN),
    ("cpeExtPsePortPwrAllocated", CPE_EXT_PSE_PORT_PWR_ALLOCATED),
    ("cpeExtPsePortPwrAvailable", CPE_EXT_PSE_PORT_PWR_AVAILABLE),
    ("cpeExtPsePortPwrConsumption", CPE_EXT_PSE_PORT_PWR_CONSUMPTION),
    ("cpeExtPsePortMaxPwrDrawn", CPE_EXT_PSE_PORT_MAX_PWR_DRAWN),
    ("ccCopyProtocol", CC_COPY_PROTOCOL),
    ("ccCopySourceFileType", CC_COPY_SOURCE_FILE_TYPE),
    ("ccCopyDestFileType", CC_COPY_DEST_FILE_TYPE),
    ("ccCopyState", CC_COPY_STATE),
    ("ccCopyEntryRowStatus", CC_COPY_ENTRY_ROW_STATUS),
    ("writeMem", WRITE_MEM),
];
