//! IETF/IEEE standard MIBs every connector starts from.

// SNMPv2-MIB system group
pub const SYS_DESCR: &str = "1.3.6.1.2.1.1.1.0";
pub const SYS_OBJECT_ID: &str = "1.3.6.1.2.1.1.2.0";
pub const SYS_UPTIME: &str = "1.3.6.1.2.1.1.3.0";
pub const SYS_CONTACT: &str = "1.3.6.1.2.1.1.4.0";
pub const SYS_NAME: &str = "1.3.6.1.2.1.1.5.0";
pub const SYS_LOCATION: &str = "1.3.6.1.2.1.1.6.0";
pub const SYSTEM: &str = "1.3.6.1.2.1.1";

// IF-MIB ifTable
pub const IF_DESCR: &str = "1.3.6.1.2.1.2.2.1.2";
pub const IF_TYPE: &str = "1.3.6.1.2.1.2.2.1.3";
pub const IF_MTU: &str = "1.3.6.1.2.1.2.2.1.4";
pub const IF_SPEED: &str = "1.3.6.1.2.1.2.2.1.5";
pub const IF_PHYS_ADDRESS: &str = "1.3.6.1.2.1.2.2.1.6";
pub const IF_ADMIN_STATUS: &str = "1.3.6.1.2.1.2.2.1.7";
pub const IF_OPER_STATUS: &str = "1.3.6.1.2.1.2.2.1.8";
pub const IF_TABLE: &str = "1.3.6.1.2.1.2.2.1";

// IF-MIB ifXTable
pub const IF_NAME: &str = "1.3.6.1.2.1.31.1.1.1.1";
pub const IF_HIGH_SPEED: &str = "1.3.6.1.2.1.31.1.1.1.15";
pub const IF_ALIAS: &str = "1.3.6.1.2.1.31.1.1.1.18";
pub const IFX_TABLE: &str = "1.3.6.1.2.1.31.1.1.1";

// BRIDGE-MIB
pub const DOT1D_BASE_PORT_IFINDEX: &str = "1.3.6.1.2.1.17.1.4.1.2";
pub const DOT1D_TP_FDB_PORT: &str = "1.3.6.1.2.1.17.4.3.1.2";

// Q-BRIDGE-MIB
pub const DOT1Q_TP_FDB_PORT: &str = "1.3.6.1.2.1.17.7.1.2.2.1.2";
pub const DOT1Q_VLAN_FDB_ID: &str = "1.3.6.1.2.1.17.7.1.4.2.1.3";
pub const DOT1Q_VLAN_STATUS: &str = "1.3.6.1.2.1.17.7.1.4.2.1.6";
pub const DOT1Q_VLAN_STATIC_NAME: &str = "1.3.6.1.2.1.17.7.1.4.3.1.1";
pub const DOT1Q_VLAN_STATIC_EGRESS_PORTS: &str = "1.3.6.1.2.1.17.7.1.4.3.1.2";
pub const DOT1Q_VLAN_STATIC_UNTAGGED_PORTS: &str = "1.3.6.1.2.1.17.7.1.4.3.1.4";
pub const DOT1Q_PVID: &str = "1.3.6.1.2.1.17.7.1.4.5.1.1";

// POWER-ETHERNET-MIB
pub const PETH_PSE_PORT_ADMIN_ENABLE: &str = "1.3.6.1.2.1.105.1.1.1.3";
pub const PETH_PSE_PORT_DETECTION_STATUS: &str = "1.3.6.1.2.1.105.1.1.1.6";
pub const PETH_PSE_PORT_PRIORITY: &str = "1.3.6.1.2.1.105.1.1.1.7";
pub const PETH_PSE_PORT_TABLE: &str = "1.3.6.1.2.1.105.1.1.1";
pub const PETH_MAIN_PSE_POWER: &str = "1.3.6.1.2.1.105.1.3.1.1.2";
pub const PETH_MAIN_PSE_OPER_STATUS: &str = "1.3.6.1.2.1.105.1.3.1.1.3";
pub const PETH_MAIN_PSE_CONSUMPTION_POWER: &str = "1.3.6.1.2.1.105.1.3.1.1.4";
pub const PETH_MAIN_PSE_USAGE_THRESHOLD: &str = "1.3.6.1.2.1.105.1.3.1.1.5";
pub const PETH_MAIN_PSE_TABLE: &str = "1.3.6.1.2.1.105.1.3.1.1";

// LLDP-MIB remote systems data, index timeMark.localPortNum.remIndex
pub const LLDP_REM_CHASSIS_ID_SUBTYPE: &str = "1.0.8802.1.1.2.1.4.1.1.4";
pub const LLDP_REM_CHASSIS_ID: &str = "1.0.8802.1.1.2.1.4.1.1.5";
pub const LLDP_REM_PORT_ID_SUBTYPE: &str = "1.0.8802.1.1.2.1.4.1.1.6";
pub const LLDP_REM_PORT_ID: &str = "1.0.8802.1.1.2.1.4.1.1.7";
pub const LLDP_REM_PORT_DESC: &str = "1.0.8802.1.1.2.1.4.1.1.8";
pub const LLDP_REM_SYS_NAME: &str = "1.0.8802.1.1.2.1.4.1.1.9";
pub const LLDP_REM_SYS_DESC: &str = "1.0.8802.1.1.2.1.4.1.1.10";
pub const LLDP_REM_SYS_CAP_SUPPORTED: &str = "1.0.8802.1.1.2.1.4.1.1.11";
pub const LLDP_REM_SYS_CAP_ENABLED: &str = "1.0.8802.1.1.2.1.4.1.1.12";
pub const LLDP_REM_TABLE: &str = "1.0.8802.1.1.2.1.4.1.1";
/// lldpRemManAddrIfSubtype; the address itself is encoded in the index.
pub const LLDP_REM_MAN_ADDR_IF_SUBTYPE: &str = "1.0.8802.1.1.2.1.4.2.1.3";

// IP-MIB ARP
pub const IP_NET_TO_MEDIA_PHYS_ADDRESS: &str = "1.3.6.1.2.1.4.22.1.2";
pub const IP_NET_TO_PHYSICAL_PHYS_ADDRESS: &str = "1.3.6.1.2.1.4.35.1.4";

// IEEE8023-LAG-MIB
pub const DOT3AD_AGG_PORT_ATTACHED_AGG_ID: &str = "1.2.840.10006.300.43.1.2.1.1.13";

// ENTITY-MIB entPhysicalTable
pub const ENT_PHYSICAL_TABLE: &str = "1.3.6.1.2.1.47.1.1.1.1";
pub const ENT_PHYSICAL_DESCR: &str = "1.3.6.1.2.1.47.1.1.1.1.2";
pub const ENT_PHYSICAL_CLASS: &str = "1.3.6.1.2.1.47.1.1.1.1.5";
pub const ENT_PHYSICAL_SOFTWARE_REV: &str = "1.3.6.1.2.1.47.1.1.1.1.10";
pub const ENT_PHYSICAL_SERIAL_NUM: &str = "1.3.6.1.2.1.47.1.1.1.1.11";
pub const ENT_PHYSICAL_MODEL_NAME: &str = "1.3.6.1.2.1.47.1.1.1.1.13";

/// Private enterprise arc; the next sub-identifier is the vendor number.
pub const ENTERPRISES: &str = "1.3.6.1.4.1";

pub const TABLE: &[(&str, &str)] = &[
    ("system", SYSTEM),
    ("sysDescr", SYS_DESCR),
    ("sysObjectID", SYS_OBJECT_ID),
    ("sysUpTime", SYS_UPTIME),
    ("sysContact", SYS_CONTACT),
    ("sysName", SYS_NAME),
    ("sysLocation", SYS_LOCATION),
    ("ifEntry", IF_TABLE),
    ("ifDescr", IF_DESCR),
    ("ifType", IF_TYPE),
    ("ifMtu", IF_MTU),
    ("ifSpeed", IF_SPEED),
    ("ifPhysAddress", IF_PHYS_ADDRESS),
    ("ifAdminStatus", IF_ADMIN_STATUS),
    ("ifOperStatus", IF_OPER_STATUS),
    ("ifXEntry", IFX_TABLE),
    ("ifName", IF_NAME),
    ("ifHighSpeed", IF_HIGH_SPEED),
    ("ifAlias", IF_ALIAS),
    ("dot1dBasePortIfIndex", DOT1D_BASE_PORT_IFINDEX),
    ("dot1dTpFdbPort", DOT1D_TP_FDB_PORT),
    ("dot1qTpFdbPort", DOT1Q_TP_FDB_PORT),
    ("dot1qVlanFdbId", DOT1Q_VLAN_FDB_ID),
    ("dot1qVlanStatus", DOT1Q_VLAN_STATUS),
    ("dot1qVlanStaticName", DOT1Q_VLAN_STATIC_NAME),
    ("dot1qVlanStaticEgressPorts", DOT1Q_VLAN_STATIC_EGRESS_PORTS),
    ("dot1qVlanStaticUntaggedPorts", DOT1Q_VLAN_STATIC_UNTAGGED_PORTS),
    ("dot1qPvid", DOT1Q_PVID),
    ("pethPsePortEntry", PETH_PSE_PORT_TABLE),
    ("pethPsePortAdminEnable", PETH_PSE_PORT_ADMIN_ENABLE),
    ("pethPsePortDetectionStatus", PETH_PSE_PORT_DETECTION_STATUS),
    ("pethPsePortPowerPriority", PETH_PSE_PORT_PRIORITY),
    ("pethMainPseEntry", PETH_MAIN_PSE_TABLE),
    ("pethMainPsePower", PETH_MAIN_PSE_POWER),
    ("pethMainPseOperStatus", PETH_MAIN_PSE_OPER_STATUS),
    ("pethMainPseConsumptionPower", PETH_MAIN_PSE_CONSUMPTION_POWER),
    ("pethMainPseUsageThreshold", PETH_MAIN_PSE_USAGE_THRESHOLD),
    ("lldpRemEntry", LLDP_REM_TABLE),
    ("lldpRemChassisIdSubtype", LLDP_REM_CHASSIS_ID_SUBTYPE),
    ("lldpRemChassisId", LLDP_REM_CHASSIS_ID),
    ("lldpRemPortIdSubtype", LLDP_REM_PORT_ID_SUBTYPE),
    ("lldpRemPortId", LLDP_REM_PORT_ID),
    ("lldpRemPortDesc", LLDP_REM_PORT_DESC),
    ("lldpRemSysName", LLDP_REM_SYS_NAME),
    ("lldpRemSysDesc", LLDP_REM_SYS_DESC),
    ("lldpRemSysCapSupported", LLDP_REM_SYS_CAP_SUPPORTED),
    ("lldpRemSysCapEnabled", LLDP_REM_SYS_CAP_ENABLED),
    ("lldpRemManAddrIfSubtype", LLDP_REM_MAN_ADDR_IF_SUBTYPE),
    ("ipNetToMediaPhysAddress", IP_NET_TO_MEDIA_PHYS_ADDRESS),
    ("ipNetToPhysicalPhysAddress", IP_NET_TO_PHYSICAL_PHYS_ADDRESS),
    ("dot3adAggPortAttachedAggID", DOT3AD_AGG_PORT_ATTACHED_AGG_ID),
    ("entPhysicalEntry", ENT_PHYSICAL_TABLE),
    ("entPhysicalDescr", ENT_PHYSICAL_DESCR),
    ("entPhysicalClass", ENT_PHYSICAL_CLASS),
    ("entPhysicalSoftwareRev", ENT_PHYSICAL_SOFTWARE_REV),
    ("entPhysicalSerialNum", ENT_PHYSICAL_SERIAL_NUM),
    ("entPhysicalModelName", ENT_PHYSICAL_MODEL_NAME),
    ("enterprises", ENTERPRISES),
];
