use serde::{Deserialize, Serialize};

/// pethPsePortDetectionStatus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoeStatus {
    #[default]
    Disabled,
    Searching,
    Delivering,
    Fault,
    Test,
    OtherFault,
}

impl PoeStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::Disabled),
            2 => Some(Self::Searching),
            3 => Some(Self::Delivering),
            4 => Some(Self::Fault),
            5 => Some(Self::Test),
            6 => Some(Self::OtherFault),
            _ => None,
        }
    }

    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault | Self::OtherFault)
    }
}

/// pethMainPseOperStatus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PseStatus {
    On,
    #[default]
    Off,
    Faulty,
}

impl PseStatus {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            1 => Some(Self::On),
            2 => Some(Self::Off),
            3 => Some(Self::Faulty),
            _ => None,
        }
    }
}

/// PoE state of one PSE port. Power values are milliwatts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoePort {
    /// PSE group (module, stack member) from the "pse.port" index.
    pub pse: u32,
    pub port: u32,
    pub admin_enabled: bool,
    pub detect_status: PoeStatus,
    pub power_consumed: u32,
    pub power_available: u32,
    pub max_power_consumed: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u8>,
}

impl PoePort {
    pub fn new(pse: u32, port: u32) -> Self {
        Self {
            pse,
            port,
            ..Default::default()
        }
    }

    /// Table index as it appears in the POWER-ETHERNET-MIB.
    pub fn index(&self) -> String {
        format!("{}.{}", self.pse, self.port)
    }

    /// Parse a "pse.port" OID index.
    pub fn parse_index(index: &str) -> Option<(u32, u32)> {
        let (pse, port) = index.split_once('.')?;
        Some((pse.parse().ok()?, port.parse().ok()?))
    }
}

/// One power sourcing equipment unit. Power values are watts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoePse {
    pub id: u32,
    pub max_power: u32,
    pub power_consumed: u32,
    pub status: PseStatus,
    /// Usage alarm threshold in percent.
    pub threshold: u32,
}

impl PoePse {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(PoeStatus::from_code(3), Some(PoeStatus::Delivering));
        assert!(PoeStatus::from_code(4).unwrap().is_fault());
        assert!(PoeStatus::from_code(6).unwrap().is_fault());
        assert!(!PoeStatus::Searching.is_fault());
        assert_eq!(PoeStatus::from_code(9), None);
        assert_eq!(PseStatus::from_code(3), Some(PseStatus::Faulty));
    }

    #[test]
    fn test_index() {
        assert_eq!(PoePort::parse_index("2.17"), Some((2, 17)));
        assert_eq!(PoePort::parse_index("17"), None);
        assert_eq!(PoePort::new(1, 5).index(), "1.5");
    }
}
