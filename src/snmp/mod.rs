pub mod mibs;
mod value;

pub use mibs::registry;
pub use value::SnmpValue;

/// Strip the optional leading dot from a textual OID.
pub fn normalize_oid(oid: &str) -> &str {
    oid.trim_start_matches('.')
}

/// Index part of `oid` below `branch`, e.g. ("1.3.6.1.2.1.2.2.1.2.7",
/// "1.3.6.1.2.1.2.2.1.2") -> "7". None when `oid` is not below `branch`.
pub fn oid_index<'a>(oid: &'a str, branch: &str) -> Option<&'a str> {
    let rest = normalize_oid(oid).strip_prefix(normalize_oid(branch))?;
    let rest = rest.strip_prefix('.')?;
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

/// Parse a dotted OID into numeric sub-identifiers.
pub fn parse_oid(oid: &str) -> Option<Vec<u32>> {
    normalize_oid(oid)
        .split('.')
        .map(|part| part.parse().ok())
        .collect()
}

/// Single numeric index (ifIndex, bridge port, VLAN id).
pub fn single_index(index: &str) -> Option<u32> {
    index.parse().ok()
}

/// Enterprise number of a sysObjectID ("1.3.6.1.4.1.9.1.1208" -> 9).
pub fn enterprise_id(object_id: &str) -> Option<u32> {
    let rest = normalize_oid(object_id).strip_prefix(mibs::standard::ENTERPRISES)?;
    rest.strip_prefix('.')?.split('.').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_oid_index() {
        assert_eq!(oid_index("1.3.6.1.2.1.2.2.1.2.7", "1.3.6.1.2.1.2.2.1.2"), Some("7"));
        assert_eq!(oid_index(".1.3.6.1.2.1.2.2.1.2.7", "1.3.6.1.2.1.2.2.1.2"), Some("7"));
        assert_eq!(oid_index("1.3.6.1.2.1.2.2.1.20.7", "1.3.6.1.2.1.2.2.1.2"), None);
        assert_eq!(oid_index("1.3.6.1.2.1.2.2.1.2", "1.3.6.1.2.1.2.2.1.2"), None);
    }

    #[test]
    fn test_enterprise_id() {
        assert_eq!(enterprise_id("1.3.6.1.4.1.9.1.1208"), Some(9));
        assert_eq!(enterprise_id(".1.3.6.1.4.1.2636.1.1.1.2.57"), Some(2636));
        assert_eq!(enterprise_id("1.3.6.1.2.1.1"), None);
        assert_eq!(enterprise_id("1.3.6.1.4.1"), None);
    }

    #[test]
    fn test_parse_oid() {
        assert_eq!(parse_oid(".1.3.6"), Some(vec![1, 3, 6]));
        assert_eq!(parse_oid("1.x.6"), None);
    }
}
