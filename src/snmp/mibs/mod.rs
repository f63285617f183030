//! MIB constant tables and a merged name/OID registry.
//!
//! Connectors use the `const` OIDs directly. The registry exists for
//! diagnostics: it turns a raw OID back into `name.index` for logs and
//! for the cached OID view.

pub mod cisco;
pub mod standard;
pub mod vendors;

use std::collections::HashMap;
use std::sync::LazyLock;

pub struct MibRegistry {
    by_name: HashMap<&'static str, &'static str>,
    /// Sorted longest OID first, so the first prefix hit is the most specific.
    by_oid: Vec<(&'static str, &'static str)>,
}

impl MibRegistry {
    fn build(tables: &[&[(&'static str, &'static str)]]) -> Self {
        let mut by_name = HashMap::new();
        let mut by_oid = Vec::new();
        for table in tables {
            for &(name, oid) in table.iter() {
                by_name.insert(name, oid);
                by_oid.push((oid, name));
            }
        }
        by_oid.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));
        Self { by_name, by_oid }
    }

    pub fn oid(&self, name: &str) -> Option<&'static str> {
        self.by_name.get(name).copied()
    }

    /// Longest registered prefix of `oid`, returned as (name, index rest).
    pub fn lookup<'a>(&self, oid: &'a str) -> Option<(&'static str, &'a str)> {
        let oid = oid.trim_start_matches('.');
        self.by_oid.iter().find_map(|&(prefix, name)| {
            if oid == prefix {
                Some((name, ""))
            } else {
                oid.strip_prefix(prefix)
                    .and_then(|rest| rest.strip_prefix('.'))
                    .map(|rest| (name, rest))
            }
        })
    }

    /// "ifDescr.3" style rendering, or the OID itself when unknown.
    pub fn describe(&self, oid: &str) -> String {
        match self.lookup(oid) {
            Some((name, "")) => name.to_string(),
            Some((name, index)) => format!("{}.{}", name, index),
            None => oid.to_string(),
        }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}

static REGISTRY: LazyLock<MibRegistry> =
    LazyLock::new(|| MibRegistry::build(&[standard::TABLE, cisco::TABLE, vendors::TABLE]));

pub fn registry() -> &'static MibRegistry {
    &REGISTRY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_to_oid() {
        assert_eq!(registry().oid("ifAlias"), Some(standard::IF_ALIAS));
        assert_eq!(registry().oid("vtpVlanName"), Some(cisco::VTP_VLAN_NAME));
        assert_eq!(registry().oid("noSuchThing"), None);
    }

    #[test]
    fn test_longest_prefix_wins() {
        // ifEntry is a prefix of ifDescr; the column must be reported.
        assert_eq!(
            registry().lookup("1.3.6.1.2.1.2.2.1.2.10101"),
            Some(("ifDescr", "10101"))
        );
        assert_eq!(
            registry().lookup(".1.3.6.1.4.1.9.9.46.1.3.1.1.4.1.20"),
            Some(("vtpVlanName", "1.20"))
        );
        assert_eq!(registry().describe("1.3.6.1.2.1.1.5.0"), "sysName");
        assert_eq!(registry().describe("1.3.6.1.4.1.9.1.1"), "enterprises.9.1.1");
        assert_eq!(registry().describe("1.2.3"), "1.2.3");
    }

    #[test]
    fn test_prefix_requires_component_boundary() {
        // 1.3.6.1.2.1.2.2.1.2 must not match 1.3.6.1.2.1.2.2.1.20
        assert_eq!(
            registry().lookup("1.3.6.1.2.1.2.2.1.20.1"),
            Some(("ifEntry", "20.1"))
        );
    }
}
